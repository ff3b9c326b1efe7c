use crate::strategy::{StrategyId, StrategyRegistry, WriterStrategy};
use crate::view::{JsonView, ViewRegistry};
use std::collections::HashMap;
use std::sync::Arc;

/// Serialization metadata of resource methods and classes, filled in once while the resources
/// are being set up and only read while serving requests.
#[derive(Debug, Default)]
pub struct SerializationMetadata {
  method_views: HashMap<String, JsonView>,
  class_views: HashMap<String, JsonView>,
  method_strategies: HashMap<String, StrategyId>,
  class_strategies: HashMap<String, StrategyId>,
  strategies: StrategyRegistry,
  views: Arc<ViewRegistry>,
}

impl SerializationMetadata {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set_json_view_for_method(&mut self, method_id: impl Into<String>, view: JsonView) -> &mut Self {
    self.method_views.insert(method_id.into(), view);
    self
  }

  pub fn set_json_view_for_class(&mut self, resource_class: impl Into<String>, view: JsonView) -> &mut Self {
    self.class_views.insert(resource_class.into(), view);
    self
  }

  /// Points the method at a strategy id. The id has to be registered with
  /// [`SerializationMetadata::strategies`] before the method is invoked.
  pub fn set_custom_serialization_for_method(&mut self, method_id: impl Into<String>, strategy_id: StrategyId) -> &mut Self {
    self.method_strategies.insert(method_id.into(), strategy_id);
    self
  }

  pub fn set_custom_serialization_for_class(
    &mut self,
    resource_class: impl Into<String>,
    strategy_id: StrategyId,
  ) -> &mut Self {
    self.class_strategies.insert(resource_class.into(), strategy_id);
    self
  }

  pub fn register_custom_serialization_for_method<S>(&mut self, method_id: impl Into<String>) -> &mut Self
  where
    S: WriterStrategy + Default + 'static, {
    let strategy_id = self.strategies.register::<S>();
    self.set_custom_serialization_for_method(method_id, strategy_id)
  }

  pub fn register_custom_serialization_for_class<S>(&mut self, resource_class: impl Into<String>) -> &mut Self
  where
    S: WriterStrategy + Default + 'static, {
    let strategy_id = self.strategies.register::<S>();
    self.set_custom_serialization_for_class(resource_class, strategy_id)
  }

  pub fn json_view_for_method(&self, method_id: &str) -> Option<&JsonView> {
    self.method_views.get(method_id)
  }

  pub fn json_view_for_class(&self, resource_class: &str) -> Option<&JsonView> {
    self.class_views.get(resource_class)
  }

  pub fn custom_serialization_for_method(&self, method_id: &str) -> Option<&StrategyId> {
    self.method_strategies.get(method_id)
  }

  pub fn custom_serialization_for_class(&self, resource_class: &str) -> Option<&StrategyId> {
    self.class_strategies.get(resource_class)
  }

  pub fn strategies(&self) -> &StrategyRegistry {
    &self.strategies
  }

  /// View membership of entity fields, shared by every writer whatever mapper it is bound to.
  pub fn views(&self) -> &Arc<ViewRegistry> {
    &self.views
  }

  pub fn views_mut(&mut self) -> &mut ViewRegistry {
    Arc::make_mut(&mut self.views)
  }
}
