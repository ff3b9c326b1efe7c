use crate::error::JsonWriterError;
use crate::generic_type::GenericType;
use crate::mapper::JsonMapper;
use crate::writer::ObjectWriter;
use dashmap::DashMap;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

/// Name under which a [`WriterStrategy`] is registered. Resource metadata refers to strategies by
/// id only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrategyId(Arc<str>);

impl StrategyId {
  pub fn new(name: impl Into<Arc<str>>) -> Self {
    Self(name.into())
  }

  pub fn of<S: ?Sized>() -> Self {
    Self::new(std::any::type_name::<S>())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Display for StrategyId {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct StrategyError(String);

impl StrategyError {
  pub fn new(message: impl Into<String>) -> Self {
    Self(message.into())
  }
}

/// Builds the writer for a resource method or class from the effective mapper and the declared
/// type of the response entity.
pub trait WriterStrategy: Send + Sync {
  fn create_writer(&self, mapper: &Arc<JsonMapper>, generic_type: &GenericType) -> Result<ObjectWriter, StrategyError>;
}

type StrategyConstructor = Arc<dyn Fn() -> Result<Box<dyn WriterStrategy>, StrategyError> + Send + Sync>;

/// Constructors of the strategies resource metadata may refer to.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
  constructors: Arc<DashMap<StrategyId, StrategyConstructor>>,
}

impl StrategyRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `S` under [`StrategyId::of::<S>()`], constructed through `Default`.
  pub fn register<S>(&self) -> StrategyId
  where
    S: WriterStrategy + Default + 'static, {
    let strategy_id = StrategyId::of::<S>();
    self.register_constructor(strategy_id.clone(), || Ok(Box::new(S::default()) as Box<dyn WriterStrategy>));
    strategy_id
  }

  pub fn register_constructor<F>(&self, strategy_id: StrategyId, constructor: F)
  where
    F: Fn() -> Result<Box<dyn WriterStrategy>, StrategyError> + Send + Sync + 'static, {
    tracing::debug!("Registering writer strategy: strategy_id = {}", strategy_id);
    self.constructors.insert(strategy_id, Arc::new(constructor));
  }

  pub fn contains(&self, strategy_id: &StrategyId) -> bool {
    self.constructors.contains_key(strategy_id)
  }

  /// Creates a fresh instance of the strategy. A missing or failing constructor is an
  /// unrecoverable [`JsonWriterError::StrategyInstantiation`].
  pub fn instantiate(&self, strategy_id: &StrategyId) -> Result<Box<dyn WriterStrategy>, JsonWriterError> {
    let constructor = self
      .constructors
      .get(strategy_id)
      .map(|entry| entry.value().clone())
      .ok_or_else(|| JsonWriterError::StrategyInstantiation {
        strategy: strategy_id.clone(),
        cause: StrategyError::new("no no-argument constructor registered"),
      })?;
    constructor().map_err(|cause| JsonWriterError::StrategyInstantiation {
      strategy: strategy_id.clone(),
      cause,
    })
  }
}

impl Debug for StrategyRegistry {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut ids = self
      .constructors
      .iter()
      .map(|entry| entry.key().clone())
      .collect::<Vec<_>>();
    ids.sort();
    f.debug_struct("StrategyRegistry").field("strategies", &ids).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Default)]
  struct PrettyStrategy;

  impl WriterStrategy for PrettyStrategy {
    fn create_writer(&self, mapper: &Arc<JsonMapper>, _: &GenericType) -> Result<ObjectWriter, StrategyError> {
      Ok(mapper.writer().with_pretty_print(true))
    }
  }

  #[test]
  fn test_register_uses_type_name_as_id() {
    let registry = StrategyRegistry::new();
    let strategy_id = registry.register::<PrettyStrategy>();
    assert_eq!(strategy_id.as_str(), std::any::type_name::<PrettyStrategy>());
    assert!(registry.contains(&strategy_id));

    let strategy = registry.instantiate(&strategy_id).unwrap();
    let writer = strategy
      .create_writer(&Arc::new(JsonMapper::new()), &GenericType::of::<u8>())
      .unwrap();
    assert!(writer.is_pretty_print());
  }

  #[test]
  fn test_unknown_strategy_fails_to_instantiate() {
    let registry = StrategyRegistry::new();
    let err = registry.instantiate(&StrategyId::new("app::Missing")).err().unwrap();
    assert!(err.is_unrecoverable());
  }

  #[test]
  fn test_failing_constructor_fails_to_instantiate() {
    let registry = StrategyRegistry::new();
    let strategy_id = StrategyId::new("app::Broken");
    registry.register_constructor(strategy_id.clone(), || Err(StrategyError::new("boom")));
    match registry.instantiate(&strategy_id) {
      Err(JsonWriterError::StrategyInstantiation { strategy, cause }) => {
        assert_eq!(strategy, strategy_id);
        assert_eq!(cause, StrategyError::new("boom"));
      }
      _ => panic!("expected an instantiation error"),
    }
  }
}
