use crate::generic_type::GenericType;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Tag restricting which fields a writer emits.
///
/// Views form a hierarchy: a field visible in `Public` is also visible while `Internal` is active
/// when `Internal` extends `Public`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonView {
  name: Arc<str>,
  ancestors: Arc<[Arc<str>]>,
}

impl JsonView {
  pub fn new(name: impl Into<Arc<str>>) -> Self {
    Self {
      name: name.into(),
      ancestors: Arc::from(Vec::new()),
    }
  }

  pub fn extending(name: impl Into<Arc<str>>, parent: &JsonView) -> Self {
    let ancestors = std::iter::once(parent.name.clone())
      .chain(parent.ancestors.iter().cloned())
      .collect::<Vec<_>>();
    Self {
      name: name.into(),
      ancestors: Arc::from(ancestors),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// `true` when a field declared for `other` is visible while `self` is the active view.
  pub fn is_assignable_to(&self, other: &JsonView) -> bool {
    self.name == other.name || self.ancestors.iter().any(|ancestor| *ancestor == other.name)
  }
}

impl Display for JsonView {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.name)
  }
}

/// View membership of one field of a registered type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
  name: String,
  views: Vec<JsonView>,
  nested_type: Option<String>,
}

impl FieldView {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      views: Vec::new(),
      nested_type: None,
    }
  }

  pub fn in_views(mut self, views: impl IntoIterator<Item = JsonView>) -> Self {
    self.views.extend(views);
    self
  }

  /// Declares the type of the field's value so that views also apply inside it.
  pub fn nested<T: ?Sized>(self) -> Self {
    self.nested_type(std::any::type_name::<T>())
  }

  pub fn nested_type(mut self, type_name: impl Into<String>) -> Self {
    self.nested_type = Some(type_name.into());
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn views(&self) -> &[JsonView] {
    &self.views
  }

  fn is_visible_in(&self, active: &JsonView, default_view_inclusion: bool) -> bool {
    if self.views.is_empty() {
      return default_view_inclusion;
    }
    self.views.iter().any(|view| active.is_assignable_to(view))
  }
}

/// Field view declarations keyed by fully-qualified type name. Membership belongs to the type,
/// so one registry serves every mapper.
#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
  types: HashMap<String, Vec<FieldView>>,
}

impl ViewRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(&mut self, type_name: impl Into<String>, fields: impl IntoIterator<Item = FieldView>) -> &mut Self {
    self.types.entry(type_name.into()).or_default().extend(fields);
    self
  }

  pub fn register_type<T: ?Sized>(&mut self, fields: impl IntoIterator<Item = FieldView>) -> &mut Self {
    self.register(std::any::type_name::<T>(), fields)
  }

  /// Drops the members of `value` that are not visible in `active`.
  ///
  /// `type_name` is resolved to its content type first (see [`GenericType::content_type`]).
  /// Sequences are filtered element by element, standard maps value by value. Objects of types
  /// missing from the registry are left untouched.
  pub fn apply(&self, value: &mut Value, type_name: &str, active: &JsonView, default_view_inclusion: bool) {
    let content_type = GenericType::parse(type_name).content_type();
    match value {
      Value::Array(items) => {
        let Some(element_type) = element_type(&content_type) else {
          return;
        };
        for item in items.iter_mut() {
          self.apply(item, &element_type, active, default_view_inclusion);
        }
      }
      Value::Object(members) if content_type.is_std_map() => {
        let value_type = content_type.arguments()[1].type_name();
        for member in members.values_mut() {
          self.apply(member, &value_type, active, default_view_inclusion);
        }
      }
      Value::Object(members) => {
        let Some(fields) = self.types.get(&content_type.type_name()) else {
          return;
        };
        members.retain(|key, _| match fields.iter().find(|field| field.name == *key) {
          Some(field) => field.is_visible_in(active, default_view_inclusion),
          None => default_view_inclusion,
        });
        for field in fields {
          if let (Some(nested_type), Some(child)) = (&field.nested_type, members.get_mut(&field.name)) {
            self.apply(child, nested_type, active, default_view_inclusion);
          }
        }
      }
      _ => {}
    }
  }
}

/// Element type of a sequence: `[T]`, `[T; N]`, or the first argument of `Vec<T>` and the like.
fn element_type(sequence: &GenericType) -> Option<String> {
  if let Some(inner) = sequence.raw_type().strip_prefix('[').and_then(|raw| raw.strip_suffix(']')) {
    let element = match inner.rsplit_once(';') {
      Some((element, len)) if len.trim().chars().all(|ch| ch.is_ascii_digit()) => element,
      _ => inner,
    };
    return Some(element.trim().to_string());
  }
  sequence.arguments().first().map(GenericType::type_name)
}
