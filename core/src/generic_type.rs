use std::any::{Any, TypeId};
use std::fmt::{Display, Formatter};

/// Declared type of a response entity: a raw type name plus its type arguments.
///
/// `alloc::vec::Vec<app::User>` has the raw type `alloc::vec::Vec` and a single argument
/// `app::User`. Names that are not of the `path<args>` shape (tuples, slices, references,
/// function pointers) are kept whole as a raw type without arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GenericType {
  raw: String,
  arguments: Vec<GenericType>,
}

impl GenericType {
  pub fn of<T: ?Sized>() -> Self {
    Self::parse(std::any::type_name::<T>())
  }

  pub fn named(raw: impl Into<String>) -> Self {
    Self {
      raw: raw.into(),
      arguments: Vec::new(),
    }
  }

  pub fn parameterized(raw: impl Into<String>, arguments: impl IntoIterator<Item = GenericType>) -> Self {
    Self {
      raw: raw.into(),
      arguments: arguments.into_iter().collect(),
    }
  }

  pub fn parse(type_name: &str) -> Self {
    let type_name = type_name.trim();
    match split_arguments(type_name) {
      Some((raw, arguments)) => Self::parameterized(raw, arguments.into_iter().map(Self::parse)),
      None => Self::named(type_name),
    }
  }

  pub fn raw_type(&self) -> &str {
    &self.raw
  }

  pub fn arguments(&self) -> &[GenericType] {
    &self.arguments
  }

  pub fn is_parameterized(&self) -> bool {
    !self.arguments.is_empty()
  }

  /// The type whose writer a class level strategy is cached under: the first type argument of a
  /// parameterized type (`Page<User>` -> `User`), otherwise the type itself.
  pub fn effective_type(&self) -> &GenericType {
    self.arguments.first().unwrap_or(self)
  }

  /// Fully-qualified name, rendered the way `std::any::type_name` renders it.
  pub fn type_name(&self) -> String {
    self.to_string()
  }

  /// Last path segment of the raw type, e.g. `User` for `app::model::User`.
  pub fn simple_name(&self) -> &str {
    self.raw.rsplit("::").next().unwrap_or(&self.raw)
  }

  /// The type a value of this type serializes as: references and the standard wrappers serde
  /// writes as their content (`Option`, `Box`, `Arc`, `Rc`, `Cow`) are looked through, so
  /// `Option<Box<app::User>>` and `&app::User` both give `app::User`.
  pub fn content_type(&self) -> GenericType {
    if let Some(referent) = strip_reference(&self.raw) {
      return GenericType::parse(referent).content_type();
    }
    match self.arguments.as_slice() {
      [inner] if self.is_std_type(TRANSPARENT_WRAPPERS) => inner.content_type(),
      _ => self.clone(),
    }
  }

  /// Whether this is one of the standard map types, whose second argument is the value type.
  pub fn is_std_map(&self) -> bool {
    self.arguments.len() == 2 && self.is_std_type(MAPS)
  }

  fn is_std_type(&self, simple_names: &[&str]) -> bool {
    STD_CRATES.iter().any(|prefix| self.raw.starts_with(prefix)) && simple_names.contains(&self.simple_name())
  }
}

const STD_CRATES: [&str; 3] = ["core::", "alloc::", "std::"];
const TRANSPARENT_WRAPPERS: &[&str] = &["Option", "Box", "Arc", "Rc", "Cow"];
const MAPS: &[&str] = &["HashMap", "BTreeMap"];

fn strip_reference(type_name: &str) -> Option<&str> {
  let mut rest = type_name.strip_prefix('&')?;
  loop {
    rest = rest.strip_prefix("mut ").unwrap_or(rest);
    match rest.strip_prefix('&') {
      Some(inner) => rest = inner,
      None => return Some(rest),
    }
  }
}

impl Display for GenericType {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.raw)?;
    if self.arguments.is_empty() {
      return Ok(());
    }
    f.write_str("<")?;
    for (idx, argument) in self.arguments.iter().enumerate() {
      if idx > 0 {
        f.write_str(", ")?;
      }
      write!(f, "{}", argument)?;
    }
    f.write_str(">")
  }
}

fn split_arguments(type_name: &str) -> Option<(&str, Vec<&str>)> {
  if !type_name.ends_with('>') {
    return None;
  }
  let open = type_name.find('<')?;
  let raw = &type_name[..open];
  if raw.is_empty() || raw.contains(['(', '[', '&', '*', ' ']) {
    return None;
  }
  let inner = &type_name[open + 1..type_name.len() - 1];
  let mut depth = 0usize;
  let mut start = 0;
  let mut previous = ' ';
  let mut arguments = Vec::new();
  for (idx, ch) in inner.char_indices() {
    match ch {
      '<' | '(' | '[' => depth += 1,
      // `->` of a function pointer does not close anything
      '>' if previous == '-' => {}
      '>' | ')' | ']' => {
        if depth == 0 {
          return None;
        }
        depth -= 1;
      }
      ',' if depth == 0 => {
        arguments.push(inner[start..idx].trim());
        start = idx + 1;
      }
      _ => {}
    }
    previous = ch;
  }
  if depth != 0 {
    return None;
  }
  arguments.push(inner[start..].trim());
  if arguments.iter().any(|argument| argument.is_empty()) {
    return None;
  }
  Some((raw, arguments))
}

/// Concrete type of the value being written, handed to [`crate::MapperContextResolver`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuntimeType {
  id: TypeId,
  name: &'static str,
}

impl RuntimeType {
  pub fn of<T: Any + ?Sized>() -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: std::any::type_name::<T>(),
    }
  }

  pub fn id(&self) -> TypeId {
    self.id
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn is<T: Any + ?Sized>(&self) -> bool {
    self.id == TypeId::of::<T>()
  }
}

impl Display for RuntimeType {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name)
  }
}
