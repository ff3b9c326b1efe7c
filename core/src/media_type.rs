use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// `type/subtype` with optional `; key=value` parameters, as negotiated by the host. Type,
/// subtype and parameter names are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
  type_: String,
  subtype: String,
  parameters: BTreeMap<String, String>,
}

impl MediaType {
  pub fn new(type_: impl Into<String>, subtype: impl Into<String>) -> Self {
    Self {
      type_: type_.into().to_ascii_lowercase(),
      subtype: subtype.into().to_ascii_lowercase(),
      parameters: BTreeMap::new(),
    }
  }

  pub fn application_json() -> Self {
    Self::new("application", "json")
  }

  pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.parameters.insert(name.into().to_ascii_lowercase(), value.into());
    self
  }

  /// The media type without its parameters; the key providers scope resolvers by.
  pub fn essence(&self) -> String {
    format!("{}/{}", self.type_, self.subtype)
  }
}

impl Display for MediaType {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}/{}", self.type_, self.subtype)?;
    for (name, value) in &self.parameters {
      write!(f, ";{}={}", name, value)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_essence_drops_parameters() {
    let media_type = MediaType::new("Application", "JSON").with_parameter("Charset", "UTF-8");
    assert_eq!(media_type.essence(), "application/json");
    assert_eq!(media_type.to_string(), "application/json;charset=UTF-8");
    assert_eq!(MediaType::application_json().to_string(), "application/json");
  }
}
