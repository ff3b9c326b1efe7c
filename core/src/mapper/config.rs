use crate::mapper::MapperOption;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperConfig {
  pub pretty_print: bool,
  pub include_nulls: bool,
  pub escape_non_ascii: bool,
  pub default_view_inclusion: bool,
  pub wrap_root_value: bool,
  pub auto_close_target: bool,
  pub flush_passed_to_stream: bool,
}

impl Default for MapperConfig {
  fn default() -> Self {
    MapperConfig {
      pretty_print: false,
      include_nulls: true,
      escape_non_ascii: false,
      default_view_inclusion: true,
      wrap_root_value: false,
      auto_close_target: true,
      flush_passed_to_stream: true,
    }
  }
}

impl MapperConfig {
  pub fn from(options: impl IntoIterator<Item = MapperOption>) -> MapperConfig {
    let options = options.into_iter().collect::<Vec<_>>();
    let mut config = MapperConfig::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }
}
