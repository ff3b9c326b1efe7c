use crate::mapper::MapperConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapperOption {
  SetPrettyPrint(bool),
  SetIncludeNulls(bool),
  SetEscapeNonAscii(bool),
  SetDefaultViewInclusion(bool),
  SetWrapRootValue(bool),
  SetAutoCloseTarget(bool),
  SetFlushPassedToStream(bool),
}

impl MapperOption {
  pub fn apply(&self, config: &mut MapperConfig) {
    match self {
      MapperOption::SetPrettyPrint(enabled) => {
        config.pretty_print = *enabled;
      }
      MapperOption::SetIncludeNulls(enabled) => {
        config.include_nulls = *enabled;
      }
      MapperOption::SetEscapeNonAscii(enabled) => {
        config.escape_non_ascii = *enabled;
      }
      MapperOption::SetDefaultViewInclusion(enabled) => {
        config.default_view_inclusion = *enabled;
      }
      MapperOption::SetWrapRootValue(enabled) => {
        config.wrap_root_value = *enabled;
      }
      MapperOption::SetAutoCloseTarget(enabled) => {
        config.auto_close_target = *enabled;
      }
      MapperOption::SetFlushPassedToStream(enabled) => {
        config.flush_passed_to_stream = *enabled;
      }
    }
  }

  pub fn with_pretty_print(enabled: bool) -> MapperOption {
    MapperOption::SetPrettyPrint(enabled)
  }

  pub fn with_include_nulls(enabled: bool) -> MapperOption {
    MapperOption::SetIncludeNulls(enabled)
  }

  pub fn with_escape_non_ascii(enabled: bool) -> MapperOption {
    MapperOption::SetEscapeNonAscii(enabled)
  }

  pub fn with_default_view_inclusion(enabled: bool) -> MapperOption {
    MapperOption::SetDefaultViewInclusion(enabled)
  }

  pub fn with_wrap_root_value(enabled: bool) -> MapperOption {
    MapperOption::SetWrapRootValue(enabled)
  }

  pub fn with_auto_close_target(enabled: bool) -> MapperOption {
    MapperOption::SetAutoCloseTarget(enabled)
  }

  pub fn with_flush_passed_to_stream(enabled: bool) -> MapperOption {
    MapperOption::SetFlushPassedToStream(enabled)
  }
}
