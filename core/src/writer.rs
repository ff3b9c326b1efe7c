mod factory;
mod formatter;

pub use self::factory::*;

use self::formatter::AsciiEscapingFormatter;
use crate::error::JsonWriterError;
use crate::generic_type::GenericType;
use crate::mapper::{JsonMapper, MapperConfig};
use crate::spi::ResponseOutput;
use crate::view::{JsonView, ViewRegistry};
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter};
use serde_json::{Map, Value};
use std::fmt::{Debug, Formatter as FmtFormatter};
use std::io;
use std::sync::Arc;

/// What a writer does to its target after the value has been emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSettings {
  pub auto_close_target: bool,
  pub flush_passed_to_stream: bool,
}

impl StreamSettings {
  /// The target is left alone: the caller flushes and closes it.
  pub const MANAGED: StreamSettings = StreamSettings {
    auto_close_target: false,
    flush_passed_to_stream: false,
  };

  fn from_config(config: &MapperConfig) -> Self {
    Self {
      auto_close_target: config.auto_close_target,
      flush_passed_to_stream: config.flush_passed_to_stream,
    }
  }
}

#[derive(Clone)]
struct ActiveView {
  view: JsonView,
  registry: Arc<ViewRegistry>,
}

#[derive(Clone)]
struct WriterSettings {
  view: Option<ActiveView>,
  pretty_print: bool,
  escape_non_ascii: bool,
  root_name: Option<String>,
  stream: StreamSettings,
}

/// Immutable, reusable serialization function bound to a [`JsonMapper`].
///
/// Cloning is cheap and clones share identity (see [`ObjectWriter::ptr_eq`]); every `with_*`
/// method returns a new writer and leaves the receiver untouched, so writers can be cached and
/// used from many requests at once.
#[derive(Clone)]
pub struct ObjectWriter {
  mapper: Arc<JsonMapper>,
  settings: Arc<WriterSettings>,
}

impl ObjectWriter {
  pub fn new(mapper: Arc<JsonMapper>) -> Self {
    let config = mapper.config();
    let settings = WriterSettings {
      view: None,
      pretty_print: config.pretty_print,
      escape_non_ascii: config.escape_non_ascii,
      root_name: None,
      stream: StreamSettings::from_config(config),
    };
    Self {
      mapper,
      settings: Arc::new(settings),
    }
  }

  pub fn ptr_eq(left: &ObjectWriter, right: &ObjectWriter) -> bool {
    Arc::ptr_eq(&left.settings, &right.settings) && Arc::ptr_eq(&left.mapper, &right.mapper)
  }

  pub fn mapper(&self) -> &Arc<JsonMapper> {
    &self.mapper
  }

  pub fn view(&self) -> Option<&JsonView> {
    self.settings.view.as_ref().map(|active| &active.view)
  }

  pub fn is_pretty_print(&self) -> bool {
    self.settings.pretty_print
  }

  pub fn is_escape_non_ascii(&self) -> bool {
    self.settings.escape_non_ascii
  }

  pub fn root_name(&self) -> Option<&str> {
    self.settings.root_name.as_deref()
  }

  pub fn stream_settings(&self) -> StreamSettings {
    self.settings.stream
  }

  /// Restricts the output to the fields `registry` declares visible in `view`. The registry is
  /// independent of the mapper, so the view holds whichever mapper the writer is bound to.
  pub fn with_view(&self, view: JsonView, registry: &Arc<ViewRegistry>) -> Self {
    if let Some(active) = &self.settings.view {
      if active.view == view && Arc::ptr_eq(&active.registry, registry) {
        return self.clone();
      }
    }
    let active = ActiveView {
      view,
      registry: registry.clone(),
    };
    self.with_settings(|settings| settings.view = Some(active))
  }

  pub fn with_pretty_print(&self, enabled: bool) -> Self {
    self.with_settings(|settings| settings.pretty_print = enabled)
  }

  pub fn with_escape_non_ascii(&self, enabled: bool) -> Self {
    self.with_settings(|settings| settings.escape_non_ascii = enabled)
  }

  /// Wraps the output in a single-member object named `name`, whatever the mapper says about
  /// root wrapping.
  pub fn with_root_name(&self, name: impl Into<String>) -> Self {
    let name = name.into();
    self.with_settings(|settings| settings.root_name = Some(name))
  }

  pub fn with_stream_settings(&self, stream: StreamSettings) -> Self {
    self.with_settings(|settings| settings.stream = stream)
  }

  fn with_settings(&self, f: impl FnOnce(&mut WriterSettings)) -> Self {
    let mut settings = (*self.settings).clone();
    f(&mut settings);
    Self {
      mapper: self.mapper.clone(),
      settings: Arc::new(settings),
    }
  }

  /// Serializes `value` into `out`, then flushes and closes `out` as the stream settings say.
  pub fn write_value<O, T>(&self, out: &mut O, value: &T) -> Result<(), JsonWriterError>
  where
    O: ResponseOutput + ?Sized,
    T: Serialize + ?Sized, {
    let tree = self.to_tree(value, std::any::type_name::<T>())?;
    self.emit(&mut *out, &tree)?;
    if self.settings.stream.flush_passed_to_stream {
      out.flush()?;
    }
    if self.settings.stream.auto_close_target {
      out.close()?;
    }
    Ok(())
  }

  pub fn write_value_as_bytes<T>(&self, value: &T) -> Result<Vec<u8>, JsonWriterError>
  where
    T: Serialize + ?Sized, {
    let mut buffer = Vec::new();
    self.write_value(&mut buffer, value)?;
    Ok(buffer)
  }

  pub fn write_value_as_string<T>(&self, value: &T) -> Result<String, JsonWriterError>
  where
    T: Serialize + ?Sized, {
    let buffer = self.write_value_as_bytes(value)?;
    String::from_utf8(buffer).map_err(|err| JsonWriterError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
  }

  fn to_tree<T>(&self, value: &T, type_name: &str) -> Result<Value, JsonWriterError>
  where
    T: Serialize + ?Sized, {
    let config = self.mapper.config();
    let mut tree = serde_json::to_value(value)?;
    if !config.include_nulls {
      strip_nulls(&mut tree);
    }
    if let Some(active) = &self.settings.view {
      active
        .registry
        .apply(&mut tree, type_name, &active.view, config.default_view_inclusion);
    }
    let root_name = match &self.settings.root_name {
      Some(name) => Some(name.clone()),
      None if config.wrap_root_value => Some(GenericType::parse(type_name).content_type().simple_name().to_string()),
      None => None,
    };
    if let Some(name) = root_name {
      let mut root = Map::new();
      root.insert(name, tree);
      tree = Value::Object(root);
    }
    Ok(tree)
  }

  fn emit<W>(&self, out: &mut W, tree: &Value) -> Result<(), serde_json::Error>
  where
    W: io::Write + ?Sized, {
    match (self.settings.pretty_print, self.settings.escape_non_ascii) {
      (false, false) => emit_with(out, CompactFormatter, tree),
      (true, false) => emit_with(out, PrettyFormatter::new(), tree),
      (false, true) => emit_with(out, AsciiEscapingFormatter::new(CompactFormatter), tree),
      (true, true) => emit_with(out, AsciiEscapingFormatter::new(PrettyFormatter::new()), tree),
    }
  }
}

impl Debug for ObjectWriter {
  fn fmt(&self, f: &mut FmtFormatter<'_>) -> std::fmt::Result {
    f.debug_struct("ObjectWriter")
      .field("mapper", &self.mapper.id())
      .field("view", &self.view())
      .field("pretty_print", &self.settings.pretty_print)
      .field("escape_non_ascii", &self.settings.escape_non_ascii)
      .field("root_name", &self.settings.root_name)
      .field("stream", &self.settings.stream)
      .finish()
  }
}

static_assertions::assert_impl_all!(ObjectWriter: Send, Sync);

fn emit_with<W, F>(out: &mut W, formatter: F, tree: &Value) -> Result<(), serde_json::Error>
where
  W: io::Write + ?Sized,
  F: Formatter, {
  let mut serializer = serde_json::Serializer::with_formatter(out, formatter);
  tree.serialize(&mut serializer)
}

fn strip_nulls(value: &mut Value) {
  match value {
    Value::Object(members) => {
      members.retain(|_, member| !member.is_null());
      members.values_mut().for_each(strip_nulls);
    }
    Value::Array(items) => items.iter_mut().for_each(strip_nulls),
    _ => {}
  }
}
