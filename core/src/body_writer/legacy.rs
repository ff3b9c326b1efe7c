use crate::body_writer::{raw_text, JsonMessageBodyWriter};
use crate::error::JsonWriterError;
use crate::media_type::MediaType;
use crate::spi::{Annotation, HttpHeaders, ResponseOutput};
use crate::view::ViewRegistry;
use crate::writer::ObjectWriter;
use serde::Serialize;
use std::any::Any;
use std::io::Write;
use std::sync::Arc;

pub const CONTENT_TYPE: &str = "Content-Type";

impl JsonMessageBodyWriter {
  /// Write path for callers outside resource method dispatch. Only the default writer is used:
  /// no negotiated mapper, no method or class strategy.
  pub fn write_to<T, O>(
    &self,
    value: &T,
    annotations: &[Annotation],
    http_headers: &mut HttpHeaders,
    entity_stream: &mut O,
  ) -> Result<(), JsonWriterError>
  where
    T: Serialize + Any,
    O: ResponseOutput + ?Sized, {
    do_legacy_write(
      value,
      annotations,
      http_headers,
      entity_stream,
      &self.default_writer,
      self.metadata.views(),
    )
  }
}

/// Sets a JSON content type unless one is present, then writes `value` with `default_writer`,
/// narrowed to the first view found in the `JsonView` annotations, checked in order. Text is
/// written verbatim unless a `JsonView` annotation is present. The stream is neither flushed nor
/// closed here.
pub fn do_legacy_write<T, O>(
  value: &T,
  annotations: &[Annotation],
  http_headers: &mut HttpHeaders,
  entity_stream: &mut O,
  default_writer: &ObjectWriter,
  views: &Arc<ViewRegistry>,
) -> Result<(), JsonWriterError>
where
  T: Serialize + Any,
  O: ResponseOutput + ?Sized, {
  set_content_type_if_necessary(http_headers);
  if !annotations.iter().any(Annotation::is_json_view) {
    if let Some(text) = raw_text(value) {
      entity_stream.write_all(text.as_bytes())?;
      return Ok(());
    }
  }
  match annotations.iter().find_map(Annotation::first_view) {
    Some(view) => default_writer.with_view(view.clone(), views).write_value(entity_stream, value),
    None => default_writer.write_value(entity_stream, value),
  }
}

fn set_content_type_if_necessary(http_headers: &mut HttpHeaders) {
  let existing_key = http_headers
    .keys()
    .find(|name| name.eq_ignore_ascii_case(CONTENT_TYPE))
    .cloned();
  let is_json = existing_key
    .as_ref()
    .and_then(|key| http_headers.get(key))
    .and_then(|values| values.first())
    .map(|value| value.contains("json"))
    .unwrap_or(false);
  if is_json {
    return;
  }
  let key = existing_key.unwrap_or_else(|| CONTENT_TYPE.to_string());
  http_headers.insert(key, vec![MediaType::application_json().to_string()]);
}
