mod legacy;
mod mapper_resolver;
mod override_lookup;


pub use self::legacy::*;

use crate::error::JsonWriterError;
use crate::generic_type::{GenericType, RuntimeType};
use crate::mapper::{JsonMapper, MapperId};
use crate::media_type::MediaType;
use crate::metadata::SerializationMetadata;
use crate::spi::{NoProviders, Providers, ResourceInfo, ServerRequestContext};
use crate::writer::{create_default_writer, ObjectWriter};
use dashmap::DashMap;
use nexus_rest_utils_rs::collections::DashMapExtension;
use serde::Serialize;
use std::any::Any;
use std::borrow::Cow;
use std::fmt::{Debug, Formatter};
use std::io::Write;
use std::sync::Arc;

/// Writes response entities of any type as JSON.
///
/// One instance serves every request. Writers built for negotiated mappers, resource methods and
/// entity types are cached for the lifetime of the instance and never replaced.
pub struct JsonMessageBodyWriter {
  original_mapper: Arc<JsonMapper>,
  default_writer: ObjectWriter,
  providers: Arc<dyn Providers>,
  metadata: Arc<SerializationMetadata>,
  per_method_writer: DashMap<String, ObjectWriter>,
  per_type_writer: DashMap<String, ObjectWriter>,
  context_resolver_writers: DashMap<MapperId, ObjectWriter>,
}

impl JsonMessageBodyWriter {
  pub fn new(mapper: Arc<JsonMapper>, providers: Arc<dyn Providers>, metadata: Arc<SerializationMetadata>) -> Self {
    let default_writer = create_default_writer(&mapper);
    Self {
      original_mapper: mapper,
      default_writer,
      providers,
      metadata,
      per_method_writer: DashMap::new(),
      per_type_writer: DashMap::new(),
      context_resolver_writers: DashMap::new(),
    }
  }

  /// A body writer without negotiated mappers.
  pub fn with_mapper(mapper: Arc<JsonMapper>, metadata: Arc<SerializationMetadata>) -> Self {
    Self::new(mapper, Arc::new(NoProviders), metadata)
  }

  pub fn original_mapper(&self) -> &Arc<JsonMapper> {
    &self.original_mapper
  }

  pub fn default_writer(&self) -> &ObjectWriter {
    &self.default_writer
  }

  pub fn metadata(&self) -> &Arc<SerializationMetadata> {
    &self.metadata
  }

  /// Every entity type can be written.
  pub fn is_writeable(&self, _generic_type: &GenericType, _media_type: Option<&MediaType>) -> bool {
    true
  }

  pub fn cached_method_writer(&self, method_id: &str) -> Option<ObjectWriter> {
    self.per_method_writer.get(method_id).map(|entry| entry.value().clone())
  }

  pub fn cached_type_writer(&self, type_name: &str) -> Option<ObjectWriter> {
    self.per_type_writer.get(type_name).map(|entry| entry.value().clone())
  }

  pub fn cached_mapper_writer(&self, mapper_id: MapperId) -> Option<ObjectWriter> {
    self.context_resolver_writers.get(&mapper_id).map(|entry| entry.value().clone())
  }

  /// Writes `value` to the response stream of `context` and closes the stream.
  ///
  /// Text entities are written verbatim instead of as JSON strings. When writing fails the error
  /// is returned and the stream is left open, so that the host maps the error to a response
  /// before the stream is finalized.
  pub fn write_response<T, C>(&self, value: &T, generic_type: &GenericType, context: &mut C) -> Result<(), JsonWriterError>
  where
    T: Serialize + Any,
    C: ServerRequestContext + ?Sized, {
    if let Some(text) = raw_text(value) {
      tracing::trace!("Writing text entity verbatim: type = {}", std::any::type_name::<T>());
      let stream = context.get_or_create_output_stream();
      stream.write_all(text.as_bytes())?;
      stream.close()?;
      return Ok(());
    }
    let writer = self.resolve_writer(value, generic_type, &*context)?;
    let stream = context.get_or_create_output_stream();
    writer.write_value(&mut *stream, value)?;
    stream.close()?;
    Ok(())
  }

  /// The writer [`JsonMessageBodyWriter::write_response`] uses for `value` in `context`.
  pub fn resolve_writer<T, C>(&self, _value: &T, generic_type: &GenericType, context: &C) -> Result<ObjectWriter, JsonWriterError>
  where
    T: Any,
    C: ServerRequestContext + ?Sized, {
    let mapper = self.resolve_mapper(&RuntimeType::of::<T>(), context.response_media_type());
    let mut writer = self.effective_writer(&mapper);
    if let Some(resource_info) = context.resource_info() {
      if let Some(writer_from_metadata) = self.find_override_writer(resource_info, generic_type, &mapper)? {
        writer = writer_from_metadata;
      }
      writer = self.apply_json_view(writer, resource_info);
    }
    Ok(writer)
  }

  fn effective_writer(&self, mapper: &Arc<JsonMapper>) -> ObjectWriter {
    if mapper.id() == self.original_mapper.id() {
      return self.default_writer.clone();
    }
    let (writer, loaded) = self
      .context_resolver_writers
      .load_or_store_with(mapper.id(), || create_default_writer(mapper));
    if !loaded {
      tracing::debug!("Cached writer for negotiated mapper: mapper_id = {}", mapper.id());
    }
    writer
  }

  /// Method view first, class view second. Applies to whichever writer was chosen, negotiated or
  /// built by a strategy, since view membership is kept in the metadata rather than the mapper.
  fn apply_json_view(&self, writer: ObjectWriter, resource_info: &ResourceInfo) -> ObjectWriter {
    let view = self
      .metadata
      .json_view_for_method(resource_info.method_id())
      .or_else(|| self.metadata.json_view_for_class(resource_info.resource_class()));
    match view {
      Some(view) => {
        tracing::trace!("Narrowing writer to view {}: method_id = {}", view, resource_info.method_id());
        writer.with_view(view.clone(), self.metadata.views())
      }
      None => writer,
    }
  }
}

impl Debug for JsonMessageBodyWriter {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("JsonMessageBodyWriter")
      .field("original_mapper", &self.original_mapper.id())
      .field("per_method_writer", &self.per_method_writer.len())
      .field("per_type_writer", &self.per_type_writer.len())
      .field("context_resolver_writers", &self.context_resolver_writers.len())
      .finish()
  }
}

static_assertions::assert_impl_all!(JsonMessageBodyWriter: Send, Sync);

/// Text entities are already the intended body; encoding them would add quotes.
pub(crate) fn raw_text<T: Any>(value: &T) -> Option<&str> {
  let value = value as &dyn Any;
  if let Some(text) = value.downcast_ref::<String>() {
    return Some(text.as_str());
  }
  if let Some(text) = value.downcast_ref::<&'static str>() {
    return Some(*text);
  }
  if let Some(text) = value.downcast_ref::<Box<str>>() {
    return Some(&**text);
  }
  if let Some(text) = value.downcast_ref::<Arc<str>>() {
    return Some(&**text);
  }
  value.downcast_ref::<Cow<'static, str>>().map(|text| &**text)
}
