use crate::mapper::JsonMapper;
use crate::media_type::MediaType;
use crate::spi::{MapperContextResolver, Providers, ResourceInfo, ResponseOutput, ServerRequestContext};
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Debug, Default)]
pub(crate) struct RecordingOutput {
  body: Vec<u8>,
  flushes: usize,
  closed: bool,
  fail_writes: bool,
}

impl RecordingOutput {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn failing() -> Self {
    Self {
      fail_writes: true,
      ..Self::default()
    }
  }

  pub(crate) fn body(&self) -> &[u8] {
    &self.body
  }

  pub(crate) fn body_str(&self) -> &str {
    std::str::from_utf8(&self.body).unwrap()
  }

  pub(crate) fn flushes(&self) -> usize {
    self.flushes
  }

  pub(crate) fn is_closed(&self) -> bool {
    self.closed
  }
}

impl Write for RecordingOutput {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    if self.closed {
      return Err(io::Error::new(io::ErrorKind::Other, "stream already closed"));
    }
    if self.fail_writes {
      return Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset by peer"));
    }
    self.body.extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    self.flushes += 1;
    Ok(())
  }
}

impl ResponseOutput for RecordingOutput {
  fn close(&mut self) -> io::Result<()> {
    self.closed = true;
    Ok(())
  }
}

#[derive(Debug, Default)]
pub(crate) struct TestRequestContext {
  output: RecordingOutput,
  media_type: Option<MediaType>,
  resource_info: Option<ResourceInfo>,
}

impl TestRequestContext {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn for_resource(method_id: &str, resource_class: &str) -> Self {
    Self {
      resource_info: Some(ResourceInfo::new(method_id, resource_class)),
      ..Self::default()
    }
  }

  pub(crate) fn with_media_type(mut self, media_type: MediaType) -> Self {
    self.media_type = Some(media_type);
    self
  }

  pub(crate) fn with_output(mut self, output: RecordingOutput) -> Self {
    self.output = output;
    self
  }

  pub(crate) fn output(&self) -> &RecordingOutput {
    &self.output
  }
}

impl ServerRequestContext for TestRequestContext {
  fn get_or_create_output_stream(&mut self) -> &mut dyn ResponseOutput {
    &mut self.output
  }

  fn response_media_type(&self) -> Option<&MediaType> {
    self.media_type.as_ref()
  }

  fn resource_info(&self) -> Option<&ResourceInfo> {
    self.resource_info.as_ref()
  }
}

/// Resolvers keyed by media type essence; the `None` key holds the unscoped resolver.
#[derive(Default)]
pub(crate) struct StaticProviders {
  resolvers: HashMap<Option<String>, Arc<dyn MapperContextResolver>>,
}

impl StaticProviders {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn with_resolver(mut self, media_type: Option<&str>, resolver: impl MapperContextResolver + 'static) -> Self {
    self.resolvers.insert(media_type.map(str::to_string), Arc::new(resolver));
    self
  }

  /// Resolver returning `mapper` for values of type `T` only.
  pub(crate) fn for_type<T: 'static>(mapper: Arc<JsonMapper>) -> impl MapperContextResolver {
    move |runtime_type: &crate::generic_type::RuntimeType| runtime_type.is::<T>().then(|| mapper.clone())
  }
}

impl Providers for StaticProviders {
  fn get_context_resolver(&self, media_type: Option<&MediaType>) -> Option<Arc<dyn MapperContextResolver>> {
    self.resolvers.get(&media_type.map(MediaType::essence)).cloned()
  }
}
