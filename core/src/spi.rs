//! Collaborators supplied by the host server.

use crate::generic_type::RuntimeType;
use crate::mapper::JsonMapper;
use crate::media_type::MediaType;
use crate::view::JsonView;
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::Arc;

/// Multi-valued HTTP response headers.
pub type HttpHeaders = HashMap<String, Vec<String>>;

/// Response body stream. Closing finalizes the response; after a failed write the stream is left
/// open so the host's error mapping can still take over.
pub trait ResponseOutput: Write {
  fn close(&mut self) -> io::Result<()>;
}

impl ResponseOutput for Vec<u8> {
  fn close(&mut self) -> io::Result<()> {
    Ok(())
  }
}

impl<O: ResponseOutput + ?Sized> ResponseOutput for &mut O {
  fn close(&mut self) -> io::Result<()> {
    (**self).close()
  }
}

/// The resource method handling the current request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceInfo {
  method_id: String,
  resource_class: String,
}

impl ResourceInfo {
  pub fn new(method_id: impl Into<String>, resource_class: impl Into<String>) -> Self {
    Self {
      method_id: method_id.into(),
      resource_class: resource_class.into(),
    }
  }

  pub fn method_id(&self) -> &str {
    &self.method_id
  }

  pub fn resource_class(&self) -> &str {
    &self.resource_class
  }
}

pub trait ServerRequestContext {
  fn get_or_create_output_stream(&mut self) -> &mut dyn ResponseOutput;

  fn response_media_type(&self) -> Option<&MediaType>;

  /// `None` outside of resource method dispatch, e.g. for responses built by filters.
  fn resource_info(&self) -> Option<&ResourceInfo>;
}

/// Supplies a mapper for values of a given type, overriding the default one.
pub trait MapperContextResolver: Send + Sync {
  fn get_context(&self, runtime_type: &RuntimeType) -> Option<Arc<JsonMapper>>;
}

impl<F> MapperContextResolver for F
where
  F: Fn(&RuntimeType) -> Option<Arc<JsonMapper>> + Send + Sync,
{
  fn get_context(&self, runtime_type: &RuntimeType) -> Option<Arc<JsonMapper>> {
    self(runtime_type)
  }
}

/// Provider lookup of the host's content negotiation.
pub trait Providers: Send + Sync {
  /// Resolver registered for `media_type`; `None` asks for a resolver without media type scope.
  fn get_context_resolver(&self, media_type: Option<&MediaType>) -> Option<Arc<dyn MapperContextResolver>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoProviders;

impl Providers for NoProviders {
  fn get_context_resolver(&self, _: Option<&MediaType>) -> Option<Arc<dyn MapperContextResolver>> {
    None
  }
}

/// Annotations of the resource method, as seen by the legacy write path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
  JsonView(Vec<JsonView>),
  Other(String),
}

impl Annotation {
  pub fn json_view(views: impl IntoIterator<Item = JsonView>) -> Self {
    Annotation::JsonView(views.into_iter().collect())
  }

  pub fn is_json_view(&self) -> bool {
    matches!(self, Annotation::JsonView(_))
  }

  /// First view of a `JsonView` annotation.
  pub fn first_view(&self) -> Option<&JsonView> {
    match self {
      Annotation::JsonView(views) => views.first(),
      Annotation::Other(_) => None,
    }
  }
}
