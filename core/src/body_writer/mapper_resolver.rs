use crate::body_writer::JsonMessageBodyWriter;
use crate::generic_type::RuntimeType;
use crate::mapper::JsonMapper;
use crate::media_type::MediaType;
use std::sync::Arc;

impl JsonMessageBodyWriter {
  /// Mapper for a value of `runtime_type` answered with `media_type`.
  ///
  /// A resolver scoped to the media type is preferred over an unscoped one. Only the first
  /// resolver found is asked; when it has no mapper for the type the original mapper is used.
  pub fn resolve_mapper(&self, runtime_type: &RuntimeType, media_type: Option<&MediaType>) -> Arc<JsonMapper> {
    // TODO: check the unscoped fallback against the host's provider ranking once it exposes one
    let context_resolver = match media_type {
      Some(media_type) => self
        .providers
        .get_context_resolver(Some(media_type))
        .or_else(|| self.providers.get_context_resolver(None)),
      None => self.providers.get_context_resolver(None),
    };
    match context_resolver.and_then(|resolver| resolver.get_context(runtime_type)) {
      Some(mapper) => {
        tracing::trace!(
          "Using negotiated mapper: runtime_type = {}, mapper_id = {}",
          runtime_type,
          mapper.id()
        );
        mapper
      }
      None => self.original_mapper.clone(),
    }
  }
}
