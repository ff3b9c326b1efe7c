use crate::body_writer::JsonMessageBodyWriter;
use crate::error::JsonWriterError;
use crate::generic_type::GenericType;
use crate::mapper::JsonMapper;
use crate::spi::ResourceInfo;
use crate::strategy::StrategyId;
use crate::writer::{set_necessary_stream_config, ObjectWriter};
use nexus_rest_utils_rs::collections::DashMapExtension;
use std::sync::Arc;

impl JsonMessageBodyWriter {
  /// Writer built by the custom serialization strategy of the resource method, or failing that of
  /// the resource class. `Ok(None)` when neither declares one.
  ///
  /// Method writers are cached by method id. Class writers are cached by the name of the
  /// effective entity type, so every method of the class returning `Page<User>` or `User` shares
  /// one writer.
  pub fn find_override_writer(
    &self,
    resource_info: &ResourceInfo,
    generic_type: &GenericType,
    mapper: &Arc<JsonMapper>,
  ) -> Result<Option<ObjectWriter>, JsonWriterError> {
    let method_id = resource_info.method_id();
    if let Some(strategy_id) = self.metadata.custom_serialization_for_method(method_id) {
      let (writer, loaded) = self
        .per_method_writer
        .load_or_try_store_with(method_id.to_string(), || {
          self.build_strategy_writer(strategy_id, generic_type, mapper)
        })?;
      if !loaded {
        tracing::debug!(
          "Cached writer for method: method_id = {}, strategy_id = {}",
          method_id,
          strategy_id
        );
      }
      return Ok(Some(writer));
    }

    if let Some(strategy_id) = self
      .metadata
      .custom_serialization_for_class(resource_info.resource_class())
    {
      let type_name = generic_type.effective_type().type_name();
      let (writer, loaded) = self
        .per_type_writer
        .load_or_try_store_with(type_name.clone(), || {
          self.build_strategy_writer(strategy_id, generic_type, mapper)
        })?;
      if !loaded {
        tracing::debug!(
          "Cached writer for type: type_name = {}, resource_class = {}, strategy_id = {}",
          type_name,
          resource_info.resource_class(),
          strategy_id
        );
      }
      return Ok(Some(writer));
    }

    Ok(None)
  }

  fn build_strategy_writer(
    &self,
    strategy_id: &StrategyId,
    generic_type: &GenericType,
    mapper: &Arc<JsonMapper>,
  ) -> Result<ObjectWriter, JsonWriterError> {
    let strategy = self.metadata.strategies().instantiate(strategy_id).map_err(|err| {
      tracing::warn!("Failed to instantiate writer strategy: strategy_id = {}, error = {}", strategy_id, err);
      err
    })?;
    let writer = strategy
      .create_writer(mapper, generic_type)
      .map_err(|cause| {
        tracing::warn!("Writer strategy failed: strategy_id = {}, error = {}", strategy_id, cause);
        JsonWriterError::StrategyInstantiation {
          strategy: strategy_id.clone(),
          cause,
        }
      })?;
    Ok(set_necessary_stream_config(writer))
  }
}
