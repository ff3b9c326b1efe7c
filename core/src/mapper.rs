mod config;
mod config_option;

pub use {self::config::*, self::config_option::*};

use crate::writer::ObjectWriter;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_MAPPER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`JsonMapper`] instance. Two mappers with equal settings still have different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapperId(u64);

impl MapperId {
  fn next() -> Self {
    MapperId(NEXT_MAPPER_ID.fetch_add(1, Ordering::Relaxed))
  }

  pub fn value(&self) -> u64 {
    self.0
  }
}

impl Display for MapperId {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "mapper-{}", self.0)
  }
}

/// Serialization engine configuration. Immutable once built and shared as `Arc<JsonMapper>`.
#[derive(Debug)]
pub struct JsonMapper {
  id: MapperId,
  config: MapperConfig,
}

impl JsonMapper {
  pub fn new() -> Self {
    Self::with_config(MapperConfig::default())
  }

  pub fn from_options(options: impl IntoIterator<Item = MapperOption>) -> Self {
    Self::with_config(MapperConfig::from(options))
  }

  pub fn with_config(config: MapperConfig) -> Self {
    let mapper = Self {
      id: MapperId::next(),
      config,
    };
    tracing::debug!("Created json mapper: id = {}, config = {:?}", mapper.id, mapper.config);
    mapper
  }

  pub fn id(&self) -> MapperId {
    self.id
  }

  pub fn config(&self) -> &MapperConfig {
    &self.config
  }

  /// A writer carrying this mapper's settings, including its stream settings.
  pub fn writer(self: &Arc<Self>) -> ObjectWriter {
    ObjectWriter::new(self.clone())
  }
}

impl Default for JsonMapper {
  fn default() -> Self {
    Self::new()
  }
}
