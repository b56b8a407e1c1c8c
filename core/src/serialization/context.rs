use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::bonded::BondedFactoryRegistry;
use crate::config::Config;
use crate::error::DeserializationError;
use crate::schema::RuntimeSchema;

static DEFAULT_CONFIG: Lazy<Arc<Config>> = Lazy::new(|| Arc::new(Config::default()));

/// State threaded through a deserialization: limits, the bonded factory hook, the
/// current nesting depth and the payload schema of the field being read.
#[derive(Debug, Clone)]
pub struct DeserializeContext {
  config: Arc<Config>,
  factories: BondedFactoryRegistry,
  depth: usize,
  field_schema: RuntimeSchema,
}

impl Default for DeserializeContext {
  fn default() -> Self {
    Self {
      config: DEFAULT_CONFIG.clone(),
      factories: BondedFactoryRegistry::new(),
      depth: 0,
      field_schema: RuntimeSchema::empty(),
    }
  }
}

impl DeserializeContext {
  pub fn new(config: Config, factories: BondedFactoryRegistry) -> Self {
    Self {
      config: Arc::new(config),
      factories,
      depth: 0,
      field_schema: RuntimeSchema::empty(),
    }
  }

  pub fn with_factories(factories: BondedFactoryRegistry) -> Self {
    Self {
      factories,
      ..Self::default()
    }
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn factories(&self) -> &BondedFactoryRegistry {
    &self.factories
  }

  pub fn depth(&self) -> usize {
    self.depth
  }

  /// Payload schema of the struct-typed field currently being read, if known.
  pub fn field_schema(&self) -> &RuntimeSchema {
    &self.field_schema
  }

  /// Context for one more level of struct nesting.
  pub fn nested(&self) -> Result<Self, DeserializationError> {
    let depth = self.depth + 1;
    if depth > self.config.max_depth {
      return Err(DeserializationError::DepthLimitExceeded(self.config.max_depth));
    }
    Ok(Self {
      depth,
      ..self.clone()
    })
  }

  pub(crate) fn for_field(&self, field_schema: RuntimeSchema) -> Self {
    Self {
      field_schema,
      ..self.clone()
    }
  }

  /// Validates a container element count and returns it as a capacity hint.
  pub fn check_container_len(&self, count: u32) -> Result<usize, DeserializationError> {
    let len = count as usize;
    if len > self.config.max_container_len {
      return Err(DeserializationError::LengthLimitExceeded {
        len,
        max: self.config.max_container_len,
      });
    }
    Ok(len)
  }
}
