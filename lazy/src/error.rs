use bondbox_core_rs::error::{DeserializationError, SerializationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BondedError {
  /// The stored value or payload does not fit the requested view.
  #[error("cannot decode boxed value as {view}: {source}")]
  TypeMismatch {
    view: String,
    #[source]
    source: DeserializationError,
  },
  #[error("failed to serialize boxed value: {0}")]
  Serialization(#[from] SerializationError),
  /// The stored instance has no hierarchy relationship with the requested view.
  #[error("no conversion from {from} to {to}")]
  UnsupportedConversion { from: String, to: String },
}

static_assertions::assert_impl_all!(BondedError: Send, Sync);
