//! Error types used across the engine.

use crate::protocol::BondDataType;
use thiserror::Error;

/// Error returned when encoded data cannot be turned back into a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeserializationError {
  #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
  UnexpectedEof { needed: usize, remaining: usize },
  #[error("unknown data type tag: {0}")]
  UnknownDataType(u8),
  #[error("malformed payload: {0}")]
  Malformed(String),
  #[error("string payload is not valid UTF-8/UTF-16")]
  InvalidUtf8,
  #[error("type mismatch on {struct_name}.{field}: expected {expected}, found {actual}")]
  TypeMismatch {
    struct_name: String,
    field: String,
    expected: BondDataType,
    actual: BondDataType,
  },
  #[error("required field {struct_name}.{field} is missing")]
  MissingRequiredField { struct_name: String, field: String },
  #[error("payload field {id} of {struct_name} does not match its schema: expected {expected}, found {actual}")]
  SchemaMismatch {
    struct_name: String,
    id: u16,
    expected: BondDataType,
    actual: BondDataType,
  },
  #[error("nesting depth limit {0} exceeded")]
  DepthLimitExceeded(usize),
  #[error("length {len} exceeds limit {max}")]
  LengthLimitExceeded { len: usize, max: usize },
  #[error("unsupported protocol: magic {magic:#06x}, version {version}")]
  UnsupportedProtocol { magic: u16, version: u16 },
  #[error("{0}")]
  Custom(String),
}

impl DeserializationError {
  pub fn malformed(message: impl Into<String>) -> Self {
    DeserializationError::Malformed(message.into())
  }

  pub fn custom(message: impl Into<String>) -> Self {
    DeserializationError::Custom(message.into())
  }

  /// Type mismatch reported by a field reader that has no struct context.
  pub fn unexpected_type(expected: BondDataType, actual: BondDataType) -> Self {
    DeserializationError::TypeMismatch {
      struct_name: String::new(),
      field: String::new(),
      expected,
      actual,
    }
  }
}

/// Error returned when a value cannot be written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
  #[error("length {0} does not fit the wire format")]
  LengthOverflow(usize),
  #[error("struct end without a matching struct begin")]
  UnbalancedStruct,
  #[error("writer rejected field {id}: {reason}")]
  FieldRejected { id: u16, reason: String },
  #[error("field {id} of {struct_name} does not match its schema: expected {expected}, found {actual}")]
  SchemaMismatch {
    struct_name: String,
    id: u16,
    expected: BondDataType,
    actual: BondDataType,
  },
  #[error("nesting depth limit {0} exceeded")]
  DepthLimitExceeded(usize),
  #[error("transcoding failed: {0}")]
  Transcode(#[from] DeserializationError),
  #[error("{0}")]
  Custom(String),
}

impl SerializationError {
  pub fn custom(message: impl Into<String>) -> Self {
    SerializationError::Custom(message.into())
  }
}

/// Errors that can occur while modifying a factory registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
  #[error("a constructor for {0} is already registered")]
  DuplicateEntry(String),
}

static_assertions::assert_impl_all!(DeserializationError: Send, Sync);
static_assertions::assert_impl_all!(SerializationError: Send, Sync);
static_assertions::assert_impl_all!(RegistryError: Send, Sync);
