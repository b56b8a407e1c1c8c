use std::marker::PhantomData;

use crate::error::DeserializationError;
use crate::protocol::TokenWriter;
use crate::schema::RuntimeSchema;
use crate::serialization::{write_struct, BondStruct, DeserializeContext, Deserializer};

/// Copies a struct into a value of another, hierarchy-related type without going
/// through bytes.
///
/// The source is recorded as a token stream and replayed into `T` with the source's
/// concrete schema as payload schema, so fields `T` does not declare are dropped and
/// levels the source lacks keep their defaults.
#[derive(Debug, Clone)]
pub struct Cloner<T> {
  context: DeserializeContext,
  _marker: PhantomData<fn() -> T>,
}

impl<T: BondStruct + Default> Cloner<T> {
  pub fn new(context: DeserializeContext) -> Self {
    Self {
      context,
      _marker: PhantomData,
    }
  }

  pub fn copy_from(&self, source: &dyn BondStruct) -> Result<T, DeserializationError> {
    let mut tokens = TokenWriter::new();
    write_struct(source, &mut tokens)
      .map_err(|err| DeserializationError::custom(format!("recording source failed: {err}")))?;
    let mut reader = tokens
      .into_reader()
      .map_err(|err| DeserializationError::custom(err.to_string()))?;
    let schema = RuntimeSchema::from(source.level_def());
    Deserializer::<T>::new(schema, self.context.clone()).deserialize(&mut reader)
  }
}
