use std::sync::Arc;

use crate::error::{DeserializationError, SerializationError};
use crate::protocol::{BondDataType, ProtocolReader, ProtocolType, ProtocolWriter};
use crate::schema::RuntimeSchema;
use crate::serialization::{BondStruct, DeserializeContext, Deserializer, Transcoder};

/// A cursor positioned at an encoded struct, plus the schema describing it.
///
/// The cursor is never advanced: every decode or transcode works on a fresh clone, so
/// a source can be shared between threads and read any number of times.
#[derive(Debug, Clone)]
pub struct BondedSource {
  reader: Arc<dyn ProtocolReader>,
  schema: RuntimeSchema,
  context: DeserializeContext,
}

impl BondedSource {
  pub fn new(reader: Box<dyn ProtocolReader>, schema: RuntimeSchema, context: DeserializeContext) -> Self {
    Self {
      reader: Arc::from(reader),
      schema,
      context,
    }
  }

  /// Captures the struct at the reader's position and moves the reader past it.
  pub fn capture(reader: &mut dyn ProtocolReader, ctx: &DeserializeContext) -> Result<Self, DeserializationError> {
    let cursor = reader.box_clone();
    reader.skip(BondDataType::Struct)?;
    let schema = ctx.field_schema().clone();
    tracing::trace!(
      protocol = %cursor.protocol(),
      schema = schema.struct_def().map(|def| def.qualified_name.as_str()),
      "captured bonded struct"
    );
    Ok(Self {
      reader: Arc::from(cursor),
      schema,
      context: ctx.for_field(RuntimeSchema::empty()),
    })
  }

  pub fn schema(&self) -> &RuntimeSchema {
    &self.schema
  }

  pub fn protocol(&self) -> ProtocolType {
    self.reader.protocol()
  }

  pub fn context(&self) -> &DeserializeContext {
    &self.context
  }

  /// Independent cursor at the start of the captured struct.
  pub fn cursor(&self) -> Box<dyn ProtocolReader> {
    self.reader.box_clone()
  }

  pub fn deserialize<U: BondStruct + Default>(&self) -> Result<U, DeserializationError> {
    let mut cursor = self.cursor();
    Deserializer::<U>::new(self.schema.clone(), self.context.clone()).deserialize(cursor.as_mut())
  }

  /// Re-emits the captured struct to `writer` without materializing it.
  pub fn transcode(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    let mut cursor = self.cursor();
    Transcoder::new(self.schema.clone(), self.context.clone()).transcode(cursor.as_mut(), writer)
  }
}
