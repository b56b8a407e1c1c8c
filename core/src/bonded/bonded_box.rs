use crate::bonded::BondedSource;
use crate::error::{DeserializationError, SerializationError};
use crate::protocol::{BondDataType, FieldHeader, ProtocolReader, ProtocolWriter};
use crate::serialization::{BondStruct, DeserializeContext};

/// Capabilities a box type needs so the engine can produce and re-emit it in place of
/// its own [`Bonded`](crate::bonded::Bonded).
pub trait BondedBox: Send + Sync + Sized + 'static {
  type Error: std::error::Error + Send + Sync + 'static;
  type Retyped<U: BondStruct + Default>: BondedBox;

  fn from_source(source: BondedSource) -> Self;

  fn from_instance<A: BondStruct>(instance: A) -> Self;

  fn decode<U: BondStruct + Default>(&self) -> Result<U, Self::Error>;

  fn convert<U: BondStruct + Default>(&self) -> Self::Retyped<U>;

  fn serialize(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError>;
}

/// Writes a box as struct field `id`.
pub fn write_bonded_field<B: BondedBox>(
  writer: &mut dyn ProtocolWriter,
  id: u16,
  value: &B,
) -> Result<(), SerializationError> {
  writer.write_field_begin(BondDataType::Struct, id)?;
  value.serialize(writer)?;
  writer.write_field_end()
}

/// Reads a bonded struct field, building `B` through the context's factory registry when
/// a constructor is registered for it and through [`BondedBox::from_source`] otherwise.
pub fn read_bonded_field<B: BondedBox>(
  reader: &mut dyn ProtocolReader,
  header: FieldHeader,
  ctx: &DeserializeContext,
) -> Result<B, DeserializationError> {
  if header.data_type != BondDataType::Struct {
    return Err(DeserializationError::unexpected_type(BondDataType::Struct, header.data_type));
  }
  let source = BondedSource::capture(reader, ctx)?;
  match ctx.factories().construct::<B>(&source) {
    Some(value) => Ok(value),
    None => Ok(B::from_source(source)),
  }
}
