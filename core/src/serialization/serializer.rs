use crate::error::SerializationError;
use crate::protocol::{BondDataType, ProtocolWriter};
use crate::serialization::BondStruct;

/// Writes structs to any [`ProtocolWriter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Serializer;

impl Serializer {
  pub const fn new() -> Self {
    Serializer
  }

  /// Writes the full hierarchy of the value's concrete type.
  pub fn serialize(&self, value: &dyn BondStruct, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    write_struct(value, writer)
  }
}

pub fn write_struct(value: &dyn BondStruct, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
  writer.write_struct_begin()?;
  write_levels(value, writer)?;
  writer.write_struct_end()
}

fn write_levels(value: &dyn BondStruct, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
  if let Some(base) = value.base() {
    write_levels(base, writer)?;
    writer.write_base_end()?;
  }
  value.write_fields(writer)
}

/// Writes a nested struct as field `id`.
pub fn write_struct_field(
  writer: &mut dyn ProtocolWriter,
  id: u16,
  value: &dyn BondStruct,
) -> Result<(), SerializationError> {
  writer.write_field_begin(BondDataType::Struct, id)?;
  write_struct(value, writer)?;
  writer.write_field_end()
}
