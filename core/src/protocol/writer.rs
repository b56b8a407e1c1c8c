use crate::error::SerializationError;
use crate::protocol::{BondDataType, ProtocolType};

/// Sink for a tagged encoded stream.
///
/// A struct hierarchy is written as `write_struct_begin`, the fields of the root base,
/// `write_base_end`, ..., the fields of the most derived level, `write_struct_end`.
pub trait ProtocolWriter: Send {
  fn protocol(&self) -> ProtocolType;

  fn write_struct_begin(&mut self) -> Result<(), SerializationError>;

  /// Ends a base level (`StopBase`).
  fn write_base_end(&mut self) -> Result<(), SerializationError>;

  /// Ends the struct (`Stop`).
  fn write_struct_end(&mut self) -> Result<(), SerializationError>;

  fn write_field_begin(&mut self, data_type: BondDataType, id: u16) -> Result<(), SerializationError>;

  fn write_field_end(&mut self) -> Result<(), SerializationError> {
    Ok(())
  }

  fn write_container_begin(&mut self, count: u32, element_type: BondDataType) -> Result<(), SerializationError>;

  fn write_map_begin(
    &mut self,
    count: u32,
    key_type: BondDataType,
    value_type: BondDataType,
  ) -> Result<(), SerializationError>;

  fn write_container_end(&mut self) -> Result<(), SerializationError> {
    Ok(())
  }

  fn write_bool(&mut self, value: bool) -> Result<(), SerializationError>;
  fn write_u8(&mut self, value: u8) -> Result<(), SerializationError>;
  fn write_u16(&mut self, value: u16) -> Result<(), SerializationError>;
  fn write_u32(&mut self, value: u32) -> Result<(), SerializationError>;
  fn write_u64(&mut self, value: u64) -> Result<(), SerializationError>;
  fn write_i8(&mut self, value: i8) -> Result<(), SerializationError>;
  fn write_i16(&mut self, value: i16) -> Result<(), SerializationError>;
  fn write_i32(&mut self, value: i32) -> Result<(), SerializationError>;
  fn write_i64(&mut self, value: i64) -> Result<(), SerializationError>;
  fn write_f32(&mut self, value: f32) -> Result<(), SerializationError>;
  fn write_f64(&mut self, value: f64) -> Result<(), SerializationError>;
  fn write_string(&mut self, value: &str) -> Result<(), SerializationError>;
  fn write_wstring(&mut self, value: &str) -> Result<(), SerializationError>;
}

/// Converts a collection length to the `u32` count carried on the wire.
pub fn wire_count(len: usize) -> Result<u32, SerializationError> {
  u32::try_from(len).map_err(|_| SerializationError::LengthOverflow(len))
}
