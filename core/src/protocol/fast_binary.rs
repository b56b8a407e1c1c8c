//! Fast Binary protocol.
//!
//! ```text
//! struct   [field]* StopBase ... [field]* Stop
//! field    type:u8 id:u16le value
//! integer  fixed width, little endian
//! string   varint byte count, UTF-8 bytes
//! wstring  varint code unit count, UTF-16LE code units
//! list/set element type:u8, varint count, items
//! map      key type:u8, value type:u8, varint count, (key value)*
//! ```

use crate::error::{DeserializationError, SerializationError};
use crate::protocol::reader::{check_string_len, skip_value};
use crate::protocol::writer::wire_count;
use crate::protocol::{
  BondDataType, ContainerHeader, FieldHeader, InputBuffer, MapHeader, OutputBuffer, ProtocolReader, ProtocolType,
  ProtocolWriter,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastBinaryReader {
  input: InputBuffer,
}

impl FastBinaryReader {
  pub fn new(input: impl Into<InputBuffer>) -> Self {
    Self { input: input.into() }
  }

  pub fn input(&self) -> &InputBuffer {
    &self.input
  }

  fn read_type(&mut self) -> Result<BondDataType, DeserializationError> {
    BondDataType::from_tag(self.input.read_u8()?)
  }
}

impl ProtocolReader for FastBinaryReader {
  fn protocol(&self) -> ProtocolType {
    ProtocolType::FastBinary
  }

  fn box_clone(&self) -> Box<dyn ProtocolReader> {
    Box::new(self.clone())
  }

  fn read_struct_begin(&mut self) -> Result<(), DeserializationError> {
    Ok(())
  }

  fn read_field_begin(&mut self) -> Result<FieldHeader, DeserializationError> {
    let data_type = self.read_type()?;
    if data_type.is_stop() {
      return Ok(FieldHeader::new(data_type, 0));
    }
    let id = u16::from_le_bytes(self.input.read_array()?);
    Ok(FieldHeader::new(data_type, id))
  }

  fn read_container_begin(&mut self) -> Result<ContainerHeader, DeserializationError> {
    let element_type = self.read_type()?;
    let count = self.input.read_varint_u32()?;
    Ok(ContainerHeader { element_type, count })
  }

  fn read_map_begin(&mut self) -> Result<MapHeader, DeserializationError> {
    let key_type = self.read_type()?;
    let value_type = self.read_type()?;
    let count = self.input.read_varint_u32()?;
    Ok(MapHeader {
      key_type,
      value_type,
      count,
    })
  }

  fn read_bool(&mut self) -> Result<bool, DeserializationError> {
    Ok(self.input.read_u8()? != 0)
  }

  fn read_u8(&mut self) -> Result<u8, DeserializationError> {
    self.input.read_u8()
  }

  fn read_u16(&mut self) -> Result<u16, DeserializationError> {
    Ok(u16::from_le_bytes(self.input.read_array()?))
  }

  fn read_u32(&mut self) -> Result<u32, DeserializationError> {
    Ok(u32::from_le_bytes(self.input.read_array()?))
  }

  fn read_u64(&mut self) -> Result<u64, DeserializationError> {
    Ok(u64::from_le_bytes(self.input.read_array()?))
  }

  fn read_i8(&mut self) -> Result<i8, DeserializationError> {
    Ok(self.input.read_u8()? as i8)
  }

  fn read_i16(&mut self) -> Result<i16, DeserializationError> {
    Ok(i16::from_le_bytes(self.input.read_array()?))
  }

  fn read_i32(&mut self) -> Result<i32, DeserializationError> {
    Ok(i32::from_le_bytes(self.input.read_array()?))
  }

  fn read_i64(&mut self) -> Result<i64, DeserializationError> {
    Ok(i64::from_le_bytes(self.input.read_array()?))
  }

  fn read_f32(&mut self) -> Result<f32, DeserializationError> {
    Ok(f32::from_le_bytes(self.input.read_array()?))
  }

  fn read_f64(&mut self) -> Result<f64, DeserializationError> {
    Ok(f64::from_le_bytes(self.input.read_array()?))
  }

  fn read_string(&mut self) -> Result<String, DeserializationError> {
    self.read_string_bounded(usize::MAX)
  }

  fn read_wstring(&mut self) -> Result<String, DeserializationError> {
    self.read_wstring_bounded(usize::MAX)
  }

  fn read_string_bounded(&mut self, max_len: usize) -> Result<String, DeserializationError> {
    let len = self.input.read_varint_u32()? as usize;
    check_string_len(len, max_len)?;
    self.input.read_utf8(len)
  }

  fn read_wstring_bounded(&mut self, max_len: usize) -> Result<String, DeserializationError> {
    let units = self.input.read_varint_u32()? as usize;
    check_string_len(units, max_len)?;
    self.input.read_utf16(units)
  }

  fn skip(&mut self, data_type: BondDataType) -> Result<(), DeserializationError> {
    match data_type {
      BondDataType::Bool | BondDataType::UInt8 | BondDataType::Int8 => self.input.skip(1),
      BondDataType::UInt16 | BondDataType::Int16 => self.input.skip(2),
      BondDataType::UInt32 | BondDataType::Int32 | BondDataType::Float => self.input.skip(4),
      BondDataType::UInt64 | BondDataType::Int64 | BondDataType::Double => self.input.skip(8),
      BondDataType::String => {
        let len = self.input.read_varint_u32()? as usize;
        self.input.skip(len)
      }
      BondDataType::WString => {
        let units = self.input.read_varint_u32()? as usize;
        self.input.skip(units.saturating_mul(2))
      }
      other => skip_value(self, other, 0),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct FastBinaryWriter {
  output: OutputBuffer,
}

impl FastBinaryWriter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn output(&self) -> &OutputBuffer {
    &self.output
  }

  pub fn into_bytes(self) -> Vec<u8> {
    self.output.into_vec()
  }
}

impl ProtocolWriter for FastBinaryWriter {
  fn protocol(&self) -> ProtocolType {
    ProtocolType::FastBinary
  }

  fn write_struct_begin(&mut self) -> Result<(), SerializationError> {
    Ok(())
  }

  fn write_base_end(&mut self) -> Result<(), SerializationError> {
    self.output.write_u8(BondDataType::StopBase.tag());
    Ok(())
  }

  fn write_struct_end(&mut self) -> Result<(), SerializationError> {
    self.output.write_u8(BondDataType::Stop.tag());
    Ok(())
  }

  fn write_field_begin(&mut self, data_type: BondDataType, id: u16) -> Result<(), SerializationError> {
    self.output.write_u8(data_type.tag());
    self.output.write_bytes(&id.to_le_bytes());
    Ok(())
  }

  fn write_container_begin(&mut self, count: u32, element_type: BondDataType) -> Result<(), SerializationError> {
    self.output.write_u8(element_type.tag());
    self.output.write_varint(u64::from(count));
    Ok(())
  }

  fn write_map_begin(
    &mut self,
    count: u32,
    key_type: BondDataType,
    value_type: BondDataType,
  ) -> Result<(), SerializationError> {
    self.output.write_u8(key_type.tag());
    self.output.write_u8(value_type.tag());
    self.output.write_varint(u64::from(count));
    Ok(())
  }

  fn write_bool(&mut self, value: bool) -> Result<(), SerializationError> {
    self.output.write_u8(u8::from(value));
    Ok(())
  }

  fn write_u8(&mut self, value: u8) -> Result<(), SerializationError> {
    self.output.write_u8(value);
    Ok(())
  }

  fn write_u16(&mut self, value: u16) -> Result<(), SerializationError> {
    self.output.write_bytes(&value.to_le_bytes());
    Ok(())
  }

  fn write_u32(&mut self, value: u32) -> Result<(), SerializationError> {
    self.output.write_bytes(&value.to_le_bytes());
    Ok(())
  }

  fn write_u64(&mut self, value: u64) -> Result<(), SerializationError> {
    self.output.write_bytes(&value.to_le_bytes());
    Ok(())
  }

  fn write_i8(&mut self, value: i8) -> Result<(), SerializationError> {
    self.output.write_u8(value as u8);
    Ok(())
  }

  fn write_i16(&mut self, value: i16) -> Result<(), SerializationError> {
    self.output.write_bytes(&value.to_le_bytes());
    Ok(())
  }

  fn write_i32(&mut self, value: i32) -> Result<(), SerializationError> {
    self.output.write_bytes(&value.to_le_bytes());
    Ok(())
  }

  fn write_i64(&mut self, value: i64) -> Result<(), SerializationError> {
    self.output.write_bytes(&value.to_le_bytes());
    Ok(())
  }

  fn write_f32(&mut self, value: f32) -> Result<(), SerializationError> {
    self.output.write_bytes(&value.to_le_bytes());
    Ok(())
  }

  fn write_f64(&mut self, value: f64) -> Result<(), SerializationError> {
    self.output.write_bytes(&value.to_le_bytes());
    Ok(())
  }

  fn write_string(&mut self, value: &str) -> Result<(), SerializationError> {
    let len = wire_count(value.len())?;
    self.output.write_varint(u64::from(len));
    self.output.write_bytes(value.as_bytes());
    Ok(())
  }

  fn write_wstring(&mut self, value: &str) -> Result<(), SerializationError> {
    let units = wire_count(value.encode_utf16().count())?;
    self.output.write_varint(u64::from(units));
    self.output.write_utf16(value);
    Ok(())
  }
}
