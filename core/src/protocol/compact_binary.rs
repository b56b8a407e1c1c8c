//! Compact Binary protocol, versions 1 and 2.
//!
//! ```text
//! field      type bits 0..5, id bits 5..8 when id <= 5
//!            marker 6 + id:u8 when id <= 255
//!            marker 7 + id:u16le otherwise
//! unsigned   varint (u8 is a raw byte)
//! signed     zigzag varint (i8 is a raw byte)
//! list/set   v1: element type, varint count
//!            v2: element type | (count + 1) << 5 when count < 7
//! struct     v2 only: varint byte length of the body before the first field
//! ```

use crate::error::{DeserializationError, SerializationError};
use crate::protocol::reader::{check_string_len, skip_value};
use crate::protocol::writer::wire_count;
use crate::protocol::{
  BondDataType, ContainerHeader, FieldHeader, InputBuffer, MapHeader, OutputBuffer, ProtocolReader, ProtocolType,
  ProtocolWriter, COMPACT_PROTOCOL_VERSION_1, COMPACT_PROTOCOL_VERSION_2,
};

const TYPE_MASK: u8 = 0x1F;
const ID_IN_BYTE_MAX: u16 = 5;
const ID_MARKER_U8: u8 = 6;
const ID_MARKER_U16: u8 = 7;
const PACKED_COUNT_MAX: u32 = 6;

fn zigzag_encode(value: i64) -> u64 {
  ((value << 1) ^ (value >> 63)) as u64
}

fn zigzag_decode(value: u64) -> i64 {
  ((value >> 1) as i64) ^ -((value & 1) as i64)
}

fn check_version(version: u16) -> Result<(), DeserializationError> {
  match version {
    COMPACT_PROTOCOL_VERSION_1 | COMPACT_PROTOCOL_VERSION_2 => Ok(()),
    _ => Err(DeserializationError::UnsupportedProtocol {
      magic: crate::protocol::COMPACT_PROTOCOL_MAGIC,
      version,
    }),
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactBinaryReader {
  input: InputBuffer,
  version: u16,
}

impl CompactBinaryReader {
  /// Creates a version 1 reader.
  pub fn new(input: impl Into<InputBuffer>) -> Self {
    Self {
      input: input.into(),
      version: COMPACT_PROTOCOL_VERSION_1,
    }
  }

  pub fn with_version(input: impl Into<InputBuffer>, version: u16) -> Result<Self, DeserializationError> {
    check_version(version)?;
    Ok(Self {
      input: input.into(),
      version,
    })
  }

  pub fn version(&self) -> u16 {
    self.version
  }

  fn is_v2(&self) -> bool {
    self.version == COMPACT_PROTOCOL_VERSION_2
  }

  fn read_type(&mut self) -> Result<BondDataType, DeserializationError> {
    BondDataType::from_tag(self.input.read_u8()?)
  }

  fn read_signed(&mut self, bits: u32) -> Result<i64, DeserializationError> {
    let value = zigzag_decode(self.input.read_varint_u64()?);
    if bits < 64 {
      let max = (1i64 << (bits - 1)) - 1;
      if value < -max - 1 || value > max {
        return Err(DeserializationError::malformed(format!("zigzag value {value} overflows i{bits}")));
      }
    }
    Ok(value)
  }
}

impl ProtocolReader for CompactBinaryReader {
  fn protocol(&self) -> ProtocolType {
    ProtocolType::CompactBinary { version: self.version }
  }

  fn box_clone(&self) -> Box<dyn ProtocolReader> {
    Box::new(self.clone())
  }

  fn read_struct_begin(&mut self) -> Result<(), DeserializationError> {
    if self.is_v2() {
      let length = self.input.read_varint_u32()? as usize;
      if length > self.input.remaining() {
        return Err(DeserializationError::UnexpectedEof {
          needed: length,
          remaining: self.input.remaining(),
        });
      }
    }
    Ok(())
  }

  fn read_field_begin(&mut self) -> Result<FieldHeader, DeserializationError> {
    let raw = self.input.read_u8()?;
    let data_type = BondDataType::from_tag(raw & TYPE_MASK)?;
    if data_type.is_stop() {
      return Ok(FieldHeader::new(data_type, 0));
    }
    let id = match raw >> 5 {
      ID_MARKER_U8 => u16::from(self.input.read_u8()?),
      ID_MARKER_U16 => u16::from_le_bytes(self.input.read_array()?),
      inline => u16::from(inline),
    };
    Ok(FieldHeader::new(data_type, id))
  }

  fn read_container_begin(&mut self) -> Result<ContainerHeader, DeserializationError> {
    let raw = self.input.read_u8()?;
    let element_type = BondDataType::from_tag(raw & TYPE_MASK)?;
    let packed = u32::from(raw >> 5);
    let count = if self.is_v2() && packed != 0 {
      packed - 1
    } else {
      self.input.read_varint_u32()?
    };
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
    self.input.read_varint_u16()
  }

  fn read_u32(&mut self) -> Result<u32, DeserializationError> {
    self.input.read_varint_u32()
  }

  fn read_u64(&mut self) -> Result<u64, DeserializationError> {
    self.input.read_varint_u64()
  }

  fn read_i8(&mut self) -> Result<i8, DeserializationError> {
    Ok(self.input.read_u8()? as i8)
  }

  fn read_i16(&mut self) -> Result<i16, DeserializationError> {
    self.read_signed(16).map(|v| v as i16)
  }

  fn read_i32(&mut self) -> Result<i32, DeserializationError> {
    self.read_signed(32).map(|v| v as i32)
  }

  fn read_i64(&mut self) -> Result<i64, DeserializationError> {
    self.read_signed(64)
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
      BondDataType::Float => self.input.skip(4),
      BondDataType::Double => self.input.skip(8),
      BondDataType::Struct if self.is_v2() => {
        let length = self.input.read_varint_u32()? as usize;
        self.input.skip(length)
      }
      other => skip_value(self, other, 0),
    }
  }
}

/// Compact Binary writer.
///
/// Version 2 buffers every open struct so its byte length can be prefixed once the
/// struct is closed.
#[derive(Debug, Clone)]
pub struct CompactBinaryWriter {
  output: OutputBuffer,
  pending: Vec<OutputBuffer>,
  version: u16,
}

impl Default for CompactBinaryWriter {
  fn default() -> Self {
    Self::new()
  }
}

impl CompactBinaryWriter {
  /// Creates a version 1 writer.
  pub fn new() -> Self {
    Self {
      output: OutputBuffer::new(),
      pending: Vec::new(),
      version: COMPACT_PROTOCOL_VERSION_1,
    }
  }

  pub fn with_version(version: u16) -> Result<Self, SerializationError> {
    check_version(version).map_err(|err| SerializationError::custom(err.to_string()))?;
    Ok(Self {
      output: OutputBuffer::new(),
      pending: Vec::new(),
      version,
    })
  }

  pub fn version(&self) -> u16 {
    self.version
  }

  fn is_v2(&self) -> bool {
    self.version == COMPACT_PROTOCOL_VERSION_2
  }

  /// Returns the encoded bytes, failing if a v2 struct is still open.
  pub fn into_bytes(self) -> Result<Vec<u8>, SerializationError> {
    if !self.pending.is_empty() {
      return Err(SerializationError::UnbalancedStruct);
    }
    Ok(self.output.into_vec())
  }

  fn current(&mut self) -> &mut OutputBuffer {
    match self.pending.last_mut() {
      Some(buffer) => buffer,
      None => &mut self.output,
    }
  }

  fn write_signed(&mut self, value: i64) {
    self.current().write_varint(zigzag_encode(value));
  }
}

impl ProtocolWriter for CompactBinaryWriter {
  fn protocol(&self) -> ProtocolType {
    ProtocolType::CompactBinary { version: self.version }
  }

  fn write_struct_begin(&mut self) -> Result<(), SerializationError> {
    if self.is_v2() {
      self.pending.push(OutputBuffer::new());
    }
    Ok(())
  }

  fn write_base_end(&mut self) -> Result<(), SerializationError> {
    self.current().write_u8(BondDataType::StopBase.tag());
    Ok(())
  }

  fn write_struct_end(&mut self) -> Result<(), SerializationError> {
    self.current().write_u8(BondDataType::Stop.tag());
    if self.is_v2() {
      let body = self.pending.pop().ok_or(SerializationError::UnbalancedStruct)?;
      let length = wire_count(body.len())?;
      let parent = self.current();
      parent.write_varint(u64::from(length));
      parent.write_bytes(body.as_slice());
    }
    Ok(())
  }

  fn write_field_begin(&mut self, data_type: BondDataType, id: u16) -> Result<(), SerializationError> {
    let tag = data_type.tag();
    let out = self.current();
    if id <= ID_IN_BYTE_MAX {
      out.write_u8(tag | ((id as u8) << 5));
    } else if id <= 0xFF {
      out.write_u8(tag | (ID_MARKER_U8 << 5));
      out.write_u8(id as u8);
    } else {
      out.write_u8(tag | (ID_MARKER_U16 << 5));
      out.write_bytes(&id.to_le_bytes());
    }
    Ok(())
  }

  fn write_container_begin(&mut self, count: u32, element_type: BondDataType) -> Result<(), SerializationError> {
    let tag = element_type.tag();
    let packed = self.is_v2() && count <= PACKED_COUNT_MAX;
    let out = self.current();
    if packed {
      out.write_u8(tag | (((count + 1) as u8) << 5));
    } else {
      out.write_u8(tag);
      out.write_varint(u64::from(count));
    }
    Ok(())
  }

  fn write_map_begin(
    &mut self,
    count: u32,
    key_type: BondDataType,
    value_type: BondDataType,
  ) -> Result<(), SerializationError> {
    let out = self.current();
    out.write_u8(key_type.tag());
    out.write_u8(value_type.tag());
    out.write_varint(u64::from(count));
    Ok(())
  }

  fn write_bool(&mut self, value: bool) -> Result<(), SerializationError> {
    self.current().write_u8(u8::from(value));
    Ok(())
  }

  fn write_u8(&mut self, value: u8) -> Result<(), SerializationError> {
    self.current().write_u8(value);
    Ok(())
  }

  fn write_u16(&mut self, value: u16) -> Result<(), SerializationError> {
    self.current().write_varint(u64::from(value));
    Ok(())
  }

  fn write_u32(&mut self, value: u32) -> Result<(), SerializationError> {
    self.current().write_varint(u64::from(value));
    Ok(())
  }

  fn write_u64(&mut self, value: u64) -> Result<(), SerializationError> {
    self.current().write_varint(value);
    Ok(())
  }

  fn write_i8(&mut self, value: i8) -> Result<(), SerializationError> {
    self.current().write_u8(value as u8);
    Ok(())
  }

  fn write_i16(&mut self, value: i16) -> Result<(), SerializationError> {
    self.write_signed(i64::from(value));
    Ok(())
  }

  fn write_i32(&mut self, value: i32) -> Result<(), SerializationError> {
    self.write_signed(i64::from(value));
    Ok(())
  }

  fn write_i64(&mut self, value: i64) -> Result<(), SerializationError> {
    self.write_signed(value);
    Ok(())
  }

  fn write_f32(&mut self, value: f32) -> Result<(), SerializationError> {
    self.current().write_bytes(&value.to_le_bytes());
    Ok(())
  }

  fn write_f64(&mut self, value: f64) -> Result<(), SerializationError> {
    self.current().write_bytes(&value.to_le_bytes());
    Ok(())
  }

  fn write_string(&mut self, value: &str) -> Result<(), SerializationError> {
    let len = wire_count(value.len())?;
    let out = self.current();
    out.write_varint(u64::from(len));
    out.write_bytes(value.as_bytes());
    Ok(())
  }

  fn write_wstring(&mut self, value: &str) -> Result<(), SerializationError> {
    let units = wire_count(value.encode_utf16().count())?;
    let out = self.current();
    out.write_varint(u64::from(units));
    out.write_utf16(value);
    Ok(())
  }
}
