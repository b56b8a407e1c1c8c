use std::sync::Arc;

use crate::error::DeserializationError;

/// Read cursor over shared, immutable bytes.
///
/// Cloning is O(1) and yields an independent cursor at the same position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBuffer {
  data: Arc<[u8]>,
  position: usize,
}

impl InputBuffer {
  pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
    Self {
      data: data.into(),
      position: 0,
    }
  }

  pub fn position(&self) -> usize {
    self.position
  }

  pub fn remaining(&self) -> usize {
    self.data.len() - self.position
  }

  pub fn is_empty(&self) -> bool {
    self.remaining() == 0
  }

  fn ensure(&self, needed: usize) -> Result<(), DeserializationError> {
    let remaining = self.remaining();
    if needed > remaining {
      return Err(DeserializationError::UnexpectedEof { needed, remaining });
    }
    Ok(())
  }

  pub fn read_u8(&mut self) -> Result<u8, DeserializationError> {
    self.ensure(1)?;
    let byte = self.data[self.position];
    self.position += 1;
    Ok(byte)
  }

  pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DeserializationError> {
    self.ensure(N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(&self.data[self.position..self.position + N]);
    self.position += N;
    Ok(out)
  }

  pub fn read_bytes(&mut self, len: usize) -> Result<&[u8], DeserializationError> {
    self.ensure(len)?;
    let start = self.position;
    self.position += len;
    Ok(&self.data[start..start + len])
  }

  pub fn skip(&mut self, len: usize) -> Result<(), DeserializationError> {
    self.ensure(len)?;
    self.position += len;
    Ok(())
  }

  /// LEB128 unsigned integer of at most `max_bits` significant bits.
  fn read_varint(&mut self, max_bits: u32) -> Result<u64, DeserializationError> {
    let mut result = 0u64;
    let mut shift = 0u32;
    loop {
      let byte = self.read_u8()?;
      if shift >= max_bits {
        return Err(DeserializationError::malformed("varint is too long"));
      }
      let payload = u64::from(byte & 0x7F);
      // Only `max_bits - shift` bits of the last group fit.
      let available = max_bits - shift;
      if available < 7 && payload >> available != 0 {
        return Err(DeserializationError::malformed("varint overflows its type"));
      }
      result |= payload << shift;
      if byte & 0x80 == 0 {
        break;
      }
      shift += 7;
    }
    Ok(result)
  }

  pub fn read_varint_u16(&mut self) -> Result<u16, DeserializationError> {
    self.read_varint(16).map(|v| v as u16)
  }

  pub fn read_varint_u32(&mut self) -> Result<u32, DeserializationError> {
    self.read_varint(32).map(|v| v as u32)
  }

  pub fn read_varint_u64(&mut self) -> Result<u64, DeserializationError> {
    self.read_varint(64)
  }

  pub fn read_utf8(&mut self, byte_len: usize) -> Result<String, DeserializationError> {
    let bytes = self.read_bytes(byte_len)?;
    std::str::from_utf8(bytes)
      .map(str::to_owned)
      .map_err(|_| DeserializationError::InvalidUtf8)
  }

  /// Reads `units` UTF-16LE code units.
  pub fn read_utf16(&mut self, units: usize) -> Result<String, DeserializationError> {
    let byte_len = units
      .checked_mul(2)
      .ok_or(DeserializationError::LengthLimitExceeded { len: units, max: usize::MAX / 2 })?;
    let bytes = self.read_bytes(byte_len)?;
    let code_units = bytes
      .chunks_exact(2)
      .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
      .collect::<Vec<_>>();
    String::from_utf16(&code_units).map_err(|_| DeserializationError::InvalidUtf8)
  }
}

impl From<Vec<u8>> for InputBuffer {
  fn from(value: Vec<u8>) -> Self {
    InputBuffer::new(value)
  }
}

impl From<&[u8]> for InputBuffer {
  fn from(value: &[u8]) -> Self {
    InputBuffer::new(value)
  }
}
