/// Growable write buffer used by the binary writers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
  data: Vec<u8>,
}

impl OutputBuffer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      data: Vec::with_capacity(capacity),
    }
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn as_slice(&self) -> &[u8] {
    &self.data
  }

  pub fn into_vec(self) -> Vec<u8> {
    self.data
  }

  pub fn write_u8(&mut self, value: u8) {
    self.data.push(value);
  }

  pub fn write_bytes(&mut self, bytes: &[u8]) {
    self.data.extend_from_slice(bytes);
  }

  pub fn write_varint(&mut self, mut value: u64) {
    while value >= 0x80 {
      self.data.push((value as u8 & 0x7F) | 0x80);
      value >>= 7;
    }
    self.data.push(value as u8);
  }

  /// Appends `value` as UTF-16LE and returns the number of code units written.
  pub fn write_utf16(&mut self, value: &str) -> usize {
    let mut units = 0;
    for unit in value.encode_utf16() {
      self.data.extend_from_slice(&unit.to_le_bytes());
      units += 1;
    }
    units
  }
}
