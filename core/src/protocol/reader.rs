use crate::error::DeserializationError;
use crate::protocol::{BondDataType, ContainerHeader, FieldHeader, MapHeader, ProtocolType};

/// Nesting bound applied while skipping values of unknown shape.
pub const MAX_SKIP_DEPTH: usize = 128;

/// Cursor over a tagged encoded stream.
///
/// Implementations must be cheap to clone: [`ProtocolReader::box_clone`] returns an
/// independent cursor at the current position, which is how deferred values are
/// decoded repeatedly without disturbing each other.
pub trait ProtocolReader: Send + Sync {
  fn protocol(&self) -> ProtocolType;

  fn box_clone(&self) -> Box<dyn ProtocolReader>;

  fn read_struct_begin(&mut self) -> Result<(), DeserializationError>;

  fn read_struct_end(&mut self) -> Result<(), DeserializationError> {
    Ok(())
  }

  /// Returns the next field header, or a `Stop`/`StopBase` header at the end of a level.
  fn read_field_begin(&mut self) -> Result<FieldHeader, DeserializationError>;

  fn read_field_end(&mut self) -> Result<(), DeserializationError> {
    Ok(())
  }

  fn read_container_begin(&mut self) -> Result<ContainerHeader, DeserializationError>;

  fn read_map_begin(&mut self) -> Result<MapHeader, DeserializationError>;

  fn read_container_end(&mut self) -> Result<(), DeserializationError> {
    Ok(())
  }

  fn read_bool(&mut self) -> Result<bool, DeserializationError>;
  fn read_u8(&mut self) -> Result<u8, DeserializationError>;
  fn read_u16(&mut self) -> Result<u16, DeserializationError>;
  fn read_u32(&mut self) -> Result<u32, DeserializationError>;
  fn read_u64(&mut self) -> Result<u64, DeserializationError>;
  fn read_i8(&mut self) -> Result<i8, DeserializationError>;
  fn read_i16(&mut self) -> Result<i16, DeserializationError>;
  fn read_i32(&mut self) -> Result<i32, DeserializationError>;
  fn read_i64(&mut self) -> Result<i64, DeserializationError>;
  fn read_f32(&mut self) -> Result<f32, DeserializationError>;
  fn read_f64(&mut self) -> Result<f64, DeserializationError>;
  fn read_string(&mut self) -> Result<String, DeserializationError>;
  fn read_wstring(&mut self) -> Result<String, DeserializationError>;

  /// Reads a string of at most `max_len` bytes.
  ///
  /// Binary readers check the length prefix before reading the payload.
  fn read_string_bounded(&mut self, max_len: usize) -> Result<String, DeserializationError> {
    let value = self.read_string()?;
    check_string_len(value.len(), max_len)?;
    Ok(value)
  }

  /// Reads a UTF-16 string of at most `max_len` code units.
  fn read_wstring_bounded(&mut self, max_len: usize) -> Result<String, DeserializationError> {
    let value = self.read_wstring()?;
    check_string_len(value.encode_utf16().count(), max_len)?;
    Ok(value)
  }

  /// Skips one value of the given type.
  fn skip(&mut self, data_type: BondDataType) -> Result<(), DeserializationError> {
    skip_value(self, data_type, 0)
  }
}

impl Clone for Box<dyn ProtocolReader> {
  fn clone(&self) -> Self {
    self.box_clone()
  }
}

impl std::fmt::Debug for dyn ProtocolReader {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ProtocolReader")
      .field("protocol", &self.protocol())
      .finish()
  }
}

/// Fails when an encoded string length exceeds `max_len`.
pub fn check_string_len(len: usize, max_len: usize) -> Result<(), DeserializationError> {
  if len > max_len {
    return Err(DeserializationError::LengthLimitExceeded { len, max: max_len });
  }
  Ok(())
}

/// Generic skip built on the typed read calls.
pub fn skip_value<R>(reader: &mut R, data_type: BondDataType, depth: usize) -> Result<(), DeserializationError>
where
  R: ProtocolReader + ?Sized, {
  if depth > MAX_SKIP_DEPTH {
    return Err(DeserializationError::DepthLimitExceeded(MAX_SKIP_DEPTH));
  }
  match data_type {
    BondDataType::Bool => reader.read_bool().map(drop),
    BondDataType::UInt8 => reader.read_u8().map(drop),
    BondDataType::UInt16 => reader.read_u16().map(drop),
    BondDataType::UInt32 => reader.read_u32().map(drop),
    BondDataType::UInt64 => reader.read_u64().map(drop),
    BondDataType::Int8 => reader.read_i8().map(drop),
    BondDataType::Int16 => reader.read_i16().map(drop),
    BondDataType::Int32 => reader.read_i32().map(drop),
    BondDataType::Int64 => reader.read_i64().map(drop),
    BondDataType::Float => reader.read_f32().map(drop),
    BondDataType::Double => reader.read_f64().map(drop),
    BondDataType::String => reader.read_string().map(drop),
    BondDataType::WString => reader.read_wstring().map(drop),
    BondDataType::Struct => {
      reader.read_struct_begin()?;
      skip_struct_levels(reader, depth + 1)?;
      reader.read_struct_end()
    }
    BondDataType::List | BondDataType::Set => {
      let header = reader.read_container_begin()?;
      for _ in 0..header.count {
        skip_value(reader, header.element_type, depth + 1)?;
      }
      reader.read_container_end()
    }
    BondDataType::Map => {
      let header = reader.read_map_begin()?;
      for _ in 0..header.count {
        skip_value(reader, header.key_type, depth + 1)?;
        skip_value(reader, header.value_type, depth + 1)?;
      }
      reader.read_container_end()
    }
    BondDataType::Stop | BondDataType::StopBase => Err(DeserializationError::malformed(format!(
      "{data_type} is not a value type"
    ))),
  }
}

/// Consumes fields up to and including the final `Stop`, passing over any `StopBase` markers.
///
/// The caller has already consumed the struct begin and is responsible for the struct end.
pub fn skip_struct_levels<R>(reader: &mut R, depth: usize) -> Result<(), DeserializationError>
where
  R: ProtocolReader + ?Sized, {
  loop {
    let header = reader.read_field_begin()?;
    match header.data_type {
      BondDataType::Stop => return Ok(()),
      BondDataType::StopBase => continue,
      data_type => {
        skip_value(reader, data_type, depth)?;
        reader.read_field_end()?;
      }
    }
  }
}
