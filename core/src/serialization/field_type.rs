use std::collections::BTreeMap;

use crate::error::{DeserializationError, SerializationError};
use crate::protocol::writer::wire_count;
use crate::protocol::{BondDataType, ProtocolReader, ProtocolWriter};
use crate::serialization::DeserializeContext;

/// A value type that can appear as a struct field, list element or map entry.
pub trait FieldType: Sized {
  const DATA_TYPE: BondDataType;

  fn write_value(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError>;

  /// Reads a value encoded as `wire`, promoting narrower encodings where allowed.
  fn read_value(
    reader: &mut dyn ProtocolReader,
    wire: BondDataType,
    ctx: &DeserializeContext,
  ) -> Result<Self, DeserializationError>;
}

macro_rules! impl_numeric_field {
  ($ty:ty, $data_type:ident, $write:ident, $( $wire:ident => $read:ident ),+) => {
    impl FieldType for $ty {
      const DATA_TYPE: BondDataType = BondDataType::$data_type;

      fn write_value(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
        writer.$write(*self)
      }

      fn read_value(
        reader: &mut dyn ProtocolReader,
        wire: BondDataType,
        _ctx: &DeserializeContext,
      ) -> Result<Self, DeserializationError> {
        match wire {
          $( BondDataType::$wire => Ok(<$ty>::from(reader.$read()?)), )+
          other => Err(DeserializationError::unexpected_type(Self::DATA_TYPE, other)),
        }
      }
    }
  };
}

impl_numeric_field!(bool, Bool, write_bool, Bool => read_bool);
impl_numeric_field!(u8, UInt8, write_u8, UInt8 => read_u8);
impl_numeric_field!(u16, UInt16, write_u16, UInt8 => read_u8, UInt16 => read_u16);
impl_numeric_field!(u32, UInt32, write_u32, UInt8 => read_u8, UInt16 => read_u16, UInt32 => read_u32);
impl_numeric_field!(
  u64,
  UInt64,
  write_u64,
  UInt8 => read_u8,
  UInt16 => read_u16,
  UInt32 => read_u32,
  UInt64 => read_u64
);
impl_numeric_field!(i8, Int8, write_i8, Int8 => read_i8);
impl_numeric_field!(i16, Int16, write_i16, Int8 => read_i8, Int16 => read_i16);
impl_numeric_field!(i32, Int32, write_i32, Int8 => read_i8, Int16 => read_i16, Int32 => read_i32);
impl_numeric_field!(
  i64,
  Int64,
  write_i64,
  Int8 => read_i8,
  Int16 => read_i16,
  Int32 => read_i32,
  Int64 => read_i64
);
impl_numeric_field!(f32, Float, write_f32, Float => read_f32);
impl_numeric_field!(f64, Double, write_f64, Float => read_f32, Double => read_f64);

impl FieldType for String {
  const DATA_TYPE: BondDataType = BondDataType::String;

  fn write_value(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    writer.write_string(self)
  }

  fn read_value(
    reader: &mut dyn ProtocolReader,
    wire: BondDataType,
    ctx: &DeserializeContext,
  ) -> Result<Self, DeserializationError> {
    match wire {
      BondDataType::String => reader.read_string_bounded(ctx.config().max_string_len),
      other => Err(DeserializationError::unexpected_type(Self::DATA_TYPE, other)),
    }
  }
}

/// UTF-16 string field.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WString(pub String);

impl From<&str> for WString {
  fn from(value: &str) -> Self {
    WString(value.to_owned())
  }
}

impl FieldType for WString {
  const DATA_TYPE: BondDataType = BondDataType::WString;

  fn write_value(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    writer.write_wstring(&self.0)
  }

  fn read_value(
    reader: &mut dyn ProtocolReader,
    wire: BondDataType,
    ctx: &DeserializeContext,
  ) -> Result<Self, DeserializationError> {
    match wire {
      BondDataType::WString => reader.read_wstring_bounded(ctx.config().max_string_len).map(WString),
      other => Err(DeserializationError::unexpected_type(Self::DATA_TYPE, other)),
    }
  }
}

fn read_elements<T: FieldType>(
  reader: &mut dyn ProtocolReader,
  wire: BondDataType,
  ctx: &DeserializeContext,
) -> Result<Vec<T>, DeserializationError> {
  if !matches!(wire, BondDataType::List | BondDataType::Set) {
    return Err(DeserializationError::unexpected_type(BondDataType::List, wire));
  }
  let header = reader.read_container_begin()?;
  let len = ctx.check_container_len(header.count)?;
  let nested = ctx.nested()?;
  let mut items = Vec::with_capacity(len.min(1024));
  for _ in 0..len {
    items.push(T::read_value(reader, header.element_type, &nested)?);
  }
  reader.read_container_end()?;
  Ok(items)
}

impl<T: FieldType> FieldType for Vec<T> {
  const DATA_TYPE: BondDataType = BondDataType::List;

  fn write_value(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    writer.write_container_begin(wire_count(self.len())?, T::DATA_TYPE)?;
    for item in self {
      item.write_value(writer)?;
    }
    writer.write_container_end()
  }

  fn read_value(
    reader: &mut dyn ProtocolReader,
    wire: BondDataType,
    ctx: &DeserializeContext,
  ) -> Result<Self, DeserializationError> {
    read_elements(reader, wire, ctx)
  }
}

/// Nullable value, encoded as a list of zero or one element.
impl<T: FieldType> FieldType for Option<T> {
  const DATA_TYPE: BondDataType = BondDataType::List;

  fn write_value(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    match self {
      Some(value) => {
        writer.write_container_begin(1, T::DATA_TYPE)?;
        value.write_value(writer)?;
      }
      None => writer.write_container_begin(0, T::DATA_TYPE)?,
    }
    writer.write_container_end()
  }

  fn read_value(
    reader: &mut dyn ProtocolReader,
    wire: BondDataType,
    ctx: &DeserializeContext,
  ) -> Result<Self, DeserializationError> {
    let mut items = read_elements::<T>(reader, wire, ctx)?;
    if items.len() > 1 {
      return Err(DeserializationError::malformed(format!(
        "nullable value holds {} elements",
        items.len()
      )));
    }
    Ok(items.pop())
  }
}

impl<K, V> FieldType for BTreeMap<K, V>
where
  K: FieldType + Ord,
  V: FieldType,
{
  const DATA_TYPE: BondDataType = BondDataType::Map;

  fn write_value(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    writer.write_map_begin(wire_count(self.len())?, K::DATA_TYPE, V::DATA_TYPE)?;
    for (key, value) in self {
      key.write_value(writer)?;
      value.write_value(writer)?;
    }
    writer.write_container_end()
  }

  fn read_value(
    reader: &mut dyn ProtocolReader,
    wire: BondDataType,
    ctx: &DeserializeContext,
  ) -> Result<Self, DeserializationError> {
    if wire != BondDataType::Map {
      return Err(DeserializationError::unexpected_type(BondDataType::Map, wire));
    }
    let header = reader.read_map_begin()?;
    let len = ctx.check_container_len(header.count)?;
    let nested = ctx.nested()?;
    let mut entries = BTreeMap::new();
    for _ in 0..len {
      let key = K::read_value(reader, header.key_type, &nested)?;
      let value = V::read_value(reader, header.value_type, &nested)?;
      entries.insert(key, value);
    }
    reader.read_container_end()?;
    Ok(entries)
  }
}

/// Writes `value` as field `id`.
pub fn write_field<F: FieldType>(
  writer: &mut dyn ProtocolWriter,
  id: u16,
  value: &F,
) -> Result<(), SerializationError> {
  writer.write_field_begin(F::DATA_TYPE, id)?;
  value.write_value(writer)?;
  writer.write_field_end()
}
