#![allow(dead_code)]

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bondbox_core_rs::bonded::{read_bonded_field, write_bonded_field, BondedSource};
use bondbox_core_rs::error::{DeserializationError, SerializationError};
use bondbox_core_rs::protocol::{
  BondDataType, CompactBinaryReader, CompactBinaryWriter, ContainerHeader, FieldHeader, MapHeader, ProtocolReader,
  ProtocolType, ProtocolWriter,
};
use bondbox_core_rs::schema::{RuntimeSchema, StructDef, TypeDef};
use bondbox_core_rs::serialization::{write_field, BondStruct, DeserializeContext, FieldType, Serializer};
use bondbox_lazy_rs::LazyBox;
use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
  env::set_var("RUST_LOG", "debug");
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .try_init();
}

pub static Z_DEF: Lazy<Arc<StructDef>> = Lazy::new(|| {
  StructDef::builder("Z", "bondbox.tests.Z")
    .field(0, "full_name", TypeDef::string())
    .field(1, "value", TypeDef::of(BondDataType::Int32))
    .build()
});

pub static Y_DEF: Lazy<Arc<StructDef>> = Lazy::new(|| {
  StructDef::builder("Y", "bondbox.tests.Y")
    .field(0, "full_name", TypeDef::string())
    .build()
});

pub static Y_DERIVED_DEF: Lazy<Arc<StructDef>> = Lazy::new(|| {
  StructDef::builder("YDerived", "bondbox.tests.YDerived")
    .base(Y_DEF.clone())
    .field(1, "z", TypeDef::bonded(Z_DEF.clone()))
    .build()
});

pub static X_DEF: Lazy<Arc<StructDef>> = Lazy::new(|| {
  StructDef::builder("X", "bondbox.tests.X")
    .field(0, "bonded_y", TypeDef::bonded(Y_DEF.clone()))
    .build()
});

#[derive(Debug, Clone, PartialEq)]
pub struct Z {
  pub full_name: String,
  pub value: i32,
}

impl Default for Z {
  fn default() -> Self {
    Z {
      full_name: "bondbox.tests.Z".to_string(),
      value: 0,
    }
  }
}

impl BondStruct for Z {
  fn struct_def() -> Arc<StructDef> {
    Z_DEF.clone()
  }

  fn level_def(&self) -> Arc<StructDef> {
    Self::struct_def()
  }

  fn write_fields(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    write_field(writer, 0, &self.full_name)?;
    write_field(writer, 1, &self.value)
  }

  fn read_field(
    &mut self,
    header: FieldHeader,
    reader: &mut dyn ProtocolReader,
    ctx: &DeserializeContext,
  ) -> Result<bool, DeserializationError> {
    match header.id {
      0 => self.full_name = String::read_value(reader, header.data_type, ctx)?,
      1 => self.value = i32::read_value(reader, header.data_type, ctx)?,
      _ => return Ok(false),
    }
    Ok(true)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Y {
  pub full_name: String,
}

impl Default for Y {
  fn default() -> Self {
    Y {
      full_name: "bondbox.tests.Y".to_string(),
    }
  }
}

impl BondStruct for Y {
  fn struct_def() -> Arc<StructDef> {
    Y_DEF.clone()
  }

  fn level_def(&self) -> Arc<StructDef> {
    Self::struct_def()
  }

  fn write_fields(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    write_field(writer, 0, &self.full_name)
  }

  fn read_field(
    &mut self,
    header: FieldHeader,
    reader: &mut dyn ProtocolReader,
    ctx: &DeserializeContext,
  ) -> Result<bool, DeserializationError> {
    match header.id {
      0 => self.full_name = String::read_value(reader, header.data_type, ctx)?,
      _ => return Ok(false),
    }
    Ok(true)
  }
}

#[derive(Debug, Clone)]
pub struct YDerived {
  pub base: Y,
  pub z: LazyBox<Z>,
}

impl Default for YDerived {
  fn default() -> Self {
    YDerived {
      base: Y {
        full_name: "bondbox.tests.YDerived".to_string(),
      },
      z: LazyBox::from(Z::default()),
    }
  }
}

impl BondStruct for YDerived {
  fn struct_def() -> Arc<StructDef> {
    Y_DERIVED_DEF.clone()
  }

  fn level_def(&self) -> Arc<StructDef> {
    Self::struct_def()
  }

  fn base(&self) -> Option<&dyn BondStruct> {
    Some(&self.base)
  }

  fn base_mut(&mut self) -> Option<&mut dyn BondStruct> {
    Some(&mut self.base)
  }

  fn write_fields(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    write_bonded_field(writer, 1, &self.z)
  }

  fn read_field(
    &mut self,
    header: FieldHeader,
    reader: &mut dyn ProtocolReader,
    ctx: &DeserializeContext,
  ) -> Result<bool, DeserializationError> {
    match header.id {
      1 => self.z = read_bonded_field(reader, header, ctx)?,
      _ => return Ok(false),
    }
    Ok(true)
  }
}

#[derive(Debug, Clone, Default)]
pub struct X {
  pub bonded_y: LazyBox<Y>,
}

impl BondStruct for X {
  fn struct_def() -> Arc<StructDef> {
    X_DEF.clone()
  }

  fn level_def(&self) -> Arc<StructDef> {
    Self::struct_def()
  }

  fn write_fields(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    write_bonded_field(writer, 0, &self.bonded_y)
  }

  fn read_field(
    &mut self,
    header: FieldHeader,
    reader: &mut dyn ProtocolReader,
    ctx: &DeserializeContext,
  ) -> Result<bool, DeserializationError> {
    match header.id {
      0 => self.bonded_y = read_bonded_field(reader, header, ctx)?,
      _ => return Ok(false),
    }
    Ok(true)
  }
}

/// X { bonded_y: YDerived { z: Z { value: 42 } } }
pub fn sample_x() -> X {
  let y = YDerived {
    z: LazyBox::from(Z {
      value: 42,
      ..Z::default()
    }),
    ..YDerived::default()
  };
  X {
    bonded_y: LazyBox::from(y),
  }
}

pub fn to_compact(value: &dyn BondStruct) -> Vec<u8> {
  let mut writer = CompactBinaryWriter::new();
  Serializer::new().serialize(value, &mut writer).unwrap();
  writer.into_bytes().unwrap()
}

/// Compact Binary reader counting how many cursors were cloned from it.
#[derive(Debug, Clone)]
pub struct CountingReader {
  inner: CompactBinaryReader,
  clones: Arc<AtomicUsize>,
}

impl CountingReader {
  pub fn new(bytes: Vec<u8>) -> Self {
    Self {
      inner: CompactBinaryReader::new(bytes),
      clones: Arc::new(AtomicUsize::new(0)),
    }
  }

  pub fn counter(&self) -> Arc<AtomicUsize> {
    self.clones.clone()
  }

  /// Deferred source over `bytes`, plus the clone counter of its cursor.
  pub fn source(bytes: Vec<u8>, schema: RuntimeSchema) -> (BondedSource, Arc<AtomicUsize>) {
    let reader = CountingReader::new(bytes);
    let counter = reader.counter();
    (
      BondedSource::new(Box::new(reader), schema, DeserializeContext::default()),
      counter,
    )
  }
}

impl ProtocolReader for CountingReader {
  fn protocol(&self) -> ProtocolType {
    self.inner.protocol()
  }

  fn box_clone(&self) -> Box<dyn ProtocolReader> {
    self.clones.fetch_add(1, Ordering::SeqCst);
    Box::new(self.clone())
  }

  fn read_struct_begin(&mut self) -> Result<(), DeserializationError> {
    self.inner.read_struct_begin()
  }

  fn read_struct_end(&mut self) -> Result<(), DeserializationError> {
    self.inner.read_struct_end()
  }

  fn read_field_begin(&mut self) -> Result<FieldHeader, DeserializationError> {
    self.inner.read_field_begin()
  }

  fn read_field_end(&mut self) -> Result<(), DeserializationError> {
    self.inner.read_field_end()
  }

  fn read_container_begin(&mut self) -> Result<ContainerHeader, DeserializationError> {
    self.inner.read_container_begin()
  }

  fn read_map_begin(&mut self) -> Result<MapHeader, DeserializationError> {
    self.inner.read_map_begin()
  }

  fn read_container_end(&mut self) -> Result<(), DeserializationError> {
    self.inner.read_container_end()
  }

  fn read_bool(&mut self) -> Result<bool, DeserializationError> {
    self.inner.read_bool()
  }

  fn read_u8(&mut self) -> Result<u8, DeserializationError> {
    self.inner.read_u8()
  }

  fn read_u16(&mut self) -> Result<u16, DeserializationError> {
    self.inner.read_u16()
  }

  fn read_u32(&mut self) -> Result<u32, DeserializationError> {
    self.inner.read_u32()
  }

  fn read_u64(&mut self) -> Result<u64, DeserializationError> {
    self.inner.read_u64()
  }

  fn read_i8(&mut self) -> Result<i8, DeserializationError> {
    self.inner.read_i8()
  }

  fn read_i16(&mut self) -> Result<i16, DeserializationError> {
    self.inner.read_i16()
  }

  fn read_i32(&mut self) -> Result<i32, DeserializationError> {
    self.inner.read_i32()
  }

  fn read_i64(&mut self) -> Result<i64, DeserializationError> {
    self.inner.read_i64()
  }

  fn read_f32(&mut self) -> Result<f32, DeserializationError> {
    self.inner.read_f32()
  }

  fn read_f64(&mut self) -> Result<f64, DeserializationError> {
    self.inner.read_f64()
  }

  fn read_string(&mut self) -> Result<String, DeserializationError> {
    self.inner.read_string()
  }

  fn read_wstring(&mut self) -> Result<String, DeserializationError> {
    self.inner.read_wstring()
  }

  fn skip(&mut self, data_type: BondDataType) -> Result<(), DeserializationError> {
    self.inner.skip(data_type)
  }
}
