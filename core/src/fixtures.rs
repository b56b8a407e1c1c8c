//! Hand-written struct types shared by the unit tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::bonded::{read_bonded_field, write_bonded_field, Bonded};
use crate::error::{DeserializationError, SerializationError};
use crate::protocol::{BondDataType, FieldHeader, ProtocolReader, ProtocolWriter};
use crate::schema::{StructDef, TypeDef};
use crate::serialization::{
  read_struct_field, write_field, write_struct_field, BondStruct, DeserializeContext, FieldType, WString,
};

pub static POINT_DEF: Lazy<Arc<StructDef>> = Lazy::new(|| {
  StructDef::builder("Point", "bondbox.fixtures.Point")
    .field(0, "x", TypeDef::of(BondDataType::Int32))
    .field(1, "y", TypeDef::of(BondDataType::Int32))
    .build()
});

pub static SHAPE_DEF: Lazy<Arc<StructDef>> = Lazy::new(|| {
  StructDef::builder("Shape", "bondbox.fixtures.Shape")
    .field(0, "id", TypeDef::of(BondDataType::UInt32))
    .field(1, "label", TypeDef::string())
    .build()
});

pub static CIRCLE_DEF: Lazy<Arc<StructDef>> = Lazy::new(|| {
  StructDef::builder("Circle", "bondbox.fixtures.Circle")
    .base(SHAPE_DEF.clone())
    .field(0, "radius", TypeDef::of(BondDataType::Double))
    .field(1, "tags", TypeDef::list(TypeDef::string()))
    .field(2, "weights", TypeDef::map(TypeDef::string(), TypeDef::of(BondDataType::UInt32)))
    .field(3, "note", TypeDef::list(TypeDef::of(BondDataType::WString)))
    .field(4, "small", TypeDef::of(BondDataType::UInt16))
    .field(5, "delta", TypeDef::of(BondDataType::Int32))
    .field(6, "origin", TypeDef::structure(POINT_DEF.clone()))
    .field(10, "flags", TypeDef::of(BondDataType::UInt8))
    .field(300, "serial", TypeDef::of(BondDataType::Int64))
    .build()
});

pub static STRICT_DEF: Lazy<Arc<StructDef>> = Lazy::new(|| {
  StructDef::builder("Strict", "bondbox.fixtures.Strict")
    .required_field(0, "key", TypeDef::string())
    .field(1, "count", TypeDef::of(BondDataType::UInt32))
    .build()
});

pub static NODE_DEF: Lazy<Arc<StructDef>> = Lazy::new(|| {
  StructDef::builder("Node", "bondbox.fixtures.Node")
    .field(0, "value", TypeDef::of(BondDataType::Int32))
    .field(1, "next", TypeDef::of(BondDataType::Struct))
    .build()
});

pub static ENVELOPE_DEF: Lazy<Arc<StructDef>> = Lazy::new(|| {
  StructDef::builder("Envelope", "bondbox.fixtures.Envelope")
    .field(0, "topic", TypeDef::string())
    .field(1, "payload", TypeDef::bonded(SHAPE_DEF.clone()))
    .build()
});

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Point {
  pub x: i32,
  pub y: i32,
}

impl BondStruct for Point {
  fn struct_def() -> Arc<StructDef> {
    POINT_DEF.clone()
  }

  fn level_def(&self) -> Arc<StructDef> {
    Self::struct_def()
  }

  fn write_fields(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    write_field(writer, 0, &self.x)?;
    write_field(writer, 1, &self.y)
  }

  fn read_field(
    &mut self,
    header: FieldHeader,
    reader: &mut dyn ProtocolReader,
    ctx: &DeserializeContext,
  ) -> Result<bool, DeserializationError> {
    match header.id {
      0 => self.x = i32::read_value(reader, header.data_type, ctx)?,
      1 => self.y = i32::read_value(reader, header.data_type, ctx)?,
      _ => return Ok(false),
    }
    Ok(true)
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
  pub id: u32,
  pub label: String,
}

impl BondStruct for Shape {
  fn struct_def() -> Arc<StructDef> {
    SHAPE_DEF.clone()
  }

  fn level_def(&self) -> Arc<StructDef> {
    Self::struct_def()
  }

  fn write_fields(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    write_field(writer, 0, &self.id)?;
    write_field(writer, 1, &self.label)
  }

  fn read_field(
    &mut self,
    header: FieldHeader,
    reader: &mut dyn ProtocolReader,
    ctx: &DeserializeContext,
  ) -> Result<bool, DeserializationError> {
    match header.id {
      0 => self.id = u32::read_value(reader, header.data_type, ctx)?,
      1 => self.label = String::read_value(reader, header.data_type, ctx)?,
      _ => return Ok(false),
    }
    Ok(true)
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Circle {
  pub base: Shape,
  pub radius: f64,
  pub tags: Vec<String>,
  pub weights: BTreeMap<String, u32>,
  pub note: Option<WString>,
  pub small: u16,
  pub delta: i32,
  pub origin: Point,
  pub flags: u8,
  pub serial: i64,
}

impl Circle {
  pub fn sample() -> Self {
    Circle {
      base: Shape {
        id: 7,
        label: "wheel".to_string(),
      },
      radius: 2.5,
      tags: vec!["round".to_string(), "red".to_string()],
      weights: BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 300)]),
      note: Some(WString::from("ünïcode")),
      small: 65535,
      delta: -42,
      origin: Point { x: -3, y: 4 },
      flags: 0x81,
      serial: i64::MIN,
    }
  }
}

impl BondStruct for Circle {
  fn struct_def() -> Arc<StructDef> {
    CIRCLE_DEF.clone()
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
    write_field(writer, 0, &self.radius)?;
    write_field(writer, 1, &self.tags)?;
    write_field(writer, 2, &self.weights)?;
    write_field(writer, 3, &self.note)?;
    write_field(writer, 4, &self.small)?;
    write_field(writer, 5, &self.delta)?;
    write_struct_field(writer, 6, &self.origin)?;
    write_field(writer, 10, &self.flags)?;
    write_field(writer, 300, &self.serial)
  }

  fn read_field(
    &mut self,
    header: FieldHeader,
    reader: &mut dyn ProtocolReader,
    ctx: &DeserializeContext,
  ) -> Result<bool, DeserializationError> {
    let wire = header.data_type;
    match header.id {
      0 => self.radius = f64::read_value(reader, wire, ctx)?,
      1 => self.tags = Vec::<String>::read_value(reader, wire, ctx)?,
      2 => self.weights = BTreeMap::<String, u32>::read_value(reader, wire, ctx)?,
      3 => self.note = Option::<WString>::read_value(reader, wire, ctx)?,
      4 => self.small = u16::read_value(reader, wire, ctx)?,
      5 => self.delta = i32::read_value(reader, wire, ctx)?,
      6 => self.origin = read_struct_field(reader, header, ctx)?,
      10 => self.flags = u8::read_value(reader, wire, ctx)?,
      300 => self.serial = i64::read_value(reader, wire, ctx)?,
      _ => return Ok(false),
    }
    Ok(true)
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Strict {
  pub key: String,
  pub count: u32,
}

impl BondStruct for Strict {
  fn struct_def() -> Arc<StructDef> {
    STRICT_DEF.clone()
  }

  fn level_def(&self) -> Arc<StructDef> {
    Self::struct_def()
  }

  fn write_fields(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    write_field(writer, 0, &self.key)?;
    write_field(writer, 1, &self.count)
  }

  fn read_field(
    &mut self,
    header: FieldHeader,
    reader: &mut dyn ProtocolReader,
    ctx: &DeserializeContext,
  ) -> Result<bool, DeserializationError> {
    match header.id {
      0 => self.key = String::read_value(reader, header.data_type, ctx)?,
      1 => self.count = u32::read_value(reader, header.data_type, ctx)?,
      _ => return Ok(false),
    }
    Ok(true)
  }
}

/// Singly linked chain, used to exercise depth limits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
  pub value: i32,
  pub next: Option<Box<Node>>,
}

impl Node {
  pub fn chain(len: usize) -> Self {
    let mut node = Node { value: 0, next: None };
    for value in 1..len {
      node = Node {
        value: value as i32,
        next: Some(Box::new(node)),
      };
    }
    node
  }

  pub fn depth(&self) -> usize {
    1 + self.next.as_ref().map_or(0, |next| next.depth())
  }
}

impl BondStruct for Node {
  fn struct_def() -> Arc<StructDef> {
    NODE_DEF.clone()
  }

  fn level_def(&self) -> Arc<StructDef> {
    Self::struct_def()
  }

  fn write_fields(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    write_field(writer, 0, &self.value)?;
    match &self.next {
      Some(next) => write_struct_field(writer, 1, next.as_ref()),
      None => Ok(()),
    }
  }

  fn read_field(
    &mut self,
    header: FieldHeader,
    reader: &mut dyn ProtocolReader,
    ctx: &DeserializeContext,
  ) -> Result<bool, DeserializationError> {
    match header.id {
      0 => self.value = i32::read_value(reader, header.data_type, ctx)?,
      1 => self.next = Some(Box::new(read_struct_field(reader, header, ctx)?)),
      _ => return Ok(false),
    }
    Ok(true)
  }
}

#[derive(Debug, Clone, Default)]
pub struct Envelope {
  pub topic: String,
  pub payload: Bonded<Shape>,
}

impl BondStruct for Envelope {
  fn struct_def() -> Arc<StructDef> {
    ENVELOPE_DEF.clone()
  }

  fn level_def(&self) -> Arc<StructDef> {
    Self::struct_def()
  }

  fn write_fields(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    write_field(writer, 0, &self.topic)?;
    write_bonded_field(writer, 1, &self.payload)
  }

  fn read_field(
    &mut self,
    header: FieldHeader,
    reader: &mut dyn ProtocolReader,
    ctx: &DeserializeContext,
  ) -> Result<bool, DeserializationError> {
    match header.id {
      0 => self.topic = String::read_value(reader, header.data_type, ctx)?,
      1 => self.payload = read_bonded_field(reader, header, ctx)?,
      _ => return Ok(false),
    }
    Ok(true)
  }
}
