//! In-memory protocol recording writer calls as tokens and replaying them to a reader.
//!
//! Used to copy a value into another type field by field without going through bytes.

use std::sync::Arc;

use crate::error::{DeserializationError, SerializationError};
use crate::protocol::{
  BondDataType, ContainerHeader, FieldHeader, MapHeader, ProtocolReader, ProtocolType, ProtocolWriter,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
  StructBegin,
  BaseEnd,
  StructEnd,
  Field(FieldHeader),
  Container(ContainerHeader),
  Map(MapHeader),
  Bool(bool),
  UInt(u64),
  Int(i64),
  Float(f32),
  Double(f64),
  String(String),
  WString(String),
}

#[derive(Debug, Clone, Default)]
pub struct TokenWriter {
  tokens: Vec<Token>,
  open_structs: usize,
}

impl TokenWriter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn tokens(&self) -> &[Token] {
    &self.tokens
  }

  pub fn into_reader(self) -> Result<TokenReader, SerializationError> {
    if self.open_structs != 0 {
      return Err(SerializationError::UnbalancedStruct);
    }
    Ok(TokenReader::new(self.tokens))
  }

  fn push(&mut self, token: Token) -> Result<(), SerializationError> {
    self.tokens.push(token);
    Ok(())
  }
}

impl ProtocolWriter for TokenWriter {
  fn protocol(&self) -> ProtocolType {
    ProtocolType::TokenStream
  }

  fn write_struct_begin(&mut self) -> Result<(), SerializationError> {
    self.open_structs += 1;
    self.push(Token::StructBegin)
  }

  fn write_base_end(&mut self) -> Result<(), SerializationError> {
    self.push(Token::BaseEnd)
  }

  fn write_struct_end(&mut self) -> Result<(), SerializationError> {
    self.open_structs = self
      .open_structs
      .checked_sub(1)
      .ok_or(SerializationError::UnbalancedStruct)?;
    self.push(Token::StructEnd)
  }

  fn write_field_begin(&mut self, data_type: BondDataType, id: u16) -> Result<(), SerializationError> {
    self.push(Token::Field(FieldHeader::new(data_type, id)))
  }

  fn write_container_begin(&mut self, count: u32, element_type: BondDataType) -> Result<(), SerializationError> {
    self.push(Token::Container(ContainerHeader { element_type, count }))
  }

  fn write_map_begin(
    &mut self,
    count: u32,
    key_type: BondDataType,
    value_type: BondDataType,
  ) -> Result<(), SerializationError> {
    self.push(Token::Map(MapHeader {
      key_type,
      value_type,
      count,
    }))
  }

  fn write_bool(&mut self, value: bool) -> Result<(), SerializationError> {
    self.push(Token::Bool(value))
  }

  fn write_u8(&mut self, value: u8) -> Result<(), SerializationError> {
    self.push(Token::UInt(u64::from(value)))
  }

  fn write_u16(&mut self, value: u16) -> Result<(), SerializationError> {
    self.push(Token::UInt(u64::from(value)))
  }

  fn write_u32(&mut self, value: u32) -> Result<(), SerializationError> {
    self.push(Token::UInt(u64::from(value)))
  }

  fn write_u64(&mut self, value: u64) -> Result<(), SerializationError> {
    self.push(Token::UInt(value))
  }

  fn write_i8(&mut self, value: i8) -> Result<(), SerializationError> {
    self.push(Token::Int(i64::from(value)))
  }

  fn write_i16(&mut self, value: i16) -> Result<(), SerializationError> {
    self.push(Token::Int(i64::from(value)))
  }

  fn write_i32(&mut self, value: i32) -> Result<(), SerializationError> {
    self.push(Token::Int(i64::from(value)))
  }

  fn write_i64(&mut self, value: i64) -> Result<(), SerializationError> {
    self.push(Token::Int(value))
  }

  fn write_f32(&mut self, value: f32) -> Result<(), SerializationError> {
    self.push(Token::Float(value))
  }

  fn write_f64(&mut self, value: f64) -> Result<(), SerializationError> {
    self.push(Token::Double(value))
  }

  fn write_string(&mut self, value: &str) -> Result<(), SerializationError> {
    self.push(Token::String(value.to_owned()))
  }

  fn write_wstring(&mut self, value: &str) -> Result<(), SerializationError> {
    self.push(Token::WString(value.to_owned()))
  }
}

/// Replays tokens recorded by a [`TokenWriter`]. Clones share the token buffer.
#[derive(Debug, Clone)]
pub struct TokenReader {
  tokens: Arc<[Token]>,
  position: usize,
}

impl TokenReader {
  pub fn new(tokens: impl Into<Arc<[Token]>>) -> Self {
    Self {
      tokens: tokens.into(),
      position: 0,
    }
  }

  fn next(&mut self) -> Result<&Token, DeserializationError> {
    let token = self
      .tokens
      .get(self.position)
      .ok_or(DeserializationError::UnexpectedEof { needed: 1, remaining: 0 })?;
    self.position += 1;
    Ok(token)
  }

  fn unexpected(token: &Token, wanted: &str) -> DeserializationError {
    DeserializationError::malformed(format!("expected {wanted}, found {token:?}"))
  }

  fn next_uint(&mut self, max: u64) -> Result<u64, DeserializationError> {
    match self.next()? {
      Token::UInt(value) if *value <= max => Ok(*value),
      other => Err(Self::unexpected(other, "unsigned integer")),
    }
  }

  fn next_int(&mut self, min: i64, max: i64) -> Result<i64, DeserializationError> {
    match self.next()? {
      Token::Int(value) if (min..=max).contains(value) => Ok(*value),
      other => Err(Self::unexpected(other, "signed integer")),
    }
  }
}

impl ProtocolReader for TokenReader {
  fn protocol(&self) -> ProtocolType {
    ProtocolType::TokenStream
  }

  fn box_clone(&self) -> Box<dyn ProtocolReader> {
    Box::new(self.clone())
  }

  fn read_struct_begin(&mut self) -> Result<(), DeserializationError> {
    match self.next()? {
      Token::StructBegin => Ok(()),
      other => Err(Self::unexpected(other, "struct begin")),
    }
  }

  fn read_field_begin(&mut self) -> Result<FieldHeader, DeserializationError> {
    match self.next()? {
      Token::Field(header) => Ok(*header),
      Token::BaseEnd => Ok(FieldHeader::stop_base()),
      Token::StructEnd => Ok(FieldHeader::stop()),
      other => Err(Self::unexpected(other, "field header")),
    }
  }

  fn read_container_begin(&mut self) -> Result<ContainerHeader, DeserializationError> {
    match self.next()? {
      Token::Container(header) => Ok(*header),
      other => Err(Self::unexpected(other, "container header")),
    }
  }

  fn read_map_begin(&mut self) -> Result<MapHeader, DeserializationError> {
    match self.next()? {
      Token::Map(header) => Ok(*header),
      other => Err(Self::unexpected(other, "map header")),
    }
  }

  fn read_bool(&mut self) -> Result<bool, DeserializationError> {
    match self.next()? {
      Token::Bool(value) => Ok(*value),
      other => Err(Self::unexpected(other, "bool")),
    }
  }

  fn read_u8(&mut self) -> Result<u8, DeserializationError> {
    self.next_uint(u64::from(u8::MAX)).map(|v| v as u8)
  }

  fn read_u16(&mut self) -> Result<u16, DeserializationError> {
    self.next_uint(u64::from(u16::MAX)).map(|v| v as u16)
  }

  fn read_u32(&mut self) -> Result<u32, DeserializationError> {
    self.next_uint(u64::from(u32::MAX)).map(|v| v as u32)
  }

  fn read_u64(&mut self) -> Result<u64, DeserializationError> {
    self.next_uint(u64::MAX)
  }

  fn read_i8(&mut self) -> Result<i8, DeserializationError> {
    self.next_int(i64::from(i8::MIN), i64::from(i8::MAX)).map(|v| v as i8)
  }

  fn read_i16(&mut self) -> Result<i16, DeserializationError> {
    self.next_int(i64::from(i16::MIN), i64::from(i16::MAX)).map(|v| v as i16)
  }

  fn read_i32(&mut self) -> Result<i32, DeserializationError> {
    self.next_int(i64::from(i32::MIN), i64::from(i32::MAX)).map(|v| v as i32)
  }

  fn read_i64(&mut self) -> Result<i64, DeserializationError> {
    self.next_int(i64::MIN, i64::MAX)
  }

  fn read_f32(&mut self) -> Result<f32, DeserializationError> {
    match self.next()? {
      Token::Float(value) => Ok(*value),
      other => Err(Self::unexpected(other, "float")),
    }
  }

  fn read_f64(&mut self) -> Result<f64, DeserializationError> {
    match self.next()? {
      Token::Double(value) => Ok(*value),
      other => Err(Self::unexpected(other, "double")),
    }
  }

  fn read_string(&mut self) -> Result<String, DeserializationError> {
    match self.next()? {
      Token::String(value) => Ok(value.clone()),
      other => Err(Self::unexpected(other, "string")),
    }
  }

  fn read_wstring(&mut self) -> Result<String, DeserializationError> {
    match self.next()? {
      Token::WString(value) => Ok(value.clone()),
      other => Err(Self::unexpected(other, "wstring")),
    }
  }
}
