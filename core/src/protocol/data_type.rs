use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};

use crate::error::DeserializationError;

/// Wire type tag carried in field, container and map headers.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  IntoPrimitive,
  TryFromPrimitive,
  strum::Display,
  Serialize,
  Deserialize,
)]
#[repr(u8)]
#[strum(serialize_all = "snake_case")]
pub enum BondDataType {
  Stop = 0,
  StopBase = 1,
  Bool = 2,
  UInt8 = 3,
  UInt16 = 4,
  UInt32 = 5,
  UInt64 = 6,
  Float = 7,
  Double = 8,
  String = 9,
  Struct = 10,
  List = 11,
  Set = 12,
  Map = 13,
  Int8 = 14,
  Int16 = 15,
  Int32 = 16,
  Int64 = 17,
  WString = 18,
}

impl BondDataType {
  /// Decodes a tag byte, rejecting values outside the known range.
  pub fn from_tag(tag: u8) -> Result<Self, DeserializationError> {
    BondDataType::try_from(tag).map_err(|_| DeserializationError::UnknownDataType(tag))
  }

  pub fn tag(self) -> u8 {
    self.into()
  }

  pub fn is_stop(self) -> bool {
    matches!(self, BondDataType::Stop | BondDataType::StopBase)
  }

  pub fn is_container(self) -> bool {
    matches!(self, BondDataType::List | BondDataType::Set | BondDataType::Map)
  }

  /// Whether a value encoded as `self` can be read into a field declared as `target`.
  pub fn promotes_to(self, target: BondDataType) -> bool {
    use BondDataType::*;
    if self == target {
      return true;
    }
    match (self, target) {
      (UInt8, UInt16 | UInt32 | UInt64) | (UInt16, UInt32 | UInt64) | (UInt32, UInt64) => true,
      (Int8, Int16 | Int32 | Int64) | (Int16, Int32 | Int64) | (Int32, Int64) => true,
      (Float, Double) => true,
      (List, Set) | (Set, List) => true,
      _ => false,
    }
  }
}

/// Header preceding every field value, or a stop marker ending a struct level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldHeader {
  pub data_type: BondDataType,
  pub id: u16,
}

impl FieldHeader {
  pub const fn new(data_type: BondDataType, id: u16) -> Self {
    Self { data_type, id }
  }

  pub const fn stop() -> Self {
    Self::new(BondDataType::Stop, 0)
  }

  pub const fn stop_base() -> Self {
    Self::new(BondDataType::StopBase, 0)
  }
}

/// Header of a list, set or nullable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
  pub element_type: BondDataType,
  pub count: u32,
}

/// Header of a map value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapHeader {
  pub key_type: BondDataType,
  pub value_type: BondDataType,
  pub count: u32,
}
