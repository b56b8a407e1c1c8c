use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::protocol::BondDataType;
use crate::schema::StructDef;

/// Shape of a field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDef {
  pub data_type: BondDataType,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub element: Option<Box<TypeDef>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub key: Option<Box<TypeDef>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub struct_def: Option<Arc<StructDef>>,
  /// Struct payload kept encoded and decoded on demand.
  #[serde(default)]
  pub bonded: bool,
}

impl TypeDef {
  pub fn of(data_type: BondDataType) -> Self {
    Self {
      data_type,
      element: None,
      key: None,
      struct_def: None,
      bonded: false,
    }
  }

  pub fn string() -> Self {
    Self::of(BondDataType::String)
  }

  pub fn list(element: TypeDef) -> Self {
    Self {
      element: Some(Box::new(element)),
      ..Self::of(BondDataType::List)
    }
  }

  pub fn set(element: TypeDef) -> Self {
    Self {
      element: Some(Box::new(element)),
      ..Self::of(BondDataType::Set)
    }
  }

  pub fn map(key: TypeDef, value: TypeDef) -> Self {
    Self {
      key: Some(Box::new(key)),
      element: Some(Box::new(value)),
      ..Self::of(BondDataType::Map)
    }
  }

  pub fn structure(def: Arc<StructDef>) -> Self {
    Self {
      struct_def: Some(def),
      ..Self::of(BondDataType::Struct)
    }
  }

  pub fn bonded(def: Arc<StructDef>) -> Self {
    Self {
      bonded: true,
      ..Self::structure(def)
    }
  }
}
