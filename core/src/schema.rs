//! Runtime schema descriptors.

use std::sync::Arc;

mod field_def;
mod runtime_schema;
mod struct_def;
mod type_def;


pub use {self::field_def::*, self::runtime_schema::*, self::struct_def::*, self::type_def::*};

/// Exports a struct hierarchy as JSON.
pub fn to_json(def: &StructDef) -> Result<String, serde_json::Error> {
  serde_json::to_string(def)
}

/// Imports a struct hierarchy exported by [`to_json`].
pub fn from_json(json: &str) -> Result<Arc<StructDef>, serde_json::Error> {
  serde_json::from_str::<StructDef>(json).map(Arc::new)
}
