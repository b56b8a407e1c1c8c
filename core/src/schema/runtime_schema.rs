use std::sync::Arc;

use crate::schema::StructDef;
use crate::serialization::BondStruct;

/// Optional schema of an encoded payload.
///
/// An empty schema means the payload shape is taken from the target type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeSchema(Option<Arc<StructDef>>);

impl RuntimeSchema {
  pub const fn empty() -> Self {
    RuntimeSchema(None)
  }

  pub fn of<T: BondStruct>() -> Self {
    RuntimeSchema(Some(T::struct_def()))
  }

  pub fn has_value(&self) -> bool {
    self.0.is_some()
  }

  pub fn struct_def(&self) -> Option<&Arc<StructDef>> {
    self.0.as_ref()
  }

  /// Level `index` of the described hierarchy, root base first.
  pub fn level(&self, index: usize) -> Option<&StructDef> {
    self.0.as_deref().and_then(|def| def.levels().get(index).copied())
  }
}

impl From<Arc<StructDef>> for RuntimeSchema {
  fn from(value: Arc<StructDef>) -> Self {
    RuntimeSchema(Some(value))
  }
}

impl From<Option<Arc<StructDef>>> for RuntimeSchema {
  fn from(value: Option<Arc<StructDef>>) -> Self {
    RuntimeSchema(value)
  }
}
