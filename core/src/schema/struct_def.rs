use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::schema::{FieldDef, Modifier, TypeDef};

/// Runtime description of one struct level and, through `base`, of its ancestors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDef {
  pub name: String,
  pub qualified_name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub base: Option<Arc<StructDef>>,
  #[serde(default)]
  pub fields: Vec<FieldDef>,
}

impl StructDef {
  pub fn builder(name: impl Into<String>, qualified_name: impl Into<String>) -> StructDefBuilder {
    StructDefBuilder {
      def: StructDef {
        name: name.into(),
        qualified_name: qualified_name.into(),
        base: None,
        fields: Vec::new(),
      },
    }
  }

  /// Field declared on this level.
  pub fn field(&self, id: u16) -> Option<&FieldDef> {
    self.fields.iter().find(|field| field.id == id)
  }

  /// All levels from the root base down to `self`.
  pub fn levels(&self) -> Vec<&StructDef> {
    let mut levels = Vec::with_capacity(self.depth());
    let mut current = Some(self);
    while let Some(def) = current {
      levels.push(def);
      current = def.base.as_deref();
    }
    levels.reverse();
    levels
  }

  /// Number of levels in the hierarchy, counting `self`.
  pub fn depth(&self) -> usize {
    1 + self.base.as_ref().map_or(0, |base| base.depth())
  }

  /// Whether `other` is `self` or one of its ancestors.
  pub fn is_same_or_derived_from(&self, other: &StructDef) -> bool {
    let mut current = Some(self);
    while let Some(def) = current {
      if def.qualified_name == other.qualified_name {
        return true;
      }
      current = def.base.as_deref();
    }
    false
  }

  /// Whether either hierarchy contains the other.
  pub fn is_related_to(&self, other: &StructDef) -> bool {
    self.is_same_or_derived_from(other) || other.is_same_or_derived_from(self)
  }

  pub fn required_fields(&self) -> impl Iterator<Item = &FieldDef> {
    self
      .fields
      .iter()
      .filter(|field| field.modifier == Modifier::Required)
  }
}

pub struct StructDefBuilder {
  def: StructDef,
}

impl StructDefBuilder {
  pub fn base(mut self, base: Arc<StructDef>) -> Self {
    self.def.base = Some(base);
    self
  }

  pub fn field(mut self, id: u16, name: impl Into<String>, type_def: TypeDef) -> Self {
    self.def.fields.push(FieldDef::new(id, name, type_def));
    self
  }

  pub fn required_field(mut self, id: u16, name: impl Into<String>, type_def: TypeDef) -> Self {
    self
      .def
      .fields
      .push(FieldDef::new(id, name, type_def).with_modifier(Modifier::Required));
    self
  }

  pub fn build(self) -> Arc<StructDef> {
    Arc::new(self.def)
  }
}
