use serde::{Deserialize, Serialize};

use crate::schema::TypeDef;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Modifier {
  #[default]
  Optional,
  Required,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
  pub id: u16,
  pub name: String,
  pub type_def: TypeDef,
  #[serde(default)]
  pub modifier: Modifier,
}

impl FieldDef {
  pub fn new(id: u16, name: impl Into<String>, type_def: TypeDef) -> Self {
    Self {
      id,
      name: name.into(),
      type_def,
      modifier: Modifier::Optional,
    }
  }

  pub fn with_modifier(mut self, modifier: Modifier) -> Self {
    self.modifier = modifier;
    self
  }

  pub fn is_required(&self) -> bool {
    self.modifier == Modifier::Required
  }
}
