use std::sync::Arc;

use crate::error::{DeserializationError, SerializationError};
use crate::protocol::{FieldHeader, ProtocolReader, ProtocolWriter};
use crate::schema::StructDef;
use crate::serialization::DeserializeContext;

/// A schema-typed struct the engine can write, read, transcode and clone.
///
/// Each implementation describes one level of a hierarchy. A derived struct owns its
/// base as a field and exposes it through [`BondStruct::base`]/[`BondStruct::base_mut`];
/// the engine walks the chain so the base levels are encoded first.
pub trait BondStruct: Send + Sync + 'static {
  /// Static schema of the type, including its bases.
  fn struct_def() -> Arc<StructDef>
  where
    Self: Sized;

  /// Schema of the concrete type behind `self`.
  fn level_def(&self) -> Arc<StructDef>;

  fn base(&self) -> Option<&dyn BondStruct> {
    None
  }

  fn base_mut(&mut self) -> Option<&mut dyn BondStruct> {
    None
  }

  /// Writes the fields declared on this level only.
  fn write_fields(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError>;

  /// Reads one field of this level.
  ///
  /// Returns `Ok(false)` for ids this level does not know; the engine skips them.
  fn read_field(
    &mut self,
    header: FieldHeader,
    reader: &mut dyn ProtocolReader,
    ctx: &DeserializeContext,
  ) -> Result<bool, DeserializationError>;
}
