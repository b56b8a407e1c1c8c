use std::marker::PhantomData;

use crate::error::DeserializationError;
use crate::protocol::reader::skip_struct_levels;
use crate::protocol::{BondDataType, FieldHeader, ProtocolReader};
use crate::schema::{RuntimeSchema, StructDef};
use crate::serialization::{BondStruct, DeserializeContext};

/// Reads values of `T` from any [`ProtocolReader`].
///
/// `schema` describes the payload. When present, every incoming field is checked
/// against the payload level it belongs to; when empty, only `T`'s own schema applies.
#[derive(Debug, Clone)]
pub struct Deserializer<T> {
  schema: RuntimeSchema,
  context: DeserializeContext,
  _marker: PhantomData<fn() -> T>,
}

impl<T: BondStruct + Default> Deserializer<T> {
  pub fn new(schema: RuntimeSchema, context: DeserializeContext) -> Self {
    Self {
      schema,
      context,
      _marker: PhantomData,
    }
  }

  pub fn deserialize(&self, reader: &mut dyn ProtocolReader) -> Result<T, DeserializationError> {
    let mut value = T::default();
    read_struct(&mut value, reader, &self.schema, &self.context)?;
    Ok(value)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelEnd {
  /// `StopBase`: the payload continues with a more derived level.
  More,
  /// `Stop`: the payload struct is complete.
  Last,
}

/// Reads one encoded struct into `value`.
///
/// The payload may have more levels than `value` (the extra derived levels are skipped)
/// or fewer (the missing levels keep their defaults).
pub fn read_struct(
  value: &mut dyn BondStruct,
  reader: &mut dyn ProtocolReader,
  schema: &RuntimeSchema,
  ctx: &DeserializeContext,
) -> Result<(), DeserializationError> {
  let ctx = ctx.nested()?;
  let payload_levels = schema.struct_def().map(|def| def.levels()).unwrap_or_default();
  reader.read_struct_begin()?;
  let (end, _) = read_levels(value, reader, &payload_levels, &ctx)?;
  if end == LevelEnd::More {
    skip_struct_levels(reader, ctx.depth())?;
  }
  reader.read_struct_end()
}

/// Reads a nested struct field of type `T`.
pub fn read_struct_field<T: BondStruct + Default>(
  reader: &mut dyn ProtocolReader,
  header: FieldHeader,
  ctx: &DeserializeContext,
) -> Result<T, DeserializationError> {
  if header.data_type != BondDataType::Struct {
    return Err(DeserializationError::unexpected_type(BondDataType::Struct, header.data_type));
  }
  let mut value = T::default();
  read_struct(&mut value, reader, ctx.field_schema(), ctx)?;
  Ok(value)
}

fn read_levels(
  value: &mut dyn BondStruct,
  reader: &mut dyn ProtocolReader,
  payload_levels: &[&StructDef],
  ctx: &DeserializeContext,
) -> Result<(LevelEnd, usize), DeserializationError> {
  let (end, index) = match value.base_mut() {
    Some(base) => read_levels(base, reader, payload_levels, ctx)?,
    None => (LevelEnd::More, 0),
  };
  let def = value.level_def();
  if end == LevelEnd::Last {
    check_required(&def, &[])?;
    return Ok((LevelEnd::Last, index));
  }
  let end = read_level(value, &def, reader, payload_levels.get(index).copied(), ctx)?;
  Ok((end, index + 1))
}

fn read_level(
  value: &mut dyn BondStruct,
  def: &StructDef,
  reader: &mut dyn ProtocolReader,
  payload_level: Option<&StructDef>,
  ctx: &DeserializeContext,
) -> Result<LevelEnd, DeserializationError> {
  let mut seen = Vec::new();
  loop {
    let header = reader.read_field_begin()?;
    let data_type = match header.data_type {
      BondDataType::Stop => {
        check_required(def, &seen)?;
        return Ok(LevelEnd::Last);
      }
      BondDataType::StopBase => {
        check_required(def, &seen)?;
        return Ok(LevelEnd::More);
      }
      data_type => data_type,
    };

    let payload_field = payload_level.and_then(|level| level.field(header.id));
    if let (Some(level), Some(field)) = (payload_level, payload_field) {
      if field.type_def.data_type != data_type {
        return Err(DeserializationError::SchemaMismatch {
          struct_name: level.qualified_name.clone(),
          id: header.id,
          expected: field.type_def.data_type,
          actual: data_type,
        });
      }
    }

    match def.field(header.id) {
      Some(field) => {
        if !data_type.promotes_to(field.type_def.data_type) {
          return Err(DeserializationError::TypeMismatch {
            struct_name: def.qualified_name.clone(),
            field: field.name.clone(),
            expected: field.type_def.data_type,
            actual: data_type,
          });
        }
        let handled = if data_type == BondDataType::Struct {
          let field_schema = payload_field
            .and_then(|field| field.type_def.struct_def.clone())
            .into();
          value.read_field(header, reader, &ctx.for_field(field_schema))?
        } else {
          value.read_field(header, reader, ctx)?
        };
        if !handled {
          reader.skip(data_type)?;
        }
        seen.push(header.id);
      }
      None => {
        tracing::trace!(struct_name = %def.qualified_name, id = header.id, "skipping unknown field");
        reader.skip(data_type)?;
      }
    }
    reader.read_field_end()?;
  }
}

fn check_required(def: &StructDef, seen: &[u16]) -> Result<(), DeserializationError> {
  match def.required_fields().find(|field| !seen.contains(&field.id)) {
    Some(field) => Err(DeserializationError::MissingRequiredField {
      struct_name: def.qualified_name.clone(),
      field: field.name.clone(),
    }),
    None => Ok(()),
  }
}
