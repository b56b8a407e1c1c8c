use crate::error::{DeserializationError, SerializationError};
use crate::protocol::{BondDataType, ProtocolReader, ProtocolWriter};
use crate::schema::{RuntimeSchema, StructDef, TypeDef};
use crate::serialization::DeserializeContext;

/// Copies one encoded struct from a reader to a writer of any protocol without
/// materializing it.
#[derive(Debug, Clone)]
pub struct Transcoder {
  schema: RuntimeSchema,
  context: DeserializeContext,
}

impl Transcoder {
  pub fn new(schema: RuntimeSchema, context: DeserializeContext) -> Self {
    Self { schema, context }
  }

  pub fn transcode(
    &self,
    reader: &mut dyn ProtocolReader,
    writer: &mut dyn ProtocolWriter,
  ) -> Result<(), SerializationError> {
    tracing::trace!(
      from = %reader.protocol(),
      to = %writer.protocol(),
      schema = self.schema.struct_def().map(|def| def.qualified_name.as_str()),
      "transcoding struct"
    );
    let mut pass = Pass {
      reader,
      writer,
      context: &self.context,
    };
    pass.transcode_struct(self.schema.struct_def().map(|def| def.as_ref()), self.context.depth())
  }
}

struct Pass<'a> {
  reader: &'a mut dyn ProtocolReader,
  writer: &'a mut dyn ProtocolWriter,
  context: &'a DeserializeContext,
}

impl Pass<'_> {
  fn enter(&self, depth: usize) -> Result<usize, SerializationError> {
    let depth = depth + 1;
    let max_depth = self.context.config().max_depth;
    if depth > max_depth {
      return Err(SerializationError::DepthLimitExceeded(max_depth));
    }
    Ok(depth)
  }

  fn transcode_struct(&mut self, schema: Option<&StructDef>, depth: usize) -> Result<(), SerializationError> {
    let depth = self.enter(depth)?;
    let levels = schema.map(|def| def.levels()).unwrap_or_default();
    let mut level = 0;
    self.reader.read_struct_begin()?;
    self.writer.write_struct_begin()?;
    loop {
      let header = self.reader.read_field_begin()?;
      match header.data_type {
        BondDataType::Stop => {
          self.writer.write_struct_end()?;
          break;
        }
        BondDataType::StopBase => {
          self.writer.write_base_end()?;
          level += 1;
        }
        data_type => {
          let level_def = levels.get(level).copied();
          let field = level_def.and_then(|def| def.field(header.id));
          if let (Some(def), Some(field)) = (level_def, field) {
            if field.type_def.data_type != data_type {
              tracing::warn!(struct_name = %def.qualified_name, id = header.id, "payload does not match schema");
              return Err(SerializationError::SchemaMismatch {
                struct_name: def.qualified_name.clone(),
                id: header.id,
                expected: field.type_def.data_type,
                actual: data_type,
              });
            }
          }
          self.writer.write_field_begin(data_type, header.id)?;
          self.transcode_value(data_type, field.map(|field| &field.type_def), depth)?;
          self.reader.read_field_end()?;
          self.writer.write_field_end()?;
        }
      }
    }
    self.reader.read_struct_end()?;
    Ok(())
  }

  fn transcode_value(
    &mut self,
    data_type: BondDataType,
    type_def: Option<&TypeDef>,
    depth: usize,
  ) -> Result<(), SerializationError> {
    let reader = &mut *self.reader;
    let writer = &mut *self.writer;
    let max_string_len = self.context.config().max_string_len;
    match data_type {
      BondDataType::Bool => writer.write_bool(reader.read_bool()?),
      BondDataType::UInt8 => writer.write_u8(reader.read_u8()?),
      BondDataType::UInt16 => writer.write_u16(reader.read_u16()?),
      BondDataType::UInt32 => writer.write_u32(reader.read_u32()?),
      BondDataType::UInt64 => writer.write_u64(reader.read_u64()?),
      BondDataType::Int8 => writer.write_i8(reader.read_i8()?),
      BondDataType::Int16 => writer.write_i16(reader.read_i16()?),
      BondDataType::Int32 => writer.write_i32(reader.read_i32()?),
      BondDataType::Int64 => writer.write_i64(reader.read_i64()?),
      BondDataType::Float => writer.write_f32(reader.read_f32()?),
      BondDataType::Double => writer.write_f64(reader.read_f64()?),
      BondDataType::String => writer.write_string(&reader.read_string_bounded(max_string_len)?),
      BondDataType::WString => writer.write_wstring(&reader.read_wstring_bounded(max_string_len)?),
      BondDataType::Struct => self.transcode_struct(type_def.and_then(|def| def.struct_def.as_deref()), depth),
      BondDataType::List | BondDataType::Set => {
        let header = reader.read_container_begin()?;
        let count = self.context.check_container_len(header.count)?;
        writer.write_container_begin(header.count, header.element_type)?;
        let element = type_def.and_then(|def| def.element.as_deref());
        let depth = self.enter(depth)?;
        for _ in 0..count {
          self.transcode_value(header.element_type, element, depth)?;
        }
        self.reader.read_container_end()?;
        self.writer.write_container_end()
      }
      BondDataType::Map => {
        let header = reader.read_map_begin()?;
        let count = self.context.check_container_len(header.count)?;
        writer.write_map_begin(header.count, header.key_type, header.value_type)?;
        let key = type_def.and_then(|def| def.key.as_deref());
        let value = type_def.and_then(|def| def.element.as_deref());
        let depth = self.enter(depth)?;
        for _ in 0..count {
          self.transcode_value(header.key_type, key, depth)?;
          self.transcode_value(header.value_type, value, depth)?;
        }
        self.reader.read_container_end()?;
        self.writer.write_container_end()
      }
      BondDataType::Stop | BondDataType::StopBase => Err(
        DeserializationError::malformed(format!("{data_type} is not a value type")).into(),
      ),
    }
  }
}
