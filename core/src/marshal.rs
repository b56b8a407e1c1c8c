//! Self-describing payloads: a protocol header followed by the encoded struct.
//!
//! The header is the protocol magic and version, both `u16` little endian.

use crate::bonded::BondedSource;
use crate::config::Config;
use crate::error::{DeserializationError, SerializationError};
use crate::protocol::{
  CompactBinaryReader, CompactBinaryWriter, FastBinaryReader, FastBinaryWriter, InputBuffer, ProtocolReader,
  ProtocolType,
};
use crate::schema::RuntimeSchema;
use crate::serialization::{write_struct, BondStruct, DeserializeContext, Deserializer};


/// Encodes `value` with `config.default_protocol`, prefixed by its header.
pub fn marshal(value: &dyn BondStruct, config: &Config) -> Result<Vec<u8>, SerializationError> {
  let protocol = config.default_protocol;
  let payload = match protocol {
    ProtocolType::FastBinary => {
      let mut writer = FastBinaryWriter::new();
      write_struct(value, &mut writer)?;
      writer.into_bytes()
    }
    ProtocolType::CompactBinary { version } => {
      let mut writer = CompactBinaryWriter::with_version(version)?;
      write_struct(value, &mut writer)?;
      writer.into_bytes()?
    }
    ProtocolType::TokenStream => {
      return Err(SerializationError::custom(format!("{protocol} cannot be marshaled")));
    }
  };
  let (magic, version) = protocol
    .marshal_header()
    .ok_or_else(|| SerializationError::custom(format!("{protocol} cannot be marshaled")))?;
  let mut bytes = Vec::with_capacity(payload.len() + 4);
  bytes.extend_from_slice(&magic.to_le_bytes());
  bytes.extend_from_slice(&version.to_le_bytes());
  bytes.extend_from_slice(&payload);
  Ok(bytes)
}

/// Reads the header of a marshaled payload and returns a reader positioned at the struct.
pub fn marshaled_reader(bytes: impl Into<InputBuffer>) -> Result<Box<dyn ProtocolReader>, DeserializationError> {
  let mut input: InputBuffer = bytes.into();
  let magic = u16::from_le_bytes(input.read_array()?);
  let version = u16::from_le_bytes(input.read_array()?);
  match ProtocolType::from_marshal_header(magic, version) {
    Some(ProtocolType::FastBinary) => Ok(Box::new(FastBinaryReader::new(input))),
    Some(ProtocolType::CompactBinary { version }) => Ok(Box::new(CompactBinaryReader::with_version(input, version)?)),
    _ => Err(DeserializationError::UnsupportedProtocol { magic, version }),
  }
}

pub fn unmarshal<T: BondStruct + Default>(
  bytes: impl Into<InputBuffer>,
  ctx: &DeserializeContext,
) -> Result<T, DeserializationError> {
  let mut reader = marshaled_reader(bytes)?;
  Deserializer::<T>::new(RuntimeSchema::empty(), ctx.clone()).deserialize(reader.as_mut())
}

/// Wraps a marshaled payload as a deferred source without decoding it.
pub fn unmarshal_bonded(
  bytes: impl Into<InputBuffer>,
  schema: RuntimeSchema,
  ctx: &DeserializeContext,
) -> Result<BondedSource, DeserializationError> {
  let reader = marshaled_reader(bytes)?;
  Ok(BondedSource::new(reader, schema, ctx.clone()))
}
