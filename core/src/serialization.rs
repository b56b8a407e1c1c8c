mod bond_struct;
mod cloner;
mod context;
mod deserializer;
mod field_type;
mod serializer;
mod transcoder;

pub use {
  self::bond_struct::*, self::cloner::*, self::context::*, self::deserializer::*, self::field_type::*,
  self::serializer::*, self::transcoder::*,
};
