//! Tagged wire protocols and the reader/writer abstractions they implement.

mod compact_binary;
mod data_type;
mod fast_binary;
mod input_buffer;
mod output_buffer;
mod protocol_type;
pub mod reader;
mod token_stream;
pub mod writer;


pub use {
  self::compact_binary::*, self::data_type::*, self::fast_binary::*, self::input_buffer::*, self::output_buffer::*,
  self::protocol_type::*, self::reader::ProtocolReader, self::token_stream::*, self::writer::ProtocolWriter,
};
