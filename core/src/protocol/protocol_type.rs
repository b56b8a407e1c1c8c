use serde::{Deserialize, Serialize};

/// Marshaling magic of the Fast Binary protocol ("FM").
pub const FAST_PROTOCOL_MAGIC: u16 = 0x4D46;
/// Marshaling magic of the Compact Binary protocol ("CB").
pub const COMPACT_PROTOCOL_MAGIC: u16 = 0x4243;

pub const FAST_PROTOCOL_VERSION: u16 = 1;
pub const COMPACT_PROTOCOL_VERSION_1: u16 = 1;
pub const COMPACT_PROTOCOL_VERSION_2: u16 = 2;

/// Identifies a wire protocol together with its version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, Serialize, Deserialize)]
pub enum ProtocolType {
  FastBinary,
  CompactBinary { version: u16 },
  /// In-memory token stream; never marshaled.
  TokenStream,
}

impl ProtocolType {
  pub const fn compact_v1() -> Self {
    ProtocolType::CompactBinary {
      version: COMPACT_PROTOCOL_VERSION_1,
    }
  }

  pub const fn compact_v2() -> Self {
    ProtocolType::CompactBinary {
      version: COMPACT_PROTOCOL_VERSION_2,
    }
  }

  /// Magic and version written in a marshaled payload header.
  pub fn marshal_header(self) -> Option<(u16, u16)> {
    match self {
      ProtocolType::FastBinary => Some((FAST_PROTOCOL_MAGIC, FAST_PROTOCOL_VERSION)),
      ProtocolType::CompactBinary { version } => Some((COMPACT_PROTOCOL_MAGIC, version)),
      ProtocolType::TokenStream => None,
    }
  }

  pub fn from_marshal_header(magic: u16, version: u16) -> Option<Self> {
    match (magic, version) {
      (FAST_PROTOCOL_MAGIC, FAST_PROTOCOL_VERSION) => Some(ProtocolType::FastBinary),
      (COMPACT_PROTOCOL_MAGIC, COMPACT_PROTOCOL_VERSION_1 | COMPACT_PROTOCOL_VERSION_2) => {
        Some(ProtocolType::CompactBinary { version })
      }
      _ => None,
    }
  }
}
