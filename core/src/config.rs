use crate::config_option::ConfigOption;
use crate::protocol::ProtocolType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub default_protocol: ProtocolType,
  pub max_depth: usize,
  pub max_container_len: usize,
  pub max_string_len: usize,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      default_protocol: ProtocolType::compact_v1(),
      max_depth: 64,
      max_container_len: 16 * 1024 * 1024,
      max_string_len: 64 * 1024 * 1024,
    }
  }
}

impl Config {
  pub fn from(options: impl IntoIterator<Item = ConfigOption>) -> Config {
    let mut config = Config::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }
}
