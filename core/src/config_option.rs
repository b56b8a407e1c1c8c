use crate::config::Config;
use crate::protocol::ProtocolType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOption {
  SetDefaultProtocol(ProtocolType),
  SetMaxDepth(usize),
  SetMaxContainerLen(usize),
  SetMaxStringLen(usize),
}

impl ConfigOption {
  pub(crate) fn apply(&self, config: &mut Config) {
    match self {
      ConfigOption::SetDefaultProtocol(protocol) => {
        config.default_protocol = *protocol;
      }
      ConfigOption::SetMaxDepth(depth) => {
        config.max_depth = *depth;
      }
      ConfigOption::SetMaxContainerLen(len) => {
        config.max_container_len = *len;
      }
      ConfigOption::SetMaxStringLen(len) => {
        config.max_string_len = *len;
      }
    }
  }

  pub fn with_default_protocol(protocol: ProtocolType) -> ConfigOption {
    ConfigOption::SetDefaultProtocol(protocol)
  }

  pub fn with_max_depth(depth: usize) -> ConfigOption {
    ConfigOption::SetMaxDepth(depth)
  }

  pub fn with_max_container_len(len: usize) -> ConfigOption {
    ConfigOption::SetMaxContainerLen(len)
  }

  pub fn with_max_string_len(len: usize) -> ConfigOption {
    ConfigOption::SetMaxStringLen(len)
  }
}
