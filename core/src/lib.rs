//! Schema-driven serialization engine: tagged binary protocols, runtime schemas and
//! deferred ("bonded") struct values.

pub mod bonded;
pub mod config;
pub mod config_option;
pub mod error;
#[cfg(test)]
mod fixtures;
pub mod marshal;
pub mod protocol;
pub mod schema;
pub mod serialization;

pub use bonded::*;
pub use config::*;
pub use config_option::*;
pub use error::*;
pub use serialization::*;
