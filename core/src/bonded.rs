//! Deferred ("bonded") struct values and the factory hook the engine consults when it
//! meets a bonded field.

mod bonded_box;
mod bonded_source;
mod bonded_value;
mod factory;

pub use {self::bonded_box::*, self::bonded_source::*, self::bonded_value::*, self::factory::*};
