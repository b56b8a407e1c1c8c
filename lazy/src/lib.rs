//! Polymorphic, lazily decoded box for schema-typed structs.
//!
//! A [`LazyBox<T>`] holds either a materialized instance or an encoded payload captured
//! by the engine. The payload is decoded as `T` on first access to [`LazyBox::value`],
//! can be viewed as another type through [`LazyBox::convert`] without decoding, and is
//! re-emitted unchanged by [`LazyBox::serialize`].

mod error;
mod lazy_box;

pub use {self::error::*, self::lazy_box::*};
