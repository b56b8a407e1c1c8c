use std::any::type_name;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use bondbox_core_rs::bonded::{BondedBox, BondedFactoryRegistry, BondedSource};
use bondbox_core_rs::error::{RegistryError, SerializationError};
use bondbox_core_rs::protocol::ProtocolWriter;
use bondbox_core_rs::serialization::{write_struct, BondStruct, Cloner, DeserializeContext};
use once_cell::sync::OnceCell;

use crate::error::BondedError;

#[cfg(test)]
mod tests;

#[derive(Clone)]
enum Source {
  /// Materialized value of the concrete type it was created with, plus the context its
  /// decodes run under.
  Instance(Arc<dyn BondStruct>, DeserializeContext),
  /// Encoded payload, decoded on demand.
  Deferred(BondedSource),
}

/// Box viewing a stored struct as `T`.
///
/// The first successful [`value`](LazyBox::value) call decodes the source and caches the
/// result; later calls and concurrent callers get the same value. Failed decodes are not
/// cached. [`decode`](LazyBox::decode) never touches the cache.
#[derive(Clone)]
pub struct LazyBox<T> {
  source: Source,
  cache: OnceCell<T>,
}

impl<T: BondStruct + Default> Default for LazyBox<T> {
  fn default() -> Self {
    Self::empty()
  }
}

impl<T: BondStruct + Default> LazyBox<T> {
  /// Box holding `T::default()`, already realized.
  pub fn empty() -> Self {
    Self {
      source: Source::Instance(Arc::new(T::default()), DeserializeContext::default()),
      cache: OnceCell::with_value(T::default()),
    }
  }

  /// Box over a materialized instance of any type.
  ///
  /// Nothing is checked here; an instance unrelated to `T` fails on first decode.
  pub fn from<A: BondStruct>(instance: A) -> Self {
    Self::with_context(instance, DeserializeContext::default())
  }

  /// Like [`from`](LazyBox::from), but decodes run under `context`, so nested bonded
  /// fields are built through its factory registry.
  pub fn with_context<A: BondStruct>(instance: A, context: DeserializeContext) -> Self {
    Self {
      source: Source::Instance(Arc::new(instance), context),
      cache: OnceCell::new(),
    }
  }

  pub fn from_source(source: BondedSource) -> Self {
    Self {
      source: Source::Deferred(source),
      cache: OnceCell::new(),
    }
  }

  /// Decoded view of the box, computed once.
  pub fn value(&self) -> Result<&T, BondedError> {
    self.cache.get_or_try_init(|| {
      let value = self.decode::<T>()?;
      tracing::trace!(view = type_name::<T>(), deferred = self.is_deferred(), "realized lazy box");
      Ok(value)
    })
  }

  /// Decodes the source as `U`. The result is not cached.
  pub fn decode<U: BondStruct + Default>(&self) -> Result<U, BondedError> {
    let view = U::struct_def();
    match &self.source {
      Source::Instance(instance, context) => {
        let stored = instance.level_def();
        if !stored.is_related_to(&view) {
          return Err(BondedError::UnsupportedConversion {
            from: stored.qualified_name.clone(),
            to: view.qualified_name.clone(),
          });
        }
        Cloner::<U>::new(context.clone())
          .copy_from(instance.as_ref())
          .map_err(|source| BondedError::TypeMismatch {
            view: view.qualified_name.clone(),
            source,
          })
      }
      Source::Deferred(deferred) => deferred
        .deserialize::<U>()
        .map_err(|source| BondedError::TypeMismatch {
          view: view.qualified_name.clone(),
          source,
        }),
    }
  }

  /// Views the same source as `U`, with an empty cache.
  pub fn convert<U: BondStruct + Default>(&self) -> LazyBox<U> {
    LazyBox {
      source: self.source.clone(),
      cache: OnceCell::new(),
    }
  }

  /// Writes the stored value with its original shape.
  pub fn serialize(&self, writer: &mut dyn ProtocolWriter) -> Result<(), BondedError> {
    self.write_to(writer).map_err(BondedError::from)
  }

  pub fn is_realized(&self) -> bool {
    self.cache.get().is_some()
  }

  pub fn is_deferred(&self) -> bool {
    matches!(self.source, Source::Deferred(_))
  }

  /// Makes the engine build `LazyBox<T>` for every `LazyBox<T>` field it reads through a
  /// context sharing `registry`.
  pub fn register(registry: &BondedFactoryRegistry) -> Result<(), RegistryError> {
    registry.register(LazyBox::<T>::from_source)
  }

  fn write_to(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    match &self.source {
      Source::Instance(instance, _) => write_struct(instance.as_ref(), writer),
      Source::Deferred(deferred) => deferred.transcode(writer),
    }
  }
}

impl<T: BondStruct + Default> BondedBox for LazyBox<T> {
  type Error = BondedError;
  type Retyped<U: BondStruct + Default> = LazyBox<U>;

  fn from_source(source: BondedSource) -> Self {
    LazyBox::from_source(source)
  }

  fn from_instance<A: BondStruct>(instance: A) -> Self {
    LazyBox::from(instance)
  }

  fn decode<U: BondStruct + Default>(&self) -> Result<U, BondedError> {
    LazyBox::decode(self)
  }

  fn convert<U: BondStruct + Default>(&self) -> LazyBox<U> {
    LazyBox::convert(self)
  }

  fn serialize(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    self.write_to(writer)
  }
}

impl<T> Debug for LazyBox<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut debug = f.debug_struct("LazyBox");
    debug.field("view", &type_name::<T>());
    match &self.source {
      Source::Instance(instance, _) => debug.field("instance", &instance.level_def().qualified_name),
      Source::Deferred(source) => debug.field("source", source),
    };
    debug.field("realized", &self.cache.get().is_some()).finish()
  }
}
