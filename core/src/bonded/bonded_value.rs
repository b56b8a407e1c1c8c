use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::bonded::{BondedBox, BondedSource};
use crate::error::{DeserializationError, SerializationError};
use crate::protocol::ProtocolWriter;
use crate::serialization::{write_struct, BondStruct, Cloner, DeserializeContext};

#[derive(Clone)]
enum Payload {
  Instance(Arc<dyn BondStruct>, DeserializeContext),
  Source(BondedSource),
}

/// The engine's own bonded box: either an instance or a captured source, decoded on
/// every call.
pub struct Bonded<T> {
  payload: Payload,
  _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Bonded<T> {
  fn clone(&self) -> Self {
    Self {
      payload: self.payload.clone(),
      _marker: PhantomData,
    }
  }
}

impl<T: BondStruct + Default> Default for Bonded<T> {
  fn default() -> Self {
    Self::from_instance(T::default())
  }
}

impl<T: BondStruct + Default> Bonded<T> {
  pub fn deserialize(&self) -> Result<T, DeserializationError> {
    self.decode::<T>()
  }

  /// Instance box whose decodes run under `context` instead of the default one.
  pub fn with_context<A: BondStruct>(instance: A, context: DeserializeContext) -> Self {
    Self {
      payload: Payload::Instance(Arc::new(instance), context),
      _marker: PhantomData,
    }
  }

  pub fn is_deferred(&self) -> bool {
    matches!(self.payload, Payload::Source(_))
  }

  fn retyped<U>(&self) -> Bonded<U> {
    Bonded {
      payload: self.payload.clone(),
      _marker: PhantomData,
    }
  }
}

impl<T: BondStruct + Default> BondedBox for Bonded<T> {
  type Error = DeserializationError;
  type Retyped<U: BondStruct + Default> = Bonded<U>;

  fn from_source(source: BondedSource) -> Self {
    Self {
      payload: Payload::Source(source),
      _marker: PhantomData,
    }
  }

  fn from_instance<A: BondStruct>(instance: A) -> Self {
    Self::with_context(instance, DeserializeContext::default())
  }

  fn decode<U: BondStruct + Default>(&self) -> Result<U, DeserializationError> {
    match &self.payload {
      Payload::Instance(instance, context) => Cloner::<U>::new(context.clone()).copy_from(instance.as_ref()),
      Payload::Source(source) => source.deserialize::<U>(),
    }
  }

  fn convert<U: BondStruct + Default>(&self) -> Bonded<U> {
    self.retyped()
  }

  fn serialize(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    match &self.payload {
      Payload::Instance(instance, _) => write_struct(instance.as_ref(), writer),
      Payload::Source(source) => source.transcode(writer),
    }
  }
}

impl<T> Debug for Bonded<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut debug = f.debug_struct("Bonded");
    match &self.payload {
      Payload::Instance(instance, _) => debug.field("instance", &instance.level_def().qualified_name),
      Payload::Source(source) => debug.field("source", source),
    };
    debug.finish()
  }
}
