use std::any::{Any, TypeId};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::bonded::{BondedBox, BondedSource};
use crate::error::RegistryError;

type Construct = Arc<dyn Fn(BondedSource) -> Box<dyn Any + Send> + Send + Sync>;

#[derive(Clone)]
struct BondedConstructor {
  type_name: &'static str,
  construct: Construct,
}

/// Constructors the engine calls instead of [`BondedBox::from_source`] when it meets a
/// bonded field of a registered box type.
///
/// Clones share the same entries.
#[derive(Clone, Default)]
pub struct BondedFactoryRegistry {
  inner: Arc<DashMap<TypeId, BondedConstructor>>,
}

impl BondedFactoryRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register<B, F>(&self, construct: F) -> Result<(), RegistryError>
  where
    B: BondedBox,
    F: Fn(BondedSource) -> B + Send + Sync + 'static, {
    let type_name = std::any::type_name::<B>();
    match self.inner.entry(TypeId::of::<B>()) {
      Entry::Occupied(_) => Err(RegistryError::DuplicateEntry(type_name.to_string())),
      Entry::Vacant(entry) => {
        entry.insert(BondedConstructor {
          type_name,
          construct: Arc::new(move |source| Box::new(construct(source)) as Box<dyn Any + Send>),
        });
        tracing::debug!(type_name, "registered bonded constructor");
        Ok(())
      }
    }
  }

  pub fn contains<B: BondedBox>(&self) -> bool {
    self.inner.contains_key(&TypeId::of::<B>())
  }

  pub fn len(&self) -> usize {
    self.inner.len()
  }

  pub fn is_empty(&self) -> bool {
    self.inner.is_empty()
  }

  /// Builds `B` from `source` with the registered constructor, if any.
  pub fn construct<B: BondedBox>(&self, source: &BondedSource) -> Option<B> {
    let constructor = match self.inner.get(&TypeId::of::<B>()) {
      Some(entry) => entry.value().clone(),
      None => {
        tracing::trace!(type_name = std::any::type_name::<B>(), "no bonded constructor registered");
        return None;
      }
    };
    tracing::trace!(type_name = constructor.type_name, "constructing bonded value through registry");
    match (constructor.construct)(source.clone()).downcast::<B>() {
      Ok(value) => Some(*value),
      Err(_) => {
        tracing::warn!(type_name = constructor.type_name, "registered constructor returned another type");
        None
      }
    }
  }
}

impl Debug for BondedFactoryRegistry {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let entries = self
      .inner
      .iter()
      .map(|entry| entry.value().type_name)
      .collect::<Vec<_>>();
    f.debug_struct("BondedFactoryRegistry").field("entries", &entries).finish()
  }
}
