use std::env;
use std::sync::Arc;

use bondbox_core_rs::bonded::{BondedBox, BondedFactoryRegistry, BondedSource};
use bondbox_core_rs::error::{DeserializationError, RegistryError, SerializationError};
use bondbox_core_rs::protocol::{BondDataType, FieldHeader, ProtocolReader, ProtocolWriter, TokenWriter};
use bondbox_core_rs::schema::{RuntimeSchema, StructDef, TypeDef};
use bondbox_core_rs::serialization::{write_field, write_struct, BondStruct, DeserializeContext, FieldType};
use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

use crate::{BondedError, LazyBox};

static COUNTER_DEF: Lazy<Arc<StructDef>> = Lazy::new(|| {
  StructDef::builder("Counter", "bondbox.unit.Counter")
    .field(0, "hits", TypeDef::of(BondDataType::UInt32))
    .build()
});

static GAUGE_DEF: Lazy<Arc<StructDef>> = Lazy::new(|| {
  StructDef::builder("Gauge", "bondbox.unit.Gauge")
    .field(0, "level", TypeDef::of(BondDataType::Double))
    .build()
});

#[derive(Debug, Clone, Default, PartialEq)]
struct Counter {
  hits: u32,
}

impl BondStruct for Counter {
  fn struct_def() -> Arc<StructDef> {
    COUNTER_DEF.clone()
  }

  fn level_def(&self) -> Arc<StructDef> {
    Self::struct_def()
  }

  fn write_fields(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    write_field(writer, 0, &self.hits)
  }

  fn read_field(
    &mut self,
    header: FieldHeader,
    reader: &mut dyn ProtocolReader,
    ctx: &DeserializeContext,
  ) -> Result<bool, DeserializationError> {
    match header.id {
      0 => self.hits = u32::read_value(reader, header.data_type, ctx)?,
      _ => return Ok(false),
    }
    Ok(true)
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Gauge {
  level: f64,
}

impl BondStruct for Gauge {
  fn struct_def() -> Arc<StructDef> {
    GAUGE_DEF.clone()
  }

  fn level_def(&self) -> Arc<StructDef> {
    Self::struct_def()
  }

  fn write_fields(&self, writer: &mut dyn ProtocolWriter) -> Result<(), SerializationError> {
    write_field(writer, 0, &self.level)
  }

  fn read_field(
    &mut self,
    header: FieldHeader,
    reader: &mut dyn ProtocolReader,
    ctx: &DeserializeContext,
  ) -> Result<bool, DeserializationError> {
    match header.id {
      0 => self.level = f64::read_value(reader, header.data_type, ctx)?,
      _ => return Ok(false),
    }
    Ok(true)
  }
}

fn token_source(value: &dyn BondStruct) -> BondedSource {
  let mut writer = TokenWriter::new();
  write_struct(value, &mut writer).unwrap();
  BondedSource::new(
    Box::new(writer.into_reader().unwrap()),
    RuntimeSchema::from(value.level_def()),
    DeserializeContext::default(),
  )
}

#[test]
fn test_materialized_value() {
  env::set_var("RUST_LOG", "debug");
  let _ = tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .try_init();

  let boxed = LazyBox::<Counter>::from(Counter { hits: 3 });
  assert!(!boxed.is_realized());
  assert_eq!(boxed.value().unwrap(), &Counter { hits: 3 });
  assert!(boxed.is_realized());
}

#[test]
fn test_deferred_value() {
  let boxed = LazyBox::<Counter>::from_source(token_source(&Counter { hits: 8 }));
  assert!(boxed.is_deferred());
  assert_eq!(boxed.value().unwrap().hits, 8);
}

#[test]
fn test_unrelated_materialized_view_is_unsupported() {
  let boxed = LazyBox::<Counter>::from(Gauge { level: 1.0 });
  assert_eq!(
    boxed.decode::<Counter>(),
    Err(BondedError::UnsupportedConversion {
      from: "bondbox.unit.Gauge".to_string(),
      to: "bondbox.unit.Counter".to_string(),
    })
  );
  assert_eq!(boxed.convert::<Gauge>().value().unwrap().level, 1.0);
}

#[test]
fn test_deferred_payload_checked_against_its_schema() {
  let boxed = LazyBox::<Counter>::from_source(token_source(&Gauge { level: 0.5 }));
  match boxed.value() {
    Err(BondedError::TypeMismatch { view, .. }) => assert_eq!(view, "bondbox.unit.Counter"),
    other => panic!("unexpected result: {other:?}"),
  }
}

#[test]
fn test_serialize_failure_is_reported() {
  struct Refusing;

  impl ProtocolWriter for Refusing {
    fn protocol(&self) -> bondbox_core_rs::protocol::ProtocolType {
      bondbox_core_rs::protocol::ProtocolType::TokenStream
    }

    fn write_struct_begin(&mut self) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_base_end(&mut self) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_struct_end(&mut self) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_field_begin(&mut self, _: BondDataType, id: u16) -> Result<(), SerializationError> {
      Err(SerializationError::FieldRejected {
        id,
        reason: "read only".to_string(),
      })
    }

    fn write_container_begin(&mut self, _: u32, _: BondDataType) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_map_begin(&mut self, _: u32, _: BondDataType, _: BondDataType) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_bool(&mut self, _: bool) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_u8(&mut self, _: u8) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_u16(&mut self, _: u16) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_u32(&mut self, _: u32) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_u64(&mut self, _: u64) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_i8(&mut self, _: i8) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_i16(&mut self, _: i16) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_i32(&mut self, _: i32) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_i64(&mut self, _: i64) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_f32(&mut self, _: f32) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_f64(&mut self, _: f64) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_string(&mut self, _: &str) -> Result<(), SerializationError> {
      Ok(())
    }

    fn write_wstring(&mut self, _: &str) -> Result<(), SerializationError> {
      Ok(())
    }
  }

  let boxed = LazyBox::<Counter>::from(Counter { hits: 1 });
  let result = boxed.serialize(&mut Refusing);
  assert!(matches!(
    result,
    Err(BondedError::Serialization(SerializationError::FieldRejected { id: 0, .. }))
  ));
  assert!(!boxed.is_realized());
}

#[test]
fn test_engine_capabilities() {
  let boxed = <LazyBox<Counter> as BondedBox>::from_instance(Counter { hits: 5 });
  let viewed: LazyBox<Counter> = BondedBox::convert::<Counter>(&boxed);
  assert_eq!(BondedBox::decode::<Counter>(&viewed), Ok(Counter { hits: 5 }));

  let mut writer = TokenWriter::new();
  BondedBox::serialize(&boxed, &mut writer).unwrap();
  assert!(writer.into_reader().is_ok());
}

#[test]
fn test_register_installs_constructor_once() {
  let registry = BondedFactoryRegistry::new();
  LazyBox::<Counter>::register(&registry).unwrap();
  assert!(registry.contains::<LazyBox<Counter>>());
  assert!(matches!(
    LazyBox::<Counter>::register(&registry),
    Err(RegistryError::DuplicateEntry(_))
  ));

  let built = registry
    .construct::<LazyBox<Counter>>(&token_source(&Counter { hits: 2 }))
    .unwrap();
  assert!(built.is_deferred());
  assert_eq!(built.value().unwrap().hits, 2);
}

#[test]
fn test_debug_shows_state() {
  let boxed = LazyBox::<Counter>::from(Counter { hits: 1 });
  let text = format!("{boxed:?}");
  assert!(text.contains("bondbox.unit.Counter"));
  assert!(text.contains("realized: false"));
}
