//! Declarative XPath-mapping engine: projects XML documents into typed or
//! generic records according to a named mapping specification.

pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod mapper;
pub mod mapping;
pub mod persistence;
pub mod query;
pub mod record;
pub mod registry;
pub mod transform;

pub use config::MappingConfig;
pub use error::{MapperError, Result};
pub use mapper::Mapper;
pub use mapping::{FieldSource, LeafSource, MappingSpec, MappingTable, TransformerConfig};
pub use persistence::{PersistenceOracle, StaticOracle};
pub use record::{CollectionKind, FieldMap, MappedRecord, Parsed, Record, RecordSet, Value};
pub use registry::TargetRegistry;
pub use transform::{Transformer, TransformerRegistry};
