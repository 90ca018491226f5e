use std::collections::HashMap;

use crate::error::{MapperError, Result};
use crate::record::MappedRecord;

type TargetFactory = Box<dyn Fn() -> Box<dyn MappedRecord> + Send + Sync>;

/// Registry of typed mapping targets: type identifier -> factory producing
/// an empty record instance. Populated at wiring time, read-only after.
#[derive(Default)]
pub struct TargetRegistry {
    factories: HashMap<String, TargetFactory>,
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a target type.
    pub fn register<F>(&mut self, type_id: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn MappedRecord> + Send + Sync + 'static,
    {
        self.factories.insert(type_id.into(), Box::new(factory));
    }

    /// Construct a fresh, empty instance of the given target type.
    pub fn instantiate(&self, type_id: &str) -> Result<Box<dyn MappedRecord>> {
        self.factories
            .get(type_id)
            .map(|factory| factory())
            .ok_or_else(|| MapperError::UnknownTarget(type_id.to_string()))
    }

    /// List all registered target type identifiers.
    pub fn list_targets(&self) -> Vec<&str> {
        self.factories.keys().map(|k| k.as_str()).collect()
    }
}
