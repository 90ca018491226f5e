use std::collections::HashMap;

use super::{DateFormat, RegexExtract, Transformer, Trim};
use crate::error::{MapperError, Result};

type TransformerFactory = Box<dyn Fn() -> Box<dyn Transformer> + Send + Sync>;

/// Registry of transformer factories keyed by the name a mapping declares.
///
/// Resolution constructs a fresh instance per call; nothing is cached
/// between parses.
pub struct TransformerRegistry {
    factories: HashMap<String, TransformerFactory>,
}

impl TransformerRegistry {
    /// Create a registry with the built-in transformers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };

        registry.register("trim", || Box::new(Trim));
        registry.register("regex_extract", || Box::new(RegexExtract));
        registry.register("date_format", || Box::new(DateFormat));

        registry
    }

    /// Register a transformer factory under a name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn Transformer> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    /// Construct a fresh transformer for the given name.
    pub fn resolve(&self, name: &str) -> Result<Box<dyn Transformer>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| MapperError::TransformerResolution(name.to_string()))
    }

    /// List all registered transformer names.
    pub fn list_transformers(&self) -> Vec<&str> {
        self.factories.keys().map(|k| k.as_str()).collect()
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
