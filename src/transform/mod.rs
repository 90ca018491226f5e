// Transformer capability and the registry that resolves transformers by
// name at parse time.
pub mod registry;

// Built-in transformer implementations
pub mod date_format;
pub mod regex_extract;
pub mod trim;

use anyhow::Result;

use crate::mapping::TransformerConfig;
use crate::record::Value;

pub use date_format::DateFormat;
pub use regex_extract::RegexExtract;
pub use registry::TransformerRegistry;
pub use trim::Trim;

/// Post-processing hook applied to a leaf value after extraction.
///
/// Implementations receive the raw value (`Text` or `Null`) plus the
/// free-form configuration declared next to the field, and return the value
/// to store. Failures abort the whole parse.
pub trait Transformer: Send + Sync {
    fn process(&self, value: Value, config: &TransformerConfig) -> Result<Value>;
}
