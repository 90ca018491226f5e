use anyhow::Result;

use super::Transformer;
use crate::mapping::TransformerConfig;
use crate::record::Value;

/// Strips surrounding whitespace from text values. Extracted text is kept
/// untrimmed by the engine, so mappings opt into trimming per field.
pub struct Trim;

impl Transformer for Trim {
    fn process(&self, value: Value, _config: &TransformerConfig) -> Result<Value> {
        Ok(match value {
            Value::Text(text) => Value::Text(text.trim().to_string()),
            other => other,
        })
    }
}
