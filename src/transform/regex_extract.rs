use anyhow::{anyhow, Context, Result};
use regex::Regex;

use super::Transformer;
use crate::mapping::TransformerConfig;
use crate::record::Value;

/// Extracts a capture group from text values.
///
/// Config: `pattern` (required) and `group` (optional capture index,
/// default 1). No match yields `Null`; an invalid pattern is a processing
/// failure.
pub struct RegexExtract;

impl Transformer for RegexExtract {
    fn process(&self, value: Value, config: &TransformerConfig) -> Result<Value> {
        let text = match &value {
            Value::Text(text) => text,
            _ => return Ok(value),
        };

        let pattern = config
            .get("pattern")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("regex_extract requires a 'pattern' string"))?;
        let group = config
            .get("group")
            .and_then(|v| v.as_u64())
            .unwrap_or(1) as usize;

        let regex = Regex::new(pattern)
            .with_context(|| format!("invalid pattern '{}'", pattern))?;

        Ok(match regex.captures(text).and_then(|caps| caps.get(group)) {
            Some(capture) => Value::Text(capture.as_str().to_string()),
            None => Value::Null,
        })
    }
}
