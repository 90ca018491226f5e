use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};

use super::Transformer;
use crate::mapping::TransformerConfig;
use crate::record::Value;

/// Reparses a date (or datetime) text value and reformats it.
///
/// Config: `from` and `to`, both chrono format strings. Input that matches
/// neither a datetime nor a date under `from` is a processing failure.
pub struct DateFormat;

impl Transformer for DateFormat {
    fn process(&self, value: Value, config: &TransformerConfig) -> Result<Value> {
        let text = match &value {
            Value::Text(text) => text,
            _ => return Ok(value),
        };

        let from = config
            .get("from")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("date_format requires a 'from' format string"))?;
        let to = config
            .get("to")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("date_format requires a 'to' format string"))?;

        let formatted = match NaiveDateTime::parse_from_str(text, from) {
            Ok(datetime) => datetime.format(to).to_string(),
            Err(_) => NaiveDate::parse_from_str(text, from)
                .with_context(|| format!("'{}' does not match format '{}'", text, from))?
                .format(to)
                .to_string(),
        };

        Ok(Value::Text(formatted))
    }
}
