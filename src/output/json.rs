//! Structured (JSON) encoding.

use serde::Serialize;
use serde_json::Value;

use crate::error::OutputError;

/// Pretty-prints `value` with object keys in alphabetical order.
///
/// Values are routed through [`serde_json::Value`], whose map type keeps
/// keys sorted, so field declaration order never leaks into the output.
///
/// # Errors
///
/// Returns [`OutputError::Json`] if `value` cannot be serialized.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, OutputError> {
    let value: Value = serde_json::to_value(value)?;
    Ok(serde_json::to_string_pretty(&value)?)
}
