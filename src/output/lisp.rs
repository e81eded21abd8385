//! Symbolic (s-expression) encoding.
//!
//! A record becomes `(:key value ...)`. `true` is written as `t`; `false`
//! and `null` fields are left out entirely. Integers are bare, strings are
//! quoted, and any other scalar is quoted as its textual description. A
//! sequence is its children joined by newlines.
//!
//! Only flat records are supported: a record field holding an array or an
//! object is an [`OutputError::NestedValue`].

use serde_json::{Map, Number, Value};

use crate::error::OutputError;

const TRUE: &str = "t";

/// Encodes `value` as s-expressions.
///
/// # Errors
///
/// Returns [`OutputError::NestedValue`] if a record contains a nested
/// array or object.
pub fn encode(value: &Value) -> Result<String, OutputError> {
    match value {
        Value::Array(items) => {
            let children = items.iter().map(encode).collect::<Result<Vec<_>, _>>()?;
            Ok(children.join("\n"))
        }
        Value::Object(fields) => encode_record(fields),
        scalar => Ok(atom(scalar).unwrap_or_default()),
    }
}

fn encode_record(fields: &Map<String, Value>) -> Result<String, OutputError> {
    let mut pairs = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        if matches!(value, Value::Array(_) | Value::Object(_)) {
            return Err(OutputError::NestedValue { key: key.clone() });
        }
        if let Some(atom) = atom(value) {
            pairs.push(format!(":{key} {atom}"));
        }
    }
    Ok(format!("({})", pairs.join(" ")))
}

/// Renders a scalar, or `None` if it should be omitted.
fn atom(value: &Value) -> Option<String> {
    match value {
        Value::Bool(true) => Some(TRUE.to_string()),
        Value::Bool(false) | Value::Null => None,
        Value::Number(n) => Some(number(n)),
        Value::String(s) => Some(quote(s)),
        other => Some(quote(&other.to_string())),
    }
}

fn number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        n.to_string()
    } else {
        quote(&n.to_string())
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
