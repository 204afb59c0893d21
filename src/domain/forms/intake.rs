//! Public submission intake rules: honeypot and internal-key hygiene.

use serde_json::{Map, Value};

/// Hidden field name used for spam detection. Bots fill it; humans never
/// see it.
pub const HONEYPOT_FIELD: &str = "_gotcha";

/// Whether a submission tripped the honeypot: the field is present with a
/// non-empty value. Only meaningful when the form has spam protection on.
pub fn is_honeypot_tripped(data: &Map<String, Value>) -> bool {
    match data.get(HONEYPOT_FIELD) {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Null) => false,
        Some(_) => true,
        None => false,
    }
}

/// Drop keys starting with `_` before storage. Underscore keys are control
/// fields (honeypot, redirect overrides), never user data.
pub fn internal_keys_stripped(data: Map<String, Value>) -> Map<String, Value> {
    data.into_iter()
        .filter(|(key, _)| !key.starts_with('_'))
        .collect()
}
