//! Request parameters and their form-urlencoded representation.
//!
//! # Design
//! Parameters are a flat name → string mapping. Structured values are
//! flattened through serde: the value is serialized to JSON, and each
//! top-level field becomes one parameter. Null fields are dropped, strings
//! are used verbatim, and everything else takes its JSON text.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::config::Charset;
use crate::error::HttpError;

/// Request parameters keyed by name.
pub type Params = BTreeMap<String, String>;

/// Flatten any serializable object into `Params`.
///
/// Fails with `SystemInternalError` when `value` does not serialize to an
/// object (a struct or a map).
pub fn to_params<T: Serialize + ?Sized>(value: &T) -> Result<Params, HttpError> {
    let fields = match serde_json::to_value(value).map_err(HttpError::internal)? {
        Value::Object(fields) => fields,
        Value::Null => return Ok(Params::new()),
        other => {
            return Err(HttpError::internal(format!(
                "cannot convert {} into request parameters",
                json_type(&other)
            )))
        }
    };

    Ok(fields
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((name, s)),
            other => Some((name, other.to_string())),
        })
        .collect())
}

/// Encode `params` as an `application/x-www-form-urlencoded` body.
///
/// Names and values are converted to bytes with `charset` before percent
/// encoding; spaces become `+`.
pub fn encode_form(params: &Params, charset: Charset) -> String {
    let mut body = String::new();
    for (name, value) in params {
        if !body.is_empty() {
            body.push('&');
        }
        body.extend(url::form_urlencoded::byte_serialize(&charset.encode(name)));
        body.push('=');
        body.extend(url::form_urlencoded::byte_serialize(&charset.encode(value)));
    }
    body
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
