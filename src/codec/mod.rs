//! Wire codec
//!
//! JSON encoding and decoding shared by every endpoint family. Request types
//! omit a field from the wire when it holds its "unset" value (zero numbers,
//! blank strings, empty lists, `false` flags), so the API applies its own
//! server-side default.

pub mod multipart;

use crate::utils::error::{ClientResult, ErrorContext};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub use multipart::{EncodedMultipart, MultipartForm};

/// Unset sentinel for floating point parameters
pub fn is_unset_f64(value: &f64) -> bool {
    *value == 0.0
}

/// Unset sentinel for integer parameters
pub fn is_unset_u32(value: &u32) -> bool {
    *value == 0
}

/// Unset sentinel for string parameters
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Unset sentinel for boolean flags
pub fn is_false(value: &bool) -> bool {
    !*value
}

/// Decode a JSON `null` as the type's default value
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Serialize a value into its JSON wire form
pub fn to_json<T: Serialize>(value: &T) -> ClientResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Serialize a value into JSON bytes
pub fn to_json_bytes<T: Serialize>(value: &T) -> ClientResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Drop `null` members from every object so they decode as missing keys
fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(members) => {
            members.retain(|_, member| !member.is_null());
            members.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// Decode a successful response body
///
/// A JSON `null` member decodes to the field's default value.
pub fn from_json<T: DeserializeOwned>(status: u16, body: &[u8]) -> ClientResult<T> {
    let mut value: Value =
        serde_json::from_slice(body).decode_context(status, "Invalid response body")?;
    strip_nulls(&mut value);
    serde_json::from_value(value).decode_context(status, "Invalid response body")
}

/// Decode a non-success response body, degrading to the default value when
/// the body does not have the payload's shape
pub fn from_json_lenient<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    match serde_json::from_slice::<Value>(body) {
        Ok(mut value) => {
            strip_nulls(&mut value);
            serde_json::from_value(value).unwrap_or_default()
        }
        Err(_) => T::default(),
    }
}
