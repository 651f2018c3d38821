//! Well-known descriptor field names and helpers for reading loosely typed values.

use serde_json::Value;

/// Immutable asset identifier.
pub const HANDLE: &str = "handle";
/// Source URL or theme-relative path.
pub const SRC: &str = "src";
/// Handles the asset depends on.
pub const DEPS: &str = "deps";
/// Version token, string or number.
pub const VERSION: &str = "version";
/// Auxiliary key/value pairs forwarded to the host.
pub const DATA: &str = "data";
/// Base URL assigned once by the loader.
pub const BASE_URL: &str = "base_url";
/// Whether a script is printed in the page footer.
pub const FOOTER: &str = "footer";
/// Media query of a stylesheet.
pub const MEDIA: &str = "media";

/// Fields that cannot be written through the dynamic interface.
pub fn is_read_only(name: &str) -> bool {
  matches!(name, HANDLE | BASE_URL)
}

/// Loose truthiness used when a manifest supplies a scalar where a flag is expected.
pub fn is_truthy(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(flag) => *flag,
    Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
    Value::String(text) => !text.is_empty() && text != "0",
    Value::Array(items) => !items.is_empty(),
    Value::Object(map) => !map.is_empty(),
  }
}

/// Render a string or numeric value as text; other shapes have no scalar form.
pub fn scalar_to_string(value: &Value) -> Option<String> {
  match value {
    Value::String(text) => Some(text.clone()),
    Value::Number(number) => Some(number.to_string()),
    _ => None,
  }
}
