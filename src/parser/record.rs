use serde_json::{Map, Value};
use thiserror::Error;

/// One element of the token list returned by the API, decoded without a schema.
pub type TokenRecord = Map<String, Value>;

pub const NAME_FIELD: &str = "name";
pub const CREATED_AT_FIELD: &str = "created_at";
pub const EXPIRES_AT_FIELD: &str = "expires_at";

/// Why a field could not be taken from a record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("field '{0}' is missing")]
    Missing(&'static str),
    #[error("field '{field}' is {found}, expected a string")]
    WrongType { field: &'static str, found: &'static str },
}

pub fn string_field<'a>(record: &'a TokenRecord, field: &'static str) -> Result<&'a str, FieldError> {
    match record.get(field) {
        None => Err(FieldError::Missing(field)),
        Some(Value::String(value)) => Ok(value.as_str()),
        Some(other) => Err(FieldError::WrongType { field, found: json_type(other) }),
    }
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
