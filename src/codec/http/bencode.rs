//! Accessors for the dictionaries decoded with `serde_bencode`.
use std::collections::HashMap;

use serde_bencode::value::Value;

use crate::codec::DecodeError;

pub type Dict = HashMap<Vec<u8>, Value>;

/// Decodes a whole body that must be a bencoded dictionary.
pub fn parse_dict(bytes: &[u8]) -> Result<Dict, DecodeError> {
    match serde_bencode::from_bytes::<Value>(bytes)? {
        Value::Dict(dict) => Ok(dict),
        _ => Err(DecodeError::InvalidValueExpectedDict { field: "response" }),
    }
}

pub fn get<'a>(dict: &'a Dict, field: &str) -> Option<&'a Value> {
    dict.get(field.as_bytes())
}

pub fn as_dict<'a>(field: &'static str, value: &'a Value) -> Result<&'a Dict, DecodeError> {
    match value {
        Value::Dict(dict) => Ok(dict),
        _ => Err(DecodeError::InvalidValueExpectedDict { field }),
    }
}

pub fn as_bytes<'a>(field: &'static str, value: &'a Value) -> Result<&'a [u8], DecodeError> {
    match value {
        Value::Bytes(bytes) => Ok(bytes),
        _ => Err(DecodeError::InvalidFieldType {
            field,
            expected: "a string",
        }),
    }
}

/// Bencoded strings are raw bytes. Human-readable ones are decoded lossily.
pub fn as_text(field: &'static str, value: &Value) -> Result<String, DecodeError> {
    as_bytes(field, value).map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}

pub fn as_int(field: &'static str, value: &Value) -> Result<i64, DecodeError> {
    match value {
        Value::Int(number) => Ok(*number),
        _ => Err(DecodeError::InvalidFieldType {
            field,
            expected: "an integer",
        }),
    }
}

pub fn as_u32(field: &'static str, value: &Value) -> Result<u32, DecodeError> {
    let value = as_int(field, value)?;
    u32::try_from(value).map_err(|_| DecodeError::IntegerOutOfRange { field, value })
}

pub fn as_u16(field: &'static str, value: &Value) -> Result<u16, DecodeError> {
    let value = as_int(field, value)?;
    u16::try_from(value).map_err(|_| DecodeError::IntegerOutOfRange { field, value })
}

pub fn required<'a>(dict: &'a Dict, field: &'static str) -> Result<&'a Value, DecodeError> {
    get(dict, field).ok_or(DecodeError::MissingField { field })
}

pub fn optional_u32(dict: &Dict, field: &'static str) -> Result<Option<u32>, DecodeError> {
    get(dict, field).map(|value| as_u32(field, value)).transpose()
}

pub fn optional_text(dict: &Dict, field: &'static str) -> Result<Option<String>, DecodeError> {
    get(dict, field).map(|value| as_text(field, value)).transpose()
}
