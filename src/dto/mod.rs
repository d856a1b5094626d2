//! Serialization layer
//!
//! Turns raw JSON request bodies into validated write-side models. All field
//! problems of a payload are collected into one `FieldErrors`.

pub mod maintenance_task_dto;
pub mod vehicle_dto;

use serde_json::{Map, Value};

use crate::utils::errors::FieldErrors;
use crate::utils::validation::{json_type_name, REQUIRED};

/// Whether absent fields are an error (create) or left alone (partial update)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadMode {
    Create,
    Partial,
}

/// Ensures the request body is a JSON object.
pub fn as_object(payload: &Value) -> Result<&Map<String, Value>, FieldErrors> {
    payload.as_object().ok_or_else(|| {
        let mut errors = FieldErrors::new();
        errors.add(
            "non_field_errors",
            format!(
                "Invalid data. Expected a dictionary, but got {}.",
                json_type_name(payload)
            ),
        );
        errors
    })
}

/// Reads one field through `validate`, recording a missing-field error on
/// create and any conversion error.
pub(crate) fn read_field<T>(
    object: &Map<String, Value>,
    name: &str,
    mode: PayloadMode,
    errors: &mut FieldErrors,
    validate: impl Fn(&Value) -> Result<T, String>,
) -> Option<T> {
    match object.get(name) {
        Some(value) => match validate(value) {
            Ok(parsed) => Some(parsed),
            Err(message) => {
                errors.add(name, message);
                None
            }
        },
        None => {
            if mode == PayloadMode::Create {
                errors.add(name, REQUIRED);
            }
            None
        }
    }
}
