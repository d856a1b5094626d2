use serde_json::Value;
use validator::Validate;

use super::{as_object, read_field, PayloadMode};
use crate::models::{NewVehicle, VehiclePatch};
use crate::utils::errors::FieldErrors;
use crate::utils::validation::{validate_char_field, validate_integer_field};

/// Reads vehicle fields from a payload. Read-only and unknown keys are ignored.
pub fn parse_vehicle_fields(payload: &Value, mode: PayloadMode) -> Result<VehiclePatch, FieldErrors> {
    let object = as_object(payload)?;
    let mut errors = FieldErrors::new();

    let patch = VehiclePatch {
        registration_number: read_field(object, "registration_number", mode, &mut errors, validate_char_field),
        make: read_field(object, "make", mode, &mut errors, validate_char_field),
        model: read_field(object, "model", mode, &mut errors, validate_char_field),
        year: read_field(object, "year", mode, &mut errors, validate_integer_field),
    };

    if let Err(limits) = patch.validate() {
        errors.merge(limits.into());
    }
    errors.into_result()?;
    Ok(patch)
}

pub fn parse_create_vehicle(payload: &Value) -> Result<NewVehicle, FieldErrors> {
    let patch = parse_vehicle_fields(payload, PayloadMode::Create)?;
    // Create mode records an error for every absent field, so this only
    // fails if that invariant is broken.
    patch.into_new().ok_or_else(|| {
        let mut errors = FieldErrors::new();
        errors.add("non_field_errors", "Incomplete vehicle payload.");
        errors
    })
}

pub fn parse_update_vehicle(payload: &Value) -> Result<VehiclePatch, FieldErrors> {
    parse_vehicle_fields(payload, PayloadMode::Partial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_accepts_complete_payload() {
        let vehicle = parse_create_vehicle(&json!({
            "registration_number": "AB12CDE",
            "make": "Toyota",
            "model": "Yaris",
            "year": 2019
        }))
        .unwrap();

        assert_eq!(vehicle.registration_number, "AB12CDE");
        assert_eq!(vehicle.year, 2019);
    }

    #[test]
    fn test_create_reports_every_missing_field() {
        let errors = parse_create_vehicle(&json!({ "make": "Toyota" })).unwrap_err();
        for field in ["registration_number", "model", "year"] {
            assert_eq!(errors.get(field).unwrap(), ["This field is required."]);
        }
        assert!(!errors.contains("make"));
    }

    #[test]
    fn test_create_ignores_id_and_unknown_keys() {
        let vehicle = parse_create_vehicle(&json!({
            "id": 500,
            "registration_number": "AB12CDE",
            "make": "Toyota",
            "model": "Yaris",
            "year": "2019",
            "colour": "red"
        }))
        .unwrap();
        assert_eq!(vehicle.year, 2019);
    }

    #[test]
    fn test_type_mismatch_is_a_field_error() {
        let errors = parse_update_vehicle(&json!({ "year": "recent", "make": "" })).unwrap_err();
        assert_eq!(errors.get("year").unwrap(), ["A valid integer is required."]);
        assert_eq!(errors.get("make").unwrap(), ["This field may not be blank."]);
    }

    #[test]
    fn test_length_limit_is_reported_with_other_errors() {
        let errors = parse_update_vehicle(&json!({
            "registration_number": "R".repeat(21),
            "year": null
        }))
        .unwrap_err();
        assert_eq!(
            errors.get("registration_number").unwrap(),
            ["Ensure this field has no more than 20 characters."]
        );
        assert_eq!(errors.get("year").unwrap(), ["This field may not be null."]);
    }

    #[test]
    fn test_partial_update_leaves_absent_fields_unset() {
        let patch = parse_update_vehicle(&json!({ "model": "Corolla" })).unwrap();
        assert_eq!(patch.model.as_deref(), Some("Corolla"));
        assert!(patch.make.is_none());
        assert!(patch.year.is_none());
    }

    #[test]
    fn test_non_object_payload() {
        let errors = parse_update_vehicle(&json!([1, 2])).unwrap_err();
        assert_eq!(
            errors.get("non_field_errors").unwrap(),
            ["Invalid data. Expected a dictionary, but got list."]
        );
    }
}
