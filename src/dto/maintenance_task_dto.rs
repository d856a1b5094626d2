use serde_json::Value;
use validator::Validate;

use super::{as_object, read_field, PayloadMode};
use crate::models::MaintenanceTaskPatch;
use crate::utils::errors::FieldErrors;
use crate::utils::validation::{validate_char_field, validate_primary_key_field};

/// A task payload that passed field-level checks. The vehicle reference is
/// resolved afterwards against the store, so errors are kept alongside the
/// parsed fields and reported together.
#[derive(Debug, Clone)]
pub struct MaintenanceTaskDraft {
    pub fields: MaintenanceTaskPatch,
    pub errors: FieldErrors,
}

impl MaintenanceTaskDraft {
    pub fn vehicle_id(&self) -> Option<i64> {
        self.fields.vehicle
    }

    pub fn reject_vehicle(&mut self, message: String) {
        self.errors.add("vehicle", message);
    }

    pub fn finish(self) -> Result<MaintenanceTaskPatch, FieldErrors> {
        self.errors.into_result()?;
        Ok(self.fields)
    }
}

pub fn parse_task_fields(payload: &Value, mode: PayloadMode) -> Result<MaintenanceTaskDraft, FieldErrors> {
    let object = as_object(payload)?;
    let mut errors = FieldErrors::new();

    let fields = MaintenanceTaskPatch {
        vehicle: read_field(object, "vehicle", mode, &mut errors, validate_primary_key_field),
        task_type: read_field(object, "task_type", mode, &mut errors, validate_char_field),
        status: read_field(object, "status", mode, &mut errors, validate_char_field),
    };

    if let Err(limits) = fields.validate() {
        errors.merge(limits.into());
    }

    Ok(MaintenanceTaskDraft { fields, errors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_draft_collects_missing_fields() {
        let draft = parse_task_fields(&json!({ "vehicle": 1 }), PayloadMode::Create).unwrap();
        assert_eq!(draft.vehicle_id(), Some(1));

        let errors = draft.finish().unwrap_err();
        assert!(errors.contains("task_type"));
        assert!(errors.contains("status"));
        assert!(!errors.contains("vehicle"));
    }

    #[test]
    fn test_reference_error_joins_field_errors() {
        let mut draft = parse_task_fields(
            &json!({ "vehicle": "99", "task_type": "", "status": "pending" }),
            PayloadMode::Create,
        )
        .unwrap();
        draft.reject_vehicle("Invalid pk \"99\" - object does not exist.".to_string());

        let errors = draft.finish().unwrap_err();
        assert_eq!(
            errors.get("vehicle").unwrap(),
            ["Invalid pk \"99\" - object does not exist."]
        );
        assert_eq!(errors.get("task_type").unwrap(), ["This field may not be blank."]);
    }

    #[test]
    fn test_partial_draft_without_vehicle() {
        let draft = parse_task_fields(&json!({ "status": "done" }), PayloadMode::Partial).unwrap();
        assert_eq!(draft.vehicle_id(), None);
        let patch = draft.finish().unwrap();
        assert_eq!(patch.status.as_deref(), Some("done"));
        assert!(patch.task_type.is_none());
    }

    #[test]
    fn test_vehicle_of_wrong_type() {
        let draft = parse_task_fields(&json!({ "vehicle": [1] }), PayloadMode::Partial).unwrap();
        let errors = draft.finish().unwrap_err();
        assert_eq!(
            errors.get("vehicle").unwrap(),
            ["Incorrect type. Expected pk value, received list."]
        );
    }
}
