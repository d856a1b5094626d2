//! Vehicle model
//!
//! `Vehicle` maps one row of the `vehicles` table and is also the wire
//! representation. `NewVehicle` and `VehiclePatch` are the write-side shapes
//! produced by the serialization layer.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

pub const REGISTRATION_NUMBER_MAX_LENGTH: u64 = 20;
pub const MAKE_MAX_LENGTH: u64 = 50;
pub const MODEL_MAX_LENGTH: u64 = 50;

/// A stored vehicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub registration_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
}

/// Fully validated payload for a create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    pub registration_number: String,
    pub make: String,
    pub model: String,
    pub year: i32,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct VehiclePatch {
    #[validate(length(max = 20, message = "Ensure this field has no more than 20 characters."))]
    pub registration_number: Option<String>,

    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub make: Option<String>,

    #[validate(length(max = 50, message = "Ensure this field has no more than 50 characters."))]
    pub model: Option<String>,

    pub year: Option<i32>,
}

impl VehiclePatch {
    /// Converts into a create payload when every field is present.
    pub fn into_new(self) -> Option<NewVehicle> {
        Some(NewVehicle {
            registration_number: self.registration_number?,
            make: self.make?,
            model: self.model?,
            year: self.year?,
        })
    }

    /// Applies the supplied fields onto an existing record.
    pub fn apply_to(self, vehicle: &mut Vehicle) {
        if let Some(registration_number) = self.registration_number {
            vehicle.registration_number = registration_number;
        }
        if let Some(make) = self.make {
            vehicle.make = make;
        }
        if let Some(model) = self.model {
            vehicle.model = model;
        }
        if let Some(year) = self.year {
            vehicle.year = year;
        }
    }
}

impl NewVehicle {
    pub fn with_id(self, id: i64) -> Vehicle {
        Vehicle {
            id,
            registration_number: self.registration_number,
            make: self.make,
            model: self.model,
            year: self.year,
        }
    }
}
