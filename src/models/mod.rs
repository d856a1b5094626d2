//! Data models
//!
//! Stored record types and the write-side shapes used for create and
//! partial update.

pub mod maintenance_task;
pub mod vehicle;

pub use maintenance_task::{MaintenanceTask, MaintenanceTaskPatch, NewMaintenanceTask};
pub use vehicle::{NewVehicle, Vehicle, VehiclePatch};
