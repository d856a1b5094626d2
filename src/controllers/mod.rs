//! Controllers
//!
//! Orchestrate filter -> store -> serialization for each resource and map
//! missing records to `AppError::NotFound`.

pub mod maintenance_task_controller;
pub mod vehicle_controller;
