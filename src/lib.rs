//! Fleet maintenance backend
//!
//! Vehicles and their maintenance tasks behind a small JSON CRUD API with
//! substring / exact-match filtering on list endpoints.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
