//! Cloud Functions v1 wire models
//!
//! Request and response bodies exchanged with the Cloud Functions REST API.
//! Field names follow the API's camelCase JSON encoding.

pub mod models;

pub use models::*;
