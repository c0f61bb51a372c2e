//! Cloud Functions REST client

pub mod client;
pub mod functions;
pub mod upload;
