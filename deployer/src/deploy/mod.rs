//! Deployment module

pub mod poller;
pub mod progress;
pub mod publisher;
pub mod reconciler;
pub mod request;
