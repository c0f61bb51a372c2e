//! cfdeploy Library
//!
//! Core modules for deploying and publishing Google Cloud Functions.

pub mod app;
pub mod config;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod provider;
pub mod registry;
pub mod utils;
