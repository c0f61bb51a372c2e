//! Configuration

pub mod deploy;
pub mod settings;

pub use deploy::{DeployConfig, DeploySettings, Trigger};
pub use settings::Settings;
