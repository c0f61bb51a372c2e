//! Deployment pipeline models

pub mod artifact;
pub mod function;
pub mod release;
pub mod target;

pub use artifact::ArtifactRef;
pub use function::DeployedFunction;
pub use release::{Accessibility, ReleaseRecord};
pub use target::DeploymentTarget;
