pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod exemptions;
pub mod models;
pub mod reporting;

pub use errors::ExemptorError;
pub use exemptions::{Exemption, ExemptionKind, ExemptionSet};
pub use models::VulnerableDependency;
