pub mod types;
pub mod classification;

pub use types::ExemptorError;
pub use classification::ErrorClassification;
