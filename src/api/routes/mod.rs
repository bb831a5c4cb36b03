pub mod exemptions;
pub mod health;
pub mod settings;
