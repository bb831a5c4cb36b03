pub mod dependency;

pub use dependency::*;
