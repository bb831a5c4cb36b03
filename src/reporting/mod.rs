pub mod evaluation;
pub mod formatter;

pub use evaluation::{evaluate, Evaluation, ExemptedFinding};
pub use formatter::format_markdown;
