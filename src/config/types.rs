use serde::{Deserialize, Serialize};

use super::source::Settings;
use crate::exemptions::KEY_ROOT;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ExemptorConfig {
    /// Kept as raw YAML; rules are read through [`Settings`] so file and
    /// settings-store input go through the same parser.
    pub exemption: Option<serde_yaml::Value>,
    pub database: Option<DatabaseConfig>,
    pub output: Option<OutputConfig>,
}

impl ExemptorConfig {
    /// Flattened `exemption.*` settings of this file.
    pub fn settings(&self) -> Settings {
        match &self.exemption {
            Some(value) => Settings::from_yaml(KEY_ROOT, value),
            None => Settings::new(),
        }
    }

    pub fn database_path(&self) -> Option<&str> {
        self.database.as_ref().and_then(|d| d.path.as_deref())
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output.as_ref().and_then(|o| o.format).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DatabaseConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(format!("Unknown output format '{}', expected markdown or json", other)),
        }
    }
}
