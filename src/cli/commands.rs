use clap::{Parser, Subcommand, Args};

pub const DEFAULT_DB_PATH: &str = "./data/exemptor.db";

#[derive(Parser)]
#[command(name = "exemptor", version, about = "Exemption rules for vulnerable dependency findings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate findings against the configured exemptions
    Check(CheckArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Inspect or edit the settings store
    Settings(SettingsArgs),
}

#[derive(Args, Clone)]
pub struct CheckArgs {
    /// JSON file holding an array of vulnerable dependencies
    #[arg(short, long)]
    pub findings: String,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Settings store whose exemption keys override the configuration file
    #[arg(long)]
    pub db: Option<String>,

    /// Output format: markdown, json (defaults to the configuration file's choice)
    #[arg(long)]
    pub format: Option<String>,

    /// Exit with a non-zero status if any finding is not exempted
    #[arg(long)]
    pub fail_on_active: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Config file to validate
    pub config: String,
}

#[derive(Args, Clone)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// Listen address
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// SQLite settings database path
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    pub db: String,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args, Clone)]
pub struct SettingsArgs {
    /// SQLite settings database path
    #[arg(long, default_value = DEFAULT_DB_PATH, global = true)]
    pub db: String,

    /// YAML configuration file whose settings the store overrides; writes are
    /// validated against the merged result
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub action: SettingsAction,
}

#[derive(Subcommand, Clone)]
pub enum SettingsAction {
    /// List all stored settings
    List,
    /// Print one setting
    Get { key: String },
    /// Store a setting
    Set { key: String, value: String },
    /// Remove a setting
    Delete { key: String },
}
