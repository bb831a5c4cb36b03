use clap::Parser;
use exemptor::cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    // Reports go to stdout, so logs stay on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        cli::Commands::Check(args) => cli::check::handle_check(args).await,
        cli::Commands::Validate(args) => cli::validate::handle_validate(args).await,
        cli::Commands::Serve(args) => cli::serve::handle_serve(args).await,
        cli::Commands::Settings(args) => cli::settings::handle_settings(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(e.classify().exit_code);
    }
}
