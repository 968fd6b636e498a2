use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

/// Sweep - Registry Retention Tool
///
/// A CLI tool for cleaning up image registries: lists repositories and tags,
/// keeps the newest tag per repository, and deletes the manifests of the rest.
#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to a YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Page-size hint for paginated listings (overrides the config file)
    #[arg(long, global = true)]
    page_size: Option<usize>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct AuthArgs {
    /// Username for registry authentication
    #[arg(short, long, env = "SWEEP_USERNAME")]
    username: Option<String>,

    /// Password (will prompt if a username is given without one)
    #[arg(short, long, env = "SWEEP_PASSWORD")]
    password: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all repositories in the registry catalog
    Repos {
        /// Registry URL (e.g., "http://localhost:5000")
        registry: String,
        #[command(flatten)]
        auth: AuthArgs,
    },
    /// List tags for a repository
    Tags {
        /// Registry URL
        registry: String,
        /// Repository name (e.g., "develop/api")
        repository: String,
        #[command(flatten)]
        auth: AuthArgs,
    },
    /// Delete superseded manifests, keeping the newest tag per repository
    Clean {
        /// Registry URL
        registry: String,
        /// Repository name prefix to process (others are skipped)
        #[arg(long)]
        prefix: Option<String>,
        /// Report what would be deleted without deleting anything
        #[arg(long)]
        dry_run: bool,
        #[command(flatten)]
        auth: AuthArgs,
    },
}

fn log_level(verbose: u8) -> tracing::Level {
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(log_level(cli.verbose))
        .with_target(false)
        .init();

    let mut config = match libsweep::Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(page_size) = cli.page_size {
        config.pagination.page_size = page_size;
    }
    if let Some(timeout) = cli.timeout {
        config.network.timeout = timeout;
    }

    let result = match cli.command {
        Commands::Repos { registry, auth } => {
            let creds = commands::resolve_credentials(auth.username, auth.password);
            commands::handle_repos(config, &registry, creds).await
        }
        Commands::Tags {
            registry,
            repository,
            auth,
        } => {
            let creds = commands::resolve_credentials(auth.username, auth.password);
            commands::handle_tags(config, &registry, &repository, creds).await
        }
        Commands::Clean {
            registry,
            prefix,
            dry_run,
            auth,
        } => {
            let creds = commands::resolve_credentials(auth.username, auth.password);
            commands::handle_clean(config, &registry, prefix.as_deref(), dry_run, creds).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            use owo_colors::OwoColorize;
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
