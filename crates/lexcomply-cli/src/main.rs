//! # lexcomply CLI entry point
//!
//! Parses command-line arguments, installs logging and dispatches to the
//! subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lexcomply_cli::catalog::{run_entities, EntitiesArgs};
use lexcomply_cli::options::{run_options, OptionsArgs};
use lexcomply_cli::records::{
    run_create, run_delete, run_list, run_update, CreateArgs, DeleteArgs, ListArgs, UpdateArgs,
};
use lexcomply_cli::transfer::{run_copy, run_transfer, CopyArgs, TransferArgs};
use lexcomply_cli::{exit_code, GlobalOpts};

/// LexComply admin CLI
///
/// Lists and edits the master tables behind the LexComply admin panel
/// (acts, compliances, documents, forms, events, news, admins, states,
/// act types and categories) and runs compliance transfers and copies.
#[derive(Parser, Debug)]
#[command(name = "lexcomply", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    /// API base URL. Overrides LEXCOMPLY_API_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Environment variable to read the bearer token from.
    #[arg(long, global = true)]
    token_env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show entity kinds and the fields they accept.
    Entities(EntitiesArgs),

    /// List records of a kind.
    List(ListArgs),

    /// Create a record.
    Create(CreateArgs),

    /// Edit a record.
    Update(UpdateArgs),

    /// Delete a record.
    Delete(DeleteArgs),

    /// Show selector options for a kind.
    Options(OptionsArgs),

    /// Transfer a compliance.
    Transfer(TransferArgs),

    /// Copy a compliance onto another act.
    Copy(CopyArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "lexcomply CLI starting");

    let opts = GlobalOpts {
        json: cli.json,
        base_url: cli.base_url,
        token_env: cli.token_env,
    };

    let result = match cli.command {
        Commands::Entities(args) => run_entities(&args, &opts),
        Commands::List(args) => run_list(&args, &opts).await,
        Commands::Create(args) => run_create(&args, &opts).await,
        Commands::Update(args) => run_update(&args, &opts).await,
        Commands::Delete(args) => run_delete(&args, &opts).await,
        Commands::Options(args) => run_options(&args, &opts).await,
        Commands::Transfer(args) => run_transfer(&args, &opts).await,
        Commands::Copy(args) => run_copy(&args, &opts).await,
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}
