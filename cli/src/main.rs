mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "snapshot-diff")]
#[command(about = "Compare configuration snapshots and show differences")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Compare two snapshot exports")]
    Compare {
        #[arg(help = "Path to the saved/baseline snapshot JSON")]
        saved: String,
        #[arg(help = "Path to the current snapshot JSON")]
        current: String,
        #[arg(long, short, help = "Path to the entity-type registry JSON")]
        registry: String,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
        #[arg(long, help = "Pretty-print JSON output")]
        pretty: bool,
        #[arg(long, short, help = "Quiet mode: only show per-section summaries")]
        quiet: bool,
        #[arg(long, help = "Do not warn about records lacking their identity field")]
        ignore_unidentified: bool,
        #[arg(long, help = "Omit in-sync matched entities from the report")]
        exclude_in_sync: bool,
        #[arg(long, value_name = "NAME", help = "Server the saved snapshot was taken from")]
        saved_server: Option<String>,
        #[arg(long, value_name = "NAME", help = "Server the current snapshot was taken from")]
        current_server: Option<String>,
    },
    #[command(about = "Show the collections contained in a snapshot")]
    Info {
        #[arg(help = "Path to the snapshot JSON")]
        path: String,
    },
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compare {
            saved,
            current,
            registry,
            format,
            pretty,
            quiet,
            ignore_unidentified,
            exclude_in_sync,
            saved_server,
            current_server,
        } => commands::compare::run(
            &saved,
            &current,
            &registry,
            format,
            pretty,
            quiet,
            ignore_unidentified,
            exclude_in_sync,
            saved_server,
            current_server,
        ),
        Commands::Info { path } => commands::info::run(&path),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(2)
        }
    }
}
