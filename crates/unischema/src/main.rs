//! unischema CLI
//!
//! Command-line tool for snapshotting schemas and planning migrations
//! between them.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use unischema::prelude::*;

/// Canonical schema snapshots and migration planning.
#[derive(Parser)]
#[command(name = "unischema")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the ordered changes that turn one snapshot into another.
    Plan {
        /// Snapshot of the current schema (file or table directory).
        #[arg(short, long)]
        current: PathBuf,

        /// Snapshot of the desired schema (file or table directory).
        #[arg(short, long)]
        desired: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Exit with an error if any change can discard data.
        #[arg(long)]
        deny_destructive: bool,
    },

    /// Re-encode a snapshot; formats follow the file extensions.
    Convert {
        /// Input snapshot (file or table directory).
        input: PathBuf,

        /// Output snapshot file.
        output: PathBuf,
    },

    /// Snapshot a live SQLite database.
    Introspect {
        /// Database URL (SQLite path or connection string).
        #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite:db.sqlite3")]
        database: String,

        /// Output snapshot file.
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per change.
    Text,
    /// JSON array of changes.
    Json,
}

/// Renders a plan for stdout. Text output lists the ambiguity warnings
/// after the changes; they are already logged by the diff itself.
fn render_plan(result: &SchemaDiff, format: OutputFormat) -> anyhow::Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(&result.changes)?);
    }

    let mut out = String::new();
    if result.is_empty() {
        writeln!(out, "No changes.")?;
    } else {
        writeln!(
            out,
            "{} changes ({} destructive):",
            result.len(),
            result.destructive_changes().len()
        )?;
        for change in result {
            let marker = if change.is_destructive() { '!' } else { ' ' };
            writeln!(out, " [{:>2}] {marker} {change}", change.priority())?;
        }
    }
    for warning in &result.warnings {
        writeln!(out, "warning: {warning}")?;
    }
    Ok(out.trim_end().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Plan {
            current,
            desired,
            format,
            deny_destructive,
        } => {
            let current = load_snapshot(&current)?;
            let desired = load_snapshot(&desired)?;
            let result = plan(&current, &desired);

            println!("{}", render_plan(&result, format)?);

            if deny_destructive && result.has_destructive() {
                bail!(
                    "plan contains {} destructive changes",
                    result.destructive_changes().len()
                );
            }
        }

        Commands::Convert { input, output } => {
            let db = load_snapshot(&input)?;
            save_database(&db, &output)?;
            info!(
                "Converted {} -> {} ({} tables)",
                input.display(),
                output.display(),
                db.tables.len()
            );
        }

        Commands::Introspect { database, out } => {
            let introspector = SqliteIntrospector::connect(&database).await?;
            let db = introspector.snapshot().await?;
            save_database(&db, &out)?;
            info!("Wrote {} tables to {}", db.tables.len(), out.display());
        }
    }

    Ok(())
}
