use std::fs;
use std::io::{self, Read};

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use techinfo::{AuthoringSession, EditOp, ProductRecord, TabLabels, migrate_tabs_with, write_patch};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Log filter variable, same syntax as `RUST_LOG`. Defaults to `warn`.
const LOG_ENV: &str = "TECHINFO_LOG";
const STDIN: &str = "-";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("invalid edit operations in {path}: {source}")]
    InvalidOps { path: String, source: serde_json::Error },
    #[error("only one of --input and --ops may read from stdin")]
    StdinTwice,
    #[error(transparent)]
    Model(#[from] techinfo::Error),
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "techinfo", about = "Migrate and edit product technical-information tabs")]
struct Cli {
    #[arg(long, global = true, help = "Print single-line JSON")]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canonical tab list for a product document.
    Migrate(InputArgs),
    /// Print the write patch (tabs plus legacy mirrors) for a product document.
    Patch(InputArgs),
    /// Apply a JSON array of edit operations and print the resulting write patch.
    Apply(ApplyArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    #[arg(long, default_value = STDIN, help = "Product JSON file path, or - for stdin")]
    input: String,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    #[command(flatten)]
    product: InputArgs,

    #[arg(long, help = "Edit operations JSON file path, or - for stdin")]
    ops: String,
}

fn main() -> Result<(), CliError> {
    init_tracing();
    let cli = Cli::parse();
    let labels = TabLabels::from_env()?;

    let output = run(&cli.command, &labels, &mut io::stdin().lock())?;
    println!("{}", render_json(&output, cli.compact)?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(command: &Command, labels: &TabLabels, stdin: &mut dyn Read) -> Result<Value, CliError> {
    match command {
        Command::Migrate(args) => {
            let record = read_record(&args.input, stdin)?;
            let tabs = migrate_tabs_with(&record, labels);
            info!(tabs = tabs.len(), "migrated product");
            Ok(serde_json::to_value(&tabs)?)
        }
        Command::Patch(args) => {
            let record = read_record(&args.input, stdin)?;
            let tabs = migrate_tabs_with(&record, labels);
            Ok(write_patch(&tabs).to_value())
        }
        Command::Apply(args) => {
            if args.product.input == STDIN && args.ops == STDIN {
                return Err(CliError::StdinTwice);
            }
            let record = read_record(&args.product.input, stdin)?;
            let ops = read_ops(&args.ops, stdin)?;

            let mut session = AuthoringSession::open_with(&record, labels);
            let changed = session.apply_all(&ops);
            info!(
                total = ops.len(),
                changed,
                ignored = ops.len() - changed,
                "applied edit operations"
            );
            Ok(session.save().to_value())
        }
    }
}

fn read_source(path: &str, stdin: &mut dyn Read) -> Result<String, CliError> {
    if path == STDIN {
        let mut text = String::new();
        stdin
            .read_to_string(&mut text)
            .map_err(|source| CliError::Read { path: "stdin".to_owned(), source })?;
        return Ok(text);
    }
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_owned(), source })
}

fn read_record(path: &str, stdin: &mut dyn Read) -> Result<ProductRecord, CliError> {
    let text = read_source(path, stdin)?;
    Ok(ProductRecord::from_json_str(&text)?)
}

fn read_ops(path: &str, stdin: &mut dyn Read) -> Result<Vec<EditOp>, CliError> {
    let text = read_source(path, stdin)?;
    serde_json::from_str(&text).map_err(|source| CliError::InvalidOps { path: path.to_owned(), source })
}

fn render_json(value: &Value, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(rendered)
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
