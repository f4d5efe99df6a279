use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;

use sdkclient_bridge::config::BridgeConfig;
use sdkclient_bridge::events::EventKind;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("bridge-diag error: {err:?}");
            ExitCode::from(1)
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "bridge-diag", about = "Inspect the bridge's event layouts and configuration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn execute(self) -> Result<()> {
        match self.command {
            Command::Schemas(args) => schemas_command(args),
            Command::Config(args) => config_command(args),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every event class with its constructor signature.
    Schemas(SchemasArgs),
    /// Print the effective configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct SchemasArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    /// Configuration file providing the event class prefix.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct ConfigArgs {
    /// Configuration file to load; defaults apply when omitted.
    #[arg(long)]
    path: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Serialize)]
struct SchemaRow {
    kind: String,
    class_path: String,
    constructor: String,
    dispatch: String,
}

/// Load `path`, failing on a missing or malformed file.
fn load_config(path: Option<&PathBuf>) -> Result<BridgeConfig> {
    let Some(path) = path else {
        return Ok(BridgeConfig::default());
    };
    if !path.exists() {
        anyhow::bail!("config file {} does not exist", path.display());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing {}", path.display()))
}

fn schemas_command(args: SchemasArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?;
    let rows: Vec<SchemaRow> = EventKind::ALL
        .into_iter()
        .map(|kind| SchemaRow {
            kind: kind.to_string(),
            class_path: config.class_path(kind),
            constructor: kind.constructor_signature(),
            dispatch: format!("{}()V", config.events.dispatch_method),
        })
        .collect();

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rows).context("serializing schemas")?;
            println!("{json}");
        }
        OutputFormat::Table => {
            let width = rows.iter().map(|row| row.kind.len()).max().unwrap_or(0);
            for row in &rows {
                println!(
                    "{:<width$}  {:<58}  {}",
                    row.kind, row.constructor, row.class_path
                );
            }
        }
    }
    Ok(())
}

fn config_command(args: ConfigArgs) -> Result<()> {
    let config = load_config(args.path.as_ref())?;
    let json = serde_json::to_string_pretty(&config).context("serializing configuration")?;
    println!("{json}");
    Ok(())
}
