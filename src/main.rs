//! Rename Key Agent CLI entry point.
//!
//! Reads JSON-lines records from stdin, rewrites their keys and writes
//! `{"tag": ..., "record": ...}` lines to stdout.

use anyhow::{Context, Result};
use clap::Parser;
use rename_key_agent::{RenameKeyAgent, RenameKeyConfig};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "rename-key-agent")]
#[command(author, version, about = "Regex-driven record key rename agent")]
struct Args {
    /// Configuration file path (YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tag of the incoming records
    #[arg(short, long, env = "RENAME_KEY_TAG", default_value = "rename_key")]
    tag: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print example configuration and exit.
    #[arg(long)]
    example_config: bool,

    /// Validate configuration and exit.
    #[arg(long)]
    validate: bool,
}

fn print_example_config() {
    let example = r#"# Rename Key Agent Configuration Example

# Also rewrite keys of nested objects and arrays of objects
deep_rename: true

# Emitted tag is "<incoming tag>.<append_tag>"
append_tag: key_renamed

# Strip this prefix from the incoming tag first
# remove_tag_prefix: incoming

# "$key1" -> "x$key1"
rename_rule1: '^\$(.+) x$${md[1]}'

# "key 2" -> "key_2"
rename_rule2: '^(\w+)\s(\d+) ${md[1]}_${md[2]}'

# Drop whitespace and parentheses anywhere in a key
replace_rule1: '[\s()]'
"#;
    println!("{}", example);
}

fn load_config(path: &Path) -> Result<RenameKeyConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = if path.extension().is_some_and(|e| e == "yaml" || e == "yml") {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (stderr, stdout carries records)
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    if args.example_config {
        print_example_config();
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => RenameKeyConfig::default(),
    };

    let agent = RenameKeyAgent::new(config).context("Invalid rename key configuration")?;

    if args.validate {
        info!("Configuration is valid");
        return Ok(());
    }

    info!(config = ?args.config, tag = %args.tag, "Starting Rename Key Agent");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let record = match serde_json::from_str::<JsonValue>(&line) {
            Ok(JsonValue::Object(record)) => record,
            Ok(other) => {
                warn!(value = %other, "Skipping record that is not a JSON object");
                continue;
            }
            Err(e) => {
                warn!(error = %e, "Skipping malformed JSON line");
                continue;
            }
        };

        let emission = agent.process(&args.tag, std::slice::from_ref(&record));
        for record in emission.records {
            let event = serde_json::json!({ "tag": emission.tag, "record": record });
            let mut out = serde_json::to_vec(&event)?;
            out.push(b'\n');
            stdout.write_all(&out).await?;
        }
    }

    stdout.flush().await?;

    let stats = agent.stats();
    info!(
        records = stats.records_total,
        renamed = stats.records_renamed,
        "Input exhausted"
    );

    Ok(())
}
