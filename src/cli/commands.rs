//! Command implementations

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::cli::args::{ConvertArgs, CutArgs, ProbeArgs};
use crate::cli::Commands;
use crate::domain::model::*;
use crate::utils::Utils;

/// Run one parsed command against the wired container
pub async fn execute(container: &DefaultAppContainer, command: Commands) -> Result<()> {
    match command {
        Commands::Probe(args) => probe(container, args).await,
        Commands::Cut(args) => cut(container, args).await,
        Commands::Convert(args) => convert(container, args).await,
        Commands::PurgeCache => purge_cache(container),
    }
}

/// Execute the probe command
pub async fn probe(container: &DefaultAppContainer, args: ProbeArgs) -> Result<()> {
    info!(input = %args.input, kind = %args.kind, "Starting probe operation");

    let mut handle = MediaHandle::new(args.input, args.kind);
    let details = container
        .media_engine()
        .probe(&mut handle, args.force)
        .await
        .with_context(|| format!("Failed to probe {}", handle.full_path()))?;

    info!(
        duration_ms = details.duration_ms(),
        size = %Utils::format_file_size(details.size_bytes()),
        "Probe completed"
    );
    print_json(&details)
}

/// Execute the cut command
pub async fn cut(container: &DefaultAppContainer, args: CutArgs) -> Result<()> {
    info!(input = %args.input, from = %args.from, to = %args.to, "Starting cut operation");

    let mut options = OperationOptions::new()
        .with("from", args.from)
        .with("to", args.to);
    if let Some(output) = args.output {
        options.insert("outputFilePath", output);
    }

    let mut handle = MediaHandle::new(args.input, args.kind);
    let output = container
        .media_engine()
        .trim(&mut handle, &options)
        .await
        .with_context(|| format!("Failed to cut {}", handle.full_path()))?;

    report(container, &output)
}

/// Execute the convert command
pub async fn convert(container: &DefaultAppContainer, args: ConvertArgs) -> Result<()> {
    info!(input = %args.input, kind = %args.kind, "Starting convert operation");

    let options = match (args.extension, args.output) {
        (None, None) => None,
        (extension, output) => {
            let mut options = OperationOptions::new();
            if let Some(extension) = extension {
                options.insert("extension", extension);
            }
            if let Some(output) = output {
                options.insert("outputFilePath", output);
            }
            Some(options)
        }
    };

    let mut handle = MediaHandle::new(args.input, args.kind);
    let output = container
        .media_engine()
        .convert(&mut handle, options.as_ref())
        .await
        .with_context(|| format!("Failed to convert {}", handle.full_path()))?;

    report(container, &output)
}

/// Execute the purge-cache command
pub fn purge_cache(container: &DefaultAppContainer) -> Result<()> {
    let cache = container.cache_adapter();
    let removed = cache
        .purge()
        .with_context(|| format!("Failed to purge {}", cache.dir().display()))?;

    println!("Removed {} file(s) from {}", removed, cache.dir().display());
    Ok(())
}

#[derive(Serialize)]
struct DryRunReport<'a> {
    output_file_path: &'a str,
    commands: Vec<String>,
}

/// Print the operation result, or the recorded commands in dry-run mode
fn report(container: &DefaultAppContainer, output: &OperationOutput) -> Result<()> {
    match container.recorded_commands() {
        Some(commands) => print_json(&DryRunReport {
            output_file_path: &output.output_file_path,
            commands,
        }),
        None => print_json(output),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result to JSON")?;
    println!("{}", json);
    Ok(())
}
