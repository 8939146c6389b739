use crate::output::{json, text};
use crate::OutputFormat;
use anyhow::{Context, Result};
use snapshot_diff::{
    compare, CompareConfig, Registry, Report, ReportMeta, Snapshot, UnidentifiedBehavior,
};
use std::fs;
use std::io;
use std::process::ExitCode;

#[allow(clippy::too_many_arguments)]
pub fn run(
    saved_path: &str,
    current_path: &str,
    registry_path: &str,
    format: OutputFormat,
    pretty: bool,
    quiet: bool,
    ignore_unidentified: bool,
    exclude_in_sync: bool,
    saved_server: Option<String>,
    current_server: Option<String>,
) -> Result<ExitCode> {
    let saved = load_snapshot(saved_path)?;
    let current = load_snapshot(current_path)?;

    let registry_text = fs::read_to_string(registry_path)
        .with_context(|| format!("Failed to read registry: {registry_path}"))?;
    let registry = Registry::from_json_str(&registry_text)
        .with_context(|| format!("Failed to load registry: {registry_path}"))?;

    let config = CompareConfig {
        on_unidentified: if ignore_unidentified {
            UnidentifiedBehavior::Ignore
        } else {
            UnidentifiedBehavior::Warn
        },
        include_in_sync: !exclude_in_sync,
    };

    let mut report = compare(&saved, &current, &registry, &config);
    if saved_server.is_some() || current_server.is_some() {
        report = report.with_meta(ReportMeta {
            saved_server,
            current_server,
            saved_at: None,
        });
    }

    print_warnings_to_stderr(&report);

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match format {
        OutputFormat::Text => {
            text::write_text_report(&mut handle, &report, saved_path, current_path, quiet)?;
        }
        OutputFormat::Json => {
            json::write_json_report(&mut handle, &report, pretty)?;
        }
    }

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn load_snapshot(path: &str) -> Result<Snapshot> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read snapshot: {path}"))?;
    Snapshot::from_json_str(&text).with_context(|| format!("Failed to parse snapshot: {path}"))
}

fn print_warnings_to_stderr(report: &Report) {
    for warning in &report.warnings {
        eprintln!("Warning: {warning}");
    }
}
