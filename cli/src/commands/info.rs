use anyhow::{Context, Result};
use snapshot_diff::Snapshot;
use std::fs;
use std::process::ExitCode;

pub fn run(path: &str) -> Result<ExitCode> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read snapshot: {path}"))?;
    let snapshot =
        Snapshot::from_json_str(&text).with_context(|| format!("Failed to parse snapshot: {path}"))?;

    let mut keys: Vec<&str> = snapshot.keys().collect();
    keys.sort_unstable();

    println!("Snapshot: {path}");
    for key in keys {
        match snapshot.get(key) {
            Some(value) if value.is_array() => {
                println!("  {key}: {} record(s)", snapshot.collection(key).len());
            }
            _ => println!("  {key}: (not a collection)"),
        }
    }
    Ok(ExitCode::SUCCESS)
}
