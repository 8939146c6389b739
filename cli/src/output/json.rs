//! JSON report output.

use anyhow::Result;
use snapshot_diff::{serialize_report, serialize_report_pretty, Report};
use std::io::Write;

pub fn write_json_report(writer: &mut impl Write, report: &Report, pretty: bool) -> Result<()> {
    let json = if pretty {
        serialize_report_pretty(report)?
    } else {
        serialize_report(report)?
    };
    writeln!(writer, "{json}")?;
    Ok(())
}
