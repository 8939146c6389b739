//! JSON serialization of reports.

use crate::report::Report;

pub fn serialize_report(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string(report)
}

pub fn serialize_report_pretty(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
