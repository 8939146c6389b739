//! Human-readable report rendering.

use anyhow::Result;
use snapshot_diff::{PropertySlot, Report, Section, SectionDetail};
use std::io::Write;

pub fn write_text_report(
    writer: &mut impl Write,
    report: &Report,
    saved_path: &str,
    current_path: &str,
    quiet: bool,
) -> Result<()> {
    writeln!(
        writer,
        "Comparing {saved_path} (saved) against {current_path} (current)"
    )?;
    if let Some(meta) = &report.meta {
        if let Some(server) = &meta.saved_server {
            writeln!(writer, "Saved server:   {server}")?;
        }
        if let Some(server) = &meta.current_server {
            writeln!(writer, "Current server: {server}")?;
        }
    }
    writeln!(writer)?;

    for section in &report.sections {
        write_section(writer, section, 0, quiet)?;
    }

    writeln!(writer, "Total differences: {}", report.total_differences)?;
    Ok(())
}

fn write_section(
    writer: &mut impl Write,
    section: &Section,
    depth: usize,
    quiet: bool,
) -> Result<()> {
    let indent = "  ".repeat(depth);
    match &section.parent_id {
        Some(parent_id) => writeln!(
            writer,
            "{indent}{} (in {} '{}'): {} difference(s)",
            section.label,
            section.parent_label.as_deref().unwrap_or("parent"),
            parent_id,
            section.total_differences
        )?,
        None => writeln!(
            writer,
            "{indent}{}: {} difference(s)",
            section.label, section.total_differences
        )?,
    }

    if !quiet {
        write_section_body(writer, section, &indent)?;
    }

    for child in &section.child_sections {
        // Clean child sections are noise in text output.
        if child.total_differences == 0 {
            continue;
        }
        write_section(writer, child, depth + 1, quiet)?;
    }
    Ok(())
}

fn write_section_body(writer: &mut impl Write, section: &Section, indent: &str) -> Result<()> {
    match &section.detail {
        SectionDetail::Entity {
            missing,
            extra,
            matched,
            summary,
        } => {
            writeln!(
                writer,
                "{indent}  missing: {}, extra: {}, changed: {}, in sync: {}",
                summary.missing, summary.extra, summary.changed, summary.in_sync
            )?;
            for entry in missing {
                writeln!(writer, "{indent}  - missing: {}", entry.id)?;
            }
            for entry in extra {
                writeln!(writer, "{indent}  + extra:   {}", entry.id)?;
            }
            for entity in matched {
                if entity.is_in_sync() {
                    continue;
                }
                writeln!(writer, "{indent}  ~ changed: {}", entity.id)?;
                for diff in &entity.differences {
                    writeln!(
                        writer,
                        "{indent}      {}: {} -> {}",
                        diff.property,
                        render_slot(&diff.saved),
                        render_slot(&diff.current)
                    )?;
                }
            }
        }
        SectionDetail::Flat {
            missing,
            extra,
            summary,
        } => {
            writeln!(
                writer,
                "{indent}  missing: {}, extra: {}",
                summary.missing, summary.extra
            )?;
            for record in missing {
                writeln!(writer, "{indent}  - missing: {record}")?;
            }
            for record in extra {
                writeln!(writer, "{indent}  + extra:   {record}")?;
            }
        }
    }
    Ok(())
}

fn render_slot(slot: &PropertySlot) -> String {
    match slot {
        PropertySlot::Absent => "<absent>".to_string(),
        PropertySlot::Value(value) => value.to_string(),
    }
}
