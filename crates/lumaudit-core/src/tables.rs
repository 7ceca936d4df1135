//! Reading and writing the persisted metric tables
//!
//! Two comma-separated tables with fixed headers: the metrics table written
//! by the dataset builder and the annotated table written by the analyzer.
//! Floats are rendered in shortest round-trip form, so a re-read yields the
//! exact values that were written; fields containing a separator, quote, or
//! line break are minimally quoted.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::models::{AnnotatedRecord, ImageRecord};

/// Header of the metrics table written by the dataset builder
pub const METRICS_HEADER: &str = "Image_ID,Filepath,Label,Brightness,Contrast";

/// Header of the annotated table written by the analyzer
pub const ANNOTATED_HEADER: &str =
    "Image_ID,Filepath,Label,Brightness,Contrast,Status,Fail_Reasons";

/// Quote a field if it contains a separator, quote, or line break.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split one table row into fields, honoring quoted fields.
fn split_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Split raw table text into logical rows.
///
/// A row ends at a line break outside quotes, so a quoted field may span
/// physical lines; the trailing newline yields no empty row.
fn split_records(text: &str) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {
                chars.next();
                rows.push(std::mem::take(&mut current));
            }
            '\n' if !in_quotes => rows.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        rows.push(current);
    }
    rows
}

fn metrics_row(record: &ImageRecord) -> String {
    format!(
        "{},{},{},{},{}",
        record.image_id,
        escape_field(&record.filepath.display().to_string()),
        escape_field(&record.label),
        record.brightness,
        record.contrast
    )
}

/// Write the metrics table: header plus one row per record, in record order.
pub fn write_metrics_table(records: &[ImageRecord], path: &Path) -> Result<(), String> {
    let file = File::create(path)
        .map_err(|e| format!("Failed to create table {}: {}", path.display(), e))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", METRICS_HEADER)
        .map_err(|e| format!("Failed to write table {}: {}", path.display(), e))?;
    for record in records {
        writeln!(writer, "{}", metrics_row(record))
            .map_err(|e| format!("Failed to write table {}: {}", path.display(), e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to write table {}: {}", path.display(), e))?;
    Ok(())
}

/// Write the annotated table: metrics columns plus status and reasons.
pub fn write_annotated_table(records: &[AnnotatedRecord], path: &Path) -> Result<(), String> {
    let file = File::create(path)
        .map_err(|e| format!("Failed to create table {}: {}", path.display(), e))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", ANNOTATED_HEADER)
        .map_err(|e| format!("Failed to write table {}: {}", path.display(), e))?;
    for record in records {
        writeln!(
            writer,
            "{},{},{}",
            metrics_row(&record.record),
            record.status.as_str(),
            record.reasons_string()
        )
        .map_err(|e| format!("Failed to write table {}: {}", path.display(), e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to write table {}: {}", path.display(), e))?;
    Ok(())
}

/// Read a metrics table back into records.
///
/// Validates the header and parses every row; a quoted field may span
/// physical lines. Used by the analyze entry point, which consumes the
/// builder's persisted output.
pub fn read_metrics_table(path: &Path) -> Result<Vec<ImageRecord>, String> {
    let mut file =
        File::open(path).map_err(|e| format!("Failed to open table {}: {}", path.display(), e))?;
    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|e| format!("Failed to read table {}: {}", path.display(), e))?;

    let mut rows = split_records(&text).into_iter();

    let header = rows
        .next()
        .ok_or_else(|| format!("Table {} is empty", path.display()))?;
    if header != METRICS_HEADER {
        return Err(format!(
            "Table {} has unexpected header: {}",
            path.display(),
            header
        ));
    }

    let mut records = Vec::new();
    for (idx, row) in rows.enumerate() {
        if row.is_empty() {
            continue;
        }
        let record = parse_metrics_row(&row)
            .map_err(|e| format!("Table {} row {}: {}", path.display(), idx + 2, e))?;
        records.push(record);
    }

    Ok(records)
}

fn parse_metrics_row(row: &str) -> Result<ImageRecord, String> {
    let mut fields = split_row(row);
    if fields.len() != 5 {
        return Err(format!("expected 5 fields, found {}", fields.len()));
    }

    let image_id = fields[0]
        .parse::<u64>()
        .map_err(|e| format!("invalid image id {:?}: {}", fields[0], e))?;
    let brightness = parse_metric(&fields[3], "brightness")?;
    let contrast = parse_metric(&fields[4], "contrast")?;

    Ok(ImageRecord {
        image_id,
        filepath: PathBuf::from(std::mem::take(&mut fields[1])),
        label: std::mem::take(&mut fields[2]),
        brightness,
        contrast,
    })
}

/// Parse one metric column. `f64` parsing alone would admit `nan` and `inf`,
/// but only finite values are valid table contents.
fn parse_metric(raw: &str, column: &str) -> Result<f64, String> {
    let value = raw
        .parse::<f64>()
        .map_err(|e| format!("invalid {} {:?}: {}", column, raw, e))?;
    if !value.is_finite() {
        return Err(format!("invalid {} {:?}: not finite", column, raw));
    }
    Ok(value)
}
