//! Dataset construction from a labeled directory tree
//!
//! The walk expects exactly two levels: `root/<label>/<image files>`. Labels
//! are the immediate subdirectories of the root, sorted by name; within each
//! label, files are admitted in sorted filename order until the per-label cap
//! of successful measurements is reached.

use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::metrics::{extract_metrics, ImageMetrics};
use crate::models::ImageRecord;
use crate::verbose_println;

/// File extensions eligible for measurement (lowercase)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Successful rows plus the diagnostic list of per-image failures
#[derive(Debug, Default)]
pub struct BuildOutcome {
    /// Measured records in label-sorted, then filename-sorted, order
    pub records: Vec<ImageRecord>,

    /// Images that could not be measured and label directories that could
    /// not be used, with the cause; these never produce a record and never
    /// fail the run
    pub failures: Vec<(PathBuf, String)>,
}

/// Result of scanning one label directory
struct LabelScan {
    label: String,
    measured: Vec<(PathBuf, ImageMetrics)>,
    failures: Vec<(PathBuf, String)>,
}

/// Walk `root_dir` and measure up to `images_per_class` images per label.
///
/// Label directories are processed in parallel; ids are assigned afterwards
/// in label-sorted scan order, so the output is identical to a sequential
/// walk. Fails only on directory-level errors; per-image decode failures and
/// unusable label directories are collected in the outcome.
pub fn build_dataset(root_dir: &Path, images_per_class: usize) -> Result<BuildOutcome, String> {
    let (labels, skipped) = list_label_dirs(root_dir)?;

    let scans: Vec<Result<LabelScan, String>> = labels
        .par_iter()
        .map(|(label, dir)| scan_label(label, dir, images_per_class))
        .collect();

    let mut outcome = BuildOutcome {
        records: Vec::new(),
        failures: skipped,
    };
    let mut next_id: u64 = 0;

    for scan in scans {
        let LabelScan {
            label,
            measured,
            failures,
        } = scan?;

        for (filepath, metrics) in measured {
            outcome.records.push(ImageRecord {
                image_id: next_id,
                filepath,
                label: label.clone(),
                brightness: metrics.brightness,
                contrast: metrics.contrast,
            });
            next_id += 1;
        }
        outcome.failures.extend(failures);
    }

    Ok(outcome)
}

/// Enumerate the immediate subdirectories of the dataset root, sorted by name.
///
/// A subdirectory whose name is not valid UTF-8 cannot become a label; it is
/// returned in the skipped list instead of being dropped.
fn list_label_dirs(
    root_dir: &Path,
) -> Result<(Vec<(String, PathBuf)>, Vec<(PathBuf, String)>), String> {
    if !root_dir.exists() {
        return Err(format!(
            "Dataset root does not exist: {}",
            root_dir.display()
        ));
    }
    if !root_dir.is_dir() {
        return Err(format!(
            "Dataset root is not a directory: {}",
            root_dir.display()
        ));
    }

    let entries = std::fs::read_dir(root_dir)
        .map_err(|e| format!("Failed to read directory {}: {}", root_dir.display(), e))?;

    let mut labels = Vec::new();
    let mut skipped = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            format!(
                "Failed to read directory entry in {}: {}",
                root_dir.display(),
                e
            )
        })?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            labels.push((name.to_string(), path.clone()));
        } else {
            verbose_println!("[walk] Skipping non-UTF-8 class name: {}", path.display());
            skipped.push((path, "Label directory name is not valid UTF-8".to_string()));
        }
    }

    labels.sort();
    skipped.sort();
    Ok((labels, skipped))
}

/// Collect eligible image files in one label directory, sorted by name.
fn collect_label_files(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory {}: {}", dir.display(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| format!("Failed to read directory entry in {}: {}", dir.display(), e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            if SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Scan one label directory sequentially.
///
/// The cap counts successful measurements only: a failed extraction consumes
/// no slot, and scanning stops as soon as the cap is filled.
fn scan_label(label: &str, dir: &Path, images_per_class: usize) -> Result<LabelScan, String> {
    verbose_println!("[walk] Processing class: {}", label);

    let files = collect_label_files(dir)?;
    let mut measured = Vec::new();
    let mut failures = Vec::new();

    for path in files {
        if measured.len() >= images_per_class {
            break;
        }
        match extract_metrics(&path) {
            Ok(metrics) => measured.push((path, metrics)),
            Err(e) => failures.push((path, e)),
        }
    }

    verbose_println!(
        "[walk] {}: {} measured, {} failed",
        label,
        measured.len(),
        failures.len()
    );

    Ok(LabelScan {
        label: label.to_string(),
        measured,
        failures,
    })
}
