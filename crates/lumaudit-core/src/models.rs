//! Data models for lumaudit
//!
//! Core data structures for measured image records and their classification.

use std::fmt;
use std::path::PathBuf;

/// One row of the metrics table: a single successfully measured image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    /// Dense sequential id assigned in acceptance order, starting at 0
    pub image_id: u64,

    /// Path as encountered during the directory walk
    pub filepath: PathBuf,

    /// Name of the immediate parent directory (the class)
    pub label: String,

    /// Mean grayscale intensity (0-255)
    pub brightness: f64,

    /// Population standard deviation of grayscale intensity
    pub contrast: f64,
}

/// Verdict for a single record after threshold classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum QualityStatus {
    Pass,
    Fail,
}

impl QualityStatus {
    /// Serialized form used in the annotated table ("PASS" / "FAIL")
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityStatus::Pass => "PASS",
            QualityStatus::Fail => "FAIL",
        }
    }
}

impl fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an image failed the quality limits
///
/// Several reasons can apply to the same image; brightness and contrast
/// violations are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailReason {
    /// Mean intensity below the brightness floor
    TooDark,
    /// Mean intensity above the brightness ceiling
    TooBright,
    /// Intensity deviation below the contrast floor
    LowContrast,
}

impl FailReason {
    /// Serialized tag used in the annotated table
    pub fn as_str(&self) -> &'static str {
        match self {
            FailReason::TooDark => "too_dark",
            FailReason::TooBright => "too_bright",
            FailReason::LowContrast => "low_contrast",
        }
    }
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image record together with its classification outcome
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRecord {
    /// The measured record; never altered by classification
    pub record: ImageRecord,

    /// Pass/fail verdict; Fail exactly when `fail_reasons` is non-empty
    pub status: QualityStatus,

    /// Violated rules in evaluation order (empty for a passing image)
    pub fail_reasons: Vec<FailReason>,
}

impl AnnotatedRecord {
    /// Semicolon-joined reason tags as persisted in the annotated table.
    /// Empty string for a passing image.
    pub fn reasons_string(&self) -> String {
        self.fail_reasons
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }
}
