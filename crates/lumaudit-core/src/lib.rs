//! Lumaudit Core Library
//!
//! Core functionality for offline image quality auditing: luma metric
//! extraction, threshold classification, CSV persistence, and reporting.

pub mod classify;
pub mod config;
pub mod dataset;
pub mod metrics;
pub mod models;
pub mod report;
pub mod tables;

// Re-export commonly used types
pub use classify::{annotate_records, classify_metrics, QualityThresholds};
pub use classify::{BRIGHTNESS_MAX, BRIGHTNESS_MIN, CONTRAST_MIN};
pub use dataset::{build_dataset, BuildOutcome, SUPPORTED_EXTENSIONS};
pub use metrics::{extract_metrics, luma_statistics, ImageMetrics};
pub use models::{AnnotatedRecord, FailReason, ImageRecord, QualityStatus};
pub use report::{build_report, print_report, MetricSummary, QualityReport};
pub use tables::{
    read_metrics_table, write_annotated_table, write_metrics_table, ANNOTATED_HEADER,
    METRICS_HEADER,
};
