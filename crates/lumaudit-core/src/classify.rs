//! Threshold classification of measured images
//!
//! Applies the quality limits to each record's brightness and contrast,
//! producing a pass/fail verdict and the ordered list of violated rules.

use crate::models::{AnnotatedRecord, FailReason, ImageRecord, QualityStatus};

/// Images with mean intensity below this value are too dark
pub const BRIGHTNESS_MIN: f64 = 60.0;

/// Images with mean intensity above this value are too bright
pub const BRIGHTNESS_MAX: f64 = 200.0;

/// Images with intensity deviation below this value are low contrast
pub const CONTRAST_MIN: f64 = 20.0;

/// Limit values applied to every record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThresholds {
    pub brightness_min: f64,
    pub brightness_max: f64,
    pub contrast_min: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            brightness_min: BRIGHTNESS_MIN,
            brightness_max: BRIGHTNESS_MAX,
            contrast_min: CONTRAST_MIN,
        }
    }
}

/// Evaluate the limit rules against one measurement.
///
/// All three rules are always evaluated, in a fixed order, and every violated
/// rule contributes a reason, so an image can fail for brightness and contrast
/// at once. Values exactly on a limit pass; only strict violations fail.
pub fn classify_metrics(
    brightness: f64,
    contrast: f64,
    thresholds: &QualityThresholds,
) -> (QualityStatus, Vec<FailReason>) {
    let mut reasons = Vec::new();

    if brightness < thresholds.brightness_min {
        reasons.push(FailReason::TooDark);
    }
    if brightness > thresholds.brightness_max {
        reasons.push(FailReason::TooBright);
    }
    if contrast < thresholds.contrast_min {
        reasons.push(FailReason::LowContrast);
    }

    let status = if reasons.is_empty() {
        QualityStatus::Pass
    } else {
        QualityStatus::Fail
    };

    (status, reasons)
}

/// Classify every record, preserving row order and all measured fields.
pub fn annotate_records(
    records: Vec<ImageRecord>,
    thresholds: &QualityThresholds,
) -> Vec<AnnotatedRecord> {
    records
        .into_iter()
        .map(|record| {
            let (status, fail_reasons) =
                classify_metrics(record.brightness, record.contrast, thresholds);
            AnnotatedRecord {
                record,
                status,
                fail_reasons,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn classify_default(brightness: f64, contrast: f64) -> (QualityStatus, Vec<FailReason>) {
        classify_metrics(brightness, contrast, &QualityThresholds::default())
    }

    // ========================================================================
    // classify_metrics Tests
    // ========================================================================

    #[test]
    fn test_classify_normal_image_passes() {
        let (status, reasons) = classify_default(128.0, 50.0);

        assert_eq!(status, QualityStatus::Pass);
        assert!(reasons.is_empty(), "passing image should have no reasons");
    }

    #[test]
    fn test_classify_boundary_values_pass() {
        // Equality on every threshold is a pass condition
        assert_eq!(classify_default(60.0, 50.0).0, QualityStatus::Pass);
        assert_eq!(classify_default(200.0, 50.0).0, QualityStatus::Pass);
        assert_eq!(classify_default(128.0, 20.0).0, QualityStatus::Pass);
    }

    #[test]
    fn test_classify_just_below_brightness_floor() {
        let (status, reasons) = classify_default(59.999, 50.0);

        assert_eq!(status, QualityStatus::Fail);
        assert_eq!(reasons, vec![FailReason::TooDark]);
    }

    #[test]
    fn test_classify_just_above_brightness_ceiling() {
        let (status, reasons) = classify_default(200.001, 50.0);

        assert_eq!(status, QualityStatus::Fail);
        assert_eq!(reasons, vec![FailReason::TooBright]);
    }

    #[test]
    fn test_classify_just_below_contrast_floor() {
        let (status, reasons) = classify_default(128.0, 19.999);

        assert_eq!(status, QualityStatus::Fail);
        assert_eq!(reasons, vec![FailReason::LowContrast]);
    }

    #[test]
    fn test_classify_dark_and_flat_reports_both_in_order() {
        let (status, reasons) = classify_default(30.0, 10.0);

        assert_eq!(status, QualityStatus::Fail);
        assert_eq!(reasons, vec![FailReason::TooDark, FailReason::LowContrast]);
    }

    #[test]
    fn test_classify_bright_and_flat_reports_both_in_order() {
        let (status, reasons) = classify_default(230.0, 5.0);

        assert_eq!(status, QualityStatus::Fail);
        assert_eq!(
            reasons,
            vec![FailReason::TooBright, FailReason::LowContrast]
        );
    }

    #[test]
    fn test_classify_custom_thresholds() {
        let thresholds = QualityThresholds {
            brightness_min: 100.0,
            brightness_max: 150.0,
            contrast_min: 60.0,
        };

        let (status, reasons) = classify_metrics(128.0, 50.0, &thresholds);

        assert_eq!(status, QualityStatus::Fail);
        assert_eq!(reasons, vec![FailReason::LowContrast]);
    }

    // ========================================================================
    // annotate_records Tests
    // ========================================================================

    fn record(image_id: u64, brightness: f64, contrast: f64) -> ImageRecord {
        ImageRecord {
            image_id,
            filepath: PathBuf::from(format!("img_{}.png", image_id)),
            label: "test".to_string(),
            brightness,
            contrast,
        }
    }

    #[test]
    fn test_annotate_preserves_order_and_fields() {
        let records = vec![record(0, 128.0, 50.0), record(1, 30.0, 10.0)];

        let annotated = annotate_records(records, &QualityThresholds::default());

        assert_eq!(annotated.len(), 2);
        assert_eq!(annotated[0].record.image_id, 0);
        assert_eq!(annotated[0].status, QualityStatus::Pass);
        assert_eq!(annotated[1].record.image_id, 1);
        assert_eq!(annotated[1].record.brightness, 30.0);
        assert_eq!(annotated[1].status, QualityStatus::Fail);
    }

    #[test]
    fn test_annotate_fail_iff_reasons_nonempty() {
        let records = vec![
            record(0, 128.0, 50.0),
            record(1, 59.0, 50.0),
            record(2, 201.0, 19.0),
            record(3, 60.0, 20.0),
        ];

        for annotated in annotate_records(records, &QualityThresholds::default()) {
            assert_eq!(
                annotated.status == QualityStatus::Fail,
                !annotated.fail_reasons.is_empty(),
                "status must mirror the reason list for id {}",
                annotated.record.image_id
            );
        }
    }
}
