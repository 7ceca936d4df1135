//! Aggregated pass/fail statistics and the textual audit report
//!
//! Everything here is derived strictly from the annotated records: describe
//! style statistics per metric column, pass/fail tallies, failure-reason
//! combination counts, a label-by-status breakdown, and fixed-range
//! histograms of both metrics.

use std::collections::BTreeMap;

use crate::models::{AnnotatedRecord, QualityStatus};

/// Number of bins in each metric histogram
pub const HISTOGRAM_BINS: usize = 16;

/// Number of rows in the report's sample preview
const HEAD_ROWS: usize = 5;

/// Describe-style summary of one metric column
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (N-1)
    pub std_dev: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Histogram of one metric over a fixed value range
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bins: Vec<u32>,
    pub bin_edges: Vec<f64>,
}

/// Pass/fail counts for one label
#[derive(Debug, Clone, PartialEq)]
pub struct LabelBreakdown {
    pub label: String,
    pub passed: usize,
    pub failed: usize,
}

/// Complete aggregation over a classified collection
#[derive(Debug, Clone)]
pub struct QualityReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percentage of records classified FAIL; 0.0 when there are no records
    pub failure_rate: f64,
    /// Absent when there are no records
    pub brightness: Option<MetricSummary>,
    /// Absent when there are no records
    pub contrast: Option<MetricSummary>,
    pub brightness_histogram: Histogram,
    pub contrast_histogram: Histogram,
    /// Distinct reason combinations over failed records, most frequent first
    pub reason_counts: Vec<(String, usize)>,
    /// Per-label pass/fail counts, sorted by label, zero-filled
    pub label_breakdown: Vec<LabelBreakdown>,
    /// The first few records, for the report preview
    pub head: Vec<AnnotatedRecord>,
}

/// Aggregate a classified collection into a report.
pub fn build_report(records: &[AnnotatedRecord]) -> QualityReport {
    let total = records.len();
    let failed = records
        .iter()
        .filter(|r| r.status == QualityStatus::Fail)
        .count();
    let passed = total - failed;
    let failure_rate = if total == 0 {
        0.0
    } else {
        failed as f64 / total as f64 * 100.0
    };

    let brightness_values: Vec<f64> = records.iter().map(|r| r.record.brightness).collect();
    let contrast_values: Vec<f64> = records.iter().map(|r| r.record.contrast).collect();

    // Reason combinations are counted over failed records only
    let mut combo_counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records.iter().filter(|r| r.status == QualityStatus::Fail) {
        *combo_counts.entry(record.reasons_string()).or_insert(0) += 1;
    }
    let mut reason_counts: Vec<(String, usize)> = combo_counts.into_iter().collect();
    reason_counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    // Label-by-status counts; the BTreeMap keeps labels sorted and every
    // label carries both counters, so missing combinations read as 0
    let mut per_label: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for record in records {
        let entry = per_label.entry(record.record.label.clone()).or_insert((0, 0));
        match record.status {
            QualityStatus::Pass => entry.0 += 1,
            QualityStatus::Fail => entry.1 += 1,
        }
    }
    let label_breakdown = per_label
        .into_iter()
        .map(|(label, (passed, failed))| LabelBreakdown {
            label,
            passed,
            failed,
        })
        .collect();

    QualityReport {
        total,
        passed,
        failed,
        failure_rate,
        brightness: summarize_metric(&brightness_values),
        contrast: summarize_metric(&contrast_values),
        brightness_histogram: compute_histogram(&brightness_values, HISTOGRAM_BINS, 256.0),
        contrast_histogram: compute_histogram(&contrast_values, HISTOGRAM_BINS, 128.0),
        reason_counts,
        label_breakdown,
        head: records.iter().take(HEAD_ROWS).cloned().collect(),
    }
}

/// Describe-style statistics for one metric column.
///
/// Returns None for an empty column. Standard deviation is the sample form
/// (N-1, zero for a single value); quartiles interpolate linearly between
/// order statistics.
pub fn summarize_metric(values: &[f64]) -> Option<MetricSummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let std_dev = if count > 1 {
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };

    Some(MetricSummary {
        count,
        mean,
        std_dev,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[count - 1],
    })
}

/// Linear-interpolated quantile over sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let weight = pos - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

/// Fixed-range histogram; values beyond the range land in the edge bins.
pub fn compute_histogram(values: &[f64], num_bins: usize, range_max: f64) -> Histogram {
    let mut bins = vec![0u32; num_bins];
    let bin_edges: Vec<f64> = (0..=num_bins)
        .map(|i| i as f64 * range_max / num_bins as f64)
        .collect();

    for &value in values {
        let clamped = value.clamp(0.0, range_max);
        let idx = ((clamped / range_max * num_bins as f64) as usize).min(num_bins - 1);
        bins[idx] += 1;
    }

    Histogram { bins, bin_edges }
}

/// Print the full audit report.
pub fn print_report(report: &QualityReport) {
    println!("\n{}\n", "=".repeat(80));
    println!("IMAGE QUALITY AUDIT REPORT");
    println!("{}\n", "=".repeat(80));

    if !report.head.is_empty() {
        println!("SAMPLE ROWS");
        println!("{}\n", "-".repeat(80));
        println!(
            "  {:<9} {:<14} {:>12} {:>12}  {:<6} {}",
            "Image_ID", "Label", "Brightness", "Contrast", "Status", "Fail_Reasons"
        );
        for row in &report.head {
            println!(
                "  {:<9} {:<14} {:>12.6} {:>12.6}  {:<6} {}",
                row.record.image_id,
                row.record.label,
                row.record.brightness,
                row.record.contrast,
                row.status.as_str(),
                row.reasons_string()
            );
        }
        println!();
    }

    println!("METRIC STATISTICS");
    println!("{}\n", "-".repeat(80));
    print_metric_summary("Brightness", &report.brightness);
    print_metric_summary("Contrast", &report.contrast);

    println!("QUALITY RESULTS");
    println!("{}\n", "-".repeat(80));
    println!("  Total images:   {}", report.total);
    println!("  Passed:         {}", report.passed);
    println!("  Failed:         {}", report.failed);
    println!("  Failure rate:   {:.2}%", report.failure_rate);
    println!();

    println!("FAILURE REASONS");
    println!("{}\n", "-".repeat(80));
    if report.reason_counts.is_empty() {
        println!("  none");
    } else {
        for (combo, count) in &report.reason_counts {
            println!("  {:<32} {}", combo, count);
        }
    }
    println!();

    println!("PASS/FAIL BY LABEL");
    println!("{}\n", "-".repeat(80));
    println!("  {:<20} {:>8} {:>8}", "Label", "PASS", "FAIL");
    for row in &report.label_breakdown {
        println!("  {:<20} {:>8} {:>8}", row.label, row.passed, row.failed);
    }
    println!();

    print_histogram("BRIGHTNESS DISTRIBUTION", &report.brightness_histogram);
    print_histogram("CONTRAST DISTRIBUTION", &report.contrast_histogram);
}

fn print_metric_summary(name: &str, summary: &Option<MetricSummary>) {
    println!("{}:", name);
    match summary {
        Some(s) => {
            println!("  Count:          {}", s.count);
            println!("  Mean:           {:<12.6}", s.mean);
            println!("  Std Dev:        {:<12.6}", s.std_dev);
            println!("  Min:            {:<12.6}", s.min);
            println!("  25%:            {:<12.6}", s.q25);
            println!("  Median:         {:<12.6}", s.median);
            println!("  75%:            {:<12.6}", s.q75);
            println!("  Max:            {:<12.6}", s.max);
        }
        None => println!("  (no data)"),
    }
    println!();
}

fn print_histogram(title: &str, histogram: &Histogram) {
    println!("{}", title);
    println!("{}\n", "-".repeat(80));
    for (i, count) in histogram.bins.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        println!(
            "  [{:>7.2}, {:>7.2})  {}",
            histogram.bin_edges[i],
            histogram.bin_edges[i + 1],
            count
        );
    }
    println!();
}
