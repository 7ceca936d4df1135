use std::path::{Path, PathBuf};

use lumaudit_core::report::QualityReport;

pub fn cmd_analyze(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    silent: bool,
    verbose: bool,
) -> Result<(), String> {
    // Set verbose mode for core library
    lumaudit_core::config::set_verbose(verbose);
    if verbose {
        lumaudit_core::config::log_config_usage();
    }

    let defaults = lumaudit_core::config::audit_config_handle()
        .config
        .defaults
        .clone();
    let input_path = input.unwrap_or_else(|| defaults.metrics_table.clone());
    let output_path = output.unwrap_or_else(|| defaults.annotated_table.clone());

    if !silent {
        println!("Reading metrics table from {}...", input_path.display());
    }

    let records = lumaudit_core::tables::read_metrics_table(&input_path)?;

    if !silent {
        println!("Loaded {} records", records.len());
    }

    let annotated = lumaudit_core::classify::annotate_records(records, &defaults.thresholds());

    lumaudit_core::tables::write_annotated_table(&annotated, &output_path)?;

    let report = lumaudit_core::report::build_report(&annotated);

    if !silent {
        lumaudit_core::report::print_report(&report);
        print_analysis_summary(&report, &output_path);
    }

    Ok(())
}

/// Summary banner printed after classification.
pub(crate) fn print_analysis_summary(report: &QualityReport, output_path: &Path) {
    println!("\n========================================");
    println!("QUALITY ANALYSIS COMPLETE");
    println!("========================================");
    println!("  Total:        {}", report.total);
    println!("  Passed:       {}", report.passed);
    println!("  Failed:       {}", report.failed);
    println!("  Failure rate: {:.2}%", report.failure_rate);
    println!("  Output:       {}", output_path.display());
}
