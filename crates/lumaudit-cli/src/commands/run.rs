use std::path::PathBuf;
use std::time::Instant;

use super::analyze::print_analysis_summary;
use super::build::print_build_summary;

pub fn cmd_run(
    root: PathBuf,
    metrics_out: Option<PathBuf>,
    annotated_out: Option<PathBuf>,
    threads: Option<usize>,
    silent: bool,
    verbose: bool,
) -> Result<(), String> {
    let run_start = Instant::now();

    // Set verbose mode for core library
    lumaudit_core::config::set_verbose(verbose);
    if verbose {
        lumaudit_core::config::log_config_usage();
    }

    let defaults = lumaudit_core::config::audit_config_handle()
        .config
        .defaults
        .clone();
    let metrics_path = metrics_out.unwrap_or_else(|| defaults.metrics_table.clone());
    let annotated_path = annotated_out.unwrap_or_else(|| defaults.annotated_table.clone());

    // Configure thread pool if specified
    if let Some(num_threads) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        if !silent {
            println!("Using {} threads for parallel processing", num_threads);
        }
    }

    if !silent {
        println!(
            "Scanning {} (up to {} images per class)...",
            root.display(),
            defaults.images_per_class
        );
    }

    let outcome = lumaudit_core::dataset::build_dataset(&root, defaults.images_per_class)?;

    lumaudit_core::tables::write_metrics_table(&outcome.records, &metrics_path)?;

    if !silent {
        print_build_summary(&outcome, &metrics_path, run_start.elapsed().as_secs_f64());
    }

    // The freshly scanned records feed classification directly; the metrics
    // table on disk is a byproduct here, not an input
    let annotated =
        lumaudit_core::classify::annotate_records(outcome.records, &defaults.thresholds());

    lumaudit_core::tables::write_annotated_table(&annotated, &annotated_path)?;

    let report = lumaudit_core::report::build_report(&annotated);

    if !silent {
        lumaudit_core::report::print_report(&report);
        print_analysis_summary(&report, &annotated_path);
    }

    Ok(())
}
