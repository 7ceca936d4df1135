use std::path::{Path, PathBuf};
use std::time::Instant;

use lumaudit_core::dataset::BuildOutcome;

pub fn cmd_build(
    root: PathBuf,
    output: Option<PathBuf>,
    threads: Option<usize>,
    silent: bool,
    verbose: bool,
) -> Result<(), String> {
    let build_start = Instant::now();

    // Set verbose mode for core library
    lumaudit_core::config::set_verbose(verbose);
    if verbose {
        lumaudit_core::config::log_config_usage();
    }

    let defaults = lumaudit_core::config::audit_config_handle()
        .config
        .defaults
        .clone();
    let output_path = output.unwrap_or_else(|| defaults.metrics_table.clone());

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

    lumaudit_core::tables::write_metrics_table(&outcome.records, &output_path)?;

    if !silent {
        print_build_summary(&outcome, &output_path, build_start.elapsed().as_secs_f64());
    }

    Ok(())
}

/// Summary banner printed after a dataset scan.
///
/// Unreadable images are reported here but do not fail the command; the
/// tables and report cover whatever was successfully measured.
pub(crate) fn print_build_summary(outcome: &BuildOutcome, output_path: &Path, elapsed: f64) {
    println!("\n========================================");
    println!("DATASET BUILD COMPLETE");
    println!("========================================");
    println!("  Records:    {}", outcome.records.len());
    println!("  Failed:     {}", outcome.failures.len());
    println!("  Output:     {}", output_path.display());
    println!("  Total time: {:.2}s", elapsed);

    // Records arrive grouped by label, so one pass over the runs suffices
    if !outcome.records.is_empty() {
        println!("\nImages per class:");
        let mut label: &str = &outcome.records[0].label;
        let mut count = 0usize;
        for record in &outcome.records {
            if record.label != label {
                println!("  {:<20} {}", label, count);
                label = &record.label;
                count = 0;
            }
            count += 1;
        }
        println!("  {:<20} {}", label, count);
    }

    if !outcome.failures.is_empty() {
        println!("\nErrors:");
        for (path, error) in &outcome.failures {
            println!("  {}: {}", path.display(), error);
        }
    }
}
