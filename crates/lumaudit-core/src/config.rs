//! Audit configuration
//!
//! Built-in defaults for the per-class cap, quality thresholds, and output
//! paths, with optional overrides from a YAML config file discovered on disk.

use crate::classify::{QualityThresholds, BRIGHTNESS_MAX, BRIGHTNESS_MIN, CONTRAST_MIN};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Once, OnceLock};

// Global verbose flag for controlling debug output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, debug messages will be printed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Default cap on successfully measured images per label.
pub const DEFAULT_IMAGES_PER_CLASS: usize = 100;

/// Default output path for the metrics table.
pub const DEFAULT_METRICS_TABLE: &str = "image_quality.csv";

/// Default output path for the annotated table.
pub const DEFAULT_ANNOTATED_TABLE: &str = "image_quality_annotated.csv";

/// Canonical list of candidate config file names we search for on disk.
const CONFIG_FILENAMES: &[&str] = &["lumaudit.yml", "lumaudit.yaml", "audit_defaults.yml"];

/// Public handle that stores the loaded configuration, its source path, and warnings.
pub struct AuditConfigHandle {
    pub config: AuditConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

impl AuditConfigHandle {
    fn with_config(config: AuditConfig, source: Option<PathBuf>, warnings: Vec<String>) -> Self {
        Self {
            config,
            source,
            warnings,
        }
    }
}

/// Complete configuration file structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    pub defaults: AuditDefaults,
}

impl AuditConfig {
    fn sanitize(mut self) -> Self {
        self.defaults.sanitize();
        self
    }
}

/// Default audit parameter values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuditDefaults {
    /// Maximum number of successfully measured images admitted per label
    pub images_per_class: usize,
    /// Images with mean intensity below this fail as too dark
    pub brightness_min: f64,
    /// Images with mean intensity above this fail as too bright
    pub brightness_max: f64,
    /// Images with intensity deviation below this fail as low contrast
    pub contrast_min: f64,
    /// Where the builder writes the metrics table
    pub metrics_table: PathBuf,
    /// Where the analyzer writes the annotated table
    pub annotated_table: PathBuf,
}

impl AuditDefaults {
    pub(crate) fn sanitize(&mut self) {
        if self.images_per_class == 0 {
            self.images_per_class = 1;
        }
        // YAML admits .nan and .inf for f64 fields; thresholds must stay
        // finite, so such values fall back to the built-in limits
        if !self.brightness_min.is_finite() {
            self.brightness_min = BRIGHTNESS_MIN;
        }
        if !self.brightness_max.is_finite() {
            self.brightness_max = BRIGHTNESS_MAX;
        }
        if !self.contrast_min.is_finite() {
            self.contrast_min = CONTRAST_MIN;
        }
        self.brightness_min = self.brightness_min.clamp(0.0, 255.0);
        self.brightness_max = self.brightness_max.clamp(self.brightness_min, 255.0);
        self.contrast_min = self.contrast_min.max(0.0);
    }

    /// Threshold set handed to the classifier.
    pub fn thresholds(&self) -> QualityThresholds {
        QualityThresholds {
            brightness_min: self.brightness_min,
            brightness_max: self.brightness_max,
            contrast_min: self.contrast_min,
        }
    }
}

impl Default for AuditDefaults {
    fn default() -> Self {
        Self {
            images_per_class: DEFAULT_IMAGES_PER_CLASS,
            brightness_min: BRIGHTNESS_MIN,
            brightness_max: BRIGHTNESS_MAX,
            contrast_min: CONTRAST_MIN,
            metrics_table: PathBuf::from(DEFAULT_METRICS_TABLE),
            annotated_table: PathBuf::from(DEFAULT_ANNOTATED_TABLE),
        }
    }
}

/// Load configuration from disk, optionally forcing a specific path.
pub fn load_audit_config(custom_path: Option<&Path>) -> AuditConfigHandle {
    let mut warnings = Vec::new();
    let candidates = get_config_candidates(custom_path);

    for candidate in candidates {
        if !candidate.exists() || !candidate.is_file() {
            continue;
        }

        match fs::read_to_string(&candidate) {
            Ok(contents) => match serde_yaml::from_str::<AuditConfig>(&contents) {
                Ok(config) => {
                    let sanitized = config.sanitize();
                    let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                    return AuditConfigHandle::with_config(sanitized, Some(source), warnings);
                }
                Err(err) => warnings.push(format!(
                    "Failed to parse audit config {}: {}",
                    candidate.display(),
                    err
                )),
            },
            Err(err) => warnings.push(format!(
                "Failed to read audit config {}: {}",
                candidate.display(),
                err
            )),
        }
    }

    warnings.push("No audit config found; using built-in defaults.".to_string());
    AuditConfigHandle::with_config(AuditConfig::default(), None, warnings)
}

/// Get list of config file candidates to try
fn get_config_candidates(custom_path: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = custom_path {
        candidates.push(path.to_path_buf());
    }

    if let Ok(env_path) = std::env::var("LUMAUDIT_CONFIG") {
        candidates.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(cwd.join("config").join(name));
            candidates.push(cwd.join(name));
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        for name in CONFIG_FILENAMES {
            candidates.push(home_dir.join("lumaudit").join(name));
        }
    }

    candidates
}

static AUDIT_CONFIG_HANDLE: OnceLock<AuditConfigHandle> = OnceLock::new();
static PRINT_CONFIG_ONCE: Once = Once::new();

/// Access the global audit configuration (loaded once per process).
pub fn audit_config_handle() -> &'static AuditConfigHandle {
    AUDIT_CONFIG_HANDLE.get_or_init(|| load_audit_config(None))
}

/// Print config source and warnings the first time it is requested (only in verbose mode).
pub fn log_config_usage() {
    PRINT_CONFIG_ONCE.call_once(|| {
        if !is_verbose() {
            return;
        }
        let handle = audit_config_handle();
        if let Some(source) = &handle.source {
            eprintln!("[lumaudit] Loaded audit config from {}", source.display());
        } else {
            eprintln!("[lumaudit] Using built-in audit defaults");
        }

        for warning in &handle.warnings {
            eprintln!("[lumaudit] Config warning: {}", warning);
        }
    });
}
