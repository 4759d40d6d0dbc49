//! Flat-file exports
//!
//! Per-model metrics as CSV and labelled feature matrices as ARFF.

pub mod arff;
pub mod metrics_csv;

pub use arff::{export_feature_set, write_arff};
pub use metrics_csv::append_metrics;

use std::path::Path;

/// Shortest round-trip decimal in `Double.toString` notation.
///
/// Magnitudes in `[1e-3, 1e7)` print as plain decimals with at least one
/// fractional digit (`12.0`); others use `d.dddE<exp>` (`1.0E-5`).
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if value == 0.0 || (1e-3..1e7).contains(&magnitude) {
        return format!("{:?}", value);
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    if mantissa.contains('.') {
        format!("{}E{}", mantissa, exponent)
    } else {
        format!("{}.0E{}", mantissa, exponent)
    }
}

/// Create the parent directory of `path` if it has one
pub(crate) fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
