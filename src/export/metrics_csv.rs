//! Append-only CSV of model metrics

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use super::{ensure_parent_dir, format_double};
use crate::training::TrainedModel;
use crate::Result;

pub const HEADER: &str = "modelType,featureSet,accuracy,\
precision_home,recall_home,f1_home,\
precision_draw,recall_draw,f1_draw,\
precision_away,recall_away,f1_away,\
cm_hh,cm_hd,cm_ha,cm_dh,cm_dd,cm_da,cm_ah,cm_ad,cm_aa";

/// One CSV line (no newline) for a trained model
pub fn metrics_row(model: &TrainedModel) -> String {
    let m = &model.metrics;
    let mut fields = vec![
        model.kind.name().to_string(),
        model.feature_set.name().to_string(),
        format_double(m.accuracy),
    ];
    for c in 0..m.num_classes() {
        fields.push(format_double(m.precision[c]));
        fields.push(format_double(m.recall[c]));
        fields.push(format_double(m.f1[c]));
    }
    for row in &m.confusion {
        fields.extend(row.iter().map(|&count| format_double(count as f64)));
    }
    fields.join(",")
}

/// Append a row, writing the header first when the file is new
pub fn append_metrics(path: impl AsRef<Path>, model: &TrainedModel) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let write_header = !path.exists();

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if write_header {
        writeln!(file, "{}", HEADER)?;
    }
    writeln!(file, "{}", metrics_row(model))?;
    Ok(())
}
