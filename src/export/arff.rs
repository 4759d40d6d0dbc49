//! ARFF export of a labelled feature matrix

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{ensure_parent_dir, format_double};
use crate::features::FeatureSet;
use crate::{MatchRecord, Outcome, Result, SoccerError};

/// Write rows and labels as an ARFF relation with numeric attributes `x0..`
pub fn write_arff<W: Write>(mut out: W, relation: &str, rows: &[Vec<f64>], labels: &[usize]) -> Result<()> {
    if rows.len() != labels.len() {
        return Err(SoccerError::InvalidLabels(format!(
            "{} rows but {} labels",
            rows.len(),
            labels.len()
        )));
    }
    let class_tokens: Vec<&str> = Outcome::ALL.iter().map(|o| o.token()).collect();

    write!(out, "@relation {}\n\n", relation)?;
    let width = rows.first().map_or(0, |r| r.len());
    for i in 0..width {
        writeln!(out, "@attribute x{} numeric", i)?;
    }
    write!(out, "@attribute class {{{}}}\n\n", class_tokens.join(","))?;

    writeln!(out, "@data")?;
    for (row, &label) in rows.iter().zip(labels) {
        let outcome = Outcome::from_label(label)
            .ok_or_else(|| SoccerError::InvalidLabels(format!("label {} out of range", label)))?;
        let values: Vec<String> = row.iter().map(|&v| format_double(v)).collect();
        writeln!(out, "{},{}", values.join(","), outcome.token())?;
    }
    out.flush()?;
    Ok(())
}

/// Export one feature set of `records` (unnormalized) to an ARFF file
pub fn export_feature_set(path: impl AsRef<Path>, set: FeatureSet, records: &[MatchRecord]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent_dir(path)?;
    let relation = format!("soccer_{}", relation_suffix(set));
    let file = BufWriter::new(File::create(path)?);
    write_arff(file, &relation, &set.build(records), &FeatureSet::labels(records))?;
    log::info!(
        "Exported {} records ({} features) to {}",
        records.len(),
        set.name(),
        path.display()
    );
    Ok(())
}

/// `EnhancedCombined` -> `enhanced_combined`
fn relation_suffix(set: FeatureSet) -> String {
    let mut out = String::new();
    for (i, ch) in set.name().chars().enumerate() {
        if ch.is_ascii_uppercase() && i > 0 {
            out.push('_');
        }
        out.push(ch.to_ascii_lowercase());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::pipeline::tests::synthetic_records;

    #[test]
    fn test_exact_layout() {
        let mut buf = Vec::new();
        write_arff(&mut buf, "demo", &[vec![1.0, 0.25], vec![3.5, 2.0]], &[0, 2]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "@relation demo\n\n\
             @attribute x0 numeric\n\
             @attribute x1 numeric\n\
             @attribute class {home,draw,away}\n\n\
             @data\n\
             1.0,0.25,home\n\
             3.5,2.0,away\n"
        );
    }

    #[test]
    fn test_label_mismatch_rejected() {
        let mut buf = Vec::new();
        assert!(write_arff(&mut buf, "demo", &[vec![1.0]], &[]).is_err());
        assert!(write_arff(&mut Vec::new(), "demo", &[vec![1.0]], &[7]).is_err());
    }

    #[test]
    fn test_relation_suffix() {
        assert_eq!(relation_suffix(FeatureSet::Combined), "combined");
        assert_eq!(relation_suffix(FeatureSet::EnhancedCombined), "enhanced_combined");
    }

    #[test]
    fn test_export_combined_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("soccer_combined.arff");
        let records = synthetic_records(4);
        export_feature_set(&path, FeatureSet::Combined, &records).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("@relation soccer_combined\n\n"));
        assert_eq!(text.matches("numeric").count(), 23);
        let data: Vec<&str> = text.split("@data\n").nth(1).unwrap().lines().collect();
        assert_eq!(data.len(), 4);
        assert!(data[1].ends_with(",draw"));
        assert_eq!(data[0].split(',').count(), 24);
    }
}
