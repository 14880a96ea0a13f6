//! WaveMind core: an EEG diagnostic-support pipeline.
//!
//! Turns a single biosignal recording (`.csv`, `.edf`, or `.mat`) into a
//! uniform labeled feature table, fits a seeded random-forest classifier,
//! and reports a suggested diagnosis plus a per-class quality summary.
//!
//! The presentation layer (CLI here; a GUI elsewhere) is a thin consumer
//! of four operations:
//!
//! * [`load_file`]: file → [`Dataset`]
//! * [`train`]: dataset → model + diagnosis + [`TrainReport`]
//! * [`predict_row`]: raw classifier output for one row
//! * [`resolve`]: class code → diagnostic label, total, never fails

pub mod data;
pub mod diagnosis;
pub mod error;
pub mod ml;
pub mod pipeline;
pub mod report;
pub mod state;

pub use data::loader::load_file;
pub use data::model::Dataset;
pub use diagnosis::resolve;
pub use error::{PipelineError, Result};
pub use ml::forest::RandomForest;
pub use ml::metrics::EvaluationReport;
pub use pipeline::trainer::{predict_row, train, TrainOutcome, TrainReport};
pub use report::{render_summary, PatientInfo};
pub use state::Session;

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;

    fn tmp_csv(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("wavemind-e2e-{}-{name}", std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn end_to_end_single_class_csv() {
        // 10 rows, f0/f1/label, every label 1: warning path, no table.
        let mut csv = String::from("f0,f1,label\n");
        for i in 0..10 {
            csv.push_str(&format!("{}.0,{}.0,1\n", i, i * 3));
        }
        let path = tmp_csv("single.csv", &csv);
        let dataset = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let outcome = train(&dataset).unwrap();
        assert!(matches!(outcome.report, TrainReport::SingleClass { .. }));
        assert_ne!(resolve(outcome.diagnosis_code), "");
    }

    #[test]
    fn end_to_end_multi_class_csv() {
        // ≥2 distinct labels over ≥6 rows: full report plus aggregates.
        let mut csv = String::from("f0,f1,label\n");
        for i in 0..20 {
            for (label, base) in [(0, 0.0), (1, 50.0), (2, 100.0)] {
                csv.push_str(&format!("{},{},{label}\n", base + i as f64, base));
            }
        }
        let path = tmp_csv("multi.csv", &csv);
        let dataset = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let outcome = train(&dataset).unwrap();
        let TrainReport::Evaluated(report) = &outcome.report else {
            panic!("expected evaluation report");
        };
        let classes: Vec<i64> = report.per_class.keys().copied().collect();
        assert_eq!(classes, vec![0, 1, 2]);
        assert!((0..4).contains(&outcome.diagnosis_code));

        // The same model answers row-level prediction requests.
        let code = predict_row(&outcome.model, &dataset, 0).unwrap();
        assert_eq!(code, outcome.diagnosis_code);
    }
}
