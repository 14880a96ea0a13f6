use std::fmt::Write as _;

use serde::Serialize;

use crate::diagnosis::{describe, resolve};
use crate::error::{PipelineError, Result};
use crate::pipeline::trainer::{TrainOutcome, TrainReport};

// ---------------------------------------------------------------------------
// Clinical summary – plain-text report for the presentation layer
// ---------------------------------------------------------------------------

/// Patient metadata supplied by the presentation layer. Opaque strings,
/// unvalidated beyond being non-empty.
#[derive(Debug, Clone, Serialize)]
pub struct PatientInfo {
    pub name: String,
    pub age: String,
    pub id: String,
}

impl PatientInfo {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("name", &self.name), ("age", &self.age), ("id", &self.id)] {
            if value.trim().is_empty() {
                return Err(PipelineError::Patient(format!("missing patient {field}")));
            }
        }
        Ok(())
    }
}

/// Assemble the text of the clinical report: patient data, suggested
/// diagnosis with its description, and the technical summary. How it is
/// rendered (screen, PDF, ...) is the caller's business.
pub fn render_summary(patient: &PatientInfo, outcome: &TrainOutcome) -> Result<String> {
    patient.validate()?;
    let diagnosis = resolve(outcome.diagnosis_code);

    let mut out = String::new();
    let _ = writeln!(out, "WaveMind - Clinical EEG Report");
    let _ = writeln!(out);
    let _ = writeln!(out, "Patient data:");
    let _ = writeln!(out, "  Name: {}", patient.name);
    let _ = writeln!(out, "  Age:  {}", patient.age);
    let _ = writeln!(out, "  ID:   {}", patient.id);
    let _ = writeln!(out);
    let _ = writeln!(out, "Suggested diagnosis: {diagnosis}");
    let _ = writeln!(out, "{}", describe(diagnosis));
    let _ = writeln!(out);
    let _ = writeln!(out, "Technical summary:");
    match &outcome.report {
        TrainReport::SingleClass { warning } => {
            let _ = writeln!(out, "{warning}");
        }
        TrainReport::Evaluated(report) => {
            let _ = writeln!(out, "{report}");
        }
    }
    Ok(out)
}
