use std::io;

use thiserror::Error;

/// Everything the pipeline can report back to its caller.
///
/// Every variant carries a human-readable cause; the presentation layer
/// decides how to show it. The core never terminates the process.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Unrecognized file extension, or a container with no usable entry.
    #[error("unsupported format: {0}")]
    Format(String),

    /// The file could not be read at all.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file was read but its contents are malformed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Tabular input without a `label` column cannot be trained on.
    #[error("dataset has no 'label' column")]
    MissingLabel,

    /// Training or reporting was requested before any successful load.
    #[error("no dataset loaded")]
    EmptyDataset,

    /// Feature-shape mismatch between a dataset row and the current model.
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// Patient metadata failed validation (empty field).
    #[error("invalid patient data: {0}")]
    Patient(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
