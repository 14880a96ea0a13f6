use crate::data::model::Dataset;
use crate::ml::forest::RandomForest;

// ---------------------------------------------------------------------------
// Session state for the presentation shell
// ---------------------------------------------------------------------------

/// The holder a presentation layer keeps between user actions. The core
/// pipeline itself is stateless; this is the one place where "current
/// dataset" and "current model" live.
#[derive(Debug, Default)]
pub struct Session {
    /// Loaded dataset (None until a file loads successfully).
    dataset: Option<Dataset>,
    /// Model from the most recent training run. Cleared whenever a new
    /// dataset loads: a model fitted on the old data must not silently
    /// answer predictions against the new one.
    model: Option<RandomForest>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a newly loaded dataset, invalidating any stale model.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = Some(dataset);
        self.model = None;
    }

    pub fn set_model(&mut self, model: RandomForest) {
        self.model = Some(model);
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn model(&self) -> Option<&RandomForest> {
        self.model.as_ref()
    }
}
