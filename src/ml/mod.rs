//! ML layer: the ensemble classifier and its evaluation.
//!
//! ```text
//!   ┌──────────┐   bootstrap + √F feature subsets   ┌──────────┐
//!   │  forest   │ ─────────────────────────────────▶ │   tree    │
//!   └──────────┘        (seeded ChaCha8 per tree)    └──────────┘
//!        │
//!        ▼ predictions on the test partition
//!   ┌──────────┐
//!   │ metrics   │  confusion counts → EvaluationReport
//!   └──────────┘
//! ```
//!
//! Everything here is deterministic for a fixed seed and single-threaded;
//! the pipeline contract is synchronous request/response.
pub mod forest;
pub mod metrics;
pub mod tree;
