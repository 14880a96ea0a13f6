//! Pipeline layer: from a loaded `Dataset` to a diagnosis and report.
//!
//! ```text
//!   ┌──────────┐ <2 distinct labels ┌──────────┐
//!   │ Dataset   │ ─────────────────▶ │ balance   │  noise-augmented copy
//!   └──────────┘                    └──────────┘
//!        │                               │
//!        ▼                               ▼
//!   ┌─────────────────────────────────────────┐
//!   │ trainer: subsample → split → fit → eval  │
//!   └─────────────────────────────────────────┘
//!        │
//!        ▼ diagnosis code for row 0 + TrainReport
//! ```
//!
//! Stateless per call; the caller guarantees at most one pipeline
//! execution in flight at a time.
pub mod balance;
pub mod trainer;
