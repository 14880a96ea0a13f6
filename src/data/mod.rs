//! Data layer: core types and format adapters.
//!
//! ```text
//!  .csv / .edf / .mat
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Dataset (one standard table)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Dataset  │  rows × features, label column split out
//!   └──────────┘
//! ```
//!
//! Whatever the source format, downstream components only ever see the
//! standardized `Dataset`.
pub mod loader;
pub mod model;
