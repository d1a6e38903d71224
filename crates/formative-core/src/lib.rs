//! formative-core — weighted scoring and assessment workflow for a
//! composite question container.
//!
//! A parent container holds an ordered list of child question units; this
//! crate aggregates each child's correctness and weight into a single
//! percentage, keeps that aggregate consistent under authoring edits made
//! after students have answered, and drives the multi-step assessment
//! workflow (answer in sequence, submit, review, retry).

pub mod assessment;
pub mod attempt;
pub mod container;
pub mod error;
pub mod model;
pub mod score;
