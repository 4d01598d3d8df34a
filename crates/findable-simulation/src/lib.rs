//! # Findable Simulation
//!
//! C11–C12 of the audit pipeline: generate a deterministic question bank for
//! a site and run it against that site's retrieval index to produce a
//! `SimulationResult` the v2 score calculator folds into the Retrieval and
//! Coverage pillars.

pub mod questions;
pub mod runner;

pub use questions::generate_questions;
pub use runner::run_simulation;
