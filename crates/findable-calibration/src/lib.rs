//! # Findable Calibration
//!
//! C14 of the audit pipeline: deterministic experiment-arm assignment,
//! append-only sample logging joined against observed ground truth, drift
//! detection between a rolling and baseline window, and an offline
//! winner-annotation pass over A/B experiments. Never activates a
//! `CalibrationConfig` on its own — see spec.md §9's design note.

pub mod arm;
pub mod drift;
pub mod experiment;
pub mod samples;

pub use arm::arm;
pub use drift::{compute_window_metrics, detect_drift, transition, DriftConfig, WindowMetrics};
pub use experiment::evaluate;
pub use samples::{join_ground_truth, record_sample};
