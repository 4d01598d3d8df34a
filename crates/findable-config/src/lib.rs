//! Environment loading and operator-input validation for the Findable audit
//! core, layered on top of the plain config shapes in
//! `findable_types::config` and `findable_types::calibration`.
//!
//! This crate owns two concerns only:
//!
//! - **Environment variables** ([`env`]): `FINDABLE_CRAWL_*` and
//!   `FINDABLE_PIPELINE_*` overrides on top of `CrawlConfig`/
//!   `PipelineConfig`'s defaults.
//! - **Validation** ([`validate`]): sanity checks on the resulting config
//!   before a run launches (positive counts, sane ceilings, calibration
//!   weights summing to 100).
//!
//! Everything upstream of these two concerns — the HTTP API surface that
//! would accept operator input over the wire, authentication, and request
//! rate limiting — is an external collaborator (spec.md §1's Out of scope
//! list) and lives outside this workspace.

mod env;
mod validate;

pub use env::{load_crawl_config, load_pipeline_config, EnvConfigLoader, EnvError};
pub use validate::{
    validate_calibration_config, validate_crawl_config, validate_pipeline_config, ValidationError,
    MAX_DEPTH_CEILING, MAX_PAGES_CEILING,
};
