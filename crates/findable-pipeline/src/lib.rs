//! # Findable Pipeline
//!
//! Run orchestration: ties C1-C16 into one audit (`run_audit`). Crawl via
//! `findable-spider`, extract via `findable-extraction`, analyze via
//! `findable-analyzers`, index and simulate via `findable-retrieval`/
//! `findable-simulation`, score via `findable-scoring`. Persists the run
//! through whatever `PersistenceStore` it's handed and publishes
//! `RunEvent`s through an `EventBus` as it goes.

pub mod aggregate;
pub mod config;
pub mod orchestrator;
pub mod site_context;

pub use config::AuditConfig;
pub use orchestrator::{run_audit, RunOutcome};
pub use site_context::build_site_context;
