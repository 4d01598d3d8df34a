//! Capability traits consumed by the audit core.
//!
//! Global mutable state (a singleton cache, Prometheus counters) is
//! wrapped in capabilities injected into the pipeline instead of living as
//! module-level statics. `PersistenceStore` describes the persistence
//! surface the core consumes as an interface only — no database driver
//! lives here.

pub mod clock;
pub mod metrics;
pub mod persistence;

pub use clock::Clock;
pub use metrics::Metrics;
pub use persistence::PersistenceStore;
