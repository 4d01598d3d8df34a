//! Run-lifecycle event bus used by `findable-pipeline` to broadcast phase
//! transitions to whatever is watching a run (a CLI progress bar, a test
//! assertion, a future API layer).

pub mod bus;

pub use bus::{EventBus, RunEvent};
