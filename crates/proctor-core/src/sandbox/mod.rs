//! Sandboxed local execution of submitted source
//!
//! Only languages that can be embedded in-process run here; everything else
//! goes through the remote judge.

mod executor;
mod limits;

pub use executor::{EntryPoint, LoadOutcome, LocalExecutor};
pub use limits::SandboxLimits;
