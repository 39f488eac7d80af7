//! Health probes for orchestration platforms.
//!
//! A probe is a named, ordered set of checks exposed at `{prefix}/{name}`.
//! It is healthy only when every check is. A failing check never stops the
//! others from running and being reported.

pub mod check;
pub mod probe;
pub mod registry;

pub use check::{CheckStatus, FnCheck, HealthCheck};
pub use probe::{CheckReport, HealthStatus, Probe, ProbeReport};
pub use registry::{HealthError, ProbeRegistry, ProbeRegistryBuilder};
