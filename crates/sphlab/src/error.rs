//! Solver error taxonomy.

use std::fmt;

/// Errors surfaced by solver construction, injection, and registration.
///
/// Stepping itself never fails: numerical blowups stay observable through
/// the diagnostics rather than aborting the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// A configuration, fluid definition, injection box, or obstacle failed
    /// validation. The message names the offending field.
    InvalidConfig(String),
    /// An injection would exceed the particle capacity. No particles were
    /// added.
    Capacity {
        /// Particles the injection would have created.
        requested: usize,
        /// Particles already live.
        active: usize,
        /// Hard particle limit from the configuration.
        capacity: usize,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            SolverError::Capacity {
                requested,
                active,
                capacity,
            } => write!(
                f,
                "particle capacity exceeded: requested {requested} with {active} active \
                 (capacity {capacity})"
            ),
        }
    }
}

impl std::error::Error for SolverError {}
