//! Error types for Janitor operations

use harbormaster_domain::PrunerError;
use std::fmt;
use thiserror::Error;

/// Phase of a maintenance cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Bulk prune of containers, images, networks and build cache
    BuildCache,

    /// Force-removal of exited and dead containers
    DeadContainers,

    /// Removal of unreferenced volumes past retention
    Volumes,
}

impl Phase {
    /// Get the phase name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::BuildCache => "build-cache",
            Phase::DeadContainers => "dead-container",
            Phase::Volumes => "volume",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during Janitor operations
#[derive(Error, Debug)]
pub enum JanitorError {
    /// A cycle phase failed; the cause is the pruner error, unmodified
    #[error("Maintenance {phase} phase failed: {source}")]
    Phase {
        /// Phase that was running
        phase: Phase,
        /// Pruner failure that ended the phase
        #[source]
        source: PrunerError,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The worker already stopped after a failed cycle
    #[error("Worker terminated after a failed cycle; no further cycles will run")]
    Terminated,
}

impl JanitorError {
    /// Wrap a pruner failure with the phase it ended
    pub fn phase(phase: Phase, source: PrunerError) -> Self {
        JanitorError::Phase { phase, source }
    }

    /// Phase the error came from, if it was a cycle failure
    pub fn failed_phase(&self) -> Option<Phase> {
        match self {
            JanitorError::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harbormaster_domain::{RemovalTarget, ResourceClass};
    use std::error::Error as _;

    #[test]
    fn test_phase_error_keeps_cause() {
        let cause = PrunerError::RemovalFailed {
            target: RemovalTarget::Container("c1".to_string()),
            reason: "device busy".to_string(),
        };
        let err = JanitorError::phase(Phase::DeadContainers, cause.clone());

        assert_eq!(err.failed_phase(), Some(Phase::DeadContainers));
        assert_eq!(
            err.to_string(),
            "Maintenance dead-container phase failed: failed to remove container c1: device busy"
        );

        let source = err.source().unwrap().downcast_ref::<PrunerError>().unwrap();
        assert_eq!(source, &cause);
    }

    #[test]
    fn test_non_phase_errors() {
        assert_eq!(JanitorError::Terminated.failed_phase(), None);
        let err = JanitorError::phase(
            Phase::BuildCache,
            PrunerError::PruneFailed {
                class: ResourceClass::Images,
                reason: "conflict".to_string(),
            },
        );
        assert!(err.to_string().starts_with("Maintenance build-cache phase failed"));
    }
}
