//! Pruner error - failures surfaced by a container engine adapter

use crate::{RemovalTarget, ResourceClass};
use std::fmt;

/// Error returned by a [`ResourcePruner`](crate::ResourcePruner) call
///
/// Every variant names what failed. Adapters surface these as-is and never
/// swallow them; callers decide whether a failure is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrunerError {
    /// The engine could not be reached (socket, pipe or transport failure)
    EngineUnreachable {
        /// Underlying cause
        reason: String,
    },

    /// A bulk prune call was rejected by the engine
    PruneFailed {
        /// Class that was being pruned
        class: ResourceClass,
        /// Underlying cause
        reason: String,
    },

    /// An inventory call was rejected by the engine
    ListFailed {
        /// Class that was being listed
        class: ResourceClass,
        /// Underlying cause
        reason: String,
    },

    /// Removing a single container or volume failed
    RemovalFailed {
        /// What was being removed
        target: RemovalTarget,
        /// Underlying cause
        reason: String,
    },
}

impl PrunerError {
    /// Resource class the failure concerns, if any
    pub fn class(&self) -> Option<ResourceClass> {
        match self {
            PrunerError::EngineUnreachable { .. } => None,
            PrunerError::PruneFailed { class, .. } | PrunerError::ListFailed { class, .. } => {
                Some(*class)
            }
            PrunerError::RemovalFailed { target, .. } => Some(target.class()),
        }
    }
}

impl fmt::Display for PrunerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrunerError::EngineUnreachable { reason } => {
                write!(f, "container engine unreachable: {}", reason)
            }
            PrunerError::PruneFailed { class, reason } => {
                write!(f, "failed to prune {}: {}", class, reason)
            }
            PrunerError::ListFailed { class, reason } => {
                write!(f, "failed to list {}: {}", class, reason)
            }
            PrunerError::RemovalFailed { target, reason } => {
                write!(f, "failed to remove {}: {}", target, reason)
            }
        }
    }
}

impl std::error::Error for PrunerError {}
