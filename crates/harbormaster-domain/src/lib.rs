//! Harbormaster Domain Layer
//!
//! Core model and decision logic for the Harbormaster maintenance daemon.
//! Like every domain crate in this workspace it has ZERO external
//! dependencies: it defines the resources the daemon reasons about, the
//! volume retention rule, and the trait boundary to the container engine.
//!
//! ## Key Concepts
//!
//! - **Resource classes**: containers, images, networks, build cache, volumes
//! - **Summaries**: transient views of containers and volumes, read fresh each cycle
//! - **Retention**: when an unreferenced volume is old enough to be removed
//! - **Pruner**: the capability interface the maintenance engine drives
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure decisions only (no I/O, no clocks read internally)
//! - Engine adapters live in other crates and implement [`traits::ResourcePruner`]

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod resource;
pub mod retention;
pub mod traits;

// Re-exports for convenience
pub use error::PrunerError;
pub use resource::{
    ContainerSummary, ImagePruneScope, PruneReport, RemovalTarget, ResourceClass, VolumeSummary,
};
pub use retention::{is_eligible_for_removal, VolumeVerdict};
pub use traits::ResourcePruner;
