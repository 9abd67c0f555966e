//! Trait definitions for external interactions
//!
//! These traits define the boundary between the maintenance engine and the
//! container engine. Infrastructure implementations live in other crates.

use crate::{
    ContainerSummary, ImagePruneScope, PruneReport, PrunerError, VolumeSummary,
};
use std::future::Future;
use std::time::SystemTime;

/// Capability interface over a container engine
///
/// Implemented by the infrastructure layer (harbormaster-docker). Every
/// operation is independent and may fail on its own; failures carry the
/// resource class or target they concern.
///
/// Implementations may write each method as `async fn`.
pub trait ResourcePruner {
    /// Prune stopped containers created before `until`
    fn prune_containers(
        &self,
        until: SystemTime,
    ) -> impl Future<Output = Result<PruneReport, PrunerError>> + Send;

    /// Prune images no container references
    fn prune_images(
        &self,
        scope: ImagePruneScope,
    ) -> impl Future<Output = Result<PruneReport, PrunerError>> + Send;

    /// Prune networks no container is attached to
    fn prune_networks(&self) -> impl Future<Output = Result<PruneReport, PrunerError>> + Send;

    /// Prune dangling build cache
    fn prune_build_cache(&self) -> impl Future<Output = Result<PruneReport, PrunerError>> + Send;

    /// List every container, including stopped ones
    fn list_containers(
        &self,
    ) -> impl Future<Output = Result<Vec<ContainerSummary>, PrunerError>> + Send;

    /// List every volume
    fn list_volumes(&self) -> impl Future<Output = Result<Vec<VolumeSummary>, PrunerError>> + Send;

    /// Force-remove one container by id
    fn remove_container(&self, id: &str) -> impl Future<Output = Result<(), PrunerError>> + Send;

    /// Remove one volume by name
    fn remove_volume(&self, name: &str) -> impl Future<Output = Result<(), PrunerError>> + Send;
}
