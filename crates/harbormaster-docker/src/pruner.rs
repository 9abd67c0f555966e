//! Docker Engine implementation of the resource pruner

use crate::convert::{
    container_summary, format_until, list_failed, prune_failed, prune_report, removal_failed,
    volume_summary,
};
use bollard::query_parameters::{
    ListContainersOptionsBuilder, ListVolumesOptions, PruneBuildOptions, PruneContainersOptions,
    PruneContainersOptionsBuilder, PruneImagesOptions, PruneImagesOptionsBuilder,
    PruneNetworksOptions, RemoveContainerOptionsBuilder, RemoveVolumeOptions,
};
use bollard::Docker;
use harbormaster_domain::{
    ContainerSummary, ImagePruneScope, PruneReport, PrunerError, RemovalTarget, ResourceClass,
    ResourcePruner, VolumeSummary,
};
use std::collections::HashMap;
use std::time::SystemTime;

/// Resource pruner backed by a single Docker Engine connection
///
/// Holds one client for the lifetime of the daemon. Calls are issued one at
/// a time by the maintenance engine; the client is never shared.
pub struct DockerPruner {
    docker: Docker,
}

impl DockerPruner {
    /// Wrap an existing bollard client
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }
}

/// Stopped containers created before `until`
fn container_prune_options(until: SystemTime) -> PruneContainersOptions {
    let filters = HashMap::from([("until", vec![format_until(until)])]);
    PruneContainersOptionsBuilder::new().filters(&filters).build()
}

/// Unused images; untagged ones only for [`ImagePruneScope::Dangling`]
fn image_prune_options(scope: ImagePruneScope) -> PruneImagesOptions {
    let dangling = match scope {
        ImagePruneScope::Dangling => "true",
        ImagePruneScope::AllUnused => "false",
    };
    let filters = HashMap::from([("dangling", vec![dangling])]);
    PruneImagesOptionsBuilder::new().filters(&filters).build()
}

impl ResourcePruner for DockerPruner {
    async fn prune_containers(&self, until: SystemTime) -> Result<PruneReport, PrunerError> {
        let response = self
            .docker
            .prune_containers(Some(container_prune_options(until)))
            .await
            .map_err(prune_failed(ResourceClass::Containers))?;

        Ok(prune_report(
            response.containers_deleted,
            response.space_reclaimed,
        ))
    }

    async fn prune_images(&self, scope: ImagePruneScope) -> Result<PruneReport, PrunerError> {
        let response = self
            .docker
            .prune_images(Some(image_prune_options(scope)))
            .await
            .map_err(prune_failed(ResourceClass::Images))?;

        Ok(prune_report(response.images_deleted, response.space_reclaimed))
    }

    async fn prune_networks(&self) -> Result<PruneReport, PrunerError> {
        let response = self
            .docker
            .prune_networks(None::<PruneNetworksOptions>)
            .await
            .map_err(prune_failed(ResourceClass::Networks))?;

        Ok(prune_report(response.networks_deleted, None))
    }

    async fn prune_build_cache(&self) -> Result<PruneReport, PrunerError> {
        let response = self
            .docker
            .prune_build(None::<PruneBuildOptions>)
            .await
            .map_err(prune_failed(ResourceClass::BuildCache))?;

        Ok(prune_report(response.caches_deleted, response.space_reclaimed))
    }

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, PrunerError> {
        let options = ListContainersOptionsBuilder::new().all(true).build();

        let containers = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(list_failed(ResourceClass::Containers))?;

        Ok(containers.into_iter().filter_map(container_summary).collect())
    }

    async fn list_volumes(&self) -> Result<Vec<VolumeSummary>, PrunerError> {
        let response = self
            .docker
            .list_volumes(None::<ListVolumesOptions>)
            .await
            .map_err(list_failed(ResourceClass::Volumes))?;

        Ok(response
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(volume_summary)
            .collect())
    }

    async fn remove_container(&self, id: &str) -> Result<(), PrunerError> {
        let options = RemoveContainerOptionsBuilder::new().force(true).build();

        self.docker
            .remove_container(id, Some(options))
            .await
            .map_err(removal_failed(RemovalTarget::Container(id.to_string())))
    }

    async fn remove_volume(&self, name: &str) -> Result<(), PrunerError> {
        self.docker
            .remove_volume(name, None::<RemoveVolumeOptions>)
            .await
            .map_err(removal_failed(RemovalTarget::Volume(name.to_string())))
    }
}
