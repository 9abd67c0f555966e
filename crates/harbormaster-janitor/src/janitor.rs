//! Core Janitor implementation: one ordered maintenance cycle

use crate::error::Phase;
use crate::{CycleReport, JanitorConfig, JanitorError};
use harbormaster_domain::retention::{self, VolumeVerdict};
use harbormaster_domain::{PrunerError, ResourceClass, ResourcePruner};
use std::time::{Duration, Instant, SystemTime};

/// Stopped containers younger than this survive the build-cache phase
pub const CONTAINER_PRUNE_AGE: Duration = Duration::from_secs(24 * 3600);

/// Janitor service that reclaims unused engine resources
///
/// A cycle runs three phases strictly in order:
/// 1. Build-cache clear (containers older than a day, images, networks, build cache)
/// 2. Dead-container reaping
/// 3. Volume reaping under the retention window
///
/// Every engine call is awaited before the next one is issued. The first
/// failure ends the cycle; work already done is not rolled back.
///
/// # Examples
///
/// ```no_run
/// use harbormaster_janitor::{Janitor, JanitorConfig};
/// use harbormaster_docker::DockerPruner;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let pruner = DockerPruner::connect("/var/run/docker.sock").await?;
/// let janitor = Janitor::new(pruner, JanitorConfig::default());
///
/// let report = janitor.run_cycle().await?;
/// println!("{}", report.summary());
/// # Ok(())
/// # }
/// ```
pub struct Janitor<P> {
    pruner: P,
    config: JanitorConfig,
}

impl<P: ResourcePruner> Janitor<P> {
    /// Create a new Janitor over the given engine connection
    pub fn new(pruner: P, config: JanitorConfig) -> Self {
        Self { pruner, config }
    }

    /// Get the configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Get the engine connection
    pub fn pruner(&self) -> &P {
        &self.pruner
    }

    /// Run one complete cycle as of the current wall-clock time
    ///
    /// Each phase that judges ages reads the clock when it starts.
    pub async fn run_cycle(&self) -> Result<CycleReport, JanitorError> {
        self.run_cycle_with(SystemTime::now).await
    }

    /// Run one complete cycle, judging ages relative to `now`
    ///
    /// `now` sets both the container prune cutoff and the instant volume
    /// ages are measured at.
    pub async fn run_cycle_at(&self, now: SystemTime) -> Result<CycleReport, JanitorError> {
        self.run_cycle_with(move || now).await
    }

    /// Run one complete cycle, reading `clock` at the start of each phase
    /// that judges ages
    ///
    /// # Errors
    ///
    /// Returns [`JanitorError::Phase`] naming the phase that failed and
    /// carrying the pruner error unchanged. Later phases do not run.
    pub async fn run_cycle_with<C>(&self, clock: C) -> Result<CycleReport, JanitorError>
    where
        C: Fn() -> SystemTime,
    {
        let start = Instant::now();
        let mut report = CycleReport::new();

        tracing::info!("Starting maintenance cycle");

        self.clear_build_cache(&mut report, &clock)
            .await
            .map_err(|e| JanitorError::phase(Phase::BuildCache, e))?;
        self.reap_dead_containers(&mut report)
            .await
            .map_err(|e| JanitorError::phase(Phase::DeadContainers, e))?;
        self.reap_volumes(&mut report, clock())
            .await
            .map_err(|e| JanitorError::phase(Phase::Volumes, e))?;

        report.elapsed = start.elapsed();
        tracing::info!("Maintenance cycle complete");

        Ok(report)
    }

    /// Phase 1: bulk prunes, gated by `remove_build_cache`
    ///
    /// Sub-steps run in a fixed order and the first failure stops the rest.
    async fn clear_build_cache<C>(&self, report: &mut CycleReport, clock: C) -> Result<(), PrunerError>
    where
        C: Fn() -> SystemTime,
    {
        if !self.config.remove_build_cache {
            tracing::info!("Build cache removal is disabled");
            report.build_cache_skipped = true;
            return Ok(());
        }

        let scope = self.config.image_prune_scope();

        if self.config.dry_run {
            tracing::info!(
                "DRY RUN: Would prune containers older than 24h, {:?} images, networks and build cache",
                scope
            );
            return Ok(());
        }

        tracing::info!("Clearing build cache");
        let until = clock()
            .checked_sub(CONTAINER_PRUNE_AGE).unwrap_or(SystemTime::UNIX_EPOCH);

        let pruned = self.pruner.prune_containers(until).await?;
        log_prune(ResourceClass::Containers, &pruned);
        report.record_prune(ResourceClass::Containers, pruned);

        let pruned = self.pruner.prune_images(scope).await?;
        log_prune(ResourceClass::Images, &pruned);
        report.record_prune(ResourceClass::Images, pruned);

        let pruned = self.pruner.prune_networks().await?;
        log_prune(ResourceClass::Networks, &pruned);
        report.record_prune(ResourceClass::Networks, pruned);

        let pruned = self.pruner.prune_build_cache().await?;
        log_prune(ResourceClass::BuildCache, &pruned);
        report.record_prune(ResourceClass::BuildCache, pruned);

        tracing::info!("Build cache cleared");
        Ok(())
    }

    /// Phase 2: force-remove exited and dead containers, one at a time
    async fn reap_dead_containers(&self, report: &mut CycleReport) -> Result<(), PrunerError> {
        let containers = self.pruner.list_containers().await?;
        let dead: Vec<_> = containers
            .into_iter()
            .filter(|c| c.is_exited_or_dead())
            .collect();

        tracing::debug!("Found {} exited or dead containers", dead.len());

        for container in dead {
            if self.config.dry_run {
                tracing::info!(
                    "DRY RUN: Would remove container {} ({})",
                    container.id,
                    container.status
                );
                continue;
            }

            self.pruner.remove_container(&container.id).await?;
            tracing::info!(
                "Removed container {}{}",
                container.id,
                container
                    .name
                    .as_deref()
                    .map(|n| format!(" ({})", n))
                    .unwrap_or_default()
            );
            report.record_container_removal(&container.id);
        }

        Ok(())
    }

    /// Phase 3: remove unreferenced volumes past the retention window
    ///
    /// Every volume is judged against the same `now`.
    async fn reap_volumes(&self, report: &mut CycleReport, now: SystemTime) -> Result<(), PrunerError> {
        let volumes = self.pruner.list_volumes().await?;
        let retention_days = self.config.volume_retention_days;

        for volume in volumes {
            match retention::evaluate(&volume, retention_days, now) {
                VolumeVerdict::InUse => {
                    tracing::info!(
                        "Volume {} is in use or lacks usage data; keeping it",
                        volume.name
                    );
                    report.volumes_in_use += 1;
                }
                VolumeVerdict::TooYoung { age_days } => {
                    tracing::info!(
                        "Volume {} has not reached minimum retention ({:.1} day(s))",
                        volume.name,
                        age_days
                    );
                    report.volumes_too_young += 1;
                }
                VolumeVerdict::Eligible if self.config.dry_run => {
                    tracing::info!("DRY RUN: Would remove volume {}", volume.name);
                }
                VolumeVerdict::Eligible => {
                    self.pruner.remove_volume(&volume.name).await?;
                    tracing::info!("Removed volume {}", volume.name);
                    report.record_volume_removal(&volume.name);
                }
            }
        }

        Ok(())
    }
}

fn log_prune(class: ResourceClass, report: &harbormaster_domain::PruneReport) {
    match report.space_reclaimed {
        Some(bytes) => tracing::info!(
            "Pruned {} {} ({} bytes reclaimed)",
            report.deleted,
            class,
            bytes
        ),
        None => tracing::info!("Pruned {} {}", report.deleted, class),
    }
}
