//! Outcome of a single maintenance cycle

use harbormaster_domain::{PruneReport, ResourceClass};
use std::collections::HashMap;
use std::time::Duration;

/// What one successful maintenance cycle did
///
/// Built fresh for every cycle and handed back to the caller; nothing in it
/// carries over to the next cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    /// Whether the build-cache phase was switched off
    pub build_cache_skipped: bool,

    /// Bulk prune results per resource class
    pub pruned: HashMap<ResourceClass, PruneReport>,

    /// Ids of force-removed containers, in removal order
    pub containers_removed: Vec<String>,

    /// Names of removed volumes, in removal order
    pub volumes_removed: Vec<String>,

    /// Unreferenced volumes kept because they are younger than the window
    pub volumes_too_young: usize,

    /// Volumes kept because they are referenced or their usage is unknown
    pub volumes_in_use: usize,

    /// Wall time spent in the cycle
    pub elapsed: Duration,
}

impl CycleReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a bulk prune result
    pub fn record_prune(&mut self, class: ResourceClass, report: PruneReport) {
        self.pruned.insert(class, report);
    }

    /// Record a container removal
    pub fn record_container_removal(&mut self, id: &str) {
        self.containers_removed.push(id.to_string());
    }

    /// Record a volume removal
    pub fn record_volume_removal(&mut self, name: &str) {
        self.volumes_removed.push(name.to_string());
    }

    /// Get total items deleted by bulk prunes
    pub fn total_pruned(&self) -> usize {
        self.pruned.values().map(|r| r.deleted).sum()
    }

    /// Get total bytes the engine reported as reclaimed
    pub fn space_reclaimed(&self) -> u64 {
        self.pruned.values().filter_map(|r| r.space_reclaimed).sum()
    }

    /// Get total volumes left in place
    pub fn volumes_skipped(&self) -> usize {
        self.volumes_too_young + self.volumes_in_use
    }

    /// Generate a one-line summary
    pub fn summary(&self) -> String {
        let build_cache = if self.build_cache_skipped {
            "build cache skipped".to_string()
        } else {
            format!(
                "{} pruned ({} bytes reclaimed)",
                self.total_pruned(),
                self.space_reclaimed()
            )
        };

        format!(
            "{}; {} containers removed; {} volumes removed, {} kept ({} too young, {} in use); took {:.1}s",
            build_cache,
            self.containers_removed.len(),
            self.volumes_removed.len(),
            self.volumes_skipped(),
            self.volumes_too_young,
            self.volumes_in_use,
            self.elapsed.as_secs_f64()
        )
    }
}
