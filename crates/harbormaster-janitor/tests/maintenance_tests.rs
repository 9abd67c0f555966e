//! Integration tests for the maintenance cycle and worker

use harbormaster_domain::{
    ContainerSummary, ImagePruneScope, PruneReport, PrunerError, RemovalTarget, ResourcePruner,
    VolumeSummary,
};
use harbormaster_janitor::{
    Janitor, JanitorConfig, JanitorWorker, Phase, SchedulerState, WorkerExit,
};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

const DAY_SECS: f64 = 86_400.0;

/// In-memory engine: removals really remove, so later cycles see the result
#[derive(Default)]
struct FakeEngine {
    containers: Mutex<Vec<ContainerSummary>>,
    volumes: Mutex<Vec<VolumeSummary>>,
    broken_volume: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeEngine {
    fn log(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn volume_names(&self) -> Vec<String> {
        self.volumes
            .lock()
            .unwrap()
            .iter()
            .map(|v| v.name.clone())
            .collect()
    }
}

impl ResourcePruner for FakeEngine {
    async fn prune_containers(&self, _until: SystemTime) -> Result<PruneReport, PrunerError> {
        self.log("prune_containers");
        Ok(PruneReport::new(0, Some(0)))
    }

    async fn prune_images(&self, _scope: ImagePruneScope) -> Result<PruneReport, PrunerError> {
        self.log("prune_images");
        Ok(PruneReport::new(0, Some(0)))
    }

    async fn prune_networks(&self) -> Result<PruneReport, PrunerError> {
        self.log("prune_networks");
        Ok(PruneReport::default())
    }

    async fn prune_build_cache(&self) -> Result<PruneReport, PrunerError> {
        self.log("prune_build_cache");
        Ok(PruneReport::new(0, Some(0)))
    }

    async fn list_containers(&self) -> Result<Vec<ContainerSummary>, PrunerError> {
        self.log("list_containers");
        Ok(self.containers.lock().unwrap().clone())
    }

    async fn list_volumes(&self) -> Result<Vec<VolumeSummary>, PrunerError> {
        self.log("list_volumes");
        Ok(self.volumes.lock().unwrap().clone())
    }

    async fn remove_container(&self, id: &str) -> Result<(), PrunerError> {
        self.log(format!("remove_container:{}", id));
        self.containers.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn remove_volume(&self, name: &str) -> Result<(), PrunerError> {
        self.log(format!("remove_volume:{}", name));
        if self.broken_volume.as_deref() == Some(name) {
            return Err(PrunerError::RemovalFailed {
                target: RemovalTarget::Volume(name.to_string()),
                reason: "volume is being used".to_string(),
            });
        }
        self.volumes.lock().unwrap().retain(|v| v.name != name);
        Ok(())
    }
}

fn config(retention_days: u64) -> JanitorConfig {
    JanitorConfig {
        cleanup_interval_hours: 1,
        volume_retention_days: retention_days,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_volume_crosses_retention_window_between_cycles() {
    let created = SystemTime::UNIX_EPOCH + Duration::from_secs(1_760_000_000);
    let engine = FakeEngine::default();
    engine.volumes.lock().unwrap().push(
        VolumeSummary::new("artifacts")
            .with_ref_count(0)
            .with_created_at(created),
    );
    let janitor = Janitor::new(engine, config(7));

    let first = janitor
        .run_cycle_at(created + Duration::from_secs_f64(6.9 * DAY_SECS))
        .await
        .unwrap();
    assert_eq!(first.volumes_too_young, 1);
    assert!(first.volumes_removed.is_empty());
    assert_eq!(janitor.pruner().volume_names(), vec!["artifacts"]);

    let second = janitor
        .run_cycle_at(created + Duration::from_secs_f64(7.1 * DAY_SECS))
        .await
        .unwrap();
    assert_eq!(second.volumes_removed, vec!["artifacts"]);
    assert!(janitor.pruner().volume_names().is_empty());
}

#[tokio::test]
async fn test_skipping_build_cache_leaves_reaping_unchanged() {
    let seed = |engine: &FakeEngine| {
        engine.containers.lock().unwrap().extend([
            ContainerSummary::new("web", "Up 2 days"),
            ContainerSummary::new("job", "Exited (0) 5 hours ago"),
        ]);
        engine
            .volumes
            .lock()
            .unwrap()
            .push(VolumeSummary::new("tmp").with_ref_count(0));
    };

    let enabled = FakeEngine::default();
    seed(&enabled);
    let disabled = FakeEngine::default();
    seed(&disabled);

    let with_cache = Janitor::new(
        enabled,
        JanitorConfig {
            remove_build_cache: true,
            ..config(7)
        },
    );
    let without_cache = Janitor::new(disabled, config(7));

    let a = with_cache.run_cycle().await.unwrap();
    let b = without_cache.run_cycle().await.unwrap();

    assert!(!a.build_cache_skipped);
    assert!(b.build_cache_skipped);
    assert_eq!(a.containers_removed, b.containers_removed);
    assert_eq!(a.volumes_removed, b.volumes_removed);
    assert_eq!(
        without_cache.pruner().calls(),
        vec!["list_containers", "remove_container:job", "list_volumes", "remove_volume:tmp"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_failed_phase_stops_cycle_and_worker() {
    let engine = FakeEngine {
        broken_volume: Some("stuck".to_string()),
        ..Default::default()
    };
    engine.volumes.lock().unwrap().extend([
        VolumeSummary::new("stuck").with_ref_count(0),
        VolumeSummary::new("next").with_ref_count(0),
    ]);
    let mut worker = JanitorWorker::new(Janitor::new(engine, config(7))).unwrap();

    let exit = worker.run(std::future::pending()).await;

    let err = match exit {
        WorkerExit::Failed(err) => err,
        WorkerExit::Shutdown => panic!("worker should have failed"),
    };
    assert_eq!(err.failed_phase(), Some(Phase::Volumes));
    assert!(err.to_string().contains("volume stuck"));
    assert_eq!(worker.state(), SchedulerState::Terminated);
    assert_eq!(worker.cycles_completed(), 0);

    let calls = worker.janitor().pruner().calls();
    assert_eq!(calls.last().map(String::as_str), Some("remove_volume:stuck"));
    assert!(!calls.contains(&"remove_volume:next".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_worker_is_idempotent_on_clean_engine() {
    let engine = FakeEngine::default();
    engine
        .containers
        .lock()
        .unwrap()
        .push(ContainerSummary::new("old", "Dead"));
    let mut worker = JanitorWorker::new(Janitor::new(engine, config(7))).unwrap();

    worker.run_cycles(3).await.unwrap();

    let removals: Vec<String> = worker
        .janitor()
        .pruner()
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("remove_"))
        .collect();
    assert_eq!(removals, vec!["remove_container:old"]);
    assert_eq!(worker.cycles_completed(), 3);
}
