//! Background worker that drives the Janitor forever

use crate::config::MAX_CLEANUP_INTERVAL_HOURS;
use crate::{CycleReport, Janitor, JanitorError};
use harbormaster_domain::ResourcePruner;
use std::future::Future;
use tokio::time::{interval, interval_at, Duration, Instant, MissedTickBehavior};

/// Lifecycle of the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Cycles are running on schedule
    Running,

    /// A cycle failed; no further cycles will run
    Terminated,
}

/// Why [`JanitorWorker::run`] returned
#[derive(Debug)]
pub enum WorkerExit {
    /// A cycle failed; the host process should exit non-zero
    Failed(JanitorError),

    /// The shutdown signal fired while the worker was idle
    Shutdown,
}

/// Background worker that runs the Janitor on a fixed interval
///
/// One cycle runs immediately, then one per interval. Each cycle is awaited
/// inline, so two cycles never overlap; timer firings missed while a cycle
/// is still running are skipped rather than queued. The first failed cycle
/// moves the worker to [`SchedulerState::Terminated`] for good.
///
/// The worker never exits the process itself; it reports a [`WorkerExit`]
/// and leaves that decision to the caller.
///
/// # Examples
///
/// ```no_run
/// use harbormaster_janitor::{Janitor, JanitorConfig, JanitorWorker, WorkerExit};
/// use harbormaster_docker::DockerPruner;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let pruner = DockerPruner::connect("/var/run/docker.sock").await?;
///     let mut worker = JanitorWorker::new(Janitor::new(pruner, JanitorConfig::default()))?;
///
///     // Run until Ctrl+C or the first failed cycle
///     let shutdown = async {
///         let _ = tokio::signal::ctrl_c().await;
///     };
///     if let WorkerExit::Failed(e) = worker.run(shutdown).await {
///         eprintln!("{}", e);
///         std::process::exit(1);
///     }
///     Ok(())
/// }
/// ```
pub struct JanitorWorker<P> {
    janitor: Janitor<P>,
    interval: Duration,
    state: SchedulerState,
    cycles_completed: usize,
}

impl<P: ResourcePruner> JanitorWorker<P> {
    /// Create a worker around a janitor, using its configured interval
    ///
    /// # Errors
    ///
    /// Returns [`JanitorError::Config`] if the interval is zero or longer
    /// than [`MAX_CLEANUP_INTERVAL_HOURS`].
    pub fn new(janitor: Janitor<P>) -> Result<Self, JanitorError> {
        let hours = janitor.config().cleanup_interval_hours;
        if hours == 0 {
            return Err(JanitorError::Config(
                "cleanup interval must be at least one hour".to_string(),
            ));
        }
        if hours > MAX_CLEANUP_INTERVAL_HOURS {
            return Err(JanitorError::Config(format!(
                "cleanup interval of {} hours exceeds the maximum of {}",
                hours, MAX_CLEANUP_INTERVAL_HOURS
            )));
        }
        let interval = janitor.config().cleanup_interval();

        Ok(Self {
            janitor,
            interval,
            state: SchedulerState::Running,
            cycles_completed: 0,
        })
    }

    /// Get the current lifecycle state
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Get the number of cycles that completed successfully
    pub fn cycles_completed(&self) -> usize {
        self.cycles_completed
    }

    /// Get the interval between cycles
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Get a reference to the janitor
    pub fn janitor(&self) -> &Janitor<P> {
        &self.janitor
    }

    /// Run until a cycle fails or `shutdown` completes
    ///
    /// `shutdown` is only observed between cycles; a running cycle is
    /// always allowed to finish.
    pub async fn run<F>(&mut self, shutdown: F) -> WorkerExit
    where
        F: Future<Output = ()>,
    {
        if let Err(e) = self.run_once().await {
            return WorkerExit::Failed(e);
        }

        let Some(first_tick) = Instant::now().checked_add(self.interval) else {
            self.state = SchedulerState::Terminated;
            return WorkerExit::Failed(JanitorError::Config(format!(
                "cleanup interval {:?} cannot be scheduled",
                self.interval
            )));
        };
        let mut ticker = interval_at(first_tick, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            "Janitor worker scheduled (interval: {:?})",
            self.interval
        );

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        return WorkerExit::Failed(e);
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!(
                        "Shutdown signal received, stopping janitor after {} cycles",
                        self.cycles_completed
                    );
                    return WorkerExit::Shutdown;
                }
            }
        }
    }

    /// Run a fixed number of cycles on the configured interval
    ///
    /// The first cycle runs immediately. Stops at the first failure.
    pub async fn run_cycles(&mut self, cycles: usize) -> Result<(), JanitorError> {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            "Janitor worker started for {} cycles (interval: {:?})",
            cycles,
            self.interval
        );

        for cycle in 0..cycles {
            ticker.tick().await;
            tracing::debug!("Starting cycle {}/{}", cycle + 1, cycles);
            self.run_once().await?;
        }

        Ok(())
    }

    /// Run exactly one cycle and update the lifecycle state
    pub async fn run_once(&mut self) -> Result<CycleReport, JanitorError> {
        if self.state == SchedulerState::Terminated {
            return Err(JanitorError::Terminated);
        }

        match self.janitor.run_cycle().await {
            Ok(report) => {
                self.cycles_completed += 1;
                tracing::info!("Cycle {} completed: {}", self.cycles_completed, report.summary());
                Ok(report)
            }
            Err(e) => {
                self.state = SchedulerState::Terminated;
                tracing::error!("Maintenance failed, stopping janitor: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::JanitorConfig;
    use harbormaster_domain::{
        ContainerSummary, ImagePruneScope, PruneReport, PrunerError, ResourceClass, VolumeSummary,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::SystemTime;

    // Mock pruner whose container listing fails from a given cycle onwards
    struct MockPruner {
        fail_from_cycle: Option<usize>,
        listings: AtomicUsize,
    }

    impl MockPruner {
        fn healthy() -> Self {
            Self {
                fail_from_cycle: None,
                listings: AtomicUsize::new(0),
            }
        }

        fn failing_from(cycle: usize) -> Self {
            Self {
                fail_from_cycle: Some(cycle),
                listings: AtomicUsize::new(0),
            }
        }

        fn listings(&self) -> usize {
            self.listings.load(Ordering::SeqCst)
        }
    }

    impl ResourcePruner for MockPruner {
        async fn prune_containers(&self, _until: SystemTime) -> Result<PruneReport, PrunerError> {
            Ok(PruneReport::default())
        }

        async fn prune_images(&self, _scope: ImagePruneScope) -> Result<PruneReport, PrunerError> {
            Ok(PruneReport::default())
        }

        async fn prune_networks(&self) -> Result<PruneReport, PrunerError> {
            Ok(PruneReport::default())
        }

        async fn prune_build_cache(&self) -> Result<PruneReport, PrunerError> {
            Ok(PruneReport::default())
        }

        async fn list_containers(&self) -> Result<Vec<ContainerSummary>, PrunerError> {
            let cycle = self.listings.fetch_add(1, Ordering::SeqCst) + 1;
            match self.fail_from_cycle {
                Some(n) if cycle >= n => Err(PrunerError::ListFailed {
                    class: ResourceClass::Containers,
                    reason: "daemon restarting".to_string(),
                }),
                _ => Ok(Vec::new()),
            }
        }

        async fn list_volumes(&self) -> Result<Vec<VolumeSummary>, PrunerError> {
            Ok(Vec::new())
        }

        async fn remove_container(&self, _id: &str) -> Result<(), PrunerError> {
            Ok(())
        }

        async fn remove_volume(&self, _name: &str) -> Result<(), PrunerError> {
            Ok(())
        }
    }

    fn worker(pruner: MockPruner) -> JanitorWorker<MockPruner> {
        let config = JanitorConfig {
            cleanup_interval_hours: 1,
            ..Default::default()
        };
        JanitorWorker::new(Janitor::new(pruner, config)).unwrap()
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = JanitorConfig {
            cleanup_interval_hours: 0,
            ..Default::default()
        };
        let result = JanitorWorker::new(Janitor::new(MockPruner::healthy(), config));
        assert!(matches!(result, Err(JanitorError::Config(_))));
    }

    #[test]
    fn test_oversized_interval_rejected() {
        for hours in [MAX_CLEANUP_INTERVAL_HOURS + 1, 6_000_000_000_000_000, 1 << 60] {
            let config = JanitorConfig {
                cleanup_interval_hours: hours,
                ..Default::default()
            };
            let result = JanitorWorker::new(Janitor::new(MockPruner::healthy(), config));
            assert!(matches!(result, Err(JanitorError::Config(_))), "{} hours accepted", hours);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_longest_interval_schedules() {
        let config = JanitorConfig {
            cleanup_interval_hours: MAX_CLEANUP_INTERVAL_HOURS,
            ..Default::default()
        };
        let mut worker = JanitorWorker::new(Janitor::new(MockPruner::healthy(), config)).unwrap();

        let exit = worker.run(tokio::time::sleep(Duration::from_secs(3600))).await;

        assert!(matches!(exit, WorkerExit::Shutdown));
        assert_eq!(worker.cycles_completed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_failure_terminates_immediately() {
        let mut worker = worker(MockPruner::failing_from(1));

        let exit = worker.run(std::future::pending()).await;

        assert!(matches!(exit, WorkerExit::Failed(_)));
        assert_eq!(worker.state(), SchedulerState::Terminated);
        assert_eq!(worker.cycles_completed(), 0);
        assert_eq!(worker.janitor().pruner().listings(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_failure_terminates() {
        let mut worker = worker(MockPruner::failing_from(3));

        let exit = worker.run(std::future::pending()).await;

        match exit {
            WorkerExit::Failed(e) => assert_eq!(e.failed_phase(), Some(crate::Phase::DeadContainers)),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(worker.state(), SchedulerState::Terminated);
        assert_eq!(worker.cycles_completed(), 2);
        assert_eq!(worker.janitor().pruner().listings(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_between_cycles() {
        let mut worker = worker(MockPruner::healthy());

        // Cycles at 0h and 1h, shutdown at 1.5h
        let exit = worker
            .run(tokio::time::sleep(Duration::from_secs(90 * 60)))
            .await;

        assert!(matches!(exit, WorkerExit::Shutdown));
        assert_eq!(worker.state(), SchedulerState::Running);
        assert_eq!(worker.cycles_completed(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_cycles() {
        let mut worker = worker(MockPruner::healthy());

        worker.run_cycles(3).await.unwrap();

        assert_eq!(worker.cycles_completed(), 3);
        assert_eq!(worker.janitor().pruner().listings(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminated_worker_refuses_to_run() {
        let mut worker = worker(MockPruner::failing_from(1));

        assert!(worker.run_cycles(5).await.is_err());
        assert!(matches!(worker.run_once().await, Err(JanitorError::Terminated)));
        assert_eq!(worker.janitor().pruner().listings(), 1);
    }
}
