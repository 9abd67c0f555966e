//! Harbormaster Janitor
//!
//! Maintenance engine that reclaims unused Docker Engine resources on a schedule.
//!
//! # Overview
//!
//! The Janitor is responsible for:
//! - **Build-cache clearing**: bulk prunes of old stopped containers, images, networks and build cache
//! - **Dead-container reaping**: force-removing containers that exited or died
//! - **Volume reaping**: removing unreferenced volumes older than the retention window
//! - **Scheduling**: one cycle at startup, then one per interval, stopping at the first failure
//!
//! # Cycle Semantics
//!
//! | Phase | Gated by | On failure |
//! |-------|----------|------------|
//! | **Build cache** | `REMOVE_BUILD_CACHE` | later sub-steps and phases skipped |
//! | **Dead containers** | always | remaining containers and volumes untouched |
//! | **Volumes** | always | remaining volumes untouched |
//!
//! A cycle is all-or-nothing in the sense that it either completes every
//! phase or reports the first failure. Removals made before the failure stand.
//!
//! # Usage
//!
//! ## One-time Cycle
//!
//! ```no_run
//! use harbormaster_janitor::{Janitor, JanitorConfig};
//! use harbormaster_docker::{default_socket_path, DockerPruner};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let pruner = DockerPruner::connect(default_socket_path()).await?;
//! let janitor = Janitor::new(pruner, JanitorConfig::from_env());
//!
//! let report = janitor.run_cycle().await?;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Background Worker
//!
//! ```no_run
//! use harbormaster_janitor::{Janitor, JanitorConfig, JanitorWorker, WorkerExit};
//! use harbormaster_docker::{default_socket_path, DockerPruner};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let pruner = DockerPruner::connect(default_socket_path()).await?;
//! let mut worker = JanitorWorker::new(Janitor::new(pruner, JanitorConfig::from_env()))?;
//!
//! match worker.run(std::future::pending()).await {
//!     WorkerExit::Failed(e) => eprintln!("maintenance failed: {}", e),
//!     WorkerExit::Shutdown => {}
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! Read from the environment by [`JanitorConfig::from_env`]:
//!
//! ```text
//! MODE=standalone              # or swarm; diagnostics only
//! SWARM_GLOBAL=false           # diagnostics only
//! CLEANUP_INTERVAL=24          # hours
//! UNUSED_VOLUME_RETENTION=7    # days
//! REMOVE_BUILD_CACHE=false
//! PRUNE_ALL_UNUSED_IMAGES=false
//! DRY_RUN=false
//! ```

#![warn(missing_docs)]

pub mod config;
mod error;
mod janitor;
mod report;
mod worker;

pub use config::{EngineMode, JanitorConfig};
pub use error::{JanitorError, Phase};
pub use janitor::{Janitor, CONTAINER_PRUNE_AGE};
pub use report::CycleReport;
pub use worker::{JanitorWorker, SchedulerState, WorkerExit};
