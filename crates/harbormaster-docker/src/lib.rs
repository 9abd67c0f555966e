//! Harbormaster Docker adapter
//!
//! Implements [`ResourcePruner`](harbormaster_domain::ResourcePruner) on top of
//! the Docker Engine API via `bollard`. The transport is picked once, at
//! connect time, from the host platform: a named pipe on Windows, a Unix
//! domain socket everywhere else.
//!
//! ```no_run
//! use harbormaster_docker::{DockerPruner, default_socket_path};
//!
//! # async fn demo() -> Result<(), harbormaster_docker::DockerError> {
//! let pruner = DockerPruner::connect(default_socket_path()).await?;
//! # let _ = pruner;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod connect;
mod convert;
mod error;
mod pruner;

pub use connect::{default_socket_path, CONNECT_TIMEOUT_SECS};
pub use error::DockerError;
pub use pruner::DockerPruner;
