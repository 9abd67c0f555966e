//! Platform-specific transport selection

use crate::convert::engine_unreachable;
use crate::{DockerError, DockerPruner};
use bollard::{Docker, API_DEFAULT_VERSION};

/// Seconds the client waits on any single engine request
pub const CONNECT_TIMEOUT_SECS: u64 = 120;

/// Default engine endpoint for the host platform
///
/// `//./pipe/docker_engine` on Windows, `/var/run/docker.sock` elsewhere.
pub fn default_socket_path() -> &'static str {
    if cfg!(windows) {
        "//./pipe/docker_engine"
    } else {
        "/var/run/docker.sock"
    }
}

#[cfg(windows)]
fn open(socket: &str) -> Result<Docker, bollard::errors::Error> {
    Docker::connect_with_named_pipe(socket, CONNECT_TIMEOUT_SECS, API_DEFAULT_VERSION)
}

#[cfg(not(windows))]
fn open(socket: &str) -> Result<Docker, bollard::errors::Error> {
    Docker::connect_with_unix(socket, CONNECT_TIMEOUT_SECS, API_DEFAULT_VERSION)
}

impl DockerPruner {
    /// Connect to the engine at `socket` and confirm it answers a ping
    ///
    /// # Errors
    ///
    /// Returns [`DockerError::Connect`] if the client cannot be built and
    /// [`DockerError::Ping`] if the engine is not reachable.
    pub async fn connect(socket: &str) -> Result<Self, DockerError> {
        let docker = open(socket).map_err(|source| DockerError::Connect {
            socket: socket.to_string(),
            source,
        })?;

        let version = docker.ping().await.map_err(|e| DockerError::Ping {
            socket: socket.to_string(),
            source: engine_unreachable(e),
        })?;
        tracing::debug!("Docker engine at {} answered ping: {}", socket, version);

        Ok(Self::new(docker))
    }
}
