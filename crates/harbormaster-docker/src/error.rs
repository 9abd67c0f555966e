//! Error types for connecting to the Docker Engine

use harbormaster_domain::PrunerError;
use thiserror::Error;

/// Errors raised while establishing the engine connection
#[derive(Error, Debug)]
pub enum DockerError {
    /// The client could not be built for the given socket or pipe
    #[error("Failed to connect to Docker at {socket}: {source}")]
    Connect {
        /// Socket or pipe path
        socket: String,
        /// Underlying bollard error
        #[source]
        source: bollard::errors::Error,
    },

    /// The engine did not answer the startup ping
    #[error("Docker at {socket} did not respond: {source}")]
    Ping {
        /// Socket or pipe path
        socket: String,
        /// Classified ping failure
        #[source]
        source: PrunerError,
    },
}
