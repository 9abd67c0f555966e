//! Configuration for Janitor operations
//!
//! Read once at startup from environment variables. Parsing is lenient: a
//! missing, malformed, zero, negative or out-of-range number falls back to
//! its default.

use harbormaster_domain::ImagePruneScope;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable names
pub mod vars {
    /// `standalone` or `swarm`
    pub const MODE: &str = "MODE";
    /// Swarm-wide execution intent
    pub const SWARM_GLOBAL: &str = "SWARM_GLOBAL";
    /// Hours between cycles
    pub const CLEANUP_INTERVAL: &str = "CLEANUP_INTERVAL";
    /// Minimum age in days of an unreferenced volume before removal
    pub const UNUSED_VOLUME_RETENTION: &str = "UNUSED_VOLUME_RETENTION";
    /// Enables the build-cache phase
    pub const REMOVE_BUILD_CACHE: &str = "REMOVE_BUILD_CACHE";
    /// Widens the image prune from dangling to all unused images
    pub const PRUNE_ALL_UNUSED_IMAGES: &str = "PRUNE_ALL_UNUSED_IMAGES";
    /// Log-only mode
    pub const DRY_RUN: &str = "DRY_RUN";
    /// Engine socket or pipe override
    pub const DOCKER_SOCKET: &str = "DOCKER_SOCKET";
}

/// Default hours between cycles
pub const DEFAULT_CLEANUP_INTERVAL_HOURS: u64 = 24;

/// Longest accepted interval between cycles (one year)
pub const MAX_CLEANUP_INTERVAL_HOURS: u64 = 24 * 365;

/// Default volume retention window in days
pub const DEFAULT_VOLUME_RETENTION_DAYS: u64 = 7;

/// Engine topology the daemon runs against
///
/// Recorded for diagnostics only: every mode runs the same cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// Single Docker host
    #[default]
    Standalone,

    /// Swarm node
    Swarm,
}

impl EngineMode {
    /// Get the mode name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineMode::Standalone => "standalone",
            EngineMode::Swarm => "swarm",
        }
    }

    /// Parse a mode from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "standalone" => Some(EngineMode::Standalone),
            "swarm" => Some(EngineMode::Swarm),
            _ => None,
        }
    }
}

/// Configuration for the Janitor service
///
/// # Examples
///
/// ```
/// use harbormaster_janitor::JanitorConfig;
///
/// let config = JanitorConfig::default();
/// assert_eq!(config.cleanup_interval_hours, 24);
/// assert_eq!(config.volume_retention_days, 7);
/// assert!(!config.remove_build_cache);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Engine topology (diagnostics only)
    #[serde(default)]
    pub mode: EngineMode,

    /// Swarm-wide execution intent (diagnostics only)
    #[serde(default)]
    pub swarm_global: bool,

    /// Hours between cycles
    /// Default: 24
    #[serde(default = "default_cleanup_interval_hours")]
    pub cleanup_interval_hours: u64,

    /// Minimum age in days before an unreferenced volume may be removed
    /// Default: 7
    #[serde(default = "default_volume_retention_days")]
    pub volume_retention_days: u64,

    /// Run the build-cache phase
    /// Default: false
    #[serde(default)]
    pub remove_build_cache: bool,

    /// Prune every unused image instead of only dangling ones
    /// Default: false
    #[serde(default)]
    pub prune_all_unused_images: bool,

    /// Dry-run mode: log what would be removed without removing anything
    /// Default: false
    #[serde(default)]
    pub dry_run: bool,

    /// Engine socket or pipe; the platform default when unset
    #[serde(default)]
    pub docker_socket: Option<String>,
}

fn default_cleanup_interval_hours() -> u64 {
    DEFAULT_CLEANUP_INTERVAL_HOURS
}

fn default_volume_retention_days() -> u64 {
    DEFAULT_VOLUME_RETENTION_DAYS
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            mode: EngineMode::Standalone,
            swarm_global: false,
            cleanup_interval_hours: DEFAULT_CLEANUP_INTERVAL_HOURS,
            volume_retention_days: DEFAULT_VOLUME_RETENTION_DAYS,
            remove_build_cache: false,
            prune_all_unused_images: false,
            dry_run: false,
            docker_socket: None,
        }
    }
}

impl JanitorConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// # Examples
    ///
    /// ```
    /// use harbormaster_janitor::JanitorConfig;
    ///
    /// let config = JanitorConfig::from_lookup(|key| match key {
    ///     "CLEANUP_INTERVAL" => Some("6".to_string()),
    ///     "REMOVE_BUILD_CACHE" => Some("true".to_string()),
    ///     _ => None,
    /// });
    /// assert_eq!(config.cleanup_interval_hours, 6);
    /// assert!(config.remove_build_cache);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup(vars::MODE) {
            None => EngineMode::default(),
            Some(raw) => EngineMode::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Unknown {} {:?}, using standalone", vars::MODE, raw);
                EngineMode::Standalone
            }),
        };

        Self {
            mode,
            swarm_global: flag(&lookup, vars::SWARM_GLOBAL),
            cleanup_interval_hours: positive(
                &lookup,
                vars::CLEANUP_INTERVAL,
                DEFAULT_CLEANUP_INTERVAL_HOURS,
                MAX_CLEANUP_INTERVAL_HOURS,
            ),
            volume_retention_days: positive(
                &lookup,
                vars::UNUSED_VOLUME_RETENTION,
                DEFAULT_VOLUME_RETENTION_DAYS,
                u64::MAX,
            ),
            remove_build_cache: flag(&lookup, vars::REMOVE_BUILD_CACHE),
            prune_all_unused_images: flag(&lookup, vars::PRUNE_ALL_UNUSED_IMAGES),
            dry_run: flag(&lookup, vars::DRY_RUN),
            docker_socket: lookup(vars::DOCKER_SOCKET).filter(|s| !s.trim().is_empty()),
        }
    }

    /// Get the cycle interval as Duration
    ///
    /// Saturates instead of overflowing; [`crate::JanitorWorker::new`]
    /// rejects anything above [`MAX_CLEANUP_INTERVAL_HOURS`].
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_hours.saturating_mul(3600))
    }

    /// Image prune scope for the build-cache phase
    pub fn image_prune_scope(&self) -> ImagePruneScope {
        if self.prune_all_unused_images {
            ImagePruneScope::AllUnused
        } else {
            ImagePruneScope::Dangling
        }
    }

    /// Human-readable description of where maintenance runs
    pub fn topology(&self) -> &'static str {
        match (self.mode, self.swarm_global) {
            (EngineMode::Standalone, _) => "standalone host",
            (EngineMode::Swarm, true) => "swarm (global)",
            (EngineMode::Swarm, false) => "swarm node",
        }
    }
}

/// Boolean variables are true only for the exact text `true`
fn flag<F>(lookup: &F, key: &str) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).is_some_and(|raw| raw == "true")
}

/// Integer in `1..=max` with a logged fallback to `default`
fn positive<F>(lookup: &F, key: &str, default: u64, max: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match raw.trim().parse::<i64>() {
        Ok(value) if value > 0 && (value as u64) <= max => value as u64,
        _ => {
            tracing::warn!("Invalid {} {:?}, using default {}", key, raw, default);
            default
        }
    }
}
