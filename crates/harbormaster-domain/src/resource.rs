//! Resource module - the engine objects a maintenance cycle reasons about

use std::fmt;
use std::time::SystemTime;

/// Class of engine resource touched by a prune, list or removal call
///
/// Every pruner failure is tagged with the class it concerns, so a failed
/// cycle can say exactly which kind of resource it could not reclaim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceClass {
    /// Containers (stopped, exited or dead)
    Containers,

    /// Images (dangling or unused)
    Images,

    /// User-defined networks
    Networks,

    /// Builder cache entries
    BuildCache,

    /// Named and anonymous volumes
    Volumes,
}

impl ResourceClass {
    /// Get the class name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceClass::Containers => "containers",
            ResourceClass::Images => "images",
            ResourceClass::Networks => "networks",
            ResourceClass::BuildCache => "build cache",
            ResourceClass::Volumes => "volumes",
        }
    }
}

impl fmt::Display for ResourceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single object a removal call targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalTarget {
    /// A container, by id
    Container(String),

    /// A volume, by name
    Volume(String),
}

impl RemovalTarget {
    /// Resource class of the target
    pub fn class(&self) -> ResourceClass {
        match self {
            RemovalTarget::Container(_) => ResourceClass::Containers,
            RemovalTarget::Volume(_) => ResourceClass::Volumes,
        }
    }
}

impl fmt::Display for RemovalTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalTarget::Container(id) => write!(f, "container {}", id),
            RemovalTarget::Volume(name) => write!(f, "volume {}", name),
        }
    }
}

/// Which images an image prune removes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImagePruneScope {
    /// Only untagged images no container references
    #[default]
    Dangling,

    /// Every image no container references, tagged or not
    AllUnused,
}

/// Container as listed by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    /// Engine container id
    pub id: String,

    /// First display name, if the engine reported one
    pub name: Option<String>,

    /// Human-readable status text, e.g. "Exited (0) 2 days ago"
    pub status: String,
}

impl ContainerSummary {
    /// Create a summary from an id and status text
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            status: status.into(),
        }
    }

    /// Whether the status marks the container as exited or dead
    ///
    /// Matching is a case-insensitive substring test on the status text, so
    /// "Exited (137) 5 minutes ago" and "Dead" both qualify while "Up 2 hours"
    /// and "Paused" do not.
    ///
    /// # Examples
    ///
    /// ```
    /// use harbormaster_domain::ContainerSummary;
    ///
    /// assert!(ContainerSummary::new("a", "Exited (0) 1 hour ago").is_exited_or_dead());
    /// assert!(!ContainerSummary::new("b", "Up 3 minutes").is_exited_or_dead());
    /// ```
    pub fn is_exited_or_dead(&self) -> bool {
        let status = self.status.to_lowercase();
        status.contains("exited") || status.contains("dead")
    }
}

/// Volume as listed by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeSummary {
    /// Volume name
    pub name: String,

    /// Number of containers referencing the volume
    ///
    /// `None` when the engine did not report usage data. The engine itself
    /// reports `-1` when the count is not available.
    pub ref_count: Option<i64>,

    /// When the volume was created, if known
    pub created_at: Option<SystemTime>,
}

impl VolumeSummary {
    /// Create a summary with no usage data and no creation time
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ref_count: None,
            created_at: None,
        }
    }

    /// Set the reference count
    pub fn with_ref_count(mut self, ref_count: i64) -> Self {
        self.ref_count = Some(ref_count);
        self
    }

    /// Set the creation time
    pub fn with_created_at(mut self, created_at: SystemTime) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Outcome of one bulk prune call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PruneReport {
    /// Number of items the engine deleted
    pub deleted: usize,

    /// Bytes reclaimed, when the engine reports it
    pub space_reclaimed: Option<u64>,
}

impl PruneReport {
    /// Create a report
    pub fn new(deleted: usize, space_reclaimed: Option<u64>) -> Self {
        Self {
            deleted,
            space_reclaimed,
        }
    }
}
