//! Volume retention - deciding when an unused volume may be removed
//!
//! A volume is a removal candidate only when nothing references it. Among
//! candidates, those with a known creation time must also have reached the
//! retention window; volumes with no creation time have no age gate.
//!
//! All functions here are pure: the caller supplies `now`, so the rule can
//! be evaluated without a clock or an engine connection.

use crate::VolumeSummary;
use std::time::SystemTime;

/// Seconds in one retention day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Result of evaluating one volume against the retention window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VolumeVerdict {
    /// Unreferenced and old enough (or of unknown age)
    Eligible,

    /// Referenced by a container, or usage is not known
    InUse,

    /// Unreferenced but younger than the retention window
    TooYoung {
        /// Age at evaluation time, in fractional days
        age_days: f64,
    },
}

impl VolumeVerdict {
    /// Whether the verdict allows removal
    pub fn is_eligible(&self) -> bool {
        matches!(self, VolumeVerdict::Eligible)
    }
}

/// Age of a volume in fractional days at `now`
///
/// Returns `None` when the creation time is unknown. A creation time later
/// than `now` yields an age of zero.
pub fn age_days(volume: &VolumeSummary, now: SystemTime) -> Option<f64> {
    volume.created_at.map(|created_at| {
        now.duration_since(created_at)
            .map(|age| age.as_secs_f64() / SECONDS_PER_DAY)
            .unwrap_or(0.0)
    })
}

/// Evaluate a volume against a retention window of `retention_days`
///
/// # Examples
///
/// ```
/// use harbormaster_domain::{retention::evaluate, VolumeSummary, VolumeVerdict};
/// use std::time::{Duration, SystemTime};
///
/// let now = SystemTime::now();
/// let volume = VolumeSummary::new("cache")
///     .with_ref_count(0)
///     .with_created_at(now - Duration::from_secs(2 * 86_400));
///
/// assert!(matches!(evaluate(&volume, 7, now), VolumeVerdict::TooYoung { .. }));
/// assert_eq!(evaluate(&volume, 1, now), VolumeVerdict::Eligible);
/// ```
pub fn evaluate(volume: &VolumeSummary, retention_days: u64, now: SystemTime) -> VolumeVerdict {
    if volume.ref_count != Some(0) {
        return VolumeVerdict::InUse;
    }

    match age_days(volume, now) {
        Some(age_days) if age_days < retention_days as f64 => VolumeVerdict::TooYoung { age_days },
        _ => VolumeVerdict::Eligible,
    }
}

/// Whether a volume may be removed under a retention window of `retention_days`
pub fn is_eligible_for_removal(volume: &VolumeSummary, retention_days: u64, now: SystemTime) -> bool {
    evaluate(volume, retention_days, now).is_eligible()
}
