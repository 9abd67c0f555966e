//! Conversions between bollard models and domain types

use bollard::errors::Error;
use bollard::models::{ContainerSummary as EngineContainer, Volume};
use chrono::{DateTime, SecondsFormat, Utc};
use harbormaster_domain::{
    ContainerSummary, PruneReport, PrunerError, RemovalTarget, ResourceClass, VolumeSummary,
};
use std::time::SystemTime;

/// Whether `err` means the engine could not be talked to at all
///
/// Only socket, connection, IO and timeout failures count. An answer the
/// engine did send, even one that fails to decode, is a failure of the
/// operation itself.
fn is_transport(err: &Error) -> bool {
    matches!(
        err,
        Error::IOError { .. }
            | Error::HyperResponseError { .. }
            | Error::HyperLegacyError { .. }
            | Error::RequestTimeoutError
            | Error::SocketNotFoundError(_)
            | Error::UnsupportedURISchemeError { .. }
    )
}

/// Reason text for a failed operation
fn reason(err: &Error) -> String {
    match err {
        Error::DockerResponseServerError {
            status_code,
            message,
        } => format!("{} (HTTP {})", message, status_code),
        other => other.to_string(),
    }
}

/// Classify a bollard failure as an unreachable engine
pub(crate) fn engine_unreachable(err: Error) -> PrunerError {
    PrunerError::EngineUnreachable {
        reason: err.to_string(),
    }
}

/// Error mapper for a bulk prune of `class`
pub(crate) fn prune_failed(class: ResourceClass) -> impl FnOnce(Error) -> PrunerError {
    move |err| {
        if is_transport(&err) {
            return engine_unreachable(err);
        }
        PrunerError::PruneFailed {
            class,
            reason: reason(&err),
        }
    }
}

/// Error mapper for an inventory call on `class`
pub(crate) fn list_failed(class: ResourceClass) -> impl FnOnce(Error) -> PrunerError {
    move |err| {
        if is_transport(&err) {
            return engine_unreachable(err);
        }
        PrunerError::ListFailed {
            class,
            reason: reason(&err),
        }
    }
}

/// Error mapper for removing `target`
pub(crate) fn removal_failed(target: RemovalTarget) -> impl FnOnce(Error) -> PrunerError {
    move |err| {
        if is_transport(&err) {
            return engine_unreachable(err);
        }
        PrunerError::RemovalFailed {
            target,
            reason: reason(&err),
        }
    }
}

/// Format an instant the way engine `until` filters expect
pub(crate) fn format_until(until: SystemTime) -> String {
    DateTime::<Utc>::from(until).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an engine RFC 3339 timestamp
pub(crate) fn parse_timestamp(raw: &str) -> Option<SystemTime> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| SystemTime::from(dt.with_timezone(&Utc)))
}

/// Bytes reclaimed as reported by the engine; negative values are dropped
pub(crate) fn reclaimed(space: Option<i64>) -> Option<u64> {
    space.and_then(|bytes| u64::try_from(bytes).ok())
}

/// Build a prune report from an optional list of deleted items
pub(crate) fn prune_report<T>(deleted: Option<Vec<T>>, space: Option<i64>) -> PruneReport {
    PruneReport::new(deleted.map_or(0, |items| items.len()), reclaimed(space))
}

/// Convert a listed container; entries without an id are dropped
pub(crate) fn container_summary(container: EngineContainer) -> Option<ContainerSummary> {
    let id = container.id?;
    let name = container
        .names
        .and_then(|names| names.into_iter().next())
        .map(|name| name.trim_start_matches('/').to_string());

    Some(ContainerSummary {
        id,
        name,
        status: container.status.unwrap_or_default(),
    })
}

/// Convert a listed volume
///
/// An unparseable creation time is logged and treated as absent.
pub(crate) fn volume_summary(volume: Volume) -> VolumeSummary {
    let created_at = volume.created_at.as_deref().and_then(|raw| {
        let parsed = parse_timestamp(raw);
        if parsed.is_none() {
            tracing::warn!(
                "Volume {} has unparseable creation time {:?}; ignoring its age",
                volume.name,
                raw
            );
        }
        parsed
    });

    VolumeSummary {
        ref_count: volume.usage_data.map(|usage| usage.ref_count),
        created_at,
        name: volume.name,
    }
}
