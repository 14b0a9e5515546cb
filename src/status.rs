//! Uptime badge: periodic passthrough against an external status service.
//!
//! The service answers `{"enabled": false}` when unconfigured, or an
//! enabled payload with a status string, an opaque message, and an optional
//! link. A detached thread polls it on a fixed interval and sends mapped
//! badges over a channel the event loop drains each tick; any failure on
//! the way degrades to the error badge rather than touching the rest of
//! the UI.

use serde::Deserialize;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

/// Per-request timeout for the status fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Deserialize)]
/// Wire shape of the status endpoint response.
struct StatusReport {
    enabled: bool,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Severity of a visible badge.
pub enum StatusLevel {
    /// All monitored services healthy.
    Ok,
    /// Something is worth a look.
    Investigate,
    /// Monitoring reports a failure, or the status fetch itself failed.
    Error,
}

#[derive(Clone, PartialEq, Eq, Debug)]
/// What the header renders for the uptime collaborator.
pub enum StatusBadge {
    /// No badge at all: endpoint unconfigured or reporting `enabled: false`.
    Hidden,
    /// A colored badge. The message is opaque display text, rendered only
    /// at the error level; the link, when present, can be opened from the
    /// display view.
    Visible {
        /// Badge severity.
        level: StatusLevel,
        /// Opaque text shown next to an error badge.
        message: Option<String>,
        /// Status page to open on request.
        url: Option<String>,
    },
}

impl StatusBadge {
    #[must_use]
    /// The status page link, for any visible badge that carries one.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Visible { url, .. } => url.as_deref(),
            Self::Hidden => None,
        }
    }
}

fn map_report(report: &StatusReport) -> StatusBadge {
    if !report.enabled {
        return StatusBadge::Hidden;
    }
    let level = match report.status.as_deref() {
        Some("ok") => StatusLevel::Ok,
        Some("investigate") => StatusLevel::Investigate,
        // Unknown strings and a missing status degrade to the error badge.
        _ => StatusLevel::Error,
    };
    StatusBadge::Visible {
        level,
        message: report.message.clone(),
        url: report.url.clone(),
    }
}

/// One fetch against the endpoint, every failure folded into a badge.
fn fetch_badge(endpoint: &str) -> StatusBadge {
    let response = match ureq::get(endpoint).timeout(FETCH_TIMEOUT).call() {
        Ok(response) => response,
        Err(e) => {
            log::warn!("status fetch failed: {e}");
            return StatusBadge::Visible {
                level: StatusLevel::Error,
                message: Some(format!("status unreachable: {e}")),
                url: None,
            };
        }
    };
    match response.into_json::<StatusReport>() {
        Ok(report) => map_report(&report),
        Err(e) => {
            log::warn!("status response did not parse: {e}");
            StatusBadge::Visible {
                level: StatusLevel::Error,
                message: Some(format!("status unreadable: {e}")),
                url: None,
            }
        }
    }
}

/// Spawns the poller thread: fetch, send, sleep, repeat. Returns the badge
/// channel. The thread exits once the receiver drops. With an empty
/// endpoint no thread is spawned and the channel stays silent, leaving the
/// badge hidden.
#[must_use]
pub fn spawn_poller(endpoint: String, interval: Duration) -> Receiver<StatusBadge> {
    let (tx, rx) = mpsc::channel();

    if endpoint.is_empty() {
        return rx;
    }

    thread::spawn(move || loop {
        let badge = fetch_badge(&endpoint);
        if tx.send(badge).is_err() {
            break;
        }
        thread::sleep(interval);
    });

    rx
}

#[cfg(test)]
#[path = "tests/status.rs"]
mod tests;
