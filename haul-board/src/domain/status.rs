//! Legacy allocation status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The status column carried on every allocation record.
///
/// This is a legacy signal: whenever journey events exist for an
/// allocation they decide where the truck is, and the status is only
/// consulted as a fallback. Strings the engine does not recognise are kept
/// verbatim in `Unrecognized` so callers can report them.
///
/// # Examples
///
/// ```
/// use haul_board::domain::AllocationStatus;
///
/// assert_eq!(AllocationStatus::parse("In Transit"), AllocationStatus::InTransit);
/// assert_eq!(AllocationStatus::parse("ready-for-dispatch"), AllocationStatus::ReadyForDispatch);
/// assert_eq!(
///     AllocationStatus::parse("parked"),
///     AllocationStatus::Unrecognized("parked".to_string())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum AllocationStatus {
    Scheduled,
    InTransit,
    Arrived,
    Weighing,
    ReadyForDispatch,
    Completed,
    Cancelled,
    /// A status string outside the known set, as received.
    Unrecognized(String),
}

impl AllocationStatus {
    /// Parse a status string, tolerating case, spaces and hyphens.
    pub fn parse(s: &str) -> Self {
        match variant_key(s).as_str() {
            "scheduled" => AllocationStatus::Scheduled,
            "in_transit" => AllocationStatus::InTransit,
            "arrived" => AllocationStatus::Arrived,
            "weighing" => AllocationStatus::Weighing,
            "ready_for_dispatch" => AllocationStatus::ReadyForDispatch,
            "completed" => AllocationStatus::Completed,
            "cancelled" => AllocationStatus::Cancelled,
            _ => AllocationStatus::Unrecognized(s.to_string()),
        }
    }

    /// Returns the canonical wire string.
    pub fn as_str(&self) -> &str {
        match self {
            AllocationStatus::Scheduled => "scheduled",
            AllocationStatus::InTransit => "in_transit",
            AllocationStatus::Arrived => "arrived",
            AllocationStatus::Weighing => "weighing",
            AllocationStatus::ReadyForDispatch => "ready_for_dispatch",
            AllocationStatus::Completed => "completed",
            AllocationStatus::Cancelled => "cancelled",
            AllocationStatus::Unrecognized(raw) => raw,
        }
    }

    /// Human-readable label for badges.
    pub fn label(&self) -> String {
        match self {
            AllocationStatus::Scheduled => "Scheduled".to_string(),
            AllocationStatus::InTransit => "In Transit".to_string(),
            AllocationStatus::Arrived => "Arrived".to_string(),
            AllocationStatus::Weighing => "Weighing".to_string(),
            AllocationStatus::ReadyForDispatch => "Ready for Dispatch".to_string(),
            AllocationStatus::Completed => "Completed".to_string(),
            AllocationStatus::Cancelled => "Cancelled".to_string(),
            AllocationStatus::Unrecognized(raw) if raw.trim().is_empty() => "Unknown".to_string(),
            AllocationStatus::Unrecognized(raw) => format!("Unknown ({raw})"),
        }
    }
}

/// Lower-case an enum string from the feed and map spaces and hyphens to
/// underscores.
pub(crate) fn variant_key(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

impl From<String> for AllocationStatus {
    fn from(s: String) -> Self {
        AllocationStatus::parse(&s)
    }
}

/// A null status is kept as an empty unrecognized value.
impl From<Option<String>> for AllocationStatus {
    fn from(s: Option<String>) -> Self {
        s.map(AllocationStatus::from)
            .unwrap_or_else(|| AllocationStatus::Unrecognized(String::new()))
    }
}

impl From<AllocationStatus> for String {
    fn from(status: AllocationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
