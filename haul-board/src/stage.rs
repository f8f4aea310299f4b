//! Stage derivation for a single allocation.
//!
//! Where a truck is comes from three independently recorded signals: the
//! latest journey event at Bulk Connections, the latest journey event at
//! Lions Park, and the allocation's legacy status. They are consulted in
//! that strict order; the first one present decides the stage.
//!
//! The single-site Lions Park board is a re-mapping of the same result,
//! see [`lions_view`].

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    Allocation, AllocationStatus, DataQualityWarning, JourneyEvent, LionsStage, PresenceStatus,
    SiteId, Stage, display_time,
};

/// Which signal decided the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageSource {
    BulkEvent,
    LionsEvent,
    AllocationStatus,
}

/// The derived stage of one allocation, with what to show next to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageResolution {
    pub stage: Stage,

    /// Badge text.
    pub display_status: String,

    /// Time of the deciding event, else the scheduled date.
    pub display_timestamp: Option<DateTime<Utc>>,

    /// Presence at Lions Park per its latest event.
    pub lions: Option<PresenceStatus>,

    /// Presence at Bulk Connections per its latest event.
    pub bulk: Option<PresenceStatus>,

    pub source: StageSource,

    /// Set when the allocation's status string is not recognised.
    #[serde(skip)]
    pub warning: Option<DataQualityWarning>,
}

impl StageResolution {
    /// Display timestamp formatted for a table cell.
    pub fn display_time(&self) -> String {
        display_time(self.display_timestamp)
    }
}

/// Derive the two-site board stage of an allocation.
///
/// `lions` and `bulk` are the latest events for this allocation at each
/// site, if any. A site whose events could not be fetched is passed as
/// `None`.
///
/// 1. A Bulk Connections event decides: arrived is `CheckedIn`, departed
///    is `Departed`. This holds whatever the Lions Park event says or when
///    it happened.
/// 2. Otherwise a Lions Park event decides: arrived is `Staging`, departed
///    is `PendingArrival` (on the road to Bulk Connections).
/// 3. Otherwise the legacy status decides: `completed` is `Departed`,
///    `cancelled` is `Cancelled`, and everything else, including
///    unrecognized strings, is `PendingArrival`.
///
/// Never fails. An unrecognized status is reported in `warning` for the
/// caller to log.
pub fn resolve_stage(
    allocation: &Allocation,
    lions: Option<&JourneyEvent>,
    bulk: Option<&JourneyEvent>,
) -> StageResolution {
    let warning = match &allocation.status {
        AllocationStatus::Unrecognized(raw) => Some(DataQualityWarning::UnrecognizedStatus {
            allocation: allocation.id,
            status: raw.clone(),
        }),
        _ => None,
    };

    let (stage, display_status, decided_at, source) = if let Some(event) = bulk {
        let (stage, text) = match event.status {
            PresenceStatus::Arrived => (Stage::CheckedIn, checked_in_text(SiteId::BULK_CONNECTIONS)),
            PresenceStatus::Departed => (Stage::Departed, departed_text(SiteId::BULK_CONNECTIONS)),
        };
        (stage, text, event.timestamp, StageSource::BulkEvent)
    } else if let Some(event) = lions {
        let (stage, text) = match event.status {
            PresenceStatus::Arrived => (Stage::Staging, format!("Staging at {}", SiteId::LIONS_PARK.name())),
            PresenceStatus::Departed => (
                Stage::PendingArrival,
                format!("In transit to {}", SiteId::BULK_CONNECTIONS.name()),
            ),
        };
        (stage, text, event.timestamp, StageSource::LionsEvent)
    } else {
        let stage = match allocation.status {
            AllocationStatus::Completed => Stage::Departed,
            AllocationStatus::Cancelled => Stage::Cancelled,
            _ => Stage::PendingArrival,
        };
        (stage, allocation.status.label(), None, StageSource::AllocationStatus)
    };

    StageResolution {
        stage,
        display_status,
        display_timestamp: decided_at.or(allocation.scheduled_date),
        lions: lions.map(|e| e.status),
        bulk: bulk.map(|e| e.status),
        source,
        warning,
    }
}

fn checked_in_text(site: SiteId) -> String {
    format!("Checked in at {}", site.name())
}

fn departed_text(site: SiteId) -> String {
    format!("Departed {}", site.name())
}

/// Map a two-site resolution onto the single-site Lions Park board.
///
/// - Arrived at Lions Park (`Staging`) is `CheckedIn`.
/// - Departed Lions Park is `Departed`, although the two-site board shows
///   the same truck as pending arrival at Bulk Connections.
/// - Anything at or past Bulk Connections, completed, or cancelled is
///   `Departed`. Cancelled trucks stay visible here, unlike on the
///   two-site board.
/// - Everything else is `PendingArrival`.
pub fn lions_view(resolution: &StageResolution) -> LionsStage {
    match resolution.stage {
        Stage::Staging => LionsStage::CheckedIn,
        Stage::PendingArrival if resolution.lions == Some(PresenceStatus::Departed) => {
            LionsStage::Departed
        }
        Stage::PendingArrival => LionsStage::PendingArrival,
        Stage::CheckedIn | Stage::Departed | Stage::Cancelled => LionsStage::Departed,
    }
}

/// Derive the Lions Park board stage of an allocation.
///
/// Only the Lions Park event is considered.
pub fn resolve_lions_stage(allocation: &Allocation, lions: Option<&JourneyEvent>) -> LionsStage {
    lions_view(&resolve_stage(allocation, lions, None))
}
