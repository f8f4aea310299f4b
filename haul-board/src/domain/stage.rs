//! Derived board stages.
//!
//! Stages are never stored. They are recomputed from allocations and
//! journey events on every read.

use std::fmt;

use serde::Serialize;

/// Position of an allocation on the two-site (Lions Park + Bulk
/// Connections) board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Physically at Lions Park, waiting to move on.
    Staging,
    /// Not yet at Bulk Connections: scheduled, on the road, or between sites.
    PendingArrival,
    /// On site at Bulk Connections.
    CheckedIn,
    /// Left Bulk Connections, or completed.
    Departed,
    /// Cancelled. Terminal, and not one of the board columns.
    Cancelled,
}

impl Stage {
    /// The four board columns, in display order.
    pub const ACTIVE: [Stage; 4] = [
        Stage::Staging,
        Stage::PendingArrival,
        Stage::CheckedIn,
        Stage::Departed,
    ];

    /// Whether this stage is one of the board columns.
    pub fn is_active(&self) -> bool {
        !matches!(self, Stage::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Staging => "staging",
            Stage::PendingArrival => "pending_arrival",
            Stage::CheckedIn => "checked_in",
            Stage::Departed => "departed",
            Stage::Cancelled => "cancelled",
        }
    }

    /// Column heading.
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Staging => "Staging",
            Stage::PendingArrival => "Pending Arrival",
            Stage::CheckedIn => "Checked In",
            Stage::Departed => "Departed",
            Stage::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of an allocation on the single-site Lions Park board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LionsStage {
    PendingArrival,
    CheckedIn,
    /// Includes completed and cancelled allocations.
    Departed,
}

impl LionsStage {
    pub const ALL: [LionsStage; 3] = [
        LionsStage::PendingArrival,
        LionsStage::CheckedIn,
        LionsStage::Departed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LionsStage::PendingArrival => "pending_arrival",
            LionsStage::CheckedIn => "checked_in",
            LionsStage::Departed => "departed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LionsStage::PendingArrival => "Pending Arrival",
            LionsStage::CheckedIn => "Checked In",
            LionsStage::Departed => "Departed",
        }
    }
}

impl fmt::Display for LionsStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
