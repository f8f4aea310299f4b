//! Domain error and warning types.
//!
//! Only plate resolution can fail. Everything else the engine computes is
//! total; problems with the input data are reported as
//! [`DataQualityWarning`] values next to the result.

use super::{AllocationId, SiteId};

/// Failure to resolve a gate plate to an allocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No allocation carries the plate.
    #[error("no allocation found for plate {plate:?}")]
    NotFound { plate: String },
}

/// A problem with upstream data that was worked around, not rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataQualityWarning {
    /// Allocation status outside the known set; treated as pending.
    #[error("allocation {allocation}: unrecognized status {status:?}")]
    UnrecognizedStatus {
        allocation: AllocationId,
        status: String,
    },

    /// A journey event arrived without a usable timestamp.
    #[error("allocation {allocation}: event at site {site} has no timestamp")]
    MissingTimestamp {
        allocation: AllocationId,
        site: SiteId,
    },

    /// Fetching one site's journey events failed; the site is treated as
    /// having no events.
    #[error("journey events for site {site} unavailable: {reason}")]
    PartialData { site: SiteId, reason: String },

    /// A feed row that did not decode was skipped; the rest of the feed
    /// is kept.
    #[error("{feed} row {index} skipped: {reason}")]
    MalformedRow {
        feed: String,
        index: usize,
        reason: String,
    },
}
