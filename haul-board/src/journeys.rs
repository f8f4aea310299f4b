//! Latest journey event per allocation, per site.
//!
//! The data store normally hands over one current event per allocation
//! for each site, but nothing stops it sending the history. Only the
//! latest event counts for stage derivation, so it is selected here.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::domain::{AllocationId, DataQualityWarning, JourneyEvent, SiteId};

/// Pick the latest of a set of events.
///
/// The greatest timestamp wins, any timestamp beats none, and on a tie the
/// event that comes later in the input wins (events are appended in
/// arrival order).
pub fn latest_event<'a, I>(events: I) -> Option<&'a JourneyEvent>
where
    I: IntoIterator<Item = &'a JourneyEvent>,
{
    events
        .into_iter()
        .reduce(|best, e| if supersedes(e, best) { e } else { best })
}

/// Whether `candidate`, seen after `current`, replaces it as the latest.
///
/// `None` orders before any timestamp, so an untimestamped event never
/// replaces a timestamped one.
fn supersedes(candidate: &JourneyEvent, current: &JourneyEvent) -> bool {
    candidate.timestamp >= current.timestamp
}

/// The latest journey event for each allocation at one site.
#[derive(Debug, Clone)]
pub struct SiteJourneys {
    site: SiteId,
    latest: HashMap<AllocationId, JourneyEvent>,
    warnings: Vec<DataQualityWarning>,
}

impl SiteJourneys {
    /// A site with no recorded events.
    pub fn empty(site: SiteId) -> Self {
        Self {
            site,
            latest: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Reduce an event list to the latest event per allocation.
    ///
    /// Events recorded against another site are ignored.
    pub fn from_events(site: SiteId, events: impl IntoIterator<Item = JourneyEvent>) -> Self {
        let mut journeys = Self::empty(site);
        let mut foreign = 0usize;

        for event in events {
            if event.site_id != site {
                foreign += 1;
                continue;
            }

            if event.timestamp.is_none() {
                journeys.warnings.push(DataQualityWarning::MissingTimestamp {
                    allocation: event.allocation_id,
                    site,
                });
            }

            match journeys.latest.get(&event.allocation_id) {
                Some(current) if !supersedes(&event, current) => {}
                _ => {
                    journeys.latest.insert(event.allocation_id, event);
                }
            }
        }

        if foreign > 0 {
            debug!(site = %site, foreign, "ignored events recorded against another site");
        }

        journeys
    }

    /// Build from the outcome of a fetch.
    ///
    /// A failed fetch is not an error for the board: the site is treated
    /// as having no events and a `PartialData` warning is recorded.
    pub fn from_fetch<E: fmt::Display>(
        site: SiteId,
        fetched: Result<Vec<JourneyEvent>, E>,
    ) -> Self {
        match fetched {
            Ok(events) => Self::from_events(site, events),
            Err(e) => {
                warn!(site = %site, error = %e, "journey fetch failed, treating site as empty");
                let mut journeys = Self::empty(site);
                journeys.warnings.push(DataQualityWarning::PartialData {
                    site,
                    reason: e.to_string(),
                });
                journeys
            }
        }
    }

    pub fn site(&self) -> SiteId {
        self.site
    }

    /// Latest event for an allocation at this site.
    pub fn get(&self, allocation: &AllocationId) -> Option<&JourneyEvent> {
        self.latest.get(allocation)
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }

    /// Problems found while building this view.
    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    /// Whether the fetch for this site failed.
    pub fn is_partial(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, DataQualityWarning::PartialData { .. }))
    }
}
