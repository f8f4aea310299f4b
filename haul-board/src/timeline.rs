//! Journey timeline for one allocation.
//!
//! Unlike stage derivation, which only looks at the latest event per
//! site, the timeline shows the full history across every site.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Allocation, DetectionMethod, EventType, JourneyEvent, SiteId};

/// What a milestone records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "site")]
pub enum MilestoneKind {
    OrderCreated,
    Scheduled,
    Arrival(SiteId),
    Departure(SiteId),
}

/// One row of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub label: String,
    pub timestamp: Option<DateTime<Utc>>,

    /// The milestone has a recorded time. Rows without one are drawn as
    /// unconfirmed.
    pub is_known_good: bool,

    pub kind: MilestoneKind,

    /// Capture method, for journey events only.
    pub detection: Option<DetectionMethod>,
}

impl Milestone {
    fn new(kind: MilestoneKind, timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            label: label_for(kind),
            timestamp,
            is_known_good: timestamp.is_some(),
            kind,
            detection: None,
        }
    }
}

fn label_for(kind: MilestoneKind) -> String {
    match kind {
        MilestoneKind::OrderCreated => "Order Created".to_string(),
        MilestoneKind::Scheduled => "Scheduled".to_string(),
        MilestoneKind::Arrival(site) => format!("Checked In at {}", site.name()),
        MilestoneKind::Departure(site) => format!("Departed {}", site.name()),
    }
}

/// Build the chronological timeline of an allocation.
///
/// Seeds an "Order Created" row (at the creation time, else the scheduled
/// date) and a "Scheduled" row when there is a scheduled date, then adds
/// one row per journey event belonging to the allocation. Rows are sorted
/// by time; rows without a time go last in the order they were added.
///
/// An allocation with no dates and no events has an empty timeline.
pub fn build_timeline<'a, I>(allocation: &Allocation, events: I) -> Vec<Milestone>
where
    I: IntoIterator<Item = &'a JourneyEvent>,
{
    let mut milestones = Vec::new();

    if let Some(created) = allocation.created_at.or(allocation.scheduled_date) {
        milestones.push(Milestone::new(MilestoneKind::OrderCreated, Some(created)));
    }
    if let Some(scheduled) = allocation.scheduled_date {
        milestones.push(Milestone::new(MilestoneKind::Scheduled, Some(scheduled)));
    }

    for event in events {
        if event.allocation_id != allocation.id {
            continue;
        }
        let kind = match event.event_type {
            EventType::Arrival => MilestoneKind::Arrival(event.site_id),
            EventType::Departure => MilestoneKind::Departure(event.site_id),
        };
        let mut milestone = Milestone::new(kind, event.timestamp);
        milestone.detection = Some(event.detection_method);
        milestones.push(milestone);
    }

    // Stable: equal keys keep insertion order.
    milestones.sort_by_key(|m| (m.timestamp.is_none(), m.timestamp));
    milestones
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::AllocationStatus;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    proptest! {
        /// Timestamped rows ascend and precede every untimestamped row
        #[test]
        fn sorted_with_missing_last(slots in prop::collection::vec(prop::option::of(0i64..1000), 0..20)) {
            let base = Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).unwrap();
            let events: Vec<JourneyEvent> = slots
                .iter()
                .map(|slot| {
                    let e = JourneyEvent::arrival(1, SiteId::LIONS_PARK, base + Duration::minutes(slot.unwrap_or(0)));
                    if slot.is_some() { e } else { e.without_timestamp() }
                })
                .collect();
            let a = Allocation::new(1, "X", AllocationStatus::InTransit);
            let t = build_timeline(&a, &events);

            prop_assert_eq!(t.len(), events.len());
            for pair in t.windows(2) {
                match (pair[0].timestamp, pair[1].timestamp) {
                    (Some(x), Some(y)) => prop_assert!(x <= y),
                    (None, Some(_)) => prop_assert!(false, "missing timestamp sorted before a present one"),
                    _ => {}
                }
            }
        }
    }
}
