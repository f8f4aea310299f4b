//! Kanban board assembly.
//!
//! Applies stage derivation to every allocation, counts the columns, and
//! logs the data-quality warnings that derivation and event selection
//! report.

use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{Allocation, AllocationId, DataQualityWarning, LionsStage, Stage};
use crate::journeys::SiteJourneys;
use crate::stage::{StageResolution, lions_view, resolve_stage};

/// One card on the two-site board.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRow {
    pub allocation: AllocationId,
    pub vehicle_reg: String,
    pub transporter: Option<String>,
    pub resolution: StageResolution,
}

/// Number of allocations per stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCounts {
    pub staging: usize,
    pub pending_arrival: usize,
    pub checked_in: usize,
    pub departed: usize,
    /// Not part of any column.
    pub cancelled: usize,
}

impl StageCounts {
    fn add(&mut self, stage: Stage) {
        match stage {
            Stage::Staging => self.staging += 1,
            Stage::PendingArrival => self.pending_arrival += 1,
            Stage::CheckedIn => self.checked_in += 1,
            Stage::Departed => self.departed += 1,
            Stage::Cancelled => self.cancelled += 1,
        }
    }

    pub fn get(&self, stage: Stage) -> usize {
        match stage {
            Stage::Staging => self.staging,
            Stage::PendingArrival => self.pending_arrival,
            Stage::CheckedIn => self.checked_in,
            Stage::Departed => self.departed,
            Stage::Cancelled => self.cancelled,
        }
    }

    /// Allocations in the four columns.
    pub fn active_total(&self) -> usize {
        self.staging + self.pending_arrival + self.checked_in + self.departed
    }
}

/// The two-site board.
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    pub rows: Vec<BoardRow>,
    pub counts: StageCounts,
    /// Set when one or both site fetches failed.
    pub partial: bool,
    #[serde(skip)]
    pub warnings: Vec<DataQualityWarning>,
}

impl Board {
    /// Cards in one column, in allocation order.
    pub fn column(&self, stage: Stage) -> impl Iterator<Item = &BoardRow> {
        self.rows.iter().filter(move |r| r.resolution.stage == stage)
    }
}

/// Build the two-site board.
///
/// Every allocation gets a row, cancelled ones included; cancelled rows are
/// simply not in any column.
pub fn build_board(allocations: &[Allocation], lions: &SiteJourneys, bulk: &SiteJourneys) -> Board {
    let mut warnings: Vec<DataQualityWarning> = lions
        .warnings()
        .iter()
        .chain(bulk.warnings())
        .cloned()
        .collect();

    let mut counts = StageCounts::default();
    let mut rows = Vec::with_capacity(allocations.len());

    for allocation in allocations {
        let resolution = resolve_stage(
            allocation,
            lions.get(&allocation.id),
            bulk.get(&allocation.id),
        );
        warnings.extend(resolution.warning.clone());
        counts.add(resolution.stage);
        rows.push(BoardRow {
            allocation: allocation.id,
            vehicle_reg: allocation.vehicle_reg.clone(),
            transporter: allocation.transporter.clone(),
            resolution,
        });
    }

    log_warnings(&warnings);
    debug!(
        allocations = rows.len(),
        staging = counts.staging,
        pending_arrival = counts.pending_arrival,
        checked_in = counts.checked_in,
        departed = counts.departed,
        cancelled = counts.cancelled,
        "built board"
    );

    Board {
        rows,
        counts,
        partial: lions.is_partial() || bulk.is_partial(),
        warnings,
    }
}

/// One card on the Lions Park board.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LionsBoardRow {
    pub allocation: AllocationId,
    pub vehicle_reg: String,
    pub stage: LionsStage,
    pub display_status: String,
}

/// Number of allocations per Lions Park column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LionsStageCounts {
    pub pending_arrival: usize,
    pub checked_in: usize,
    pub departed: usize,
}

impl LionsStageCounts {
    pub fn get(&self, stage: LionsStage) -> usize {
        match stage {
            LionsStage::PendingArrival => self.pending_arrival,
            LionsStage::CheckedIn => self.checked_in,
            LionsStage::Departed => self.departed,
        }
    }

    pub fn total(&self) -> usize {
        self.pending_arrival + self.checked_in + self.departed
    }
}

/// The single-site Lions Park board.
#[derive(Debug, Clone, Serialize)]
pub struct LionsBoard {
    pub rows: Vec<LionsBoardRow>,
    pub counts: LionsStageCounts,
    pub partial: bool,
    #[serde(skip)]
    pub warnings: Vec<DataQualityWarning>,
}

impl LionsBoard {
    pub fn column(&self, stage: LionsStage) -> impl Iterator<Item = &LionsBoardRow> {
        self.rows.iter().filter(move |r| r.stage == stage)
    }
}

/// Build the Lions Park board. Every allocation lands in a column.
pub fn build_lions_board(allocations: &[Allocation], lions: &SiteJourneys) -> LionsBoard {
    let mut warnings: Vec<DataQualityWarning> = lions.warnings().to_vec();
    let mut counts = LionsStageCounts::default();
    let mut rows = Vec::with_capacity(allocations.len());

    for allocation in allocations {
        let resolution = resolve_stage(allocation, lions.get(&allocation.id), None);
        let stage = lions_view(&resolution);
        match stage {
            LionsStage::PendingArrival => counts.pending_arrival += 1,
            LionsStage::CheckedIn => counts.checked_in += 1,
            LionsStage::Departed => counts.departed += 1,
        }
        warnings.extend(resolution.warning);
        rows.push(LionsBoardRow {
            allocation: allocation.id,
            vehicle_reg: allocation.vehicle_reg.clone(),
            stage,
            display_status: resolution.display_status,
        });
    }

    log_warnings(&warnings);

    LionsBoard {
        rows,
        counts,
        partial: lions.is_partial(),
        warnings,
    }
}

fn log_warnings(warnings: &[DataQualityWarning]) {
    for w in warnings {
        warn!(warning = %w, "data quality");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AllocationStatus, JourneyEvent, SiteId};
    use chrono::{DateTime, TimeZone, Utc};

    const LIONS: SiteId = SiteId::LIONS_PARK;
    const BULK: SiteId = SiteId::BULK_CONNECTIONS;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 3, h, 0, 0).unwrap()
    }

    fn allocations() -> Vec<Allocation> {
        vec![
            Allocation::new(1, "AAA111GP", AllocationStatus::Scheduled),
            Allocation::new(2, "BBB222GP", AllocationStatus::InTransit),
            Allocation::new(3, "CCC333GP", AllocationStatus::InTransit),
            Allocation::new(4, "DDD444GP", AllocationStatus::Weighing),
            Allocation::new(5, "EEE555GP", AllocationStatus::Completed),
            Allocation::new(6, "FFF666GP", AllocationStatus::Cancelled),
            Allocation::new(7, "GGG777GP", AllocationStatus::parse("parked")),
        ]
    }

    fn lions() -> SiteJourneys {
        SiteJourneys::from_events(
            LIONS,
            vec![
                JourneyEvent::arrival(2, LIONS, at(6)),
                JourneyEvent::arrival(3, LIONS, at(5)),
                JourneyEvent::departure(3, LIONS, at(7)),
                JourneyEvent::departure(4, LIONS, at(6)),
            ],
        )
    }

    fn bulk() -> SiteJourneys {
        SiteJourneys::from_events(BULK, vec![JourneyEvent::arrival(4, BULK, at(9))])
    }

    #[test]
    fn two_site_counts() {
        let board = build_board(&allocations(), &lions(), &bulk());
        assert_eq!(board.rows.len(), 7);
        assert_eq!(
            board.counts,
            StageCounts {
                staging: 1,
                pending_arrival: 3,
                checked_in: 1,
                departed: 1,
                cancelled: 1,
            }
        );
        assert_eq!(board.counts.active_total(), 6);
        assert!(!board.partial);
    }

    #[test]
    fn columns_hold_expected_rows() {
        let board = build_board(&allocations(), &lions(), &bulk());
        let ids = |stage| {
            board
                .column(stage)
                .map(|r| r.allocation.0)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(Stage::Staging), vec![2]);
        assert_eq!(ids(Stage::PendingArrival), vec![1, 3, 7]);
        assert_eq!(ids(Stage::CheckedIn), vec![4]);
        assert_eq!(ids(Stage::Departed), vec![5]);
        assert_eq!(ids(Stage::Cancelled), vec![6]);
        for stage in Stage::ACTIVE {
            assert_eq!(board.column(stage).count(), board.counts.get(stage));
        }
    }

    #[test]
    fn unrecognized_status_collected() {
        let board = build_board(&allocations(), &lions(), &bulk());
        assert_eq!(
            board.warnings,
            vec![DataQualityWarning::UnrecognizedStatus {
                allocation: AllocationId(7),
                status: "parked".to_string(),
            }]
        );
        let row = board.rows.iter().find(|r| r.allocation == AllocationId(7)).unwrap();
        assert!(row.resolution.warning.is_some());
    }

    #[test]
    fn failed_bulk_fetch_degrades_to_lions_only() {
        let bulk = SiteJourneys::from_fetch::<&str>(BULK, Err("503"));
        let board = build_board(&allocations(), &lions(), &bulk);
        assert!(board.partial);
        // Allocation 4 falls back to its Lions departure.
        let row = board.rows.iter().find(|r| r.allocation == AllocationId(4)).unwrap();
        assert_eq!(row.resolution.stage, Stage::PendingArrival);
        assert!(
            board
                .warnings
                .iter()
                .any(|w| matches!(w, DataQualityWarning::PartialData { .. }))
        );
    }

    #[test]
    fn both_fetches_failed_uses_status() {
        let lions = SiteJourneys::from_fetch::<&str>(LIONS, Err("timeout"));
        let bulk = SiteJourneys::from_fetch::<&str>(BULK, Err("timeout"));
        let board = build_board(&allocations(), &lions, &bulk);
        assert_eq!(board.counts.pending_arrival, 5);
        assert_eq!(board.counts.departed, 1);
        assert_eq!(board.counts.cancelled, 1);
    }

    #[test]
    fn lions_board_counts() {
        let board = build_lions_board(&allocations(), &lions());
        assert_eq!(
            board.counts,
            LionsStageCounts {
                pending_arrival: 2,
                checked_in: 1,
                departed: 4,
            }
        );
        assert_eq!(board.counts.total(), 7);
        let departed: Vec<i64> = board
            .column(LionsStage::Departed)
            .map(|r| r.allocation.0)
            .collect();
        assert_eq!(departed, vec![3, 4, 5, 6]);
        assert_eq!(board.warnings.len(), 1);
    }

    #[test]
    fn empty_board() {
        let board = build_board(&[], &SiteJourneys::empty(LIONS), &SiteJourneys::empty(BULK));
        assert!(board.rows.is_empty());
        assert_eq!(board.counts, StageCounts::default());
    }
}
