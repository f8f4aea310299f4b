//! Periodic refresh of board data.
//!
//! Each tick fetches allocations, both sites' journey events and the
//! transporter list concurrently, then derives every view from scratch.
//! Nothing derived is carried from one tick to the next.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::board::{Board, LionsBoard, build_board, build_lions_board};
use crate::domain::{
    Allocation, AllocationId, CanonicalEntity, GateAction, JourneyEvent, ResolveError, SiteId,
};
use crate::feed::{FeedError, FeedSource};
use crate::identify::{ResolvedAllocation, resolve_allocation};
use crate::journeys::SiteJourneys;
use crate::names::{EntityIndex, TransporterLink, link_transporters};
use crate::timeline::{Milestone, build_timeline};

/// Bounds on the refresh interval, in seconds.
const MIN_INTERVAL_SECS: u64 = 5;
const MAX_INTERVAL_SECS: u64 = 30;

/// Configuration for the poller.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Seconds between refreshes, kept within 5..=30.
    pub interval_secs: u64,
}

impl PollerConfig {
    /// Create a config, clamping the interval into range.
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval_secs: interval_secs.clamp(MIN_INTERVAL_SECS, MAX_INTERVAL_SECS),
        }
    }

    /// Returns the interval as a Duration.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self::new(15)
    }
}

/// Facts fetched on one tick, and the views derived from them.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub taken_at: DateTime<Utc>,
    pub allocations: Vec<Allocation>,
    /// Full event history for both sites, for timelines.
    pub events: Vec<JourneyEvent>,
    pub lions: SiteJourneys,
    pub bulk: SiteJourneys,
    pub transporters: EntityIndex,
    pub board: Board,
    pub lions_board: LionsBoard,
}

impl Snapshot {
    /// Derive every view from freshly fetched facts.
    ///
    /// A failed site fetch leaves that site without events.
    pub fn build(
        taken_at: DateTime<Utc>,
        allocations: Vec<Allocation>,
        lions_events: Result<Vec<JourneyEvent>, FeedError>,
        bulk_events: Result<Vec<JourneyEvent>, FeedError>,
        transporters: Vec<CanonicalEntity>,
    ) -> Self {
        let mut events = lions_events.as_ref().map(Vec::clone).unwrap_or_default();
        events.extend(bulk_events.as_ref().map(Vec::clone).unwrap_or_default());

        let lions = SiteJourneys::from_fetch(SiteId::LIONS_PARK, lions_events);
        let bulk = SiteJourneys::from_fetch(SiteId::BULK_CONNECTIONS, bulk_events);

        let board = build_board(&allocations, &lions, &bulk);
        let lions_board = build_lions_board(&allocations, &lions);

        Self {
            taken_at,
            allocations,
            events,
            lions,
            bulk,
            transporters: EntityIndex::new(transporters),
            board,
            lions_board,
        }
    }

    /// Timeline of one allocation, if it exists.
    pub fn timeline(&self, id: AllocationId) -> Option<Vec<Milestone>> {
        let allocation = self.allocations.iter().find(|a| a.id == id)?;
        Some(build_timeline(allocation, &self.events))
    }

    /// Resolve a gate plate against this snapshot's allocations.
    pub fn resolve_plate(
        &self,
        plate: &str,
        action: GateAction,
        now: DateTime<Utc>,
    ) -> Result<ResolvedAllocation<'_>, ResolveError> {
        resolve_allocation(plate, action, &self.allocations, now)
    }

    /// Transporter master record for each allocation.
    pub fn transporter_links(&self) -> Vec<TransporterLink<'_>> {
        link_transporters(&self.allocations, &self.transporters)
    }
}

/// Shared read access to the most recent snapshot.
#[derive(Clone, Default)]
pub struct SnapshotHandle {
    inner: Arc<RwLock<Option<Arc<Snapshot>>>>,
}

impl SnapshotHandle {
    /// The latest snapshot, if any tick has succeeded.
    pub async fn latest(&self) -> Option<Arc<Snapshot>> {
        let guard = self.inner.read().await;
        guard.clone()
    }

    async fn publish(&self, snapshot: Arc<Snapshot>) {
        let mut guard = self.inner.write().await;
        *guard = Some(snapshot);
    }
}

/// Fetches on a fixed interval and publishes snapshots.
pub struct Poller<F> {
    feed: F,
    config: PollerConfig,
    handle: SnapshotHandle,
}

impl<F: FeedSource> Poller<F> {
    pub fn new(feed: F, config: PollerConfig) -> Self {
        Self {
            feed,
            config,
            handle: SnapshotHandle::default(),
        }
    }

    /// Handle for readers of the published snapshots.
    pub fn handle(&self) -> SnapshotHandle {
        self.handle.clone()
    }

    /// Run one refresh.
    ///
    /// Only a failed allocations fetch is an error; the previously
    /// published snapshot then stays in place. Failed site or transporter
    /// fetches degrade the snapshot instead.
    pub async fn poll_once(&self) -> Result<Arc<Snapshot>, FeedError> {
        let (allocations, lions, bulk, transporters) = futures::join!(
            self.feed.allocations(),
            self.feed.site_events(SiteId::LIONS_PARK),
            self.feed.site_events(SiteId::BULK_CONNECTIONS),
            self.feed.transporters()
        );

        let allocations = allocations?;
        let transporters = transporters.unwrap_or_else(|e| {
            warn!(error = %e, "transporter fetch failed, skipping auto-linking");
            Vec::new()
        });

        let snapshot = Arc::new(Snapshot::build(
            Utc::now(),
            allocations,
            lions,
            bulk,
            transporters,
        ));

        let counts = snapshot.board.counts;
        let unlinked = snapshot
            .transporter_links()
            .iter()
            .filter(|l| l.transporter.is_none())
            .count();
        info!(
            allocations = snapshot.allocations.len(),
            staging = counts.staging,
            pending_arrival = counts.pending_arrival,
            checked_in = counts.checked_in,
            departed = counts.departed,
            cancelled = counts.cancelled,
            partial = snapshot.board.partial,
            unlinked_transporters = unlinked,
            "board refreshed"
        );

        self.handle.publish(Arc::clone(&snapshot)).await;
        Ok(snapshot)
    }

    /// Refresh forever at the configured interval.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.config.interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(e) = self.poll_once().await {
                warn!(error = %e, "refresh failed, keeping previous snapshot");
            }
        }
    }
}
