//! Gate plate resolution.
//!
//! This module picks the single allocation a gate operator means when they
//! type a plate. One vehicle routinely has several allocations on
//! different days, so the plate is narrowed by the intended gate action
//! and then by the scheduled date nearest to now.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{Allocation, GateAction, PlateKey, ResolutionBasis, ResolveError};

/// The allocation chosen for a gate action.
#[derive(Debug, Clone)]
pub struct ResolvedAllocation<'a> {
    /// The chosen allocation.
    pub allocation: &'a Allocation,
    /// How many allocations carry the plate.
    pub candidate_count: usize,
    /// How many of those were active for the action.
    pub active_count: usize,
    /// How the allocation was chosen.
    pub basis: ResolutionBasis,
}

impl ResolvedAllocation<'_> {
    /// "n possible matches, selected m" line for the gate screen.
    pub fn summary(&self) -> String {
        format!(
            "{} possible matches, selected {}",
            self.candidate_count, self.allocation.id
        )
    }
}

/// Resolve a typed plate to exactly one allocation.
///
/// # Arguments
///
/// * `plate` - Plate as typed; spacing and case are ignored
/// * `action` - Whether the truck is entering or leaving
/// * `allocations` - Every allocation known to the data store
/// * `now` - Reference time for the nearest-date choice
///
/// # Errors
///
/// `ResolveError::NotFound` if no allocation carries the plate. Ambiguity
/// is never an error:
///
/// 1. One candidate is returned as is.
/// 2. Several candidates are narrowed to those active for `action` (see
///    [`GateAction::is_active_for`]). If none are active, all candidates
///    stay in play.
/// 3. The candidate scheduled nearest to `now` wins. Candidates without a
///    scheduled date rank last; ties go to the earlier one in
///    `allocations`.
pub fn resolve_allocation<'a>(
    plate: &str,
    action: GateAction,
    allocations: &'a [Allocation],
    now: DateTime<Utc>,
) -> Result<ResolvedAllocation<'a>, ResolveError> {
    let not_found = || ResolveError::NotFound {
        plate: plate.trim().to_string(),
    };

    let key = PlateKey::parse(plate).map_err(|_| not_found())?;

    let candidates: Vec<&Allocation> = allocations
        .iter()
        .filter(|a| key.matches(&a.vehicle_reg))
        .collect();

    if let &[only] = candidates.as_slice() {
        return Ok(ResolvedAllocation {
            allocation: only,
            candidate_count: 1,
            active_count: usize::from(action.is_active_for(only)),
            basis: ResolutionBasis::Unique,
        });
    }

    let active: Vec<&Allocation> = candidates
        .iter()
        .copied()
        .filter(|a| action.is_active_for(a))
        .collect();

    let (pool, basis) = if active.is_empty() {
        (&candidates, ResolutionBasis::FallbackNearest)
    } else {
        (&active, ResolutionBasis::ActiveNearest)
    };

    let chosen = nearest_to(pool, now).ok_or_else(not_found)?;

    info!(
        plate = %key,
        action = %action,
        candidates = candidates.len(),
        active = active.len(),
        chosen = %chosen.id,
        chosen_status = %chosen.status,
        basis = ?basis,
        "resolved ambiguous plate"
    );

    Ok(ResolvedAllocation {
        allocation: chosen,
        candidate_count: candidates.len(),
        active_count: active.len(),
        basis,
    })
}

/// First allocation whose scheduled date is closest to `now`.
fn nearest_to<'a>(pool: &[&'a Allocation], now: DateTime<Utc>) -> Option<&'a Allocation> {
    pool.iter()
        .copied()
        .min_by_key(|a| match a.scheduled_date {
            Some(date) => (false, (date - now).num_milliseconds().unsigned_abs()),
            None => (true, 0),
        })
}
