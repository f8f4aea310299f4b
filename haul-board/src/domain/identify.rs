//! Gate check-in/out identification types.
//!
//! A gate operator types a plate and says whether the truck is coming in
//! or going out. The same vehicle usually has several allocations on
//! different days, so the plate alone is not enough to pick a record.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::AllocationStatus;
use super::allocation::Allocation;

/// What the operator is doing at the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateAction {
    Entry,
    Exit,
}

impl GateAction {
    /// Whether an allocation is a plausible subject of this action.
    ///
    /// - Entry: the truck is still expected (`scheduled` or `in_transit`).
    /// - Exit: the allocation is not `completed`, and either the driver
    ///   has been cleared for dispatch or the truck is on site
    ///   (`arrived` or `weighing`).
    pub fn is_active_for(&self, allocation: &Allocation) -> bool {
        match self {
            GateAction::Entry => matches!(
                allocation.status,
                AllocationStatus::Scheduled | AllocationStatus::InTransit
            ),
            GateAction::Exit => {
                allocation.status != AllocationStatus::Completed
                    && (allocation.is_ready_for_dispatch()
                        || matches!(
                            allocation.status,
                            AllocationStatus::Arrived | AllocationStatus::Weighing
                        ))
            }
        }
    }
}

impl fmt::Display for GateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateAction::Entry => f.write_str("entry"),
            GateAction::Exit => f.write_str("exit"),
        }
    }
}

/// How the resolved allocation was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionBasis {
    /// Only one allocation carries the plate.
    Unique,
    /// Nearest scheduled date among allocations active for the action.
    ActiveNearest,
    /// No allocation was active for the action; nearest of all of them.
    FallbackNearest,
}

impl ResolutionBasis {
    /// Human-readable description for the gate screen.
    pub fn description(&self) -> &'static str {
        match self {
            ResolutionBasis::Unique => "Only allocation for this plate",
            ResolutionBasis::ActiveNearest => "Nearest scheduled visit awaiting this action",
            ResolutionBasis::FallbackNearest => {
                "No visit awaiting this action; nearest scheduled visit"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alloc(status: AllocationStatus) -> Allocation {
        Allocation::new(1, "ABC123GP", status)
    }

    #[test]
    fn entry_accepts_expected_trucks() {
        assert!(GateAction::Entry.is_active_for(&alloc(AllocationStatus::Scheduled)));
        assert!(GateAction::Entry.is_active_for(&alloc(AllocationStatus::InTransit)));
        assert!(!GateAction::Entry.is_active_for(&alloc(AllocationStatus::Arrived)));
        assert!(!GateAction::Entry.is_active_for(&alloc(AllocationStatus::Completed)));
        assert!(!GateAction::Entry.is_active_for(&alloc(AllocationStatus::Cancelled)));
    }

    #[test]
    fn exit_accepts_trucks_on_site() {
        assert!(GateAction::Exit.is_active_for(&alloc(AllocationStatus::Arrived)));
        assert!(GateAction::Exit.is_active_for(&alloc(AllocationStatus::Weighing)));
        assert!(!GateAction::Exit.is_active_for(&alloc(AllocationStatus::Scheduled)));
    }

    #[test]
    fn exit_accepts_cleared_drivers_unless_completed() {
        let cleared = alloc(AllocationStatus::Scheduled).with_driver_validation("ready_for_dispatch");
        assert!(GateAction::Exit.is_active_for(&cleared));

        let done = alloc(AllocationStatus::Completed).with_driver_validation("ready_for_dispatch");
        assert!(!GateAction::Exit.is_active_for(&done));
    }

    #[test]
    fn basis_ordering_and_description() {
        assert!(ResolutionBasis::Unique < ResolutionBasis::ActiveNearest);
        assert!(ResolutionBasis::ActiveNearest < ResolutionBasis::FallbackNearest);
        assert!(!ResolutionBasis::FallbackNearest.description().is_empty());
    }

    #[test]
    fn action_serde() {
        let a: GateAction = serde_json::from_str("\"exit\"").unwrap();
        assert_eq!(a, GateAction::Exit);
        assert_eq!(GateAction::Entry.to_string(), "entry");
    }
}
