//! Allocation records.
//!
//! An `Allocation` is one truck's assignment against an order. It is
//! created when the order is allocated to a vehicle and afterwards only
//! changes through gate events, ticket issuance and manual edits.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time::deserialize_opt_timestamp;
use super::{AllocationStatus, SiteId};

/// Identity of an allocation in the data store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationId(pub i64);

impl fmt::Debug for AllocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AllocationId({})", self.0)
    }
}

impl fmt::Display for AllocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Driver validation value that makes a truck eligible to leave.
const READY_FOR_DISPATCH: &str = "ready_for_dispatch";

/// One truck's assignment to an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub id: AllocationId,

    /// Registration as typed at allocation time (unnormalized).
    pub vehicle_reg: String,

    /// Free-text transporter name; may not match any master record.
    #[serde(default)]
    pub transporter: Option<String>,

    #[serde(default)]
    pub driver_name: Option<String>,

    #[serde(default)]
    pub driver_id_number: Option<String>,

    #[serde(default)]
    pub driver_phone: Option<String>,

    /// Outcome of the driver document check at the gate.
    #[serde(default)]
    pub driver_validation_status: Option<String>,

    #[serde(default, deserialize_with = "deserialize_opt_timestamp")]
    pub scheduled_date: Option<DateTime<Utc>>,

    /// Legacy status; see [`AllocationStatus`].
    pub status: AllocationStatus,

    #[serde(default)]
    pub net_weight: Option<f64>,

    #[serde(default)]
    pub gross_weight: Option<f64>,

    #[serde(default)]
    pub tare_weight: Option<f64>,

    /// Site the record is currently associated with.
    #[serde(default)]
    pub site_id: Option<SiteId>,

    #[serde(default, deserialize_with = "deserialize_opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Allocation {
    /// Create an allocation with only the required fields set.
    pub fn new(id: i64, vehicle_reg: impl Into<String>, status: AllocationStatus) -> Self {
        Self {
            id: AllocationId(id),
            vehicle_reg: vehicle_reg.into(),
            transporter: None,
            driver_name: None,
            driver_id_number: None,
            driver_phone: None,
            driver_validation_status: None,
            scheduled_date: None,
            status,
            net_weight: None,
            gross_weight: None,
            tare_weight: None,
            site_id: None,
            created_at: None,
        }
    }

    /// Set the scheduled date.
    pub fn with_scheduled_date(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled_date = Some(at);
        self
    }

    /// Set the creation timestamp.
    pub fn with_created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Set the transporter name.
    pub fn with_transporter(mut self, name: impl Into<String>) -> Self {
        self.transporter = Some(name.into());
        self
    }

    /// Set the driver validation status.
    pub fn with_driver_validation(mut self, status: impl Into<String>) -> Self {
        self.driver_validation_status = Some(status.into());
        self
    }

    /// Whether the driver check has cleared the truck for dispatch.
    pub fn is_ready_for_dispatch(&self) -> bool {
        self.driver_validation_status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case(READY_FOR_DISPATCH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn decode_upstream_record() {
        let json = r#"{
            "id": 42,
            "vehicleReg": "ABC 123 GP",
            "transporter": "Acme Transport",
            "driverValidationStatus": "ready_for_dispatch",
            "scheduledDate": "2026-01-03",
            "status": "in_transit",
            "grossWeight": 52.5,
            "tareWeight": 18.0,
            "siteId": 1,
            "createdAt": "2026-01-01T09:00:00Z",
            "orderNumber": "ignored"
        }"#;

        let alloc: Allocation = serde_json::from_str(json).unwrap();
        assert_eq!(alloc.id, AllocationId(42));
        assert_eq!(alloc.status, AllocationStatus::InTransit);
        assert_eq!(alloc.site_id, Some(SiteId::LIONS_PARK));
        assert_eq!(
            alloc.scheduled_date,
            Some(Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).unwrap())
        );
        assert!(alloc.is_ready_for_dispatch());
    }

    #[test]
    fn decode_minimal_record() {
        let json = r#"{"id": 1, "vehicleReg": "X", "status": "mystery"}"#;
        let alloc: Allocation = serde_json::from_str(json).unwrap();
        assert!(alloc.scheduled_date.is_none());
        assert!(alloc.created_at.is_none());
        assert_eq!(alloc.status, AllocationStatus::parse("mystery"));
        assert!(!alloc.is_ready_for_dispatch());
    }

    #[test]
    fn null_status_keeps_the_record() {
        let json = r#"{"id": 3, "vehicleReg": "X", "status": null}"#;
        let alloc: Allocation = serde_json::from_str(json).unwrap();
        assert_eq!(alloc.status, AllocationStatus::Unrecognized(String::new()));
    }

    #[test]
    fn ready_for_dispatch_is_case_insensitive() {
        let alloc = Allocation::new(1, "X", AllocationStatus::Arrived)
            .with_driver_validation(" READY_FOR_DISPATCH ");
        assert!(alloc.is_ready_for_dispatch());

        let alloc =
            Allocation::new(1, "X", AllocationStatus::Arrived).with_driver_validation("pending");
        assert!(!alloc.is_ready_for_dispatch());
    }
}
