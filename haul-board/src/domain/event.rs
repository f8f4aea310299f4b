//! Site journey events.
//!
//! A `JourneyEvent` records that an allocation arrived at, or departed
//! from, one site. Events are append-only facts written by the gate
//! systems at each site independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::variant_key;
use super::time::deserialize_opt_timestamp;
use super::{AllocationId, SiteId};

/// An enum value from the feed that matches no known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} {value:?}")]
pub struct UnknownValue {
    kind: &'static str,
    value: String,
}

/// Whether the truck came in or went out.
///
/// Decoding ignores case, spaces and hyphens. Any other value fails, which
/// drops the event row it is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum EventType {
    Arrival,
    Departure,
}

impl EventType {
    pub fn parse(s: &str) -> Result<Self, UnknownValue> {
        match variant_key(s).as_str() {
            "arrival" => Ok(EventType::Arrival),
            "departure" => Ok(EventType::Departure),
            _ => Err(UnknownValue {
                kind: "event type",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for EventType {
    type Error = UnknownValue;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        EventType::parse(&s)
    }
}

/// Presence at the site after the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum PresenceStatus {
    Arrived,
    Departed,
}

impl PresenceStatus {
    pub fn parse(s: &str) -> Result<Self, UnknownValue> {
        match variant_key(s).as_str() {
            "arrived" => Ok(PresenceStatus::Arrived),
            "departed" => Ok(PresenceStatus::Departed),
            _ => Err(UnknownValue {
                kind: "presence status",
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for PresenceStatus {
    type Error = UnknownValue;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        PresenceStatus::parse(&s)
    }
}

/// How the event was captured.
///
/// Anything other than a camera value, null included, reads as manual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum DetectionMethod {
    /// Number-plate recognition camera.
    Anpr,
    /// Gate operator entry.
    #[default]
    Manual,
}

impl From<Option<String>> for DetectionMethod {
    fn from(s: Option<String>) -> Self {
        match s.as_deref().map(variant_key).as_deref() {
            Some("anpr" | "automatic") => DetectionMethod::Anpr,
            _ => DetectionMethod::Manual,
        }
    }
}

/// One arrival or departure at one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyEvent {
    pub allocation_id: AllocationId,
    pub site_id: SiteId,
    pub event_type: EventType,
    pub status: PresenceStatus,

    /// Missing only on malformed upstream rows.
    #[serde(default, deserialize_with = "deserialize_opt_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub detection_method: DetectionMethod,

    #[serde(default)]
    pub notes: Option<String>,
}

impl JourneyEvent {
    /// An arrival recorded at `at`.
    pub fn arrival(allocation: i64, site: SiteId, at: DateTime<Utc>) -> Self {
        Self::new(
            allocation,
            site,
            EventType::Arrival,
            PresenceStatus::Arrived,
            Some(at),
        )
    }

    /// A departure recorded at `at`.
    pub fn departure(allocation: i64, site: SiteId, at: DateTime<Utc>) -> Self {
        Self::new(
            allocation,
            site,
            EventType::Departure,
            PresenceStatus::Departed,
            Some(at),
        )
    }

    fn new(
        allocation: i64,
        site: SiteId,
        event_type: EventType,
        status: PresenceStatus,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            allocation_id: AllocationId(allocation),
            site_id: site,
            event_type,
            status,
            timestamp,
            detection_method: DetectionMethod::Manual,
            notes: None,
        }
    }

    /// Drop the timestamp (for modelling malformed rows).
    pub fn without_timestamp(mut self) -> Self {
        self.timestamp = None;
        self
    }

    /// Mark as captured by ANPR.
    pub fn detected_by_anpr(mut self) -> Self {
        self.detection_method = DetectionMethod::Anpr;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_upstream_event() {
        let json = r#"{
            "allocationId": 7,
            "siteId": 2,
            "eventType": "arrival",
            "status": "arrived",
            "timestamp": "2026-01-03T11:45:00Z",
            "detectionMethod": "anpr",
            "notes": "camera 2"
        }"#;

        let event: JourneyEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.allocation_id, AllocationId(7));
        assert_eq!(event.site_id, SiteId::BULK_CONNECTIONS);
        assert_eq!(event.event_type, EventType::Arrival);
        assert_eq!(event.status, PresenceStatus::Arrived);
        assert!(event.timestamp.is_some());
        assert_eq!(event.detection_method, DetectionMethod::Anpr);
        assert_eq!(event.notes.as_deref(), Some("camera 2"));
    }

    #[test]
    fn detection_defaults_to_manual() {
        let json = r#"{
            "allocationId": 7,
            "siteId": 1,
            "eventType": "departure",
            "status": "departed",
            "timestamp": null
        }"#;

        let event: JourneyEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.detection_method, DetectionMethod::Manual);
        assert!(event.timestamp.is_none());
    }

    #[test]
    fn automatic_is_an_alias_for_anpr() {
        let method: DetectionMethod = serde_json::from_str("\"automatic\"").unwrap();
        assert_eq!(method, DetectionMethod::Anpr);
    }

    #[test]
    fn enum_values_ignore_case() {
        let json = r#"{
            "allocationId": 8,
            "siteId": 2,
            "eventType": "Arrival",
            "status": "ARRIVED",
            "timestamp": "2026-01-03T11:45:00Z",
            "detectionMethod": "ANPR"
        }"#;

        let event: JourneyEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, EventType::Arrival);
        assert_eq!(event.status, PresenceStatus::Arrived);
        assert_eq!(event.detection_method, DetectionMethod::Anpr);
    }

    #[test]
    fn unknown_detection_is_manual() {
        let method: DetectionMethod = serde_json::from_str("\"clipboard\"").unwrap();
        assert_eq!(method, DetectionMethod::Manual);
        let method: DetectionMethod = serde_json::from_str("null").unwrap();
        assert_eq!(method, DetectionMethod::Manual);
    }

    #[test]
    fn unknown_event_type_fails_the_row() {
        assert!(EventType::parse("teleport").is_err());
        assert!(PresenceStatus::parse("").is_err());
        let json = r#"{"allocationId": 1, "siteId": 1, "eventType": "teleport", "status": "arrived"}"#;
        assert!(serde_json::from_str::<JourneyEvent>(json).is_err());
    }

    #[test]
    fn serializes_canonical_names() {
        let event = JourneyEvent::departure(1, SiteId::LIONS_PARK, chrono::Utc::now()).detected_by_anpr();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["eventType"], "departure");
        assert_eq!(json["status"], "departed");
        assert_eq!(json["detectionMethod"], "anpr");
    }
}
