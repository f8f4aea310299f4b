//! Domain types for the haulage board.
//!
//! This module contains the plain-data records supplied by the data store
//! and the validated value types the engine computes with. Value types
//! enforce their invariants at construction time.

mod allocation;
mod entity;
mod error;
mod event;
mod identify;
mod plate;
mod site;
mod stage;
mod status;
mod time;

pub use allocation::{Allocation, AllocationId};
pub use entity::CanonicalEntity;
pub use error::{DataQualityWarning, ResolveError};
pub use event::{DetectionMethod, EventType, JourneyEvent, PresenceStatus, UnknownValue};
pub use identify::{GateAction, ResolutionBasis};
pub use plate::{InvalidPlate, PlateKey};
pub use site::SiteId;
pub use stage::{LionsStage, Stage};
pub use status::AllocationStatus;
pub use time::{TimeError, deserialize_opt_timestamp, display_time, parse_timestamp};
