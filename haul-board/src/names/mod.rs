//! Free-text name normalization and master-record matching.
//!
//! Manual data entry produces names like "ACME  Transport " for a master
//! record called "Acme Transport". Matching here absorbs casing and
//! spacing differences only; it never guesses at typos.

mod matcher;
mod normalize;

pub use matcher::{EntityIndex, TransporterLink, find_entity, link_transporters};
pub use normalize::{normalize, normalize_opt};
