//! Upstream data store access.
//!
//! The engine never owns data. Allocations, per-site journey events and
//! transporter master records are fetched from the data store (or from
//! JSON files in mock mode) and handed to the pure engine functions.

mod client;
mod error;
mod mock;

use std::future::Future;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::{Allocation, CanonicalEntity, DataQualityWarning, JourneyEvent, SiteId};

pub use client::{FeedClient, FeedConfig};
pub use error::FeedError;
pub use mock::MockFeed;

/// Source of the facts the board is derived from.
pub trait FeedSource: Send + Sync {
    /// Every allocation.
    fn allocations(&self) -> impl Future<Output = Result<Vec<Allocation>, FeedError>> + Send;

    /// Journey events recorded at one site.
    fn site_events(
        &self,
        site: SiteId,
    ) -> impl Future<Output = Result<Vec<JourneyEvent>, FeedError>> + Send;

    /// Transporter master records.
    fn transporters(&self)
    -> impl Future<Output = Result<Vec<CanonicalEntity>, FeedError>> + Send;
}

/// Decode a JSON array one row at a time.
///
/// A body that is not an array is an error. A row that does not decode is
/// skipped with a `MalformedRow` warning.
pub(crate) fn decode_rows<T: DeserializeOwned>(feed: &str, body: &str) -> Result<Vec<T>, FeedError> {
    let rows: Vec<serde_json::Value> = serde_json::from_str(body).map_err(|e| FeedError::Json {
        message: format!("{}: {}", feed, e),
    })?;

    let mut decoded = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value(row) {
            Ok(value) => decoded.push(value),
            Err(e) => {
                let warning = DataQualityWarning::MalformedRow {
                    feed: feed.to_string(),
                    index,
                    reason: e.to_string(),
                };
                warn!(warning = %warning, "data quality");
            }
        }
    }
    Ok(decoded)
}
