//! Mock feed for running without a data store.
//!
//! Serves records from JSON files in a directory:
//!
//! - `allocations.json` (required)
//! - `site_<n>_events.json`, one per site
//! - `transporters.json`
//!
//! Files are re-read on every call, so editing them changes the next poll.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::domain::{Allocation, CanonicalEntity, JourneyEvent, SiteId};

use super::error::FeedError;
use super::{FeedSource, decode_rows};

const ALLOCATIONS_FILE: &str = "allocations.json";
const TRANSPORTERS_FILE: &str = "transporters.json";

/// Mock feed that serves data from JSON files.
#[derive(Debug, Clone)]
pub struct MockFeed {
    dir: PathBuf,
}

impl MockFeed {
    /// Create a mock feed over a directory.
    ///
    /// Fails if the directory has no `allocations.json`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, FeedError> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.join(ALLOCATIONS_FILE).is_file() {
            return Err(FeedError::Mock {
                message: format!("No {} in {:?}", ALLOCATIONS_FILE, dir),
            });
        }
        Ok(Self { dir })
    }

    /// File name holding one site's events.
    pub fn site_file(site: SiteId) -> String {
        format!("site_{}_events.json", site.get())
    }

    async fn load<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>, FeedError> {
        let path = self.dir.join(file);
        let json = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| FeedError::Mock {
                message: format!("Failed to read {:?}: {}", path, e),
            })?;
        decode_rows(file, &json)
    }
}

impl FeedSource for MockFeed {
    async fn allocations(&self) -> Result<Vec<Allocation>, FeedError> {
        self.load(ALLOCATIONS_FILE).await
    }

    async fn site_events(&self, site: SiteId) -> Result<Vec<JourneyEvent>, FeedError> {
        self.load(&Self::site_file(site)).await
    }

    async fn transporters(&self) -> Result<Vec<CanonicalEntity>, FeedError> {
        self.load(TRANSPORTERS_FILE).await
    }
}
