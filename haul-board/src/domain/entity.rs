//! Master-data records.

use serde::{Deserialize, Serialize};

/// A canonical master record (transporter, client, freight company, driver).
///
/// Allocations refer to these by free-text name only, so the link is made
/// by name matching rather than by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEntity {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CanonicalEntity {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            code: None,
            phone: None,
        }
    }
}
