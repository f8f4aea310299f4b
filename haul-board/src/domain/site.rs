//! Site identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A physical facility in the haulage chain.
///
/// Sites are numbered by the upstream data store. Two are known to the
/// engine by number; any other site is carried through untouched and
/// rendered generically.
///
/// # Examples
///
/// ```
/// use haul_board::domain::SiteId;
///
/// assert_eq!(SiteId::LIONS_PARK.name(), "Lions Park");
/// assert_eq!(SiteId::new(7).name(), "Site 7");
/// assert_eq!(SiteId::BULK_CONNECTIONS.get(), 2);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(u32);

impl SiteId {
    /// The Lions Park staging yard.
    pub const LIONS_PARK: SiteId = SiteId(1);

    /// The Bulk Connections port terminal.
    pub const BULK_CONNECTIONS: SiteId = SiteId(2);

    /// Wrap a raw site number.
    pub const fn new(id: u32) -> Self {
        SiteId(id)
    }

    /// Returns the raw site number.
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Human-readable site name.
    pub fn name(&self) -> String {
        match *self {
            SiteId::LIONS_PARK => "Lions Park".to_string(),
            SiteId::BULK_CONNECTIONS => "Bulk Connections".to_string(),
            SiteId(n) => format!("Site {n}"),
        }
    }
}

impl fmt::Debug for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SiteId({})", self.0)
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_site_names() {
        assert_eq!(SiteId::LIONS_PARK.name(), "Lions Park");
        assert_eq!(SiteId::BULK_CONNECTIONS.name(), "Bulk Connections");
        assert_eq!(SiteId::new(3).name(), "Site 3");
    }

    #[test]
    fn serde_as_number() {
        let site: SiteId = serde_json::from_str("2").unwrap();
        assert_eq!(site, SiteId::BULK_CONNECTIONS);
        assert_eq!(serde_json::to_string(&SiteId::LIONS_PARK).unwrap(), "1");
    }
}
