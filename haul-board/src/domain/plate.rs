//! Vehicle registration (plate) keys.

use std::fmt;

/// Error returned when a plate is empty after normalization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid plate: {reason}")]
pub struct InvalidPlate {
    reason: &'static str,
}

/// A normalized vehicle registration used for exact plate comparison.
///
/// Gate operators type plates with arbitrary spacing and casing
/// ("ABC 123 GP", "abc123gp"). A `PlateKey` strips every whitespace
/// character and lower-cases the rest, so two keys are equal exactly when
/// the plates are the same vehicle.
///
/// # Examples
///
/// ```
/// use haul_board::domain::PlateKey;
///
/// let typed = PlateKey::parse(" abc 123 GP").unwrap();
/// let stored = PlateKey::parse("ABC123GP").unwrap();
/// assert_eq!(typed, stored);
/// assert_eq!(typed.as_str(), "abc123gp");
///
/// // Nothing left after normalization
/// assert!(PlateKey::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PlateKey(String);

impl PlateKey {
    /// Normalize a free-text plate.
    ///
    /// Fails only when the input contains no non-whitespace characters.
    pub fn parse(s: &str) -> Result<Self, InvalidPlate> {
        let key = normalize_plate(s);
        if key.is_empty() {
            return Err(InvalidPlate {
                reason: "must contain at least one non-whitespace character",
            });
        }
        Ok(PlateKey(key))
    }

    /// Returns the normalized plate.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a stored plate normalizes to this key.
    pub fn matches(&self, plate: &str) -> bool {
        normalize_plate(plate) == self.0
    }
}

/// Remove all whitespace and lower-case.
fn normalize_plate(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Debug for PlateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlateKey({})", self.0)
    }
}

impl fmt::Display for PlateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_inner_whitespace() {
        let key = PlateKey::parse("ABC 123\tGP").unwrap();
        assert_eq!(key.as_str(), "abc123gp");
    }

    #[test]
    fn reject_blank() {
        assert!(PlateKey::parse("").is_err());
        assert!(PlateKey::parse(" \t\n").is_err());
    }

    #[test]
    fn matches_stored_plate() {
        let key = PlateKey::parse("abc123gp").unwrap();
        assert!(key.matches("ABC 123 GP"));
        assert!(key.matches(" Abc123Gp "));
        assert!(!key.matches("ABC123G"));
        assert!(!key.matches("ABC-123-GP"));
    }

    #[test]
    fn display() {
        let key = PlateKey::parse("ND 456 789").unwrap();
        assert_eq!(format!("{}", key), "nd456789");
        assert_eq!(format!("{:?}", key), "PlateKey(nd456789)");
    }
}
