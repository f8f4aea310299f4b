//! Matching free-text names to master records.

use std::collections::HashMap;

use crate::domain::{Allocation, AllocationId, CanonicalEntity};

use super::normalize::normalize;

/// Find the entity whose normalized name equals the normalized input.
///
/// Returns the first such entity in list order. A blank input matches
/// nothing, even an entity with a blank name.
///
/// # Examples
///
/// ```
/// use haul_board::domain::CanonicalEntity;
/// use haul_board::names::find_entity;
///
/// let entities = vec![
///     CanonicalEntity::new(1, "acme transport"),
///     CanonicalEntity::new(2, "ACME Transportation"),
/// ];
///
/// let hit = find_entity("ACME  Transport", &entities).unwrap();
/// assert_eq!(hit.id, 1);
/// assert!(find_entity("Acme Transp", &entities).is_none());
/// ```
pub fn find_entity<'a>(raw: &str, candidates: &'a [CanonicalEntity]) -> Option<&'a CanonicalEntity> {
    let key = normalize(raw);
    if key.is_empty() {
        return None;
    }
    candidates.iter().find(|e| normalize(&e.name) == key)
}

/// Normalized-name index over a set of master records.
///
/// Use this instead of [`find_entity`] when matching many names against
/// the same list. On duplicate normalized names the earliest record wins,
/// so both give the same answer.
#[derive(Debug, Clone, Default)]
pub struct EntityIndex {
    entities: Vec<CanonicalEntity>,
    by_name: HashMap<String, usize>,
}

impl EntityIndex {
    pub fn new(entities: Vec<CanonicalEntity>) -> Self {
        let mut by_name = HashMap::with_capacity(entities.len());
        for (idx, entity) in entities.iter().enumerate() {
            let key = normalize(&entity.name);
            if key.is_empty() {
                continue;
            }
            by_name.entry(key).or_insert(idx);
        }
        Self { entities, by_name }
    }

    /// Look up a raw name.
    pub fn find(&self, raw: &str) -> Option<&CanonicalEntity> {
        self.by_name
            .get(&normalize(raw))
            .map(|&idx| &self.entities[idx])
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// An allocation paired with the transporter record its name matches.
#[derive(Debug, Clone, PartialEq)]
pub struct TransporterLink<'a> {
    pub allocation: AllocationId,
    pub transporter: Option<&'a CanonicalEntity>,
}

/// Link every allocation's free-text transporter to a master record.
///
/// Neither side is modified. Allocations without a transporter name, or
/// whose name matches nothing, get `None`.
pub fn link_transporters<'a>(
    allocations: &[Allocation],
    transporters: &'a EntityIndex,
) -> Vec<TransporterLink<'a>> {
    allocations
        .iter()
        .map(|a| TransporterLink {
            allocation: a.id,
            transporter: a.transporter.as_deref().and_then(|t| transporters.find(t)),
        })
        .collect()
}
