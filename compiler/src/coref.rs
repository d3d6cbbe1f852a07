//! Coreference resolution.
//!
//! Every compiled slot is recorded in an [`EntityMap`] under its final id.
//! Slots that share a `refvar` denote the same real-world entity; slots
//! without one get an [`EntityTag::Unbound`] tag that never matches anything.

use kairos_sdf::{vocab, EntityRelation, Relation};

/// Entity a slot refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityTag {
    /// Authored reference variable.
    Bound(String),
    /// Placeholder for a slot without a reference variable; unique per slot.
    Unbound(usize),
}

/// Slot id to entity tag, in slot declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityMap {
    entries: Vec<(String, EntityTag)>,
    unbound: usize,
}

impl EntityMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a slot and its optional reference variable.
    pub fn record(&mut self, slot_id: impl Into<String>, refvar: Option<&str>) {
        let tag = match refvar {
            Some(refvar) => EntityTag::Bound(refvar.to_owned()),
            None => {
                self.unbound += 1;
                EntityTag::Unbound(self.unbound)
            }
        };
        self.entries.push((slot_id.into(), tag));
    }

    /// Tag of a slot.
    #[must_use]
    pub fn get(&self, slot_id: &str) -> Option<&EntityTag> {
        self.entries
            .iter()
            .find(|(id, _)| id == slot_id)
            .map(|(_, tag)| tag)
    }

    /// Number of recorded slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no slot was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Slot ids grouped by reference variable.
    ///
    /// Groups are ordered by first appearance and members by declaration
    /// order. Unbound slots are never grouped.
    #[must_use]
    pub fn groups(&self) -> Vec<(&str, Vec<&str>)> {
        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for (slot_id, tag) in &self.entries {
            let EntityTag::Bound(refvar) = tag else {
                continue;
            };
            match groups.iter_mut().find(|(r, _)| *r == refvar.as_str()) {
                Some((_, members)) => members.push(slot_id.as_str()),
                None => groups.push((refvar.as_str(), vec![slot_id.as_str()])),
            }
        }
        groups
    }
}

/// Derives `sameAs` relations: for every group of two or more slots, the first
/// member is the subject and the rest are objects.
#[must_use]
pub fn entity_relations(map: &EntityMap) -> Vec<EntityRelation> {
    map.groups()
        .into_iter()
        .filter(|(_, members)| members.len() >= 2)
        .map(|(_, members)| EntityRelation {
            subject: members[0].to_owned(),
            relations: members[1..]
                .iter()
                .map(|object| Relation {
                    predicate: vocab::SAME_AS.to_owned(),
                    object: (*object).to_owned(),
                })
                .collect(),
        })
        .collect()
}
