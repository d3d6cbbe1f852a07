//! Step and slot identifier synthesis.
//!
//! Slot ids are derived from role names: `Giver` becomes
//! `{schemaId}/Slots/giver`. Synthesis runs in two passes. While slots are
//! compiled, [`IdentifierSynthesizer::reserve`] hands out a [`SlotTicket`]
//! carrying the derived name and its ordinal among same-named slots. Once every
//! slot of the schema is known, [`IdentifierSynthesizer::finish`] decides which
//! names actually collided and [`SlotIds::resolve`] turns tickets into ids:
//! collided names keep a letter suffix (`giver-a`, `giver-b`, …), the rest
//! are emitted bare.

use std::collections::{BTreeMap, HashSet};

use kairos_sdf::Slot;

/// Derives the base name of a slot from its role.
///
/// CamelCase is split into words and the first word is lowercased:
/// `ArtifactOrigin` becomes `artifact`. Returns `None` when the role has no
/// word at all.
#[must_use]
pub fn base_name(role: &str) -> Option<String> {
    let mut spaced = String::with_capacity(role.len() * 2);
    for ch in role.chars() {
        if ch.is_uppercase() {
            spaced.push(' ');
        }
        spaced.push(ch);
    }
    spaced.split_whitespace().next().map(str::to_lowercase)
}

/// Derives the full slot name.
///
/// When the role is shared within its container, the reference variable is
/// appended so that distinct coreference groups get distinct names.
#[must_use]
pub fn slot_name(role: &str, refvar: Option<&str>, shared: bool) -> Option<String> {
    let base = base_name(role)?;
    Some(match refvar {
        Some(refvar) if shared => format!("{base}-{refvar}"),
        _ => base,
    })
}

/// Returns true if more than one slot in `container` has exactly this role.
#[must_use]
pub fn is_shared(role: &str, container: &[Slot]) -> bool {
    container.iter().filter(|slot| slot.role == role).take(2).count() > 1
}

/// Step IRI, `{schemaId}/Steps/{stepId}`.
#[must_use]
pub fn step_iri(schema_id: &str, step_id: &str) -> String {
    format!("{schema_id}/Steps/{step_id}")
}

/// Letter suffix for the `ordinal`-th slot of a name: `a` … `z`, then `aa`, `ab`, ….
#[must_use]
pub fn disambiguator(ordinal: usize) -> String {
    let mut letters = Vec::new();
    let mut n = ordinal;
    loop {
        letters.push(char::from(b'a' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// A reserved slot name awaiting its final id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotTicket {
    name: String,
    ordinal: usize,
}

impl SlotTicket {
    /// The derived slot name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 0-based position among slots with the same name, in declaration order.
    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

/// First pass: counts slot names across one schema.
#[derive(Debug, Clone)]
pub struct IdentifierSynthesizer {
    schema_id: String,
    counters: BTreeMap<String, usize>,
}

impl IdentifierSynthesizer {
    /// Creates a synthesizer scoped to one schema.
    #[must_use]
    pub fn new(schema_id: impl Into<String>) -> Self {
        Self {
            schema_id: schema_id.into(),
            counters: BTreeMap::new(),
        }
    }

    /// Reserves the next ordinal for `name`.
    pub fn reserve(&mut self, name: &str) -> SlotTicket {
        let counter = self.counters.entry(name.to_owned()).or_insert(0);
        let ticket = SlotTicket {
            name: name.to_owned(),
            ordinal: *counter,
        };
        *counter += 1;
        ticket
    }

    /// Number of slots reserved under `name` so far.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Second pass: decides which names keep their letter suffix.
    ///
    /// Names reserved more than once always keep it. A name reserved exactly
    /// once drops it, unless its bare id would coincide with a suffixed id of
    /// another name (`giver-a` authored as a name next to two `giver`s).
    #[must_use]
    pub fn finish(self) -> SlotIds {
        let mut suffixed: HashSet<String> = self
            .counters
            .iter()
            .filter(|&(_, &count)| count != 1)
            .map(|(name, _)| name.clone())
            .collect();

        loop {
            let mut taken: HashSet<String> = HashSet::new();
            for name in &suffixed {
                for ordinal in 0..self.counters[name] {
                    taken.insert(format!("{name}-{}", disambiguator(ordinal)));
                }
            }
            let clashing: Vec<String> = self
                .counters
                .keys()
                .filter(|name| !suffixed.contains(*name) && taken.contains(*name))
                .cloned()
                .collect();
            if clashing.is_empty() {
                break;
            }
            for name in clashing {
                tracing::debug!(schema = %self.schema_id, name = %name, "keeping suffix to avoid id clash");
                suffixed.insert(name);
            }
        }

        SlotIds {
            schema_id: self.schema_id,
            suffixed,
        }
    }
}

/// Final slot ids of one schema.
#[derive(Debug, Clone)]
pub struct SlotIds {
    schema_id: String,
    suffixed: HashSet<String>,
}

impl SlotIds {
    /// Resolves a ticket to its slot IRI.
    #[must_use]
    pub fn resolve(&self, ticket: &SlotTicket) -> String {
        if self.suffixed.contains(&ticket.name) {
            format!(
                "{}/Slots/{}-{}",
                self.schema_id,
                ticket.name,
                disambiguator(ticket.ordinal)
            )
        } else {
            format!("{}/Slots/{}", self.schema_id, ticket.name)
        }
    }
}
