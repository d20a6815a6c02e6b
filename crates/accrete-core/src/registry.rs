//! The live-body registry.
//!
//! The registry is the single owner of all live [`Body`] values. The
//! gravity simulator and merge scanner read (and the simulator mutates)
//! bodies through it; merges remove bodies through [`BodyRegistry::take_all`],
//! which is all-or-nothing so a body can never be claimed by two merge
//! resolutions.
//!
//! Iteration order is unspecified as far as callers are concerned (the
//! underlying map happens to iterate in ID order, but nothing relies on
//! it).

use std::collections::BTreeMap;

use accrete_types::{Body, BodyId};

/// The live set of bodies.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    /// All live bodies, keyed by ID.
    bodies: BTreeMap<BodyId, Body>,
}

impl BodyRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            bodies: BTreeMap::new(),
        }
    }

    /// Insert a body and return its ID.
    pub fn spawn(&mut self, body: Body) -> BodyId {
        let id = body.id;
        self.bodies.insert(id, body);
        id
    }

    /// Look up a body by ID.
    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    /// Iterate over all live bodies.
    pub fn values(&self) -> impl Iterator<Item = &Body> {
        self.bodies.values()
    }

    /// Iterate mutably over all live bodies (used by the integrator).
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.values_mut()
    }

    /// Number of live bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Total points across all live bodies (saturating).
    pub fn total_points(&self) -> u64 {
        self.bodies
            .values()
            .fold(0_u64, |sum, body| sum.saturating_add(body.points()))
    }

    /// Remove all of the given bodies atomically.
    ///
    /// Returns `None` (and removes nothing) if any ID is absent -- a
    /// merge either consumes every body it selected or none of them.
    pub fn take_all(&mut self, ids: &[BodyId]) -> Option<Vec<Body>> {
        if !ids.iter().all(|id| self.bodies.contains_key(id)) {
            return None;
        }
        let taken = ids
            .iter()
            .filter_map(|id| self.bodies.remove(id))
            .collect();
        Some(taken)
    }
}
