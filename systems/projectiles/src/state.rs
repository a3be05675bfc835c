//! Authoritative projectile records keyed by identifier.

use std::{collections::HashMap, time::Duration};

use arcade_core::{Owner, ProjectileId};
use glam::Vec2;

/// Mutable runtime record of a live projectile.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    /// Identifier assigned at creation.
    pub id: ProjectileId,
    /// Projectile type identifier.
    pub kind: String,
    /// Current position in world units.
    pub position: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Damage carried by the projectile.
    pub damage: Option<u32>,
    /// Side that fired the projectile.
    pub owner: Owner,
    /// Blast radius for explosive projectiles.
    pub radius: Option<f32>,
    /// Remaining fuse in milliseconds for explosive projectiles.
    pub time_to_explode_ms: Option<f32>,
    /// Simulated time at which the projectile was created.
    pub created_at: Duration,
}

/// Map of live projectiles with read-only accessors for collision handling.
#[derive(Debug, Default)]
pub struct ProjectileState {
    records: HashMap<ProjectileId, Projectile>,
}

impl ProjectileState {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, projectile: Projectile) {
        let _ = self.records.insert(projectile.id, projectile);
    }

    pub(crate) fn get_mut(&mut self, id: ProjectileId) -> Option<&mut Projectile> {
        self.records.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: ProjectileId) -> Option<Projectile> {
        self.records.remove(&id)
    }

    /// Returns the record for `id`, if it is live.
    #[must_use]
    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.records.get(&id)
    }

    /// Damage carried by the projectile.
    #[must_use]
    pub fn damage(&self, id: ProjectileId) -> Option<u32> {
        self.get(id).and_then(|projectile| projectile.damage)
    }

    /// Side that fired the projectile.
    #[must_use]
    pub fn owner(&self, id: ProjectileId) -> Option<Owner> {
        self.get(id).map(|projectile| projectile.owner)
    }

    /// Simulated time at which the projectile was created.
    #[must_use]
    pub fn creation_time(&self, id: ProjectileId) -> Option<Duration> {
        self.get(id).map(|projectile| projectile.created_at)
    }

    /// Number of live projectiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Reports whether no projectiles are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identifiers of live projectiles in creation order.
    #[must_use]
    pub fn ids(&self) -> Vec<ProjectileId> {
        let mut ids: Vec<_> = self.records.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Iterator over live projectiles in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.records.values()
    }
}
