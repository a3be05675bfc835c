#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile lifecycle system: creation from spawn requests, motion,
//! fuse countdown, and removal.
//!
//! The manager owns every live projectile. Each removal path (leaving the
//! world, hitting an enemy, detonating) publishes exactly one
//! [`Event::ProjectileDestroyed`]; removing an already-removed projectile is
//! a silent no-op.

use std::time::Duration;

use arcade_core::{
    millis, Event, Owner, ProjectileId, ProjectileSpawn, ProjectileVisual, WorldBounds,
};
use thiserror::Error;

pub mod explosion;
pub mod physics;
pub mod state;

pub use explosion::Explosion;
pub use physics::ProjectilePhysics;
pub use state::{Projectile, ProjectileState};

/// Configuration-integrity failures raised by malformed spawn requests.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// A player projectile arrived without the weapon that fired it.
    #[error("player projectile `{kind}` spawned without a weapon configuration")]
    MissingWeaponConfig {
        /// Projectile type of the rejected request.
        kind: String,
    },
    /// An enemy projectile arrived without the enemy's shooting parameters.
    #[error("enemy projectile `{kind}` spawned without an enemy shoot configuration")]
    MissingEnemyShootConfig {
        /// Projectile type of the rejected request.
        kind: String,
    },
}

/// Configuration parameters required to construct the projectile manager.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    bounds: WorldBounds,
}

impl Config {
    /// Creates a configuration constraining projectiles to `bounds`.
    #[must_use]
    pub const fn new(bounds: WorldBounds) -> Self {
        Self { bounds }
    }
}

/// Owns live projectiles and publishes their lifecycle events.
#[derive(Debug)]
pub struct ProjectileManager {
    state: ProjectileState,
    physics: ProjectilePhysics,
    next_id: u64,
    clock: Duration,
}

impl ProjectileManager {
    /// Creates a manager without live projectiles.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            state: ProjectileState::new(),
            physics: ProjectilePhysics::new(config.bounds),
            next_id: 1,
            clock: Duration::ZERO,
        }
    }

    /// Consumes the intent events this manager subscribes to.
    ///
    /// Malformed spawn requests are logged and dropped.
    pub fn handle(&mut self, event: &Event, out: &mut Vec<Event>) {
        match event {
            Event::SpawnProjectile(request) => {
                if let Err(error) = self.handle_spawn_projectile(request, out) {
                    log::error!("dropping projectile spawn: {error}");
                }
            }
            Event::ProjectileHitEnemy { projectile, .. } => {
                let _ = self.handle_projectile_hit_enemy(*projectile, out);
            }
            _ => {}
        }
    }

    /// Creates a projectile and publishes [`Event::ProjectileCreated`].
    ///
    /// Player projectiles must carry their weapon and enemy projectiles their
    /// shooting parameters; otherwise nothing is created or published.
    pub fn handle_spawn_projectile(
        &mut self,
        request: &ProjectileSpawn,
        out: &mut Vec<Event>,
    ) -> Result<ProjectileId, SpawnError> {
        let (config_damage, visual, radius, fuse) = match request.owner {
            Owner::Player => {
                let weapon =
                    request
                        .weapon
                        .as_ref()
                        .ok_or_else(|| SpawnError::MissingWeaponConfig {
                            kind: request.kind.clone(),
                        })?;
                (
                    weapon.damage,
                    weapon.visual,
                    weapon.explosion_radius,
                    weapon.fuse_ms,
                )
            }
            Owner::Enemy => {
                let shoot = request.enemy_shoot.as_ref().ok_or_else(|| {
                    SpawnError::MissingEnemyShootConfig {
                        kind: request.kind.clone(),
                    }
                })?;
                (shoot.damage, shoot.visual, None, None)
            }
        };

        let id = ProjectileId::new(self.next_id);
        self.next_id += 1;

        let projectile = Projectile {
            id,
            kind: request.kind.clone(),
            position: request.position,
            velocity: request.velocity,
            damage: Some(request.damage.unwrap_or(config_damage)),
            owner: request.owner,
            radius: request.radius.or(radius),
            time_to_explode_ms: request.time_to_explode_ms.or(fuse),
            created_at: self.clock,
        };
        log::debug!(
            "created {id} ({}, explosive: {})",
            projectile.kind,
            explosion::is_explosive(&projectile)
        );

        out.push(Event::ProjectileCreated {
            id,
            kind: projectile.kind.clone(),
            position: projectile.position,
            velocity: projectile.velocity,
            owner: projectile.owner,
            damage: projectile.damage,
            radius: projectile.radius,
            time_to_explode_ms: projectile.time_to_explode_ms,
            visual: visual.unwrap_or(ProjectileVisual::DEFAULT),
        });
        self.state.insert(projectile);
        Ok(id)
    }

    /// Removes a projectile that struck an enemy.
    ///
    /// Returns `false` when the projectile was already gone.
    pub fn handle_projectile_hit_enemy(&mut self, id: ProjectileId, out: &mut Vec<Event>) -> bool {
        self.remove(id, out)
    }

    /// Advances fuses and motion for every live projectile.
    ///
    /// An expiring fuse publishes [`Event::ProjectileExplode`] before removal;
    /// leaving the world removes the projectile without an explosion.
    pub fn update(&mut self, dt: Duration, out: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);
        let delta_ms = millis(dt);

        for id in self.state.ids() {
            let Some(projectile) = self.state.get_mut(id) else {
                continue;
            };

            if let Some(explosion) = explosion::tick_fuse(projectile, delta_ms) {
                out.push(explosion.into_event());
                let _ = self.remove(id, out);
                continue;
            }

            if !self.physics.step(projectile, delta_ms) {
                let _ = self.remove(id, out);
            }
        }
    }

    /// Removes a projectile, publishing [`Event::ProjectileDestroyed`] once.
    ///
    /// Returns `false` when the projectile was already gone.
    pub fn remove(&mut self, id: ProjectileId, out: &mut Vec<Event>) -> bool {
        if self.state.remove(id).is_none() {
            return false;
        }
        log::debug!("destroyed {id}");
        out.push(Event::ProjectileDestroyed { id });
        true
    }

    /// Side that fired the projectile.
    #[must_use]
    pub fn owner(&self, id: ProjectileId) -> Option<Owner> {
        self.state.owner(id)
    }

    /// Damage carried by the projectile.
    #[must_use]
    pub fn damage(&self, id: ProjectileId) -> Option<u32> {
        self.state.damage(id)
    }

    /// Simulated time at which the projectile was created.
    #[must_use]
    pub fn creation_time(&self, id: ProjectileId) -> Option<Duration> {
        self.state.creation_time(id)
    }

    /// Copy of the projectile's current record.
    #[must_use]
    pub fn snapshot(&self, id: ProjectileId) -> Option<Projectile> {
        self.state.get(id).cloned()
    }

    /// Read-only view of every live projectile.
    #[must_use]
    pub fn state(&self) -> &ProjectileState {
        &self.state
    }

    /// Number of live projectiles.
    #[must_use]
    pub fn count(&self) -> usize {
        self.state.len()
    }
}
