#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the arcade simulation.
//!
//! This crate defines the message surface that connects the presentation
//! layer with the simulation managers. The presentation layer publishes
//! intent [`Event`] values (spawn a projectile, a projectile hit an enemy,
//! a powerup was collected), managers react by mutating the state they own,
//! and then publish state-change events that the presentation layer mirrors.
//! Managers never hold references to one another; everything they share is
//! plain data carried by events.

use std::{fmt, sync::Arc};

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod timer;

pub use config::{
    DifficultyConfig, EnemyAbility, EnemyConfig, EnemyShape, EnemyShootConfig, EnemyUnlock,
    GameConfig, MovementPattern, PowerupConfig, ProjectileShape, ProjectileVisual, WaveLayout,
    WeaponConfig, WorldBounds,
};
pub use timer::{millis, TimerHandle, TimerQueue};

/// Unique identifier assigned to a spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyInstanceId(u32);

impl EnemyInstanceId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile, displayed as `proj_<n>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u64);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "proj_{}", self.0)
    }
}

/// Unique identifier assigned to a spawned powerup pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PowerupInstanceId(u32);

impl PowerupInstanceId {
    /// Creates a new powerup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Side that fired a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    /// Fired by the player ship.
    Player,
    /// Fired by an enemy.
    Enemy,
}

/// Request published by the presentation layer to create a projectile.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileSpawn {
    /// Projectile type identifier.
    pub kind: String,
    /// Initial position in world units.
    pub position: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Side that fired the projectile.
    pub owner: Owner,
    /// Damage carried by the projectile; falls back to the owner's config.
    pub damage: Option<u32>,
    /// Blast radius for explosive projectiles.
    pub radius: Option<f32>,
    /// Fuse length in milliseconds for explosive projectiles.
    pub time_to_explode_ms: Option<f32>,
    /// Weapon that fired the projectile; required for player projectiles.
    pub weapon: Option<WeaponConfig>,
    /// Shooting parameters of the firing enemy; required for enemy projectiles.
    pub enemy_shoot: Option<EnemyShootConfig>,
}

/// Effect payload shared by powerup activation and removal events.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerupEffect {
    /// Powerup definition that produced the effect.
    pub config_id: String,
    /// Effect type of the powerup.
    pub effect: String,
    /// Strength of the effect, if it scales a stat.
    pub multiplier: Option<f32>,
    /// Duration of the effect in milliseconds.
    pub duration_ms: u64,
}

impl PowerupEffect {
    /// Captures the effect payload described by a powerup definition.
    #[must_use]
    pub fn from_config(config: &PowerupConfig) -> Self {
        Self {
            config_id: config.id.clone(),
            effect: config.effect.clone(),
            multiplier: config.multiplier,
            duration_ms: config.duration_ms,
        }
    }
}

/// Discriminant of [`Event`] used as the subscription key on the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// See [`Event::SpawnProjectile`].
    SpawnProjectile,
    /// See [`Event::ProjectileHitEnemy`].
    ProjectileHitEnemy,
    /// See [`Event::RequestSpawnPowerup`].
    RequestSpawnPowerup,
    /// See [`Event::PowerupCollected`].
    PowerupCollected,
    /// See [`Event::ProjectileCreated`].
    ProjectileCreated,
    /// See [`Event::ProjectileDestroyed`].
    ProjectileDestroyed,
    /// See [`Event::ProjectileExplode`].
    ProjectileExplode,
    /// See [`Event::EnemySpawned`].
    EnemySpawned,
    /// See [`Event::EnemyHealthUpdated`].
    EnemyHealthUpdated,
    /// See [`Event::EnemyDestroyed`].
    EnemyDestroyed,
    /// See [`Event::WaveUpdated`].
    WaveUpdated,
    /// See [`Event::PowerupSpawned`].
    PowerupSpawned,
    /// See [`Event::PowerupEffectApplied`].
    PowerupEffectApplied,
    /// See [`Event::PowerupEffectRemoved`].
    PowerupEffectRemoved,
    /// See [`Event::PowerupExpired`].
    PowerupExpired,
}

impl EventKind {
    /// Wire name of the event.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SpawnProjectile => "SPAWN_PROJECTILE",
            Self::ProjectileHitEnemy => "PROJECTILE_HIT_ENEMY",
            Self::RequestSpawnPowerup => "REQUEST_SPAWN_POWERUP",
            Self::PowerupCollected => "POWERUP_COLLECTED",
            Self::ProjectileCreated => "PROJECTILE_CREATED",
            Self::ProjectileDestroyed => "PROJECTILE_DESTROYED",
            Self::ProjectileExplode => "PROJECTILE_EXPLODE",
            Self::EnemySpawned => "ENEMY_SPAWNED",
            Self::EnemyHealthUpdated => "ENEMY_HEALTH_UPDATED",
            Self::EnemyDestroyed => "ENEMY_DESTROYED",
            Self::WaveUpdated => "WAVE_UPDATED",
            Self::PowerupSpawned => "POWERUP_SPAWNED",
            Self::PowerupEffectApplied => "POWERUP_EFFECT_APPLIED",
            Self::PowerupEffectRemoved => "POWERUP_EFFECT_REMOVED",
            Self::PowerupExpired => "POWERUP_EXPIRED",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Messages exchanged between the presentation layer and the managers.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Requests creation of a projectile.
    SpawnProjectile(ProjectileSpawn),
    /// Reports that a projectile collided with an enemy.
    ProjectileHitEnemy {
        /// Projectile involved in the collision.
        projectile: ProjectileId,
        /// Enemy struck by the projectile.
        enemy: EnemyInstanceId,
    },
    /// Requests that a powerup drop at the provided position.
    RequestSpawnPowerup {
        /// Drop position in world units.
        position: Vec2,
        /// Enemy type whose destruction triggered the drop.
        enemy_id: String,
    },
    /// Reports that the player collected a powerup pickup.
    PowerupCollected {
        /// Pickup that was collected.
        instance: PowerupInstanceId,
    },
    /// Confirms that a projectile was created.
    ProjectileCreated {
        /// Identifier assigned to the projectile.
        id: ProjectileId,
        /// Projectile type identifier.
        kind: String,
        /// Initial position in world units.
        position: Vec2,
        /// Velocity in world units per second.
        velocity: Vec2,
        /// Side that fired the projectile.
        owner: Owner,
        /// Damage carried by the projectile.
        damage: Option<u32>,
        /// Blast radius for explosive projectiles.
        radius: Option<f32>,
        /// Fuse length in milliseconds for explosive projectiles.
        time_to_explode_ms: Option<f32>,
        /// Rendering hints resolved from the owner's configuration.
        visual: ProjectileVisual,
    },
    /// Confirms that a projectile was removed.
    ProjectileDestroyed {
        /// Projectile that was removed.
        id: ProjectileId,
    },
    /// Announces that an explosive projectile detonated.
    ProjectileExplode {
        /// Projectile that detonated.
        id: ProjectileId,
        /// Detonation point in world units.
        position: Vec2,
        /// Blast radius in world units.
        radius: f32,
        /// Damage dealt inside the blast radius.
        damage: u32,
        /// Side that fired the projectile.
        owner: Owner,
        /// Projectile type identifier.
        kind: String,
    },
    /// Confirms that an enemy was spawned.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        instance: EnemyInstanceId,
        /// Definition of the spawned enemy.
        config: Arc<EnemyConfig>,
        /// Spawn position in world units.
        position: Vec2,
        /// Health at spawn time.
        initial_health: i32,
        /// Maximum health after wave scaling.
        max_health: i32,
        /// Wave speed multiplier applied to the config's base speed.
        speed_multiplier: f32,
    },
    /// Reports that a surviving enemy took damage.
    EnemyHealthUpdated {
        /// Enemy that took damage.
        instance: EnemyInstanceId,
        /// Health remaining after the hit.
        current_health: i32,
        /// Maximum health of the enemy.
        max_health: i32,
        /// Damage applied by the hit.
        damage_taken: u32,
    },
    /// Confirms that an enemy was destroyed.
    EnemyDestroyed {
        /// Enemy that was destroyed.
        instance: EnemyInstanceId,
        /// Definition identifier of the destroyed enemy.
        config_id: String,
        /// Currency granted after wave scaling.
        reward: u32,
        /// Score granted for the kill.
        score_value: u32,
        /// Definition of the destroyed enemy.
        config: Arc<EnemyConfig>,
    },
    /// Announces that a new wave started.
    WaveUpdated {
        /// Number of the wave that became current.
        wave: u32,
    },
    /// Confirms that a powerup pickup appeared.
    PowerupSpawned {
        /// Identifier assigned to the pickup.
        instance: PowerupInstanceId,
        /// Powerup definition selected for the drop.
        config_id: String,
        /// Pickup position in world units.
        position: Vec2,
        /// Texture key of the pickup.
        visual: String,
    },
    /// Announces that an effect became active.
    PowerupEffectApplied(PowerupEffect),
    /// Announces that an active effect ended.
    PowerupEffectRemoved(PowerupEffect),
    /// Announces that a powerup's effect expired.
    PowerupExpired {
        /// Powerup definition whose effect expired.
        config_id: String,
    },
}

impl Event {
    /// Discriminant used to route the event to subscribers.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::SpawnProjectile(_) => EventKind::SpawnProjectile,
            Self::ProjectileHitEnemy { .. } => EventKind::ProjectileHitEnemy,
            Self::RequestSpawnPowerup { .. } => EventKind::RequestSpawnPowerup,
            Self::PowerupCollected { .. } => EventKind::PowerupCollected,
            Self::ProjectileCreated { .. } => EventKind::ProjectileCreated,
            Self::ProjectileDestroyed { .. } => EventKind::ProjectileDestroyed,
            Self::ProjectileExplode { .. } => EventKind::ProjectileExplode,
            Self::EnemySpawned { .. } => EventKind::EnemySpawned,
            Self::EnemyHealthUpdated { .. } => EventKind::EnemyHealthUpdated,
            Self::EnemyDestroyed { .. } => EventKind::EnemyDestroyed,
            Self::WaveUpdated { .. } => EventKind::WaveUpdated,
            Self::PowerupSpawned { .. } => EventKind::PowerupSpawned,
            Self::PowerupEffectApplied(_) => EventKind::PowerupEffectApplied,
            Self::PowerupEffectRemoved(_) => EventKind::PowerupEffectRemoved,
            Self::PowerupExpired { .. } => EventKind::PowerupExpired,
        }
    }
}
