#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy lifecycle system: spawning, damage, destruction and wave progression.
//!
//! The manager owns every live enemy and composes a [`WaveHandler`] that
//! supplies difficulty scaling and decides what each wave spawns. Unknown
//! enemy types and identifiers are logged and ignored, since requests arrive
//! from data-driven callers that may race with destruction.

use std::{collections::HashMap, sync::Arc, time::Duration};

use arcade_core::{DifficultyConfig, EnemyConfig, EnemyInstanceId, Event, WaveLayout};
use glam::Vec2;

pub mod wave;

pub use wave::{SpawnOrder, WaveHandler, WavePhase};

/// Damage applied for every [`Event::ProjectileHitEnemy`], regardless of the
/// projectile's own damage.
pub const PROJECTILE_HIT_DAMAGE: u32 = 10;

/// Configuration parameters required to construct the enemy manager.
#[derive(Clone, Debug)]
pub struct Config {
    enemies: Vec<EnemyConfig>,
    difficulty: DifficultyConfig,
    layout: WaveLayout,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration from the enemy roster and wave parameters.
    #[must_use]
    pub fn new(
        enemies: Vec<EnemyConfig>,
        difficulty: DifficultyConfig,
        layout: WaveLayout,
        rng_seed: u64,
    ) -> Self {
        Self {
            enemies,
            difficulty,
            layout,
            rng_seed,
        }
    }
}

/// Runtime record of a live enemy.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyInstance {
    /// Identifier assigned at spawn.
    pub id: EnemyInstanceId,
    /// Definition of the enemy.
    pub config: Arc<EnemyConfig>,
    /// Remaining health.
    pub health: i32,
    /// Health at spawn after wave scaling.
    pub max_health: i32,
    /// Wave speed multiplier captured at spawn.
    pub speed_multiplier: f32,
    /// Spawn position in world units.
    pub spawn_position: Vec2,
}

impl EnemyInstance {
    /// Identifier of the enemy's definition.
    #[must_use]
    pub fn config_id(&self) -> &str {
        &self.config.id
    }
}

/// Owns live enemies and publishes their lifecycle events.
#[derive(Debug)]
pub struct EnemyManager {
    configs: HashMap<String, Arc<EnemyConfig>>,
    enemies: HashMap<EnemyInstanceId, EnemyInstance>,
    next_id: u32,
    waves: WaveHandler,
}

impl EnemyManager {
    /// Creates a manager with an empty registry, positioned before the first wave.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let configs = config
            .enemies
            .into_iter()
            .map(|enemy| (enemy.id.clone(), Arc::new(enemy)))
            .collect();

        Self {
            configs,
            enemies: HashMap::new(),
            next_id: 1,
            waves: WaveHandler::new(config.difficulty, config.layout, config.rng_seed),
        }
    }

    /// Consumes the intent events this manager subscribes to.
    pub fn handle(&mut self, event: &Event, out: &mut Vec<Event>) {
        if let Event::ProjectileHitEnemy { enemy, .. } = event {
            self.handle_damage(*enemy, PROJECTILE_HIT_DAMAGE, out);
        }
    }

    /// Starts the next wave immediately, pre-empting any scheduled advancement.
    pub fn advance_wave(&mut self, out: &mut Vec<Event>) {
        let mut orders = Vec::new();
        self.waves.advance_wave(out, &mut orders);
        self.execute(orders, out);
    }

    /// Advances the wave-clear timer by `dt`.
    pub fn update(&mut self, dt: Duration, out: &mut Vec<Event>) {
        let mut orders = Vec::new();
        self.waves.update(dt, out, &mut orders);
        if !orders.is_empty() {
            self.execute(orders, out);
        }
    }

    fn execute(&mut self, orders: Vec<SpawnOrder>, out: &mut Vec<Event>) {
        for order in orders {
            let _ = self.spawn_enemy(&order.config_id, order.position, out);
        }
        self.waves.finish_spawning();
    }

    /// Spawns an enemy of type `config_id` scaled for the current wave.
    ///
    /// Unknown types are logged and ignored.
    pub fn spawn_enemy(
        &mut self,
        config_id: &str,
        position: Vec2,
        out: &mut Vec<Event>,
    ) -> Option<EnemyInstanceId> {
        let Some(config) = self.configs.get(config_id) else {
            log::warn!("cannot spawn unknown enemy type `{config_id}`");
            return None;
        };
        let config = Arc::clone(config);

        let health = self.waves.scaled_health(config.base_health);
        let speed_multiplier = self.waves.speed_multiplier();
        let id = EnemyInstanceId::new(self.next_id);
        self.next_id += 1;

        let _ = self.enemies.insert(
            id,
            EnemyInstance {
                id,
                config: Arc::clone(&config),
                health,
                max_health: health,
                speed_multiplier,
                spawn_position: position,
            },
        );
        self.waves.track_enemy_in_wave(id);
        log::debug!("spawned enemy {} ({config_id}, {health} hp)", id.get());

        out.push(Event::EnemySpawned {
            instance: id,
            config,
            position,
            initial_health: health,
            max_health: health,
            speed_multiplier,
        });
        Some(id)
    }

    /// Subtracts `amount` from the enemy's health.
    ///
    /// Publishes either [`Event::EnemyHealthUpdated`] or, once health drops
    /// to zero, the destruction events; never both.
    pub fn handle_damage(&mut self, id: EnemyInstanceId, amount: u32, out: &mut Vec<Event>) {
        let Some(enemy) = self.enemies.get_mut(&id) else {
            log::warn!("damage for unknown enemy {}", id.get());
            return;
        };

        enemy.health = enemy.health.saturating_sub_unsigned(amount);
        if enemy.health <= 0 {
            let _ = self.destroy_enemy(id, out);
            return;
        }

        out.push(Event::EnemyHealthUpdated {
            instance: id,
            current_health: enemy.health,
            max_health: enemy.max_health,
            damage_taken: amount,
        });
    }

    /// Removes an enemy and publishes [`Event::EnemyDestroyed`] with its reward.
    ///
    /// Returns `false` when the enemy was already gone.
    pub fn destroy_enemy(&mut self, id: EnemyInstanceId, out: &mut Vec<Event>) -> bool {
        let Some(enemy) = self.enemies.remove(&id) else {
            log::warn!("destroy for unknown enemy {}", id.get());
            return false;
        };

        let reward = self.waves.scaled_reward(enemy.config.base_reward);
        self.waves.handle_enemy_destroyed_in_wave(id);
        log::debug!("destroyed enemy {} ({})", id.get(), enemy.config.id);

        out.push(Event::EnemyDestroyed {
            instance: id,
            config_id: enemy.config.id.clone(),
            reward,
            score_value: enemy.config.score_value,
            config: enemy.config,
        });
        true
    }

    /// Live enemy with the provided identifier.
    #[must_use]
    pub fn enemy(&self, id: EnemyInstanceId) -> Option<&EnemyInstance> {
        self.enemies.get(&id)
    }

    /// Identifiers of live enemies in spawn order.
    #[must_use]
    pub fn enemy_ids(&self) -> Vec<EnemyInstanceId> {
        let mut ids: Vec<_> = self.enemies.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of live enemies.
    #[must_use]
    pub fn count(&self) -> usize {
        self.enemies.len()
    }

    /// Definition registered under `config_id`.
    #[must_use]
    pub fn config(&self, config_id: &str) -> Option<&Arc<EnemyConfig>> {
        self.configs.get(config_id)
    }

    /// Wave state composed into this manager.
    #[must_use]
    pub fn waves(&self) -> &WaveHandler {
        &self.waves
    }
}
