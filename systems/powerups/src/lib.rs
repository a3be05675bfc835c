#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Powerup lifecycle system: random drops, collection and timed effects.
//!
//! Active effects are keyed by effect type rather than by pickup, so
//! collecting a second powerup with an effect that is already running
//! refreshes the running timer instead of stacking another one.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::Duration,
};

use arcade_core::{millis, Event, PowerupConfig, PowerupEffect, PowerupInstanceId};
use glam::Vec2;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the powerup manager.
#[derive(Clone, Debug)]
pub struct Config {
    powerups: Vec<PowerupConfig>,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration from the droppable powerups and a random seed.
    #[must_use]
    pub fn new(powerups: Vec<PowerupConfig>, rng_seed: u64) -> Self {
        Self { powerups, rng_seed }
    }
}

/// Pickup waiting in the world to be collected.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnedPowerup {
    /// Identifier assigned when the pickup appeared.
    pub id: PowerupInstanceId,
    /// Definition selected for the drop.
    pub config: Arc<PowerupConfig>,
    /// Pickup position in world units.
    pub position: Vec2,
    /// Simulated time at which the pickup appeared.
    pub created_at: Duration,
}

/// Effect currently applied to the player.
#[derive(Clone, Debug, PartialEq)]
pub struct ActiveEffect {
    /// Definition that first activated the effect.
    pub config: Arc<PowerupConfig>,
    /// Milliseconds left before the effect expires.
    pub remaining_ms: f64,
}

/// Owns pickups and active effects and publishes their lifecycle events.
#[derive(Debug)]
pub struct PowerupManager {
    configs: Vec<Arc<PowerupConfig>>,
    spawned: HashMap<PowerupInstanceId, SpawnedPowerup>,
    active: BTreeMap<String, ActiveEffect>,
    next_id: u32,
    clock: Duration,
    rng: ChaCha8Rng,
}

impl PowerupManager {
    /// Creates a manager without pickups or active effects.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            configs: config.powerups.into_iter().map(Arc::new).collect(),
            spawned: HashMap::new(),
            active: BTreeMap::new(),
            next_id: 1,
            clock: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes the intent events this manager subscribes to.
    pub fn handle(&mut self, event: &Event, out: &mut Vec<Event>) {
        match event {
            Event::RequestSpawnPowerup { position, enemy_id } => {
                let _ = self.handle_request_spawn_powerup(*position, enemy_id, out);
            }
            Event::PowerupCollected { instance } => {
                let _ = self.handle_powerup_collected(*instance, out);
            }
            _ => {}
        }
    }

    /// Drops a uniformly random powerup at `position`.
    ///
    /// The requesting enemy type does not influence the choice.
    pub fn handle_request_spawn_powerup(
        &mut self,
        position: Vec2,
        enemy_id: &str,
        out: &mut Vec<Event>,
    ) -> Option<PowerupInstanceId> {
        let Some(config) = self.configs.choose(&mut self.rng) else {
            log::warn!("no powerups configured; ignoring drop from `{enemy_id}`");
            return None;
        };
        let config = Arc::clone(config);

        let id = PowerupInstanceId::new(self.next_id);
        self.next_id += 1;
        log::debug!("powerup {} ({}) dropped by {enemy_id}", id.get(), config.id);

        out.push(Event::PowerupSpawned {
            instance: id,
            config_id: config.id.clone(),
            position,
            visual: config.visual.clone(),
        });
        let _ = self.spawned.insert(
            id,
            SpawnedPowerup {
                id,
                config,
                position,
                created_at: self.clock,
            },
        );
        Some(id)
    }

    /// Consumes a pickup and applies its effect.
    ///
    /// Returns `false` for unknown or already-collected pickups.
    pub fn handle_powerup_collected(
        &mut self,
        id: PowerupInstanceId,
        out: &mut Vec<Event>,
    ) -> bool {
        let Some(pickup) = self.spawned.remove(&id) else {
            log::warn!("collected unknown powerup {}", id.get());
            return false;
        };
        self.apply_effect(&pickup.config, out);
        true
    }

    /// Removes a pickup that left play without being collected.
    ///
    /// No effect is applied and nothing is published. Returns `false` for
    /// unknown or already-removed pickups.
    pub fn discard(&mut self, id: PowerupInstanceId) -> bool {
        let Some(pickup) = self.spawned.remove(&id) else {
            return false;
        };
        log::debug!("powerup {} ({}) discarded", id.get(), pickup.config.id);
        true
    }

    /// Activates the effect described by `config`.
    ///
    /// An effect type that is already active only has its timer reset to the
    /// new duration; [`Event::PowerupEffectApplied`] is published solely on
    /// activation.
    pub fn apply_effect(&mut self, config: &Arc<PowerupConfig>, out: &mut Vec<Event>) {
        let duration_ms = config.duration_ms as f64;
        if let Some(active) = self.active.get_mut(&config.effect) {
            log::debug!("refreshed {} effect for {duration_ms} ms", config.effect);
            active.remaining_ms = duration_ms;
            return;
        }

        log::debug!("applied {} effect for {duration_ms} ms", config.effect);
        let _ = self.active.insert(
            config.effect.clone(),
            ActiveEffect {
                config: Arc::clone(config),
                remaining_ms: duration_ms,
            },
        );
        out.push(Event::PowerupEffectApplied(PowerupEffect::from_config(
            config,
        )));
    }

    /// Counts down active effects, removing the ones that ran out.
    ///
    /// Each expiry publishes [`Event::PowerupEffectRemoved`] followed by
    /// [`Event::PowerupExpired`].
    pub fn update(&mut self, dt: Duration, out: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);
        let delta_ms = millis(dt);

        let mut expired = Vec::new();
        for (effect, active) in &mut self.active {
            active.remaining_ms -= delta_ms;
            if active.remaining_ms <= 0.0 {
                expired.push(effect.clone());
            }
        }

        for effect in expired {
            let Some(active) = self.active.remove(&effect) else {
                continue;
            };
            log::debug!("{effect} effect expired");
            out.push(Event::PowerupEffectRemoved(PowerupEffect::from_config(
                &active.config,
            )));
            out.push(Event::PowerupExpired {
                config_id: active.config.id.clone(),
            });
        }
    }

    /// Pickup waiting to be collected.
    #[must_use]
    pub fn spawned(&self, id: PowerupInstanceId) -> Option<&SpawnedPowerup> {
        self.spawned.get(&id)
    }

    /// Number of pickups waiting to be collected.
    #[must_use]
    pub fn spawned_count(&self) -> usize {
        self.spawned.len()
    }

    /// Identifiers of pickups waiting to be collected, in drop order.
    #[must_use]
    pub fn spawned_ids(&self) -> Vec<PowerupInstanceId> {
        let mut ids: Vec<_> = self.spawned.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Reports whether an effect of type `effect` is running.
    #[must_use]
    pub fn is_effect_active(&self, effect: &str) -> bool {
        self.active.contains_key(effect)
    }

    /// Time left on the running effect of type `effect`.
    #[must_use]
    pub fn effect_remaining(&self, effect: &str) -> Option<Duration> {
        self.active.get(effect).map(|active| {
            Duration::try_from_secs_f64(active.remaining_ms.max(0.0) / 1_000.0)
                .unwrap_or(Duration::ZERO)
        })
    }

    /// Strength of the running effect of type `effect`, if it scales a stat.
    #[must_use]
    pub fn effect_multiplier(&self, effect: &str) -> Option<f32> {
        self.active
            .get(effect)
            .and_then(|active| active.config.multiplier)
    }

    /// Running effects ordered by effect type.
    pub fn active_effects(&self) -> impl Iterator<Item = (&str, &ActiveEffect)> {
        self.active
            .iter()
            .map(|(effect, active)| (effect.as_str(), active))
    }
}
