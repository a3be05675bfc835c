//! Wave progression: counter, unlock schedule, difficulty scaling, spawn
//! patterns and wave-clear detection.
//!
//! The handler never spawns enemies itself. Advancing a wave produces
//! [`SpawnOrder`] values that the owning manager executes, tracking each
//! spawned enemy back into the handler.

use std::{collections::HashSet, time::Duration};

use arcade_core::{
    DifficultyConfig, EnemyInstanceId, EnemyUnlock, Event, TimerHandle, TimerQueue, WaveLayout,
};
use glam::Vec2;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Request to spawn one enemy as part of a wave.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnOrder {
    /// Enemy type to spawn.
    pub config_id: String,
    /// Spawn position in world units.
    pub position: Vec2,
}

/// Observable state of the wave machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WavePhase {
    /// No wave is running and no advancement is scheduled.
    Idle,
    /// Enemies of the current wave are still alive.
    Active,
    /// The wave was cleared and the next one is scheduled.
    ClearPending,
}

/// Owns the wave counter and decides what each wave spawns.
#[derive(Debug)]
pub struct WaveHandler {
    difficulty: DifficultyConfig,
    layout: WaveLayout,
    unlocks: Vec<EnemyUnlock>,
    current_wave: Option<u32>,
    available: Vec<String>,
    members: HashSet<EnemyInstanceId>,
    active: bool,
    timers: TimerQueue<()>,
    pending_advance: Option<TimerHandle>,
    rng: ChaCha8Rng,
}

impl WaveHandler {
    /// Creates a handler positioned just before the initial wave.
    #[must_use]
    pub fn new(difficulty: DifficultyConfig, layout: WaveLayout, seed: u64) -> Self {
        let mut unlocks = difficulty.enemy_unlock_thresholds.clone();
        unlocks.sort_by_key(|unlock| unlock.wave);

        Self {
            current_wave: None,
            difficulty,
            layout,
            unlocks,
            available: Vec::new(),
            members: HashSet::new(),
            active: false,
            timers: TimerQueue::new(),
            pending_advance: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Number of the current wave.
    ///
    /// Before the first wave this reports the wave preceding the initial one,
    /// or zero when the initial wave is zero; see [`Self::has_started`].
    #[must_use]
    pub fn current_wave(&self) -> u32 {
        self.current_wave
            .unwrap_or_else(|| self.difficulty.initial_wave_number.saturating_sub(1))
    }

    /// Reports whether any wave has been started.
    #[must_use]
    pub const fn has_started(&self) -> bool {
        self.current_wave.is_some()
    }

    /// Enemy types unlocked so far, in unlock order.
    #[must_use]
    pub fn available_enemy_types(&self) -> &[String] {
        &self.available
    }

    /// Reports whether enemies of the current wave are still being tracked.
    #[must_use]
    pub const fn is_wave_active(&self) -> bool {
        self.active
    }

    /// Number of tracked enemies still alive in the current wave.
    #[must_use]
    pub fn enemies_remaining(&self) -> usize {
        self.members.len()
    }

    /// Current state of the wave machine.
    #[must_use]
    pub fn phase(&self) -> WavePhase {
        if self.active {
            WavePhase::Active
        } else if self.pending_advance.is_some() {
            WavePhase::ClearPending
        } else {
            WavePhase::Idle
        }
    }

    /// Time left before the scheduled advancement fires.
    #[must_use]
    pub fn pending_advance_in(&self) -> Option<Duration> {
        self.pending_advance
            .and_then(|handle| self.timers.remaining(handle))
    }

    /// Reports whether the current wave spawns the boss.
    #[must_use]
    pub fn is_boss_wave(&self) -> bool {
        let frequency = self.difficulty.boss_wave_frequency;
        match self.current_wave {
            Some(wave) => frequency != 0 && wave % frequency == 0,
            None => false,
        }
    }

    /// Number of waves past the initial wave, never negative.
    #[must_use]
    pub fn scaling_exponent(&self) -> u32 {
        self.current_wave
            .map_or(0, |wave| wave.saturating_sub(self.difficulty.initial_wave_number))
    }

    /// Health of an enemy with `base` health in the current wave.
    #[must_use]
    pub fn scaled_health(&self, base: u32) -> i32 {
        let scaled = self.scale(f64::from(base), self.difficulty.enemy_health_multiplier_per_wave);
        scaled.round().min(f64::from(i32::MAX)) as i32
    }

    /// Multiplier applied to every enemy's base speed in the current wave.
    #[must_use]
    pub fn speed_multiplier(&self) -> f32 {
        self.scale(1.0, self.difficulty.enemy_speed_multiplier_per_wave) as f32
    }

    /// Reward granted for an enemy with `base` reward in the current wave.
    #[must_use]
    pub fn scaled_reward(&self, base: u32) -> u32 {
        let scaled = self.scale(f64::from(base), self.difficulty.enemy_reward_multiplier_per_wave);
        scaled.round().min(f64::from(u32::MAX)) as u32
    }

    /// Enemy count implied by the difficulty curve for the current wave.
    ///
    /// Grid waves always spawn `columns * rows` enemies regardless of this value.
    #[must_use]
    pub fn scaled_enemy_count(&self) -> u32 {
        let scaled = self.scale(
            f64::from(self.difficulty.base_enemy_count),
            self.difficulty.enemy_count_multiplier_per_wave,
        );
        scaled.round().min(f64::from(u32::MAX)) as u32
    }

    fn scale(&self, base: f64, multiplier_per_wave: f32) -> f64 {
        let exponent = i32::try_from(self.scaling_exponent()).unwrap_or(i32::MAX);
        base * f64::from(multiplier_per_wave).powi(exponent)
    }

    /// Starts the next wave.
    ///
    /// Cancels any scheduled advancement, unlocks newly reached enemy types,
    /// publishes [`Event::WaveUpdated`] and appends the wave's spawns to `orders`.
    pub fn advance_wave(&mut self, out: &mut Vec<Event>, orders: &mut Vec<SpawnOrder>) {
        if let Some(handle) = self.pending_advance.take() {
            let _ = self.timers.cancel(handle);
        }

        let wave = match self.current_wave {
            Some(wave) => wave.saturating_add(1),
            None => self.difficulty.initial_wave_number,
        };
        self.current_wave = Some(wave);
        self.unlock_enemy_types(wave);
        log::info!(
            "wave {wave} started ({} enemy types available)",
            self.available.len()
        );
        out.push(Event::WaveUpdated { wave });

        self.members.clear();
        self.active = true;
        self.spawn_wave(orders);
    }

    fn unlock_enemy_types(&mut self, wave: u32) {
        for unlock in &self.unlocks {
            if unlock.wave > wave {
                break;
            }
            if !self.available.contains(&unlock.enemy_id) {
                self.available.push(unlock.enemy_id.clone());
            }
        }
    }

    fn spawn_wave(&mut self, orders: &mut Vec<SpawnOrder>) {
        if self.is_boss_wave() {
            orders.push(SpawnOrder {
                config_id: self.difficulty.boss_id.clone(),
                position: self.layout.boss_position,
            });
            return;
        }

        if self.available.is_empty() {
            log::warn!("wave {} has no unlocked enemy types", self.current_wave());
            return;
        }

        for row in 0..self.layout.rows {
            for column in 0..self.layout.columns {
                let Some(config_id) = self.available.choose(&mut self.rng) else {
                    continue;
                };
                let offset = Vec2::new(column as f32, row as f32) * self.layout.spacing;
                orders.push(SpawnOrder {
                    config_id: config_id.clone(),
                    position: self.layout.origin + offset,
                });
            }
        }
    }

    /// Closes the spawning step of a wave.
    ///
    /// A wave that ended up tracking no enemies counts as cleared so the game
    /// never stalls on an empty wave.
    pub fn finish_spawning(&mut self) {
        if self.active && self.members.is_empty() {
            log::warn!(
                "wave {} spawned no enemies; treating it as cleared",
                self.current_wave()
            );
            self.schedule_advance();
        }
    }

    /// Records an enemy as part of the active wave; ignored between waves.
    pub fn track_enemy_in_wave(&mut self, id: EnemyInstanceId) {
        if self.active {
            let _ = self.members.insert(id);
        }
    }

    /// Forgets a destroyed enemy, scheduling the next wave once the last one is gone.
    pub fn handle_enemy_destroyed_in_wave(&mut self, id: EnemyInstanceId) {
        if !self.members.remove(&id) {
            return;
        }
        if self.active && self.members.is_empty() {
            log::info!("wave {} cleared", self.current_wave());
            self.schedule_advance();
        }
    }

    fn schedule_advance(&mut self) {
        self.active = false;
        let delay = Duration::try_from_secs_f32(self.difficulty.time_between_waves_sec)
            .unwrap_or(Duration::ZERO);
        if let Some(stale) = self.pending_advance.take() {
            let _ = self.timers.cancel(stale);
        }
        self.pending_advance = Some(self.timers.schedule(delay, ()));
    }

    /// Advances the wave-clear timer, starting the next wave when it fires.
    pub fn update(&mut self, dt: Duration, out: &mut Vec<Event>, orders: &mut Vec<SpawnOrder>) {
        let mut fired = Vec::new();
        self.timers.advance(dt, &mut fired);
        for (handle, ()) in fired {
            if self.pending_advance == Some(handle) {
                self.pending_advance = None;
                self.advance_wave(out, orders);
            }
        }
    }
}
