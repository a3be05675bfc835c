//! Scripted stand-in for the presentation layer.
//!
//! The session mirrors what a renderer would do: it tracks enemies from
//! their lifecycle events, moves them, aims the player's weapons, resolves
//! collisions and reports them back to the simulation as intent events.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt,
    rc::Rc,
    sync::Arc,
    time::Duration,
};

use arcade_core::{
    EnemyConfig, EnemyInstanceId, Event, EventKind, GameConfig, Owner, PowerupInstanceId,
    ProjectileId, ProjectileSpawn,
};
use arcade_event_bus::{listener, Listener};
use arcade_simulation::Simulation;
use arcade_system_movement::{self as movement, MovementContext};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const PRIMARY_WEAPON: &str = "blaster";
const SECONDARY_WEAPON: &str = "bomb_launcher";
const SHOTS_PER_BOMB: u32 = 10;
const PICKUP_FALL_TIME: Duration = Duration::from_millis(1_500);
const SHIP_MARGIN: f32 = 40.0;

const OBSERVED_EVENTS: [EventKind; 15] = [
    EventKind::SpawnProjectile,
    EventKind::ProjectileHitEnemy,
    EventKind::RequestSpawnPowerup,
    EventKind::PowerupCollected,
    EventKind::ProjectileCreated,
    EventKind::ProjectileDestroyed,
    EventKind::ProjectileExplode,
    EventKind::EnemySpawned,
    EventKind::EnemyHealthUpdated,
    EventKind::EnemyDestroyed,
    EventKind::WaveUpdated,
    EventKind::PowerupSpawned,
    EventKind::PowerupEffectApplied,
    EventKind::PowerupEffectRemoved,
    EventKind::PowerupExpired,
];

/// Knobs of the scripted session that are not part of the game configuration.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SessionOptions {
    /// Fixed simulation step.
    pub(crate) tick: Duration,
    /// Probability that a destroyed enemy drops a powerup.
    pub(crate) drop_chance: f64,
}

#[derive(Debug)]
struct TrackedEnemy {
    config: Arc<EnemyConfig>,
    position: Vec2,
    speed_multiplier: f32,
    age: Duration,
    reload: Duration,
}

impl TrackedEnemy {
    fn context(&self, target: Vec2) -> MovementContext {
        MovementContext {
            position: self.position,
            base_speed: self.config.base_speed,
            speed_multiplier: self.speed_multiplier,
            elapsed: self.age,
            target: Some(target),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Blast {
    id: ProjectileId,
    position: Vec2,
    radius: f32,
}

/// Headless game session driving a [`Simulation`].
pub(crate) struct Session {
    simulation: Simulation,
    config: GameConfig,
    options: SessionOptions,
    inbox: Rc<RefCell<Vec<Event>>>,
    observer: Listener,
    tally: BTreeMap<EventKind, u64>,
    enemies: BTreeMap<EnemyInstanceId, TrackedEnemy>,
    pickups: Vec<(PowerupInstanceId, Duration)>,
    blasts: Vec<Blast>,
    rng: ChaCha8Rng,
    elapsed: Duration,
    ticks: u64,
    reload: Duration,
    shots_fired: u32,
    score: u64,
    credits: u64,
}

impl Session {
    /// Creates a session and starts observing every simulation event.
    pub(crate) fn new(config: GameConfig, options: SessionOptions) -> Self {
        let simulation = Simulation::new(&config);
        let inbox = Rc::new(RefCell::new(Vec::new()));
        let observer = {
            let inbox = Rc::clone(&inbox);
            listener(move |_, event| {
                inbox.borrow_mut().push(event.clone());
                Ok(())
            })
        };
        for kind in OBSERVED_EVENTS {
            simulation.bus().on(kind, &observer);
        }

        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed ^ 0x00c0_ffee),
            simulation,
            config,
            options,
            inbox,
            observer,
            tally: BTreeMap::new(),
            enemies: BTreeMap::new(),
            pickups: Vec::new(),
            blasts: Vec::new(),
            elapsed: Duration::ZERO,
            ticks: 0,
            reload: Duration::ZERO,
            shots_fired: 0,
            score: 0,
            credits: 0,
        }
    }

    /// Starts the first wave.
    pub(crate) fn start(&mut self) {
        self.simulation.start();
        self.pump();
    }

    /// Plays one fixed step of the scripted session.
    pub(crate) fn tick(&mut self) {
        let dt = self.options.tick;
        self.ticks += 1;
        self.elapsed = self.elapsed.saturating_add(dt);

        self.move_enemies(dt);
        self.fire_player_weapons(dt);
        self.fire_enemy_weapons(dt);
        self.pump();

        self.simulation.update(dt);
        self.pump();

        self.resolve_collisions();
        self.resolve_blasts();
        self.collect_pickups();
        self.pump();
    }

    fn ship_position(&self) -> Vec2 {
        let world = &self.config.world;
        Vec2::new(
            world.origin.x + world.width / 2.0,
            world.origin.y + world.height - SHIP_MARGIN,
        )
    }

    fn move_enemies(&mut self, dt: Duration) {
        let ship = self.ship_position();
        let world = self.config.world;
        for enemy in self.enemies.values_mut() {
            let context = enemy.context(ship);
            let mut next = movement::step(enemy.config.movement_pattern, &context, dt);
            if next.y > world.origin.y + world.height {
                next.y = world.origin.y;
            }
            next.x = next.x.clamp(world.origin.x, world.origin.x + world.width);
            enemy.position = next;
            enemy.age = enemy.age.saturating_add(dt);
        }
    }

    fn fire_player_weapons(&mut self, dt: Duration) {
        self.reload = self.reload.saturating_sub(dt);
        if !self.reload.is_zero() {
            return;
        }
        let ship = self.ship_position();
        let Some(target) = self.nearest_enemy(ship) else {
            return;
        };

        let bomb_turn = self.shots_fired % SHOTS_PER_BOMB == SHOTS_PER_BOMB - 1;
        let weapon = bomb_turn
            .then(|| self.config.weapon(SECONDARY_WEAPON))
            .flatten()
            .or_else(|| self.config.weapon(PRIMARY_WEAPON))
            .cloned();
        let Some(weapon) = weapon else {
            return;
        };

        let (fire_rate, damage_boost) = {
            let powerups = self.simulation.powerups();
            (
                powerups.effect_multiplier("fire_rate").unwrap_or(1.0),
                powerups.effect_multiplier("damage").unwrap_or(1.0),
            )
        };

        let aim = lead(ship, target, weapon.projectile_speed);
        let damage = (weapon.damage as f32 * damage_boost).round() as u32;
        self.reload = Duration::from_millis(weapon.cooldown_ms).div_f32(fire_rate.max(0.1));
        self.shots_fired += 1;

        self.simulation.emit(&Event::SpawnProjectile(ProjectileSpawn {
            kind: weapon.projectile_type.clone(),
            position: ship,
            velocity: heading(ship, aim, Vec2::NEG_Y) * weapon.projectile_speed,
            owner: Owner::Player,
            damage: Some(damage),
            radius: weapon.explosion_radius,
            time_to_explode_ms: weapon.fuse_ms,
            weapon: Some(weapon),
            enemy_shoot: None,
        }));
    }

    fn fire_enemy_weapons(&mut self, dt: Duration) {
        let ship = self.ship_position();
        let mut shots = Vec::new();
        for enemy in self.enemies.values_mut() {
            enemy.reload = enemy.reload.saturating_sub(dt);
            let Some(shoot) = enemy.config.shoot_config.as_ref() else {
                continue;
            };
            if !enemy.config.can_shoot
                || !enemy.reload.is_zero()
                || enemy.position.distance(ship) > shoot.range
            {
                continue;
            }
            enemy.reload = Duration::from_millis(shoot.cooldown_ms);
            shots.push(Event::SpawnProjectile(ProjectileSpawn {
                kind: shoot.projectile_type.clone(),
                position: enemy.position,
                velocity: heading(enemy.position, ship, Vec2::Y) * shoot.speed,
                owner: Owner::Enemy,
                damage: None,
                radius: None,
                time_to_explode_ms: None,
                weapon: None,
                enemy_shoot: Some(shoot.clone()),
            }));
        }
        for shot in &shots {
            self.simulation.emit(shot);
        }
    }

    fn nearest_enemy(&self, from: Vec2) -> Option<&TrackedEnemy> {
        self.enemies.values().min_by(|a, b| {
            a.position
                .distance_squared(from)
                .total_cmp(&b.position.distance_squared(from))
        })
    }

    fn resolve_collisions(&mut self) {
        let hits: Vec<_> = {
            let projectiles = self.simulation.projectiles();
            projectiles
                .state()
                .iter()
                .filter(|projectile| {
                    projectile.owner == Owner::Player && projectile.time_to_explode_ms.is_none()
                })
                .filter_map(|projectile| {
                    self.enemies
                        .iter()
                        .find(|(_, enemy)| {
                            enemy.position.distance(projectile.position)
                                <= enemy.config.collision_radius
                        })
                        .map(|(enemy, _)| (projectile.id, *enemy))
                })
                .collect()
        };

        log::trace!("{} projectile hits this tick", hits.len());
        for (projectile, enemy) in hits {
            self.simulation
                .emit(&Event::ProjectileHitEnemy { projectile, enemy });
        }
    }

    fn resolve_blasts(&mut self) {
        for blast in std::mem::take(&mut self.blasts) {
            let caught: Vec<_> = self
                .enemies
                .iter()
                .filter(|(_, enemy)| enemy.position.distance(blast.position) <= blast.radius)
                .map(|(id, _)| *id)
                .collect();
            log::debug!("{} caught {} enemies", blast.id, caught.len());
            for enemy in caught {
                self.simulation.emit(&Event::ProjectileHitEnemy {
                    projectile: blast.id,
                    enemy,
                });
            }
        }
    }

    fn collect_pickups(&mut self) {
        let now = self.elapsed;
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pickups.drain(..).partition(|(_, ready_at)| *ready_at <= now);
        self.pickups = waiting;
        for (instance, _) in due {
            self.simulation.emit(&Event::PowerupCollected { instance });
        }
    }

    /// Drains observed events until the simulation goes quiet.
    fn pump(&mut self) {
        loop {
            let events = std::mem::take(&mut *self.inbox.borrow_mut());
            if events.is_empty() {
                return;
            }
            let mut intents = Vec::new();
            for event in &events {
                self.observe(event, &mut intents);
            }
            for intent in &intents {
                self.simulation.emit(intent);
            }
        }
    }

    fn observe(&mut self, event: &Event, intents: &mut Vec<Event>) {
        *self.tally.entry(event.kind()).or_default() += 1;
        match event {
            Event::EnemySpawned {
                instance,
                config,
                position,
                speed_multiplier,
                ..
            } => {
                let _ = self.enemies.insert(
                    *instance,
                    TrackedEnemy {
                        config: Arc::clone(config),
                        position: *position,
                        speed_multiplier: *speed_multiplier,
                        age: Duration::ZERO,
                        reload: Duration::ZERO,
                    },
                );
            }
            Event::EnemyDestroyed {
                instance,
                config_id,
                reward,
                score_value,
                ..
            } => {
                self.score += u64::from(*score_value);
                self.credits += u64::from(*reward);
                let Some(enemy) = self.enemies.remove(instance) else {
                    return;
                };
                if self.rng.gen_bool(self.options.drop_chance) {
                    intents.push(Event::RequestSpawnPowerup {
                        position: enemy.position,
                        enemy_id: config_id.clone(),
                    });
                }
            }
            Event::ProjectileExplode {
                id,
                position,
                radius,
                owner: Owner::Player,
                ..
            } => self.blasts.push(Blast {
                id: *id,
                position: *position,
                radius: *radius,
            }),
            Event::PowerupSpawned { instance, .. } => {
                self.pickups
                    .push((*instance, self.elapsed.saturating_add(PICKUP_FALL_TIME)));
            }
            Event::PowerupEffectApplied(effect) => {
                log::info!("{} active for {} ms", effect.effect, effect.duration_ms);
            }
            Event::WaveUpdated { wave } => {
                log::info!("wave {wave} at {:.1}s", self.elapsed.as_secs_f32());
            }
            _ => {}
        }
    }

    /// Snapshot of the session for printing.
    pub(crate) fn summary(&self) -> Summary {
        let powerups = self.simulation.powerups();
        Summary {
            ticks: self.ticks,
            elapsed: self.elapsed,
            wave: self.simulation.enemies().waves().current_wave(),
            enemies_alive: self.enemies.len(),
            score: self.score,
            credits: self.credits,
            active_effects: powerups
                .active_effects()
                .map(|(effect, _)| effect.to_owned())
                .collect(),
            tally: self.tally.clone(),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        for kind in OBSERVED_EVENTS {
            let _ = self.simulation.bus().off(kind, &self.observer);
        }
    }
}

fn heading(from: Vec2, to: Vec2, fallback: Vec2) -> Vec2 {
    let direction = (to - from).normalize_or_zero();
    if direction == Vec2::ZERO {
        fallback
    } else {
        direction
    }
}

/// Aim point that intercepts a target moving along its current pattern.
fn lead(from: Vec2, target: &TrackedEnemy, projectile_speed: f32) -> Vec2 {
    if projectile_speed <= 0.0 {
        return target.position;
    }
    let context = target.context(from);
    let velocity = movement::steer(target.config.movement_pattern, &context);
    let mut aim = target.position;
    for _ in 0..3 {
        let flight = aim.distance(from) / projectile_speed;
        aim = target.position + velocity * flight;
    }
    aim
}

/// Outcome of a session.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Summary {
    pub(crate) ticks: u64,
    pub(crate) elapsed: Duration,
    pub(crate) wave: u32,
    pub(crate) enemies_alive: usize,
    pub(crate) score: u64,
    pub(crate) credits: u64,
    pub(crate) active_effects: Vec<String>,
    pub(crate) tally: BTreeMap<EventKind, u64>,
}

#[cfg(test)]
impl Summary {
    fn count(&self, kind: EventKind) -> u64 {
        self.tally.get(&kind).copied().unwrap_or(0)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ticks ({:.1}s simulated), reached wave {}",
            self.ticks,
            self.elapsed.as_secs_f64(),
            self.wave
        )?;
        writeln!(
            f,
            "score {} | credits {} | enemies alive {}",
            self.score, self.credits, self.enemies_alive
        )?;
        if !self.active_effects.is_empty() {
            writeln!(f, "active effects: {}", self.active_effects.join(", "))?;
        }
        for (kind, count) in &self.tally {
            writeln!(f, "{:<24} {count:>8}", kind.name())?;
        }
        Ok(())
    }
}
