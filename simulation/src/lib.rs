#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Composition root that wires the simulation managers to the event bus.
//!
//! Managers stay pure: they push produced events into a buffer. The bindings
//! created here borrow a manager, let it handle one event, release the
//! borrow, and only then publish the buffered events. Listeners reacting to
//! those events can therefore publish back into any manager, including the
//! one that produced them.
//!
//! Lifecycle: [`Simulation::new`] constructs and subscribes,
//! [`Simulation::start`] and [`Simulation::update`] run, and
//! [`Simulation::shutdown`] (or dropping the value) unsubscribes.

use std::{
    cell::{Ref, RefCell},
    rc::Rc,
    time::Duration,
};

use arcade_core::{Event, EventKind, GameConfig, PowerupInstanceId};
use arcade_event_bus::{listener, EventBus, Listener, ListenerError};
use arcade_system_enemies::{self as enemies, EnemyManager};
use arcade_system_powerups::{self as powerups, PowerupManager};
use arcade_system_projectiles::{self as projectiles, ProjectileManager};

const ENEMY_EVENTS: &[EventKind] = &[EventKind::ProjectileHitEnemy];
const PROJECTILE_EVENTS: &[EventKind] =
    &[EventKind::SpawnProjectile, EventKind::ProjectileHitEnemy];
const POWERUP_EVENTS: &[EventKind] = &[
    EventKind::RequestSpawnPowerup,
    EventKind::PowerupCollected,
];

/// Owns the bus and every manager for one game session.
pub struct Simulation {
    bus: Rc<EventBus>,
    enemies: Rc<RefCell<EnemyManager>>,
    projectiles: Rc<RefCell<ProjectileManager>>,
    powerups: Rc<RefCell<PowerupManager>>,
    subscriptions: Vec<(EventKind, Listener)>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("bus", &self.bus)
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Constructs the managers on a fresh bus and subscribes them.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self::with_bus(config, Rc::new(EventBus::new()))
    }

    /// Constructs the managers and subscribes them to an existing bus.
    #[must_use]
    pub fn with_bus(config: &GameConfig, bus: Rc<EventBus>) -> Self {
        let enemies = Rc::new(RefCell::new(EnemyManager::new(enemies::Config::new(
            config.enemies.clone(),
            config.difficulty.clone(),
            config.waves,
            config.seed,
        ))));
        let projectiles = Rc::new(RefCell::new(ProjectileManager::new(
            projectiles::Config::new(config.world),
        )));
        let powerups = Rc::new(RefCell::new(PowerupManager::new(powerups::Config::new(
            config.powerups.clone(),
            config.seed.rotate_left(17),
        ))));

        let mut simulation = Self {
            bus,
            enemies,
            projectiles,
            powerups,
            subscriptions: Vec::new(),
        };

        let enemy_listener = bind(&simulation.enemies, "enemy manager", EnemyManager::handle);
        let projectile_listener = bind(
            &simulation.projectiles,
            "projectile manager",
            ProjectileManager::handle,
        );
        let powerup_listener = bind(
            &simulation.powerups,
            "powerup manager",
            PowerupManager::handle,
        );
        simulation.subscribe(ENEMY_EVENTS, &enemy_listener);
        simulation.subscribe(PROJECTILE_EVENTS, &projectile_listener);
        simulation.subscribe(POWERUP_EVENTS, &powerup_listener);
        simulation
    }

    fn subscribe(&mut self, kinds: &[EventKind], listener: &Listener) {
        for kind in kinds {
            self.bus.on(*kind, listener);
            self.subscriptions.push((*kind, Rc::clone(listener)));
        }
    }

    /// Starts the first wave.
    pub fn start(&mut self) {
        log::info!("starting simulation");
        self.advance_wave();
    }

    /// Starts the next wave immediately, cancelling any scheduled advancement.
    pub fn advance_wave(&mut self) {
        let mut out = Vec::new();
        self.enemies.borrow_mut().advance_wave(&mut out);
        self.bus.emit_all(out);
    }

    /// Advances every manager by `dt`: enemies, then projectiles, then powerups.
    ///
    /// Each manager's events are published before the next manager updates.
    pub fn update(&mut self, dt: Duration) {
        let mut out = Vec::new();
        self.enemies.borrow_mut().update(dt, &mut out);
        self.bus.emit_all(out.drain(..));

        self.projectiles.borrow_mut().update(dt, &mut out);
        self.bus.emit_all(out.drain(..));

        self.powerups.borrow_mut().update(dt, &mut out);
        self.bus.emit_all(out);
    }

    /// Publishes an intent event on the bus.
    pub fn emit(&self, event: &Event) {
        self.bus.emit(event);
    }

    /// Removes an uncollected pickup, for example one that fell off screen.
    ///
    /// Returns `false` for unknown or already-removed pickups.
    pub fn discard_powerup(&mut self, id: PowerupInstanceId) -> bool {
        self.powerups.borrow_mut().discard(id)
    }

    /// Unsubscribes every manager from the bus. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        log::info!(
            "shutting down simulation at wave {}",
            self.enemies.borrow().waves().current_wave()
        );
        for (kind, listener) in self.subscriptions.drain(..) {
            let _ = self.bus.off(kind, &listener);
        }
    }

    /// Reports whether the managers are still subscribed.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Bus shared with the presentation layer.
    #[must_use]
    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    /// Read access to the enemy manager.
    #[must_use]
    pub fn enemies(&self) -> Ref<'_, EnemyManager> {
        self.enemies.borrow()
    }

    /// Read access to the projectile manager.
    #[must_use]
    pub fn projectiles(&self) -> Ref<'_, ProjectileManager> {
        self.projectiles.borrow()
    }

    /// Read access to the powerup manager.
    #[must_use]
    pub fn powerups(&self) -> Ref<'_, PowerupManager> {
        self.powerups.borrow()
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Wraps a manager in a listener that handles one event and then publishes
/// the manager's output.
///
/// The borrow is released before publishing. A manager that is already
/// borrowed, such as while a caller holds one of the read accessors, is
/// reported as [`ListenerError::Busy`] and skips the event.
fn bind<M, F>(manager: &Rc<RefCell<M>>, name: &'static str, handle: F) -> Listener
where
    M: 'static,
    F: Fn(&mut M, &Event, &mut Vec<Event>) + 'static,
{
    let manager = Rc::clone(manager);
    listener(move |bus, event| {
        let mut out = Vec::new();
        {
            let mut manager = manager
                .try_borrow_mut()
                .map_err(|_| ListenerError::Busy(name))?;
            handle(&mut manager, event, &mut out);
        }
        bus.emit_all(out);
        Ok(())
    })
}
