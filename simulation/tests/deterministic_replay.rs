use std::{cell::RefCell, rc::Rc, time::Duration};

use arcade_core::{Event, EventKind, GameConfig, ProjectileId};
use arcade_event_bus::listener;
use arcade_simulation::Simulation;
use glam::Vec2;

const TICK: Duration = Duration::from_millis(16);

#[test]
fn deterministic_replay_produces_identical_event_log() {
    let first = replay(GameConfig::default());
    let second = replay(GameConfig::default());

    assert_eq!(first.len(), second.len());
    assert_eq!(first, second, "replay diverged between runs");
    assert!(first.contains(&Event::WaveUpdated { wave: 3 }));
}

#[test]
fn different_seeds_change_the_wave_composition() {
    let seeded = |seed| {
        let config = GameConfig {
            seed,
            ..GameConfig::default()
        };
        spawned_types(&replay(config))
    };

    assert_ne!(seeded(1), seeded(2));
}

fn replay(config: GameConfig) -> Vec<Event> {
    let mut simulation = Simulation::new(&config);
    let log = Rc::new(RefCell::new(Vec::new()));
    let recorder = {
        let log = Rc::clone(&log);
        listener(move |bus, event| {
            log.borrow_mut().push(event.clone());
            if let Event::EnemyDestroyed { config_id, .. } = event {
                bus.emit(&Event::RequestSpawnPowerup {
                    position: Vec2::new(400.0, 300.0),
                    enemy_id: config_id.clone(),
                });
            }
            Ok(())
        })
    };
    for kind in [
        EventKind::WaveUpdated,
        EventKind::EnemySpawned,
        EventKind::EnemyHealthUpdated,
        EventKind::EnemyDestroyed,
        EventKind::PowerupSpawned,
    ] {
        simulation.bus().on(kind, &recorder);
    }

    simulation.start();
    for round in 0..2_u64 {
        let ids = simulation.enemies().enemy_ids();
        for (index, enemy) in ids.into_iter().enumerate() {
            let projectile = ProjectileId::new(round * 1_000 + index as u64);
            for _ in 0..4 {
                simulation.emit(&Event::ProjectileHitEnemy { projectile, enemy });
            }
        }
        for _ in 0..200 {
            simulation.update(TICK);
        }
    }

    let events = log.borrow().clone();
    events
}

fn spawned_types(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::EnemySpawned { config, .. } => Some(config.id.clone()),
            _ => None,
        })
        .collect()
}
