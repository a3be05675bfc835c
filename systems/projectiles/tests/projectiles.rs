use std::time::Duration;

use arcade_core::{
    EnemyInstanceId, EnemyShootConfig, Event, Owner, ProjectileId, ProjectileShape,
    ProjectileSpawn, ProjectileVisual, WeaponConfig, WorldBounds,
};
use arcade_system_projectiles::{Config, ProjectileManager, SpawnError};
use glam::Vec2;

fn manager() -> ProjectileManager {
    ProjectileManager::new(Config::new(WorldBounds::new(800.0, 600.0)))
}

fn blaster() -> WeaponConfig {
    WeaponConfig {
        id: "blaster".to_owned(),
        projectile_type: "bullet".to_owned(),
        damage: 10,
        cooldown_ms: 200,
        projectile_speed: 500.0,
        explosion_radius: None,
        fuse_ms: None,
        visual: Some(ProjectileVisual {
            shape: ProjectileShape::Rectangle,
            width: 4.0,
            height: 12.0,
            color: 0x40e0ff,
        }),
    }
}

fn player_shot(position: Vec2, velocity: Vec2) -> ProjectileSpawn {
    ProjectileSpawn {
        kind: "bullet".to_owned(),
        position,
        velocity,
        owner: Owner::Player,
        damage: None,
        radius: None,
        time_to_explode_ms: None,
        weapon: Some(blaster()),
        enemy_shoot: None,
    }
}

fn bomb(position: Vec2, velocity: Vec2, fuse_ms: f32) -> ProjectileSpawn {
    ProjectileSpawn {
        kind: "bomb".to_owned(),
        damage: Some(40),
        radius: Some(90.0),
        time_to_explode_ms: Some(fuse_ms),
        ..player_shot(position, velocity)
    }
}

fn spawn(manager: &mut ProjectileManager, request: ProjectileSpawn) -> ProjectileId {
    let mut out = Vec::new();
    manager
        .handle_spawn_projectile(&request, &mut out)
        .expect("valid spawn request")
}

fn count_destroyed(events: &[Event], target: ProjectileId) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileDestroyed { id } if *id == target))
        .count()
}

#[test]
fn projectile_leaving_the_top_edge_is_destroyed() {
    let mut manager = manager();
    let id = spawn(
        &mut manager,
        player_shot(Vec2::new(100.0, 10.0), Vec2::new(0.0, -200.0)),
    );

    let snapshot = manager.snapshot(id).expect("live projectile");
    assert_eq!(snapshot.position.y, 10.0);

    let mut events = Vec::new();
    manager.update(Duration::from_millis(100), &mut events);

    assert_eq!(events, vec![Event::ProjectileDestroyed { id }]);
    assert_eq!(manager.count(), 0);
    assert_eq!(manager.owner(id), None);
    assert_eq!(manager.damage(id), None);
    assert_eq!(manager.creation_time(id), None);
}

#[test]
fn projectile_inside_bounds_keeps_moving() {
    let mut manager = manager();
    let id = spawn(
        &mut manager,
        player_shot(Vec2::new(100.0, 300.0), Vec2::new(0.0, -200.0)),
    );

    let mut events = Vec::new();
    manager.update(Duration::from_millis(100), &mut events);

    assert!(events.is_empty());
    let y = manager.snapshot(id).expect("live projectile").position.y;
    assert!((y - 280.0).abs() < 1e-3, "unexpected y {y}");
}

#[test]
fn spawn_publishes_created_event_with_weapon_visual() {
    let mut manager = manager();
    let mut events = Vec::new();
    let id = manager
        .handle_spawn_projectile(
            &player_shot(Vec2::new(5.0, 5.0), Vec2::new(0.0, -500.0)),
            &mut events,
        )
        .expect("valid spawn");

    assert_eq!(id.to_string(), "proj_1");
    match &events[..] {
        [Event::ProjectileCreated {
            id: created,
            owner,
            damage,
            visual,
            ..
        }] => {
            assert_eq!(*created, id);
            assert_eq!(*owner, Owner::Player);
            assert_eq!(*damage, Some(10), "damage falls back to the weapon");
            assert_eq!(visual.color, 0x40e0ff);
        }
        other => panic!("unexpected events: {other:?}"),
    }
    assert_eq!(manager.owner(id), Some(Owner::Player));
    assert_eq!(manager.creation_time(id), Some(Duration::ZERO));
}

#[test]
fn missing_visual_hints_fall_back_to_default() {
    let mut manager = manager();
    let mut request = player_shot(Vec2::new(5.0, 5.0), Vec2::ZERO);
    if let Some(weapon) = request.weapon.as_mut() {
        weapon.visual = None;
    }

    let mut events = Vec::new();
    let _ = manager
        .handle_spawn_projectile(&request, &mut events)
        .expect("valid spawn");

    match &events[..] {
        [Event::ProjectileCreated { visual, .. }] => {
            assert_eq!(*visual, ProjectileVisual::DEFAULT);
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn enemy_projectile_uses_shoot_config() {
    let mut manager = manager();
    let request = ProjectileSpawn {
        kind: "enemy_bolt".to_owned(),
        position: Vec2::new(200.0, 100.0),
        velocity: Vec2::new(0.0, 220.0),
        owner: Owner::Enemy,
        damage: None,
        radius: None,
        time_to_explode_ms: None,
        weapon: None,
        enemy_shoot: Some(EnemyShootConfig {
            projectile_type: "enemy_bolt".to_owned(),
            cooldown_ms: 1_500,
            damage: 8,
            speed: 220.0,
            range: 450.0,
            visual: None,
        }),
    };

    let id = spawn(&mut manager, request);

    assert_eq!(manager.owner(id), Some(Owner::Enemy));
    assert_eq!(manager.damage(id), Some(8));
}

#[test]
fn spawn_without_owner_config_creates_nothing() {
    let mut manager = manager();
    let mut events = Vec::new();

    let mut player = player_shot(Vec2::ZERO, Vec2::ZERO);
    player.weapon = None;
    assert_eq!(
        manager.handle_spawn_projectile(&player, &mut events),
        Err(SpawnError::MissingWeaponConfig {
            kind: "bullet".to_owned()
        })
    );

    let mut enemy = player_shot(Vec2::ZERO, Vec2::ZERO);
    enemy.owner = Owner::Enemy;
    assert!(matches!(
        manager.handle_spawn_projectile(&enemy, &mut events),
        Err(SpawnError::MissingEnemyShootConfig { .. })
    ));

    manager.handle(&Event::SpawnProjectile(player), &mut events);

    assert!(events.is_empty());
    assert_eq!(manager.count(), 0);

    let id = spawn(&mut manager, player_shot(Vec2::ZERO, Vec2::ZERO));
    assert_eq!(id, ProjectileId::new(1), "rejected spawns consume no ids");
}

#[test]
fn hit_removes_projectile_once() {
    let mut manager = manager();
    let id = spawn(
        &mut manager,
        player_shot(Vec2::new(100.0, 100.0), Vec2::ZERO),
    );
    let hit = Event::ProjectileHitEnemy {
        projectile: id,
        enemy: EnemyInstanceId::new(3),
    };

    let mut events = Vec::new();
    manager.handle(&hit, &mut events);
    manager.handle(&hit, &mut events);

    assert_eq!(count_destroyed(&events, id), 1);
    assert_eq!(manager.damage(id), None);
    assert_eq!(manager.owner(id), None);
    assert!(!manager.handle_projectile_hit_enemy(id, &mut events));
}

#[test]
fn explosive_detonates_exactly_once() {
    let mut manager = manager();
    let id = spawn(
        &mut manager,
        bomb(Vec2::new(400.0, 300.0), Vec2::new(0.0, -10.0), 250.0),
    );

    let mut events = Vec::new();
    for _ in 0..10 {
        manager.update(Duration::from_millis(100), &mut events);
    }

    let explosions: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, Event::ProjectileExplode { .. }))
        .collect();
    assert_eq!(explosions.len(), 1);
    match explosions[0] {
        Event::ProjectileExplode {
            id: exploded,
            radius,
            damage,
            owner,
            kind,
            position,
        } => {
            assert_eq!(*exploded, id);
            assert_eq!(*radius, 90.0);
            assert_eq!(*damage, 40);
            assert_eq!(*owner, Owner::Player);
            assert_eq!(kind, "bomb");
            assert!((position.y - 298.0).abs() < 1e-3, "moved for two ticks");
        }
        _ => unreachable!(),
    }
    assert_eq!(count_destroyed(&events, id), 1);

    let explode_index = events
        .iter()
        .position(|event| matches!(event, Event::ProjectileExplode { .. }))
        .expect("explosion");
    assert_eq!(
        events[explode_index + 1],
        Event::ProjectileDestroyed { id },
        "destroyed follows the explosion"
    );
}

#[test]
fn zero_fuse_detonates_on_first_update() {
    let mut manager = manager();
    let id = spawn(&mut manager, bomb(Vec2::new(10.0, 10.0), Vec2::ZERO, 0.0));

    let mut events = Vec::new();
    manager.update(Duration::ZERO, &mut events);

    assert!(matches!(
        events.first(),
        Some(Event::ProjectileExplode { id: exploded, .. }) if *exploded == id
    ));
    assert_eq!(manager.count(), 0);
}

#[test]
fn explosive_leaving_bounds_does_not_explode() {
    let mut manager = manager();
    let id = spawn(
        &mut manager,
        bomb(Vec2::new(400.0, 5.0), Vec2::new(0.0, -100.0), 5_000.0),
    );

    let mut events = Vec::new();
    manager.update(Duration::from_millis(100), &mut events);

    assert_eq!(events, vec![Event::ProjectileDestroyed { id }]);
}

#[test]
fn creation_time_tracks_simulated_clock() {
    let mut manager = manager();
    let mut events = Vec::new();
    manager.update(Duration::from_millis(250), &mut events);

    let id = spawn(&mut manager, player_shot(Vec2::new(1.0, 1.0), Vec2::ZERO));

    assert_eq!(
        manager.creation_time(id),
        Some(Duration::from_millis(250))
    );
}
