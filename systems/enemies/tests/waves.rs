use std::time::Duration;

use arcade_core::{DifficultyConfig, EnemyUnlock, Event, GameConfig, WaveLayout};
use arcade_system_enemies::{Config, EnemyManager, WaveHandler, WavePhase};
use glam::Vec2;

fn small_layout() -> WaveLayout {
    WaveLayout {
        columns: 2,
        rows: 1,
        origin: Vec2::new(100.0, 50.0),
        spacing: Vec2::new(40.0, 30.0),
        boss_position: Vec2::new(400.0, 100.0),
    }
}

fn manager_with(layout: WaveLayout, difficulty: DifficultyConfig) -> EnemyManager {
    let roster = GameConfig::default().enemies;
    EnemyManager::new(Config::new(roster, difficulty, layout, 0xfeed))
}

fn waves_started(events: &[Event]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::WaveUpdated { wave } => Some(*wave),
            _ => None,
        })
        .collect()
}

fn spawned(events: &[Event]) -> Vec<&Event> {
    events
        .iter()
        .filter(|event| matches!(event, Event::EnemySpawned { .. }))
        .collect()
}

fn clear_current_wave(manager: &mut EnemyManager, out: &mut Vec<Event>) {
    for id in manager.enemy_ids() {
        assert!(manager.destroy_enemy(id, out));
    }
}

#[test]
fn handler_starts_idle_before_initial_wave() {
    let handler = WaveHandler::new(DifficultyConfig::default(), WaveLayout::default(), 1);
    assert_eq!(handler.current_wave(), 0);
    assert_eq!(handler.phase(), WavePhase::Idle);
    assert!(handler.available_enemy_types().is_empty());
    assert_eq!(handler.pending_advance_in(), None);
}

#[test]
fn first_wave_spawns_full_grid_of_unlocked_types() {
    let mut manager = manager_with(WaveLayout::default(), DifficultyConfig::default());
    let mut events = Vec::new();

    manager.advance_wave(&mut events);

    assert_eq!(events.first(), Some(&Event::WaveUpdated { wave: 1 }));
    let spawns = spawned(&events);
    assert_eq!(spawns.len(), 24, "8 columns by 3 rows");
    assert_eq!(manager.waves().enemies_remaining(), 24);
    assert_eq!(manager.waves().phase(), WavePhase::Active);

    for event in &spawns {
        if let Event::EnemySpawned {
            config,
            position,
            speed_multiplier,
            ..
        } = event
        {
            assert!(
                config.id == "triangle_scout" || config.id == "circle_swarmer",
                "locked type {} spawned",
                config.id
            );
            assert!(position.x >= 120.0 && position.x <= 120.0 + 7.0 * 80.0);
            assert!(position.y >= 80.0 && position.y <= 80.0 + 2.0 * 60.0);
            assert_eq!(*speed_multiplier, 1.0, "no scaling at the initial wave");
        }
    }

    let grid_count = manager.waves().scaled_enemy_count();
    assert_eq!(grid_count, 10, "scaled count is computed but not used by the grid");
}

#[test]
fn unlocked_types_grow_monotonically() {
    let mut manager = manager_with(small_layout(), DifficultyConfig::default());
    let mut events = Vec::new();
    let mut previous: Vec<String> = Vec::new();

    for wave in 1..=8 {
        manager.advance_wave(&mut events);
        let available = manager.waves().available_enemy_types().to_vec();
        assert!(
            available.starts_with(&previous),
            "wave {wave} lost an unlocked type"
        );
        previous = available;
    }

    assert_eq!(
        previous,
        vec![
            "triangle_scout",
            "circle_swarmer",
            "square_tank",
            "diamond_shooter",
            "hexagon_healer",
        ]
    );
}

#[test]
fn boss_wave_spawns_single_boss_at_fixed_position() {
    let mut manager = manager_with(small_layout(), DifficultyConfig::default());
    let mut events = Vec::new();
    for _ in 0..4 {
        manager.advance_wave(&mut events);
    }

    let mut boss_events = Vec::new();
    manager.advance_wave(&mut boss_events);

    assert_eq!(manager.waves().current_wave(), 5);
    assert!(manager.waves().is_boss_wave());
    let spawns = spawned(&boss_events);
    assert_eq!(spawns.len(), 1);
    match spawns[0] {
        Event::EnemySpawned {
            config, position, ..
        } => {
            assert_eq!(config.id, "boss_mothership");
            assert_eq!(*position, Vec2::new(400.0, 100.0));
        }
        _ => unreachable!(),
    }
}

#[test]
fn clearing_wave_schedules_one_delayed_advance() {
    let mut manager = manager_with(small_layout(), DifficultyConfig::default());
    let mut events = Vec::new();
    manager.advance_wave(&mut events);

    clear_current_wave(&mut manager, &mut events);
    assert_eq!(manager.waves().phase(), WavePhase::ClearPending);
    assert_eq!(
        manager.waves().pending_advance_in(),
        Some(Duration::from_secs(3))
    );

    let mut tick = Vec::new();
    manager.update(Duration::from_millis(2_999), &mut tick);
    assert!(waves_started(&tick).is_empty(), "advanced before the delay");

    manager.update(Duration::from_millis(1), &mut tick);
    assert_eq!(waves_started(&tick), vec![2]);
    assert_eq!(manager.waves().phase(), WavePhase::Active);
    assert_eq!(spawned(&tick).len(), 2);

    let mut later = Vec::new();
    manager.update(Duration::from_secs(30), &mut later);
    assert!(waves_started(&later).is_empty());
}

#[test]
fn manual_advance_cancels_pending_advance() {
    let mut manager = manager_with(small_layout(), DifficultyConfig::default());
    let mut events = Vec::new();
    manager.advance_wave(&mut events);
    clear_current_wave(&mut manager, &mut events);
    assert_eq!(manager.waves().phase(), WavePhase::ClearPending);

    let mut after = Vec::new();
    manager.update(Duration::from_millis(1_000), &mut after);
    manager.advance_wave(&mut after);
    assert_eq!(manager.waves().pending_advance_in(), None);

    manager.update(Duration::from_secs(10), &mut after);

    assert_eq!(waves_started(&after), vec![2], "only the manual advance fired");
    assert_eq!(manager.waves().current_wave(), 2);
}

#[test]
fn stragglers_between_waves_are_not_tracked() {
    let mut manager = manager_with(small_layout(), DifficultyConfig::default());
    let mut events = Vec::new();
    manager.advance_wave(&mut events);
    clear_current_wave(&mut manager, &mut events);

    let straggler = manager
        .spawn_enemy("square_tank", Vec2::new(10.0, 10.0), &mut events)
        .expect("known type");
    assert_eq!(manager.waves().enemies_remaining(), 0);

    let before = manager.waves().pending_advance_in();
    assert!(manager.destroy_enemy(straggler, &mut events));
    assert_eq!(manager.waves().pending_advance_in(), before);
    assert_eq!(manager.waves().phase(), WavePhase::ClearPending);
}

#[test]
fn enemies_from_previous_wave_do_not_clear_the_next() {
    let mut manager = manager_with(small_layout(), DifficultyConfig::default());
    let mut events = Vec::new();
    manager.advance_wave(&mut events);
    let old_wave = manager.enemy_ids();

    manager.advance_wave(&mut events);
    for id in old_wave {
        assert!(manager.destroy_enemy(id, &mut events));
    }

    assert_eq!(manager.waves().phase(), WavePhase::Active);
    assert_eq!(manager.waves().enemies_remaining(), 2);
}

#[test]
fn empty_grid_wave_counts_as_cleared() {
    let layout = WaveLayout {
        columns: 0,
        ..small_layout()
    };
    let mut manager = manager_with(layout, DifficultyConfig::default());
    let mut events = Vec::new();

    manager.advance_wave(&mut events);

    assert!(spawned(&events).is_empty());
    assert_eq!(manager.waves().phase(), WavePhase::ClearPending);
}

#[test]
fn scaled_health_follows_geometric_curve() {
    let mut manager = manager_with(small_layout(), DifficultyConfig::default());
    let mut events = Vec::new();

    for wave in 1..=10_u32 {
        manager.advance_wave(&mut events);
        let exponent = wave - 1;
        assert_eq!(manager.waves().scaling_exponent(), exponent);

        let expected = (150.0 * f64::from(1.05_f32).powi(exponent as i32)).round() as i32;
        assert_eq!(manager.waves().scaled_health(150), expected, "wave {wave}");
    }
}

#[test]
fn scaling_uses_configured_initial_wave() {
    let difficulty = DifficultyConfig {
        initial_wave_number: 4,
        enemy_reward_multiplier_per_wave: 2.0,
        ..DifficultyConfig::default()
    };
    let mut manager = manager_with(small_layout(), difficulty);
    let mut events = Vec::new();

    manager.advance_wave(&mut events);
    assert_eq!(waves_started(&events), vec![4]);
    assert_eq!(manager.waves().scaled_reward(25), 25);

    manager.advance_wave(&mut events);
    manager.advance_wave(&mut events);
    assert_eq!(manager.waves().scaled_reward(25), 100);
}

#[test]
fn wave_zero_is_played_unscaled() {
    let difficulty = DifficultyConfig {
        initial_wave_number: 0,
        boss_wave_frequency: 0,
        enemy_unlock_thresholds: vec![EnemyUnlock {
            wave: 0,
            enemy_id: "square_tank".to_owned(),
        }],
        ..DifficultyConfig::default()
    };
    let mut manager = manager_with(small_layout(), difficulty);
    let mut events = Vec::new();
    assert!(!manager.waves().has_started());

    manager.advance_wave(&mut events);

    assert!(manager.waves().has_started());
    assert_eq!(waves_started(&events), vec![0]);
    assert_eq!(manager.waves().current_wave(), 0);
    assert_eq!(manager.waves().scaling_exponent(), 0);
    assert_eq!(manager.waves().scaled_health(150), 150);
    for event in spawned(&events) {
        assert!(matches!(
            event,
            Event::EnemySpawned {
                initial_health: 150,
                max_health: 150,
                ..
            }
        ));
    }
    assert_eq!(spawned(&events).len(), 2);

    manager.advance_wave(&mut events);
    assert_eq!(waves_started(&events), vec![0, 1]);
    assert_eq!(manager.waves().scaling_exponent(), 1);
}
