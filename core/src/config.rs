//! Validated configuration shapes consumed by the simulation managers.
//!
//! Loading and schema validation happen outside the simulation; these types
//! are treated as already-correct input. Every type deserializes with serde
//! defaults so partial documents fill in from the built-in roster.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Complete configuration bundle handed to the composition root.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed used for every random stream in the simulation.
    pub seed: u64,
    /// Playable rectangle outside of which projectiles are discarded.
    pub world: WorldBounds,
    /// Wave progression and scaling parameters.
    pub difficulty: DifficultyConfig,
    /// Geometry of the grid and boss spawn patterns.
    pub waves: WaveLayout,
    /// Enemy definitions available to the wave handler.
    pub enemies: Vec<EnemyConfig>,
    /// Powerup definitions eligible to drop.
    pub powerups: Vec<PowerupConfig>,
    /// Player weapons that may be attached to projectile spawn requests.
    pub weapons: Vec<WeaponConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_a5c0_de00_0001,
            world: WorldBounds::default(),
            difficulty: DifficultyConfig::default(),
            waves: WaveLayout::default(),
            enemies: default_enemies(),
            powerups: default_powerups(),
            weapons: default_weapons(),
        }
    }
}

impl GameConfig {
    /// Looks up a weapon definition by identifier.
    #[must_use]
    pub fn weapon(&self, id: &str) -> Option<&WeaponConfig> {
        self.weapons.iter().find(|weapon| weapon.id == id)
    }
}

/// Axis-aligned rectangle describing the playable area in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldBounds {
    /// Upper-left corner of the rectangle.
    pub origin: Vec2,
    /// Horizontal extent measured from the origin.
    pub width: f32,
    /// Vertical extent measured from the origin.
    pub height: f32,
}

impl WorldBounds {
    /// Creates bounds anchored at the world origin.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::ZERO,
            width,
            height,
        }
    }

    /// Reports whether the point lies inside the rectangle, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.width
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.height
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Outline used when rendering an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyShape {
    /// Three-sided outline.
    Triangle,
    /// Four-sided outline.
    Square,
    /// Round outline.
    Circle,
    /// Square rotated by forty-five degrees.
    Diamond,
    /// Six-sided outline.
    Hexagon,
}

/// Movement behaviour applied to an enemy by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
    /// Descends in a straight line.
    Straight,
    /// Descends while oscillating horizontally along a sine curve.
    Sine,
    /// Descends while alternating between diagonal legs.
    Zigzag,
    /// Steers toward the player.
    Chase,
    /// Drifts side to side without descending.
    Hover,
}

/// Immutable definition of an enemy type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    /// Unique identifier referenced by unlock thresholds and instances.
    pub id: String,
    /// Outline used to render the enemy.
    pub shape: EnemyShape,
    /// Health before wave scaling is applied.
    pub base_health: u32,
    /// Speed in world units per second before wave scaling.
    pub base_speed: f32,
    /// Currency granted on destruction before wave scaling.
    pub base_reward: u32,
    /// Score granted on destruction.
    pub score_value: u32,
    /// Damage dealt to the player on contact.
    pub collision_damage: u32,
    /// Movement behaviour of the enemy.
    pub movement_pattern: MovementPattern,
    /// Radius of the collision circle.
    pub collision_radius: f32,
    /// Indicates whether the enemy fires projectiles.
    #[serde(default)]
    pub can_shoot: bool,
    /// Projectile parameters used when the enemy fires.
    #[serde(default)]
    pub shoot_config: Option<EnemyShootConfig>,
    /// Special abilities carried by the enemy.
    #[serde(default)]
    pub abilities: Vec<EnemyAbility>,
}

/// Projectile parameters for enemies that shoot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyShootConfig {
    /// Projectile type identifier fired by the enemy.
    pub projectile_type: String,
    /// Minimum delay between shots in milliseconds.
    pub cooldown_ms: u64,
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Projectile speed in world units per second.
    pub speed: f32,
    /// Maximum distance to the player at which the enemy opens fire.
    pub range: f32,
    /// Visual hints for the fired projectile.
    #[serde(default)]
    pub visual: Option<ProjectileVisual>,
}

/// Special behaviours attached to an enemy definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnemyAbility {
    /// Periodically restores health to nearby enemies.
    HealAura {
        /// Radius of the aura in world units.
        radius: f32,
        /// Health restored per second to each enemy inside the aura.
        amount_per_second: f32,
    },
    /// Periodically spawns additional enemies.
    SpawnMinions {
        /// Enemy type spawned by the ability.
        minion_id: String,
        /// Number of minions spawned per activation.
        count: u32,
        /// Delay between activations in milliseconds.
        interval_ms: u64,
    },
    /// Explodes when destroyed, damaging everything nearby.
    DeathBomb {
        /// Radius of the blast in world units.
        radius: f32,
        /// Damage dealt by the blast.
        damage: u32,
    },
}

/// Outline used when rendering a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileShape {
    /// Axis-aligned rectangle.
    Rectangle,
    /// Circle whose diameter is the visual width.
    Circle,
    /// Ellipse spanning the visual width and height.
    Ellipse,
}

/// Rendering hints attached to a created projectile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileVisual {
    /// Outline of the projectile.
    pub shape: ProjectileShape,
    /// Width in world units.
    pub width: f32,
    /// Height in world units.
    pub height: f32,
    /// Fill colour encoded as `0xRRGGBB`.
    pub color: u32,
}

impl ProjectileVisual {
    /// Visual used when the owning configuration carries no hints: a small
    /// yellow 4×10 rectangle.
    pub const DEFAULT: Self = Self {
        shape: ProjectileShape::Rectangle,
        width: 4.0,
        height: 10.0,
        color: 0xffff00,
    };
}

impl Default for ProjectileVisual {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Player weapon definition attached to player-owned spawn requests.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponConfig {
    /// Unique identifier of the weapon.
    pub id: String,
    /// Projectile type identifier fired by the weapon.
    pub projectile_type: String,
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Minimum delay between shots in milliseconds.
    pub cooldown_ms: u64,
    /// Projectile speed in world units per second.
    pub projectile_speed: f32,
    /// Blast radius for explosive ammunition.
    #[serde(default)]
    pub explosion_radius: Option<f32>,
    /// Fuse length in milliseconds for explosive ammunition.
    #[serde(default)]
    pub fuse_ms: Option<f32>,
    /// Visual hints for fired projectiles.
    #[serde(default)]
    pub visual: Option<ProjectileVisual>,
}

/// Definition of a collectible powerup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowerupConfig {
    /// Unique identifier of the powerup.
    pub id: String,
    /// Effect type; at most one effect per type is active at a time.
    pub effect: String,
    /// Strength of the effect, if it scales a stat.
    #[serde(default)]
    pub multiplier: Option<f32>,
    /// Duration of the effect in milliseconds.
    pub duration_ms: u64,
    /// Texture key used to render the pickup.
    pub visual: String,
}

/// Wave threshold at which an enemy type becomes available.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyUnlock {
    /// First wave in which the enemy type may appear.
    pub wave: u32,
    /// Identifier of the unlocked enemy type.
    pub enemy_id: String,
}

/// Wave progression and difficulty scaling parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Wave number at which scaling starts; scaling exponent is zero here.
    pub initial_wave_number: u32,
    /// Enemy count before wave scaling.
    pub base_enemy_count: u32,
    /// Geometric growth of the enemy count per wave.
    pub enemy_count_multiplier_per_wave: f32,
    /// Geometric growth of enemy health per wave.
    pub enemy_health_multiplier_per_wave: f32,
    /// Geometric growth of enemy speed per wave.
    pub enemy_speed_multiplier_per_wave: f32,
    /// Geometric growth of enemy reward per wave.
    pub enemy_reward_multiplier_per_wave: f32,
    /// Delay between clearing a wave and spawning the next, in seconds.
    pub time_between_waves_sec: f32,
    /// Every wave divisible by this number is a boss wave; zero disables bosses.
    pub boss_wave_frequency: u32,
    /// Enemy type spawned on boss waves.
    pub boss_id: String,
    /// Unlock schedule for enemy types.
    pub enemy_unlock_thresholds: Vec<EnemyUnlock>,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            initial_wave_number: 1,
            base_enemy_count: 10,
            enemy_count_multiplier_per_wave: 1.1,
            enemy_health_multiplier_per_wave: 1.05,
            enemy_speed_multiplier_per_wave: 1.02,
            enemy_reward_multiplier_per_wave: 1.05,
            time_between_waves_sec: 3.0,
            boss_wave_frequency: 5,
            boss_id: "boss_mothership".to_owned(),
            enemy_unlock_thresholds: vec![
                unlock(1, "triangle_scout"),
                unlock(1, "circle_swarmer"),
                unlock(3, "square_tank"),
                unlock(4, "diamond_shooter"),
                unlock(6, "hexagon_healer"),
            ],
        }
    }
}

/// Geometry of the grid and boss spawn patterns.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveLayout {
    /// Number of grid columns.
    pub columns: u32,
    /// Number of grid rows.
    pub rows: u32,
    /// Position of the upper-left grid cell.
    pub origin: Vec2,
    /// Distance between neighbouring grid cells.
    pub spacing: Vec2,
    /// Spawn position of the boss.
    pub boss_position: Vec2,
}

impl Default for WaveLayout {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 3,
            origin: Vec2::new(120.0, 80.0),
            spacing: Vec2::new(80.0, 60.0),
            boss_position: Vec2::new(400.0, 120.0),
        }
    }
}

fn unlock(wave: u32, enemy_id: &str) -> EnemyUnlock {
    EnemyUnlock {
        wave,
        enemy_id: enemy_id.to_owned(),
    }
}

fn default_enemies() -> Vec<EnemyConfig> {
    let enemy = |id: &str, shape, health, speed, reward, score, pattern| EnemyConfig {
        id: id.to_owned(),
        shape,
        base_health: health,
        base_speed: speed,
        base_reward: reward,
        score_value: score,
        collision_damage: 10,
        movement_pattern: pattern,
        collision_radius: 16.0,
        can_shoot: false,
        shoot_config: None,
        abilities: Vec::new(),
    };

    let enemy_bolt = EnemyShootConfig {
        projectile_type: "enemy_bolt".to_owned(),
        cooldown_ms: 1_500,
        damage: 8,
        speed: 220.0,
        range: 450.0,
        visual: Some(ProjectileVisual {
            shape: ProjectileShape::Circle,
            width: 8.0,
            height: 8.0,
            color: 0xff4040,
        }),
    };

    let mut shooter = enemy(
        "diamond_shooter",
        EnemyShape::Diamond,
        60,
        60.0,
        12,
        25,
        MovementPattern::Zigzag,
    );
    shooter.can_shoot = true;
    shooter.shoot_config = Some(enemy_bolt.clone());

    let mut healer = enemy(
        "hexagon_healer",
        EnemyShape::Hexagon,
        80,
        45.0,
        15,
        30,
        MovementPattern::Hover,
    );
    healer.abilities.push(EnemyAbility::HealAura {
        radius: 120.0,
        amount_per_second: 5.0,
    });

    let mut boss = enemy(
        "boss_mothership",
        EnemyShape::Hexagon,
        2_000,
        30.0,
        250,
        1_000,
        MovementPattern::Hover,
    );
    boss.collision_radius = 64.0;
    boss.collision_damage = 50;
    boss.can_shoot = true;
    boss.shoot_config = Some(EnemyShootConfig {
        cooldown_ms: 600,
        damage: 15,
        ..enemy_bolt
    });
    boss.abilities.push(EnemyAbility::SpawnMinions {
        minion_id: "triangle_scout".to_owned(),
        count: 3,
        interval_ms: 5_000,
    });
    boss.abilities.push(EnemyAbility::DeathBomb {
        radius: 200.0,
        damage: 40,
    });

    vec![
        enemy(
            "triangle_scout",
            EnemyShape::Triangle,
            30,
            80.0,
            5,
            10,
            MovementPattern::Straight,
        ),
        enemy(
            "circle_swarmer",
            EnemyShape::Circle,
            20,
            110.0,
            3,
            8,
            MovementPattern::Sine,
        ),
        enemy(
            "square_tank",
            EnemyShape::Square,
            150,
            40.0,
            25,
            50,
            MovementPattern::Straight,
        ),
        shooter,
        healer,
        boss,
    ]
}

fn default_powerups() -> Vec<PowerupConfig> {
    let powerup = |id: &str, effect: &str, multiplier, duration_ms| PowerupConfig {
        id: id.to_owned(),
        effect: effect.to_owned(),
        multiplier,
        duration_ms,
        visual: format!("powerup_{id}"),
    };

    vec![
        powerup("rapid_fire", "fire_rate", Some(2.0), 8_000),
        powerup("damage_boost", "damage", Some(1.5), 10_000),
        powerup("shield", "shield", None, 6_000),
        powerup("afterburner", "speed", Some(1.3), 8_000),
    ]
}

fn default_weapons() -> Vec<WeaponConfig> {
    vec![
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
        },
        WeaponConfig {
            id: "bomb_launcher".to_owned(),
            projectile_type: "bomb".to_owned(),
            damage: 40,
            cooldown_ms: 1_200,
            projectile_speed: 250.0,
            explosion_radius: Some(90.0),
            fuse_ms: Some(800.0),
            visual: Some(ProjectileVisual {
                shape: ProjectileShape::Circle,
                width: 12.0,
                height: 12.0,
                color: 0xff9900,
            }),
        },
    ]
}
