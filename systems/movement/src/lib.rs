#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure movement strategies keyed by [`MovementPattern`].
//!
//! The presentation layer owns enemy positions; this crate only answers
//! "which way should this enemy move right now".

use std::time::Duration;

use arcade_core::MovementPattern;
use glam::Vec2;

const SINE_AMPLITUDE: f32 = 60.0;
const SINE_ANGULAR_SPEED: f32 = 2.0;
const ZIGZAG_LEG: Duration = Duration::from_millis(1_000);
const HOVER_ANGULAR_SPEED: f32 = 0.8;

/// Inputs required to steer one enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementContext {
    /// Current position in world units.
    pub position: Vec2,
    /// Base speed of the enemy's definition.
    pub base_speed: f32,
    /// Wave speed multiplier captured at spawn.
    pub speed_multiplier: f32,
    /// Time since the enemy spawned.
    pub elapsed: Duration,
    /// Position the enemy homes in on, usually the player.
    pub target: Option<Vec2>,
}

impl MovementContext {
    fn speed(&self) -> f32 {
        self.base_speed * self.speed_multiplier
    }
}

/// Velocity in world units per second for an enemy following `pattern`.
#[must_use]
pub fn steer(pattern: MovementPattern, context: &MovementContext) -> Vec2 {
    let speed = context.speed();
    let t = context.elapsed.as_secs_f32();

    match pattern {
        MovementPattern::Straight => Vec2::new(0.0, speed),
        MovementPattern::Sine => Vec2::new(
            SINE_AMPLITUDE * SINE_ANGULAR_SPEED * (SINE_ANGULAR_SPEED * t).cos(),
            speed,
        ),
        MovementPattern::Zigzag => {
            let leg = context.elapsed.as_millis() / ZIGZAG_LEG.as_millis();
            let direction = if leg % 2 == 0 { 1.0 } else { -1.0 };
            Vec2::new(direction * speed * 0.75, speed * 0.5)
        }
        MovementPattern::Chase => match context.target {
            Some(target) => (target - context.position).normalize_or_zero() * speed,
            None => Vec2::new(0.0, speed),
        },
        MovementPattern::Hover => Vec2::new(speed * (HOVER_ANGULAR_SPEED * t).cos(), 0.0),
    }
}

/// Position reached after following `pattern` for `dt`.
#[must_use]
pub fn step(pattern: MovementPattern, context: &MovementContext, dt: Duration) -> Vec2 {
    context.position + steer(pattern, context) * dt.as_secs_f32()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(elapsed_ms: u64, target: Option<Vec2>) -> MovementContext {
        MovementContext {
            position: Vec2::new(100.0, 100.0),
            base_speed: 80.0,
            speed_multiplier: 1.5,
            elapsed: Duration::from_millis(elapsed_ms),
            target,
        }
    }

    #[test]
    fn straight_descends_at_scaled_speed() {
        assert_eq!(
            steer(MovementPattern::Straight, &context(0, None)),
            Vec2::new(0.0, 120.0)
        );
    }

    #[test]
    fn zigzag_alternates_legs() {
        let first = steer(MovementPattern::Zigzag, &context(500, None));
        let second = steer(MovementPattern::Zigzag, &context(1_500, None));
        assert!(first.x > 0.0);
        assert!(second.x < 0.0);
        assert_eq!(first.y, second.y);
    }

    #[test]
    fn chase_heads_toward_target() {
        let velocity = steer(
            MovementPattern::Chase,
            &context(0, Some(Vec2::new(100.0, 300.0))),
        );
        assert!(velocity.x.abs() < 1e-4);
        assert!((velocity.y - 120.0).abs() < 1e-3);
    }

    #[test]
    fn hover_never_descends() {
        for elapsed in [0, 750, 4_000] {
            assert_eq!(steer(MovementPattern::Hover, &context(elapsed, None)).y, 0.0);
        }
    }

    #[test]
    fn step_integrates_velocity() {
        let next = step(
            MovementPattern::Straight,
            &context(0, None),
            Duration::from_millis(500),
        );
        assert_eq!(next, Vec2::new(100.0, 160.0));
    }

    #[test]
    fn sine_sways_horizontally() {
        let start = steer(MovementPattern::Sine, &context(0, None));
        assert!((start.x - SINE_AMPLITUDE * SINE_ANGULAR_SPEED).abs() < 1e-3);
        assert_eq!(start.y, 120.0);
    }
}
