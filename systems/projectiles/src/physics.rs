//! Linear motion integration and bounds-exit detection.

use arcade_core::WorldBounds;
use glam::Vec2;

use crate::state::Projectile;

/// Advances a position by `velocity` (units per second) over `delta_ms`.
#[must_use]
pub fn integrate(position: Vec2, velocity: Vec2, delta_ms: f64) -> Vec2 {
    position + velocity * (delta_ms / 1_000.0) as f32
}

/// Moves projectiles and reports whether they are still inside the world.
#[derive(Clone, Copy, Debug)]
pub struct ProjectilePhysics {
    bounds: WorldBounds,
}

impl ProjectilePhysics {
    /// Creates a physics step constrained to `bounds`.
    #[must_use]
    pub const fn new(bounds: WorldBounds) -> Self {
        Self { bounds }
    }

    /// Rectangle projectiles must stay inside.
    #[must_use]
    pub const fn bounds(&self) -> &WorldBounds {
        &self.bounds
    }

    /// Advances the projectile and returns `true` while it remains in bounds.
    pub fn step(&self, projectile: &mut Projectile, delta_ms: f64) -> bool {
        projectile.position = integrate(projectile.position, projectile.velocity, delta_ms);
        self.bounds.contains(projectile.position)
    }
}
