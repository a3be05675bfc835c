//! Fuse countdown and detonation payloads for explosive projectiles.

use arcade_core::{Event, Owner, ProjectileId};
use glam::Vec2;

use crate::state::Projectile;

/// Detonation produced when an explosive projectile's fuse runs out.
#[derive(Clone, Debug, PartialEq)]
pub struct Explosion {
    /// Projectile that detonated.
    pub id: ProjectileId,
    /// Detonation point.
    pub position: Vec2,
    /// Blast radius.
    pub radius: f32,
    /// Damage dealt inside the blast radius.
    pub damage: u32,
    /// Side that fired the projectile.
    pub owner: Owner,
    /// Projectile type identifier.
    pub kind: String,
}

impl Explosion {
    /// Converts the detonation into a [`Event::ProjectileExplode`].
    #[must_use]
    pub fn into_event(self) -> Event {
        Event::ProjectileExplode {
            id: self.id,
            position: self.position,
            radius: self.radius,
            damage: self.damage,
            owner: self.owner,
            kind: self.kind,
        }
    }
}

/// Reports whether the projectile carries a fuse, a blast radius and damage.
#[must_use]
pub fn is_explosive(projectile: &Projectile) -> bool {
    projectile.time_to_explode_ms.is_some()
        && projectile.radius.is_some()
        && projectile.damage.is_some()
}

/// Burns `delta_ms` off the fuse and returns the detonation once it reaches zero.
///
/// Non-explosive projectiles are left untouched. A fuse of zero detonates on
/// the first tick.
pub fn tick_fuse(projectile: &mut Projectile, delta_ms: f64) -> Option<Explosion> {
    let (Some(fuse), Some(radius), Some(damage)) = (
        projectile.time_to_explode_ms.as_mut(),
        projectile.radius,
        projectile.damage,
    ) else {
        return None;
    };

    *fuse -= delta_ms as f32;
    if *fuse > 0.0 {
        return None;
    }

    Some(Explosion {
        id: projectile.id,
        position: projectile.position,
        radius,
        damage,
        owner: projectile.owner,
        kind: projectile.kind.clone(),
    })
}
