//! Horde Survivor - simulation core of a top-down survival arcade game
//!
//! Core modules:
//! - `sim`: Seeded simulation (movement, spawning, combat, pickups, leveling)
//! - `content`: Read-only weapon/enemy/character/upgrade tables
//! - `tuning`: Data-driven game balance
//! - `error`: Failure taxonomy for content lookups and lifecycle calls

pub mod content;
pub mod error;
pub mod sim;
pub mod tuning;

pub use content::Content;
pub use error::{Result, SimError};
pub use sim::Simulation;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed step used by the headless runner (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest delta a single tick may advance (stalled frames are clamped)
    pub const MAX_DT: f32 = 0.05;

    /// Logical canvas size; spawns happen just outside this view
    pub const CANVAS_W: f32 = 960.0;
    pub const CANVAS_H: f32 = 540.0;

    /// Run length in seconds (10 minutes)
    pub const RUN_DURATION: f32 = 600.0;

    /// Spawner defaults
    pub const WAVE_DURATION: f32 = 30.0;
    pub const BASE_SPAWN_RATE: f32 = 1.2;
    pub const MIN_SPAWN_RATE: f32 = 0.15;
    pub const SPAWN_RATE_STEP: f32 = 0.08;
    pub const BATCH_GROWTH: f32 = 0.5;
    pub const HP_GROWTH: f32 = 0.15;
    pub const SPAWN_MARGIN: f32 = 80.0;
    pub const MAX_ENEMIES: usize = 300;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const MAX_WEAPONS: usize = 6;

    /// Knockback impulse is multiplied by this every tick
    pub const KNOCKBACK_DAMPING: f32 = 0.85;
    /// Fraction of the half-penetration applied per separation pass
    pub const SEPARATION_FACTOR: f32 = 0.3;

    /// Contact damage
    pub const CONTACT_COOLDOWN: f32 = 0.5;
    pub const CONTACT_KNOCKBACK: f32 = 150.0;
    pub const CONTACT_INVULN: f32 = 0.2;
    pub const CONTACT_FLASH: f32 = 0.15;

    /// Hit feedback
    pub const HIT_FLASH: f32 = 0.1;
    pub const HEAL_BONUS_CHANCE: f32 = 0.03;
    pub const HEAL_BONUS_AMOUNT: f32 = 3.0;

    /// Seconds between player death and the end-of-run transition
    pub const DEATH_GRACE: f32 = 1.0;

    /// Pickups
    pub const MAGNET_SPEED: f32 = 400.0;
    pub const COLLECT_RANGE: f32 = 16.0;

    /// Level curve: xp_required(level) = round(XP_BASE * XP_SCALE^(level - 1))
    pub const XP_BASE: f32 = 10.0;
    pub const XP_SCALE: f32 = 1.25;
    pub const OFFER_COUNT: usize = 3;
    /// Level cap; the XP curve stays exact in f64/u64 up to here
    pub const MAX_LEVEL: u32 = 150;

    /// Attack shapes
    pub const SWEEP_LIFETIME: f32 = 0.2;
    pub const PROJECTILE_SPREAD: f32 = 0.15;
    pub const NOVA_BASE_COUNT: u32 = 8;
    /// Slack on the sweep arc edge so the boundary stays inclusive under f32 rounding
    pub const ARC_EPSILON: f32 = 1e-5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Heading of a vector in radians
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Strict circle overlap (touching circles do not overlap)
#[inline]
pub fn circles_overlap(a: Vec2, ar: f32, b: Vec2, br: f32) -> bool {
    let combined = ar + br;
    a.distance_squared(b) < combined * combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    #[test]
    fn test_circles_overlap_is_strict() {
        assert!(circles_overlap(Vec2::ZERO, 10.0, Vec2::new(19.0, 0.0), 10.0));
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0));
    }

    #[test]
    fn test_polar_round_trip_heading() {
        let p = polar_to_cartesian(5.0, PI / 3.0);
        assert!((p.length() - 5.0).abs() < 1e-4);
        assert!((angle_of(p) - PI / 3.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn normalize_angle_stays_in_range(a in -100.0f32..100.0) {
            let n = normalize_angle(a);
            prop_assert!(n >= -PI && n < PI);
            // Same direction as the input
            prop_assert!((n.cos() - a.cos()).abs() < 1e-3);
            prop_assert!((n.sin() - a.sin()).abs() < 1e-3);
        }
    }
}
