//! Shared entity record
//!
//! Players and enemies embed a `Body`; pickups and attacks are lighter records
//! owned by their subsystems. Ids come from disjoint ranges so one tick's
//! collections never share an id across categories.

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub type EntityId = u64;

pub const PLAYER_ID: EntityId = 0;
pub const ENEMY_ID_BASE: EntityId = 1_000;
pub const PICKUP_ID_BASE: EntityId = 1 << 32;
pub const ATTACK_ID_BASE: EntityId = 1 << 48;

/// Tag for the entity union, used by snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Enemy,
    Pickup,
    Attack,
}

/// Monotonic id counter for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdRange {
    base: EntityId,
    next: EntityId,
}

impl IdRange {
    pub fn new(base: EntityId) -> Self {
        Self { base, next: base }
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn reset(&mut self) {
        self.next = self.base;
    }
}

/// Position, motion, health and timers shared by players and enemies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub pos: Vec2,
    /// Steering velocity, rewritten every tick
    pub vel: Vec2,
    /// Unit vector the entity faces
    pub facing: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub alive: bool,
    /// Decaying shove, kept apart from steering so the two compose additively
    pub knockback: Vec2,
    pub invuln_timer: f32,
    pub flash_timer: f32,
}

impl Body {
    pub fn new(id: EntityId, pos: Vec2, radius: f32, hp: f32, speed: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            facing: Vec2::X,
            radius,
            speed,
            hp,
            max_hp: hp,
            alive: true,
            knockback: Vec2::ZERO,
            invuln_timer: 0.0,
            flash_timer: 0.0,
        }
    }

    /// Move by steering plus knockback, then damp the knockback
    pub fn integrate(&mut self, dt: f32, damping: f32) {
        self.pos += (self.vel + self.knockback) * dt;
        self.knockback *= damping;
    }

    /// Count invulnerability and hit-flash down, never below zero
    pub fn tick_timers(&mut self, dt: f32) {
        self.invuln_timer = (self.invuln_timer - dt).max(0.0);
        self.flash_timer = (self.flash_timer - dt).max(0.0);
    }

    /// Dead once HP is gone or the kill flag is set
    pub fn is_dead(&self) -> bool {
        !self.alive || self.hp <= 0.0
    }

    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp > 0.0 {
            (self.hp / self.max_hp).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_composes_steering_and_knockback() {
        let mut body = Body::new(1, Vec2::ZERO, 10.0, 10.0, 100.0);
        body.vel = Vec2::new(100.0, 0.0);
        body.knockback = Vec2::new(0.0, 50.0);
        body.integrate(0.1, 0.85);
        assert!((body.pos - Vec2::new(10.0, 5.0)).length() < 1e-4);
        assert!((body.knockback.y - 42.5).abs() < 1e-4);
        // Steering is untouched by damping
        assert_eq!(body.vel, Vec2::new(100.0, 0.0));
    }

    #[test]
    fn test_timers_clamp_at_zero() {
        let mut body = Body::new(1, Vec2::ZERO, 10.0, 10.0, 0.0);
        body.invuln_timer = 0.05;
        body.flash_timer = 0.2;
        body.tick_timers(0.1);
        assert_eq!(body.invuln_timer, 0.0);
        assert!((body.flash_timer - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut body = Body::new(1, Vec2::ZERO, 10.0, 50.0, 0.0);
        body.hp = 45.0;
        body.heal(20.0);
        assert_eq!(body.hp, 50.0);
    }

    #[test]
    fn test_id_ranges_are_disjoint() {
        let mut enemies = IdRange::new(ENEMY_ID_BASE);
        let mut pickups = IdRange::new(PICKUP_ID_BASE);
        assert_eq!(enemies.next_id(), 1_000);
        assert_eq!(enemies.next_id(), 1_001);
        assert_eq!(pickups.next_id(), PICKUP_ID_BASE);
        enemies.reset();
        assert_eq!(enemies.next_id(), ENEMY_ID_BASE);
    }
}
