//! Weapon firing and attack resolution
//!
//! Weapons tick their cooldowns and turn into short-lived attack entities.
//! Attacks move, test against enemies and report hits; damage is applied
//! later by the tick so every subsystem sees the same roster this tick.

use std::collections::BTreeSet;
use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arc::SweepArc;
use super::entity::{ATTACK_ID_BASE, Body, EntityId, IdRange};
use super::state::{ActiveWeapon, Enemy, Player, PlayerStats};
use crate::content::{Content, WeaponDef, WeaponPattern};
use crate::error::Result;
use crate::tuning::Tuning;
use crate::{angle_of, circles_overlap, polar_to_cartesian};

/// Attack speed below this is treated as this (keeps cooldowns finite)
pub const MIN_ATTACK_SPEED: f32 = 0.1;
/// Damage bonus per weapon level above 1
pub const LEVEL_DAMAGE_STEP: f32 = 0.2;

/// A live hitbox spawned by a weapon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attack {
    pub id: EntityId,
    pub weapon_id: String,
    /// `Sweep` or `Projectile`; novas fire projectiles
    pub pattern: WeaponPattern,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Sweep reach, or projectile radius
    pub radius: f32,
    pub damage: f32,
    pub knockback: f32,
    /// Further distinct hits allowed after the next one
    pub piercing: u32,
    pub hit_enemies: BTreeSet<EntityId>,
    pub lifetime: f32,
    pub max_lifetime: f32,
    /// Heading (sweep bisector or flight direction)
    pub angle: f32,
    /// Full sweep width in radians (0 for projectiles)
    pub arc_width: f32,
}

impl Attack {
    pub fn sweep_arc(&self) -> SweepArc {
        SweepArc::new(self.pos, self.angle, self.arc_width, self.radius)
    }

    /// Geometric hit test against a body
    pub fn touches(&self, body: &Body) -> bool {
        match self.pattern {
            WeaponPattern::Sweep => self.sweep_arc().hits_circle(body.pos, body.radius),
            _ => circles_overlap(self.pos, self.radius, body.pos, body.radius),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.lifetime <= 0.0
    }

    /// Remaining lifetime as a fraction of the total, for fade-outs
    pub fn life_ratio(&self) -> f32 {
        if self.max_lifetime > 0.0 {
            (self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// One attack landing on one enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub enemy_id: EntityId,
    pub weapon_id: String,
    pub damage: f32,
    /// Unit vector from the attack to the enemy
    pub knockback_dir: Vec2,
    pub knockback: f32,
    /// Enemy position at the moment of the hit
    pub pos: Vec2,
}

/// Damage and area after player stats and weapon level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirePower {
    pub damage: f32,
    pub area: f32,
}

impl FirePower {
    pub fn new(def: &WeaponDef, weapon: &ActiveWeapon, stats: &PlayerStats) -> Self {
        let level_bonus = 1.0 + weapon.level.saturating_sub(1) as f32 * LEVEL_DAMAGE_STEP;
        Self {
            damage: def.damage * stats.damage * level_bonus,
            area: def.area * stats.area,
        }
    }
}

/// Seconds until `def` fires again for a player with `stats`
pub fn weapon_cooldown(def: &WeaponDef, stats: &PlayerStats) -> f32 {
    def.cooldown / stats.attack_speed.max(MIN_ATTACK_SPEED)
}

/// Flight time for a projectile; melee-speed projectiles live as long as a sweep
fn projectile_lifetime(def: &WeaponDef, tuning: &Tuning) -> f32 {
    if def.projectile_speed > 0.0 {
        def.range / def.projectile_speed
    } else {
        tuning.sweep_lifetime
    }
}

/// Living enemy closest to `pos`
fn nearest_enemy(pos: Vec2, enemies: &[Enemy]) -> Option<&Enemy> {
    enemies
        .iter()
        .filter(|e| !e.body.is_dead())
        .min_by(|a, b| {
            a.body
                .pos
                .distance_squared(pos)
                .partial_cmp(&b.body.pos.distance_squared(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Owns every live attack entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Armory {
    pub attacks: Vec<Attack>,
    ids: IdRange,
}

impl Default for Armory {
    fn default() -> Self {
        Self::new()
    }
}

impl Armory {
    pub fn new() -> Self {
        Self {
            attacks: Vec::new(),
            ids: IdRange::new(ATTACK_ID_BASE),
        }
    }

    pub fn clear(&mut self) {
        self.attacks.clear();
        self.ids.reset();
    }

    /// Count every held weapon down and fire the ones that reach zero
    pub fn tick_weapons(
        &mut self,
        player: &mut Player,
        enemies: &[Enemy],
        content: &Content,
        tuning: &Tuning,
        dt: f32,
    ) -> Result<()> {
        let Player {
            body, stats, weapons, ..
        } = player;

        for weapon in weapons.iter_mut() {
            weapon.cooldown_timer -= dt;
            if weapon.cooldown_timer > 0.0 {
                continue;
            }
            let def = content.weapon(&weapon.weapon_id)?;
            let power = FirePower::new(def, weapon, stats);
            self.fire(def, power, body, stats, enemies, tuning);
            weapon.cooldown_timer = weapon_cooldown(def, stats);
        }
        Ok(())
    }

    fn fire(
        &mut self,
        def: &WeaponDef,
        power: FirePower,
        shooter: &Body,
        stats: &PlayerStats,
        enemies: &[Enemy],
        tuning: &Tuning,
    ) {
        let pattern = def.pattern.resolved();
        if pattern != def.pattern {
            log::debug!("Weapon {} pattern {:?} fires as sweep", def.id, def.pattern);
        }
        let bonus = stats.projectile_count.max(0) as u32;

        match pattern {
            WeaponPattern::Projectile => {
                let dir = nearest_enemy(shooter.pos, enemies)
                    .map(|e| (e.body.pos - shooter.pos).normalize_or_zero())
                    .filter(|d| *d != Vec2::ZERO)
                    .unwrap_or(shooter.facing);
                let base = angle_of(dir);
                let count = 1 + bonus;
                let mid = (count - 1) as f32 / 2.0;
                for i in 0..count {
                    let offset = (i as f32 - mid) * tuning.projectile_spread;
                    self.launch(def, power, shooter.pos, base + offset, tuning);
                }
            }
            WeaponPattern::Nova => {
                let count = tuning.nova_base_count + 2 * bonus;
                for i in 0..count {
                    let angle = i as f32 / count as f32 * TAU;
                    self.launch(def, power, shooter.pos, angle, tuning);
                }
            }
            _ => {
                let lifetime = tuning.sweep_lifetime;
                let id = self.ids.next_id();
                self.attacks.push(Attack {
                    id,
                    weapon_id: def.id.clone(),
                    pattern: WeaponPattern::Sweep,
                    pos: shooter.pos,
                    vel: Vec2::ZERO,
                    radius: def.range * stats.area,
                    damage: power.damage,
                    knockback: def.knockback,
                    piercing: def.piercing,
                    hit_enemies: BTreeSet::new(),
                    lifetime,
                    max_lifetime: lifetime,
                    angle: angle_of(shooter.facing),
                    arc_width: power.area.to_radians(),
                });
            }
        }
    }

    fn launch(&mut self, def: &WeaponDef, power: FirePower, origin: Vec2, angle: f32, tuning: &Tuning) {
        let lifetime = projectile_lifetime(def, tuning);
        let id = self.ids.next_id();
        self.attacks.push(Attack {
            id,
            weapon_id: def.id.clone(),
            pattern: WeaponPattern::Projectile,
            pos: origin,
            vel: polar_to_cartesian(def.projectile_speed, angle),
            radius: power.area,
            damage: power.damage,
            knockback: def.knockback,
            piercing: def.piercing,
            hit_enemies: BTreeSet::new(),
            lifetime,
            max_lifetime: lifetime,
            angle,
            arc_width: 0.0,
        });
    }

    /// Move attacks, collect hits, and drop attacks that expired
    ///
    /// An attack hits each enemy at most once. With no piercing left, the
    /// hit that lands ends the attack on the spot.
    pub fn update_attacks(&mut self, enemies: &[Enemy], dt: f32) -> Vec<Hit> {
        let mut hits = Vec::new();

        for attack in &mut self.attacks {
            attack.pos += attack.vel * dt;
            attack.lifetime -= dt;

            for enemy in enemies {
                if enemy.body.is_dead() || attack.hit_enemies.contains(&enemy.body.id) {
                    continue;
                }
                if !attack.touches(&enemy.body) {
                    continue;
                }

                attack.hit_enemies.insert(enemy.body.id);
                hits.push(Hit {
                    enemy_id: enemy.body.id,
                    weapon_id: attack.weapon_id.clone(),
                    damage: attack.damage,
                    knockback_dir: (enemy.body.pos - attack.pos).normalize_or_zero(),
                    knockback: attack.knockback,
                    pos: enemy.body.pos,
                });

                if attack.piercing == 0 {
                    attack.lifetime = 0.0;
                    break;
                }
                attack.piercing -= 1;
            }
        }

        self.attacks.retain(|a| !a.is_expired());
        hits
    }
}
