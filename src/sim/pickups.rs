//! Pickups: XP gems, heals and magnets
//!
//! Anything inside the player's magnet radius latches on and homes in at a
//! fixed speed. Collection is a separate, smaller radius checked against the
//! position at the start of the tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, IdRange, PICKUP_ID_BASE};
use super::state::Player;
use crate::tuning::Tuning;

/// The simulation itself only drops `Xp` gems; heal and magnet pickups are
/// placed by callers (map events, scripted drops) through `PickupField::spawn`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Xp,
    Heal,
    /// Magnetizes every pickup on the field
    Magnet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: EntityId,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub radius: f32,
    /// XP amount or HP restored
    pub value: f32,
    /// One-way latch
    pub magnetized: bool,
}

/// Collected pickup totals for one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
    pub xp: u64,
    pub healed: f32,
    pub magnets: u32,
}

/// Owns every pickup on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupField {
    pub pickups: Vec<Pickup>,
    ids: IdRange,
}

impl Default for PickupField {
    fn default() -> Self {
        Self::new()
    }
}

impl PickupField {
    pub fn new() -> Self {
        Self {
            pickups: Vec::new(),
            ids: IdRange::new(PICKUP_ID_BASE),
        }
    }

    pub fn clear(&mut self) {
        self.pickups.clear();
        self.ids.reset();
    }

    pub fn len(&self) -> usize {
        self.pickups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
    }

    pub fn spawn(&mut self, kind: PickupKind, pos: Vec2, value: f32, radius: f32) -> EntityId {
        let id = self.ids.next_id();
        self.pickups.push(Pickup {
            id,
            kind,
            pos,
            radius,
            value,
            magnetized: false,
        });
        id
    }

    /// Drop an XP gem; bigger values make bigger gems, up to a cap
    pub fn spawn_xp(&mut self, pos: Vec2, value: u32) -> EntityId {
        let radius = 4.0 + value.min(10) as f32;
        self.spawn(PickupKind::Xp, pos, value as f32, radius)
    }

    pub fn magnetize_all(&mut self) {
        for pickup in &mut self.pickups {
            pickup.magnetized = true;
        }
    }

    /// Attract and collect pickups for one tick
    ///
    /// XP is scaled by the player's `xp_gain` and returned for the caller to
    /// deposit; heals go straight to the player's HP.
    pub fn advance(&mut self, player: &mut Player, tuning: &Tuning, dt: f32) -> Collected {
        let mut collected = Collected::default();
        let target = player.body.pos;
        let magnet_radius = player.magnet_radius;

        self.pickups.retain_mut(|pickup| {
            let dist = pickup.pos.distance(target);

            if dist < magnet_radius || pickup.magnetized {
                pickup.magnetized = true;
                let dir = (target - pickup.pos).normalize_or_zero();
                pickup.pos += dir * tuning.magnet_speed * dt;
            }

            if dist >= tuning.collect_range {
                return true;
            }
            match pickup.kind {
                PickupKind::Xp => {
                    collected.xp += (pickup.value * player.stats.xp_gain).round().max(0.0) as u64;
                }
                PickupKind::Heal => {
                    let before = player.body.hp;
                    player.body.heal(pickup.value);
                    collected.healed += player.body.hp - before;
                }
                PickupKind::Magnet => collected.magnets += 1,
            }
            false
        });

        if collected.magnets > 0 {
            self.magnetize_all();
        }
        collected
    }
}
