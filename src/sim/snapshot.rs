//! Read-only view of a run for renderers and tooling
//!
//! Everything a presentation layer needs to draw a frame, resolved against
//! the content tables (colors, names) so callers never reach into subsystem
//! state.

use glam::Vec2;
use serde::Serialize;

use super::entity::{EntityId, EntityKind};
use super::pickups::PickupKind;
use super::state::{ActiveWeapon, GamePhase, GameState, RunResult};
use crate::content::{Content, WeaponPattern};
use crate::error::Result;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub kind: EntityKind,
    pub id: EntityId,
    pub character_id: String,
    pub color: String,
    pub pos: Vec2,
    pub facing: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub hp_ratio: f32,
    pub invuln_timer: f32,
    pub flash_timer: f32,
    pub level: u32,
    pub xp: u64,
    pub xp_to_next: u64,
    pub kills: u32,
    pub magnet_radius: f32,
    pub weapons: Vec<ActiveWeapon>,
    pub damage_dealt: f32,
    pub damage_taken: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub kind: EntityKind,
    pub id: EntityId,
    pub def_id: String,
    pub color: String,
    pub pos: Vec2,
    pub radius: f32,
    pub hp_ratio: f32,
    pub flash_timer: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttackView {
    pub kind: EntityKind,
    pub id: EntityId,
    pub weapon_id: String,
    pub color: String,
    pub trail_color: String,
    pub pattern: WeaponPattern,
    pub pos: Vec2,
    pub radius: f32,
    pub angle: f32,
    pub arc_width: f32,
    /// 1.0 when fired, 0.0 when expiring
    pub life_ratio: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PickupView {
    pub kind: EntityKind,
    pub id: EntityId,
    pub pickup: PickupKind,
    pub pos: Vec2,
    pub radius: f32,
    pub magnetized: bool,
}

/// One card on the level-up screen
#[derive(Debug, Clone, Serialize)]
pub struct OfferView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Level the upgrade reaches if picked
    pub next_level: u32,
    pub max_level: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub run_time: f32,
    pub time_remaining: f32,
    pub wave: u32,
    pub phase: GamePhase,
    pub result: Option<RunResult>,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub attacks: Vec<AttackView>,
    pub pickups: Vec<PickupView>,
    pub offers: Vec<OfferView>,
}

impl Snapshot {
    pub fn capture(state: &GameState, content: &Content) -> Result<Self> {
        let player = &state.player;
        let character = content.character(&player.character_id)?;

        let enemies = state
            .enemies
            .iter()
            .filter(|e| !e.body.is_dead())
            .map(|e| {
                Ok(EnemyView {
                    kind: EntityKind::Enemy,
                    id: e.body.id,
                    def_id: e.def_id.clone(),
                    color: content.enemy(&e.def_id)?.color.clone(),
                    pos: e.body.pos,
                    radius: e.body.radius,
                    hp_ratio: e.body.hp_ratio(),
                    flash_timer: e.body.flash_timer,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let attacks = state
            .armory
            .attacks
            .iter()
            .map(|a| {
                let def = content.weapon(&a.weapon_id)?;
                Ok(AttackView {
                    kind: EntityKind::Attack,
                    id: a.id,
                    weapon_id: a.weapon_id.clone(),
                    color: def.color.clone(),
                    trail_color: def.trail_color.clone(),
                    pattern: a.pattern,
                    pos: a.pos,
                    radius: a.radius,
                    angle: a.angle,
                    arc_width: a.arc_width,
                    life_ratio: a.life_ratio(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let pickups = state
            .pickups
            .pickups
            .iter()
            .map(|p| PickupView {
                kind: EntityKind::Pickup,
                id: p.id,
                pickup: p.kind,
                pos: p.pos,
                radius: p.radius,
                magnetized: p.magnetized,
            })
            .collect();

        let offers = state
            .pending_offers
            .iter()
            .map(|id| {
                let def = content.upgrade(id)?;
                Ok(OfferView {
                    id: def.id.clone(),
                    name: def.name.clone(),
                    description: def.description.clone(),
                    icon: def.icon.clone(),
                    next_level: state.upgrades_taken.get(id).copied().unwrap_or(0) + 1,
                    max_level: def.max_level,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            run_time: state.run_time,
            time_remaining: (state.tuning.run_duration - state.run_time).max(0.0),
            wave: state.wave(),
            phase: state.phase,
            result: state.result,
            player: PlayerView {
                kind: EntityKind::Player,
                id: player.body.id,
                character_id: player.character_id.clone(),
                color: character.color.clone(),
                pos: player.body.pos,
                facing: player.body.facing,
                radius: player.body.radius,
                hp: player.body.hp,
                max_hp: player.body.max_hp,
                hp_ratio: player.body.hp_ratio(),
                invuln_timer: player.body.invuln_timer,
                flash_timer: player.body.flash_timer,
                level: player.level,
                xp: player.xp,
                xp_to_next: player.xp_to_next,
                kills: player.kills,
                magnet_radius: player.magnet_radius,
                weapons: player.weapons.clone(),
                damage_dealt: player.damage_dealt,
                damage_taken: player.damage_taken,
            },
            enemies,
            attacks,
            pickups,
            offers,
        })
    }
}
