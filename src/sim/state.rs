//! Game state and core simulation types
//!
//! `GameState` is the explicit context for one run: every roster, clock and
//! counter a tick touches lives here, so several runs can coexist.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::combat::Armory;
use super::entity::{Body, EntityId, PLAYER_ID};
use super::leveling::xp_required;
use super::pickups::PickupField;
use super::spawner::Spawner;
use crate::consts::PLAYER_RADIUS;
use crate::content::{CharacterDef, Content, EnemyBehavior, EnemyDef, StatModifiers};
use crate::error::Result;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Menu pause; toggled by input
    Paused,
    /// Waiting for an upgrade choice
    LevelUp,
    /// Player died; the grace timer is running
    Dying,
    /// Run ended
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunResult {
    Victory,
    Defeat,
}

/// Player modifiers; the single source of truth for derived body fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub max_hp: f32,
    pub armor: f32,
    pub speed: f32,
    /// Multiplier, base 1.0
    pub damage: f32,
    /// Multiplier, base 1.0
    pub attack_speed: f32,
    /// Multiplier, base 1.0
    pub area: f32,
    /// Extra projectiles per volley
    pub projectile_count: i32,
    /// Reserved for drop quality
    pub luck: f32,
    /// Multiplier, base 1.0
    pub xp_gain: f32,
    pub magnet_range: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            max_hp: 100.0,
            armor: 0.0,
            speed: 180.0,
            damage: 1.0,
            attack_speed: 1.0,
            area: 1.0,
            projectile_count: 0,
            luck: 1.0,
            xp_gain: 1.0,
            magnet_range: 50.0,
        }
    }
}

impl PlayerStats {
    /// Add every modifier onto the current values
    pub fn apply(&mut self, m: &StatModifiers) {
        self.max_hp += m.max_hp;
        self.armor += m.armor;
        self.speed += m.speed;
        self.damage += m.damage;
        self.attack_speed += m.attack_speed;
        self.area += m.area;
        self.projectile_count += m.projectile_count;
        self.luck += m.luck;
        self.xp_gain += m.xp_gain;
        self.magnet_range += m.magnet_range;
    }
}

/// A weapon slot held by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveWeapon {
    pub weapon_id: String,
    /// Starts at 1; each level adds 20% damage
    pub level: u32,
    /// Fires when this reaches zero
    pub cooldown_timer: f32,
}

impl ActiveWeapon {
    pub fn new(weapon_id: impl Into<String>) -> Self {
        Self {
            weapon_id: weapon_id.into(),
            level: 1,
            cooldown_timer: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub character_id: String,
    pub xp: u64,
    pub level: u32,
    pub xp_to_next: u64,
    pub kills: u32,
    pub weapons: Vec<ActiveWeapon>,
    pub stats: PlayerStats,
    pub magnet_radius: f32,
    /// Telemetry only
    pub damage_dealt: f32,
    pub damage_taken: f32,
}

impl Player {
    /// Fresh level-1 player at the origin holding the character's starting weapon
    pub fn new(character: &CharacterDef, tuning: &Tuning) -> Self {
        let mut stats = PlayerStats::default();
        stats.apply(&character.stat_modifiers);

        let body = Body::new(PLAYER_ID, Vec2::ZERO, PLAYER_RADIUS, stats.max_hp, stats.speed);
        let mut player = Self {
            body,
            character_id: character.id.clone(),
            xp: 0,
            level: 1,
            xp_to_next: xp_required(1, tuning),
            kills: 0,
            weapons: vec![ActiveWeapon::new(character.starting_weapon_id.clone())],
            stats,
            magnet_radius: 0.0,
            damage_dealt: 0.0,
            damage_taken: 0.0,
        };
        player.sync_derived();
        player
    }

    /// Recompute the cached body fields from `stats`
    pub fn sync_derived(&mut self) {
        self.body.speed = self.stats.speed;
        self.body.max_hp = self.stats.max_hp;
        self.body.hp = self.body.hp.min(self.body.max_hp);
        self.magnet_radius = self.stats.magnet_range;
    }

    pub fn owns_weapon(&self, weapon_id: &str) -> bool {
        self.weapons.iter().any(|w| w.weapon_id == weapon_id)
    }

    pub fn weapon_mut(&mut self, weapon_id: &str) -> Option<&mut ActiveWeapon> {
        self.weapons.iter_mut().find(|w| w.weapon_id == weapon_id)
    }
}

/// A hostile entity with its definition data carried as typed fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub def_id: String,
    pub contact_damage: f32,
    pub xp_value: u32,
    pub behavior: EnemyBehavior,
}

impl Enemy {
    /// Instantiate `def` at `pos` with HP scaled for `wave`
    pub fn spawn(id: EntityId, def: &EnemyDef, pos: Vec2, wave: u32, tuning: &Tuning) -> Self {
        let hp = (def.hp * (1.0 + wave as f32 * tuning.hp_growth)).round();
        let mut body = Body::new(id, pos, def.radius, hp, def.speed);
        body.facing = Vec2::ZERO;
        Self {
            body,
            def_id: def.id.clone(),
            contact_damage: def.contact_damage,
            xp_value: def.xp_value,
            behavior: def.behavior,
        }
    }

    /// Point the steering velocity at `target`
    ///
    /// Every behavior chases for now; the others are content placeholders.
    pub fn steer(&mut self, target: Vec2) {
        let dir = (target - self.body.pos).normalize_or_zero();
        self.body.facing = dir;
        self.body.vel = dir * self.body.speed;
    }

    #[cfg(test)]
    pub fn test_dummy(body: Body) -> Self {
        Self {
            body,
            def_id: "dummy".to_string(),
            contact_damage: 0.0,
            xp_value: 1,
            behavior: EnemyBehavior::Chase,
        }
    }
}

/// Complete state of one run
///
/// Not serializable: the RNG is live state, and the snapshot module exposes
/// everything a renderer needs.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub result: Option<RunResult>,
    /// Seconds of simulated play
    pub run_time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Live roster; dead entries are purged at the end of each tick
    pub enemies: Vec<Enemy>,
    pub spawner: Spawner,
    pub armory: Armory,
    pub pickups: PickupField,
    /// Remaining contact cooldown per enemy id
    pub contact_cooldowns: BTreeMap<EntityId, f32>,
    /// Times each upgrade id has been taken
    pub upgrades_taken: BTreeMap<String, u32>,
    /// Upgrade ids currently offered
    pub pending_offers: Vec<String>,
    /// Level-ups still waiting for an offer after the current one
    pub pending_level_ups: u32,
    /// Seconds left in the `Dying` phase
    pub death_timer: f32,
}

impl GameState {
    /// Start a run for `character_id`
    pub fn new(content: &Content, character_id: &str, tuning: Tuning, seed: u64) -> Result<Self> {
        let character = content.character(character_id)?;
        content.weapon(&character.starting_weapon_id)?;
        let player = Player::new(character, &tuning);

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            result: None,
            run_time: 0.0,
            time_ticks: 0,
            player,
            enemies: Vec::new(),
            spawner: Spawner::new(),
            armory: Armory::new(),
            pickups: PickupField::new(),
            contact_cooldowns: BTreeMap::new(),
            upgrades_taken: BTreeMap::new(),
            pending_offers: Vec::new(),
            pending_level_ups: 0,
            death_timer: 0.0,
            tuning,
        })
    }

    pub fn wave(&self) -> u32 {
        self.spawner.wave
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn live_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| !e.body.is_dead()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knight_starts_with_modified_stats() {
        let content = Content::builtin();
        let state = GameState::new(&content, "knight", Tuning::default(), 1).unwrap();
        let player = &state.player;
        assert_eq!(player.stats.max_hp, 110.0);
        assert_eq!(player.stats.armor, 1.0);
        assert_eq!(player.body.hp, 110.0);
        assert_eq!(player.body.max_hp, 110.0);
        assert_eq!(player.body.radius, 14.0);
        assert_eq!(player.body.facing, Vec2::X);
        assert_eq!(player.magnet_radius, 50.0);
        assert_eq!(player.xp_to_next, 10);
        assert_eq!(player.weapons, vec![ActiveWeapon::new("sword")]);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.wave(), 0);
    }

    #[test]
    fn test_mage_speed_penalty_reaches_body() {
        let content = Content::builtin();
        let state = GameState::new(&content, "mage", Tuning::default(), 1).unwrap();
        assert_eq!(state.player.body.speed, 170.0);
        assert_eq!(state.player.body.max_hp, 80.0);
        assert!((state.player.stats.damage - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_character_fails() {
        let content = Content::builtin();
        assert!(GameState::new(&content, "bard", Tuning::default(), 1).is_err());
    }

    #[test]
    fn test_sync_derived_clamps_hp_to_new_max() {
        let content = Content::builtin();
        let mut state = GameState::new(&content, "knight", Tuning::default(), 1).unwrap();
        state.player.stats.max_hp = 50.0;
        state.player.stats.magnet_range = 90.0;
        state.player.sync_derived();
        assert_eq!(state.player.body.hp, 50.0);
        assert_eq!(state.player.magnet_radius, 90.0);
    }

    #[test]
    fn test_enemy_hp_scales_with_wave() {
        let content = Content::builtin();
        let tuning = Tuning::default();
        let skeleton = content.enemy("skeleton").unwrap();
        let enemy = Enemy::spawn(1_000, skeleton, Vec2::ZERO, 4, &tuning);
        // 20 * 1.6 = 32
        assert_eq!(enemy.body.hp, 32.0);
        assert_eq!(enemy.body.max_hp, 32.0);
        assert_eq!(enemy.contact_damage, 8.0);
    }

    #[test]
    fn test_enemy_steers_toward_target() {
        let mut enemy = Enemy::test_dummy(Body::new(1_000, Vec2::new(10.0, 0.0), 8.0, 5.0, 60.0));
        enemy.steer(Vec2::ZERO);
        assert!((enemy.body.vel - Vec2::new(-60.0, 0.0)).length() < 1e-4);
        assert!((enemy.body.facing - Vec2::NEG_X).length() < 1e-6);
    }
}
