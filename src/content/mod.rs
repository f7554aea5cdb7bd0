//! Read-only content tables
//!
//! Weapons, enemies, characters and upgrades are data, not algorithm. The
//! simulation only ever looks them up by id; nothing here is mutated once a
//! run starts.

mod builtin;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// How a weapon turns into attack entities
///
/// Only `Sweep`, `Projectile` and `Nova` are simulated. The reserved patterns
/// and anything unrecognised fire as a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponPattern {
    Sweep,
    Projectile,
    Nova,
    Orbit,
    Aura,
    Chain,
    #[serde(other)]
    Unknown,
}

impl WeaponPattern {
    /// The pattern actually simulated for this weapon
    pub fn resolved(self) -> WeaponPattern {
        match self {
            WeaponPattern::Projectile => WeaponPattern::Projectile,
            WeaponPattern::Nova => WeaponPattern::Nova,
            _ => WeaponPattern::Sweep,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub damage: f32,
    /// Seconds between attacks at attack speed 1.0
    pub cooldown: f32,
    /// Melee reach, or projectile travel distance
    pub range: f32,
    /// Sweep arc in degrees, or projectile radius
    pub area: f32,
    pub knockback: f32,
    /// Extra distinct enemies an attack may hit (0 = gone after the first)
    pub piercing: u32,
    /// 0 for melee
    pub projectile_speed: f32,
    pub pattern: WeaponPattern,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub trail_color: String,
}

/// Enemy steering; only `Chase` is simulated, everything else chases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyBehavior {
    Chase,
    Charge,
    Circle,
    Ranged,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyDef {
    pub id: String,
    pub name: String,
    pub hp: f32,
    pub speed: f32,
    #[serde(alias = "damage")]
    pub contact_damage: f32,
    #[serde(alias = "size")]
    pub radius: f32,
    pub xp_value: u32,
    #[serde(default)]
    pub color: String,
    pub behavior: EnemyBehavior,
    pub spawn_weight: f32,
    #[serde(default)]
    pub min_wave: u32,
}

/// Additive adjustments to `PlayerStats`
///
/// Multiplier stats default to 1.0 on the player, so `damage: 0.2` reads as +20%.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatModifiers {
    pub max_hp: f32,
    pub armor: f32,
    pub speed: f32,
    pub damage: f32,
    pub attack_speed: f32,
    pub area: f32,
    pub projectile_count: i32,
    pub luck: f32,
    pub xp_gain: f32,
    pub magnet_range: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub starting_weapon_id: String,
    #[serde(default)]
    pub stat_modifiers: StatModifiers,
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_unlocked")]
    pub unlocked: bool,
}

fn default_unlocked() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeCategory {
    Stat,
    Weapon,
    Special,
}

/// What picking an upgrade does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpgradeEffect {
    /// Add to stats, then restore `heal` HP (clamped to the new max)
    Stats {
        modifiers: StatModifiers,
        #[serde(default)]
        heal: f32,
    },
    Heal { amount: f32 },
    /// Add a weapon the player does not hold yet
    UnlockWeapon { weapon_id: String },
    /// Raise the level of a held weapon
    LevelWeapon { weapon_id: String },
}

impl UpgradeEffect {
    /// Weapon this effect unlocks or levels, if any
    pub fn weapon_id(&self) -> Option<&str> {
        match self {
            UpgradeEffect::UnlockWeapon { weapon_id } | UpgradeEffect::LevelWeapon { weapon_id } => {
                Some(weapon_id)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    pub max_level: u32,
    pub category: UpgradeCategory,
    /// Selection weight (higher = more common)
    pub weight: f32,
    pub effect: UpgradeEffect,
}

/// The content lookup service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub weapons: Vec<WeaponDef>,
    pub enemies: Vec<EnemyDef>,
    pub characters: Vec<CharacterDef>,
    pub upgrades: Vec<UpgradeDef>,
}

impl Content {
    /// The tables the game ships with
    pub fn builtin() -> Self {
        Self {
            weapons: builtin::weapons(),
            enemies: builtin::enemies(),
            characters: builtin::characters(),
            upgrades: builtin::upgrades(),
        }
    }

    /// Load a full table set from JSON and check its cross references
    pub fn from_json(json: &str) -> Result<Self> {
        let content: Content = serde_json::from_str(json)?;
        content.validate()?;
        Ok(content)
    }

    pub fn weapon(&self, id: &str) -> Result<&WeaponDef> {
        self.weapons
            .iter()
            .find(|w| w.id == id)
            .ok_or_else(|| SimError::UnknownWeapon(id.to_string()))
    }

    pub fn enemy(&self, id: &str) -> Result<&EnemyDef> {
        self.enemies
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| SimError::UnknownEnemy(id.to_string()))
    }

    pub fn character(&self, id: &str) -> Result<&CharacterDef> {
        self.characters
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| SimError::UnknownCharacter(id.to_string()))
    }

    pub fn upgrade(&self, id: &str) -> Result<&UpgradeDef> {
        self.upgrades
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| SimError::UnknownUpgrade(id.to_string()))
    }

    /// Enemies allowed to spawn at `wave`
    pub fn enemies_for_wave(&self, wave: u32) -> Vec<&EnemyDef> {
        self.enemies.iter().filter(|e| e.min_wave <= wave).collect()
    }

    pub fn unlocked_characters(&self) -> impl Iterator<Item = &CharacterDef> {
        self.characters.iter().filter(|c| c.unlocked)
    }

    /// Check ids are unique and every cross reference resolves
    pub fn validate(&self) -> Result<()> {
        fn unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
            let mut seen = std::collections::BTreeSet::new();
            for id in ids {
                if !seen.insert(id) {
                    return Err(SimError::InvalidContent(format!("duplicate {kind} id: {id}")));
                }
            }
            Ok(())
        }
        unique("weapon", self.weapons.iter().map(|w| w.id.as_str()))?;
        unique("enemy", self.enemies.iter().map(|e| e.id.as_str()))?;
        unique("character", self.characters.iter().map(|c| c.id.as_str()))?;
        unique("upgrade", self.upgrades.iter().map(|u| u.id.as_str()))?;

        for weapon in &self.weapons {
            if !(weapon.cooldown > 0.0) {
                return Err(SimError::InvalidContent(format!(
                    "weapon {} has non-positive cooldown",
                    weapon.id
                )));
            }
        }
        for enemy in &self.enemies {
            if enemy.spawn_weight < 0.0 {
                return Err(SimError::InvalidContent(format!(
                    "enemy {} has negative spawn weight",
                    enemy.id
                )));
            }
        }
        for character in &self.characters {
            self.weapon(&character.starting_weapon_id)?;
        }
        for upgrade in &self.upgrades {
            if upgrade.max_level == 0 || upgrade.weight < 0.0 {
                return Err(SimError::InvalidContent(format!(
                    "upgrade {} needs max_level >= 1 and weight >= 0",
                    upgrade.id
                )));
            }
            if let Some(weapon_id) = upgrade.effect.weapon_id() {
                self.weapon(weapon_id)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_validate() {
        let content = Content::builtin();
        content.validate().unwrap();
        assert_eq!(content.weapons.len(), 6);
        assert_eq!(content.enemies.len(), 3);
        assert_eq!(content.unlocked_characters().count(), 2);
    }

    #[test]
    fn test_unknown_ids_fail_loudly() {
        let content = Content::builtin();
        assert!(matches!(content.weapon("bfg"), Err(SimError::UnknownWeapon(id)) if id == "bfg"));
        assert!(matches!(content.enemy("dragon"), Err(SimError::UnknownEnemy(_))));
        assert!(matches!(content.character("bard"), Err(SimError::UnknownCharacter(_))));
        assert!(matches!(content.upgrade("up_luck"), Err(SimError::UnknownUpgrade(_))));
    }

    #[test]
    fn test_enemies_for_wave_respects_min_wave() {
        let content = Content::builtin();
        let early: Vec<_> = content.enemies_for_wave(0).iter().map(|e| e.id.clone()).collect();
        assert_eq!(early, vec!["skeleton", "bat"]);
        assert_eq!(content.enemies_for_wave(2).len(), 3);
    }

    #[test]
    fn test_reserved_and_unknown_patterns_resolve_to_sweep() {
        let parsed: Vec<WeaponPattern> =
            serde_json::from_str(r#"["orbit", "aura", "chain", "laser", "nova"]"#).unwrap();
        let resolved: Vec<_> = parsed.iter().map(|p| p.resolved()).collect();
        assert_eq!(
            resolved,
            vec![
                WeaponPattern::Sweep,
                WeaponPattern::Sweep,
                WeaponPattern::Sweep,
                WeaponPattern::Sweep,
                WeaponPattern::Nova
            ]
        );
    }

    #[test]
    fn test_from_json_rejects_dangling_weapon_reference() {
        let mut content = Content::builtin();
        content.characters[0].starting_weapon_id = "missing".to_string();
        let json = serde_json::to_string(&content).unwrap();
        assert!(matches!(Content::from_json(&json), Err(SimError::UnknownWeapon(_))));
    }

    #[test]
    fn test_from_json_round_trips_builtin() {
        let json = serde_json::to_string(&Content::builtin()).unwrap();
        let content = Content::from_json(&json).unwrap();
        assert_eq!(content.upgrades.len(), Content::builtin().upgrades.len());
    }

    #[test]
    fn test_enemy_accepts_short_field_names() {
        let json = r#"{
            "id": "slime", "name": "Slime", "hp": 5, "speed": 20, "damage": 2,
            "size": 6, "xp_value": 1, "behavior": "wobble", "spawn_weight": 1
        }"#;
        let def: EnemyDef = serde_json::from_str(json).unwrap();
        assert_eq!(def.contact_damage, 2.0);
        assert_eq!(def.radius, 6.0);
        assert_eq!(def.behavior, EnemyBehavior::Unknown);
        assert_eq!(def.min_wave, 0);
    }
}
