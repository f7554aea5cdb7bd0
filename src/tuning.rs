//! Data-driven game balance
//!
//! Every number the simulation scales by lives here so a balance pass can be
//! loaded from JSON without touching code. Defaults come from `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};

/// Balance knobs for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Run ===
    /// Seconds survived for a victory
    pub run_duration: f32,
    /// Seconds held for the death animation before the run ends
    pub death_grace: f32,

    // === Spawner ===
    pub wave_duration: f32,
    pub base_spawn_rate: f32,
    pub min_spawn_rate: f32,
    /// Spawn interval shrinks by this much per wave
    pub spawn_rate_step: f32,
    /// Extra enemies per batch per wave
    pub batch_growth: f32,
    /// Enemy HP multiplier growth per wave
    pub hp_growth: f32,
    pub spawn_margin: f32,
    pub canvas_w: f32,
    pub canvas_h: f32,
    pub max_enemies: usize,

    // === Physics ===
    pub knockback_damping: f32,
    pub separation_factor: f32,

    // === Contact damage ===
    pub contact_cooldown: f32,
    pub contact_knockback: f32,
    pub contact_invuln: f32,
    pub contact_flash: f32,

    // === Hits ===
    pub hit_flash: f32,
    pub heal_bonus_chance: f32,
    pub heal_bonus_amount: f32,

    // === Pickups / leveling ===
    pub magnet_speed: f32,
    pub collect_range: f32,
    pub xp_base: f32,
    pub xp_scale: f32,
    pub offer_count: usize,
    pub max_weapons: usize,

    // === Attacks ===
    pub sweep_lifetime: f32,
    pub projectile_spread: f32,
    pub nova_base_count: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            run_duration: RUN_DURATION,
            death_grace: DEATH_GRACE,

            wave_duration: WAVE_DURATION,
            base_spawn_rate: BASE_SPAWN_RATE,
            min_spawn_rate: MIN_SPAWN_RATE,
            spawn_rate_step: SPAWN_RATE_STEP,
            batch_growth: BATCH_GROWTH,
            hp_growth: HP_GROWTH,
            spawn_margin: SPAWN_MARGIN,
            canvas_w: CANVAS_W,
            canvas_h: CANVAS_H,
            max_enemies: MAX_ENEMIES,

            knockback_damping: KNOCKBACK_DAMPING,
            separation_factor: SEPARATION_FACTOR,

            contact_cooldown: CONTACT_COOLDOWN,
            contact_knockback: CONTACT_KNOCKBACK,
            contact_invuln: CONTACT_INVULN,
            contact_flash: CONTACT_FLASH,

            hit_flash: HIT_FLASH,
            heal_bonus_chance: HEAL_BONUS_CHANCE,
            heal_bonus_amount: HEAL_BONUS_AMOUNT,

            magnet_speed: MAGNET_SPEED,
            collect_range: COLLECT_RANGE,
            xp_base: XP_BASE,
            xp_scale: XP_SCALE,
            offer_count: OFFER_COUNT,
            max_weapons: MAX_WEAPONS,

            sweep_lifetime: SWEEP_LIFETIME,
            projectile_spread: PROJECTILE_SPREAD,
            nova_base_count: NOVA_BASE_COUNT,
        }
    }
}

impl Tuning {
    /// Parse a tuning file; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would stall or invert the simulation
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("run_duration", self.run_duration),
            ("wave_duration", self.wave_duration),
            ("base_spawn_rate", self.base_spawn_rate),
            ("min_spawn_rate", self.min_spawn_rate),
            ("collect_range", self.collect_range),
            ("xp_base", self.xp_base),
            ("sweep_lifetime", self.sweep_lifetime),
            ("death_grace", self.death_grace),
            ("contact_cooldown", self.contact_cooldown),
            ("contact_invuln", self.contact_invuln),
            ("contact_flash", self.contact_flash),
            ("hit_flash", self.hit_flash),
            ("magnet_speed", self.magnet_speed),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(SimError::InvalidTuning(format!("{name} must be > 0, got {value}")));
            }
        }
        let non_negative = [
            ("spawn_rate_step", self.spawn_rate_step),
            ("batch_growth", self.batch_growth),
            ("hp_growth", self.hp_growth),
            ("spawn_margin", self.spawn_margin),
            ("canvas_w", self.canvas_w),
            ("canvas_h", self.canvas_h),
            ("separation_factor", self.separation_factor),
            ("contact_knockback", self.contact_knockback),
            ("heal_bonus_amount", self.heal_bonus_amount),
            ("projectile_spread", self.projectile_spread),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(SimError::InvalidTuning(format!("{name} must be >= 0, got {value}")));
            }
        }
        if !(self.xp_scale > 1.0) {
            // The level curve must strictly increase
            return Err(SimError::InvalidTuning(format!(
                "xp_scale must be > 1, got {}",
                self.xp_scale
            )));
        }
        if !(self.knockback_damping > 0.0 && self.knockback_damping <= 1.0) {
            return Err(SimError::InvalidTuning(format!(
                "knockback_damping must be in (0, 1], got {}",
                self.knockback_damping
            )));
        }
        let counts = [
            ("max_enemies", self.max_enemies),
            ("max_weapons", self.max_weapons),
            ("offer_count", self.offer_count),
            ("nova_base_count", self.nova_base_count as usize),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(SimError::InvalidTuning(format!("{name} must be non-zero")));
            }
        }
        if !(0.0..=1.0).contains(&self.heal_bonus_chance) {
            return Err(SimError::InvalidTuning(format!(
                "heal_bonus_chance must be a probability, got {}",
                self.heal_bonus_chance
            )));
        }
        Ok(())
    }

    /// Distance from the player at which new enemies appear
    pub fn spawn_distance(&self) -> f32 {
        self.canvas_w.max(self.canvas_h) / 2.0 + self.spawn_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_enemies": 50, "wave_duration": 10.0 }"#).unwrap();
        assert_eq!(tuning.max_enemies, 50);
        assert_eq!(tuning.wave_duration, 10.0);
        assert_eq!(tuning.collect_range, COLLECT_RANGE);
    }

    #[test]
    fn test_rejects_flat_level_curve() {
        let err = Tuning::from_json(r#"{ "xp_scale": 1.0 }"#).unwrap_err();
        assert!(matches!(err, SimError::InvalidTuning(_)));
    }

    fn rejected(json: &str) -> bool {
        matches!(Tuning::from_json(json), Err(SimError::InvalidTuning(_)))
    }

    #[test]
    fn test_rejects_non_positive_timers() {
        assert!(rejected(r#"{ "contact_cooldown": -1.0 }"#));
        assert!(rejected(r#"{ "contact_cooldown": 0.0 }"#));
        assert!(rejected(r#"{ "death_grace": -5.0 }"#));
        assert!(rejected(r#"{ "contact_invuln": 0.0 }"#));
        assert!(rejected(r#"{ "contact_flash": -0.1 }"#));
        assert!(rejected(r#"{ "hit_flash": 0.0 }"#));
    }

    #[test]
    fn test_rejects_non_positive_rates() {
        assert!(rejected(r#"{ "magnet_speed": -400.0 }"#));
        assert!(rejected(r#"{ "base_spawn_rate": 0.0 }"#));
    }

    #[test]
    fn test_rejects_negative_growth() {
        assert!(rejected(r#"{ "hp_growth": -2.0 }"#));
        assert!(rejected(r#"{ "batch_growth": -0.5 }"#));
        assert!(rejected(r#"{ "contact_knockback": -150.0 }"#));
        assert!(Tuning::from_json(r#"{ "hp_growth": 0.0 }"#).is_ok());
    }

    #[test]
    fn test_rejects_zero_counts() {
        assert!(rejected(r#"{ "offer_count": 0 }"#));
        assert!(rejected(r#"{ "nova_base_count": 0 }"#));
        assert!(rejected(r#"{ "max_enemies": 0 }"#));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(Tuning::from_json("{ nope"), Err(SimError::Json(_))));
    }

    #[test]
    fn test_spawn_distance_uses_larger_canvas_side() {
        let tuning = Tuning::default();
        assert_eq!(tuning.spawn_distance(), 960.0 / 2.0 + 80.0);
    }
}
