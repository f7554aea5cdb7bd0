//! XP curve, level-ups and upgrade offers

use std::collections::BTreeMap;

use rand::Rng;

use super::state::{ActiveWeapon, Player};
use super::weighted::sample_without_replacement;
use crate::consts::MAX_LEVEL;
use crate::content::{Content, UpgradeDef, UpgradeEffect};
use crate::tuning::Tuning;

/// XP needed to clear `level`: round(base · scale^(level − 1))
///
/// Strictly increasing for every level up to `MAX_LEVEL`, which is where
/// `add_xp` stops levelling.
pub fn xp_required(level: u32, tuning: &Tuning) -> u64 {
    let exponent = level.clamp(1, MAX_LEVEL) as i32 - 1;
    (f64::from(tuning.xp_base) * f64::from(tuning.xp_scale).powi(exponent)).round() as u64
}

/// Deposit XP and return how many levels were gained
///
/// One large deposit can clear several thresholds; each one is subtracted in
/// turn and the next threshold recomputed.
pub fn add_xp(player: &mut Player, amount: u64, tuning: &Tuning) -> u32 {
    player.xp = player.xp.saturating_add(amount);
    let mut level_ups = 0;
    while player.level < MAX_LEVEL && player.xp >= player.xp_to_next {
        player.xp -= player.xp_to_next;
        player.level += 1;
        player.xp_to_next = xp_required(player.level, tuning);
        level_ups += 1;
    }
    level_ups
}

/// Catalog entries the player may be offered right now
pub fn available_upgrades<'a>(
    content: &'a Content,
    player: &Player,
    taken: &BTreeMap<String, u32>,
    tuning: &Tuning,
) -> Vec<&'a UpgradeDef> {
    content
        .upgrades
        .iter()
        .filter(|u| taken.get(&u.id).copied().unwrap_or(0) < u.max_level)
        .filter(|u| match &u.effect {
            UpgradeEffect::UnlockWeapon { weapon_id } => {
                !player.owns_weapon(weapon_id) && player.weapons.len() < tuning.max_weapons
            }
            UpgradeEffect::LevelWeapon { weapon_id } => player.owns_weapon(weapon_id),
            _ => true,
        })
        .collect()
}

/// Pick up to `offer_count` distinct upgrade ids, weighted by catalog weight
pub fn generate_offers<R: Rng>(
    rng: &mut R,
    content: &Content,
    player: &Player,
    taken: &BTreeMap<String, u32>,
    tuning: &Tuning,
) -> Vec<String> {
    let pool = available_upgrades(content, player, taken, tuning);
    let weights: Vec<f32> = pool.iter().map(|u| u.weight).collect();
    sample_without_replacement(rng, &weights, tuning.offer_count)
        .into_iter()
        .map(|i| pool[i].id.clone())
        .collect()
}

/// Apply one pick of `upgrade` and return its new taken-count
pub fn apply_upgrade(
    player: &mut Player,
    upgrade: &UpgradeDef,
    taken: &mut BTreeMap<String, u32>,
    tuning: &Tuning,
) -> u32 {
    let count = taken.entry(upgrade.id.clone()).or_insert(0);
    *count += 1;
    let level = *count;

    match &upgrade.effect {
        UpgradeEffect::Stats { modifiers, heal } => {
            player.stats.apply(modifiers);
            player.sync_derived();
            player.body.heal(*heal);
        }
        UpgradeEffect::Heal { amount } => player.body.heal(*amount),
        UpgradeEffect::UnlockWeapon { weapon_id } => {
            if !player.owns_weapon(weapon_id) && player.weapons.len() < tuning.max_weapons {
                player.weapons.push(ActiveWeapon::new(weapon_id.clone()));
            }
        }
        UpgradeEffect::LevelWeapon { weapon_id } => {
            if let Some(weapon) = player.weapon_mut(weapon_id) {
                weapon.level += 1;
            }
        }
    }
    player.sync_derived();
    level
}
