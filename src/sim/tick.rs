//! Per-tick simulation step
//!
//! One call advances the run by `dt` in a fixed order: player, spawner,
//! enemies, separation, weapons and hits, contact damage, pickups and
//! leveling, purge, death check. Dead enemies stay in the roster until the
//! purge so every stage sees the same set.

use glam::Vec2;
use rand::Rng;

use super::collision::separate_enemies;
use super::combat::Hit;
use super::leveling::{add_xp, apply_upgrade, generate_offers};
use super::state::{GamePhase, GameState, RunResult};
use crate::circles_overlap;
use crate::consts::MAX_DT;
use crate::content::Content;
use crate::error::{Result, SimError};

/// Enemies closer than this push the autopilot away
const IDLE_DANGER_RADIUS: f32 = 180.0;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Movement intent; longer than 1 is clamped
    pub movement: Vec2,
    /// Pause toggle
    pub pause: bool,
    /// Index into the current offers while leveling up
    pub choose_upgrade: Option<usize>,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Advance the game state by `dt` seconds (clamped to `MAX_DT`)
pub fn tick(state: &mut GameState, content: &Content, input: &TickInput, dt: f32) -> Result<()> {
    let dt = dt.clamp(0.0, MAX_DT);

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at {:.1}s", state.run_time);
                return Ok(());
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return Ok(()),
        GamePhase::LevelUp => {
            let chosen = input
                .choose_upgrade
                .and_then(|i| state.pending_offers.get(i).cloned());
            if let Some(id) = chosen {
                choose_upgrade(state, content, &id)?;
            }
            return Ok(());
        }
        GamePhase::Dying => {
            state.death_timer -= dt;
            if state.death_timer <= 0.0 {
                state.phase = GamePhase::GameOver;
                log::info!("Run over after {:.1}s", state.run_time);
            }
            return Ok(());
        }
        GamePhase::Playing => {}
    }

    state.time_ticks += 1;

    // Run clock
    state.run_time += dt;
    if state.run_time >= state.tuning.run_duration {
        state.result = Some(RunResult::Victory);
        state.phase = GamePhase::GameOver;
        log::info!(
            "Victory: survived {:.0}s, level {}, {} kills",
            state.run_time,
            state.player.level,
            state.player.kills
        );
        return Ok(());
    }

    move_player(state, input.movement, dt);

    // Spawning
    let player_pos = state.player.body.pos;
    let live = state.live_enemy_count();
    let spawned = state.spawner.advance(
        player_pos,
        live,
        content,
        &state.tuning,
        &mut state.rng,
        dt,
    );
    state.enemies.extend(spawned);

    update_enemies(state, dt);
    separate_enemies(&mut state.enemies, state.tuning.separation_factor);

    // Weapons and hits
    state
        .armory
        .tick_weapons(&mut state.player, &state.enemies, content, &state.tuning, dt)?;
    let hits = state.armory.update_attacks(&state.enemies, dt);
    apply_hits(state, &hits);

    contact_damage(state, dt);

    // Pickups and leveling
    let collected = state.pickups.advance(&mut state.player, &state.tuning, dt);
    if collected.xp > 0 {
        let level_ups = add_xp(&mut state.player, collected.xp, &state.tuning);
        if level_ups > 0 {
            log::info!("Level up: {} (x{})", state.player.level, level_ups);
            state.pending_level_ups += level_ups;
            open_next_offer(state, content);
        }
    }

    state.enemies.retain(|e| !e.body.is_dead());

    if state.player.body.hp <= 0.0 {
        state.player.body.hp = 0.0;
        state.player.body.alive = false;
        state.result = Some(RunResult::Defeat);
        state.phase = GamePhase::Dying;
        state.death_timer = state.tuning.death_grace;
        state.pending_offers.clear();
        state.pending_level_ups = 0;
        log::info!(
            "Defeat at {:.1}s: level {}, {} kills",
            state.run_time,
            state.player.level,
            state.player.kills
        );
    }

    Ok(())
}

/// Apply one of the pending offers and resume (or open the next queued offer)
pub fn choose_upgrade(state: &mut GameState, content: &Content, upgrade_id: &str) -> Result<()> {
    let upgrade = content.upgrade(upgrade_id)?;
    if state.phase != GamePhase::LevelUp || !state.pending_offers.iter().any(|id| id == upgrade_id) {
        return Err(SimError::UpgradeNotOffered(upgrade_id.to_string()));
    }

    let level = apply_upgrade(&mut state.player, upgrade, &mut state.upgrades_taken, &state.tuning);
    log::info!("Upgrade {} -> level {}", upgrade.name, level);

    state.pending_offers.clear();
    state.phase = GamePhase::Playing;
    open_next_offer(state, content);
    Ok(())
}

/// Turn the next queued level-up into an offer and pause for it
///
/// Level-ups with nothing left to offer are consumed without pausing.
fn open_next_offer(state: &mut GameState, content: &Content) {
    while state.pending_level_ups > 0 {
        state.pending_level_ups -= 1;
        let offers = generate_offers(
            &mut state.rng,
            content,
            &state.player,
            &state.upgrades_taken,
            &state.tuning,
        );
        if offers.is_empty() {
            log::debug!("No upgrades left to offer");
            continue;
        }
        state.pending_offers = offers;
        state.phase = GamePhase::LevelUp;
        return;
    }
}

fn move_player(state: &mut GameState, movement: Vec2, dt: f32) {
    let body = &mut state.player.body;
    let intent = movement.clamp_length_max(1.0);
    body.vel = intent * body.speed;
    if intent != Vec2::ZERO {
        body.facing = intent.normalize_or_zero();
    }
    body.integrate(dt, state.tuning.knockback_damping);
    body.tick_timers(dt);
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let target = state.player.body.pos;
    let damping = state.tuning.knockback_damping;
    for enemy in state.enemies.iter_mut().filter(|e| !e.body.is_dead()) {
        enemy.steer(target);
        enemy.body.integrate(dt, damping);
        enemy.body.tick_timers(dt);
    }
}

/// Apply reported weapon hits; kills drop gems and may heal the player
fn apply_hits(state: &mut GameState, hits: &[Hit]) {
    let GameState {
        tuning,
        rng,
        player,
        enemies,
        pickups,
        ..
    } = state;

    for hit in hits {
        let Some(enemy) = enemies
            .iter_mut()
            .find(|e| e.body.id == hit.enemy_id && !e.body.is_dead())
        else {
            continue;
        };

        let damage = hit.damage.round().max(1.0);
        enemy.body.hp -= damage;
        enemy.body.knockback += hit.knockback_dir * hit.knockback;
        enemy.body.flash_timer = tuning.hit_flash;
        player.damage_dealt += damage;

        if enemy.body.hp <= 0.0 {
            enemy.body.alive = false;
            player.kills += 1;
            pickups.spawn_xp(enemy.body.pos, enemy.xp_value);
            if rng.random::<f32>() < tuning.heal_bonus_chance {
                player.body.heal(tuning.heal_bonus_amount);
            }
        }
    }
}

/// Overlapping enemies hurt the player, each on its own cooldown
fn contact_damage(state: &mut GameState, dt: f32) {
    let GameState {
        tuning,
        player,
        enemies,
        contact_cooldowns,
        ..
    } = state;

    contact_cooldowns.retain(|_, remaining| {
        *remaining -= dt;
        *remaining > 0.0
    });

    for enemy in enemies.iter().filter(|e| !e.body.is_dead()) {
        if contact_cooldowns.contains_key(&enemy.body.id) {
            continue;
        }
        if !circles_overlap(player.body.pos, player.body.radius, enemy.body.pos, enemy.body.radius) {
            continue;
        }

        let damage = (enemy.contact_damage - player.stats.armor).max(1.0);
        player.body.hp -= damage;
        player.damage_taken += damage;
        player.body.invuln_timer = tuning.contact_invuln;
        player.body.flash_timer = tuning.contact_flash;
        let push = (player.body.pos - enemy.body.pos).normalize_or_zero();
        player.body.knockback += push * tuning.contact_knockback;
        contact_cooldowns.insert(enemy.body.id, tuning.contact_cooldown);
    }
}

/// Demo AI: flee nearby enemies, otherwise chase pickups, take the first offer
fn autopilot(state: &GameState, input: &mut TickInput) {
    if state.phase == GamePhase::LevelUp {
        input.choose_upgrade = Some(0);
        return;
    }

    let pos = state.player.body.pos;
    let flee = state
        .enemies
        .iter()
        .filter(|e| !e.body.is_dead())
        .map(|e| pos - e.body.pos)
        .filter(|away| away.length() < IDLE_DANGER_RADIUS)
        .fold(Vec2::ZERO, |acc, away| {
            acc + away.normalize_or_zero() / away.length().max(1.0)
        });

    input.movement = if flee != Vec2::ZERO {
        flee.normalize_or_zero()
    } else {
        state
            .pickups
            .pickups
            .iter()
            .min_by(|a, b| {
                a.pos
                    .distance_squared(pos)
                    .partial_cmp(&b.pos.distance_squared(pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|p| (p.pos - pos).normalize_or_zero())
            .unwrap_or(Vec2::ZERO)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Body;
    use crate::sim::pickups::PickupKind;
    use crate::sim::state::{ActiveWeapon, Enemy};
    use crate::tuning::Tuning;

    const DT: f32 = 1.0 / 60.0;

    /// Knight with 100 HP, no armor, no weapons, and an empty spawn table
    fn quiet_run() -> (Content, GameState) {
        let mut content = Content::builtin();
        content.enemies.clear();
        let mut state = GameState::new(&content, "knight", Tuning::default(), 7).unwrap();
        state.player.stats.max_hp = 100.0;
        state.player.stats.armor = 0.0;
        state.player.sync_derived();
        state.player.body.hp = 100.0;
        state.player.weapons.clear();
        (content, state)
    }

    fn brute(id: u64, pos: Vec2, contact_damage: f32) -> Enemy {
        let mut enemy = Enemy::test_dummy(Body::new(id, pos, 12.0, 50.0, 0.0));
        enemy.contact_damage = contact_damage;
        enemy
    }

    #[test]
    fn test_contact_hit_then_cooldown() {
        let (content, mut state) = quiet_run();
        state.enemies.push(brute(1_000, Vec2::new(10.0, 0.0), 8.0));

        tick(&mut state, &content, &TickInput::default(), DT).unwrap();
        assert_eq!(state.player.body.hp, 92.0);
        assert!(state.player.body.invuln_timer > 0.0);
        assert_eq!(state.contact_cooldowns.get(&1_000), Some(&0.5));
        assert_eq!(state.player.damage_taken, 8.0);

        // Knockback slides the player but it stays in contact for a few ticks
        for _ in 0..5 {
            state.player.body.pos = Vec2::ZERO;
            tick(&mut state, &content, &TickInput::default(), DT).unwrap();
        }
        assert_eq!(state.player.body.hp, 92.0);
    }

    #[test]
    fn test_contact_hits_again_after_cooldown() {
        let (content, mut state) = quiet_run();
        state.enemies.push(brute(1_000, Vec2::new(10.0, 0.0), 8.0));
        for _ in 0..40 {
            state.player.body.pos = Vec2::ZERO;
            state.player.body.knockback = Vec2::ZERO;
            tick(&mut state, &content, &TickInput::default(), DT).unwrap();
        }
        // Hits at tick 1 and once the 0.5s cooldown lapses (~tick 31)
        assert_eq!(state.player.body.hp, 84.0);
    }

    #[test]
    fn test_contact_cooldowns_are_per_enemy() {
        let (content, mut state) = quiet_run();
        state.enemies.push(brute(1_000, Vec2::new(10.0, 0.0), 8.0));
        state.enemies.push(brute(1_001, Vec2::new(-10.0, 0.0), 8.0));
        tick(&mut state, &content, &TickInput::default(), DT).unwrap();
        assert_eq!(state.player.body.hp, 84.0);
        assert_eq!(state.contact_cooldowns.len(), 2);
    }

    #[test]
    fn test_armor_reduces_contact_to_floor_of_one() {
        let (content, mut state) = quiet_run();
        state.player.stats.armor = 20.0;
        state.enemies.push(brute(1_000, Vec2::new(10.0, 0.0), 8.0));
        tick(&mut state, &content, &TickInput::default(), DT).unwrap();
        assert_eq!(state.player.body.hp, 99.0);
    }

    #[test]
    fn test_sword_kill_drops_gem_and_purges() {
        let (content, mut state) = quiet_run();
        state.player.weapons.push(ActiveWeapon::new("sword"));
        let mut target = brute(1_000, Vec2::new(40.0, 0.0), 0.0);
        target.body.hp = 5.0;
        state.enemies.push(target);

        tick(&mut state, &content, &TickInput::default(), DT).unwrap();
        assert_eq!(state.player.kills, 1);
        assert_eq!(state.player.damage_dealt, 12.0);
        assert!(state.enemies.is_empty());
        assert_eq!(state.pickups.len(), 1);
        assert_eq!(state.pickups.pickups[0].kind, PickupKind::Xp);
    }

    /// Sword kill with the player standing at `hp` of 100
    fn kill_at_hp(hp: f32, heal_bonus_chance: f32) -> GameState {
        let (content, mut state) = quiet_run();
        state.tuning.heal_bonus_chance = heal_bonus_chance;
        state.player.body.hp = hp;
        state.player.weapons.push(ActiveWeapon::new("sword"));
        let mut target = brute(1_000, Vec2::new(40.0, 0.0), 0.0);
        target.body.hp = 5.0;
        state.enemies.push(target);
        tick(&mut state, &content, &TickInput::default(), DT).unwrap();
        assert_eq!(state.player.kills, 1);
        state
    }

    #[test]
    fn test_kill_heal_bonus() {
        let state = kill_at_hp(90.0, 1.0);
        assert_eq!(state.player.body.hp, 90.0 + state.tuning.heal_bonus_amount);

        // Clamped to max HP
        let state = kill_at_hp(99.0, 1.0);
        assert_eq!(state.player.body.hp, 100.0);

        let state = kill_at_hp(90.0, 0.0);
        assert_eq!(state.player.body.hp, 90.0);
    }

    #[test]
    fn test_hit_damage_floors_at_one() {
        let (content, mut state) = quiet_run();
        state.player.weapons.push(ActiveWeapon::new("sword"));
        state.player.stats.damage = 0.01;
        state.enemies.push(brute(1_000, Vec2::new(40.0, 0.0), 0.0));
        tick(&mut state, &content, &TickInput::default(), DT).unwrap();
        assert_eq!(state.enemies[0].body.hp, 49.0);
        assert!(state.enemies[0].body.knockback.x > 0.0);
        assert!(state.enemies[0].body.flash_timer > 0.0);
    }

    #[test]
    fn test_level_up_pauses_until_choice() {
        let (content, mut state) = quiet_run();
        state.pickups.spawn_xp(Vec2::ZERO, 10);
        tick(&mut state, &content, &TickInput::default(), DT).unwrap();
        assert_eq!(state.player.level, 2);
        assert_eq!(state.phase, GamePhase::LevelUp);
        assert_eq!(state.pending_offers.len(), 3);

        // Frozen while the offer is open
        let clock = state.run_time;
        tick(&mut state, &content, &TickInput::default(), DT).unwrap();
        assert_eq!(state.run_time, clock);

        let input = TickInput {
            choose_upgrade: Some(1),
            ..Default::default()
        };
        let chosen = state.pending_offers[1].clone();
        tick(&mut state, &content, &input, DT).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.upgrades_taken.get(&chosen), Some(&1));
        assert!(state.pending_offers.is_empty());
    }

    #[test]
    fn test_queued_level_ups_offer_one_after_another() {
        let (content, mut state) = quiet_run();
        state.pickups.spawn_xp(Vec2::ZERO, 50);
        tick(&mut state, &content, &TickInput::default(), DT).unwrap();
        assert_eq!(state.player.level, 4);
        assert_eq!(state.phase, GamePhase::LevelUp);
        assert_eq!(state.pending_level_ups, 2);

        let first = state.pending_offers[0].clone();
        choose_upgrade(&mut state, &content, &first).unwrap();
        assert_eq!(state.phase, GamePhase::LevelUp);
        assert_eq!(state.pending_level_ups, 1);
        assert_eq!(state.pending_offers.len(), 3);
    }

    #[test]
    fn test_choice_outside_offers_is_rejected() {
        let (content, mut state) = quiet_run();
        assert!(matches!(
            choose_upgrade(&mut state, &content, "up_speed"),
            Err(SimError::UpgradeNotOffered(_))
        ));
        assert!(matches!(
            choose_upgrade(&mut state, &content, "up_nothing"),
            Err(SimError::UnknownUpgrade(_))
        ));
    }

    #[test]
    fn test_empty_catalog_consumes_level_up() {
        let (mut content, mut state) = quiet_run();
        content.upgrades.clear();
        state.pickups.spawn_xp(Vec2::ZERO, 10);
        tick(&mut state, &content, &TickInput::default(), DT).unwrap();
        assert_eq!(state.player.level, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.pending_level_ups, 0);
    }

    #[test]
    fn test_pause_toggle_freezes_clock() {
        let (content, mut state) = quiet_run();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &content, &pause, DT).unwrap();
        assert_eq!(state.phase, GamePhase::Paused);
        tick(&mut state, &content, &TickInput::default(), DT).unwrap();
        assert_eq!(state.run_time, 0.0);

        tick(&mut state, &content, &pause, DT).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.run_time > 0.0);
    }

    #[test]
    fn test_dt_is_clamped() {
        let (content, mut state) = quiet_run();
        tick(&mut state, &content, &TickInput::default(), 3.0).unwrap();
        assert!((state.run_time - MAX_DT).abs() < 1e-6);
    }

    #[test]
    fn test_movement_updates_facing_only_when_moving() {
        let (content, mut state) = quiet_run();
        let input = TickInput {
            movement: Vec2::new(0.0, 2.0),
            ..Default::default()
        };
        tick(&mut state, &content, &input, 0.05).unwrap();
        assert!((state.player.body.pos - Vec2::new(0.0, 9.0)).length() < 1e-4);
        assert_eq!(state.player.body.facing, Vec2::Y);

        tick(&mut state, &content, &TickInput::default(), 0.05).unwrap();
        assert_eq!(state.player.body.facing, Vec2::Y);
    }

    #[test]
    fn test_victory_ends_run() {
        let (content, mut state) = quiet_run();
        state.run_time = state.tuning.run_duration - 0.01;
        tick(&mut state, &content, &TickInput::default(), DT).unwrap();
        assert_eq!(state.result, Some(RunResult::Victory));
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_death_waits_out_grace_then_ends() {
        let (content, mut state) = quiet_run();
        state.player.body.hp = 5.0;
        state.enemies.push(brute(1_000, Vec2::new(10.0, 0.0), 8.0));
        tick(&mut state, &content, &TickInput::default(), DT).unwrap();
        assert_eq!(state.phase, GamePhase::Dying);
        assert_eq!(state.result, Some(RunResult::Defeat));
        assert!(!state.player.body.alive);
        assert_eq!(state.player.body.hp, 0.0);

        let clock = state.run_time;
        for _ in 0..10 {
            tick(&mut state, &content, &TickInput::default(), 0.05).unwrap();
        }
        assert_eq!(state.phase, GamePhase::Dying);
        assert_eq!(state.run_time, clock);
        for _ in 0..11 {
            tick(&mut state, &content, &TickInput::default(), 0.05).unwrap();
        }
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_seeded_runs_are_deterministic() {
        let content = Content::builtin();
        let mut a = GameState::new(&content, "mage", Tuning::default(), 1234).unwrap();
        let mut b = GameState::new(&content, "mage", Tuning::default(), 1234).unwrap();
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..1_800 {
            tick(&mut a, &content, &input, DT).unwrap();
            tick(&mut b, &content, &input, DT).unwrap();
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.player.body.pos, b.player.body.pos);
        assert_eq!(a.player.kills, b.player.kills);
        let ids_a: Vec<_> = a.enemies.iter().map(|e| (e.body.id, e.body.pos)).collect();
        let ids_b: Vec<_> = b.enemies.iter().map(|e| (e.body.id, e.body.pos)).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn test_idle_mode_plays_first_minute() {
        let content = Content::builtin();
        let mut state = GameState::new(&content, "knight", Tuning::default(), 99).unwrap();
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..3_600 {
            tick(&mut state, &content, &input, DT).unwrap();
        }
        assert!(state.run_time > 0.0);
        assert!(state.enemies.iter().all(|e| !e.body.is_dead()));
        assert!(state.enemies.len() <= state.tuning.max_enemies);
    }
}
