//! Wave clock and enemy spawning
//!
//! Waves advance on a fixed clock. Each wave shortens the spawn interval,
//! grows the batch size and scales enemy HP. Enemies appear on a ring just
//! outside the visible area, uniform by angle.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{ENEMY_ID_BASE, IdRange};
use super::state::Enemy;
use super::weighted::weighted_index;
use crate::content::{Content, EnemyBehavior};
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    /// Current wave (0-based, unbounded)
    pub wave: u32,
    wave_timer: f32,
    spawn_timer: f32,
    ids: IdRange,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawner {
    pub fn new() -> Self {
        Self {
            wave: 0,
            wave_timer: 0.0,
            spawn_timer: 0.0,
            ids: IdRange::new(ENEMY_ID_BASE),
        }
    }

    /// Seconds between spawn events at the current wave
    pub fn spawn_interval(&self, tuning: &Tuning) -> f32 {
        (tuning.base_spawn_rate - self.wave as f32 * tuning.spawn_rate_step).max(tuning.min_spawn_rate)
    }

    /// Enemies per spawn event at the current wave
    pub fn batch_size(&self, tuning: &Tuning) -> usize {
        1 + (self.wave as f32 * tuning.batch_growth).floor() as usize
    }

    /// Advance the clocks and return any newly spawned enemies
    ///
    /// `live_count` is the current roster size; the batch is truncated so the
    /// roster never exceeds `tuning.max_enemies`.
    pub fn advance<R: Rng>(
        &mut self,
        player_pos: Vec2,
        live_count: usize,
        content: &Content,
        tuning: &Tuning,
        rng: &mut R,
        dt: f32,
    ) -> Vec<Enemy> {
        self.wave_timer += dt;
        if self.wave_timer >= tuning.wave_duration {
            self.wave_timer -= tuning.wave_duration;
            self.wave += 1;
            log::info!(
                "Wave {}: interval {:.2}s, batch {}",
                self.wave,
                self.spawn_interval(tuning),
                self.batch_size(tuning)
            );
        }

        self.spawn_timer -= dt;
        if self.spawn_timer > 0.0 {
            return Vec::new();
        }
        if live_count >= tuning.max_enemies {
            // Timer stays expired so spawning resumes as soon as room frees up
            log::debug!("Enemy cap reached ({live_count}), spawn throttled");
            return Vec::new();
        }
        self.spawn_timer = self.spawn_interval(tuning);

        let pool = content.enemies_for_wave(self.wave);
        let weights: Vec<f32> = pool.iter().map(|e| e.spawn_weight).collect();
        let room = tuning.max_enemies - live_count;
        let count = self.batch_size(tuning).min(room);
        let distance = tuning.spawn_distance();

        let mut spawned = Vec::with_capacity(count);
        for _ in 0..count {
            let Some(index) = weighted_index(rng, &weights) else {
                break;
            };
            let def = pool[index];
            if def.behavior != EnemyBehavior::Chase {
                log::debug!("Enemy {} behavior {:?} falls back to chase", def.id, def.behavior);
            }
            let angle = rng.random::<f32>() * TAU;
            let pos = player_pos + polar_to_cartesian(distance, angle);
            spawned.push(Enemy::spawn(self.ids.next_id(), def, pos, self.wave, tuning));
        }

        if !spawned.is_empty() {
            log::debug!(
                "Spawned {} enemies (wave {}, live {})",
                spawned.len(),
                self.wave,
                live_count + spawned.len()
            );
        }
        spawned
    }
}
