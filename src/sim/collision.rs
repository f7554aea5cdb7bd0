//! Circle contact and crowd separation
//!
//! Everything that collides in the arena is a circle. Contacts report the
//! normal and depth; the separation pass uses them to keep enemies from
//! stacking on the same spot.

use glam::Vec2;

use super::state::Enemy;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Unit normal pointing from the first circle toward the second
    pub normal: Vec2,
    /// Overlap depth along the normal
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check overlap between two circles
///
/// Coincident centers have no usable normal and report a miss; the next
/// tick's steering pulls them apart.
pub fn circle_circle_collision(a: Vec2, ar: f32, b: Vec2, br: f32) -> CollisionResult {
    let delta = b - a;
    let dist = delta.length();
    let min_dist = ar + br;
    if dist >= min_dist || dist <= 0.0 {
        return CollisionResult::miss();
    }
    CollisionResult {
        hit: true,
        normal: delta / dist,
        penetration: min_dist - dist,
    }
}

/// Push overlapping living enemies apart
///
/// Each overlapping pair moves along the connecting normal by half the
/// penetration scaled by `factor`, one pass per call. O(n²), bounded by the
/// enemy cap.
pub fn separate_enemies(enemies: &mut [Enemy], factor: f32) {
    for i in 0..enemies.len() {
        let (head, tail) = enemies.split_at_mut(i + 1);
        let a = &mut head[i];
        if a.body.is_dead() {
            continue;
        }
        for b in tail.iter_mut() {
            if b.body.is_dead() {
                continue;
            }
            let contact = circle_circle_collision(a.body.pos, a.body.radius, b.body.pos, b.body.radius);
            if contact.hit {
                let push = contact.normal * contact.penetration * 0.5 * factor;
                a.body.pos -= push;
                b.body.pos += push;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Body;

    fn enemy_at(id: u64, pos: Vec2, radius: f32) -> Enemy {
        Enemy::test_dummy(Body::new(id, pos, radius, 10.0, 0.0))
    }

    #[test]
    fn test_circle_collision_normal_and_depth() {
        let result = circle_circle_collision(Vec2::ZERO, 10.0, Vec2::new(15.0, 0.0), 10.0);
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 1e-6);
        assert!((result.penetration - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_touching_circles_miss() {
        assert!(!circle_circle_collision(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0).hit);
    }

    #[test]
    fn test_coincident_centers_miss() {
        assert!(!circle_circle_collision(Vec2::ONE, 10.0, Vec2::ONE, 10.0).hit);
    }

    #[test]
    fn test_separation_pushes_pair_apart_symmetrically() {
        let mut enemies = vec![
            enemy_at(1, Vec2::ZERO, 10.0),
            enemy_at(2, Vec2::new(10.0, 0.0), 10.0),
        ];
        separate_enemies(&mut enemies, 0.3);
        // Penetration 10 -> each moves 10 * 0.5 * 0.3 = 1.5
        assert!((enemies[0].body.pos.x + 1.5).abs() < 1e-5);
        assert!((enemies[1].body.pos.x - 11.5).abs() < 1e-5);
    }

    #[test]
    fn test_separation_ignores_dead_enemies() {
        let mut enemies = vec![
            enemy_at(1, Vec2::ZERO, 10.0),
            enemy_at(2, Vec2::new(10.0, 0.0), 10.0),
        ];
        enemies[1].body.alive = false;
        separate_enemies(&mut enemies, 0.3);
        assert_eq!(enemies[0].body.pos, Vec2::ZERO);
        assert_eq!(enemies[1].body.pos, Vec2::new(10.0, 0.0));
    }
}
