//! Sweep arc geometry for melee attacks
//!
//! A sweep is a circular sector anchored at the attacker:
//! - center_angle: heading the sector opens toward
//! - width: full angular width (radians)
//! - radius: reach from the anchor

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::ARC_EPSILON;
use crate::{angle_of, normalize_angle};

/// A circular sector in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepArc {
    pub origin: Vec2,
    /// Heading of the sector's bisector (radians)
    pub center_angle: f32,
    /// Full angular width (radians)
    pub width: f32,
    pub radius: f32,
}

impl SweepArc {
    pub fn new(origin: Vec2, center_angle: f32, width: f32, radius: f32) -> Self {
        Self {
            origin,
            center_angle: normalize_angle(center_angle),
            width,
            radius,
        }
    }

    /// Signed angle from the bisector to `theta`, in [-π, π)
    pub fn angle_offset(&self, theta: f32) -> f32 {
        normalize_angle(theta - self.center_angle)
    }

    /// Check if a heading lies within the sector; the edges count as inside
    pub fn contains_angle(&self, theta: f32) -> bool {
        self.angle_offset(theta).abs() <= self.width / 2.0 + ARC_EPSILON
    }

    /// Check a circle against the sector: within reach of the anchor (touching
    /// counts) and with its center inside the angular extent
    pub fn hits_circle(&self, center: Vec2, radius: f32) -> bool {
        let to_target = center - self.origin;
        if to_target.length() > self.radius + radius {
            return false;
        }
        self.contains_angle(angle_of(to_target))
    }
}
