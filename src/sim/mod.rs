//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (one `Pcg32` per run)
//! - Stable iteration order (rosters keep spawn order, maps are ordered)
//! - No rendering or platform dependencies
//! - Dead entities leave the roster only at the end of a tick

pub mod arc;
pub mod collision;
pub mod combat;
pub mod entity;
pub mod leveling;
pub mod pickups;
pub mod simulation;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod weighted;

pub use arc::SweepArc;
pub use collision::{CollisionResult, circle_circle_collision, separate_enemies};
pub use combat::{Armory, Attack, FirePower, Hit, weapon_cooldown};
pub use entity::{Body, EntityId, EntityKind};
pub use leveling::{add_xp, apply_upgrade, available_upgrades, generate_offers, xp_required};
pub use pickups::{Collected, Pickup, PickupField, PickupKind};
pub use simulation::Simulation;
pub use snapshot::Snapshot;
pub use spawner::Spawner;
pub use state::{ActiveWeapon, Enemy, GamePhase, GameState, Player, PlayerStats, RunResult};
pub use tick::{TickInput, choose_upgrade, tick};
pub use weighted::{sample_without_replacement, weighted_index};
