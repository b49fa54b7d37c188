//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame (every speed is a per-frame quantity)
//! - Seeded RNG only
//! - Stable iteration order (store order, reverse-index removal)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use state::{Bullet, GamePhase, GameState, HealthSegment, Meteor, MeteorKind, Ship};
pub use tick::{InputEvent, apply_input, tick};
