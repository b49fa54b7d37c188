//! Meteor Strike - a two-level arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Presentation preferences

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Arena dimensions (fixed-size drawable area)
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;

    /// Ship defaults
    pub const SHIP_SIZE: f32 = 100.0;
    /// Horizontal distance covered by one move key press
    pub const SHIP_STEP: f32 = 40.0;
    /// Gap between the ship and the bottom edge at spawn
    pub const SHIP_BOTTOM_MARGIN: f32 = 20.0;

    /// Bullet defaults
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 20.0;
    /// Upward travel per tick
    pub const BULLET_SPEED: f32 = 10.0;
    /// Shot budget per level (cumulative shots fired, not a live count)
    pub const MAX_BULLETS: u32 = 10;

    /// Meteor defaults
    pub const METEOR_SIZE: f32 = 50.0;
    pub const BOSS_SIZE: f32 = 100.0;
    /// Descent per tick while meteors are falling (level 1)
    pub const METEOR_FALL_SPEED: f32 = 1.0;
    /// Horizontal drift per tick while meteors are not falling (level 2)
    pub const METEOR_DRIFT_SPEED: f32 = 5.0;
    /// Per-tick chance of a new simple meteor while meteors are falling
    pub const METEOR_SPAWN_CHANCE: f64 = 0.02;
    /// Per-tick chance of a spontaneous drift reversal
    pub const DRIFT_FLIP_CHANCE: f64 = 0.01;

    /// Simple meteors to destroy before the boss fight
    pub const LEVEL1_METEOR_GOAL: u32 = 4;
    /// Boss hit points
    pub const BOSS_MAX_HP: u32 = 4;

    /// Boss health indicator segments
    pub const HEALTH_SEGMENT_WIDTH: f32 = 25.0;
    pub const HEALTH_SEGMENT_HEIGHT: f32 = 10.0;
    pub const HEALTH_SEGMENT_SPACING: f32 = 55.0;
    /// Vertical offset of the segments above the boss
    pub const HEALTH_SEGMENT_RISE: f32 = 20.0;
}
