//! Game state and core simulation types
//!
//! One `GameState` owns every entity store and counter for a session. It is
//! constructed at session start and discarded on restart; nothing is reset
//! in place across sessions.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Aabb;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Falling meteors; destroy four to advance
    Level1,
    /// Boss fight
    Level2,
    /// Run ended with the boss destroyed
    Victory,
    /// Run ended out of ammo
    Defeat,
}

impl GamePhase {
    /// Terminal phases stop the frame loop
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::Defeat)
    }
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Ship {
    /// Top-left corner
    pub pos: Vec2,
}

impl Default for Ship {
    fn default() -> Self {
        Self {
            pos: Vec2::new(
                (ARENA_WIDTH - SHIP_SIZE) / 2.0,
                ARENA_HEIGHT - SHIP_SIZE - SHIP_BOTTOM_MARGIN,
            ),
        }
    }
}

impl Ship {
    /// Keep the ship fully inside the arena. Input moves the ship unclamped;
    /// the tick clamps once per frame.
    pub fn clamp_to_arena(&mut self) {
        self.pos.x = self.pos.x.clamp(0.0, ARENA_WIDTH - SHIP_SIZE);
    }
}

/// A bullet in flight
#[derive(Debug, Clone)]
pub struct Bullet {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
}

impl Bullet {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT))
    }
}

/// Meteor variants. The boss is distinguished by this tag, never by its
/// visual identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeteorKind {
    /// Standard falling obstacle (level 1)
    Simple,
    /// The single large level-2 meteor with hit points
    Boss,
}

impl MeteorKind {
    /// Side length of the (square) bounding box
    pub fn size(&self) -> f32 {
        match self {
            MeteorKind::Simple => METEOR_SIZE,
            MeteorKind::Boss => BOSS_SIZE,
        }
    }
}

/// A meteor on screen
#[derive(Debug, Clone)]
pub struct Meteor {
    pub id: u32,
    pub kind: MeteorKind,
    /// Top-left corner
    pub pos: Vec2,
    /// Horizontal drift, only meaningful while meteors are not falling
    pub velocity_x: f32,
}

impl Meteor {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, Vec2::splat(self.kind.size()))
    }
}

/// One cosmetic marker for a remaining boss hit point
#[derive(Debug, Clone)]
pub struct HealthSegment {
    /// Top-left corner
    pub pos: Vec2,
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Session RNG; all spawn and drift randomness flows through here
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Player ship
    pub ship: Ship,
    /// Bullets in flight
    pub bullets: Vec<Bullet>,
    /// Meteors on screen (the boss included)
    pub meteors: Vec<Meteor>,
    /// Boss health indicator segments (cosmetic)
    pub health_segments: Vec<HealthSegment>,
    /// Cumulative shots fired this level; never decremented
    pub shots_fired: u32,
    /// Simple meteors destroyed this level (level-1 win counter)
    pub meteors_destroyed: u32,
    /// Remaining boss hit points (level-2 win counter)
    pub boss_hp: u32,
    /// True while meteors descend (level 1); the boss drifts instead
    pub meteors_falling: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Level1,
            ship: Ship::default(),
            bullets: Vec::new(),
            meteors: Vec::new(),
            health_segments: Vec::new(),
            shots_fired: 0,
            meteors_destroyed: 0,
            boss_hp: BOSS_MAX_HP,
            meteors_falling: true,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Level number shown in the HUD. Terminal phases report the level the
    /// run ended on (`meteors_falling` freezes with the rest of the state).
    pub fn level(&self) -> u32 {
        match self.phase {
            GamePhase::Level1 => 1,
            GamePhase::Level2 | GamePhase::Victory => 2,
            GamePhase::Defeat => {
                if self.meteors_falling {
                    1
                } else {
                    2
                }
            }
        }
    }

    /// Spawn a bullet at the ship's nose. Silently refuses once the shot
    /// budget is spent; bullets despawning does not refund it.
    pub fn fire_bullet(&mut self) {
        if self.shots_fired >= MAX_BULLETS {
            return;
        }
        let id = self.next_entity_id();
        let pos = Vec2::new(
            self.ship.pos.x + SHIP_SIZE / 2.0 - BULLET_WIDTH / 2.0,
            self.ship.pos.y,
        );
        self.bullets.push(Bullet { id, pos });
        self.shots_fired += 1;
    }

    /// Spawn a simple meteor at a random x just above the top edge
    pub fn spawn_meteor(&mut self) {
        let x = self.rng.random_range(0.0..ARENA_WIDTH - METEOR_SIZE);
        let velocity_x = self.random_drift();
        let id = self.next_entity_id();
        self.meteors.push(Meteor {
            id,
            kind: MeteorKind::Simple,
            pos: Vec2::new(x, -METEOR_SIZE),
            velocity_x,
        });
    }

    /// Spawn the boss centered in the arena and lay out its health bar
    pub fn spawn_boss(&mut self) {
        let velocity_x = self.random_drift();
        let id = self.next_entity_id();
        let pos = Vec2::new(
            ARENA_WIDTH / 2.0 - BOSS_SIZE / 2.0,
            ARENA_HEIGHT / 2.0 - BOSS_SIZE / 2.0,
        );
        self.meteors.push(Meteor {
            id,
            kind: MeteorKind::Boss,
            pos,
            velocity_x,
        });
        self.health_segments = (0..BOSS_MAX_HP)
            .map(|i| HealthSegment {
                pos: Vec2::new(
                    pos.x + i as f32 * HEALTH_SEGMENT_SPACING,
                    pos.y - HEALTH_SEGMENT_RISE,
                ),
            })
            .collect();
    }

    /// The boss meteor, if it is on screen
    pub fn boss(&self) -> Option<&Meteor> {
        self.meteors.iter().find(|m| m.kind == MeteorKind::Boss)
    }

    fn random_drift(&mut self) -> f32 {
        if self.rng.random_bool(0.5) {
            METEOR_DRIFT_SPEED
        } else {
            -METEOR_DRIFT_SPEED
        }
    }
}
