//! Shape generation for 2D primitives
//!
//! Builds the per-frame vertex list for the whole scene. Appearance is keyed
//! off entity kind; the shapes carry no gameplay meaning.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::{GameState, Meteor, MeteorKind};

/// Number of backdrop stars
const STAR_COUNT: u32 = 96;

/// Generate vertices for a filled axis-aligned rectangle (two triangles)
pub fn rect(pos: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);

    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
        Vertex::new(x0, y1, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Ship silhouette: hull quad, nose triangle, cockpit dot
pub fn ship(pos: Vec2) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(24);

    // Hull fills the lower two thirds of the ship box
    let hull_top = pos.y + SHIP_SIZE / 3.0;
    vertices.extend(rect(
        Vec2::new(pos.x, hull_top),
        Vec2::new(SHIP_SIZE, SHIP_SIZE * 2.0 / 3.0),
        colors::SHIP_HULL,
    ));

    // Nose triangle on top of the hull
    vertices.push(Vertex::new(pos.x, hull_top, colors::SHIP_HULL));
    vertices.push(Vertex::new(
        pos.x + SHIP_SIZE / 2.0,
        pos.y,
        colors::SHIP_HULL,
    ));
    vertices.push(Vertex::new(pos.x + SHIP_SIZE, hull_top, colors::SHIP_HULL));

    // Cockpit
    vertices.extend(circle(
        Vec2::new(pos.x + SHIP_SIZE / 2.0, hull_top + SHIP_SIZE / 6.0),
        SHIP_SIZE / 8.0,
        colors::SHIP_COCKPIT,
        12,
    ));

    vertices
}

/// Meteor body: a circle fan with an off-center crater, boss variant with a
/// glowing core
pub fn meteor(m: &Meteor) -> Vec<Vertex> {
    let size = m.kind.size();
    let center = m.pos + Vec2::splat(size / 2.0);
    let radius = size / 2.0;

    let mut vertices = Vec::new();
    match m.kind {
        MeteorKind::Simple => {
            vertices.extend(circle(center, radius, colors::METEOR, 20));
            vertices.extend(circle(
                center + Vec2::new(-radius * 0.3, -radius * 0.2),
                radius * 0.25,
                colors::METEOR_CRATER,
                10,
            ));
        }
        MeteorKind::Boss => {
            vertices.extend(circle(center, radius, colors::BOSS, 28));
            vertices.extend(circle(center, radius * 0.45, colors::BOSS_CORE, 20));
        }
    }

    vertices
}

/// Static backdrop stars from an integer hash (stable frame to frame)
pub fn starfield() -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((STAR_COUNT * 6) as usize);

    for i in 0..STAR_COUNT {
        let hash = i.wrapping_mul(2654435761).wrapping_add(i * 31337);
        let x = (hash % ARENA_WIDTH as u32) as f32;
        let y = ((hash >> 11) % ARENA_HEIGHT as u32) as f32;
        let size = 1.0 + ((hash >> 22) % 2) as f32;
        vertices.extend(rect(Vec2::new(x, y), Vec2::splat(size), colors::STAR));
    }

    vertices
}

/// Assemble the whole scene back-to-front
pub fn build_scene(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(1024);

    if settings.starfield {
        vertices.extend(starfield());
    }

    vertices.extend(ship(state.ship.pos));

    for bullet in &state.bullets {
        vertices.extend(rect(
            bullet.pos,
            Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            colors::BULLET,
        ));
    }

    for m in &state.meteors {
        vertices.extend(meteor(m));
    }

    for segment in &state.health_segments {
        vertices.extend(rect(
            segment.pos,
            Vec2::new(HEALTH_SEGMENT_WIDTH, HEALTH_SEGMENT_HEIGHT),
            colors::HEALTH_SEGMENT,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_is_two_triangles() {
        let vertices = rect(Vec2::new(10.0, 20.0), Vec2::new(5.0, 20.0), colors::BULLET);
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[0].position, [10.0, 20.0]);
        assert_eq!(vertices[4].position, [15.0, 40.0]);
    }

    #[test]
    fn test_scene_reflects_settings() {
        let state = GameState::new(1);
        let mut settings = Settings::default();

        settings.starfield = true;
        let with_stars = build_scene(&state, &settings).len();
        settings.starfield = false;
        let without = build_scene(&state, &settings).len();
        assert!(with_stars > without);
    }
}
