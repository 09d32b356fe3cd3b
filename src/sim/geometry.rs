//! Geometry helpers for circles and axis-aligned rectangles
//!
//! Everything here is pure. Tanks, bullets and pickups are circles; walls are
//! axis-aligned rectangles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, LOS_SAMPLE_STEP};

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    /// Inclusive point containment
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Point of the rectangle closest to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(clamp(p.x, self.x, self.x + self.w), clamp(p.y, self.y, self.y + self.h))
    }
}

/// Clamp without panicking on inverted bounds (min wins, like `max(min, min(max, v))`)
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    min.max(max.min(value))
}

/// Unit vector in the direction of `v`; the zero vector stays zero
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let len = v.length();
    let len = if len == 0.0 { 1.0 } else { len };
    v / len
}

/// Closest-point test between a circle and a rectangle
pub fn circle_intersects_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let d = center - rect.closest_point(center);
    d.length_squared() <= radius * radius
}

/// Circle vs circle overlap (touching counts)
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let rr = ra + rb;
    (a - b).length_squared() <= rr * rr
}

/// True if a circle at `pos` touches any wall
pub fn collides_with_walls(pos: Vec2, radius: f32, walls: &[Rect]) -> bool {
    walls.iter().any(|w| circle_intersects_rect(pos, radius, w))
}

/// Discrete line-of-sight check.
///
/// Samples the segment every `LOS_SAMPLE_STEP` units starting at `from`
/// (the endpoint itself is not sampled) and fails if any sample lies inside a
/// wall.
pub fn has_line_of_sight(from: Vec2, to: Vec2, walls: &[Rect]) -> bool {
    let delta = to - from;
    let steps = (delta.length() / LOS_SAMPLE_STEP).ceil() as u32;
    if steps == 0 {
        return true;
    }
    let step = delta / steps as f32;
    let mut sample = from;
    for _ in 0..steps {
        if walls.iter().any(|w| w.contains(sample)) {
            return false;
        }
        sample += step;
    }
    true
}

/// Move a circle by `delta`, one axis at a time.
///
/// Each axis move is rejected if it would overlap a wall; an accepted move is
/// clamped to the arena bounds. Blocking one axis still lets the tank slide
/// along the other.
pub fn move_axis_separated(pos: Vec2, delta: Vec2, radius: f32, walls: &[Rect]) -> Vec2 {
    let mut out = pos;

    let try_x = Vec2::new(pos.x + delta.x, pos.y);
    if !collides_with_walls(try_x, radius, walls) {
        out.x = clamp(try_x.x, radius, ARENA_WIDTH - radius);
    }

    // y attempt uses the pre-move x, matching the independent-axis rule
    let try_y = Vec2::new(pos.x, pos.y + delta.y);
    if !collides_with_walls(try_y, radius, walls) {
        out.y = clamp(try_y.y, radius, ARENA_HEIGHT - radius);
    }

    out
}

/// Inside the arena rectangle (edges count as inside)
pub fn in_arena(p: Vec2) -> bool {
    p.x >= 0.0 && p.y >= 0.0 && p.x <= ARENA_WIDTH && p.y <= ARENA_HEIGHT
}
