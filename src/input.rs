//! Keyboard input
//!
//! The sim consumes a read-only per-tick snapshot: a digital direction
//! vector with components in {-1, 0, 1} and a level fire signal. Entities
//! never see raw key events.

use macroquad::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// Digital direction; each component is -1.0, 0.0 or 1.0.
    pub dir: Vec2,
    /// Fire button held.
    pub fire: bool,
}

impl InputSnapshot {
    /// Poll the keyboard once per frame. WASD and the arrow keys both steer;
    /// space fires.
    pub fn poll() -> Self {
        let mut dir = Vec2::ZERO;
        if is_key_down(KeyCode::W) || is_key_down(KeyCode::Up) {
            dir.y -= 1.0;
        }
        if is_key_down(KeyCode::S) || is_key_down(KeyCode::Down) {
            dir.y += 1.0;
        }
        if is_key_down(KeyCode::A) || is_key_down(KeyCode::Left) {
            dir.x -= 1.0;
        }
        if is_key_down(KeyCode::D) || is_key_down(KeyCode::Right) {
            dir.x += 1.0;
        }
        Self {
            dir,
            fire: is_key_down(KeyCode::Space),
        }
    }
}
