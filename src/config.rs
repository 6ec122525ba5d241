//! Gameplay tuning
//!
//! All speeds, cooldowns, lifetimes and rectangles live here so tests and a
//! user-supplied RON file can override them. Defaults match the shipped
//! balance.

use macroquad::prelude::{vec2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Virtual canvas width in pixels.
pub const CANVAS_W: f32 = 288.0;
/// Virtual canvas height in pixels.
pub const CANVAS_H: f32 = 160.0;
/// Sprite sheet tile size in pixels.
pub const TILE: f32 = 16.0;

/// Serde-friendly axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Clamp a point into the rectangle (both ends inclusive).
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        vec2(
            p.x.clamp(self.x, self.x + self.w),
            p.y.clamp(self.y, self.y + self.h),
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub move_speed: f32,
    pub fire_cooldown: f32,
    pub bullet_speed: f32,
    /// Where the player may move, in top-left coordinates.
    pub playfield: Bounds,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 80.0,
            fire_cooldown: 0.25,
            bullet_speed: 180.0,
            playfield: Bounds::new(0.0, 0.0, CANVAS_W - TILE, CANVAS_H - TILE),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Base leftward drift of the orbiting enemy.
    pub flappy_drift: f32,
    /// Per-instance orbit speed range, radians per second.
    pub orbit_speed: (f32, f32),
    /// Per-instance orbit radius range, pixels.
    pub orbit_radius: (f32, f32),
    pub fire_cooldown: f32,
    /// The player must be this far left of the enemy before it aims.
    pub aim_margin: f32,
    pub bullet_speed: f32,
    /// Leftward speed of the straight-line enemy.
    pub swoopy_speed: f32,
    /// Score awarded per enemy destroyed.
    pub score_value: u32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            flappy_drift: 30.0,
            orbit_speed: (2.0, 6.0),
            orbit_radius: (6.0, 20.0),
            fire_cooldown: 1.6,
            aim_margin: 32.0,
            bullet_speed: 90.0,
            swoopy_speed: 60.0,
            score_value: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Base interval between spawns, seconds.
    pub interval: f32,
    /// Uniform jitter added to the interval on each reset, seconds.
    pub jitter: f32,
    /// Enemies appear at a random point inside this rectangle.
    pub spawn_area: Bounds,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            interval: 1.0,
            jitter: 0.4,
            spawn_area: Bounds::new(CANVAS_W + 4.0, 8.0, 16.0, CANVAS_H - TILE - 16.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Bullet lifetime before self-deletion, seconds.
    pub bullet_lifetime: f32,
    /// Title-screen prompt blink period, seconds.
    pub title_blink: f32,
    /// Delay between the player dying and the return to the title, seconds.
    pub end_of_run_delay: f32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            bullet_lifetime: 2.0,
            title_blink: 0.75,
            end_of_run_delay: 5.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player: PlayerConfig,
    pub enemies: EnemyConfig,
    pub spawner: SpawnerConfig,
    pub timing: TimingConfig,
}

impl GameConfig {
    /// Load tuning overrides from a RON file, falling back to defaults when
    /// the file is absent or malformed.
    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match ron::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    macroquad::logging::warn!("ignoring malformed {}: {}", path, e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = GameConfig::default();
        assert!(config.player.move_speed > 0.0);
        assert!(config.player.fire_cooldown > 0.0);
        assert!(config.spawner.interval > 0.0);
        // The spawn area sits off the right edge of the canvas.
        assert!(config.spawner.spawn_area.x >= CANVAS_W);
    }

    #[test]
    fn test_partial_ron_overrides_merge_with_defaults() {
        let config: GameConfig = ron::from_str("(player: (move_speed: 120.0))").unwrap();
        assert_eq!(config.player.move_speed, 120.0);
        assert_eq!(config.spawner.interval, GameConfig::default().spawner.interval);
    }

    #[test]
    fn test_bounds_clamp() {
        let bounds = Bounds::new(0.0, 0.0, 100.0, 50.0);
        assert_eq!(bounds.clamp(vec2(-10.0, 200.0)), vec2(0.0, 50.0));
        assert_eq!(bounds.clamp(vec2(40.0, 20.0)), vec2(40.0, 20.0));
        assert!(bounds.contains(vec2(100.0, 50.0)));
        assert!(!bounds.contains(vec2(100.1, 50.0)));
    }
}
