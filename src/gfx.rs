//! Sprite animation and pixel-font text
//!
//! The sim's drawing needs are tiny: blit one tile of the sprite sheet at a
//! position, and blit a run of 8x8 glyphs. Frame stepping is plain countdown
//! state so it can be tested without a window.

use macroquad::prelude::*;

use crate::assets::GameAssets;
use crate::config::TILE;

/// Everything render hooks may touch.
pub struct RenderCtx<'a> {
    pub assets: &'a GameAssets,
}

/// A row of the sprite sheet played back as an animation.
///
/// One-shot animations halt on their final frame; looping ones wrap.
#[derive(Debug, Clone)]
pub struct AnimatedSprite {
    row: usize,
    frame_count: usize,
    time_per_frame: f32,
    one_shot: bool,
    frame: usize,
    counter: f32,
}

impl AnimatedSprite {
    pub fn new(row: usize, frame_count: usize, time_per_frame: f32, one_shot: bool) -> Self {
        Self {
            row,
            frame_count,
            time_per_frame,
            one_shot,
            frame: 0,
            counter: 0.0,
        }
    }

    /// Advance the per-frame timer.
    pub fn step(&mut self, dt: f32) {
        self.counter += dt;
        if self.counter > self.time_per_frame {
            self.counter = 0.0;
            self.frame += 1;
            if self.frame >= self.frame_count {
                self.frame = if self.one_shot { self.frame_count - 1 } else { 0 };
            }
        }
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Pin the animation to a specific frame (used for pose-by-input).
    pub fn set_frame(&mut self, frame: usize) {
        self.frame = frame.min(self.frame_count - 1);
    }

    /// A one-shot animation that has reached its final frame.
    pub fn is_finished(&self) -> bool {
        self.one_shot && self.frame == self.frame_count - 1
    }

    /// Blit the current tile at `pos`, snapped to whole pixels.
    pub fn draw(&self, sheet: &Texture2D, pos: Vec2) {
        draw_texture_ex(
            sheet,
            pos.x.round(),
            pos.y.round(),
            WHITE,
            DrawTextureParams {
                source: Some(Rect::new(
                    self.frame as f32 * TILE,
                    self.row as f32 * TILE,
                    TILE,
                    TILE,
                )),
                ..Default::default()
            },
        );
    }
}

/// Draw `text` with the 8x8 pixel font, one glyph per byte, 16 glyphs per
/// sheet row.
pub fn draw_pixel_text(font: &Texture2D, text: &str, pos: Vec2) {
    for (i, byte) in text.bytes().enumerate() {
        let src_x = (byte % 16) as f32 * 8.0;
        let src_y = (byte / 16) as f32 * 8.0;
        draw_texture_ex(
            font,
            (pos.x + i as f32 * 8.0).round(),
            pos.y.round(),
            WHITE,
            DrawTextureParams {
                source: Some(Rect::new(src_x, src_y, 8.0, 8.0)),
                ..Default::default()
            },
        );
    }
}
