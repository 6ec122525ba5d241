//! Text label
//!
//! Static pixel-font text at a fixed position. Scenes keep a handle to
//! rewrite the text (score counter) or toggle visibility (blinking prompt).

use std::cell::RefCell;
use std::rc::Rc;

use macroquad::prelude::Vec2;

use crate::game::{Entity, EntityBase};
use crate::gfx::{draw_pixel_text, RenderCtx};

pub struct Label {
    base: EntityBase,
    pos: Vec2,
    pub text: String,
}

impl Label {
    pub fn new(text: impl Into<String>, pos: Vec2) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            base: EntityBase::new(),
            pos,
            text: text.into(),
        }))
    }

    /// Position that centers `text` horizontally at height `y`.
    pub fn centered(text: &str, y: f32) -> Vec2 {
        use crate::config::CANVAS_W;
        Vec2::new((CANVAS_W - text.len() as f32 * 8.0) / 2.0, y)
    }
}

impl Entity for Label {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }

    fn render(&self, gfx: &RenderCtx) {
        draw_pixel_text(&gfx.assets.pixel_font, &self.text, self.pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_accounts_for_glyph_width() {
        // 4 glyphs at 8px: 32px wide, centered on the 288px canvas.
        assert_eq!(Label::centered("ABCD", 10.0), Vec2::new(128.0, 10.0));
    }
}
