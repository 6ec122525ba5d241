//! Parallax background
//!
//! Two layers of 160px-wide tiles scrolling left at different rates, each
//! drawn three times to cover the canvas with a seam-free wrap.

use std::cell::RefCell;
use std::rc::Rc;

use macroquad::prelude::{draw_texture, Texture2D, WHITE};

use crate::game::{Entity, EntityBase, TickCtx};
use crate::gfx::RenderCtx;

const LAYER_W: f32 = 160.0;
const PLANET_SPEED: f32 = 5.0;
const STARS_SPEED: f32 = 20.0;

pub struct Background {
    base: EntityBase,
    pub(crate) planet_scroll: f32,
    pub(crate) stars_scroll: f32,
}

impl Background {
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            base: EntityBase::new(),
            planet_scroll: 0.0,
            stars_scroll: 0.0,
        }))
    }
}

fn scroll(offset: &mut f32, speed: f32, dt: f32) {
    *offset -= speed * dt;
    if *offset <= -LAYER_W {
        *offset += LAYER_W;
    }
}

fn draw_layer(texture: &Texture2D, offset: f32) {
    for i in 0..3 {
        draw_texture(texture, (offset + i as f32 * LAYER_W).floor(), 0.0, WHITE);
    }
}

impl Entity for Background {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }

    fn update(&mut self, _ctx: &mut TickCtx, dt: f32) {
        scroll(&mut self.planet_scroll, PLANET_SPEED, dt);
        scroll(&mut self.stars_scroll, STARS_SPEED, dt);
    }

    fn render(&self, gfx: &RenderCtx) {
        draw_layer(&gfx.assets.background_planet, self.planet_scroll);
        draw_layer(&gfx.assets.background_stars, self.stars_scroll);
    }
}
