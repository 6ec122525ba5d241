//! Explosion effect
//!
//! Purely visual: plays its one-shot animation and despawns itself on the
//! tick the final frame is reached. No physics body.

use std::cell::RefCell;
use std::rc::Rc;

use macroquad::prelude::Vec2;

use crate::game::{Entity, EntityBase, TickCtx};
use crate::gfx::{AnimatedSprite, RenderCtx};

const SPRITE_ROW: usize = 5;
const FRAMES: usize = 4;
const TIME_PER_FRAME: f32 = 0.08;

pub struct Explosion {
    base: EntityBase,
    pos: Vec2,
    sprite: AnimatedSprite,
}

impl Explosion {
    pub fn new(pos: Vec2) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            base: EntityBase::new(),
            pos,
            sprite: AnimatedSprite::new(SPRITE_ROW, FRAMES, TIME_PER_FRAME, true),
        }))
    }
}

impl Entity for Explosion {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }

    fn update(&mut self, ctx: &mut TickCtx, dt: f32) {
        self.sprite.step(dt);
        if self.sprite.is_finished() {
            ctx.despawn(self.slot());
        }
    }

    fn render(&self, gfx: &RenderCtx) {
        self.sprite.draw(&gfx.assets.sprites, self.pos);
    }
}
