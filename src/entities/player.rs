//! The player ship
//!
//! Moves on normalized directional input, clamped to the playfield, fires
//! on a cooldown, and dies to any enemy or enemy bullet contact. Death is
//! a one-way transition: the ship stops simulating immediately, leaves an
//! explosion behind, and the scene watches `alive` for the end of the run.

use std::cell::RefCell;
use std::rc::Rc;

use macroquad::prelude::{vec2, Rect, Vec2};

use super::bullet::Bullet;
use super::explosion::Explosion;
use crate::config::TILE;
use crate::game::{BodyRef, BodyTag, Entity, EntityBase, EntityWeak, PhysicsBody, TickCtx};
use crate::gfx::{AnimatedSprite, RenderCtx};

const SPRITE_ROW: usize = 3;
const FRAME_DOWN: usize = 0;
const FRAME_LEVEL: usize = 1;
const FRAME_UP: usize = 2;

pub struct Player {
    base: EntityBase,
    pos: Vec2,
    sprite: AnimatedSprite,
    body: Option<BodyRef>,
    alive: bool,
    fire_cooldown: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            base: EntityBase::new(),
            pos,
            sprite: AnimatedSprite::new(SPRITE_ROW, 3, 0.0, false),
            body: None,
            alive: true,
            fire_cooldown: 0.0,
        }))
    }

    pub fn alive(&self) -> bool {
        self.alive
    }

    #[cfg(test)]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }
}

impl Entity for Player {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }

    fn ready(&mut self, ctx: &mut TickCtx, this: EntityWeak) {
        let body = PhysicsBody::new(
            BodyTag::Player,
            this,
            Rect::new(self.pos.x, self.pos.y, TILE, TILE),
        );
        ctx.physics.queue_spawn(Rc::clone(&body));
        self.body = Some(body);
        ctx.shared.player_pos = Some(self.pos);
    }

    fn update(&mut self, ctx: &mut TickCtx, dt: f32) {
        if !self.alive {
            return;
        }

        let dir = ctx.input.dir.normalize_or_zero();
        self.pos += dir * ctx.config.player.move_speed * dt;
        self.pos = ctx.config.player.playfield.clamp(self.pos);

        // Pose follows vertical input: nose up, level, nose down.
        self.sprite.set_frame(if ctx.input.dir.y < 0.0 {
            FRAME_UP
        } else if ctx.input.dir.y > 0.0 {
            FRAME_DOWN
        } else {
            FRAME_LEVEL
        });

        if let Some(body) = &self.body {
            body.borrow_mut().set_pos(self.pos);
        }
        ctx.shared.player_pos = Some(self.pos);

        self.fire_cooldown -= dt;
        if ctx.input.fire && self.fire_cooldown <= 0.0 {
            self.fire_cooldown = ctx.config.player.fire_cooldown;
            let muzzle = self.pos + vec2(TILE - 4.0, TILE / 2.0 - 4.0);
            ctx.spawn(Bullet::from_player(
                muzzle,
                vec2(ctx.config.player.bullet_speed, 0.0),
                ctx.config.timing.bullet_lifetime,
            ));
        }
    }

    fn render(&self, gfx: &RenderCtx) {
        self.sprite.draw(&gfx.assets.sprites, self.pos);
    }

    fn on_collide(&mut self, ctx: &mut TickCtx, other: &PhysicsBody) {
        if !self.alive {
            return;
        }
        if matches!(other.tag, BodyTag::Enemy | BodyTag::EnemyBullet) {
            self.alive = false;
            ctx.shared.player_pos = None;
            ctx.spawn(Explosion::new(self.pos));
            ctx.despawn(self.slot());
            if let Some(body) = self.body.take() {
                ctx.physics.queue_delete(body);
            }
        }
    }
}
