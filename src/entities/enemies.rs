//! Enemy variants
//!
//! Two hulls share the same death rules (player bullet contact awards
//! score and leaves an explosion; drifting off the left edge removes them
//! silently) but move differently. The orbiting one bobs on a sine wave
//! with per-instance parameters rolled at ready time and fires aimed shots
//! once the player is far enough to its left; the straight one just flies.

use std::cell::RefCell;
use std::rc::Rc;

use macroquad::prelude::{Rect, Vec2};
use rand::Rng;

use super::bullet::Bullet;
use super::explosion::Explosion;
use crate::config::TILE;
use crate::game::{BodyRef, BodyTag, Entity, EntityBase, EntityWeak, PhysicsBody, Slot, TickCtx};
use crate::gfx::{AnimatedSprite, RenderCtx};

const FLAPPY_ROW: usize = 0;
const SWOOPY_ROW: usize = 1;

/// Left edge past which an enemy is gone for good.
const DESPAWN_X: f32 = -TILE;

/// Orbiting, aiming enemy. Drifts left at a fixed rate while its vertical
/// position rides a sine wave around the spawn height.
pub struct Flappy {
    base: EntityBase,
    pos: Vec2,
    anchor_y: f32,
    t: f32,
    pub(crate) orbit_phase: f32,
    pub(crate) orbit_speed: f32,
    pub(crate) orbit_radius: f32,
    fire_cooldown: f32,
    sprite: AnimatedSprite,
    body: Option<BodyRef>,
}

impl Flappy {
    pub fn new(pos: Vec2) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            base: EntityBase::new(),
            pos,
            anchor_y: pos.y,
            t: 0.0,
            orbit_phase: 0.0,
            orbit_speed: 0.0,
            orbit_radius: 0.0,
            fire_cooldown: 0.0,
            sprite: AnimatedSprite::new(FLAPPY_ROW, 2, 0.2, false),
            body: None,
        }))
    }
}

impl Entity for Flappy {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }

    fn ready(&mut self, ctx: &mut TickCtx, this: EntityWeak) {
        let (speed_lo, speed_hi) = ctx.config.enemies.orbit_speed;
        let (radius_lo, radius_hi) = ctx.config.enemies.orbit_radius;
        self.orbit_phase = ctx.rng.gen_range(0.0..std::f32::consts::TAU);
        self.orbit_speed = ctx.rng.gen_range(speed_lo..=speed_hi);
        self.orbit_radius = ctx.rng.gen_range(radius_lo..=radius_hi);
        self.fire_cooldown = ctx.config.enemies.fire_cooldown;

        let body = PhysicsBody::new(
            BodyTag::Enemy,
            this,
            Rect::new(self.pos.x, self.pos.y, TILE, TILE),
        );
        ctx.physics.queue_spawn(Rc::clone(&body));
        self.body = Some(body);
    }

    fn update(&mut self, ctx: &mut TickCtx, dt: f32) {
        self.t += dt;
        self.pos.x -= ctx.config.enemies.flappy_drift * dt;
        self.pos.y = self.anchor_y + (self.orbit_phase + self.t * self.orbit_speed).sin() * self.orbit_radius;
        self.sprite.step(dt);
        if let Some(body) = &self.body {
            body.borrow_mut().set_pos(self.pos);
        }

        self.fire_cooldown -= dt;
        if self.fire_cooldown <= 0.0 {
            // Only shoot at a known player position, and only once it is
            // well clear to the left. The cooldown resets on the shot, so a
            // blocked shot fires the moment the gate opens.
            if let Some(target) = ctx.shared.player_pos {
                if target.x < self.pos.x - ctx.config.enemies.aim_margin {
                    self.fire_cooldown = ctx.config.enemies.fire_cooldown;
                    let muzzle = self.pos + Vec2::splat(TILE / 2.0 - 4.0);
                    let dir = (target - self.pos).normalize_or_zero();
                    ctx.spawn(Bullet::from_enemy(
                        muzzle,
                        dir * ctx.config.enemies.bullet_speed,
                        ctx.config.timing.bullet_lifetime,
                    ));
                }
            }
        }

        if self.pos.x < DESPAWN_X {
            ctx.despawn(self.slot());
            if let Some(body) = self.body.take() {
                ctx.physics.queue_delete(body);
            }
        }
    }

    fn render(&self, gfx: &RenderCtx) {
        self.sprite.draw(&gfx.assets.sprites, self.pos);
    }

    fn on_collide(&mut self, ctx: &mut TickCtx, other: &PhysicsBody) {
        if other.tag == BodyTag::PlayerBullet {
            destroy_enemy(ctx, self.slot(), self.pos, &mut self.body);
        }
    }
}

/// Straight-line enemy. No shots, just speed.
pub struct Swoopy {
    base: EntityBase,
    pos: Vec2,
    sprite: AnimatedSprite,
    body: Option<BodyRef>,
}

impl Swoopy {
    pub fn new(pos: Vec2) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            base: EntityBase::new(),
            pos,
            sprite: AnimatedSprite::new(SWOOPY_ROW, 2, 0.15, false),
            body: None,
        }))
    }
}

impl Entity for Swoopy {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }

    fn ready(&mut self, ctx: &mut TickCtx, this: EntityWeak) {
        let body = PhysicsBody::new(
            BodyTag::Enemy,
            this,
            Rect::new(self.pos.x, self.pos.y, TILE, TILE),
        );
        ctx.physics.queue_spawn(Rc::clone(&body));
        self.body = Some(body);
    }

    fn update(&mut self, ctx: &mut TickCtx, dt: f32) {
        self.pos.x -= ctx.config.enemies.swoopy_speed * dt;
        self.sprite.step(dt);
        if let Some(body) = &self.body {
            body.borrow_mut().set_pos(self.pos);
        }

        if self.pos.x < DESPAWN_X {
            ctx.despawn(self.slot());
            if let Some(body) = self.body.take() {
                ctx.physics.queue_delete(body);
            }
        }
    }

    fn render(&self, gfx: &RenderCtx) {
        self.sprite.draw(&gfx.assets.sprites, self.pos);
    }

    fn on_collide(&mut self, ctx: &mut TickCtx, other: &PhysicsBody) {
        if other.tag == BodyTag::PlayerBullet {
            destroy_enemy(ctx, self.slot(), self.pos, &mut self.body);
        }
    }
}

/// Shared death path: score, explosion, removal of entity and body.
fn destroy_enemy(ctx: &mut TickCtx, slot: Slot, pos: Vec2, body: &mut Option<BodyRef>) {
    ctx.stats.score += ctx.config.enemies.score_value;
    ctx.spawn(Explosion::new(pos));
    ctx.despawn(slot);
    if let Some(body) = body.take() {
        ctx.physics.queue_delete(body);
    }
}
