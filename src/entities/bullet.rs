//! Bullets
//!
//! One type for both sides; the origin picks the body tag, the sprite row
//! and which contacts disable the bullet. A bullet flies in a straight
//! line, carries a small centered hitbox, and despawns itself when its
//! lifetime runs out or when it hits what it was fired at.

use std::cell::RefCell;
use std::rc::Rc;

use macroquad::prelude::{vec2, Rect, Vec2};

use crate::config::TILE;
use crate::game::{BodyRef, BodyTag, Entity, EntityBase, EntityWeak, PhysicsBody, TickCtx};
use crate::gfx::{AnimatedSprite, RenderCtx};

const PLAYER_ROW: usize = 2;
const ENEMY_ROW: usize = 6;

// Hitbox inset from the 16x16 tile, leaving an 8x8 core.
const BODY_INSET: f32 = 4.0;
const BODY_SIZE: f32 = TILE - 2.0 * BODY_INSET;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Player,
    Enemy,
}

pub struct Bullet {
    base: EntityBase,
    origin: Origin,
    pos: Vec2,
    vel: Vec2,
    lifetime: f32,
    sprite: AnimatedSprite,
    body: Option<BodyRef>,
    spent: bool,
}

impl Bullet {
    pub fn from_player(pos: Vec2, vel: Vec2, lifetime: f32) -> Rc<RefCell<Self>> {
        Self::new(Origin::Player, PLAYER_ROW, pos, vel, lifetime)
    }

    pub fn from_enemy(pos: Vec2, vel: Vec2, lifetime: f32) -> Rc<RefCell<Self>> {
        Self::new(Origin::Enemy, ENEMY_ROW, pos, vel, lifetime)
    }

    fn new(origin: Origin, row: usize, pos: Vec2, vel: Vec2, lifetime: f32) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            base: EntityBase::new(),
            origin,
            pos,
            vel,
            lifetime,
            sprite: AnimatedSprite::new(row, 2, 0.1, false),
            body: None,
            spent: false,
        }))
    }

    fn retire(&mut self, ctx: &mut TickCtx) {
        if self.spent {
            return;
        }
        self.spent = true;
        ctx.despawn(self.slot());
        if let Some(body) = self.body.take() {
            ctx.physics.queue_delete(body);
        }
    }
}

impl Entity for Bullet {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }

    fn ready(&mut self, ctx: &mut TickCtx, this: EntityWeak) {
        let tag = match self.origin {
            Origin::Player => BodyTag::PlayerBullet,
            Origin::Enemy => BodyTag::EnemyBullet,
        };
        let body = PhysicsBody::new(
            tag,
            this,
            Rect::new(
                self.pos.x + BODY_INSET,
                self.pos.y + BODY_INSET,
                BODY_SIZE,
                BODY_SIZE,
            ),
        );
        ctx.physics.queue_spawn(Rc::clone(&body));
        self.body = Some(body);
    }

    fn update(&mut self, ctx: &mut TickCtx, dt: f32) {
        if self.spent {
            return;
        }
        self.pos += self.vel * dt;
        self.sprite.step(dt);
        if let Some(body) = &self.body {
            body.borrow_mut().set_pos(self.pos + vec2(BODY_INSET, BODY_INSET));
        }

        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            self.retire(ctx);
        }
    }

    fn render(&self, gfx: &RenderCtx) {
        self.sprite.draw(&gfx.assets.sprites, self.pos);
    }

    fn on_collide(&mut self, ctx: &mut TickCtx, other: &PhysicsBody) {
        let hit = match self.origin {
            Origin::Player => other.tag == BodyTag::Enemy,
            Origin::Enemy => other.tag == BodyTag::Player,
        };
        if hit {
            self.retire(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::{GameContext, Slot, Stage};
    use crate::input::InputSnapshot;
    use crate::save::SaveSlot;

    fn test_context() -> GameContext {
        GameContext::new(GameConfig::default(), SaveSlot::new("save/test.ron"), 7)
    }

    fn tick(stage: &mut Stage, gc: &mut GameContext, dt: f32) {
        let input = InputSnapshot::default();
        let mut env = gc.env(&input);
        stage.update(&mut env, dt);
    }

    #[test]
    fn test_bullet_expires_after_lifetime() {
        let mut gc = test_context();
        let mut stage = Stage::new();
        let bullet = Bullet::from_player(vec2(10.0, 10.0), vec2(180.0, 0.0), 0.5);
        stage.spawn(bullet.clone());

        // Live from tick 1; lifetime crosses zero on update #5 (0.5s), the
        // despawn resolves on the following tick.
        for _ in 0..5 {
            tick(&mut stage, &mut gc, 0.1);
        }
        assert_eq!(stage.len(), 1);
        tick(&mut stage, &mut gc, 0.1);
        assert!(stage.is_empty());
        assert_eq!(bullet.borrow().slot(), Slot::Detached);
    }

    #[test]
    fn test_bullet_tracks_velocity() {
        let mut gc = test_context();
        let mut stage = Stage::new();
        let bullet = Bullet::from_player(vec2(0.0, 20.0), vec2(100.0, 0.0), 5.0);
        stage.spawn(bullet.clone());

        tick(&mut stage, &mut gc, 0.1); // ready + first step
        for _ in 0..9 {
            tick(&mut stage, &mut gc, 0.1);
        }
        let pos = bullet.borrow().pos;
        assert!((pos.x - 100.0).abs() < 1e-3);
        assert_eq!(pos.y, 20.0);
        // The body followed along, inset into the tile.
        let body = stage.physics().bodies()[0].borrow().rect;
        assert!((body.x - (pos.x + BODY_INSET)).abs() < 1e-3);
    }

    #[test]
    fn test_enemy_bullet_ignores_enemy_contact() {
        let input = InputSnapshot::default();
        let config = GameConfig::default();
        let mut rng = {
            use rand::SeedableRng;
            rand::rngs::StdRng::seed_from_u64(1)
        };
        let mut stats = crate::game::RunStats::default();
        let mut shared = crate::game::SceneShared::default();
        let mut physics = crate::game::CollisionEngine::new();
        let mut pending = crate::game::registry::PendingQueues::default();
        let mut ctx = TickCtx {
            input: &input,
            config: &config,
            rng: &mut rng,
            stats: &mut stats,
            shared: &mut shared,
            physics: &mut physics,
            pending: &mut pending,
        };

        let bullet = Bullet::from_enemy(vec2(0.0, 0.0), vec2(-90.0, 0.0), 2.0);
        let handle: crate::game::EntityRef = bullet.clone();
        bullet.borrow_mut().ready(&mut ctx, Rc::downgrade(&handle));

        let owner = Rc::downgrade(&handle);
        let enemy_body = PhysicsBody::new(BodyTag::Enemy, owner.clone(), Rect::new(0.0, 0.0, 16.0, 16.0));
        bullet.borrow_mut().on_collide(&mut ctx, &enemy_body.borrow());
        assert!(!bullet.borrow().spent);

        let player_body = PhysicsBody::new(BodyTag::Player, owner, Rect::new(0.0, 0.0, 16.0, 16.0));
        bullet.borrow_mut().on_collide(&mut ctx, &player_body.borrow());
        assert!(bullet.borrow().spent);
    }
}
