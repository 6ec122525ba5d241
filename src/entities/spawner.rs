//! Enemy spawner
//!
//! Invisible pacing entity. Counts down a jittered interval, rolls a spawn
//! point inside the configured off-screen area and an enemy variant, and
//! keeps a weak bookkeeping list of everything it has spawned. The list
//! never keeps an enemy alive; dead entries are pruned every tick.

use std::cell::RefCell;
use std::rc::Rc;

use macroquad::prelude::{vec2, Vec2};
use rand::rngs::StdRng;
use rand::Rng;

use super::enemies::{Flappy, Swoopy};
use crate::config::SpawnerConfig;
use crate::game::{Entity, EntityBase, EntityRef, EntityWeak, TickCtx};

pub struct EnemySpawner {
    base: EntityBase,
    cooldown: f32,
    children: Vec<EntityWeak>,
}

impl EnemySpawner {
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            base: EntityBase {
                visible: false,
                ..EntityBase::new()
            },
            cooldown: 0.0,
            children: Vec::new(),
        }))
    }

    /// Live spawned enemies, for tests and debugging overlays.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// Uniform point inside the spawn area.
fn roll_position(rng: &mut StdRng, config: &SpawnerConfig) -> Vec2 {
    let area = config.spawn_area;
    vec2(
        rng.gen_range(area.x..=area.x + area.w),
        rng.gen_range(area.y..=area.y + area.h),
    )
}

/// Pick a variant for the next spawn. Orbiters are twice as common as the
/// fast straight-liners.
fn roll_enemy(rng: &mut StdRng, pos: Vec2) -> EntityRef {
    if rng.gen_range(0..3) < 2 {
        Flappy::new(pos)
    } else {
        Swoopy::new(pos)
    }
}

impl Entity for EnemySpawner {
    fn base(&self) -> &EntityBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut EntityBase {
        &mut self.base
    }

    fn ready(&mut self, ctx: &mut TickCtx, _this: EntityWeak) {
        self.cooldown = ctx.config.spawner.interval;
    }

    fn update(&mut self, ctx: &mut TickCtx, dt: f32) {
        self.children
            .retain(|child| child.upgrade().map_or(false, |e| e.borrow().slot().is_live()));

        self.cooldown -= dt;
        if self.cooldown <= 0.0 {
            let pos = roll_position(ctx.rng, &ctx.config.spawner);
            let enemy = roll_enemy(ctx.rng, pos);
            self.children.push(Rc::downgrade(&enemy));
            ctx.spawn(enemy);

            let jitter = ctx.config.spawner.jitter;
            self.cooldown = ctx.config.spawner.interval
                + if jitter > 0.0 {
                    ctx.rng.gen_range(0.0..jitter)
                } else {
                    0.0
                };
        }
    }
}
