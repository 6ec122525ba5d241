//! The stage: entity registry and per-tick driver
//!
//! Owns the live entity sequence and the collision engine, and runs one
//! tick as a fixed sequence of passes:
//!
//! 1. collision engine update (its own delete/spawn resolution, then the
//!    all-pairs test) and contact dispatch,
//! 2. delete pass - queued slots are detached, then one compaction pass
//!    renumbers the survivors,
//! 3. spawn pass - queued entities join the end of the live sequence,
//! 4. ready pass - one-time initialization for everything just spawned,
//! 5. update pass over every live entity.
//!
//! Rendering is a separate full pass so that an entity spawned during
//! another's update can never render a frame early or be skipped.
//!
//! Entities may call `spawn`/`despawn` from inside their own `update` or
//! `on_collide`; those requests only touch the pending queues, so every
//! entity observes a stable, fully-indexed live sequence during its own
//! update.

use std::rc::Rc;

use super::context::{Env, TickCtx};
use super::entity::{EntityRef, Slot};
use super::physics::CollisionEngine;
use crate::gfx::RenderCtx;

/// Entity spawn/delete requests waiting for the next resolution phase.
/// Deletions are recorded as slot indices: a live entity's slot mirrors its
/// index, and indices stay valid until the next delete pass because
/// compaction only happens there and spawns only append.
#[derive(Default)]
pub struct PendingQueues {
    pub(crate) spawn: Vec<EntityRef>,
    pub(crate) delete: Vec<usize>,
}

#[derive(Default)]
pub struct Stage {
    entities: Vec<EntityRef>,
    pending: PendingQueues,
    ready_queue: Vec<EntityRef>,
    physics: CollisionEngine,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an entity for activation at the next resolution phase.
    pub fn spawn(&mut self, entity: EntityRef) {
        self.pending.spawn.push(entity);
    }

    /// Mark the entity at `slot` for removal at the next resolution phase.
    pub fn despawn(&mut self, slot: Slot) {
        if let Some(index) = slot.index() {
            self.pending.delete.push(index);
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[EntityRef] {
        &self.entities
    }

    pub fn physics(&self) -> &CollisionEngine {
        &self.physics
    }

    /// Run one tick.
    pub fn update(&mut self, env: &mut Env<'_>, dt: f32) {
        let contacts = self.physics.update();

        let Self {
            entities,
            pending,
            ready_queue,
            physics,
        } = self;
        let mut ctx = TickCtx {
            input: env.input,
            config: env.config,
            rng: &mut *env.rng,
            stats: &mut *env.stats,
            shared: &mut *env.shared,
            physics,
            pending,
        };

        // Contact dispatch. Owners deleted by an earlier contact's callback
        // are still live here (removal is queued, not applied); owners torn
        // down with their scene fail the upgrade and are skipped.
        for contact in &contacts {
            if let Some(owner) = contact.owner.upgrade() {
                owner.borrow_mut().on_collide(&mut ctx, &contact.other.borrow());
            }
        }

        // Delete pass: detach every queued slot, then compact once. The
        // inner loop drains runs of consecutive detached entries before the
        // survivor at the cursor is renumbered.
        if !ctx.pending.delete.is_empty() {
            for index in ctx.pending.delete.drain(..) {
                if let Some(entity) = entities.get(index) {
                    entity.borrow_mut().set_slot(Slot::Detached);
                }
            }
            let mut i = 0;
            while i < entities.len() {
                while i < entities.len() && !entities[i].borrow().slot().is_live() {
                    entities.remove(i);
                }
                if i < entities.len() {
                    entities[i].borrow_mut().set_slot(Slot::Live(i));
                    i += 1;
                }
            }
        }

        // Spawn pass: append, assign the mirrored slot, queue for ready.
        for entity in ctx.pending.spawn.drain(..) {
            entity.borrow_mut().set_slot(Slot::Live(entities.len()));
            entities.push(Rc::clone(&entity));
            ready_queue.push(entity);
        }

        // Ready pass: fires exactly once per entity.
        for entity in ready_queue.drain(..) {
            let this = Rc::downgrade(&entity);
            entity.borrow_mut().ready(&mut ctx, this);
        }

        // Update pass. Spawns and despawns requested here land in the
        // pending queues and resolve next tick.
        for entity in entities.iter() {
            entity.borrow_mut().update(&mut ctx, dt);
        }
    }

    /// Render every visible entity, in live-sequence order.
    pub fn render(&self, gfx: &RenderCtx) {
        for entity in &self.entities {
            let entity = entity.borrow();
            if entity.visible() {
                entity.render(gfx);
            }
        }
    }

    /// Tear down the whole stage: every entity, queue and physics body.
    /// Used when a scene ends.
    pub fn clear(&mut self) {
        for entity in &self.entities {
            entity.borrow_mut().set_slot(Slot::Detached);
        }
        self.entities.clear();
        self.pending.spawn.clear();
        self.pending.delete.clear();
        self.ready_queue.clear();
        self.physics.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::context::GameContext;
    use crate::game::entity::{Entity, EntityBase, EntityWeak};
    use crate::game::physics::{BodyRef, BodyTag, PhysicsBody};
    use crate::config::GameConfig;
    use crate::input::InputSnapshot;
    use crate::save::SaveSlot;
    use macroquad::prelude::{vec2, Rect, Vec2};
    use std::cell::RefCell;

    fn test_context() -> GameContext {
        GameContext::new(GameConfig::default(), SaveSlot::new("save/test.ron"), 7)
    }

    fn tick(stage: &mut Stage, gc: &mut GameContext, dt: f32) {
        let input = InputSnapshot::default();
        let mut env = gc.env(&input);
        stage.update(&mut env, dt);
    }

    #[derive(Default)]
    struct Probe {
        base: EntityBase,
        ready_count: u32,
        update_count: u32,
        spawn_child_on_update: bool,
        despawn_self_at_update: Option<u32>,
    }

    impl Entity for Probe {
        fn base(&self) -> &EntityBase {
            &self.base
        }
        fn base_mut(&mut self) -> &mut EntityBase {
            &mut self.base
        }
        fn ready(&mut self, _ctx: &mut TickCtx, _this: EntityWeak) {
            self.ready_count += 1;
        }
        fn update(&mut self, ctx: &mut TickCtx, _dt: f32) {
            self.update_count += 1;
            if self.spawn_child_on_update {
                self.spawn_child_on_update = false;
                ctx.spawn(Rc::new(RefCell::new(Probe::default())));
            }
            if self.despawn_self_at_update == Some(self.update_count) {
                ctx.despawn(self.slot());
            }
        }
    }

    #[test]
    fn test_spawn_assigns_mirrored_slots() {
        let mut gc = test_context();
        let mut stage = Stage::new();
        let probes: Vec<Rc<RefCell<Probe>>> = (0..3)
            .map(|_| Rc::new(RefCell::new(Probe::default())))
            .collect();
        for probe in &probes {
            stage.spawn(probe.clone());
        }
        assert!(stage.is_empty());

        tick(&mut stage, &mut gc, 0.1);
        assert_eq!(stage.len(), 3);
        for (i, probe) in probes.iter().enumerate() {
            assert_eq!(probe.borrow().slot(), Slot::Live(i));
        }
    }

    #[test]
    fn test_ready_fires_exactly_once_on_next_tick() {
        let mut gc = test_context();
        let mut stage = Stage::new();
        let probe = Rc::new(RefCell::new(Probe::default()));
        stage.spawn(probe.clone());
        assert_eq!(probe.borrow().ready_count, 0);

        tick(&mut stage, &mut gc, 0.1);
        assert_eq!(probe.borrow().ready_count, 1);

        for _ in 0..5 {
            tick(&mut stage, &mut gc, 0.1);
        }
        assert_eq!(probe.borrow().ready_count, 1);
    }

    #[test]
    fn test_compaction_renumbers_after_consecutive_deletes() {
        let mut gc = test_context();
        let mut stage = Stage::new();
        let probes: Vec<Rc<RefCell<Probe>>> = (0..5)
            .map(|_| Rc::new(RefCell::new(Probe::default())))
            .collect();
        for probe in &probes {
            stage.spawn(probe.clone());
        }
        tick(&mut stage, &mut gc, 0.1);

        // A run of three consecutive slots goes away at once.
        for i in 1..=3 {
            stage.despawn(Slot::Live(i));
        }
        tick(&mut stage, &mut gc, 0.1);

        assert_eq!(stage.len(), 2);
        assert_eq!(probes[0].borrow().slot(), Slot::Live(0));
        assert_eq!(probes[4].borrow().slot(), Slot::Live(1));
        for probe in &probes[1..=3] {
            assert_eq!(probe.borrow().slot(), Slot::Detached);
        }
        // Every survivor's slot mirrors its index.
        for (i, entity) in stage.entities().iter().enumerate() {
            assert_eq!(entity.borrow().slot(), Slot::Live(i));
        }
    }

    #[test]
    fn test_update_time_spawn_is_deferred_one_tick() {
        let mut gc = test_context();
        let mut stage = Stage::new();
        let parent = Rc::new(RefCell::new(Probe {
            spawn_child_on_update: true,
            ..Probe::default()
        }));
        stage.spawn(parent.clone());

        // Tick 1: parent goes live and spawns a child from inside its
        // update; the live sequence must not change until next tick.
        tick(&mut stage, &mut gc, 0.1);
        assert_eq!(stage.len(), 1);

        tick(&mut stage, &mut gc, 0.1);
        assert_eq!(stage.len(), 2);
    }

    #[test]
    fn test_update_time_despawn_is_deferred_one_tick() {
        let mut gc = test_context();
        let mut stage = Stage::new();
        let probe = Rc::new(RefCell::new(Probe {
            despawn_self_at_update: Some(2),
            ..Probe::default()
        }));
        stage.spawn(probe.clone());

        tick(&mut stage, &mut gc, 0.1); // update #1
        tick(&mut stage, &mut gc, 0.1); // update #2 queues the despawn
        assert_eq!(stage.len(), 1);
        tick(&mut stage, &mut gc, 0.1);
        assert!(stage.is_empty());
        assert_eq!(probe.borrow().slot(), Slot::Detached);
        // The entity never updated again after queueing its own removal.
        assert_eq!(probe.borrow().update_count, 2);
    }

    /// Entity with a physics body that records every collision callback.
    struct Collider {
        base: EntityBase,
        tag: BodyTag,
        pos: Vec2,
        body: Option<BodyRef>,
        hits: Vec<BodyTag>,
    }

    impl Collider {
        fn new(tag: BodyTag, pos: Vec2) -> Rc<RefCell<Self>> {
            Rc::new(RefCell::new(Self {
                base: EntityBase::new(),
                tag,
                pos,
                body: None,
                hits: Vec::new(),
            }))
        }
    }

    impl Entity for Collider {
        fn base(&self) -> &EntityBase {
            &self.base
        }
        fn base_mut(&mut self) -> &mut EntityBase {
            &mut self.base
        }
        fn ready(&mut self, ctx: &mut TickCtx, this: EntityWeak) {
            let body = PhysicsBody::new(self.tag, this, Rect::new(self.pos.x, self.pos.y, 16.0, 16.0));
            ctx.physics.queue_spawn(Rc::clone(&body));
            self.body = Some(body);
        }
        fn on_collide(&mut self, _ctx: &mut TickCtx, other: &PhysicsBody) {
            self.hits.push(other.tag);
        }
    }

    #[test]
    fn test_overlapping_bodies_dispatch_to_both_owners() {
        let mut gc = test_context();
        let mut stage = Stage::new();
        let bullet = Collider::new(BodyTag::PlayerBullet, vec2(0.0, 0.0));
        let enemy = Collider::new(BodyTag::Enemy, vec2(8.0, 8.0));
        stage.spawn(bullet.clone());
        stage.spawn(enemy.clone());

        // Tick 1: entities go live, ready queues their bodies.
        tick(&mut stage, &mut gc, 0.1);
        assert!(bullet.borrow().hits.is_empty());

        // Tick 2: bodies resolve and the pair dispatches in both orders,
        // exactly once per side.
        tick(&mut stage, &mut gc, 0.1);
        assert_eq!(bullet.borrow().hits, vec![BodyTag::Enemy]);
        assert_eq!(enemy.borrow().hits, vec![BodyTag::PlayerBullet]);
    }

    #[test]
    fn test_clear_detaches_everything() {
        let mut gc = test_context();
        let mut stage = Stage::new();
        let collider = Collider::new(BodyTag::Enemy, vec2(0.0, 0.0));
        stage.spawn(collider.clone());
        tick(&mut stage, &mut gc, 0.1);
        tick(&mut stage, &mut gc, 0.1);
        assert_eq!(stage.physics().bodies().len(), 1);

        stage.clear();
        assert!(stage.is_empty());
        assert!(stage.physics().bodies().is_empty());
        assert_eq!(collider.borrow().slot(), Slot::Detached);
    }
}
