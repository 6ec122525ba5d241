//! Broad-phase collision engine
//!
//! Owns the set of live physics bodies. Each tick it resolves its deferred
//! spawn/delete queues, then runs the all-pairs AABB overlap test. There is
//! no spatial partitioning - object counts are small and O(n^2) is by
//! design.
//!
//! Overlap pairs are reported in both orders: for an overlapping pair
//! (a, b) the contact list contains one entry for a's owner naming b and
//! one for b's owner naming a. Responses are per-variant and asymmetric
//! (a bullet disables itself while the thing it hit runs its own logic),
//! so the double dispatch is intentional and never deduplicated.

use std::cell::RefCell;
use std::rc::Rc;

use macroquad::prelude::{Rect, Vec2};

use super::entity::{EntityWeak, Slot};

/// Shared handle to a physics body. The engine tracks the live set; the
/// owning entity keeps a handle so it can write the body's position every
/// tick and enqueue its deletion.
pub type BodyRef = Rc<RefCell<PhysicsBody>>;

/// Collision category, fixed when the body is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyTag {
    Player,
    Enemy,
    PlayerBullet,
    EnemyBullet,
}

/// Axis-aligned rectangle bound to an owning entity.
///
/// The engine never mutates body geometry; the owning entity writes the
/// rect every tick from its own update.
pub struct PhysicsBody {
    pub slot: Slot,
    pub tag: BodyTag,
    pub rect: Rect,
    pub owner: EntityWeak,
}

impl PhysicsBody {
    pub fn new(tag: BodyTag, owner: EntityWeak, rect: Rect) -> BodyRef {
        Rc::new(RefCell::new(Self {
            slot: Slot::Detached,
            tag,
            rect,
            owner,
        }))
    }

    /// Move the body's top-left corner, keeping its extents.
    pub fn set_pos(&mut self, pos: Vec2) {
        self.rect.x = pos.x;
        self.rect.y = pos.y;
    }
}

/// An ordered overlap event: `owner` is the entity whose body observed the
/// overlap, `other` the body it overlapped.
pub struct Contact {
    pub owner: EntityWeak,
    pub other: BodyRef,
}

/// Deferred-queue broad-phase engine. Queues are resolved only at the start
/// of `update`, so callbacks that enqueue deletions mid-tick can never
/// invalidate the list being tested.
#[derive(Default)]
pub struct CollisionEngine {
    bodies: Vec<BodyRef>,
    spawn_queue: Vec<BodyRef>,
    delete_queue: Vec<BodyRef>,
}

impl CollisionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a body for activation at the next resolution phase.
    pub fn queue_spawn(&mut self, body: BodyRef) {
        self.spawn_queue.push(body);
    }

    /// Enqueue a body for removal at the next resolution phase.
    pub fn queue_delete(&mut self, body: BodyRef) {
        self.delete_queue.push(body);
    }

    pub fn bodies(&self) -> &[BodyRef] {
        &self.bodies
    }

    /// Resolve pending deletes and spawns, then run the all-pairs overlap
    /// test. Returns the ordered contact list for the stage to dispatch.
    pub fn update(&mut self) -> Vec<Contact> {
        self.resolve_deletes();
        self.resolve_spawns();
        self.collect_contacts()
    }

    /// Drop every entity/body association. Used at scene teardown.
    pub fn clear(&mut self) {
        for body in &self.bodies {
            body.borrow_mut().slot = Slot::Detached;
        }
        self.bodies.clear();
        self.spawn_queue.clear();
        self.delete_queue.clear();
    }

    fn resolve_deletes(&mut self) {
        if self.delete_queue.is_empty() {
            return;
        }
        for body in self.delete_queue.drain(..) {
            body.borrow_mut().slot = Slot::Detached;
        }
        let mut i = 0;
        while i < self.bodies.len() {
            // Drain runs of consecutive detached entries before renumbering
            // the survivor at this cursor.
            while i < self.bodies.len() && !self.bodies[i].borrow().slot.is_live() {
                self.bodies.remove(i);
            }
            if i < self.bodies.len() {
                self.bodies[i].borrow_mut().slot = Slot::Live(i);
                i += 1;
            }
        }
    }

    fn resolve_spawns(&mut self) {
        for body in self.spawn_queue.drain(..) {
            body.borrow_mut().slot = Slot::Live(self.bodies.len());
            self.bodies.push(body);
        }
    }

    fn collect_contacts(&self) -> Vec<Contact> {
        let mut contacts = Vec::new();
        for (i, a) in self.bodies.iter().enumerate() {
            for (j, b) in self.bodies.iter().enumerate() {
                if i == j {
                    continue;
                }
                if overlaps(a.borrow().rect, b.borrow().rect) {
                    contacts.push(Contact {
                        owner: a.borrow().owner.clone(),
                        other: Rc::clone(b),
                    });
                }
            }
        }
        contacts
    }
}

/// AABB overlap, inclusive on both ends of both axes: touching edges count.
pub fn overlaps(a: Rect, b: Rect) -> bool {
    let x = (a.x >= b.x && a.x <= b.x + b.w) || (b.x >= a.x && b.x <= a.x + a.w);
    let y = (a.y >= b.y && a.y <= b.y + b.h) || (b.y >= a.y && b.y <= a.y + a.h);
    x && y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::{Entity, EntityBase, EntityRef};

    struct Dummy {
        base: EntityBase,
    }

    impl Entity for Dummy {
        fn base(&self) -> &EntityBase {
            &self.base
        }
        fn base_mut(&mut self) -> &mut EntityBase {
            &mut self.base
        }
    }

    fn dummy_owner() -> EntityRef {
        Rc::new(RefCell::new(Dummy {
            base: EntityBase::new(),
        }))
    }

    fn body_at(tag: BodyTag, owner: &EntityRef, x: f32, y: f32) -> BodyRef {
        PhysicsBody::new(tag, Rc::downgrade(owner), Rect::new(x, y, 16.0, 16.0))
    }

    #[test]
    fn test_spawn_assigns_slots_in_order() {
        let owner = dummy_owner();
        let mut engine = CollisionEngine::new();
        for i in 0..3 {
            engine.queue_spawn(body_at(BodyTag::Enemy, &owner, i as f32 * 100.0, 0.0));
        }
        engine.update();

        assert_eq!(engine.bodies().len(), 3);
        for (i, body) in engine.bodies().iter().enumerate() {
            assert_eq!(body.borrow().slot, Slot::Live(i));
        }
    }

    #[test]
    fn test_compaction_survives_consecutive_deletes() {
        let owner = dummy_owner();
        let mut engine = CollisionEngine::new();
        let bodies: Vec<BodyRef> = (0..5)
            .map(|i| body_at(BodyTag::Enemy, &owner, i as f32 * 100.0, 0.0))
            .collect();
        for body in &bodies {
            engine.queue_spawn(Rc::clone(body));
        }
        engine.update();

        // Delete a run of three consecutive entries plus the last one.
        for body in [&bodies[1], &bodies[2], &bodies[3], &bodies[4]] {
            engine.queue_delete(Rc::clone(body));
        }
        engine.update();

        assert_eq!(engine.bodies().len(), 1);
        assert_eq!(engine.bodies()[0].borrow().slot, Slot::Live(0));
        assert_eq!(engine.bodies()[0].borrow().rect.x, 0.0);
        for body in &bodies[1..] {
            assert_eq!(body.borrow().slot, Slot::Detached);
        }
    }

    #[test]
    fn test_deleted_body_stays_until_next_update() {
        let owner = dummy_owner();
        let mut engine = CollisionEngine::new();
        let body = body_at(BodyTag::PlayerBullet, &owner, 0.0, 0.0);
        engine.queue_spawn(Rc::clone(&body));
        engine.update();

        // Deleting mid-tick only queues; the live set is untouched until
        // the next resolution phase.
        engine.queue_delete(Rc::clone(&body));
        assert_eq!(engine.bodies().len(), 1);
        assert!(body.borrow().slot.is_live());

        engine.update();
        assert!(engine.bodies().is_empty());
        assert_eq!(body.borrow().slot, Slot::Detached);
    }

    #[test]
    fn test_overlapping_pair_reports_both_orders() {
        let owner_a = dummy_owner();
        let owner_b = dummy_owner();
        let mut engine = CollisionEngine::new();
        let a = body_at(BodyTag::PlayerBullet, &owner_a, 0.0, 0.0);
        let b = body_at(BodyTag::Enemy, &owner_b, 8.0, 8.0);
        engine.queue_spawn(Rc::clone(&a));
        engine.queue_spawn(Rc::clone(&b));

        let contacts = engine.update();
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].other.borrow().tag, BodyTag::Enemy);
        assert_eq!(contacts[1].other.borrow().tag, BodyTag::PlayerBullet);
        assert!(Rc::ptr_eq(&contacts[0].owner.upgrade().unwrap(), &owner_a));
        assert!(Rc::ptr_eq(&contacts[1].owner.upgrade().unwrap(), &owner_b));
    }

    #[test]
    fn test_separated_pair_reports_nothing() {
        let owner = dummy_owner();
        let mut engine = CollisionEngine::new();
        engine.queue_spawn(body_at(BodyTag::Player, &owner, 0.0, 0.0));
        engine.queue_spawn(body_at(BodyTag::Enemy, &owner, 100.0, 100.0));
        assert!(engine.update().is_empty());
    }

    #[test]
    fn test_overlap_edges_are_inclusive() {
        let a = Rect::new(0.0, 0.0, 16.0, 16.0);
        // Touching on the right edge.
        assert!(overlaps(a, Rect::new(16.0, 0.0, 16.0, 16.0)));
        // Touching on the bottom edge.
        assert!(overlaps(a, Rect::new(0.0, 16.0, 16.0, 16.0)));
        // One pixel past: separated.
        assert!(!overlaps(a, Rect::new(16.5, 0.0, 16.0, 16.0)));
        assert!(!overlaps(a, Rect::new(0.0, 16.5, 16.0, 16.0)));
        // Containment counts in both orders.
        let small = Rect::new(4.0, 4.0, 2.0, 2.0);
        assert!(overlaps(a, small));
        assert!(overlaps(small, a));
    }
}
