//! Entity lifecycle primitives
//!
//! Every simulated object implements [`Entity`]. An entity is constructed
//! detached, handed to the stage's spawn queue, and only joins the live
//! sequence at the next resolution phase. While live, an entity's slot is
//! always a mirror of its position in the live sequence, which gives O(1)
//! self-identification for deletion requests.
//!
//! Entities are shared handles: the stage owns the live sequence, while
//! scenes and spawners may hold extra handles (score label, player,
//! bookkeeping lists) and physics bodies hold a weak back-reference to
//! their owner.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::context::TickCtx;
use super::physics::PhysicsBody;
use crate::gfx::RenderCtx;

/// Shared handle to an entity in (or headed for) the live sequence.
pub type EntityRef = Rc<RefCell<dyn Entity>>;

/// Non-owning entity handle, used for back-references and bookkeeping.
pub type EntityWeak = Weak<RefCell<dyn Entity>>;

/// Position of an entity or physics body in its owner's live sequence.
///
/// `Detached` covers both "not yet registered" and "pending removal":
/// the compaction pass drops every detached entry it finds, so a single
/// marker serves both meanings without a signed sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    /// Registered at this index of the live sequence.
    Live(usize),
    /// Not registered, or queued for removal at the next resolution phase.
    #[default]
    Detached,
}

impl Slot {
    /// The live index, if any.
    pub fn index(self) -> Option<usize> {
        match self {
            Slot::Live(i) => Some(i),
            Slot::Detached => None,
        }
    }

    pub fn is_live(self) -> bool {
        matches!(self, Slot::Live(_))
    }
}

/// State every entity carries: slot identity and the render gate.
#[derive(Debug, Clone, Copy)]
pub struct EntityBase {
    pub slot: Slot,
    pub visible: bool,
}

impl EntityBase {
    pub fn new() -> Self {
        Self {
            slot: Slot::Detached,
            visible: true,
        }
    }
}

impl Default for EntityBase {
    fn default() -> Self {
        Self::new()
    }
}

/// A unit of simulation with identity, lifecycle hooks and a render hook.
///
/// Hooks are invoked by the stage in a fixed per-tick order; all structural
/// mutation requested from inside a hook (spawning, despawning, body
/// registration) goes through [`TickCtx`] queues and is applied at the next
/// resolution phase, never mid-iteration.
pub trait Entity {
    fn base(&self) -> &EntityBase;
    fn base_mut(&mut self) -> &mut EntityBase;

    fn slot(&self) -> Slot {
        self.base().slot
    }

    fn set_slot(&mut self, slot: Slot) {
        self.base_mut().slot = slot;
    }

    fn visible(&self) -> bool {
        self.base().visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.base_mut().visible = visible;
    }

    /// One-time initialization, fired on the first tick the entity is live.
    /// Physics-body registration and randomized per-instance parameters
    /// belong here; `this` is a weak handle to the entity itself for body
    /// back-references.
    fn ready(&mut self, _ctx: &mut TickCtx, _this: EntityWeak) {}

    /// Per-tick simulation step.
    fn update(&mut self, _ctx: &mut TickCtx, _dt: f32) {}

    /// Draw the entity. Only called while the `visible` gate is set.
    fn render(&self, _gfx: &RenderCtx) {}

    /// Collision response. `other` names the body this entity's own body
    /// overlapped; each side of an overlapping pair receives its own
    /// invocation, so responses can be asymmetric.
    fn on_collide(&mut self, _ctx: &mut TickCtx, _other: &PhysicsBody) {}
}
