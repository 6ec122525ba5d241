//! Runtime core
//!
//! The deferred entity lifecycle model and the broad-phase collision
//! engine, driven once per frame by the director:
//!
//! - Entity: unit of simulation with slot identity and lifecycle hooks
//! - PhysicsBody + CollisionEngine: AABB broad phase with per-owner
//!   collision callbacks
//! - Stage: the live entity sequence and its four-phase tick
//! - Director: one active scene, transitions applied at tick boundaries
//!
//! All structural mutation is queued and applied at fixed resolution
//! phases; nothing mutates a live sequence while it is being iterated.

pub mod context;
pub mod director;
pub mod entity;
pub mod physics;
pub mod registry;

pub use context::{Env, GameContext, RunStats, SceneShared, TickCtx};
pub use director::{Director, Scene};
pub use entity::{Entity, EntityBase, EntityRef, EntityWeak, Slot};
pub use physics::{BodyRef, BodyTag, CollisionEngine, PhysicsBody};
pub use registry::Stage;
