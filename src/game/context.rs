//! Tick context
//!
//! There are no global singletons: everything the sim needs for one tick is
//! carried in explicitly constructed context structs. [`GameContext`] owns
//! the long-lived services (config, RNG, run stats, save slot); [`Env`] is
//! the per-tick borrow of those handed to the director and scenes; the stage
//! extends it with its own queues and collision engine to form [`TickCtx`],
//! the view entity hooks receive.

use macroquad::prelude::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::entity::{EntityRef, Slot};
use super::physics::CollisionEngine;
use super::registry::PendingQueues;
use crate::config::GameConfig;
use crate::input::InputSnapshot;
use crate::save::SaveSlot;

/// Counters for the current run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunStats {
    pub score: u32,
    pub high_score: u32,
}

/// Cross-entity state written by some entities and read by others within
/// the same scene. Reset on every scene transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneShared {
    /// The player's position as of its last update; `None` before the
    /// player is ready and after it dies. Aiming enemies skip their shot
    /// when no position is known.
    pub player_pos: Option<Vec2>,
}

impl SceneShared {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Long-lived services, constructed once per run in `main` and injected
/// everywhere by borrow.
pub struct GameContext {
    pub config: GameConfig,
    pub rng: StdRng,
    pub stats: RunStats,
    pub shared: SceneShared,
    pub save_slot: SaveSlot,
}

impl GameContext {
    pub fn new(config: GameConfig, save_slot: SaveSlot, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            stats: RunStats::default(),
            shared: SceneShared::default(),
            save_slot,
        }
    }

    /// Borrow the per-tick view.
    pub fn env<'a>(&'a mut self, input: &'a InputSnapshot) -> Env<'a> {
        Env {
            input,
            config: &self.config,
            rng: &mut self.rng,
            stats: &mut self.stats,
            shared: &mut self.shared,
            save_slot: &self.save_slot,
        }
    }
}

/// Per-tick borrow of the long-lived services.
pub struct Env<'a> {
    pub input: &'a InputSnapshot,
    pub config: &'a GameConfig,
    pub rng: &'a mut StdRng,
    pub stats: &'a mut RunStats,
    pub shared: &'a mut SceneShared,
    pub save_slot: &'a SaveSlot,
}

/// What entity hooks see: the per-tick services plus the owning stage's
/// deferred queues and collision engine. Spawning and despawning through
/// this context only touches queues; the live sequences change at the next
/// resolution phase.
pub struct TickCtx<'a> {
    pub input: &'a InputSnapshot,
    pub config: &'a GameConfig,
    pub rng: &'a mut StdRng,
    pub stats: &'a mut RunStats,
    pub shared: &'a mut SceneShared,
    pub physics: &'a mut CollisionEngine,
    pub(crate) pending: &'a mut PendingQueues,
}

impl TickCtx<'_> {
    /// Enqueue an entity for activation at the next resolution phase.
    pub fn spawn(&mut self, entity: EntityRef) {
        self.pending.spawn.push(entity);
    }

    /// Mark the entity at `slot` for removal at the next resolution phase.
    /// Detached slots are ignored, so double-despawn is harmless.
    pub fn despawn(&mut self, slot: Slot) {
        if let Some(index) = slot.index() {
            self.pending.delete.push(index);
        }
    }
}
