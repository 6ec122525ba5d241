//! Scene direction
//!
//! Exactly one scene is active at a time. A requested transition is
//! buffered and applied at the start of the next tick: the old scene's
//! stage is torn down completely (entities, queues, physics bodies), then
//! the new scene populates a fresh stage. No entity ever observes a
//! half-torn-down or half-built scene during its own update.

use macroquad::logging::info;

use super::context::Env;
use super::registry::Stage;
use crate::gfx::RenderCtx;

/// A screen of the game: the title, or a run of the level.
///
/// `start` populates the stage; `update` runs scene-level logic after the
/// stage's own tick and may return the next scene to transition to.
pub trait Scene {
    /// Short name for the log.
    fn name(&self) -> &'static str;

    fn start(&mut self, stage: &mut Stage, env: &mut Env<'_>);

    fn update(&mut self, stage: &mut Stage, env: &mut Env<'_>, dt: f32) -> Option<Box<dyn Scene>>;
}

/// Owns the stage and the active scene, and applies buffered transitions
/// at the only safe point: before anything in the tick has run.
pub struct Director {
    stage: Stage,
    scene: Option<Box<dyn Scene>>,
    pending: Option<Box<dyn Scene>>,
}

impl Director {
    /// The initial scene starts on the first tick, like any other
    /// transition.
    pub fn new(initial: Box<dyn Scene>) -> Self {
        Self {
            stage: Stage::new(),
            scene: None,
            pending: Some(initial),
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Run one tick: resolve a buffered transition, tick the stage, then
    /// run scene-level logic (which may buffer the next transition).
    pub fn update(&mut self, env: &mut Env<'_>, dt: f32) {
        if let Some(mut next) = self.pending.take() {
            self.stage.clear();
            env.shared.reset();
            info!("scene transition: {}", next.name());
            next.start(&mut self.stage, env);
            self.scene = Some(next);
        }

        self.stage.update(env, dt);

        if let Some(scene) = self.scene.as_mut() {
            if let Some(next) = scene.update(&mut self.stage, env, dt) {
                self.pending = Some(next);
            }
        }
    }

    pub fn render(&self, gfx: &RenderCtx) {
        self.stage.render(gfx);
    }
}
