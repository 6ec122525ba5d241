//! Entity variants
//!
//! Concrete game objects built on the runtime core. Constructors return
//! shared handles ready to hand to `Stage::spawn`; physics bodies and
//! randomized per-instance tuning are set up in each variant's `ready`.

pub mod background;
pub mod bullet;
pub mod enemies;
pub mod explosion;
pub mod label;
pub mod player;
pub mod spawner;

pub use background::Background;
pub use bullet::Bullet;
pub use enemies::{Flappy, Swoopy};
pub use explosion::Explosion;
pub use label::Label;
pub use player::Player;
pub use spawner::EnemySpawner;
