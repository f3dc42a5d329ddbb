//! Real-time combat core for a top-down action game.
//!
//! The crate advances projectiles, enemy state machines and the contact
//! pass one frame at a time through [`world::CombatWorld::tick`]. Drawing,
//! input and level loading live outside; they talk to the core through
//! [`player::PlayerTarget`], the render keys in [`world::FrameView`] and the
//! spawn commands on `CombatWorld`.

pub mod camera;
pub mod capability;
pub mod clock;
pub mod collision;
pub mod config;
pub mod direction;
pub mod enemy;
pub mod error;
pub mod hitbox;
pub mod obstacle;
pub mod player;
pub mod projectile;
pub mod random;
pub mod sight;
pub mod steering;
pub mod vector;
pub mod world;

pub use config::CombatConfig;
pub use error::{ConfigError, ConfigResult};
pub use world::{CombatWorld, FrameView, RenderItem};
