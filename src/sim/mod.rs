//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, dt in milliseconds
//! - Seeded RNG only
//! - No wall clock; all timing reads the sim's own `clock_ms`
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod level;
pub mod player;
pub mod pool;
pub mod tick;

pub use camera::Camera;
pub use collision::{Circle, Rect, circle_vs_rect, rect_vs_rect};
pub use level::{
    Dir, Level, LevelEphemeral, LevelStatic, Phase, Tile, TileKey, TileKind, interval_phase_a_on,
};
pub use player::Player;
pub use pool::{Emitter, Particle, Pool, Projectile};
pub use tick::{PlayingState, tick};
