//! tilehop - deterministic simulation core for a tile-based 2D platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, pools, game state)
//! - `audio`: Sound vocabulary + trigger sink the sim calls through
//! - `input`: Per-tick input snapshot
//!
//! Rendering, input capture and audio playback are external collaborators:
//! they consume the state this crate produces and feed it `TickInput`
//! snapshots at a fixed tick.

pub mod audio;
pub mod input;
pub mod sim;

pub use audio::{AudioSink, NullAudio, Sound};
pub use input::TickInput;

/// Game configuration constants
///
/// All times are in milliseconds, all lengths in tiles, all speeds in
/// tiles per second (physics formulas divide dt by 1000).
pub mod consts {
    /// Fixed simulation tick rate
    pub const TICK_HZ: f32 = 500.0;
    /// Fixed simulation timestep in milliseconds
    pub const TICK_DT_MS: f32 = 1000.0 / TICK_HZ;
    /// Frames longer than this are discarded by the driver (tab suspend etc.)
    pub const MAX_FRAME_DT_MS: f32 = 100.0;

    /// Tile edge length (world unit)
    pub const TILE_SIZE: f32 = 1.0;

    /// Player bounding box
    pub const PLAYER_WIDTH: f32 = 0.8;
    pub const PLAYER_HEIGHT: f32 = 1.2;

    /// Player motion
    pub const GRAVITY: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 8.0;
    pub const JUMP_STRENGTH: f32 = 20.0;
    pub const MAX_FALL_SPEED: f32 = 20.0;
    /// Grace window after leaving ground (or wall) during which a jump still fires
    pub const COYOTE_TIME_MS: f32 = 75.0;
    /// Grace window before landing during which an early jump press is honored
    pub const JUMP_BUFFER_MS: f32 = 250.0;
    /// Fall-speed cap while pressing into a wall
    pub const WALL_SLIDE_MAX_SPEED: f32 = 4.0;
    /// Horizontal momentum imparted by a wall jump
    pub const WALL_JUMP_MOMENTUM: f32 = 2500.0;
    /// Momentum below this snaps to exactly zero
    pub const MOMENTUM_STOP: f32 = 0.01;
    /// Momentum decay lerp factor (scaled by dt²)
    pub const MOMENTUM_EASE: f32 = 0.0125;
    /// Landing faster than this triggers the land sound/squash/particles
    pub const LAND_SOUND_THRESHOLD: f32 = -5.0;
    pub const LAND_SQUASH: f32 = 0.25;
    pub const JUMP_STRETCH: f32 = 0.25;

    /// Interval blocks toggle phase every this many ms of sim time
    pub const INTERVAL_PHASE_MS: f64 = 1000.0;

    /// Cannons
    pub const CANNON_SPAWN_HZ: f32 = 0.5;
    pub const CANNON_BALL_SPEED: f32 = 8.0;
    pub const CANNON_BALL_RADIUS: f32 = (TILE_SIZE / 2.0) * 0.9;
    pub const MAX_CANNON_BALLS: usize = 500;

    /// Turrets
    pub const TURRET_SPAWN_HZ: f32 = 1.0;
    pub const TURRET_BULLET_SPEED: f32 = 12.0;
    pub const MAX_TURRET_BULLETS: usize = 500;

    /// Cannonball trail particles
    pub const TRAIL_SPAWN_HZ: f32 = 30.0;
    pub const TRAIL_LIFETIME_MS: f32 = 300.0;
    pub const MAX_TRAIL_PARTICLES: usize = 1000;

    /// Lava
    pub const LAVA_SPAWN_HZ: f32 = 20.0;
    pub const LAVA_PARTICLE_LIFETIME_MS: f32 = 500.0;
    pub const MAX_LAVA_PARTICLES: usize = 1000;
    /// Inward margin that forgives grazing contact with lava
    pub const LAVA_LENIENCY: f32 = 0.2;

    /// Cannonball explosions
    pub const EXPLOSION_PARTICLE_LIFETIME_MS: f32 = 1000.0;
    pub const EXPLOSION_PARTICLE_COUNT: usize = 10;
    pub const MAX_EXPLOSION_PARTICLES: usize = 1000;

    /// Player movement particles
    pub const MAX_PLAYER_PARTICLES: usize = 1000;
    pub const WALK_PARTICLE_HZ: f32 = 15.0;
    pub const PLAYER_PARTICLE_LIFETIME_MS: f32 = 500.0;

    /// Level flow
    /// Falling below this y counts as leaving the level
    pub const KILL_PLANE_Y: f32 = -20.0;

    pub const TIME_TO_RESET_AFTER_DEATH_MS: f32 = 1000.0;
    pub const WIN_TRANSITION_MS: f32 = 1000.0;
    /// Flood-fill cap for the background cache
    pub const BACKGROUND_LIMIT: usize = 10_000;
}

/// Lerp `from` toward `to` by `ratio`
#[inline]
pub fn animate(from: f32, to: f32, ratio: f32) -> f32 {
    from * (1.0 - ratio) + ratio * to
}

/// Fixed-timestep accumulator for the external frame loop.
///
/// The driver feeds variable frame times in; the sim is stepped a whole
/// number of fixed ticks. Implausibly long frames (tab suspend) are
/// discarded outright rather than drained.
#[derive(Debug, Clone, Default)]
pub struct Stepper {
    accumulator_ms: f32,
}

impl Stepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate one frame and return how many fixed ticks to run.
    pub fn advance(&mut self, frame_dt_ms: f32) -> u32 {
        if frame_dt_ms > consts::MAX_FRAME_DT_MS {
            return 0;
        }
        self.accumulator_ms += frame_dt_ms;
        let mut ticks = 0;
        while self.accumulator_ms > consts::TICK_DT_MS {
            self.accumulator_ms -= consts::TICK_DT_MS;
            ticks += 1;
        }
        ticks
    }
}
