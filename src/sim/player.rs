//! Player state: kinematics, jump assists and cosmetic particles
//!
//! The player integrates under gravity and carries the bookkeeping the
//! movement assists need: coyote time, the jump buffer, wall-jump momentum
//! and the half-jump flag. Actual movement-and-collision lives in the tick
//! module; this file owns the state plus the per-tick upkeep that does not
//! depend on the tile grid.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::pool::{Emitter, Particle, Pool};
use crate::animate;
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Horizontal input direction applied this tick (-1, 0 or 1)
    pub dx: f32,
    /// Vertical velocity in tiles/s; positive is up
    pub dy: f32,
    /// Horizontal wall-jump impulse, eased back to zero over a few ticks
    pub x_momentum: f32,
    pub width: f32,
    pub height: f32,

    pub is_on_ground: bool,
    /// Touching a wall while pushing into it (enables slide + wall jump)
    pub is_on_wall: bool,
    /// Ms since the player last left the ground; grounds the coyote window
    pub time_since_ground_ms: f32,
    /// Ms since the player last touched a wall; wall jumps get the same
    /// grace window as ground jumps
    pub time_since_touched_wall_ms: f32,
    /// Side the last touched wall was on (-1 left, 1 right)
    pub wall_jump_dir: f32,
    /// Ms since jump was last pressed; grounds the jump buffer window
    pub time_since_jump_press_ms: f32,
    /// Releasing jump mid-rise halves the remaining ascent, once per jump
    pub can_halve_jump: bool,

    pub is_dead: bool,
    pub time_since_dead_ms: f32,

    /// Squash-and-stretch scale, eased back toward 1 every tick
    pub scale: Vec2,

    pub particles: Pool<Particle>,
    pub walk_particle_emitter: Emitter,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(0.0, 1.0),
            dx: 0.0,
            dy: 0.0,
            x_momentum: 0.0,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            is_on_ground: false,
            is_on_wall: false,
            time_since_ground_ms: f32::INFINITY,
            time_since_touched_wall_ms: f32::INFINITY,
            wall_jump_dir: 0.0,
            time_since_jump_press_ms: f32::INFINITY,
            can_halve_jump: false,
            is_dead: false,
            time_since_dead_ms: 0.0,
            scale: Vec2::ONE,
            particles: Pool::new(MAX_PLAYER_PARTICLES),
            walk_particle_emitter: Emitter::default(),
        }
    }

    /// Reset to the spawn state
    pub fn respawn(&mut self) {
        *self = Self::new();
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Jump is available while grounded or within the coyote window
    pub fn coyote_ok(&self) -> bool {
        self.time_since_ground_ms < COYOTE_TIME_MS
    }

    /// Wall jump is available within the same grace window of wall contact
    pub fn wall_coyote_ok(&self) -> bool {
        self.time_since_touched_wall_ms < COYOTE_TIME_MS
    }

    /// A buffered jump press is still waiting to be consumed
    pub fn jump_buffered(&self) -> bool {
        self.time_since_jump_press_ms < JUMP_BUFFER_MS
    }

    /// Per-tick upkeep that does not touch the tile grid: assist timers,
    /// scale ease-back, particle aging, death clock.
    pub fn update(&mut self, dt: f32) {
        self.time_since_ground_ms += dt;
        self.time_since_touched_wall_ms += dt;
        self.time_since_jump_press_ms += dt;

        let ease = dt * 0.01;
        self.scale.x = animate(self.scale.x, 1.0, ease);
        self.scale.y = animate(self.scale.y, 1.0, ease);

        self.particles.step(dt);

        if self.is_dead {
            self.time_since_dead_ms += dt;
        }
    }

    /// One dust puff at the player's feet, with a little random agitation
    pub fn spawn_particle(&mut self, rng: &mut Pcg32, agitation: f32) {
        let jitter_x: f32 = rng.random_range(-0.5..0.5) * self.width;
        let vx: f32 = rng.random_range(-0.5..0.5) * agitation;
        let vy: f32 = rng.random_range(0.0..1.0) * agitation;
        let particle = self.particles.alloc();
        particle.lifetime_ms = PLAYER_PARTICLE_LIFETIME_MS;
        particle.total_lifetime_ms = PLAYER_PARTICLE_LIFETIME_MS;
        particle.pos = Vec2::new(self.pos.x + jitter_x, self.pos.y - self.height / 2.0);
        particle.vel = Vec2::new(vx, vy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_assist_timers_advance() {
        let mut player = Player::new();
        player.time_since_ground_ms = 0.0;
        player.time_since_jump_press_ms = 0.0;
        assert!(player.coyote_ok());
        assert!(player.jump_buffered());

        for _ in 0..50 {
            player.update(TICK_DT_MS);
        }
        // 100 ms: past the 75 ms coyote window, inside the 250 ms buffer
        assert!(!player.coyote_ok());
        assert!(player.jump_buffered());

        for _ in 0..100 {
            player.update(TICK_DT_MS);
        }
        assert!(!player.jump_buffered());
    }

    #[test]
    fn test_scale_eases_back_to_one() {
        let mut player = Player::new();
        player.scale = Vec2::new(1.0 + LAND_SQUASH, 1.0 - LAND_SQUASH);
        for _ in 0..1000 {
            player.update(TICK_DT_MS);
        }
        assert!((player.scale.x - 1.0).abs() < 0.01);
        assert!((player.scale.y - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_death_clock_only_runs_while_dead() {
        let mut player = Player::new();
        for _ in 0..10 {
            player.update(TICK_DT_MS);
        }
        assert_eq!(player.time_since_dead_ms, 0.0);

        player.is_dead = true;
        for _ in 0..10 {
            player.update(TICK_DT_MS);
        }
        assert!((player.time_since_dead_ms - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_respawn_clears_state() {
        let mut player = Player::new();
        let mut rng = Pcg32::seed_from_u64(3);
        player.pos = Vec2::new(12.0, -4.0);
        player.dy = -15.0;
        player.is_dead = true;
        player.time_since_dead_ms = 600.0;
        player.spawn_particle(&mut rng, 1.0);
        assert_eq!(player.particles.active_count(), 1);

        player.respawn();
        assert_eq!(player.pos, Vec2::new(0.0, 1.0));
        assert_eq!(player.dy, 0.0);
        assert!(!player.is_dead);
        assert_eq!(player.particles.active_count(), 0);
    }
}
