//! Fixed-capacity ring-buffer pools for particles and projectiles
//!
//! Slots are allocated by a wrapping write cursor and never freed
//! individually; once the cursor wraps, the oldest slot is overwritten.
//! Allocation therefore never fails and steady-state play never allocates.

use glam::Vec2;

/// A short-lived visual particle. Inactive when `lifetime_ms <= 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime countdown; the starting value is also kept so the
    /// renderer can derive fade/shrink progress.
    pub lifetime_ms: f32,
    pub total_lifetime_ms: f32,
}

impl Particle {
    pub fn is_active(&self) -> bool {
        self.lifetime_ms > 0.0
    }
}

/// A pooled projectile (cannonball, turret bullet). Liveness is the
/// explicit `active` flag, not the velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub active: bool,
}

/// Fixed-capacity pool reused via a wrapping write cursor
#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<T>,
    next: usize,
}

impl<T: Default + Clone> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            slots: vec![T::default(); capacity],
            next: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Claim the next slot, overwriting whatever was there. Drop-oldest is
    /// the intended bounded-resource policy, not an error.
    pub fn alloc(&mut self) -> &mut T {
        let index = self.next;
        self.next = (self.next + 1) % self.slots.len();
        self.slots[index] = T::default();
        &mut self.slots[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut()
    }
}

impl Pool<Particle> {
    /// Integrate active particles and count lifetimes down
    pub fn step(&mut self, dt: f32) {
        for particle in &mut self.slots {
            if particle.lifetime_ms > 0.0 {
                particle.lifetime_ms -= dt;
                particle.pos += particle.vel * (dt / 1000.0);
            }
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.is_active()).count()
    }
}

impl Pool<Projectile> {
    /// Euler-integrate active projectiles
    pub fn step(&mut self, dt: f32) {
        for projectile in &mut self.slots {
            if projectile.active {
                projectile.pos += projectile.vel * (dt / 1000.0);
            }
        }
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.active).count()
    }
}

/// Spawn-rate accumulator shared by every periodic emitter (cannons,
/// turrets, lava, trails, walk dust).
///
/// `fire` drains whole periods from the accumulated timer, so a large dt
/// yields every spawn it covers rather than at most one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Emitter {
    pub timer_ms: f32,
}

impl Emitter {
    /// Accumulate `dt` and return how many times the emitter fires at `hz`
    pub fn fire(&mut self, dt: f32, hz: f32) -> usize {
        let period = 1000.0 / hz;
        self.timer_ms += dt;
        let mut count = 0;
        while self.timer_ms > period {
            self.timer_ms -= period;
            count += 1;
        }
        count
    }

    /// Fraction of the way to the next firing, for renderer charge-up cues
    pub fn progress(&self, hz: f32) -> f32 {
        (self.timer_ms / (1000.0 / hz)).clamp(0.0, 1.0)
    }
}
