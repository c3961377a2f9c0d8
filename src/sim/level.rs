//! Level data and per-level simulation state
//!
//! A level is split in two: `LevelStatic` is the authored, persisted tile
//! list plus the goal coordinate (the only shape the outside world ever
//! stores or transmits), and `LevelEphemeral` is everything derived for a
//! play session - particle and projectile pools, spawn timers, the
//! interval-block latch, trampoline touch times and the flood-filled
//! background cache. Ephemeral state is rebuilt from scratch whenever the
//! level (re)starts.

use std::collections::{HashMap, HashSet, VecDeque};

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::{Emitter, Particle, Pool, Projectile};
use crate::audio::{AudioSink, Sound};
use crate::consts::*;

/// Grid coordinate packed into a single hashable integer.
///
/// Used as the key for every spatial lookup (interval latch, trampoline
/// touches, background fill) so the hot path never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey(u64);

impl TileKey {
    pub fn new(x: i32, y: i32) -> Self {
        Self(((x as u32 as u64) << 32) | (y as u32 as u64))
    }

    pub fn x(self) -> i32 {
        (self.0 >> 32) as u32 as i32
    }

    pub fn y(self) -> i32 {
        self.0 as u32 as i32
    }
}

/// Cannon firing direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    /// Unit velocity scaled to `speed`
    pub fn velocity(self, speed: f32) -> Vec2 {
        match self {
            Dir::Up => Vec2::new(0.0, speed),
            Dir::Down => Vec2::new(0.0, -speed),
            Dir::Left => Vec2::new(-speed, 0.0),
            Dir::Right => Vec2::new(speed, 0.0),
        }
    }
}

/// Which half of the global phase clock an interval block starts solid on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    On,
    Off,
}

/// Tile behavior, matched exhaustively wherever tiles are interpreted so a
/// new kind is a compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TileKind {
    Solid,
    Lava,
    Cannon { dir: Dir },
    Trampoline,
    Interval { start: Phase },
    Turret,
}

impl TileKind {
    /// Solid terrain (projectiles explode on it, flood fill stops at it).
    /// Interval blocks are handled separately via the latch.
    pub fn is_solid(self) -> bool {
        match self {
            TileKind::Solid => true,
            TileKind::Lava
            | TileKind::Cannon { .. }
            | TileKind::Trampoline
            | TileKind::Interval { .. }
            | TileKind::Turret => false,
        }
    }

    pub fn is_lava(self) -> bool {
        match self {
            TileKind::Lava => true,
            TileKind::Solid
            | TileKind::Cannon { .. }
            | TileKind::Trampoline
            | TileKind::Interval { .. }
            | TileKind::Turret => false,
        }
    }

    pub fn is_trampoline(self) -> bool {
        match self {
            TileKind::Trampoline => true,
            TileKind::Solid
            | TileKind::Lava
            | TileKind::Cannon { .. }
            | TileKind::Interval { .. }
            | TileKind::Turret => false,
        }
    }

    pub fn is_turret(self) -> bool {
        match self {
            TileKind::Turret => true,
            TileKind::Solid
            | TileKind::Lava
            | TileKind::Cannon { .. }
            | TileKind::Trampoline
            | TileKind::Interval { .. } => false,
        }
    }

    pub fn cannon_dir(self) -> Option<Dir> {
        match self {
            TileKind::Cannon { dir } => Some(dir),
            TileKind::Solid
            | TileKind::Lava
            | TileKind::Trampoline
            | TileKind::Interval { .. }
            | TileKind::Turret => None,
        }
    }

    pub fn interval_start(self) -> Option<Phase> {
        match self {
            TileKind::Interval { start } => Some(start),
            TileKind::Solid
            | TileKind::Lava
            | TileKind::Cannon { .. }
            | TileKind::Trampoline
            | TileKind::Turret => None,
        }
    }
}

/// One authored tile on the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    #[serde(flatten)]
    pub kind: TileKind,
}

impl Tile {
    pub fn new(x: i32, y: i32, kind: TileKind) -> Self {
        Self { x, y, kind }
    }

    pub fn key(&self) -> TileKey {
        TileKey::new(self.x, self.y)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

/// Global interval phase: which half of the clock we are in.
/// Interval blocks with `start: On` are scheduled solid while this is true... see
/// [`Tile`] scheduling in the tick module for the latch that makes it safe.
pub fn interval_phase_a_on(clock_ms: f64) -> bool {
    ((clock_ms / INTERVAL_PHASE_MS).floor() as i64) % 2 != 0
}

/// Whether an interval block with the given start phase is scheduled solid
/// at `clock_ms` (before the one-tick latch is applied)
pub fn interval_scheduled_on(start: Phase, clock_ms: f64) -> bool {
    interval_phase_a_on(clock_ms) == (start == Phase::On)
}

/// The authored, persisted part of a level: tile list plus goal coordinate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelStatic {
    pub tiles: Vec<Tile>,
    /// Goal tile; touching it wins the level
    pub end: (i32, i32),
}

impl LevelStatic {
    /// A small authored layout: a floor, a wall, one of each hazard.
    /// Handy for demos and integration tests.
    pub fn demo() -> Self {
        let mut tiles = Vec::new();
        for x in -5..=15 {
            tiles.push(Tile::new(x, -1, TileKind::Solid));
        }
        for y in 0..=3 {
            tiles.push(Tile::new(-5, y, TileKind::Solid));
        }
        tiles.push(Tile::new(4, -1, TileKind::Lava));
        tiles.push(Tile::new(6, 0, TileKind::Trampoline));
        tiles.push(Tile::new(8, 3, TileKind::Cannon { dir: Dir::Left }));
        tiles.push(Tile::new(10, 0, TileKind::Interval { start: Phase::On }));
        tiles.push(Tile::new(11, 0, TileKind::Interval { start: Phase::Off }));
        tiles.push(Tile::new(13, 4, TileKind::Turret));
        Self {
            tiles,
            end: (15, 0),
        }
    }
}

/// Everything derived for one play session; rebuilt on every (re)start
#[derive(Debug, Clone)]
pub struct LevelEphemeral {
    pub lava_particles: Pool<Particle>,
    pub lava_emitter: Emitter,
    pub explosion_particles: Pool<Particle>,
    pub cannon_balls: Pool<Projectile>,
    pub cannon_emitter: Emitter,
    pub turret_bullets: Pool<Projectile>,
    pub turret_emitter: Emitter,
    pub trail_particles: Pool<Particle>,
    pub trail_emitter: Emitter,
    /// Last touch time per trampoline (sim clock ms), for squash animation
    pub trampolines_touched: HashMap<TileKey, f64>,
    /// Interval blocks that were allowed solid on the previous tick
    pub interval_on_last_tick: HashSet<TileKey>,
    /// Flood-fill result: open tiles reachable from spawn (render backdrop)
    pub background: Vec<(i32, i32)>,
    pub rng: Pcg32,
}

impl LevelEphemeral {
    pub fn new(seed: u64) -> Self {
        Self {
            lava_particles: Pool::new(MAX_LAVA_PARTICLES),
            lava_emitter: Emitter::default(),
            explosion_particles: Pool::new(MAX_EXPLOSION_PARTICLES),
            cannon_balls: Pool::new(MAX_CANNON_BALLS),
            cannon_emitter: Emitter::default(),
            turret_bullets: Pool::new(MAX_TURRET_BULLETS),
            turret_emitter: Emitter::default(),
            trail_particles: Pool::new(MAX_TRAIL_PARTICLES),
            trail_emitter: Emitter::default(),
            trampolines_touched: HashMap::new(),
            interval_on_last_tick: HashSet::new(),
            background: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Burst of drifting debris where a cannonball died
    pub fn spawn_cannon_ball_explosion(&mut self, pos: Vec2) {
        for _ in 0..EXPLOSION_PARTICLE_COUNT {
            let angle: f32 = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed: f32 = self.rng.random_range(0.0..1.0);
            let particle = self.explosion_particles.alloc();
            particle.lifetime_ms = EXPLOSION_PARTICLE_LIFETIME_MS;
            particle.total_lifetime_ms = EXPLOSION_PARTICLE_LIFETIME_MS;
            particle.pos = pos;
            particle.vel = Vec2::new(angle.cos(), angle.sin()) * speed;
        }
    }
}

/// A level being played: authored layout + session state
#[derive(Debug, Clone)]
pub struct Level {
    pub layout: LevelStatic,
    pub ephemeral: LevelEphemeral,
}

impl Level {
    pub fn new(layout: LevelStatic, seed: u64) -> Self {
        let mut level = Self {
            layout,
            ephemeral: LevelEphemeral::new(seed),
        };
        level.rebuild_background();
        level
    }

    /// Throw away all session state (pools, latches, timers) and rebuild
    /// the background cache. Called on level (re)start.
    pub fn reset(&mut self, seed: u64) {
        self.ephemeral = LevelEphemeral::new(seed);
        self.rebuild_background();
    }

    /// Flood-fill the open space reachable from the spawn tile, bounded at
    /// `BACKGROUND_LIMIT`. One-time initialization, never run per tick.
    pub fn rebuild_background(&mut self) {
        let tiles: HashMap<TileKey, &Tile> =
            self.layout.tiles.iter().map(|t| (t.key(), t)).collect();

        let mut background: HashSet<TileKey> = HashSet::new();
        let mut queue: VecDeque<(i32, i32)> = VecDeque::new();
        queue.push_back((0, 0));
        while let Some((cx, cy)) = queue.pop_front() {
            if background.len() >= BACKGROUND_LIMIT {
                break;
            }
            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                let (x, y) = (cx + dx, cy + dy);
                let key = TileKey::new(x, y);
                if background.contains(&key) {
                    continue;
                }
                let solid = matches!(tiles.get(&key), Some(tile) if tile.kind.is_solid());
                if !solid {
                    background.insert(key);
                    queue.push_back((x, y));
                }
            }
        }

        self.ephemeral.background = background.iter().map(|k| (k.x(), k.y())).collect();
        self.ephemeral.background.sort_unstable();
        log::debug!("background tiles: {}", self.ephemeral.background.len());
    }

    /// Advance spawners, pools and projectile-vs-tile collisions by one tick.
    /// `player_pos` is only read for turret aim (position at spawn time).
    pub fn update(&mut self, player_pos: Vec2, dt: f32, audio: &mut dyn AudioSink) {
        let layout = &self.layout;
        let eph = &mut self.ephemeral;

        // lava particles: per-tile spawns at a fixed rate, upward drift
        for _ in 0..eph.lava_emitter.fire(dt, LAVA_SPAWN_HZ) {
            for tile in &layout.tiles {
                if !tile.kind.is_lava() {
                    continue;
                }
                let jitter_x: f32 = eph.rng.random_range(0.0..TILE_SIZE);
                let jitter_y: f32 = eph.rng.random_range(0.0..TILE_SIZE);
                let dx: f32 = eph.rng.random_range(0.0..0.1);
                let dy: f32 = 1.0 + eph.rng.random_range(0.0..0.1);
                let particle = eph.lava_particles.alloc();
                particle.lifetime_ms = LAVA_PARTICLE_LIFETIME_MS;
                particle.total_lifetime_ms = LAVA_PARTICLE_LIFETIME_MS;
                particle.pos = tile.center() - Vec2::splat(TILE_SIZE / 2.0)
                    + Vec2::new(jitter_x, jitter_y);
                particle.vel = Vec2::new(dx, dy);
            }
        }
        eph.lava_particles.step(dt);
        eph.explosion_particles.step(dt);
        eph.trail_particles.step(dt);

        // cannons: all fire in lockstep on a shared timer; every period the
        // backlog covers is honored
        for _ in 0..eph.cannon_emitter.fire(dt, CANNON_SPAWN_HZ) {
            let mut found_cannon = false;
            for tile in &layout.tiles {
                if let Some(dir) = tile.kind.cannon_dir() {
                    found_cannon = true;
                    let ball = eph.cannon_balls.alloc();
                    ball.pos = tile.center();
                    ball.vel = dir.velocity(CANNON_BALL_SPEED);
                    ball.active = true;
                }
            }
            if found_cannon {
                audio.play(Sound::Shoot);
            }
        }

        // turrets: aim at where the player is right now, not a homing target
        for _ in 0..eph.turret_emitter.fire(dt, TURRET_SPAWN_HZ) {
            let mut found_turret = false;
            for tile in &layout.tiles {
                if !tile.kind.is_turret() {
                    continue;
                }
                found_turret = true;
                let aim = player_pos - tile.center();
                // player exactly on the turret would produce a NaN direction
                let dir = if aim.length_squared() > 1e-6 {
                    aim.normalize()
                } else {
                    Vec2::NEG_Y
                };
                let bullet = eph.turret_bullets.alloc();
                bullet.pos = tile.center();
                bullet.vel = dir * TURRET_BULLET_SPEED;
                bullet.active = true;
            }
            if found_turret {
                audio.play(Sound::Shoot);
            }
        }

        // integrate cannonballs and explode them against solid tiles
        eph.cannon_balls.step(dt);
        let mut explosions: Vec<Vec2> = Vec::new();
        for ball in eph.cannon_balls.iter_mut() {
            if !ball.active {
                continue;
            }
            for tile in &layout.tiles {
                if !tile.kind.is_solid() {
                    continue;
                }
                // treating the ball as a square gives the same results here
                let x_dist = (ball.pos.x - tile.x as f32).abs();
                let y_dist = (ball.pos.y - tile.y as f32).abs();
                if x_dist < TILE_SIZE / 2.0 + CANNON_BALL_RADIUS
                    && y_dist < TILE_SIZE / 2.0 + CANNON_BALL_RADIUS
                {
                    explosions.push(ball.pos);
                    ball.vel = Vec2::ZERO;
                    ball.active = false;
                    break;
                }
            }
        }
        if !explosions.is_empty() {
            audio.play(Sound::CannonballExplosion);
        }
        for pos in explosions {
            eph.spawn_cannon_ball_explosion(pos);
        }

        // trail dust behind active cannonballs
        for _ in 0..eph.trail_emitter.fire(dt, TRAIL_SPAWN_HZ) {
            let positions: Vec<Vec2> = eph
                .cannon_balls
                .iter()
                .filter(|b| b.active)
                .map(|b| b.pos)
                .collect();
            for pos in positions {
                let particle = eph.trail_particles.alloc();
                particle.lifetime_ms = TRAIL_LIFETIME_MS;
                particle.total_lifetime_ms = TRAIL_LIFETIME_MS;
                particle.pos = pos;
            }
        }

        // turret bullets die silently against solid tiles (point test)
        eph.turret_bullets.step(dt);
        for bullet in eph.turret_bullets.iter_mut() {
            if !bullet.active {
                continue;
            }
            for tile in &layout.tiles {
                if !tile.kind.is_solid() {
                    continue;
                }
                let x_dist = (bullet.pos.x - tile.x as f32).abs();
                let y_dist = (bullet.pos.y - tile.y as f32).abs();
                if x_dist < TILE_SIZE / 2.0 && y_dist < TILE_SIZE / 2.0 {
                    bullet.vel = Vec2::ZERO;
                    bullet.active = false;
                    break;
                }
            }
        }
    }

    /// See [`LevelEphemeral::spawn_cannon_ball_explosion`]
    pub fn spawn_cannon_ball_explosion(&mut self, pos: Vec2) {
        self.ephemeral.spawn_cannon_ball_explosion(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::RecordingAudio;
    use crate::consts::TICK_DT_MS;

    fn run_level(level: &mut Level, ms: f32, audio: &mut RecordingAudio) {
        let ticks = (ms / TICK_DT_MS).round() as usize;
        for _ in 0..ticks {
            level.update(Vec2::new(0.0, 0.0), TICK_DT_MS, audio);
        }
    }

    #[test]
    fn test_tile_key_roundtrip() {
        for (x, y) in [(0, 0), (5, -3), (-120, 45), (i32::MIN, i32::MAX)] {
            let key = TileKey::new(x, y);
            assert_eq!((key.x(), key.y()), (x, y));
        }
    }

    #[test]
    fn test_interval_phase_clock() {
        assert!(!interval_phase_a_on(0.0));
        assert!(!interval_phase_a_on(999.0));
        assert!(interval_phase_a_on(1000.0));
        assert!(interval_phase_a_on(1999.0));
        assert!(!interval_phase_a_on(2000.0));

        // start=On means solid during phase A
        assert!(interval_scheduled_on(Phase::On, 1500.0));
        assert!(!interval_scheduled_on(Phase::On, 500.0));
        assert!(interval_scheduled_on(Phase::Off, 500.0));
    }

    #[test]
    fn test_level_format_json_roundtrip() {
        let level = LevelStatic::demo();
        let json = serde_json::to_string(&level).unwrap();
        let back: LevelStatic = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tiles, level.tiles);
        assert_eq!(back.end, level.end);

        // tagged representation is stable for the editor/server side
        let tile_json = serde_json::to_value(Tile::new(5, 0, TileKind::Cannon { dir: Dir::Right }))
            .unwrap();
        assert_eq!(tile_json["type"], "cannon");
        assert_eq!(tile_json["dir"], "right");
    }

    #[test]
    fn test_background_flood_fill_stops_at_walls() {
        let _ = env_logger::builder().is_test(true).try_init();
        // a 3x3 closed room around spawn
        let mut tiles = Vec::new();
        for x in -2i32..=2 {
            for y in -2i32..=2 {
                if x.abs() == 2 || y.abs() == 2 {
                    tiles.push(Tile::new(x, y, TileKind::Solid));
                }
            }
        }
        let level = Level::new(LevelStatic { tiles, end: (1, 1) }, 7);
        // the 3x3 interior is reachable; walls never join the background
        assert_eq!(level.ephemeral.background.len(), 9);
        assert!(!level.ephemeral.background.contains(&(2, 0)));
        assert!(level.ephemeral.background.contains(&(1, 1)));
    }

    #[test]
    fn test_cannon_fires_on_schedule() {
        // single right-facing cannon at (5, 0)
        let layout = LevelStatic {
            tiles: vec![Tile::new(5, 0, TileKind::Cannon { dir: Dir::Right })],
            end: (9, 9),
        };
        let mut level = Level::new(layout, 1);
        let mut audio = RecordingAudio::new();

        // at 0.5 Hz nothing fires inside the first 2000 ms
        run_level(&mut level, 2000.0, &mut audio);
        assert_eq!(level.ephemeral.cannon_balls.active_count(), 0);

        // the first volley lands just past the period boundary
        run_level(&mut level, 10.0, &mut audio);
        assert_eq!(level.ephemeral.cannon_balls.active_count(), 1);
        assert_eq!(audio.count(Sound::Shoot), 1);

        let ball = level
            .ephemeral
            .cannon_balls
            .iter()
            .find(|b| b.active)
            .unwrap();
        assert_eq!(ball.vel, Vec2::new(CANNON_BALL_SPEED, 0.0));
        assert_eq!(ball.vel.y, 0.0);
        // spawned at the cannon, barely moved since
        assert!((ball.pos - Vec2::new(5.0, 0.0)).length() < 0.1);
    }

    #[test]
    fn test_cannonball_explodes_on_solid() {
        // cannon firing right into a wall two tiles away
        let layout = LevelStatic {
            tiles: vec![
                Tile::new(0, 0, TileKind::Cannon { dir: Dir::Right }),
                Tile::new(3, 0, TileKind::Solid),
            ],
            end: (9, 9),
        };
        let mut level = Level::new(layout, 1);
        let mut audio = RecordingAudio::new();

        // one volley plus flight time: ball covers ~1.55 tiles to contact
        // (3 - 0.5 - 0.45) at 8 tiles/s in under 200 ms
        run_level(&mut level, 2500.0, &mut audio);
        assert_eq!(level.ephemeral.cannon_balls.active_count(), 0);
        assert_eq!(audio.count(Sound::CannonballExplosion), 1);
        assert_eq!(
            level.ephemeral.explosion_particles.active_count(),
            EXPLOSION_PARTICLE_COUNT
        );
    }

    #[test]
    fn test_turret_aims_at_spawn_time_position() {
        let layout = LevelStatic {
            tiles: vec![Tile::new(0, 0, TileKind::Turret)],
            end: (9, 9),
        };
        let mut level = Level::new(layout, 1);
        let mut audio = RecordingAudio::new();

        // player sits to the right when the first bullet spawns
        let player_pos = Vec2::new(4.0, 0.0);
        let ticks = (1010.0 / TICK_DT_MS) as usize;
        for _ in 0..ticks {
            level.update(player_pos, TICK_DT_MS, &mut audio);
        }
        let bullet = level
            .ephemeral
            .turret_bullets
            .iter()
            .find(|b| b.active)
            .copied()
            .unwrap();
        assert_eq!(bullet.vel, Vec2::new(TURRET_BULLET_SPEED, 0.0));

        // bullet keeps flying on its spawn-time heading even if the player
        // "moves" afterwards - no homing
        for _ in 0..100 {
            level.update(Vec2::new(-4.0, 3.0), TICK_DT_MS, &mut audio);
        }
        let bullet = level
            .ephemeral
            .turret_bullets
            .iter()
            .find(|b| b.active)
            .copied()
            .unwrap();
        assert_eq!(bullet.vel, Vec2::new(TURRET_BULLET_SPEED, 0.0));
    }

    #[test]
    fn test_turret_degenerate_aim_falls_back() {
        let layout = LevelStatic {
            tiles: vec![Tile::new(0, 0, TileKind::Turret)],
            end: (9, 9),
        };
        let mut level = Level::new(layout, 1);
        let mut audio = RecordingAudio::new();

        // player exactly on the turret: direction must stay finite
        let ticks = (1010.0 / TICK_DT_MS) as usize;
        for _ in 0..ticks {
            level.update(Vec2::ZERO, TICK_DT_MS, &mut audio);
        }
        let bullet = level
            .ephemeral
            .turret_bullets
            .iter()
            .find(|b| b.active)
            .unwrap();
        assert!(bullet.vel.is_finite());
        assert_eq!(bullet.vel, Vec2::NEG_Y * TURRET_BULLET_SPEED);
    }

    #[test]
    fn test_lava_particles_spawn_and_expire() {
        let layout = LevelStatic {
            tiles: vec![Tile::new(0, 0, TileKind::Lava)],
            end: (9, 9),
        };
        let mut level = Level::new(layout, 42);
        let mut audio = RecordingAudio::new();

        run_level(&mut level, 200.0, &mut audio);
        let count = level.ephemeral.lava_particles.active_count();
        // ~20 Hz for 200 ms
        assert!((3..=5).contains(&count), "got {count}");

        // with no further time the same particles eventually expire
        run_level(&mut level, LAVA_PARTICLE_LIFETIME_MS, &mut audio);
        // new ones spawned meanwhile, but none older than their lifetime
        for particle in level.ephemeral.lava_particles.iter() {
            assert!(particle.lifetime_ms <= LAVA_PARTICLE_LIFETIME_MS);
        }
    }

    #[test]
    fn test_deterministic_given_seed() {
        let layout = LevelStatic::demo();
        let mut a = Level::new(layout.clone(), 99);
        let mut b = Level::new(layout, 99);
        let mut audio = RecordingAudio::new();

        run_level(&mut a, 3000.0, &mut audio);
        run_level(&mut b, 3000.0, &mut audio);

        let balls_a: Vec<_> = a.ephemeral.cannon_balls.iter().collect();
        let balls_b: Vec<_> = b.ephemeral.cannon_balls.iter().collect();
        for (x, y) in balls_a.iter().zip(balls_b.iter()) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.vel, y.vel);
        }
        let lava_a: Vec<_> = a.ephemeral.lava_particles.iter().collect();
        let lava_b: Vec<_> = b.ephemeral.lava_particles.iter().collect();
        for (x, y) in lava_a.iter().zip(lava_b.iter()) {
            assert_eq!(x.pos, y.pos);
        }
    }
}
