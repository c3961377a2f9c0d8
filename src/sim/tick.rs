//! Fixed-timestep orchestrator for a level being played
//!
//! One call to [`tick`] advances the whole simulation by `dt` milliseconds:
//! player movement with axis-separated tile collision, jump assists, the
//! interval-block latch, hazards, spawners and pools, then the camera.
//! The function is pure over `(state, input, dt)` plus the seeded RNG in
//! the level, so identical input scripts replay identical runs.

use std::collections::HashSet;

use glam::Vec2;
use rand_pcg::Pcg32;

use super::camera::Camera;
use super::collision::{Circle, Rect, circle_vs_rect, rect_vs_rect};
use super::level::{
    Level, LevelStatic, Tile, TileKey, TileKind, interval_scheduled_on,
};
use super::player::Player;
use crate::animate;
use crate::audio::{AudioSink, Sound};
use crate::consts::*;
use crate::input::TickInput;

/// Everything that changes while a level is being played
#[derive(Debug, Clone)]
pub struct PlayingState {
    pub camera: Camera,
    pub level: Level,
    pub player: Player,
    pub won: bool,
    pub time_since_won_ms: f32,
    /// Simulation clock in ms; drives interval-block phase. Keeps running
    /// across death restarts so block schedules never reset underfoot.
    pub clock_ms: f64,
    seed: u64,
}

impl PlayingState {
    pub fn new(layout: LevelStatic, seed: u64) -> Self {
        let player = Player::new();
        let mut camera = Camera::new();
        camera.pos = player.pos;
        Self {
            camera,
            level: Level::new(layout, seed),
            player,
            won: false,
            time_since_won_ms: 0.0,
            clock_ms: 0.0,
            seed,
        }
    }

    /// The win transition has run its course; the driver may leave the level
    pub fn win_transition_ready(&self) -> bool {
        self.won && self.time_since_won_ms >= WIN_TRANSITION_MS
    }

    fn restart(&mut self) {
        self.player.respawn();
        self.level.reset(self.seed);
        self.camera.pos = self.player.pos;
        self.camera.shake_factor = 0.0;
    }
}

/// Whether a tile blocks the player this tick. Interval blocks consult the
/// latch from the previous tick, not the schedule, so a block never turns
/// solid inside the player.
fn tile_blocks(tile: &Tile, latch: &HashSet<TileKey>) -> bool {
    match tile.kind {
        TileKind::Solid => true,
        TileKind::Interval { .. } => latch.contains(&tile.key()),
        TileKind::Lava | TileKind::Cannon { .. } | TileKind::Trampoline | TileKind::Turret => {
            false
        }
    }
}

/// Advance the simulation by one tick of `dt` milliseconds
pub fn tick(state: &mut PlayingState, input: &TickInput, audio: &mut dyn AudioSink, dt: f32) {
    state.clock_ms += dt as f64;
    state.camera.update(dt);

    if state.won {
        state.time_since_won_ms += dt;
        return;
    }

    let clock_ms = state.clock_ms;
    let player = &mut state.player;
    let camera = &mut state.camera;

    if input.jump_pressed {
        player.time_since_jump_press_ms = 0.0;
    }

    let pdx = input.move_dir();
    player.dx = pdx;
    let mut dx = 0.0;
    if !player.is_dead {
        // releasing jump clears the halving allowance; mid-rise it also
        // cuts the rest of the ascent
        if !input.jump_held && player.can_halve_jump {
            if player.dy > 0.0 {
                player.dy /= 2.0;
            }
            player.can_halve_jump = false;
        }

        dx = move_and_slide(
            player,
            &state.level.layout,
            &state.level.ephemeral.interval_on_last_tick,
            &mut state.level.ephemeral.rng,
            pdx,
            audio,
            dt,
        );

        // a buffered press fires as soon as a jump becomes legal; the
        // ground and wall windows are checked independently, so a jump off
        // a wall-adjacent floor gets both the hop and the pushoff
        if player.jump_buffered() {
            let ground_jump = player.is_on_ground || player.coyote_ok();
            let wall_jump = player.wall_coyote_ok();
            if ground_jump || wall_jump {
                player_jump(player, audio);
            }
            if ground_jump {
                for _ in 0..20 {
                    player.spawn_particle(&mut state.level.ephemeral.rng, 1.5);
                }
            }
            if wall_jump {
                player.x_momentum = -player.wall_jump_dir * WALL_JUMP_MOMENTUM;
                player.time_since_touched_wall_ms = f32::INFINITY;
            }
        }

        // trampolines relaunch on every overlapping tick; the dy gate in
        // player_jump keeps the sound to the contact tick, and the bounce
        // cannot be shortened by releasing jump
        let player_rect = Rect::new(player.pos, player.width, player.height);
        for tile in &state.level.layout.tiles {
            if !tile.kind.is_trampoline() {
                continue;
            }
            let tile_rect = Rect::new(tile.center(), TILE_SIZE, TILE_SIZE);
            if rect_vs_rect(player_rect, tile_rect) {
                player_jump(player, audio);
                player.can_halve_jump = false;
                state
                    .level
                    .ephemeral
                    .trampolines_touched
                    .insert(tile.key(), clock_ms);
            }
        }

        // hazards
        let lenient = Rect::new(
            player.pos,
            player.width - LAVA_LENIENCY * 2.0,
            player.height - LAVA_LENIENCY * 2.0,
        );
        for tile in &state.level.layout.tiles {
            if !tile.kind.is_lava() {
                continue;
            }
            if rect_vs_rect(lenient, Rect::new(tile.center(), TILE_SIZE, TILE_SIZE)) {
                kill_player(player, camera, audio);
                break;
            }
        }
        if player.pos.y < KILL_PLANE_Y {
            kill_player(player, camera, audio);
        }

        // reaching the goal tile wins the level
        let (ex, ey) = state.level.layout.end;
        let end_rect = Rect::new(Vec2::new(ex as f32, ey as f32), TILE_SIZE, TILE_SIZE);
        if !player.is_dead && rect_vs_rect(player_rect, end_rect) {
            state.won = true;
            state.time_since_won_ms = 0.0;
            audio.stop(Sound::Slide);
        }
    }

    state.level.update(player.pos, dt, audio);

    if !player.is_dead && !state.won {
        projectiles_vs_player(&mut state.level, player, camera, audio);
    }

    // walk dust while grounded and moving
    if !player.is_dead && player.is_on_ground && pdx != 0.0 {
        let fires = player.walk_particle_emitter.fire(dt, WALK_PARTICLE_HZ);
        for _ in 0..fires {
            player.spawn_particle(&mut state.level.ephemeral.rng, 0.0);
        }
    }

    // looping slide sound follows the wall-slide state
    let sliding =
        !player.is_dead && player.is_on_wall && !player.is_on_ground && player.dy < 0.0;
    if sliding {
        audio.play(Sound::Slide);
    } else {
        audio.stop(Sound::Slide);
    }

    player.update(dt);

    update_interval_latch(&mut state.level, &state.player, clock_ms);

    // camera pins to the player and leans into the applied movement
    // (momentum included, so wall jumps tilt the view)
    state.camera.pos = state.player.pos;
    state.camera.angle = animate(state.camera.angle, dx * 0.02, dt * 0.02);

    if state.player.is_dead && state.player.time_since_dead_ms >= TIME_TO_RESET_AFTER_DEATH_MS {
        state.restart();
    }
}

/// Integrate the player and resolve tile collisions one axis at a time,
/// X fully before Y. Returns the applied horizontal movement (input plus
/// momentum) for the camera lean.
fn move_and_slide(
    player: &mut Player,
    layout: &LevelStatic,
    latch: &HashSet<TileKey>,
    rng: &mut Pcg32,
    pdx: f32,
    audio: &mut dyn AudioSink,
    dt: f32,
) -> f32 {
    let dt_s = dt / 1000.0;
    let half = player.half_extents();

    // wall-jump momentum eases out (dt-squared factor); snapped to zero
    // near rest
    if player.x_momentum.abs() < MOMENTUM_STOP {
        player.x_momentum = 0.0;
    } else {
        player.x_momentum = animate(player.x_momentum, 0.0, dt * dt * MOMENTUM_EASE);
    }
    let dx = pdx + player.x_momentum * dt_s;

    player.dy -= GRAVITY * dt_s;
    if player.dy < -MAX_FALL_SPEED {
        player.dy = -MAX_FALL_SPEED;
    }

    // X axis. Tiles are visited in authored order; when two tiles overlap
    // the player equally the earlier one wins the pushout.
    player.is_on_wall = false;
    let mut wall_dir = 0.0;
    player.pos.x += dx * dt_s * PLAYER_SPEED;
    for tile in &layout.tiles {
        if !tile_blocks(tile, latch) {
            continue;
        }
        let (tx, ty) = (tile.x as f32, tile.y as f32);
        let x_overlap = TILE_SIZE / 2.0 + half.x - (player.pos.x - tx).abs();
        let y_overlap = TILE_SIZE / 2.0 + half.y - (player.pos.y - ty).abs();
        // the y guard keeps exact floor contact from reading as a wall
        if x_overlap > 0.0 && y_overlap > 0.001 {
            if player.pos.x > tx {
                player.pos.x = tx + TILE_SIZE / 2.0 + half.x;
                if pdx < 0.0 {
                    player.is_on_wall = true;
                    wall_dir = -1.0;
                }
            } else {
                player.pos.x = tx - TILE_SIZE / 2.0 - half.x;
                if pdx > 0.0 {
                    player.is_on_wall = true;
                    wall_dir = 1.0;
                }
            }
        }
    }

    if player.is_on_wall {
        player.time_since_touched_wall_ms = 0.0;
        player.wall_jump_dir = wall_dir;
        // sliding down a wall is capped well below terminal velocity
        if player.dy < -WALL_SLIDE_MAX_SPEED {
            player.dy = -WALL_SLIDE_MAX_SPEED;
        }
    }

    // Y axis. The sign of dy picks the face: falling snaps onto tops,
    // rising bonks on undersides.
    player.is_on_ground = false;
    player.pos.y += player.dy * dt_s;
    for tile in &layout.tiles {
        if !tile_blocks(tile, latch) {
            continue;
        }
        let (tx, ty) = (tile.x as f32, tile.y as f32);
        let x_overlap = TILE_SIZE / 2.0 + half.x - (player.pos.x - tx).abs();
        let y_overlap = TILE_SIZE / 2.0 + half.y - (player.pos.y - ty).abs();
        if x_overlap > 0.0 && y_overlap > 0.0 {
            if player.dy < 0.0 {
                player.pos.y = ty + TILE_SIZE / 2.0 + half.y;
                if player.dy < LAND_SOUND_THRESHOLD {
                    audio.play(Sound::Land);
                    player.scale = Vec2::new(1.0 + LAND_SQUASH, 1.0 - LAND_SQUASH);
                    for _ in 0..20 {
                        player.spawn_particle(rng, 1.5);
                    }
                }
                player.dy = 0.0;
                player.can_halve_jump = false;
                player.is_on_ground = true;
            } else if player.dy > 0.0 {
                player.pos.y = ty - TILE_SIZE / 2.0 - half.y;
                player.dy = 0.0;
            }
        }
    }
    if player.is_on_ground {
        player.time_since_ground_ms = 0.0;
    }

    dx
}

/// Launch upward and consume both assist windows. The sound only plays
/// when the player was not already rising, which keeps a trampoline that
/// relaunches every overlapping tick to one sound per bounce.
fn player_jump(player: &mut Player, audio: &mut dyn AudioSink) {
    if player.dy <= 0.0 {
        audio.play(Sound::Jump);
    }
    player.dy = JUMP_STRENGTH;
    player.can_halve_jump = true;
    player.time_since_ground_ms = f32::INFINITY;
    player.time_since_jump_press_ms = f32::INFINITY;
    player.scale = Vec2::new(1.0 - JUMP_STRETCH, 1.0 + JUMP_STRETCH);
}

/// Edge-triggered death: one shake, one sound, one corpse
fn kill_player(player: &mut Player, camera: &mut Camera, audio: &mut dyn AudioSink) {
    if player.is_dead {
        return;
    }
    player.is_dead = true;
    player.time_since_dead_ms = 0.0;
    player.dy = 0.0;
    player.x_momentum = 0.0;
    camera.shake_factor = 1.0;
    audio.stop(Sound::Slide);
    audio.play(Sound::Death);
}

/// Cannonballs test a circle against the player; turret bullets are small
/// and fast enough that a point test reads identically in play.
fn projectiles_vs_player(
    level: &mut Level,
    player: &mut Player,
    camera: &mut Camera,
    audio: &mut dyn AudioSink,
) {
    let player_rect = Rect::new(player.pos, player.width, player.height);

    let mut explosions: Vec<Vec2> = Vec::new();
    for ball in level.ephemeral.cannon_balls.iter_mut() {
        if !ball.active {
            continue;
        }
        let circle = Circle {
            center: ball.pos,
            radius: CANNON_BALL_RADIUS,
        };
        if circle_vs_rect(circle, player_rect) {
            explosions.push(ball.pos);
            ball.vel = Vec2::ZERO;
            ball.active = false;
        }
    }
    // no explosion sound here; the death sound covers the hit, and the
    // explosion sound stays tied to balls bursting on tiles
    if !explosions.is_empty() {
        kill_player(player, camera, audio);
    }
    for pos in explosions {
        level.spawn_cannon_ball_explosion(pos);
    }

    for bullet in level.ephemeral.turret_bullets.iter_mut() {
        if !bullet.active {
            continue;
        }
        let hit = (bullet.pos.x - player.pos.x).abs() < player.width / 2.0
            && (bullet.pos.y - player.pos.y).abs() < player.height / 2.0;
        if hit {
            bullet.vel = Vec2::ZERO;
            bullet.active = false;
            kill_player(player, camera, audio);
        }
    }
}

/// Recompute which interval blocks are allowed solid for the next tick.
/// A block scheduled on stays passable while it overlaps the player,
/// unless the player is standing on its top face.
fn update_interval_latch(level: &mut Level, player: &Player, clock_ms: f64) {
    let half = player.half_extents();
    let player_rect = Rect::new(player.pos, player.width, player.height);
    let mut next: HashSet<TileKey> = HashSet::new();

    for tile in &level.layout.tiles {
        let Some(start) = tile.kind.interval_start() else {
            continue;
        };
        if !interval_scheduled_on(start, clock_ms) {
            continue;
        }
        let tile_rect = Rect::new(tile.center(), TILE_SIZE, TILE_SIZE);
        let overlaps = rect_vs_rect(player_rect, tile_rect);
        let player_bottom = player.pos.y - half.y;
        let tile_top = tile.y as f32 + TILE_SIZE / 2.0;
        let on_top = (player_bottom - tile_top).abs() < 0.1
            && (player.pos.x - tile.x as f32).abs() < TILE_SIZE / 2.0 + half.x;
        if !overlaps || on_top {
            next.insert(tile.key());
        }
    }

    level.ephemeral.interval_on_last_tick = next;
}
