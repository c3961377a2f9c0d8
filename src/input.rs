//! Per-tick input snapshot
//!
//! The driver captures whatever devices it likes and hands the sim an
//! immutable snapshot per tick. `jump_pressed` is a one-shot edge the
//! driver clears after each tick; `jump_held` is level state.

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Move-left key currently down
    pub left: bool,
    /// Move-right key currently down
    pub right: bool,
    /// Jump key currently down (variable jump height reads this)
    pub jump_held: bool,
    /// Jump key went down this tick (feeds the jump buffer)
    pub jump_pressed: bool,
}

impl TickInput {
    /// Horizontal intent: -1, 0 or 1
    pub fn move_dir(&self) -> f32 {
        let mut dir = 0.0;
        if self.left {
            dir -= 1.0;
        }
        if self.right {
            dir += 1.0;
        }
        dir
    }
}
