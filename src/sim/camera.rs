//! Camera state the sim writes and the renderer consumes
//!
//! The sim only follows the player, decays shake and leans the view with
//! horizontal input; letterboxing and projection live with the renderer.

use glam::Vec2;

#[derive(Debug, Clone)]
pub struct Camera {
    pub pos: Vec2,
    /// View extents in tiles
    pub width: f32,
    pub height: f32,
    /// 0.0 to 1.0, decays exponentially
    pub shake_factor: f32,
    /// Small lean toward the player's movement direction (radians)
    pub angle: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            width: 25.0,
            height: 25.0,
            shake_factor: 0.0,
            angle: 0.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decay screen shake toward zero
    pub fn update(&mut self, dt: f32) {
        let shake_length = 0.1;
        self.shake_factor *= (0.9f32 * shake_length).powf(dt / 1000.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shake_decays() {
        let mut camera = Camera::new();
        camera.shake_factor = 1.0;
        for _ in 0..500 {
            camera.update(2.0);
        }
        // one second of decay leaves roughly (0.09)^1
        assert!(camera.shake_factor < 0.1);
        assert!(camera.shake_factor > 0.0);
    }
}
