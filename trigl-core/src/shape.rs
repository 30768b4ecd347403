//! Shapes animated by the demo scenes.
//!
//! A [`MovingShape`] only carries its kinematics; drawing is left to the
//! caller, which reads [`MovingShape::triangle`] or feeds the position and
//! size to uniforms.

use glam::Vec2;

/// A shape drifting across the surface at a constant velocity.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingShape {
    pub position: Vec2,
    /// Units per second.
    pub velocity: Vec2,
    pub size: f32,
    /// Name of the attribute group the shape is drawn with.
    pub group: String,
}

impl MovingShape {
    pub fn new(position: Vec2, velocity: Vec2, size: f32, group: impl Into<String>) -> Self {
        Self {
            position,
            velocity,
            size,
            group: group.into(),
        }
    }

    /// Moves the shape by `velocity * dt`.
    pub fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }

    /// Corners of the upward triangle spanned by the shape: top middle,
    /// bottom left, bottom right.
    pub fn triangle(&self) -> [Vec2; 3] {
        let Vec2 { x, y } = self.position;
        let s = self.size;
        [
            Vec2::new(x, y + s),
            Vec2::new(x - s, y - s),
            Vec2::new(x + s, y - s),
        ]
    }
}
