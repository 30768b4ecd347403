//! All triangles in one buffer, drawn with a single call.
//!
//! Uniforms are set to the identity transform once; every frame the
//! triangle corners are computed on the CPU and streamed into the
//! `positions_batched` buffer.

use rand::Rng;
use trigl_core::{FrameTask, GlProgram, MovingShape, RegistryError, Schedule, Tick};

use super::{
    COLOR_ATTRIBUTE, FIERY_COLORS, POSITION_ATTRIBUTE, RGB_COLORS, SHAPE_LOCATION, SHAPE_SIZE,
    color_layout, log_frame_rate, position_layout,
};
use crate::config::DemoConfig;

pub const POSITIONS_BUFFER: &str = "positions_batched";
pub const COLORS_BUFFER: &str = "colors_batched";
pub const BATCH_GROUP: &str = "lots_of_triangles";

/// Floats per triangle: three corners of two components.
const FLOATS_PER_TRIANGLE: usize = 6;

pub struct BatchedScene {
    shapes: Vec<MovingShape>,
    positions: Vec<f32>,
    clear_color: [f32; 4],
    log_frames: bool,
}

impl BatchedScene {
    /// Creates the batch buffers and group and leaves the group bound.
    pub fn new(
        program: &mut GlProgram,
        rng: &mut impl Rng,
        shapes: Vec<MovingShape>,
        config: &DemoConfig,
    ) -> Result<Self, RegistryError> {
        program.set_uniform(SHAPE_SIZE, &[1.0])?;
        program.set_uniform(SHAPE_LOCATION, &[0.0, 0.0])?;

        let positions = vec![0.0f32; shapes.len() * FLOATS_PER_TRIANGLE];
        program.create_buffer(POSITIONS_BUFFER, &positions, POSITION_ATTRIBUTE, position_layout())?;

        let palettes = [RGB_COLORS, FIERY_COLORS];
        let colors: Vec<u8> = (0..shapes.len())
            .flat_map(|_| palettes[rng.random_range(0..palettes.len())])
            .collect();
        program.create_buffer(COLORS_BUFFER, &colors, COLOR_ATTRIBUTE, color_layout())?;

        let mut builder = program.start_attribute_group(BATCH_GROUP)?;
        builder.set_attribute_pointer(POSITIONS_BUFFER)?;
        builder.set_attribute_pointer(COLORS_BUFFER)?;
        builder.end();
        program.bind_attribute_group(BATCH_GROUP)?;

        Ok(Self {
            shapes,
            positions,
            clear_color: config.clear_color,
            log_frames: config.log_frames,
        })
    }

    fn render(&mut self, program: &mut GlProgram, tick: Tick) -> Result<(), RegistryError> {
        if self.log_frames {
            log_frame_rate(tick.delta);
        }
        for shape in &mut self.shapes {
            shape.update(tick.delta);
        }
        pack_triangles(&self.shapes, &mut self.positions);
        program.update_buffer(POSITIONS_BUFFER, &self.positions)?;

        let [r, g, b, a] = self.clear_color;
        program.clear(r, g, b, a);
        program.draw(self.shapes.len() * 3)
    }
}

impl FrameTask<GlProgram> for BatchedScene {
    fn run(mut self: Box<Self>, program: &mut GlProgram, tick: Tick) -> Schedule<GlProgram> {
        match self.render(program, tick) {
            Ok(()) => Schedule::Next(self),
            Err(e) => {
                log::error!("batched frame failed: {e}");
                Schedule::Stop
            }
        }
    }
}

/// Writes the corners of every shape's triangle into `out`, replacing its contents.
pub fn pack_triangles(shapes: &[MovingShape], out: &mut Vec<f32>) {
    out.clear();
    out.reserve(shapes.len() * FLOATS_PER_TRIANGLE);
    for shape in shapes {
        for corner in shape.triangle() {
            out.extend_from_slice(&[corner.x, corner.y]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_pack_triangles_layout() {
        let shapes = [
            MovingShape::new(Vec2::new(100.0, 100.0), Vec2::ZERO, 10.0, BATCH_GROUP),
            MovingShape::new(Vec2::new(0.0, 50.0), Vec2::ZERO, 5.0, BATCH_GROUP),
        ];
        let mut out = vec![42.0; 3];
        pack_triangles(&shapes, &mut out);

        #[rustfmt::skip]
        let expected = [
            100.0, 110.0, 90.0, 90.0, 110.0, 90.0,
            0.0, 55.0, -5.0, 45.0, 5.0, 45.0,
        ];
        assert_eq!(out, expected);
    }

    #[test]
    fn test_pack_triangles_empty() {
        let mut out = vec![1.0; 6];
        pack_triangles(&[], &mut out);
        assert!(out.is_empty());
    }
}
