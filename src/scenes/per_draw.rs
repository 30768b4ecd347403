//! One draw call per triangle.

use trigl_core::{FrameTask, GlProgram, MovingShape, RegistryError, Schedule, Tick};

use super::{SHAPE_LOCATION, SHAPE_SIZE, log_frame_rate};
use crate::config::DemoConfig;

/// Moves every shape, then draws each one with its own uniforms and group.
pub struct PerDrawScene {
    shapes: Vec<MovingShape>,
    clear_color: [f32; 4],
    log_frames: bool,
}

impl PerDrawScene {
    pub fn new(shapes: Vec<MovingShape>, config: &DemoConfig) -> Self {
        Self {
            shapes,
            clear_color: config.clear_color,
            log_frames: config.log_frames,
        }
    }

    fn render(&mut self, program: &mut GlProgram, tick: Tick) -> Result<(), RegistryError> {
        if self.log_frames {
            log_frame_rate(tick.delta);
        }
        for shape in &mut self.shapes {
            shape.update(tick.delta);
        }

        let [r, g, b, a] = self.clear_color;
        program.clear(r, g, b, a);

        for shape in &self.shapes {
            program.set_uniform(SHAPE_SIZE, &[shape.size])?;
            program.set_uniform(SHAPE_LOCATION, &shape.position.to_array())?;
            program.bind_attribute_group(&shape.group)?;
            program.draw_triangles();
        }
        Ok(())
    }
}

impl FrameTask<GlProgram> for PerDrawScene {
    fn run(mut self: Box<Self>, program: &mut GlProgram, tick: Tick) -> Schedule<GlProgram> {
        match self.render(program, tick) {
            Ok(()) => Schedule::Next(self),
            Err(e) => {
                log::error!("per-draw frame failed: {e}");
                Schedule::Stop
            }
        }
    }
}
