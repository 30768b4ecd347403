//! Shader compilation and program linking.
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs. Both own
//! their GL object and delete it when dropped.

use std::sync::Arc;

use crate::{
    context::{GraphicsContext, ShaderStage},
    error::RegistryError,
};

/// A single compiled shader stage.
pub struct Shader<G: GraphicsContext> {
    gl: Arc<G>,
    id: G::Shader,
    stage: ShaderStage,
}

impl<G: GraphicsContext> Shader<G> {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<G>, stage: ShaderStage, source: &str) -> Result<Self, RegistryError> {
        let shader = gl
            .create_shader(stage)
            .map_err(|reason| RegistryError::Allocation {
                what: format!("{stage} shader"),
                reason,
            })?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        if !gl.shader_compile_status(shader) {
            let log = gl.shader_info_log(shader);
            gl.delete_shader(shader);
            return Err(RegistryError::ShaderCompile { stage, log });
        }

        log::trace!("compiled {stage} shader {shader:?}");

        Ok(Self {
            gl: Arc::clone(gl),
            id: shader,
            stage,
        })
    }

    /// The stage this shader was compiled for.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl<G: GraphicsContext> Drop for Shader<G> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

/// A linked shader program.
pub struct ShaderProgram<G: GraphicsContext> {
    gl: Arc<G>,
    id: G::Program,
}

impl<G: GraphicsContext> ShaderProgram<G> {
    /// Links a new shader program from the given shaders.
    pub fn new(gl: &Arc<G>, shaders: &[&Shader<G>]) -> Result<Self, RegistryError> {
        let program = gl
            .create_program()
            .map_err(|reason| RegistryError::Allocation {
                what: "program".to_string(),
                reason,
            })?;

        for shader in shaders {
            gl.attach_shader(program, shader.id);
        }

        gl.link_program(program);

        if !gl.program_link_status(program) {
            let log = gl.program_info_log(program);
            gl.delete_program(program);
            return Err(RegistryError::ProgramLink(log));
        }

        for shader in shaders {
            gl.detach_shader(program, shader.id);
        }

        Ok(Self {
            gl: Arc::clone(gl),
            id: program,
        })
    }

    /// Compiles a vertex and a fragment stage and links them together.
    pub fn from_sources(
        gl: &Arc<G>,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, RegistryError> {
        let vertex = Shader::new(gl, ShaderStage::Vertex, vertex_source)?;
        let fragment = Shader::new(gl, ShaderStage::Fragment, fragment_source)?;
        Self::new(gl, &[&vertex, &fragment])
    }

    /// The raw program handle.
    pub fn id(&self) -> G::Program {
        self.id
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        self.gl.use_program(Some(self.id));
    }
}

impl<G: GraphicsContext> Drop for ShaderProgram<G> {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}
