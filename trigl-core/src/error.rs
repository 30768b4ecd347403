use thiserror::Error;

use crate::context::ShaderStage;

/// Everything that can go wrong while talking to a [`GlProgram`](crate::GlProgram).
///
/// None of these are recoverable at the registry level; callers are expected
/// to report them and stop the current run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("could not compile {stage} shader: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("program failed to link: {0}")]
    ProgramLink(String),

    #[error("failed to allocate {what}: {reason}")]
    Allocation { what: String, reason: String },

    #[error("attribute `{0}` not found on program")]
    AttributeNotFound(String),

    #[error("buffer `{0}` was not created")]
    UnknownBuffer(String),

    #[error("attribute group `{0}` was not found")]
    UnknownGroup(String),

    #[error("failed to resolve uniform locations: {}", .0.join(", "))]
    UniformNotFound(Vec<String>),

    #[error("uniform `{0}` was not registered")]
    UnregisteredUniform(String),

    #[error("no values provided for uniform `{0}`")]
    EmptyValues(String),

    #[error("uniform `{name}` given {count} values, only 1 or 2 are supported")]
    UnsupportedArity { name: String, count: usize },

    #[error("cannot draw {0} vertices in one call")]
    VertexCountOverflow(usize),
}
