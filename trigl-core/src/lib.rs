//! The core of trigl: a small registry of GPU resources for one shader
//! program, and a frame loop that derives delta time from a monotonic clock.
//!
//! Nothing here touches a window. The registry talks to the GPU through the
//! [`GraphicsContext`] trait, implemented for [`glow::Context`].

pub mod buffer;
pub mod context;
pub mod error;
pub mod program;
pub mod registry;
pub mod shape;
pub mod timing;

#[cfg(test)]
mod testing;

pub use buffer::{AttributeLayout, ComponentType, NamedBuffer};
pub use context::{GraphicsContext, ShaderStage};
pub use error::RegistryError;
pub use registry::{AttributeGroupBuilder, GlProgram};
pub use shape::MovingShape;
pub use timing::{AnimationLoop, Clock, FrameHandle, FrameTask, Schedule, SystemClock, Tick, Timer};
