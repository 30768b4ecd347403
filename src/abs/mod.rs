//! Platform glue: the SDL2 window and the OpenGL context that the
//! triangle scenes draw into.

pub mod app;

pub use app::*;
