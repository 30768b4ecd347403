//! The triangle scenes.
//!
//! Both scenes share one program setup: a unit triangle, two color
//! palettes, and one attribute group per palette. They differ in how the
//! moving triangles reach the GPU every frame.

use glam::Vec2;
use rand::Rng;
use trigl_core::{
    AnimationLoop, AttributeLayout, ComponentType, GlProgram, MovingShape, RegistryError,
};

use crate::config::{DemoConfig, RenderMode, SpawnConfig};

pub mod batched;
pub mod per_draw;

pub const RGB_TRIANGLE: &str = "rgb_triangle";
pub const FIERY_TRIANGLE: &str = "fiery_triangle";

pub const POSITION_ATTRIBUTE: &str = "vertexPosition";
pub const COLOR_ATTRIBUTE: &str = "vertexColor";

pub const SHAPE_LOCATION: &str = "shapeLocation";
pub const SHAPE_SIZE: &str = "shapeSize";
pub const CANVAS_SIZE: &str = "canvasSize";

/// Top middle, bottom left, bottom right.
#[rustfmt::skip]
const UNIT_TRIANGLE: [f32; 6] = [
    0.0, 1.0,
    -1.0, -1.0,
    1.0, -1.0,
];

/// Per-vertex RGB colors, one row per vertex.
#[rustfmt::skip]
pub const RGB_COLORS: [u8; 9] = [
    255, 0, 0,
    0, 255, 0,
    0, 0, 255,
];

#[rustfmt::skip]
pub const FIERY_COLORS: [u8; 9] = [
    229, 47, 15,
    246, 206, 29,
    233, 154, 26,
];

pub fn position_layout() -> AttributeLayout {
    AttributeLayout::new(2, ComponentType::Float)
}

pub fn color_layout() -> AttributeLayout {
    AttributeLayout::new(3, ComponentType::UnsignedByte).normalized(true)
}

/// Creates the shared buffers, uniforms and groups, and sizes the viewport.
pub fn setup(program: &mut GlProgram, width: i32, height: i32) -> Result<(), RegistryError> {
    program.create_buffer("position", &UNIT_TRIANGLE, POSITION_ATTRIBUTE, position_layout())?;
    program.create_buffer("rgb_color", &RGB_COLORS, COLOR_ATTRIBUTE, color_layout())?;
    program.create_buffer("fiery_color", &FIERY_COLORS, COLOR_ATTRIBUTE, color_layout())?;

    program.init_program(width, height);
    program.register_uniforms(&[SHAPE_LOCATION, SHAPE_SIZE, CANVAS_SIZE])?;
    program.set_uniform(CANVAS_SIZE, &[width as f32, height as f32])?;

    for (group, colors) in [(RGB_TRIANGLE, "rgb_color"), (FIERY_TRIANGLE, "fiery_color")] {
        let mut builder = program.start_attribute_group(group)?;
        builder.set_attribute_pointer("position")?;
        builder.set_attribute_pointer(colors)?;
        builder.end();
    }

    Ok(())
}

/// Picks a value from the inclusive range `[min, max]`.
fn random_in(rng: &mut impl Rng, [min, max]: [i32; 2]) -> f32 {
    rng.random_range(min..=max) as f32
}

/// Spawns `count` shapes with random position, velocity and size, each drawn
/// with one of `groups`.
pub fn random_shapes(
    rng: &mut impl Rng,
    count: usize,
    spawn: &SpawnConfig,
    groups: &[&str],
) -> Vec<MovingShape> {
    (0..count)
        .map(|_| {
            let position = Vec2::new(random_in(rng, spawn.position), random_in(rng, spawn.position));
            let velocity = Vec2::new(random_in(rng, spawn.velocity), random_in(rng, spawn.velocity));
            let size = random_in(rng, spawn.size);
            let group = groups[rng.random_range(0..groups.len())];
            MovingShape::new(position, velocity, size, group)
        })
        .collect()
}

/// Logs the frame rate implied by `delta`.
fn log_frame_rate(delta: f32) {
    if delta > 0.0 {
        log::info!("{:.1} fps", 1.0 / delta);
    }
}

/// Sets up `program` for the configured mode and schedules its first frame.
pub fn start(
    config: &DemoConfig,
    program: &mut GlProgram,
    frames: &mut AnimationLoop<GlProgram>,
    (width, height): (i32, i32),
) -> Result<(), RegistryError> {
    setup(program, width, height)?;

    let mut rng = rand::rng();
    match config.mode {
        RenderMode::PerDraw => {
            let shapes = random_shapes(
                &mut rng,
                config.triangles,
                &config.spawn,
                &[RGB_TRIANGLE, FIERY_TRIANGLE],
            );
            frames.schedule_next_frame(per_draw::PerDrawScene::new(shapes, config));
        }
        RenderMode::Batched => {
            let shapes = random_shapes(&mut rng, config.triangles, &config.spawn, &[RGB_TRIANGLE]);
            let scene = batched::BatchedScene::new(program, &mut rng, shapes, config)?;
            frames.schedule_next_frame(scene);
        }
    }

    log::info!("{} triangles, {:?} mode", config.triangles, config.mode);
    Ok(())
}
