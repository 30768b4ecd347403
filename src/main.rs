use std::path::PathBuf;

use trigl_core::{AnimationLoop, GlProgram};

use crate::{abs::App, config::DemoConfig};

mod abs;
mod config;
mod logging;
mod scenes;

/// Builds a [`GlProgram`] from `shaders/<name>/vert.glsl` and `frag.glsl`.
#[macro_export]
macro_rules! gl_program {
    ($name:ident, $gl:expr, $path_prefix:literal) => {{
        GlProgram::new(
            &$gl,
            include_str!(concat!(
                $path_prefix,
                "/shaders/",
                stringify!($name),
                "/vert.glsl"
            )),
            include_str!(concat!(
                $path_prefix,
                "/shaders/",
                stringify!($name),
                "/frag.glsl"
            )),
        )
    }};
}

fn main() {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = match DemoConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(config.log_level()) {
        eprintln!("failed to set up logging: {e}");
    }

    if let Err(e) = run(&config) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(config: &DemoConfig) -> Result<(), String> {
    let mut app = App::new(&config.title, config.width, config.height, config.fullscreen)?;
    let mut program = gl_program!(triangle, app.gl, ".").map_err(|e| e.to_string())?;

    let mut frames = AnimationLoop::new();
    scenes::start(config, &mut program, &mut frames, app.drawable_size()).map_err(|e| e.to_string())?;

    'running: loop {
        let mut resized = false;
        for event in app.event_pump.poll_iter() {
            match event {
                sdl2::event::Event::Quit { .. } => break 'running,
                event if is_resize(&event) => resized = true,
                _ => {}
            }
        }

        if resized {
            // Window events report window coordinates; the viewport wants pixels.
            let (width, height) = app.drawable_size();
            program.init_program(width, height);
            program
                .set_uniform(scenes::CANVAS_SIZE, &[width as f32, height as f32])
                .map_err(|e| e.to_string())?;
            log::debug!("resized to {width}x{height}");
        }

        frames.tick(&mut program);
        if frames.is_idle() {
            return Err("scene stopped".to_string());
        }

        app.window.gl_swap_window();
    }

    log::info!("window closed");
    Ok(())
}

fn is_resize(event: &sdl2::event::Event) -> bool {
    matches!(
        event,
        sdl2::event::Event::Window {
            win_event: sdl2::event::WindowEvent::Resized(..) | sdl2::event::WindowEvent::SizeChanged(..),
            ..
        }
    )
}

#[cfg(test)]
mod tests {
    use sdl2::event::{Event, WindowEvent};

    use super::*;

    fn window_event(win_event: WindowEvent) -> Event {
        Event::Window {
            timestamp: 0,
            window_id: 1,
            win_event,
        }
    }

    #[test]
    fn test_size_events_trigger_resize() {
        assert!(is_resize(&window_event(WindowEvent::Resized(400, 300))));
        assert!(is_resize(&window_event(WindowEvent::SizeChanged(800, 600))));
    }

    #[test]
    fn test_other_events_do_not_resize() {
        assert!(!is_resize(&window_event(WindowEvent::Moved(10, 10))));
        assert!(!is_resize(&window_event(WindowEvent::Exposed)));
        assert!(!is_resize(&Event::Quit { timestamp: 0 }));
    }
}
