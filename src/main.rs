#[macro_use] extern crate clap;
#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;

pub mod graphics;
pub mod interface;
pub mod renderer;

use std::time::{Duration, Instant};

use glutin::{
    dpi::LogicalSize,
    event_loop::{
        EventLoop,
        ControlFlow
    },
    window::WindowBuilder,
    event::{
        Event,
        WindowEvent,
        KeyboardInput,
        ElementState
    },
    Api,
    ContextBuilder,
    GlProfile,
    GlRequest
};

use self::graphics::GraphicsError;
use self::graphics::utils::{drain_gl_errors, gl_string};
use self::interface::cli::{parse_settings, ConfigError, Settings};
use self::interface::input::{handle_keypress, Command};
use self::renderer::GasketRenderer;

fn run(settings: Settings) -> Result<(), GraphicsError> {
    let events = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(settings.title.clone())
        .with_inner_size(LogicalSize::new(settings.width, settings.height));

    let win_context = ContextBuilder::new()
        .with_gl(GlRequest::Specific(Api::OpenGl, (4, 1)))
        .with_gl_profile(GlProfile::Core)
        .build_windowed(window, &events)
        .map_err(|e| GraphicsError::Context(e.to_string()))?;

    let win_context = unsafe {
        win_context.make_current()
            .map_err(|(_, e)| GraphicsError::Context(e.to_string()))?
    };

    gl::load_with(|s| win_context.get_proc_address(s) as *const std::ffi::c_void);
    info!("OpenGL version: {}", gl_string(gl::VERSION));

    let mut renderer = GasketRenderer::new(&settings)?;
    drain_gl_errors("setup");

    if let Some(level) = settings.initial_depth {
        if let Err(e) = renderer.request(level) {
            error!("Couldn't draw level {}: {}", level, e);
        }
    }

    let frame_time = Duration::from_secs(1) / settings.fps;

    events.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::WaitUntil(Instant::now() + frame_time);

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,

                WindowEvent::Resized(physical_size) => {
                    win_context.resize(physical_size);
                    unsafe {
                        gl::Viewport(0, 0, physical_size.width as i32, physical_size.height as i32);
                    }
                },

                WindowEvent::KeyboardInput {
                    input: KeyboardInput {
                        state: ElementState::Pressed,
                        virtual_keycode: Some(key),
                        ..
                    },
                    ..
                } => match handle_keypress(key) {
                    Some(Command::Quit) => *control_flow = ControlFlow::Exit,

                    Some(Command::Level(level)) => {
                        info!("Key {} pressed", level);
                        match renderer.request(level) {
                            Ok(()) => win_context.window().request_redraw(),
                            Err(e) => error!("Couldn't draw level {}: {}", level, e),
                        }
                    },

                    None => {}
                },

                _ => {}
            },

            Event::MainEventsCleared => win_context.window().request_redraw(),

            Event::RedrawRequested(_) => {
                renderer.draw();
                drain_gl_errors("frame");

                if let Err(e) = win_context.swap_buffers() {
                    error!("Couldn't present the frame: {}", e);
                    *control_flow = ControlFlow::Exit;
                }
            },

            _ => {}
        }
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match parse_settings(std::env::args_os()) {
        Ok(settings) => settings,
        Err(ConfigError::Clap(e)) => e.exit(),
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(settings) {
        error!("Error starting gasket: {}", e);
        std::process::exit(1);
    }
}
