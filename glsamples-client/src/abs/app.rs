//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which encapsulates the SDL2
//! window and the OpenGL context a sample renders into.

use std::ffi::c_void;
use std::sync::Arc;

use glow::HasContext;
use glsamples_core::config::{ContextConfig, WindowConfig};
use glsamples_core::extensions::{ExtensionSet, GlVersion};

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Creates a window with a compatibility-profile OpenGL context.
    /// The width and height are ignored if `fullscreen` is set.
    pub fn new(
        title: &str,
        window: &WindowConfig,
        context: &ContextConfig,
    ) -> Result<Self, String> {
        let sdl = sdl2::init()?;
        let video_subsystem = sdl.video()?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Compatibility);
        gl_attr.set_context_version(context.major, context.minor);
        gl_attr.set_depth_size(context.depth_bits);
        gl_attr.set_double_buffer(true);

        let (width, height) = if window.fullscreen {
            let mode = video_subsystem.current_display_mode(0)?;
            (mode.w as u32, mode.h as u32)
        } else {
            (window.width, window.height)
        };
        let mut sdl_window = video_subsystem
            .window(title, width, height)
            .opengl()
            .resizable()
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;
        if window.fullscreen {
            sdl_window.set_fullscreen(sdl2::video::FullscreenType::Desktop)?;
        }

        let gl_context = sdl_window.gl_create_context()?;
        sdl_window.gl_make_current(&gl_context)?;
        let interval = if window.vsync {
            sdl2::video::SwapInterval::VSync
        } else {
            sdl2::video::SwapInterval::Immediate
        };
        if let Err(e) = video_subsystem.gl_set_swap_interval(interval) {
            log::warn!("could not set swap interval: {e}");
        }

        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump()?;
        let gl = Arc::new(gl);

        unsafe {
            log::info!(
                "OpenGL {} ({})",
                gl.get_parameter_string(glow::VERSION),
                gl.get_parameter_string(glow::RENDERER)
            );
        }

        let app = Self {
            sdl,
            video_subsystem,
            window: sdl_window,
            gl_context,
            gl,
            event_pump,
        };
        let created = app.gl_version();
        if created < context.version() {
            log::warn!("requested OpenGL {}, the driver created {created}", context.version());
        }
        Ok(app)
    }

    /// Looks up a driver entry point by name.
    pub fn proc_address(&self, name: &str) -> *const c_void {
        self.video_subsystem.gl_get_proc_address(name) as *const c_void
    }

    /// The version of the context that was actually created.
    pub fn gl_version(&self) -> GlVersion {
        let version = self.gl.version();
        GlVersion::new(version.major, version.minor)
    }

    pub fn extensions(&self) -> ExtensionSet {
        self.gl.supported_extensions().iter().cloned().collect()
    }

    pub fn drawable_size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }
}
