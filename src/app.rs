//! Windowed backdrop: builder and winit event handling.
//!
//! The lifecycle itself lives in [`BackdropHost`]; this module only owns the
//! window and routes winit events to it:
//!
//! | Event | Effect |
//! |-------|--------|
//! | `CursorMoved`, `Touch` | update the [`PointerTracker`](crate::PointerTracker) |
//! | `CursorLeft`, touch end | pointer becomes absent |
//! | `Resized` | [`BackdropHost::notify_resize`]; reseed once the burst settles |
//! | `RedrawRequested` | one [`BackdropHost::frame`], then present |
//! | `CloseRequested` | teardown, exit |

use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::animation::FrameScheduler;
use crate::config::{BackdropConfig, FieldConfig};
use crate::error::BackdropError;
use crate::field::ParticleField;
use crate::gpu::GpuSurface;
use crate::host::BackdropHost;
use crate::particle::Rgb;
use crate::viewport::Viewport;

/// A particle backdrop builder.
///
/// Use method chaining to configure, then call `.run()` to open the window.
pub struct Backdrop {
    config: BackdropConfig,
}

impl Backdrop {
    /// Create a backdrop with default settings.
    pub fn new() -> Self {
        Self {
            config: BackdropConfig::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: BackdropConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the field constants.
    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.config.field = field;
        self
    }

    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.config.field.particle_count = count;
        self
    }

    /// Set the colors particles are drawn from.
    pub fn with_palette(mut self, palette: Vec<Rgb>) -> Self {
        self.config.field.palette = palette;
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    /// Validate the configuration, open the window and run until it closes.
    pub fn run(self) -> Result<(), BackdropError> {
        self.config.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App::new(self.config);
        event_loop.run_app(&mut app)?;

        match app.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame scheduler backed by `Window::request_redraw`.
///
/// winit cannot withdraw a redraw request, so cancelling only clears the
/// pending flag; a stopped loop ignores the late redraw.
struct RedrawScheduler {
    window: Arc<Window>,
    pending: bool,
}

impl RedrawScheduler {
    fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            pending: false,
        }
    }

    /// The requested redraw is being delivered.
    fn fired(&mut self) {
        self.pending = false;
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) {
        if !self.pending {
            self.pending = true;
            self.window.request_redraw();
        }
    }

    fn cancel_frame(&mut self) {
        self.pending = false;
    }
}

struct App {
    config: BackdropConfig,
    window: Option<Arc<Window>>,
    host: BackdropHost<RedrawScheduler, GpuSurface>,
    fatal: Option<BackdropError>,
}

impl App {
    fn new(config: BackdropConfig) -> Self {
        Self {
            config,
            window: None,
            host: BackdropHost::new(),
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: BackdropError) {
        log::error!("{}", error);
        self.fatal = Some(error);
        self.teardown();
        event_loop.exit();
    }

    /// Tear the host down before releasing the window it draws into.
    fn teardown(&mut self) {
        self.host.teardown();
        self.window = None;
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(animation) = self.host.animation_mut() {
            animation.scheduler_mut().fired();
        }
        if !self.host.frame() {
            return;
        }
        let Some(surface) = self.host.surface_mut() else {
            return;
        };

        let out_of_memory = match surface.present() {
            Ok(()) => false,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let Some(window) = &self.window {
                    surface.reconfigure(window.inner_size());
                }
                false
            }
            Err(wgpu::SurfaceError::OutOfMemory) => true,
            Err(e) => {
                log::warn!("render error: {:?}", e);
                false
            }
        };

        if out_of_memory {
            log::error!("GPU out of memory, closing backdrop");
            self.teardown();
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.window = Some(window.clone());

        let surface = pollster::block_on(GpuSurface::new(window.clone(), self.config.clear_color));
        let viewport = Viewport::from(window.inner_size());
        let field = match ParticleField::new(self.config.field.clone(), viewport) {
            Ok(field) => field,
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let debounce = Duration::from_millis(self.config.resize_debounce_ms);
        if let Err(e) = self
            .host
            .mount(surface, field, RedrawScheduler::new(window), debounce)
        {
            // The window stays usable; only the background is missing.
            log::error!("{}", BackdropError::from(e));
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.host.notify_resize(Viewport::from(size), Instant::now());
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            other => {
                if let Some(pointer) = self.host.pointer_mut() {
                    pointer.handle_event(&other);
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        match self.host.poll_resize(Instant::now()) {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.teardown();
    }
}
