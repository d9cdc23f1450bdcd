//! # driftfield
//!
//! A pointer-reactive ambient particle backdrop.
//!
//! A few hundred softly colored dots drift across the viewport. Dots near the
//! pointer are pushed away and then relax back to their own resting drift;
//! dots that leave one edge come back on the opposite one.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! fn main() -> Result<(), BackdropError> {
//!     Backdrop::new()
//!         .with_particle_count(200)
//!         .with_palette(vec![Rgb::new(148, 0, 211), Rgb::new(0, 123, 255)])
//!         .run()
//! }
//! ```
//!
//! ## Headless use
//!
//! The simulation does not depend on a window. Drive it by hand and draw
//! into any [`DrawSurface`]:
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! let field = ParticleField::new(FieldConfig::default(), Viewport::new(800.0, 600.0))?;
//! let mut animation = AnimationLoop::new(field, ManualScheduler::new());
//! let mut surface = HeadlessSurface::new();
//!
//! animation.start();
//! animation.tick(Some(Vec2::new(400.0, 300.0)), &mut surface);
//! ```
//!
//! ## Per-tick update
//!
//! | Step | Effect |
//! |------|--------|
//! | Repulsion | push away from the pointer, linear falloff to `interaction_radius` |
//! | Relaxation | `v = v * damping + base * (1 - damping)` |
//! | Clamp | speed capped at `max_speed`, direction kept |
//! | Integration | `position += v` |
//! | Wrap | leave one edge, re-enter at the opposite one |

pub mod animation;
mod app;
pub mod config;
pub mod error;
pub mod field;
mod gpu;
pub mod host;
pub mod particle;
pub mod pointer;
pub mod render;
pub mod simulator;
pub mod spawn;
pub mod time;
pub mod viewport;

pub use animation::{AnimationLoop, FrameScheduler, LoopState, ManualScheduler};
pub use app::Backdrop;
pub use config::{BackdropConfig, FieldConfig, ValueRange, MAX_PARTICLES};
pub use error::{BackdropError, ConfigError, GpuError};
pub use field::ParticleField;
pub use glam::{Vec2, Vec4};
pub use gpu::GpuSurface;
pub use host::BackdropHost;
pub use particle::{Particle, Rgb};
pub use pointer::{PointerSample, PointerTracker};
pub use render::{DrawCommand, DrawSurface, HeadlessSurface, Renderer};
pub use simulator::Dynamics;
pub use spawn::SpawnContext;
pub use viewport::{Viewport, ViewportManager};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use driftfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animation::{AnimationLoop, FrameScheduler, ManualScheduler};
    pub use crate::app::Backdrop;
    pub use crate::config::{BackdropConfig, FieldConfig, ValueRange};
    pub use crate::error::{BackdropError, ConfigError};
    pub use crate::field::ParticleField;
    pub use crate::host::BackdropHost;
    pub use crate::particle::{Particle, Rgb};
    pub use crate::pointer::{PointerSample, PointerTracker};
    pub use crate::render::{DrawSurface, HeadlessSurface, Renderer};
    pub use crate::viewport::Viewport;
    pub use crate::{Vec2, Vec4};
}
