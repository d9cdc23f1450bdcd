//! Backdrop lifecycle, independent of any window system.
//!
//! [`BackdropHost`] holds the mounted pieces of a running backdrop: the
//! drawing surface, the animation loop, and the pointer and resize handling.
//! The winit application forwards its events here; tests drive the same
//! host with [`ManualScheduler`](crate::ManualScheduler) and
//! [`HeadlessSurface`](crate::HeadlessSurface).
//!
//! Pointer and resize handling are `Option`s: `None` means the listener is
//! detached and events of that kind are dropped.

use std::time::{Duration, Instant};

use crate::animation::{AnimationLoop, FrameScheduler};
use crate::error::GpuError;
use crate::field::ParticleField;
use crate::pointer::PointerTracker;
use crate::render::DrawSurface;
use crate::viewport::{Viewport, ViewportManager};

pub struct BackdropHost<S: FrameScheduler, D: DrawSurface> {
    surface: Option<D>,
    animation: Option<AnimationLoop<S>>,
    pointer: Option<PointerTracker>,
    resize: Option<ViewportManager>,
}

impl<S: FrameScheduler, D: DrawSurface> BackdropHost<S, D> {
    /// An unmounted host.
    pub fn new() -> Self {
        Self {
            surface: None,
            animation: None,
            pointer: None,
            resize: None,
        }
    }

    /// Attach the surface, listeners and loop, then start the loop.
    ///
    /// When `surface` is an error, nothing is attached and the error is
    /// handed back; the host stays unmounted. The loop only starts if the
    /// field's viewport is non-empty.
    pub fn mount(
        &mut self,
        surface: Result<D, GpuError>,
        field: ParticleField,
        scheduler: S,
        debounce: Duration,
    ) -> Result<(), GpuError> {
        let mut surface = surface?;
        let viewport = field.viewport();
        surface.resize(viewport);

        self.surface = Some(surface);
        self.pointer = Some(PointerTracker::new());
        self.resize = Some(ViewportManager::new(viewport, debounce));

        let mut animation = AnimationLoop::new(field, scheduler);
        if !viewport.is_empty() {
            animation.start();
        }
        log::info!(
            "backdrop running: {} particles over {}x{}",
            animation.field().len(),
            viewport.width,
            viewport.height
        );
        self.animation = Some(animation);
        Ok(())
    }

    /// Stop the loop, detach the pointer and resize listeners, then release
    /// the loop and the surface. Safe to call more than once.
    pub fn teardown(&mut self) {
        if let Some(animation) = &mut self.animation {
            animation.stop();
        }
        self.pointer = None;
        self.resize = None;
        self.animation = None;
        self.surface = None;
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// Record a host resize notification. Dropped when detached.
    pub fn notify_resize(&mut self, size: Viewport, now: Instant) {
        if let Some(resize) = &mut self.resize {
            resize.notify(size, now);
        }
    }

    /// Apply a settled resize, if one is due at `now`.
    ///
    /// Returns the deadline of the resize still pending, for the host to
    /// wake up at.
    pub fn poll_resize(&mut self, now: Instant) -> Option<Instant> {
        let resize = self.resize.as_mut()?;
        let settled = resize.poll(now);
        let deadline = resize.deadline();
        if let Some(viewport) = settled {
            self.apply_viewport(viewport);
        }
        deadline
    }

    /// Resize the surface and reseed over `viewport`. An empty viewport
    /// stops the loop until a non-empty one arrives.
    fn apply_viewport(&mut self, viewport: Viewport) {
        if let Some(surface) = &mut self.surface {
            surface.resize(viewport);
        }
        let Some(animation) = &mut self.animation else {
            return;
        };
        if viewport.is_empty() {
            animation.stop();
            return;
        }
        animation.reseed(viewport);
        animation.start();
        log::info!(
            "reseeded {} particles for {}x{}",
            animation.field().len(),
            viewport.width,
            viewport.height
        );
    }

    /// Run one refresh: step the field with the latest pointer sample and
    /// draw it. Returns `false` if nothing was drawn.
    pub fn frame(&mut self) -> bool {
        let pointer = self.pointer.as_ref().and_then(PointerTracker::sample);
        match (self.animation.as_mut(), self.surface.as_mut()) {
            (Some(animation), Some(surface)) => animation.tick(pointer, surface),
            _ => false,
        }
    }

    #[inline]
    pub fn pointer(&self) -> Option<&PointerTracker> {
        self.pointer.as_ref()
    }

    #[inline]
    pub fn pointer_mut(&mut self) -> Option<&mut PointerTracker> {
        self.pointer.as_mut()
    }

    /// Whether resize notifications are being listened to.
    #[inline]
    pub fn is_listening_for_resize(&self) -> bool {
        self.resize.is_some()
    }

    #[inline]
    pub fn animation(&self) -> Option<&AnimationLoop<S>> {
        self.animation.as_ref()
    }

    #[inline]
    pub fn animation_mut(&mut self) -> Option<&mut AnimationLoop<S>> {
        self.animation.as_mut()
    }

    #[inline]
    pub fn surface(&self) -> Option<&D> {
        self.surface.as_ref()
    }

    #[inline]
    pub fn surface_mut(&mut self) -> Option<&mut D> {
        self.surface.as_mut()
    }
}

impl<S: FrameScheduler, D: DrawSurface> Default for BackdropHost<S, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FrameScheduler, D: DrawSurface> Drop for BackdropHost<S, D> {
    fn drop(&mut self) {
        self.teardown();
    }
}
