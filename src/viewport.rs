//! Viewport dimensions and debounced resize tracking.
//!
//! Interactive window resizes arrive as a burst of events, one per
//! intermediate size. [`ViewportManager`] collapses a burst into a single
//! settled size once no new event has arrived for the debounce delay, so the
//! particle field is reseeded once per resize gesture.

use std::time::{Duration, Instant};

use glam::Vec2;

/// Size of the drawing area in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero (e.g. a minimized window).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether a point lies inside `[0, width] x [0, height]`.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Viewport {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width as f32, size.height as f32)
    }
}

/// Trailing-edge debouncer for viewport size changes.
#[derive(Debug)]
pub struct ViewportManager {
    current: Viewport,
    pending: Option<(Viewport, Instant)>,
    debounce: Duration,
}

impl ViewportManager {
    pub fn new(initial: Viewport, debounce: Duration) -> Self {
        Self {
            current: initial,
            pending: None,
            debounce,
        }
    }

    /// The last settled viewport.
    #[inline]
    pub fn current(&self) -> Viewport {
        self.current
    }

    /// When the pending resize will settle, if one is pending.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, deadline)| deadline)
    }

    /// Record a size change observed at `now`.
    ///
    /// Every event pushes the deadline out again.
    pub fn notify(&mut self, size: Viewport, now: Instant) {
        if self.pending.is_none() && size == self.current {
            return;
        }
        self.pending = Some((size, now + self.debounce));
    }

    /// Return the settled size once the debounce delay has elapsed.
    ///
    /// Returns `None` while the burst is still in progress, and also when
    /// the burst ended on the size we already had.
    pub fn poll(&mut self, now: Instant) -> Option<Viewport> {
        match self.pending {
            Some((_, deadline)) if now >= deadline => self.settle(),
            _ => None,
        }
    }

    fn settle(&mut self) -> Option<Viewport> {
        let (size, _) = self.pending.take()?;
        if size == self.current {
            return None;
        }
        log::debug!(
            "viewport settled at {}x{} (was {}x{})",
            size.width,
            size.height,
            self.current.width,
            self.current.height
        );
        self.current = size;
        Some(size)
    }
}
