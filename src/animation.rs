//! The animation loop.
//!
//! A two-state machine (`Stopped`, `Running`) that owns the particle field.
//! While running, each display refresh delivers one [`AnimationLoop::tick`],
//! which steps the simulation, draws the frame, and asks the host for the
//! next refresh. Ticks run to completion; nothing else touches the field
//! while one is in progress.

use crate::field::ParticleField;
use crate::pointer::PointerSample;
use crate::render::Renderer;
use crate::time::Time;
use crate::viewport::Viewport;

/// Access to the host's per-display-refresh callback.
pub trait FrameScheduler {
    /// Ask for one callback on the next display refresh.
    fn request_frame(&mut self);

    /// Drop any outstanding request.
    fn cancel_frame(&mut self);
}

/// Scheduler driven by hand; records whether a frame is pending.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    pending: bool,
    requests: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a frame has been requested and not cancelled.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending request, as a host would when it fires.
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Total requests ever made.
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) {
        self.pending = true;
        self.requests += 1;
    }

    fn cancel_frame(&mut self) {
        self.pending = false;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
}

/// Owns a [`ParticleField`] and advances it once per display refresh.
pub struct AnimationLoop<S: FrameScheduler> {
    state: LoopState,
    field: ParticleField,
    scheduler: S,
    time: Time,
}

impl<S: FrameScheduler> AnimationLoop<S> {
    /// Create a stopped loop.
    pub fn new(field: ParticleField, scheduler: S) -> Self {
        Self {
            state: LoopState::Stopped,
            field,
            scheduler,
            time: Time::new(),
        }
    }

    /// Begin requesting frames. No-op if already running.
    pub fn start(&mut self) {
        if self.state == LoopState::Running {
            return;
        }
        self.state = LoopState::Running;
        self.time.reset();
        self.scheduler.request_frame();
        log::debug!("animation started with {} particles", self.field.len());
    }

    /// Stop and release the pending frame request. No-op if already stopped.
    pub fn stop(&mut self) {
        if self.state == LoopState::Stopped {
            return;
        }
        self.state = LoopState::Stopped;
        self.scheduler.cancel_frame();
        log::debug!(
            "animation stopped after {} frames in {:.2?}",
            self.time.frame(),
            self.time.elapsed()
        );
    }

    #[inline]
    pub fn state(&self) -> LoopState {
        self.state
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Run one frame: simulate, draw, request the next refresh.
    ///
    /// Returns `false` without touching the field when stopped, which is how
    /// a late refresh callback after [`AnimationLoop::stop`] is ignored.
    pub fn tick<R: Renderer + ?Sized>(&mut self, pointer: PointerSample, renderer: &mut R) -> bool {
        if self.state != LoopState::Running {
            return false;
        }
        self.field.step(pointer);
        renderer.render(self.field.particles());

        if let Some(fps) = self.time.update() {
            log::debug!("{:.1} fps, {} particles", fps, self.field.len());
        }
        self.scheduler.request_frame();
        true
    }

    /// Stop, reseed the field over `viewport`, and restart if it was running.
    pub fn reseed(&mut self, viewport: Viewport) {
        let was_running = self.is_running();
        self.stop();
        self.field.reseed(viewport);
        if was_running {
            self.start();
        }
    }

    #[inline]
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    #[inline]
    pub fn field_mut(&mut self) -> &mut ParticleField {
        &mut self.field
    }

    #[inline]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[inline]
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Frames ticked since the last start.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.time.frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use crate::render::HeadlessSurface;
    use crate::spawn::SpawnContext;

    fn new_loop() -> AnimationLoop<ManualScheduler> {
        let field = ParticleField::with_spawn_context(
            FieldConfig {
                particle_count: 10,
                ..Default::default()
            },
            Viewport::new(800.0, 600.0),
            SpawnContext::from_seed(9),
        )
        .unwrap();
        AnimationLoop::new(field, ManualScheduler::new())
    }

    #[test]
    fn test_starts_stopped() {
        let mut anim = new_loop();
        let mut surface = HeadlessSurface::new();
        assert_eq!(anim.state(), LoopState::Stopped);
        assert!(!anim.tick(None, &mut surface));
        assert!(surface.commands().is_empty());
        assert!(!anim.scheduler().is_pending());
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut anim = new_loop();
        anim.start();
        anim.start();
        assert!(anim.is_running());
        assert_eq!(anim.scheduler().requests(), 1);
    }

    #[test]
    fn test_stop_is_idempotent_and_cancels() {
        let mut anim = new_loop();
        anim.stop();
        assert_eq!(anim.state(), LoopState::Stopped);

        anim.start();
        anim.stop();
        anim.stop();
        assert_eq!(anim.state(), LoopState::Stopped);
        assert!(!anim.scheduler().is_pending());
    }

    #[test]
    fn test_tick_draws_and_requests_next_frame() {
        let mut anim = new_loop();
        let mut surface = HeadlessSurface::new();
        anim.start();
        assert!(anim.scheduler_mut().take_pending());

        assert!(anim.tick(None, &mut surface));
        assert_eq!(surface.frames(), 1);
        assert_eq!(surface.last_frame().len(), 10);
        assert!(anim.scheduler().is_pending());
        assert_eq!(anim.frames(), 1);
    }

    #[test]
    fn test_reseed_keeps_running_state() {
        let mut anim = new_loop();
        anim.start();
        anim.reseed(Viewport::new(400.0, 300.0));
        assert!(anim.is_running());
        assert_eq!(anim.field().viewport(), Viewport::new(400.0, 300.0));

        anim.stop();
        anim.reseed(Viewport::new(200.0, 100.0));
        assert!(!anim.is_running());
    }
}
