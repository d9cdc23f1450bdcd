//! Animation loop and backdrop host lifecycle, driven by a manual scheduler
//! and a recording surface in place of a window.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use driftfield::{
    AnimationLoop, BackdropHost, DrawCommand, DrawSurface, FieldConfig, FrameScheduler, GpuError,
    HeadlessSurface, LoopState, ManualScheduler, ParticleField, PointerTracker, SpawnContext,
    Vec2, Vec4, Viewport, ViewportManager,
};

const DEBOUNCE: Duration = Duration::from_millis(150);

fn new_loop(count: usize, viewport: Viewport) -> AnimationLoop<ManualScheduler> {
    let config = FieldConfig {
        particle_count: count,
        ..Default::default()
    };
    let field = ParticleField::with_spawn_context(config, viewport, SpawnContext::from_seed(21))
        .expect("valid config");
    AnimationLoop::new(field, ManualScheduler::new())
}

/// Deliver pending refresh callbacks the way a host would.
fn run_frames(
    anim: &mut AnimationLoop<ManualScheduler>,
    pointer: &PointerTracker,
    surface: &mut HeadlessSurface,
    frames: usize,
) -> usize {
    let mut delivered = 0;
    for _ in 0..frames {
        if !anim.scheduler_mut().take_pending() {
            break;
        }
        if anim.tick(pointer.sample(), surface) {
            delivered += 1;
        }
    }
    delivered
}

#[test]
fn test_empty_field_draws_nothing() {
    let mut anim = new_loop(0, Viewport::new(800.0, 600.0));
    let mut surface = HeadlessSurface::new();
    let mut pointer = PointerTracker::new();
    pointer.move_to(Vec2::new(10.0, 10.0));

    anim.start();
    assert_eq!(run_frames(&mut anim, &pointer, &mut surface, 10), 10);
    assert_eq!(surface.frames(), 10);
    assert!(surface
        .commands()
        .iter()
        .all(|c| matches!(c, DrawCommand::Clear)));
}

#[test]
fn test_frames_flow_until_stopped() {
    let mut anim = new_loop(25, Viewport::new(800.0, 600.0));
    let mut surface = HeadlessSurface::new();
    let pointer = PointerTracker::new();

    // Nothing is scheduled before start
    assert_eq!(run_frames(&mut anim, &pointer, &mut surface, 5), 0);

    anim.start();
    assert_eq!(run_frames(&mut anim, &pointer, &mut surface, 5), 5);
    assert_eq!(surface.last_frame().len(), 25);

    anim.stop();
    assert_eq!(anim.state(), LoopState::Stopped);
    assert_eq!(run_frames(&mut anim, &pointer, &mut surface, 5), 0);
    assert_eq!(surface.frames(), 5);
}

#[test]
fn test_late_refresh_after_stop_is_ignored() {
    let mut anim = new_loop(5, Viewport::new(800.0, 600.0));
    let mut surface = HeadlessSurface::new();
    anim.start();
    anim.stop();

    let before: Vec<_> = anim.field().particles().to_vec();
    assert!(!anim.tick(None, &mut surface));
    assert_eq!(anim.field().particles(), before.as_slice());
    assert!(surface.commands().is_empty());
}

#[test]
fn test_pointer_sample_reaches_simulation() {
    let viewport = Viewport::new(800.0, 600.0);
    let mut anim = new_loop(1, viewport);
    let mut surface = HeadlessSurface::new();
    let mut pointer = PointerTracker::new();

    let origin = Vec2::new(400.0, 300.0);
    anim.field_mut().particles_mut()[0].position = origin;
    pointer.move_to(origin - Vec2::new(10.0, 0.0));

    anim.start();
    run_frames(&mut anim, &pointer, &mut surface, 1);
    let p = anim.field().particles()[0];
    // Pushed right, away from the pointer on its left
    assert!(p.velocity.x > p.base_velocity.x);

    match surface.last_frame()[0] {
        DrawCommand::Circle { center, radius, .. } => {
            assert_eq!(center, p.position);
            assert_eq!(radius, p.radius);
        }
        DrawCommand::Clear => panic!("expected a circle"),
    }
}

#[test]
fn test_settled_resize_reseeds_into_new_viewport() {
    let start = Instant::now();
    let large = Viewport::new(800.0, 600.0);
    let small = Viewport::new(400.0, 300.0);
    let mut anim = new_loop(150, large);
    let mut manager = ViewportManager::new(large, Duration::from_millis(150));
    let mut surface = HeadlessSurface::new();
    let pointer = PointerTracker::new();

    anim.start();
    run_frames(&mut anim, &pointer, &mut surface, 30);

    // Interactive drag from 800x600 down to 400x300
    for i in 0..=8u32 {
        let size = Viewport::new(800.0 - i as f32 * 50.0, 600.0 - i as f32 * 37.5);
        manager.notify(size, start + Duration::from_millis(u64::from(i) * 16));
    }
    assert_eq!(manager.poll(start + Duration::from_millis(200)), None);

    let settled = manager
        .poll(start + Duration::from_millis(128 + 150))
        .expect("burst settled");
    assert_eq!(settled, small);

    anim.reseed(settled);
    assert!(anim.is_running());
    assert_eq!(anim.field().len(), 150);
    assert!(anim
        .field()
        .particles()
        .iter()
        .all(|p| small.contains(p.position)));

    assert!(run_frames(&mut anim, &pointer, &mut surface, 10) > 0);
}

// ============================================================================
// Backdrop host
// ============================================================================

type EventLog = Rc<RefCell<Vec<&'static str>>>;

/// Scheduler that records frame requests, cancellations and its release.
struct RecordingScheduler {
    log: EventLog,
}

impl FrameScheduler for RecordingScheduler {
    fn request_frame(&mut self) {
        self.log.borrow_mut().push("request frame");
    }

    fn cancel_frame(&mut self) {
        self.log.borrow_mut().push("cancel frame");
    }
}

impl Drop for RecordingScheduler {
    fn drop(&mut self) {
        self.log.borrow_mut().push("release loop");
    }
}

/// Headless surface that records its own release.
struct RecordingSurface {
    inner: HeadlessSurface,
    log: EventLog,
}

impl DrawSurface for RecordingSurface {
    fn resize(&mut self, viewport: Viewport) {
        self.inner.resize(viewport);
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Vec4) {
        self.inner.fill_circle(center, radius, fill);
    }
}

impl Drop for RecordingSurface {
    fn drop(&mut self) {
        self.log.borrow_mut().push("release surface");
    }
}

fn seeded_field(count: usize, viewport: Viewport) -> ParticleField {
    let config = FieldConfig {
        particle_count: count,
        ..Default::default()
    };
    ParticleField::with_spawn_context(config, viewport, SpawnContext::from_seed(33))
        .expect("valid config")
}

fn mounted_host(viewport: Viewport) -> BackdropHost<ManualScheduler, HeadlessSurface> {
    let mut host = BackdropHost::new();
    host.mount(
        Ok(HeadlessSurface::new()),
        seeded_field(50, viewport),
        ManualScheduler::new(),
        DEBOUNCE,
    )
    .expect("surface available");
    host
}

fn surface_size<S: FrameScheduler>(host: &BackdropHost<S, HeadlessSurface>) -> Viewport {
    host.surface().expect("mounted").size()
}

#[test]
fn test_mount_sizes_surface_and_starts_loop() {
    let viewport = Viewport::new(800.0, 600.0);
    let mut host = mounted_host(viewport);

    assert!(host.is_mounted());
    assert!(host.pointer().is_some());
    assert!(host.is_listening_for_resize());
    assert_eq!(surface_size(&host), viewport);
    assert!(host.animation().expect("mounted").is_running());

    host.pointer_mut().expect("attached").move_to(Vec2::new(400.0, 300.0));
    assert!(host.frame());
    assert_eq!(host.surface().expect("mounted").last_frame().len(), 50);
}

#[test]
fn test_unavailable_surface_attaches_nothing() {
    let log = EventLog::default();
    let mut host: BackdropHost<RecordingScheduler, HeadlessSurface> = BackdropHost::new();

    let result = host.mount(
        Err(GpuError::NoAdapter),
        seeded_field(50, Viewport::new(800.0, 600.0)),
        RecordingScheduler { log: log.clone() },
        DEBOUNCE,
    );
    assert!(matches!(result, Err(GpuError::NoAdapter)));

    assert!(!host.is_mounted());
    assert!(host.pointer().is_none());
    assert!(!host.is_listening_for_resize());
    assert!(host.animation().is_none());
    assert!(!host.frame());

    let start = Instant::now();
    host.notify_resize(Viewport::new(400.0, 300.0), start);
    assert_eq!(host.poll_resize(start + DEBOUNCE), None);

    // The loop was never started, only dropped
    assert_eq!(*log.borrow(), vec!["release loop"]);
}

#[test]
fn test_teardown_stops_loop_before_releasing_surface() {
    let log = EventLog::default();
    let mut host = BackdropHost::new();
    host.mount(
        Ok(RecordingSurface {
            inner: HeadlessSurface::new(),
            log: log.clone(),
        }),
        seeded_field(20, Viewport::new(800.0, 600.0)),
        RecordingScheduler { log: log.clone() },
        DEBOUNCE,
    )
    .expect("surface available");
    assert!(host.frame());

    host.teardown();
    assert_eq!(
        *log.borrow(),
        vec![
            "request frame",
            "request frame",
            "cancel frame",
            "release loop",
            "release surface"
        ]
    );
    assert!(!host.is_mounted());
    assert!(host.pointer().is_none());
    assert!(!host.is_listening_for_resize());
    assert!(host.animation().is_none());

    // Late events after teardown go nowhere
    assert!(host.pointer_mut().is_none());
    assert!(!host.frame());
    let start = Instant::now();
    host.notify_resize(Viewport::new(400.0, 300.0), start);
    assert_eq!(host.poll_resize(start + DEBOUNCE), None);

    host.teardown();
    assert_eq!(log.borrow().len(), 5);
}

#[test]
fn test_surface_resized_together_with_reseed() {
    let large = Viewport::new(800.0, 600.0);
    let small = Viewport::new(640.0, 480.0);
    let mut host = mounted_host(large);
    let start = Instant::now();

    host.notify_resize(small, start);
    assert_eq!(host.poll_resize(start + Duration::from_millis(50)), Some(start + DEBOUNCE));
    assert_eq!(surface_size(&host), large);
    assert_eq!(host.animation().expect("mounted").field().viewport(), large);

    assert_eq!(host.poll_resize(start + DEBOUNCE), None);
    assert_eq!(surface_size(&host), small);
    let animation = host.animation().expect("mounted");
    assert_eq!(animation.field().viewport(), small);
    assert!(animation.is_running());
    assert!(animation
        .field()
        .particles()
        .iter()
        .all(|p| small.contains(p.position)));
}

#[test]
fn test_empty_viewport_stops_until_restored() {
    let mut host = mounted_host(Viewport::new(800.0, 600.0));
    let start = Instant::now();

    // Minimized
    host.notify_resize(Viewport::new(0.0, 0.0), start);
    host.poll_resize(start + DEBOUNCE);
    assert_eq!(
        host.animation().expect("mounted").state(),
        LoopState::Stopped
    );
    assert!(!host.animation().expect("mounted").scheduler().is_pending());
    assert!(!host.frame());

    // Restored at a new size
    let restored = Viewport::new(400.0, 300.0);
    let later = start + Duration::from_secs(1);
    host.notify_resize(restored, later);
    host.poll_resize(later + DEBOUNCE);

    let animation = host.animation().expect("mounted");
    assert!(animation.is_running());
    assert_eq!(animation.field().viewport(), restored);
    assert_eq!(animation.field().len(), 50);
    assert!(animation
        .field()
        .particles()
        .iter()
        .all(|p| restored.contains(p.position)));
    assert_eq!(surface_size(&host), restored);
    assert!(host.frame());
}
