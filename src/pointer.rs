//! Pointer tracking.
//!
//! Keeps only the most recent pointer position in viewport pixels. There is
//! no smoothing: the simulator always sees the latest raw sample.

use glam::Vec2;
use winit::event::{TouchPhase, WindowEvent};

/// The latest pointer position, or `None` when the pointer is absent.
pub type PointerSample = Option<Vec2>;

/// Latest-sample pointer state.
///
/// Starts absent and becomes absent again when the pointer leaves the
/// window or a touch ends.
#[derive(Debug, Default, Clone)]
pub struct PointerTracker {
    latest: Option<Vec2>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sample the next tick should see.
    #[inline]
    pub fn sample(&self) -> PointerSample {
        self.latest
    }

    /// Record a pointer move.
    pub fn move_to(&mut self, position: Vec2) {
        self.latest = Some(position);
    }

    /// Mark the pointer as absent.
    pub fn leave(&mut self) {
        self.latest = None;
    }

    /// Process a winit window event. Returns `true` if the event was a
    /// pointer event.
    pub(crate) fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.move_to(Vec2::new(position.x as f32, position.y as f32));
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.leave();
                true
            }
            WindowEvent::Touch(touch) => {
                match touch.phase {
                    TouchPhase::Started | TouchPhase::Moved => {
                        self.move_to(Vec2::new(touch.location.x as f32, touch.location.y as f32))
                    }
                    TouchPhase::Ended | TouchPhase::Cancelled => self.leave(),
                }
                true
            }
            _ => false,
        }
    }
}
