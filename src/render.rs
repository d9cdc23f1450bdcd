//! Drawing capability interfaces.
//!
//! The simulation never talks to a graphics API directly. It draws through
//! [`DrawSurface`], which the windowed host implements on the GPU and tests
//! implement with [`HeadlessSurface`].

use glam::{Vec2, Vec4};

use crate::particle::Particle;
use crate::viewport::Viewport;

/// A 2D drawing surface sized to the viewport.
pub trait DrawSurface {
    /// Match the surface to a new viewport size.
    fn resize(&mut self, viewport: Viewport);

    /// Clear the whole surface.
    fn clear(&mut self);

    /// Fill a circle, alpha-blended over what was drawn before.
    ///
    /// `fill` is RGBA in `0.0..=1.0`.
    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Vec4);
}

/// Draws one frame of particles.
pub trait Renderer {
    fn render(&mut self, particles: &[Particle]);
}

/// Clear, then draw every particle as a filled circle in array order.
impl<S: DrawSurface + ?Sized> Renderer for S {
    fn render(&mut self, particles: &[Particle]) {
        self.clear();
        for p in particles {
            self.fill_circle(p.position, p.radius, p.fill());
        }
    }
}

/// A recorded drawing operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    Circle { center: Vec2, radius: f32, fill: Vec4 },
}

/// Surface that records draw commands instead of drawing.
#[derive(Debug, Default, Clone)]
pub struct HeadlessSurface {
    size: Viewport,
    commands: Vec<DrawCommand>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface sized to `viewport`.
    pub fn with_size(viewport: Viewport) -> Self {
        Self {
            size: viewport,
            commands: Vec::new(),
        }
    }

    /// Size given by the last resize.
    pub fn size(&self) -> Viewport {
        self.size
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of frames started, i.e. clears recorded.
    pub fn frames(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear))
            .count()
    }

    /// Circles drawn since the most recent clear.
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map_or(0, |i| i + 1);
        &self.commands[start..]
    }

    pub fn reset(&mut self) {
        self.commands.clear();
    }
}

impl DrawSurface for HeadlessSurface {
    fn resize(&mut self, viewport: Viewport) {
        self.size = viewport;
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, fill: Vec4) {
        self.commands.push(DrawCommand::Circle { center, radius, fill });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Rgb;

    #[test]
    fn test_render_clears_then_draws_in_order() {
        let particles = [
            Particle::new(Vec2::new(1.0, 1.0), Vec2::ZERO, 1.0, Rgb::new(255, 0, 0), 0.2),
            Particle::new(Vec2::new(2.0, 2.0), Vec2::ZERO, 3.0, Rgb::new(0, 0, 255), 0.6),
        ];
        let mut surface = HeadlessSurface::new();
        surface.render(&particles);

        let cmds = surface.commands();
        assert_eq!(cmds.len(), 3);
        assert_eq!(cmds[0], DrawCommand::Clear);
        assert_eq!(
            cmds[1],
            DrawCommand::Circle {
                center: Vec2::new(1.0, 1.0),
                radius: 1.0,
                fill: Vec4::new(1.0, 0.0, 0.0, 0.2),
            }
        );
        assert!(matches!(cmds[2], DrawCommand::Circle { radius, .. } if radius == 3.0));
    }

    #[test]
    fn test_empty_frame_only_clears() {
        let mut surface = HeadlessSurface::new();
        surface.render(&[]);
        assert_eq!(surface.commands(), &[DrawCommand::Clear]);
        assert!(surface.last_frame().is_empty());
    }

    #[test]
    fn test_last_frame_tracks_latest_clear() {
        let p = [Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0, Rgb::new(0, 0, 0), 1.0)];
        let mut surface = HeadlessSurface::new();
        surface.render(&p);
        surface.render(&p);
        assert_eq!(surface.frames(), 2);
        assert_eq!(surface.last_frame().len(), 1);
    }

    #[test]
    fn test_resize_is_not_a_draw_command() {
        let mut surface = HeadlessSurface::with_size(Viewport::new(800.0, 600.0));
        surface.resize(Viewport::new(400.0, 300.0));
        assert_eq!(surface.size(), Viewport::new(400.0, 300.0));
        assert!(surface.commands().is_empty());
    }
}
