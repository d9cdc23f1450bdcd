//! Particle and color value types.

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel RGB color.
///
/// Palettes are stored in this form; conversion to normalized floats happens
/// only when a particle is drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized color with the given opacity.
    pub fn with_alpha(self, alpha: f32) -> Vec4 {
        Vec4::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha,
        )
    }
}

/// A single particle of the backdrop.
///
/// Particles have no identity beyond their index in the field.
/// `base_velocity`, `radius`, `color` and `alpha` are fixed at creation;
/// only `position` and `velocity` change from tick to tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Viewport coordinates in pixels, origin top-left.
    pub position: Vec2,
    /// Displacement applied on the next tick.
    pub velocity: Vec2,
    /// Resting drift that `velocity` relaxes back to.
    pub base_velocity: Vec2,
    pub radius: f32,
    pub color: Rgb,
    pub alpha: f32,
}

impl Particle {
    /// Create a particle at rest on its base drift.
    pub fn new(position: Vec2, base_velocity: Vec2, radius: f32, color: Rgb, alpha: f32) -> Self {
        Self {
            position,
            velocity: base_velocity,
            base_velocity,
            radius,
            color,
            alpha,
        }
    }

    /// Current speed in pixels per tick.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Fill color for drawing, RGBA in `0.0..=1.0`.
    #[inline]
    pub fn fill(&self) -> Vec4 {
        self.color.with_alpha(self.alpha)
    }
}
