//! Spawn context for particle seeding.
//!
//! Wraps the random number generator and provides the sampling helpers the
//! field needs when it (re)creates its particles.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::{FieldConfig, ValueRange};
use crate::particle::{Particle, Rgb};
use crate::viewport::Viewport;

/// Random sampling helpers used while seeding a field.
///
/// ```ignore
/// let mut ctx = SpawnContext::new();
/// let position = ctx.random_in_viewport(viewport);
/// let drift = ctx.random_velocity(0.2);
/// ```
#[derive(Debug, Clone)]
pub struct SpawnContext {
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context seeded from OS entropy; runs are not reproducible.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Create a reproducible context.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    // ========== Random primitives ==========

    /// Random f32 in `[min, max]`. A degenerate range returns `min`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    /// Random f32 inside a configured range.
    #[inline]
    pub fn random_in(&mut self, range: ValueRange) -> f32 {
        self.random_range(range.min, range.max)
    }

    // ========== Geometry ==========

    /// Uniform point inside the viewport. Zero-sized axes yield 0.
    pub fn random_in_viewport(&mut self, viewport: Viewport) -> Vec2 {
        Vec2::new(
            self.random_range(0.0, viewport.width.max(0.0)),
            self.random_range(0.0, viewport.height.max(0.0)),
        )
    }

    /// Velocity with both components uniform in `[-half_range, half_range]`.
    ///
    /// Symmetric around zero, so the net drift of a field is unbiased.
    pub fn random_velocity(&mut self, half_range: f32) -> Vec2 {
        Vec2::new(
            self.random_range(-half_range, half_range),
            self.random_range(-half_range, half_range),
        )
    }

    /// Uniform choice from a palette.
    pub fn random_color(&mut self, palette: &[Rgb]) -> Option<Rgb> {
        palette.choose(&mut self.rng).copied()
    }

    // ========== Particles ==========

    /// Spawn one particle for a validated config.
    ///
    /// Returns `None` only if the palette is empty.
    pub fn particle(&mut self, config: &FieldConfig, viewport: Viewport) -> Option<Particle> {
        let base_velocity = self.random_velocity(config.velocity_range);
        let position = self.random_in_viewport(viewport);
        let radius = self.random_in(config.radius_range);
        let color = self.random_color(&config.palette)?;
        let alpha = self.random_in(config.alpha_range);
        Some(Particle::new(position, base_velocity, radius, color, alpha))
    }
}

impl Default for SpawnContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_range_bounds() {
        let mut ctx = SpawnContext::from_seed(7);
        for _ in 0..200 {
            let v = ctx.random_range(1.0, 3.0);
            assert!((1.0..=3.0).contains(&v));
        }
    }

    #[test]
    fn test_degenerate_range_returns_min() {
        let mut ctx = SpawnContext::from_seed(7);
        assert_eq!(ctx.random_range(2.0, 2.0), 2.0);
        assert_eq!(ctx.random_range(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_random_in_empty_viewport() {
        let mut ctx = SpawnContext::from_seed(1);
        let p = ctx.random_in_viewport(Viewport::new(0.0, 0.0));
        assert_eq!(p, Vec2::ZERO);
    }

    #[test]
    fn test_velocity_is_symmetric() {
        let mut ctx = SpawnContext::from_seed(3);
        let n = 5000;
        let mut sum = Vec2::ZERO;
        for _ in 0..n {
            let v = ctx.random_velocity(0.2);
            assert!(v.x.abs() <= 0.2 && v.y.abs() <= 0.2);
            sum += v;
        }
        let mean = sum / n as f32;
        assert!(mean.x.abs() < 0.02 && mean.y.abs() < 0.02);
    }

    #[test]
    fn test_random_color_uses_every_entry() {
        let palette = [Rgb::new(1, 0, 0), Rgb::new(0, 1, 0), Rgb::new(0, 0, 1)];
        let mut ctx = SpawnContext::from_seed(11);
        let mut seen = [false; 3];
        for _ in 0..300 {
            let c = ctx.random_color(&palette).unwrap();
            let idx = palette.iter().position(|p| *p == c).unwrap();
            seen[idx] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(ctx.random_color(&[]), None);
    }

    #[test]
    fn test_spawned_particle_matches_config() {
        let config = FieldConfig::default();
        let viewport = Viewport::new(800.0, 600.0);
        let mut ctx = SpawnContext::from_seed(5);
        for _ in 0..100 {
            let p = ctx.particle(&config, viewport).unwrap();
            assert!(viewport.contains(p.position));
            assert!(config.radius_range.contains(p.radius));
            assert!(config.alpha_range.contains(p.alpha));
            assert!(config.palette.contains(&p.color));
            assert_eq!(p.velocity, p.base_velocity);
        }
    }
}
