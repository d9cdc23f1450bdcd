//! Configuration types for the backdrop.
//!
//! Both types can be serialized to JSON. Every field has a default, so a
//! config file only needs to list the values it changes:
//!
//! ```json
//! {
//!     "title": "History of the Internet",
//!     "field": { "particle_count": 300, "repulsion_strength": 1.2 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::particle::Rgb;

/// Largest particle count a field accepts.
pub const MAX_PARTICLES: usize = 1_000_000;

/// Closed interval `[min, max]` used for sampled particle attributes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn is_ordered(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Simulation constants of a particle field.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    pub particle_count: usize,
    /// Rendered circle radius in pixels.
    pub radius_range: ValueRange,
    /// Half-width of the base velocity range; each component is drawn
    /// from `[-velocity_range, velocity_range]`.
    pub velocity_range: f32,
    pub alpha_range: ValueRange,
    pub palette: Vec<Rgb>,
    /// Distance from the pointer within which particles are pushed away.
    pub interaction_radius: f32,
    /// Impulse magnitude at zero distance from the pointer.
    pub repulsion_strength: f32,
    /// Share of the current velocity kept each tick while relaxing
    /// toward the base drift.
    pub damping_factor: f32,
    /// Upper bound on speed in pixels per tick.
    pub max_speed: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 150,
            radius_range: ValueRange::new(1.0, 3.0),
            velocity_range: 0.2,
            alpha_range: ValueRange::new(0.2, 0.6),
            palette: vec![
                Rgb::new(148, 0, 211),
                Rgb::new(0, 123, 255),
                Rgb::new(200, 200, 220),
            ],
            interaction_radius: 180.0,
            repulsion_strength: 0.8,
            damping_factor: 0.95,
            max_speed: 1.5,
        }
    }
}

impl FieldConfig {
    /// Check every constant before any particle is created.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count > MAX_PARTICLES {
            return Err(invalid("particle_count", "must not exceed 1000000"));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if !self.radius_range.is_ordered() || self.radius_range.min <= 0.0 {
            return Err(invalid("radius_range", "must satisfy 0 < min <= max"));
        }
        if !self.alpha_range.is_ordered()
            || self.alpha_range.min <= 0.0
            || self.alpha_range.max > 1.0
        {
            return Err(invalid("alpha_range", "must satisfy 0 < min <= max <= 1"));
        }
        if !self.velocity_range.is_finite() || self.velocity_range < 0.0 {
            return Err(invalid("velocity_range", "must be finite and non-negative"));
        }
        if !self.interaction_radius.is_finite() || self.interaction_radius <= 0.0 {
            return Err(invalid("interaction_radius", "must be positive"));
        }
        if !self.repulsion_strength.is_finite() || self.repulsion_strength < 0.0 {
            return Err(invalid("repulsion_strength", "must be finite and non-negative"));
        }
        if !(0.0..1.0).contains(&self.damping_factor) {
            return Err(invalid("damping_factor", "must be in [0, 1)"));
        }
        if !self.max_speed.is_finite() || self.max_speed <= 0.0 {
            return Err(invalid("max_speed", "must be positive"));
        }
        if self.max_speed < self.velocity_range * std::f32::consts::SQRT_2 {
            return Err(invalid(
                "max_speed",
                "must be at least the largest base speed (velocity_range * sqrt(2))",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::InvalidValue { field, reason }
}

/// Top-level configuration of the windowed backdrop.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackdropConfig {
    pub title: String,
    /// Initial window size in logical pixels.
    pub width: u32,
    pub height: u32,
    /// Trailing delay before a burst of resize events triggers a reseed.
    pub resize_debounce_ms: u64,
    /// Background drawn behind the particles.
    pub clear_color: Rgb,
    pub field: FieldConfig,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            title: "driftfield".to_string(),
            width: 1280,
            height: 720,
            resize_debounce_ms: 150,
            clear_color: Rgb::new(9, 9, 20),
            field: FieldConfig::default(),
        }
    }
}

impl BackdropConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid("width/height", "window size must be non-zero"));
        }
        self.field.validate()
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}
