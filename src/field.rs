//! The particle field: the live particle collection plus its constants.
//!
//! A field is always replaced wholesale. [`ParticleField::reseed`] discards
//! every particle and spawns a fresh population over the given viewport,
//! which is what happens on first mount and after every settled resize.

use crate::config::FieldConfig;
use crate::error::ConfigError;
use crate::particle::Particle;
use crate::pointer::PointerSample;
use crate::simulator::{self, Dynamics};
use crate::spawn::SpawnContext;
use crate::viewport::Viewport;

/// Ordered particle collection with its simulation constants.
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: FieldConfig,
    dynamics: Dynamics,
    viewport: Viewport,
    particles: Vec<Particle>,
    spawn: SpawnContext,
}

impl ParticleField {
    /// Validate `config` and seed a field over `viewport`.
    pub fn new(config: FieldConfig, viewport: Viewport) -> Result<Self, ConfigError> {
        Self::with_spawn_context(config, viewport, SpawnContext::new())
    }

    /// Like [`ParticleField::new`] with a caller-provided RNG context,
    /// typically [`SpawnContext::from_seed`] for reproducible tests.
    pub fn with_spawn_context(
        config: FieldConfig,
        viewport: Viewport,
        spawn: SpawnContext,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut field = Self {
            dynamics: Dynamics::from(&config),
            config,
            viewport,
            particles: Vec::new(),
            spawn,
        };
        field.reseed(viewport);
        Ok(field)
    }

    /// Replace every particle with a fresh population over `viewport`.
    pub fn reseed(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let count = self.config.particle_count;
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            // The palette was validated as non-empty.
            if let Some(p) = self.spawn.particle(&self.config, viewport) {
                particles.push(p);
            }
        }
        self.particles = particles;
        log::debug!(
            "seeded {} particles over {}x{}",
            self.particles.len(),
            viewport.width,
            viewport.height
        );
    }

    /// Advance every particle by one tick.
    pub fn step(&mut self, pointer: PointerSample) {
        simulator::step(&mut self.particles, pointer, &self.dynamics, self.viewport);
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the particles, e.g. to place them in tests.
    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[inline]
    pub fn dynamics(&self) -> &Dynamics {
        &self.dynamics
    }
}
