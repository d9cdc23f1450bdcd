//! Per-tick particle update.
//!
//! Each tick applies, per particle and in this order:
//!
//! 1. **Pointer repulsion** - inside `interaction_radius`, an impulse of
//!    `(radius - d) / radius * strength` pointing away from the pointer.
//! 2. **Relaxation** - `v = v * damping + base * (1 - damping)`.
//! 3. **Speed clamp** - `|v| <= max_speed`, direction preserved.
//! 4. **Integration** - `position += v`. One tick is one time unit; there is
//!    no delta time, so apparent speed follows the display refresh rate.
//! 5. **Wrap-around** - a particle whose circle has fully left one edge
//!    reappears just outside the opposite edge with its velocity unchanged.

use glam::Vec2;

use crate::config::FieldConfig;
use crate::particle::Particle;
use crate::pointer::PointerSample;
use crate::viewport::Viewport;

/// The constants that drive the update, split out of [`FieldConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dynamics {
    pub interaction_radius: f32,
    pub repulsion_strength: f32,
    pub damping_factor: f32,
    pub max_speed: f32,
}

impl From<&FieldConfig> for Dynamics {
    fn from(config: &FieldConfig) -> Self {
        Self {
            interaction_radius: config.interaction_radius,
            repulsion_strength: config.repulsion_strength,
            damping_factor: config.damping_factor,
            max_speed: config.max_speed,
        }
    }
}

/// Repulsion impulse on a particle at `position` from a pointer at `pointer`.
///
/// Zero at and beyond the interaction radius. At zero distance the push
/// points along +x with full strength.
pub fn repulsion(position: Vec2, pointer: Vec2, dynamics: &Dynamics) -> Vec2 {
    let away = position - pointer;
    let distance = away.length();
    if distance >= dynamics.interaction_radius {
        return Vec2::ZERO;
    }
    let force = (dynamics.interaction_radius - distance) / dynamics.interaction_radius
        * dynamics.repulsion_strength;
    away.try_normalize().unwrap_or(Vec2::X) * force
}

/// Move a particle that fully left the viewport to the opposite side.
pub fn wrap(particle: &mut Particle, viewport: Viewport) {
    let r = particle.radius;
    let p = &mut particle.position;

    if p.x + r < 0.0 {
        p.x = viewport.width + r;
    } else if p.x - r > viewport.width {
        p.x = -r;
    }
    if p.y + r < 0.0 {
        p.y = viewport.height + r;
    } else if p.y - r > viewport.height {
        p.y = -r;
    }
}

/// Advance one particle by one tick.
pub fn step_particle(
    particle: &mut Particle,
    pointer: PointerSample,
    dynamics: &Dynamics,
    viewport: Viewport,
) {
    if let Some(pointer) = pointer {
        particle.velocity += repulsion(particle.position, pointer, dynamics);
    }

    let damping = dynamics.damping_factor;
    particle.velocity = particle.velocity * damping + particle.base_velocity * (1.0 - damping);

    particle.velocity = particle.velocity.clamp_length_max(dynamics.max_speed);

    particle.position += particle.velocity;

    wrap(particle, viewport);
}

/// Advance every particle by one tick.
pub fn step(particles: &mut [Particle], pointer: PointerSample, dynamics: &Dynamics, viewport: Viewport) {
    for particle in particles {
        step_particle(particle, pointer, dynamics, viewport);
    }
}
