//! The particle field and its two motion laws.
//!
//! Particles live in one contiguous `Vec` and are replaced wholesale on every
//! reinitialization — identity does not survive a mode cycle.  While orbiting,
//! a particle's position is a pure function of `(angle, radius)` about the
//! current center, so a window resize merely shifts the apparent center
//! without discarding state.

use std::f32::consts::TAU;

use rand::Rng;

use crate::choreography::Mode;
use crate::glyph::TargetPoint;

/// Angular advance per orbit tick, in radians.
pub const ORBIT_STEP: f32 = 0.004;

/// Fraction of the remaining distance covered per converge tick.
pub const EASE: f32 = 0.08;

// ════════════════════════════════════════════════════════════════════════════
// Particle
// ════════════════════════════════════════════════════════════════════════════

/// One rendered point.
///
/// `(tx, ty)` is only meaningful while converging; it is retained (stale)
/// in orbit mode and simply unused.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub angle:  f32,
    pub radius: f32,
    pub x:      f32,
    pub y:      f32,
    pub tx:     f32,
    pub ty:     f32,
}

impl Particle {
    /// A fresh particle on its orbit about `center`, target equal to position.
    fn at_orbit(angle: f32, radius: f32, center: (f32, f32)) -> Self {
        let x = center.0 + angle.cos() * radius;
        let y = center.1 + angle.sin() * radius;
        Particle { angle, radius, x, y, tx: x, ty: y }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleField
// ════════════════════════════════════════════════════════════════════════════

/// Owns the live particle collection and advances it one tick at a time.
#[derive(Debug, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new() -> Self {
        ParticleField { particles: Vec::new() }
    }

    /// Replace the whole field with `count` freshly randomized particles.
    ///
    /// Angles are uniform in `[0, 2π)`, radii uniform in
    /// `[base_radius, base_radius + radius_jitter)`.
    pub fn reinitialize(
        &mut self,
        count: usize,
        base_radius: f32,
        radius_jitter: f32,
        center: (f32, f32),
        rng: &mut impl Rng,
    ) {
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let angle = rng.gen_range(0.0..TAU);
            let radius = if radius_jitter > 0.0 {
                rng.gen_range(base_radius..base_radius + radius_jitter)
            } else {
                base_radius
            };
            self.particles.push(Particle::at_orbit(angle, radius, center));
        }
    }

    /// Cyclic, index-stable target assignment: particle `i` receives
    /// `targets[i % targets.len()]`.  No-op on an empty slice — callers must
    /// skip the convergence transition instead.
    pub fn assign_targets(&mut self, targets: &[TargetPoint]) {
        if targets.is_empty() {
            return;
        }
        for (i, p) in self.particles.iter_mut().enumerate() {
            let t = targets[i % targets.len()];
            p.tx = t.x;
            p.ty = t.y;
        }
    }

    /// Advance every particle one tick under the given motion law.
    ///
    /// The center is re-evaluated every tick so the field tracks a resizable
    /// surface.
    pub fn advance(&mut self, mode: Mode, center: (f32, f32)) {
        match mode {
            Mode::Orbiting => {
                for p in &mut self.particles {
                    p.angle += ORBIT_STEP;
                    p.x = center.0 + p.angle.cos() * p.radius;
                    p.y = center.1 + p.angle.sin() * p.radius;
                }
            }
            Mode::Converging => {
                for p in &mut self.particles {
                    p.x += (p.tx - p.x) * EASE;
                    p.y += (p.ty - p.y) * EASE;
                }
            }
        }
    }

    /// Current positions, in storage order, for drawing.
    pub fn positions(&self) -> impl Iterator<Item = (f32, f32)> + '_ {
        self.particles.iter().map(|p| (p.x, p.y))
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
