//! Decorative Particle Field
//!
//! The floating herbal specks behind the landing screen. Each particle gets
//! a random position, a random start phase in [0 s, 2 s), and a random float
//! period in [6 s, 10 s), then bobs on a loop. Pure decoration: nothing
//! reads this state.

use std::time::Duration;

use rand::Rng;

/// Glyphs a particle can render as, dimmest to brightest
const GLYPHS: [char; 3] = ['.', '*', 'o'];

/// One floating particle
#[derive(Clone, Debug)]
pub struct Particle {
    /// Horizontal position as a fraction of the field width
    pub x: f32,
    /// Vertical position as a fraction of the field height
    pub y: f32,
    /// Time into the float cycle
    phase: Duration,
    /// Full float cycle length
    period: Duration,
}

impl Particle {
    /// Progress through the current cycle, 0.0 to 1.0
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.phase.as_secs_f32() / self.period.as_secs_f32()
    }

    /// The glyph for the current cycle progress
    #[must_use]
    pub fn glyph(&self) -> char {
        // Brighten toward mid-cycle, dim again toward the end
        let p = self.progress();
        let brightness = 1.0 - (2.0 * p - 1.0).abs();
        let idx = (brightness * (GLYPHS.len() - 1) as f32).round() as usize;
        GLYPHS[idx.min(GLYPHS.len() - 1)]
    }

    /// Vertical bob offset in rows
    #[must_use]
    pub fn bob(&self) -> i16 {
        let p = self.progress();
        if p < 0.25 || p >= 0.75 {
            0
        } else if p < 0.5 {
            -1
        } else {
            1
        }
    }
}

/// The whole particle field
#[derive(Clone, Debug, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Scatter `count` particles with random positions and timings
    #[must_use]
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|_| Particle {
                x: rng.gen_range(0.0..1.0),
                y: rng.gen_range(0.0..1.0),
                phase: Duration::from_millis(rng.gen_range(0..2000)),
                period: Duration::from_millis(rng.gen_range(6000..10000)),
            })
            .collect();

        Self { particles }
    }

    /// All particles
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Advance every particle's cycle
    pub fn update(&mut self, delta: Duration) {
        for particle in &mut self.particles {
            particle.phase += delta;
            while particle.phase >= particle.period {
                particle.phase -= particle.period;
            }
        }
    }
}
