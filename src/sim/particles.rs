//! Visual particles
//!
//! Purely cosmetic: particles never affect gameplay. Each one loses a fixed
//! amount of life per tick and is culled the tick it reaches zero.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::BurstTuning;

/// Maximum live particles per session; the oldest are dropped first
pub const MAX_PARTICLES: usize = 256;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    pub life: f32, // 0-1, decreases over time
    pub decay: f32,
    pub size: f32,
}

/// Emit a ring of particles at `pos`, evenly spaced by angle with random speeds.
pub fn spawn_burst<R: Rng>(
    particles: &mut Vec<Particle>,
    rng: &mut R,
    pos: Vec2,
    color: u32,
    burst: &BurstTuning,
) {
    let step = TAU / burst.count.max(1) as f32;
    for i in 0..burst.count {
        let angle = step * i as f32;
        let speed = rng.random_range(burst.speed_min..=burst.speed_max);
        let size = rng.random_range(burst.size_min..=burst.size_max);
        particles.push(Particle {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            color,
            life: 1.0,
            decay: burst.decay,
            size,
        });
    }

    if particles.len() > MAX_PARTICLES {
        let excess = particles.len() - MAX_PARTICLES;
        particles.drain(..excess);
    }
}

/// Advance every particle one tick and cull the dead ones.
pub fn update_particles(particles: &mut Vec<Particle>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.life -= p.decay;
    }
    particles.retain(|p| p.life > 0.0);
}
