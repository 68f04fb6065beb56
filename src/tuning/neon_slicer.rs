//! Gameplay tuning for the energy-core slicing game.

use super::BurstTuning;

#[derive(Debug, Clone, Copy)]
pub struct NeonSlicerTuning {
    /// Ticks between scheduled core spawns.
    pub spawn_interval: u64,

    /// A core is spawned every tick while fewer than this many are alive.
    pub min_cores: usize,

    /// Cores spawn at least this far from every edge.
    pub spawn_margin: f32,

    pub radius_min: f32,
    pub radius_max: f32,

    /// Life lost per tick; life starts at 1.0.
    pub decay_min: f32,
    pub decay_max: f32,

    /// Pulsation phase advance per tick (cosmetic).
    pub pulse_rate: f32,

    /// Extra reach added to a core's radius for slice tests.
    pub slice_reach: f32,

    /// Maximum trail points kept per hand.
    pub trail_length: usize,

    /// Trail point life lost per tick.
    pub trail_decay: f32,

    pub slice_burst: BurstTuning,
}

impl Default for NeonSlicerTuning {
    fn default() -> Self {
        Self {
            spawn_interval: 75,
            min_cores: 3,
            spawn_margin: 50.0,
            radius_min: 22.0,
            radius_max: 38.0,
            decay_min: 0.003,
            decay_max: 0.005,
            pulse_rate: 0.06,
            slice_reach: 20.0,
            trail_length: 12,
            trail_decay: 0.08,
            slice_burst: BurstTuning {
                count: 12,
                speed_min: 3.0,
                speed_max: 7.0,
                size_min: 2.0,
                size_max: 5.0,
                decay: 0.035,
            },
        }
    }
}
