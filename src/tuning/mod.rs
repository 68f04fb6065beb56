//! Data-driven game balance
//!
//! Gameplay tuning lives here, separate from runtime constants in
//! `crate::consts` (canvas size, endpoint, reconnect delay).

pub mod gravity_well;
pub mod neon_slicer;
pub mod shield_wall;

pub use gravity_well::GravityWellTuning;
pub use neon_slicer::NeonSlicerTuning;
pub use shield_wall::ShieldWallTuning;

/// Shape of an explosion/slice particle burst.
#[derive(Debug, Clone, Copy)]
pub struct BurstTuning {
    /// Particles per burst, spread evenly around the circle.
    pub count: u32,

    /// Minimum and maximum outward speed in pixels per tick.
    pub speed_min: f32,
    pub speed_max: f32,

    /// Minimum and maximum particle edge length in pixels.
    pub size_min: f32,
    pub size_max: f32,

    /// Life lost per tick (life starts at 1.0).
    pub decay: f32,
}
