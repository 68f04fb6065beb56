//! Gameplay tuning for the asteroid dodge game.

use super::BurstTuning;

#[derive(Debug, Clone, Copy)]
pub struct GravityWellTuning {
    /// Fixed horizontal position of the ship.
    pub ship_x: f32,

    /// Collision radius of the ship in pixels.
    pub ship_radius: f32,

    /// Ship height at session start and after a reset.
    pub ship_start_y: f32,

    /// Set-point while standing.
    pub ship_high_y: f32,

    /// Set-point while squatting.
    pub ship_low_y: f32,

    /// Fraction of the remaining distance covered per tick.
    pub ship_easing: f32,

    /// Ticks between asteroid spawns.
    pub spawn_interval: u64,

    /// Horizontal entry point (just past the right edge).
    pub spawn_x: f32,

    /// Asteroids spawn at least this far from the top and bottom edges.
    pub spawn_margin: f32,

    pub radius_min: f32,
    pub radius_max: f32,

    /// Leftward speed in pixels per tick.
    pub speed_min: f32,
    pub speed_max: f32,

    /// Maximum absolute spin in radians per tick.
    pub max_spin: f32,

    /// Asteroids left of this x have been dodged.
    pub exit_x: f32,

    /// Delay between the ship being destroyed and the automatic reset.
    pub reset_delay_ms: f64,

    pub explosion: BurstTuning,
}

impl Default for GravityWellTuning {
    fn default() -> Self {
        Self {
            ship_x: 80.0,
            ship_radius: 14.0,
            ship_start_y: 160.0,
            ship_high_y: 60.0,
            ship_low_y: 260.0,
            ship_easing: 0.08,
            spawn_interval: 55,
            spawn_x: crate::consts::CANVAS_WIDTH + 40.0,
            spawn_margin: 30.0,
            radius_min: 18.0,
            radius_max: 38.0,
            speed_min: 2.5,
            speed_max: 4.5,
            max_spin: 0.025,
            exit_x: -50.0,
            reset_delay_ms: 2000.0,
            explosion: BurstTuning {
                count: 10,
                speed_min: 2.0,
                speed_max: 5.0,
                size_min: 3.0,
                size_max: 3.0,
                decay: 0.04,
            },
        }
    }
}
