//! Gameplay tuning for the lunge-driven shield game.

use super::BurstTuning;

#[derive(Debug, Clone, Copy)]
pub struct ShieldWallTuning {
    /// Lane centers, left to right. Lunges target the outer lanes.
    pub lanes: [f32; 5],

    /// Ticks between laser spawns.
    pub spawn_interval: u64,

    /// Vertical entry point (just above the top edge).
    pub spawn_y: f32,

    /// Downward speed in pixels per tick.
    pub speed_min: f32,
    pub speed_max: f32,

    /// Horizontal wobble amplitude in pixels.
    pub wobble_amplitude: f32,

    /// Wobble phase advance per tick.
    pub wobble_rate: f32,

    /// Full width of the shield; a laser is blocked within half of it.
    pub shield_width: f32,

    /// Vertical position of the shield.
    pub shield_y: f32,

    /// Fraction of the remaining distance covered per tick.
    pub shield_easing: f32,

    /// Lasers are resolved once their y enters [impact_top, impact_bottom].
    pub impact_top: f32,
    pub impact_bottom: f32,

    pub max_health: u32,

    /// Health lost per unblocked laser (floored at zero).
    pub damage: u32,

    /// Damage flash intensity lost per tick.
    pub flash_decay: f32,

    /// Delay between the shield going down and the automatic reset.
    pub reset_delay_ms: f64,

    pub block_burst: BurstTuning,
}

impl ShieldWallTuning {
    pub fn left_lane(&self) -> f32 {
        self.lanes[0]
    }

    pub fn center_lane(&self) -> f32 {
        self.lanes[self.lanes.len() / 2]
    }

    pub fn right_lane(&self) -> f32 {
        self.lanes[self.lanes.len() - 1]
    }
}

impl Default for ShieldWallTuning {
    fn default() -> Self {
        Self {
            lanes: [130.0, 220.0, 310.0, 400.0, 490.0],
            spawn_interval: 70,
            spawn_y: -20.0,
            speed_min: 3.0,
            speed_max: 5.0,
            wobble_amplitude: 6.0,
            wobble_rate: 0.1,
            shield_width: 200.0,
            shield_y: 260.0,
            shield_easing: 0.12,
            impact_top: 248.0,
            impact_bottom: 272.0,
            max_health: 100,
            damage: 12,
            flash_decay: 0.05,
            reset_delay_ms: 2500.0,
            block_burst: BurstTuning {
                count: 14,
                speed_min: 2.0,
                speed_max: 5.0,
                size_min: 2.0,
                size_max: 4.0,
                decay: 0.04,
            },
        }
    }
}
