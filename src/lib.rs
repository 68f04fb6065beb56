//! KinetiCore - motion-controlled arcade minigames
//!
//! Core modules:
//! - `sim`: Per-game simulations (entities, collisions, scoring, lifecycle)
//! - `net`: Pose channel fed by the external pose-tracking service
//! - `tuning`: Data-driven game balance
//! - `arcade`: Shell tying the pose channel to the active minigame
//! - `profile`: Local pilot profile bookkeeping (XP, level, streak)
//! - `renderer`: Canvas2D presentation (browser only)

pub mod arcade;
pub mod net;
pub mod profile;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use arcade::Arcade;
pub use profile::{PilotProfile, ProfileBook};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Drawing surface owned by each minigame
    pub const CANVAS_WIDTH: f32 = 620.0;
    pub const CANVAS_HEIGHT: f32 = 300.0;

    /// Target display refresh rate. Simulation steps are per frame, not per second.
    pub const FRAME_RATE: u32 = 60;
    /// Nominal frame length in milliseconds
    pub const FRAME_MS: f64 = 1000.0 / FRAME_RATE as f64;

    /// Pose service endpoint
    pub const POSE_SERVER_URL: &str = "ws://localhost:8765";
    /// Delay before a dropped pose connection is retried
    pub const RECONNECT_DELAY_MS: f64 = 3000.0;
}

/// Move `current` a fixed fraction of the way toward `target`.
///
/// Single-pole smoothing: the result always lies between `current` and
/// `target` for `factor` in [0, 1].
#[inline]
pub fn ease_toward(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor.clamp(0.0, 1.0)
}

/// Whole days since the Unix epoch for a millisecond timestamp
#[inline]
pub fn day_index(timestamp_ms: f64) -> i64 {
    (timestamp_ms / 86_400_000.0).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ease_toward_converges() {
        let mut y = 160.0;
        for _ in 0..200 {
            y = ease_toward(y, 60.0, 0.08);
        }
        assert!((y - 60.0).abs() < 0.01);
    }

    #[test]
    fn test_day_index() {
        assert_eq!(day_index(0.0), 0);
        assert_eq!(day_index(86_399_999.0), 0);
        assert_eq!(day_index(86_400_000.0), 1);
    }

    proptest! {
        #[test]
        fn ease_stays_between_endpoints(
            current in -1000.0f32..1000.0,
            target in -1000.0f32..1000.0,
            factor in 0.0f32..1.0,
        ) {
            let next = ease_toward(current, target, factor);
            let (lo, hi) = if current < target { (current, target) } else { (target, current) };
            prop_assert!(next >= lo - 1e-3 && next <= hi + 1e-3);
        }
    }
}
