//! Minigame simulation module
//!
//! All gameplay logic lives here. Nothing in this module draws, touches the
//! network or reads the clock:
//! - Time is passed in (`now_ms`), one `update` per display frame
//! - Seeded RNG only
//! - Pose input arrives as decoded `PoseSample`s

pub mod collision;
pub mod game;
pub mod gravity_well;
pub mod lifecycle;
pub mod neon_slicer;
pub mod particles;
pub mod pose;
pub mod runtime;
pub mod shield_wall;

pub use collision::{circles_overlap, within_half_width, within_reach};
pub use game::{ActiveGame, GameEvent, GameKind, Minigame};
pub use gravity_well::{Asteroid, GravityWell};
pub use lifecycle::Lifecycle;
pub use neon_slicer::{Core, HandCursor, NeonSlicer, TrailPoint};
pub use particles::{MAX_PARTICLES, Particle};
pub use pose::{Hand, HandSample, LungeDir, PoseSample};
pub use runtime::GameRuntime;
pub use shield_wall::{LASER_COLOR, Laser, SHIELD_COLOR, ShieldWall, Side};
