//! Game catalog and the capability interface shared by every minigame

use serde::{Deserialize, Serialize};

use super::gravity_well::GravityWell;
use super::lifecycle::Lifecycle;
use super::neon_slicer::NeonSlicer;
use super::particles::Particle;
use super::pose::{Hand, PoseSample};
use super::shield_wall::ShieldWall;

/// The playable minigames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    /// Squat to dodge asteroids
    GravityWell,
    /// Swing hands to slice energy cores
    NeonSlicer,
    /// Lunge to move a shield under incoming lasers
    ShieldWall,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::GravityWell, GameKind::NeonSlicer, GameKind::ShieldWall];

    /// Stable identifier used by the page and settings
    pub fn id(&self) -> &'static str {
        match self {
            GameKind::GravityWell => "gravity-well",
            GameKind::NeonSlicer => "neon-slicer",
            GameKind::ShieldWall => "shield-wall",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::GravityWell => "GRAVITY WELL",
            GameKind::NeonSlicer => "NEON SLICER",
            GameKind::ShieldWall => "SHIELD WALL",
        }
    }

    /// Exercise the pose service has to track for this game
    pub fn exercise(&self) -> &'static str {
        match self {
            GameKind::GravityWell => "Squats",
            GameKind::NeonSlicer => "High Knees / Arm Swings",
            GameKind::ShieldWall => "Lunges",
        }
    }

    pub fn xp_reward(&self) -> u32 {
        match self {
            GameKind::GravityWell => 90,
            GameKind::NeonSlicer => 120,
            GameKind::ShieldWall => 150,
        }
    }

    /// Accent color (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            GameKind::GravityWell => 0x00fff7,
            GameKind::NeonSlicer => 0xff00aa,
            GameKind::ShieldWall => 0xf97316,
        }
    }
}

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// An asteroid left the screen without hitting the ship
    ObstacleDodged { score: u32 },
    ShipDestroyed { score: u32 },
    CoreSliced { hand: Hand, score: u32 },
    /// A core faded out unsliced
    CoreExpired,
    LaserBlocked { blocked: u32 },
    /// A laser got through the shield
    LaserHit { health: u32 },
    ShieldDown { blocked: u32 },
    SessionReset,
}

/// Capabilities every minigame session provides to the runtime
pub trait Minigame {
    fn kind(&self) -> GameKind;

    /// Map the latest pose sample onto the player's target state.
    fn apply_pose(&mut self, sample: &PoseSample);

    /// Advance one frame: reset if due, spawn, move, collide, decay particles,
    /// ease the player toward its target.
    fn update(&mut self, now_ms: f64);

    /// Restore the session to its freshly-constructed state.
    fn reset(&mut self);

    /// Dodged asteroids, sliced cores or blocked lasers
    fn score(&self) -> u32;

    fn lifecycle(&self) -> Lifecycle;

    fn tick_count(&self) -> u64;

    fn particles(&self) -> &[Particle];

    /// Take the events recorded since the last call.
    fn drain_events(&mut self) -> Vec<GameEvent>;
}

/// The session behind whichever game is currently selected
#[derive(Debug, Clone)]
pub enum ActiveGame {
    GravityWell(GravityWell),
    NeonSlicer(NeonSlicer),
    ShieldWall(ShieldWall),
}

impl ActiveGame {
    pub fn new(kind: GameKind, seed: u64) -> Self {
        match kind {
            GameKind::GravityWell => ActiveGame::GravityWell(GravityWell::new(seed)),
            GameKind::NeonSlicer => ActiveGame::NeonSlicer(NeonSlicer::new(seed)),
            GameKind::ShieldWall => ActiveGame::ShieldWall(ShieldWall::new(seed)),
        }
    }

    pub fn as_minigame(&self) -> &dyn Minigame {
        match self {
            ActiveGame::GravityWell(g) => g,
            ActiveGame::NeonSlicer(g) => g,
            ActiveGame::ShieldWall(g) => g,
        }
    }

    pub fn as_minigame_mut(&mut self) -> &mut dyn Minigame {
        match self {
            ActiveGame::GravityWell(g) => g,
            ActiveGame::NeonSlicer(g) => g,
            ActiveGame::ShieldWall(g) => g,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_ids_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(GameKind::from_id("titan-climb"), None);
    }

    #[test]
    fn test_active_game_dispatch() {
        for kind in GameKind::ALL {
            let mut game = ActiveGame::new(kind, 42);
            assert_eq!(game.as_minigame().kind(), kind);
            game.as_minigame_mut().update(0.0);
            assert_eq!(game.as_minigame().tick_count(), 1);
            assert!(game.as_minigame().lifecycle().is_alive());
            assert!(game.as_minigame().particles().is_empty());
            assert_eq!(game.as_minigame().score(), 0);
        }
    }
}
