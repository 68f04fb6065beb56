//! Pose sample wire schema
//!
//! One JSON object per websocket text frame. Every field is optional on the
//! wire: absent fields decode to "not visible" / zero so a partial message is
//! still a usable sample.

use serde::{Deserialize, Serialize};

/// Lunge direction reported by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LungeDir {
    Left,
    Right,
    /// Standing centered (also any value the tracker adds later)
    #[default]
    #[serde(other)]
    None,
}

/// One tracked hand in normalized [0, 1] image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HandSample {
    pub x: f32,
    pub y: f32,
    pub visible: bool,
}

/// Snapshot of the tracker's output at one point in time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PoseSample {
    // Squat tracking (dodge game)
    pub is_squatting: bool,
    pub squat_count: u32,
    pub xp: u64,
    /// Hip-to-knee flexion measure
    pub depth: f32,

    // Hand tracking (slicer game)
    pub left_hand: Option<HandSample>,
    pub right_hand: Option<HandSample>,

    // Lunge tracking (shield game)
    pub lunge_dir: LungeDir,
    pub lunge_count: u32,
    pub hip_spread: f32,

    /// Human-readable status line, shown as-is
    pub feedback: String,
}

impl PoseSample {
    /// Decode one text frame.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The hand if it is currently tracked
    pub fn visible_hand(&self, side: Hand) -> Option<HandSample> {
        let hand = match side {
            Hand::Left => self.left_hand,
            Hand::Right => self.right_hand,
        };
        hand.filter(|h| h.visible)
    }
}

/// Which hand a cursor, trail or slice belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Left, Hand::Right];

    /// Particle/trail color tag
    pub fn color(self) -> u32 {
        match self {
            Hand::Left => 0xff00aa,
            Hand::Right => 0x00fff7,
        }
    }
}
