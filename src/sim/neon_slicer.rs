//! Neon Slicer: swing either hand through energy cores before they fade
//!
//! Cores appear at random positions and lose life every tick. Each hand
//! cursor follows its tracked hand directly (no smoothing); every time a
//! visible hand moves, every core within reach of its new position is sliced.
//! The game has no fatal condition.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::within_reach;
use super::game::{GameEvent, GameKind, Minigame};
use super::lifecycle::Lifecycle;
use super::particles::{Particle, spawn_burst, update_particles};
use super::pose::{Hand, PoseSample};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::tuning::NeonSlicerTuning;

const CORE_COLORS: [u32; 5] = [0xff00aa, 0x00fff7, 0xa855f7, 0xfacc15, 0x22c55e];

/// An energy core waiting to be sliced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Core {
    pub pos: Vec2,
    pub radius: f32,
    /// Pulsation phase (cosmetic)
    pub pulse: f32,
    /// 1.0 when spawned, removed at 0
    pub life: f32,
    pub decay: f32,
    pub color: u32,
    /// Number of halo rings (cosmetic)
    pub rings: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub life: f32,
}

/// Where a hand was last seen, and whether it is tracked right now
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandCursor {
    /// Last visible position in canvas pixels; kept while the hand is hidden
    pub pos: Option<Vec2>,
    /// Hidden cursors are neither drawn nor tested for slices
    pub visible: bool,
    /// Recent positions, oldest first
    pub trail: Vec<TrailPoint>,
}

impl HandCursor {
    /// Cursor position if it should be drawn
    pub fn shown_at(&self) -> Option<Vec2> {
        self.pos.filter(|_| self.visible)
    }
}

/// Slicer game session
#[derive(Debug, Clone)]
pub struct NeonSlicer {
    pub tuning: NeonSlicerTuning,
    rng: Pcg32,
    pub cores: Vec<Core>,
    pub left: HandCursor,
    pub right: HandCursor,
    pub particles: Vec<Particle>,
    pub score: u32,
    pub tick: u64,
    events: Vec<GameEvent>,
}

impl NeonSlicer {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, NeonSlicerTuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: NeonSlicerTuning) -> Self {
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            cores: Vec::new(),
            left: HandCursor::default(),
            right: HandCursor::default(),
            particles: Vec::new(),
            score: 0,
            tick: 0,
            events: Vec::new(),
        }
    }

    pub fn cursor(&self, hand: Hand) -> &HandCursor {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    fn cursor_mut(&mut self, hand: Hand) -> &mut HandCursor {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }

    fn spawn_core(&mut self) {
        let t = &self.tuning;
        let m = t.spawn_margin;
        let core = Core {
            pos: Vec2::new(
                self.rng.random_range(m..CANVAS_WIDTH - m),
                self.rng.random_range(m..CANVAS_HEIGHT - m),
            ),
            radius: self.rng.random_range(t.radius_min..t.radius_max),
            pulse: self.rng.random_range(0.0..TAU),
            life: 1.0,
            decay: self.rng.random_range(t.decay_min..t.decay_max),
            color: CORE_COLORS[self.rng.random_range(0..CORE_COLORS.len())],
            rings: self.rng.random_range(2..=4),
        };
        self.cores.push(core);
    }

    /// Track one hand. Returns how many cores this motion sliced.
    fn move_hand(&mut self, hand: Hand, to: Vec2) -> u32 {
        let trail_length = self.tuning.trail_length;
        let cursor = self.cursor_mut(hand);
        cursor.visible = true;
        if cursor.pos == Some(to) {
            return 0;
        }
        cursor.pos = Some(to);
        cursor.trail.push(TrailPoint { pos: to, life: 1.0 });
        if cursor.trail.len() > trail_length {
            let excess = cursor.trail.len() - trail_length;
            cursor.trail.drain(..excess);
        }
        self.slice_at(hand, to)
    }

    /// Destroy every core within reach of `point`, in a single pass.
    fn slice_at(&mut self, hand: Hand, point: Vec2) -> u32 {
        let reach = self.tuning.slice_reach;
        let burst = self.tuning.slice_burst;
        let particles = &mut self.particles;
        let rng = &mut self.rng;
        let score = &mut self.score;
        let events = &mut self.events;
        let mut sliced = 0;

        self.cores.retain(|core| {
            if within_reach(core.pos, core.radius + reach, point) {
                spawn_burst(particles, rng, core.pos, hand.color(), &burst);
                *score += 1;
                sliced += 1;
                events.push(GameEvent::CoreSliced { hand, score: *score });
                false
            } else {
                true
            }
        });
        sliced
    }
}

impl Minigame for NeonSlicer {
    fn kind(&self) -> GameKind {
        GameKind::NeonSlicer
    }

    fn apply_pose(&mut self, sample: &PoseSample) {
        for hand in Hand::BOTH {
            match sample.visible_hand(hand) {
                Some(h) => {
                    let to = Vec2::new(h.x * CANVAS_WIDTH, h.y * CANVAS_HEIGHT);
                    self.move_hand(hand, to);
                }
                None => self.cursor_mut(hand).visible = false,
            }
        }
    }

    fn update(&mut self, _now_ms: f64) {
        self.tick += 1;

        let interval = self.tuning.spawn_interval;
        let scheduled = interval > 0 && self.tick % interval == 0;
        if scheduled || self.cores.len() < self.tuning.min_cores {
            self.spawn_core();
        }

        let pulse_rate = self.tuning.pulse_rate;
        let events = &mut self.events;
        self.cores.retain_mut(|core| {
            core.pulse += pulse_rate;
            core.life -= core.decay;
            if core.life <= 0.0 {
                events.push(GameEvent::CoreExpired);
                return false;
            }
            true
        });

        let trail_decay = self.tuning.trail_decay;
        for cursor in [&mut self.left, &mut self.right] {
            for p in cursor.trail.iter_mut() {
                p.life -= trail_decay;
            }
            cursor.trail.retain(|p| p.life > 0.0);
        }

        update_particles(&mut self.particles);
    }

    fn reset(&mut self) {
        self.cores.clear();
        self.left = HandCursor::default();
        self.right = HandCursor::default();
        self.particles.clear();
        self.score = 0;
        self.tick = 0;
        self.events.push(GameEvent::SessionReset);
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn lifecycle(&self) -> Lifecycle {
        Lifecycle::Alive
    }

    fn tick_count(&self) -> u64 {
        self.tick
    }

    fn particles(&self) -> &[Particle] {
        &self.particles
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
