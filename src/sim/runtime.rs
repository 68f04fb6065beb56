//! Per-game frame driver
//!
//! Pose samples arrive asynchronously; they are queued here and applied at
//! the start of the next frame so only the runtime ever mutates the session.

use std::collections::VecDeque;

use super::game::{ActiveGame, GameEvent, GameKind};
use super::pose::PoseSample;

/// Samples kept between frames; the oldest are dropped beyond this
pub const INBOX_CAPACITY: usize = 64;

/// Owns one minigame session for as long as it is selected
#[derive(Debug)]
pub struct GameRuntime {
    game: ActiveGame,
    inbox: VecDeque<PoseSample>,
    running: bool,
}

impl GameRuntime {
    pub fn new(kind: GameKind, seed: u64) -> Self {
        Self::from_game(ActiveGame::new(kind, seed))
    }

    pub fn from_game(game: ActiveGame) -> Self {
        Self {
            game,
            inbox: VecDeque::with_capacity(INBOX_CAPACITY),
            running: true,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.game.as_minigame().kind()
    }

    pub fn game(&self) -> &ActiveGame {
        &self.game
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of samples waiting for the next frame
    pub fn pending(&self) -> usize {
        self.inbox.len()
    }

    /// Queue a sample for the next frame.
    pub fn push_sample(&mut self, sample: PoseSample) {
        if !self.running {
            return;
        }
        if self.inbox.len() == INBOX_CAPACITY {
            self.inbox.pop_front();
        }
        self.inbox.push_back(sample);
    }

    /// Run one frame: apply queued samples in arrival order, then tick.
    ///
    /// Returns the events recorded during the frame. Does nothing once stopped.
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        if !self.running {
            return Vec::new();
        }
        let game = self.game.as_minigame_mut();
        while let Some(sample) = self.inbox.pop_front() {
            game.apply_pose(&sample);
        }
        game.update(now_ms);
        game.drain_events()
    }

    /// Tear down: pending samples are dropped and no further frame runs.
    pub fn stop(&mut self) {
        if self.running {
            log::info!("{} stopped at tick {}", self.kind().title(), self.game.as_minigame().tick_count());
        }
        self.running = false;
        self.inbox.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lifecycle::Lifecycle;
    use crate::sim::pose::HandSample;
    use crate::sim::GravityWell;
    use crate::tuning::GravityWellTuning;

    #[test]
    fn test_samples_applied_on_next_frame() {
        let mut rt = GameRuntime::new(GameKind::GravityWell, 1);
        rt.push_sample(PoseSample { is_squatting: true, ..Default::default() });
        assert_eq!(rt.pending(), 1);

        let ActiveGame::GravityWell(g) = rt.game() else { panic!("wrong game") };
        assert_eq!(g.target_y, 160.0);

        rt.frame(0.0);
        assert_eq!(rt.pending(), 0);
        let ActiveGame::GravityWell(g) = rt.game() else { panic!("wrong game") };
        assert_eq!(g.target_y, 260.0);
        assert_eq!(g.tick, 1);
    }

    #[test]
    fn test_queued_hand_moves_all_slice() {
        let mut rt = GameRuntime::new(GameKind::NeonSlicer, 4);
        // First frame populates the field
        rt.frame(0.0);
        let ActiveGame::NeonSlicer(g) = rt.game() else { panic!("wrong game") };
        let targets: Vec<_> = g.cores.iter().map(|c| c.pos).collect();
        assert!(!targets.is_empty());

        for pos in &targets {
            rt.push_sample(PoseSample {
                right_hand: Some(HandSample {
                    x: pos.x / crate::consts::CANVAS_WIDTH,
                    y: pos.y / crate::consts::CANVAS_HEIGHT,
                    visible: true,
                }),
                ..Default::default()
            });
        }
        let events = rt.frame(16.0);
        let sliced = events
            .iter()
            .filter(|e| matches!(e, GameEvent::CoreSliced { .. }))
            .count();
        assert!(sliced >= targets.len());
    }

    #[test]
    fn test_inbox_drops_oldest_when_full() {
        let mut rt = GameRuntime::new(GameKind::ShieldWall, 1);
        for i in 0..(INBOX_CAPACITY + 10) {
            rt.push_sample(PoseSample { lunge_count: i as u32, ..Default::default() });
        }
        assert_eq!(rt.pending(), INBOX_CAPACITY);
    }

    #[test]
    fn test_stopped_runtime_never_ticks_or_resets() {
        let quiet = GravityWellTuning { spawn_interval: 0, ..Default::default() };
        let mut game = GravityWell::with_tuning(1, quiet);
        game.lifecycle = Lifecycle::Terminal { reset_at_ms: 100.0 };
        let mut rt = GameRuntime::from_game(ActiveGame::GravityWell(game));

        rt.stop();
        rt.push_sample(PoseSample::default());
        assert!(rt.frame(1_000.0).is_empty());
        assert_eq!(rt.pending(), 0);

        let ActiveGame::GravityWell(g) = rt.game() else { panic!("wrong game") };
        assert_eq!(g.tick, 0);
        assert!(!g.lifecycle.is_alive());
    }
}
