//! Arcade shell
//!
//! Owns the single pose channel and at most one running minigame. Decoded
//! samples are forwarded into the active runtime's inbox; everything else
//! about a game's life (ticking, resets, teardown) goes through here.

use crate::net::{PoseChannel, TransportEvent};
use crate::sim::{GameEvent, GameKind, GameRuntime};

/// XP earned this session, summed from the pose service's running counter.
///
/// Only increases are credited. A reading below the previous one means the
/// pose service restarted and began counting from zero again, so it becomes
/// the new baseline and nothing earned after the restart is lost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionXp {
    value: u64,
    last_raw: u64,
}

impl SessionXp {
    /// Returns true when the counter went up
    pub fn observe(&mut self, xp: u64) -> bool {
        let gained = xp.saturating_sub(self.last_raw);
        if xp < self.last_raw {
            log::info!("Pose service XP reset ({} -> {})", self.last_raw, xp);
        }
        self.last_raw = xp;
        self.value += gained;
        gained > 0
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

#[derive(Debug)]
pub struct Arcade {
    channel: PoseChannel,
    runtime: Option<GameRuntime>,
    session_xp: SessionXp,
    next_seed: u64,
}

impl Arcade {
    pub fn new(pose_url: impl Into<String>, seed: u64) -> Self {
        Self {
            channel: PoseChannel::new(pose_url),
            runtime: None,
            session_xp: SessionXp::default(),
            next_seed: seed,
        }
    }

    pub fn with_channel(channel: PoseChannel, seed: u64) -> Self {
        Self {
            channel,
            runtime: None,
            session_xp: SessionXp::default(),
            next_seed: seed,
        }
    }

    pub fn channel(&self) -> &PoseChannel {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut PoseChannel {
        &mut self.channel
    }

    pub fn session_xp(&self) -> u64 {
        self.session_xp.value()
    }

    pub fn runtime(&self) -> Option<&GameRuntime> {
        self.runtime.as_ref()
    }

    pub fn active_kind(&self) -> Option<GameKind> {
        self.runtime.as_ref().map(GameRuntime::kind)
    }

    /// Start `kind`, tearing down whatever was running.
    ///
    /// Returns false if that game is already the active one.
    pub fn select(&mut self, kind: GameKind) -> bool {
        if self.active_kind() == Some(kind) {
            return false;
        }
        self.deselect();

        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
        log::info!("Starting {} (seed {})", kind.title(), seed);
        self.runtime = Some(GameRuntime::new(kind, seed));
        true
    }

    /// Stop and drop the active game, pending reset included
    pub fn deselect(&mut self) {
        if let Some(mut runtime) = self.runtime.take() {
            runtime.stop();
        }
    }

    /// Clicking the active game's button closes it; any other opens it.
    pub fn toggle(&mut self, kind: GameKind) -> Option<GameKind> {
        if self.active_kind() == Some(kind) {
            self.deselect();
        } else {
            self.select(kind);
        }
        self.active_kind()
    }

    /// Route one socket event through the channel into the active game.
    pub fn on_transport_event(&mut self, event: TransportEvent, now_ms: f64) {
        let Some(sample) = self.channel.handle(event, now_ms).cloned() else {
            return;
        };
        if self.session_xp.observe(sample.xp) {
            log::debug!("Session XP now {}", self.session_xp.value());
        }
        if let Some(runtime) = self.runtime.as_mut() {
            runtime.push_sample(sample);
        }
    }

    /// Advance the active game by one display frame.
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        match self.runtime.as_mut() {
            Some(runtime) => runtime.frame(now_ms),
            None => Vec::new(),
        }
    }

    /// Application teardown
    pub fn shutdown(&mut self) {
        self.deselect();
        self.channel.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::ConnectionState;
    use crate::profile::PilotProfile;
    use crate::sim::ActiveGame;

    fn online_arcade() -> Arcade {
        let mut arcade = Arcade::new("ws://localhost:8765", 7);
        arcade.channel_mut().begin_connect();
        arcade.on_transport_event(TransportEvent::Opened, 0.0);
        arcade
    }

    fn text(json: &str) -> TransportEvent {
        TransportEvent::Text(json.to_string())
    }

    #[test]
    fn test_session_xp_is_monotonic() {
        let mut xp = SessionXp::default();
        assert!(xp.observe(30));
        assert!(!xp.observe(30));
        assert!(!xp.observe(10));
        assert_eq!(xp.value(), 30);
        assert!(xp.observe(90));
        assert_eq!(xp.value(), 110);
    }

    #[test]
    fn test_pose_service_restart_keeps_earned_xp() {
        let mut arcade = online_arcade();
        let mut pilot = PilotProfile::default();
        let mut credited = Vec::new();

        for (i, xp) in [90, 180, 270, 360, 0, 90, 180, 270, 360, 450].into_iter().enumerate() {
            arcade.on_transport_event(text(&format!(r#"{{"xp":{}}}"#, xp)), i as f64 * 16.0);
            credited.push(pilot.record_session_xp(arcade.session_xp()));
        }

        assert_eq!(credited, vec![90, 90, 90, 90, 0, 90, 90, 90, 90, 90]);
        assert_eq!(arcade.session_xp(), 810);
        assert_eq!(pilot.total_xp, 810);
    }

    #[test]
    fn test_select_and_toggle() {
        let mut arcade = online_arcade();
        assert_eq!(arcade.active_kind(), None);

        assert!(arcade.select(GameKind::ShieldWall));
        assert!(!arcade.select(GameKind::ShieldWall));
        assert_eq!(arcade.toggle(GameKind::NeonSlicer), Some(GameKind::NeonSlicer));
        assert_eq!(arcade.toggle(GameKind::NeonSlicer), None);
        assert!(arcade.runtime().is_none());
    }

    #[test]
    fn test_samples_reach_active_game() {
        let mut arcade = online_arcade();
        arcade.select(GameKind::GravityWell);

        arcade.on_transport_event(text(r#"{"isSquatting":true,"xp":30}"#), 5.0);
        arcade.frame(16.0);

        let Some(runtime) = arcade.runtime() else { panic!("no runtime") };
        let ActiveGame::GravityWell(g) = runtime.game() else { panic!("wrong game") };
        assert_eq!(g.target_y, 260.0);
        assert_eq!(arcade.session_xp(), 30);
    }

    #[test]
    fn test_samples_without_game_only_update_channel() {
        let mut arcade = online_arcade();
        arcade.on_transport_event(text(r#"{"xp":45}"#), 5.0);
        assert!(arcade.frame(16.0).is_empty());
        assert_eq!(arcade.channel().latest_sample().map(|s| s.xp), Some(45));
        assert_eq!(arcade.session_xp(), 45);
    }

    #[test]
    fn test_switching_games_starts_fresh_session() {
        let mut arcade = online_arcade();
        arcade.select(GameKind::GravityWell);
        for i in 0..10 {
            arcade.frame(i as f64 * 16.0);
        }
        arcade.select(GameKind::ShieldWall);
        arcade.select(GameKind::GravityWell);

        let Some(runtime) = arcade.runtime() else { panic!("no runtime") };
        assert_eq!(runtime.game().as_minigame().tick_count(), 0);
        assert_eq!(runtime.pending(), 0);
    }

    #[test]
    fn test_offline_then_back_online() {
        let mut arcade = online_arcade();
        arcade.on_transport_event(TransportEvent::Closed, 1_000.0);
        assert_eq!(arcade.channel().state(), ConnectionState::Offline);
        assert!(!arcade.channel().poll_reconnect(2_000.0));
        assert!(arcade.channel().poll_reconnect(4_000.0));

        arcade.channel_mut().begin_connect();
        arcade.on_transport_event(TransportEvent::Opened, 4_100.0);
        assert!(arcade.channel().is_online());
    }

    #[test]
    fn test_shutdown_stops_everything() {
        let mut arcade = online_arcade();
        arcade.select(GameKind::NeonSlicer);
        arcade.on_transport_event(TransportEvent::Closed, 0.0);
        arcade.shutdown();
        assert!(arcade.active_kind().is_none());
        assert!(!arcade.channel().poll_reconnect(1e9));
    }
}
