//! Shield Wall: lunge left or right to put the shield under incoming lasers
//!
//! Lasers fall down one of five lanes with a small sideways wobble. Each one
//! is resolved exactly once: inside the impact band it is blocked if the
//! shield covers it, otherwise it hits. A laser that skips the band and
//! leaves the bottom of the screen counts as a hit too.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::within_half_width;
use super::game::{GameEvent, GameKind, Minigame};
use super::lifecycle::Lifecycle;
use super::particles::{Particle, spawn_burst, update_particles};
use super::pose::{LungeDir, PoseSample};
use crate::consts::CANVAS_HEIGHT;
use crate::ease_toward;
use crate::tuning::ShieldWallTuning;

pub const LASER_COLOR: u32 = 0xef4444;
pub const SHIELD_COLOR: u32 = 0xfacc15;

/// Which way a laser's wobble swings first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// A laser bolt falling toward the shield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Laser {
    pub lane: usize,
    /// Lane center the bolt wobbles around
    pub lane_x: f32,
    pub y: f32,
    /// Downward speed in pixels per tick
    pub speed: f32,
    pub wobble: f32,
    pub side: Side,
}

impl Laser {
    /// Current horizontal position including wobble
    pub fn x(&self, amplitude: f32) -> f32 {
        self.lane_x + self.wobble.sin() * amplitude * self.side.sign()
    }

    pub fn pos(&self, amplitude: f32) -> Vec2 {
        Vec2::new(self.x(amplitude), self.y)
    }
}

/// How a laser was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Pending,
    Blocked,
    Hit,
}

/// Shield game session
#[derive(Debug, Clone)]
pub struct ShieldWall {
    pub tuning: ShieldWallTuning,
    rng: Pcg32,
    /// Displayed shield center
    pub shield_x: f32,
    /// Lane center the shield is easing toward
    pub target_x: f32,
    pub lasers: Vec<Laser>,
    pub particles: Vec<Particle>,
    pub health: u32,
    pub blocked: u32,
    /// 1.0 right after a hit, fades to 0
    pub damage_flash: f32,
    pub lifecycle: Lifecycle,
    pub tick: u64,
    events: Vec<GameEvent>,
}

impl ShieldWall {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, ShieldWallTuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: ShieldWallTuning) -> Self {
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            shield_x: tuning.center_lane(),
            target_x: tuning.center_lane(),
            lasers: Vec::new(),
            particles: Vec::new(),
            health: tuning.max_health,
            blocked: 0,
            damage_flash: 0.0,
            lifecycle: Lifecycle::Alive,
            tick: 0,
            events: Vec::new(),
        }
    }

    fn spawn_laser(&mut self) {
        let t = &self.tuning;
        let lane = self.rng.random_range(0..t.lanes.len());
        let laser = Laser {
            lane,
            lane_x: t.lanes[lane],
            y: t.spawn_y,
            speed: self.rng.random_range(t.speed_min..t.speed_max),
            wobble: self.rng.random_range(0.0..TAU),
            side: if self.rng.random_bool(0.5) {
                Side::Left
            } else {
                Side::Right
            },
        };
        self.lasers.push(laser);
    }

    /// Move lasers and resolve the ones that reached the shield line.
    fn step_lasers(&mut self, now_ms: f64) {
        let t = self.tuning;
        let shield_x = self.shield_x;
        let mut hits = 0;

        let particles = &mut self.particles;
        let rng = &mut self.rng;
        let blocked = &mut self.blocked;
        let events = &mut self.events;

        self.lasers.retain_mut(|laser| {
            laser.y += laser.speed;
            laser.wobble += t.wobble_rate;

            let outcome = if laser.y >= t.impact_top && laser.y <= t.impact_bottom {
                if within_half_width(shield_x, t.shield_width, laser.x(t.wobble_amplitude)) {
                    Outcome::Blocked
                } else {
                    Outcome::Hit
                }
            } else if laser.y > CANVAS_HEIGHT {
                // Skipped the band entirely
                Outcome::Hit
            } else {
                Outcome::Pending
            };

            match outcome {
                Outcome::Pending => true,
                Outcome::Blocked => {
                    *blocked += 1;
                    let at = laser.pos(t.wobble_amplitude);
                    spawn_burst(particles, rng, at, SHIELD_COLOR, &t.block_burst);
                    events.push(GameEvent::LaserBlocked { blocked: *blocked });
                    false
                }
                Outcome::Hit => {
                    hits += 1;
                    false
                }
            }
        });

        for _ in 0..hits {
            self.take_hit(now_ms);
            if !self.lifecycle.is_alive() {
                break;
            }
        }
    }

    fn take_hit(&mut self, now_ms: f64) {
        self.health = self.health.saturating_sub(self.tuning.damage);
        self.damage_flash = 1.0;
        self.events.push(GameEvent::LaserHit { health: self.health });

        if self.health == 0 && self.lifecycle.terminate(now_ms, self.tuning.reset_delay_ms) {
            log::info!("Shield down after {} blocks", self.blocked);
            self.events.push(GameEvent::ShieldDown { blocked: self.blocked });
        }
    }
}

impl Minigame for ShieldWall {
    fn kind(&self) -> GameKind {
        GameKind::ShieldWall
    }

    fn apply_pose(&mut self, sample: &PoseSample) {
        self.target_x = match sample.lunge_dir {
            LungeDir::Left => self.tuning.left_lane(),
            LungeDir::Right => self.tuning.right_lane(),
            LungeDir::None => self.tuning.center_lane(),
        };
    }

    fn update(&mut self, now_ms: f64) {
        if self.lifecycle.reset_due(now_ms) {
            self.reset();
        }

        self.tick += 1;

        if self.lifecycle.is_alive() {
            let interval = self.tuning.spawn_interval;
            if interval > 0 && self.tick % interval == 0 {
                self.spawn_laser();
            }
            self.step_lasers(now_ms);
        }

        update_particles(&mut self.particles);
        self.damage_flash = (self.damage_flash - self.tuning.flash_decay).max(0.0);

        if self.lifecycle.is_alive() {
            self.shield_x = ease_toward(self.shield_x, self.target_x, self.tuning.shield_easing);
        }
    }

    fn reset(&mut self) {
        self.shield_x = self.tuning.center_lane();
        self.target_x = self.tuning.center_lane();
        self.lasers.clear();
        self.particles.clear();
        self.health = self.tuning.max_health;
        self.blocked = 0;
        self.damage_flash = 0.0;
        self.lifecycle = Lifecycle::Alive;
        self.tick = 0;
        self.events.push(GameEvent::SessionReset);
    }

    fn score(&self) -> u32 {
        self.blocked
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
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

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_session() -> ShieldWall {
        ShieldWall::with_tuning(
            1,
            ShieldWallTuning {
                spawn_interval: 0,
                ..Default::default()
            },
        )
    }

    /// A laser in the left lane one step above the impact band
    fn left_lane_laser(tuning: &ShieldWallTuning) -> Laser {
        Laser {
            lane: 0,
            lane_x: tuning.left_lane(),
            y: tuning.impact_top - 1.0,
            speed: 3.0,
            wobble: 0.0,
            side: Side::Right,
        }
    }

    fn lunge(dir: LungeDir) -> PoseSample {
        PoseSample {
            lunge_dir: dir,
            ..Default::default()
        }
    }

    #[test]
    fn test_lunge_selects_lane() {
        let mut game = quiet_session();
        game.apply_pose(&lunge(LungeDir::Left));
        assert_eq!(game.target_x, 130.0);
        game.apply_pose(&lunge(LungeDir::Right));
        assert_eq!(game.target_x, 490.0);
        game.apply_pose(&lunge(LungeDir::None));
        assert_eq!(game.target_x, 310.0);
    }

    #[test]
    fn test_shield_eases_toward_lane() {
        let mut game = quiet_session();
        game.apply_pose(&lunge(LungeDir::Left));
        game.update(0.0);
        assert!(game.shield_x < 310.0 && game.shield_x > 130.0);
    }

    #[test]
    fn test_left_lunge_blocks_left_lane_laser() {
        let mut game = quiet_session();
        game.apply_pose(&lunge(LungeDir::Left));
        for _ in 0..60 {
            game.update(0.0);
        }
        assert!((game.shield_x - 130.0).abs() < 1.0);

        let laser = left_lane_laser(&game.tuning);
        game.lasers.push(laser);
        game.update(0.0);

        assert_eq!(game.blocked, 1);
        assert_eq!(game.health, 100);
        assert!(game.lasers.is_empty());
        assert_eq!(game.particles.len(), 14);
    }

    #[test]
    fn test_centered_shield_misses_left_lane_laser() {
        let mut game = quiet_session();
        game.apply_pose(&lunge(LungeDir::None));
        let laser = left_lane_laser(&game.tuning);
        game.lasers.push(laser);
        game.update(0.0);

        assert_eq!(game.blocked, 0);
        assert_eq!(game.health, 88);
        assert_eq!(game.damage_flash, 1.0 - game.tuning.flash_decay);
        assert!(game.lasers.is_empty());
        assert_eq!(game.drain_events(), vec![GameEvent::LaserHit { health: 88 }]);
    }

    #[test]
    fn test_laser_resolved_exactly_once() {
        let mut game = quiet_session();
        let mut laser = left_lane_laser(&game.tuning);
        laser.y = 0.0;
        game.lasers.push(laser);
        for _ in 0..200 {
            game.update(0.0);
        }
        assert_eq!(game.health, 88);
        assert_eq!(game.blocked, 0);
    }

    #[test]
    fn test_laser_skipping_band_counts_as_hit() {
        let mut game = quiet_session();
        game.apply_pose(&lunge(LungeDir::Left));
        for _ in 0..60 {
            game.update(0.0);
        }
        let mut laser = left_lane_laser(&game.tuning);
        laser.speed = 60.0;
        game.lasers.push(laser);

        // 247 -> 307: jumps over the band and off the bottom in one tick
        game.update(0.0);
        assert_eq!(game.blocked, 0);
        assert_eq!(game.health, 88);
        assert!(game.lasers.is_empty());
    }

    #[test]
    fn test_health_floors_at_zero_and_resets() {
        let mut game = quiet_session();
        game.health = 5;
        game.blocked = 9;
        game.lasers.push(left_lane_laser(&game.tuning));
        game.update(1000.0);

        assert_eq!(game.health, 0);
        assert!(!game.lifecycle.is_alive());
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::ShieldDown { blocked: 9 }));

        // Frozen while down
        game.lasers.push(left_lane_laser(&game.tuning));
        game.update(2000.0);
        assert_eq!(game.lasers.len(), 1);

        game.update(3500.0);
        let fresh = quiet_session();
        assert!(game.lifecycle.is_alive());
        assert_eq!(game.health, fresh.health);
        assert_eq!(game.blocked, 0);
        assert!(game.lasers.is_empty());
        assert_eq!(game.shield_x, fresh.shield_x);
        assert_eq!(game.target_x, fresh.target_x);
    }

    #[test]
    fn test_spawns_use_fixed_lanes() {
        let mut game = ShieldWall::new(11);
        for _ in 0..70 {
            game.update(0.0);
        }
        assert_eq!(game.lasers.len(), 1);
        let laser = &game.lasers[0];
        assert_eq!(laser.lane_x, game.tuning.lanes[laser.lane]);
    }
}
