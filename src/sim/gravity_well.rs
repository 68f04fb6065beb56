//! Gravity Well: squat to drop the ship out of the asteroid stream
//!
//! Asteroids enter from the right at a fixed interval and drift left. The
//! ship sits at a fixed x and eases between two heights picked by the squat
//! flag. Dodging an asteroid scores a point; touching one ends the run until
//! the automatic reset.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::circles_overlap;
use super::game::{GameEvent, GameKind, Minigame};
use super::lifecycle::Lifecycle;
use super::particles::{Particle, spawn_burst, update_particles};
use super::pose::PoseSample;
use crate::consts::CANVAS_HEIGHT;
use crate::ease_toward;
use crate::tuning::GravityWellTuning;

const ASTEROID_COLORS: [u32; 2] = [0xa855f7, 0xf97316];

/// An obstacle drifting toward the ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub radius: f32,
    /// Leftward speed in pixels per tick
    pub speed: f32,
    pub rotation: f32,
    pub spin: f32,
    pub color: u32,
}

/// Dodge game session
#[derive(Debug, Clone)]
pub struct GravityWell {
    pub tuning: GravityWellTuning,
    rng: Pcg32,
    /// Displayed ship height
    pub ship_y: f32,
    /// Height the ship is easing toward
    pub target_y: f32,
    pub asteroids: Vec<Asteroid>,
    pub particles: Vec<Particle>,
    pub score: u32,
    pub lifecycle: Lifecycle,
    pub tick: u64,
    events: Vec<GameEvent>,
}

impl GravityWell {
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, GravityWellTuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: GravityWellTuning) -> Self {
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            ship_y: tuning.ship_start_y,
            target_y: tuning.ship_start_y,
            asteroids: Vec::new(),
            particles: Vec::new(),
            score: 0,
            lifecycle: Lifecycle::Alive,
            tick: 0,
            events: Vec::new(),
        }
    }

    /// Ship center used for collision tests
    pub fn ship_pos(&self) -> Vec2 {
        Vec2::new(self.tuning.ship_x, self.ship_y)
    }

    fn spawn_asteroid(&mut self) {
        let t = &self.tuning;
        let margin = t.spawn_margin;
        let asteroid = Asteroid {
            pos: Vec2::new(t.spawn_x, self.rng.random_range(margin..CANVAS_HEIGHT - margin)),
            radius: self.rng.random_range(t.radius_min..t.radius_max),
            speed: self.rng.random_range(t.speed_min..t.speed_max),
            rotation: self.rng.random_range(0.0..TAU),
            spin: self.rng.random_range(-t.max_spin..t.max_spin),
            color: ASTEROID_COLORS[self.rng.random_range(0..ASTEROID_COLORS.len())],
        };
        self.asteroids.push(asteroid);
    }

    /// Move asteroids, score the ones that got past, detect a hit on the ship.
    fn step_asteroids(&mut self, now_ms: f64) {
        let ship = self.ship_pos();
        let tuning = self.tuning;
        let mut destroyed = false;

        let particles = &mut self.particles;
        let rng = &mut self.rng;
        let score = &mut self.score;
        let events = &mut self.events;

        self.asteroids.retain_mut(|a| {
            a.pos.x -= a.speed;
            a.rotation += a.spin;
            if destroyed {
                return true;
            }
            if circles_overlap(a.pos, a.radius, ship, tuning.ship_radius) {
                spawn_burst(particles, rng, a.pos, a.color, &tuning.explosion);
                destroyed = true;
                return false;
            }
            if a.pos.x < tuning.exit_x {
                *score += 1;
                events.push(GameEvent::ObstacleDodged { score: *score });
                return false;
            }
            true
        });

        if destroyed && self.lifecycle.terminate(now_ms, tuning.reset_delay_ms) {
            log::info!("Ship destroyed, final score {}", self.score);
            self.events.push(GameEvent::ShipDestroyed { score: self.score });
        }
    }
}

impl Minigame for GravityWell {
    fn kind(&self) -> GameKind {
        GameKind::GravityWell
    }

    fn apply_pose(&mut self, sample: &PoseSample) {
        let target = if sample.is_squatting {
            self.tuning.ship_low_y
        } else {
            self.tuning.ship_high_y
        };
        self.target_y = target.clamp(0.0, CANVAS_HEIGHT);
    }

    fn update(&mut self, now_ms: f64) {
        if self.lifecycle.reset_due(now_ms) {
            self.reset();
        }

        self.tick += 1;

        if self.lifecycle.is_alive() {
            let interval = self.tuning.spawn_interval;
            if interval > 0 && self.tick % interval == 0 {
                self.spawn_asteroid();
            }
            self.step_asteroids(now_ms);
        }

        update_particles(&mut self.particles);

        if self.lifecycle.is_alive() {
            self.ship_y = ease_toward(self.ship_y, self.target_y, self.tuning.ship_easing);
        }
    }

    fn reset(&mut self) {
        self.ship_y = self.tuning.ship_start_y;
        self.target_y = self.tuning.ship_start_y;
        self.asteroids.clear();
        self.particles.clear();
        self.score = 0;
        self.lifecycle = Lifecycle::Alive;
        self.tick = 0;
        self.events.push(GameEvent::SessionReset);
    }

    fn score(&self) -> u32 {
        self.score
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
    use crate::consts::FRAME_MS;
    use proptest::prelude::*;

    /// Session that never spawns on its own
    fn quiet_session() -> GravityWell {
        GravityWell::with_tuning(
            1,
            GravityWellTuning {
                spawn_interval: 0,
                ..Default::default()
            },
        )
    }

    fn asteroid(x: f32, y: f32, radius: f32, speed: f32) -> Asteroid {
        Asteroid {
            pos: Vec2::new(x, y),
            radius,
            speed,
            rotation: 0.0,
            spin: 0.0,
            color: 0xa855f7,
        }
    }

    #[test]
    fn test_squat_selects_set_points() {
        let mut game = quiet_session();
        game.apply_pose(&PoseSample { is_squatting: true, ..Default::default() });
        assert_eq!(game.target_y, 260.0);
        game.apply_pose(&PoseSample::default());
        assert_eq!(game.target_y, 60.0);
    }

    #[test]
    fn test_ship_eases_instead_of_snapping() {
        let mut game = quiet_session();
        game.apply_pose(&PoseSample { is_squatting: true, ..Default::default() });
        game.update(0.0);
        assert!(game.ship_y > 160.0 && game.ship_y < 260.0);
        for i in 0..300 {
            game.update(i as f64 * FRAME_MS);
        }
        assert!((game.ship_y - 260.0).abs() < 0.5);
    }

    #[test]
    fn test_spawn_interval() {
        let mut game = GravityWell::new(3);
        for i in 0..54 {
            game.update(i as f64 * FRAME_MS);
        }
        assert!(game.asteroids.is_empty());
        game.update(55.0 * FRAME_MS);
        assert_eq!(game.asteroids.len(), 1);
        let a = &game.asteroids[0];
        assert!(a.pos.y >= 30.0 && a.pos.y <= 270.0);
        assert!(a.radius >= 18.0 && a.radius < 38.0);
    }

    #[test]
    fn test_collision_scenario() {
        let mut game = quiet_session();
        game.asteroids.push(asteroid(660.0, 150.0, 20.0, 3.0));

        let mut hit_tick = None;
        for i in 0..250u64 {
            let x_before = game.asteroids.first().map(|a| a.pos.x);
            game.update(i as f64 * FRAME_MS);
            if game
                .drain_events()
                .iter()
                .any(|e| matches!(e, GameEvent::ShipDestroyed { .. }))
            {
                // The asteroid was within r + 14 only after this tick's move
                let x = x_before.unwrap() - 3.0;
                let d = Vec2::new(x, 150.0).distance(Vec2::new(80.0, 160.0));
                assert!(d < 34.0);
                assert!(Vec2::new(x + 3.0, 150.0).distance(Vec2::new(80.0, 160.0)) >= 34.0);
                hit_tick = Some(game.tick);
                break;
            }
        }

        assert_eq!(hit_tick, Some(183));
        assert!(!game.lifecycle.is_alive());
        assert!(game.asteroids.is_empty());
        assert_eq!(game.particles.len(), 10);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_dodged_asteroid_scores_exactly_once() {
        let mut game = quiet_session();
        game.ship_y = 60.0;
        game.target_y = 60.0;
        game.asteroids.push(asteroid(100.0, 250.0, 20.0, 4.0));

        for i in 0..100 {
            game.update(i as f64 * FRAME_MS);
        }
        assert_eq!(game.score, 1);
        assert!(game.asteroids.is_empty());
        let dodged = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ObstacleDodged { .. }))
            .count();
        assert_eq!(dodged, 1);
    }

    #[test]
    fn test_terminal_freezes_and_resets_after_delay() {
        let mut game = quiet_session();
        game.score = 7;
        game.asteroids.push(asteroid(90.0, 160.0, 20.0, 3.0));
        game.asteroids.push(asteroid(400.0, 40.0, 20.0, 3.0));
        game.update(1000.0);
        assert!(!game.lifecycle.is_alive());

        // Survivors freeze, particles keep fading
        let frozen = game.asteroids.clone();
        let life = game.particles[0].life;
        game.update(2000.0);
        assert_eq!(game.asteroids, frozen);
        assert!(game.particles[0].life < life);
        assert_eq!(game.score, 7);

        game.update(3000.0);
        let fresh = quiet_session();
        assert!(game.lifecycle.is_alive());
        assert_eq!(game.score, fresh.score);
        assert!(game.asteroids.is_empty());
        assert!(game.particles.is_empty());
        assert_eq!(game.ship_y, fresh.ship_y);
        assert_eq!(game.target_y, fresh.target_y);
        assert_eq!(game.tick, 1);
        assert!(game.drain_events().contains(&GameEvent::SessionReset));
    }

    proptest! {
        #[test]
        fn dodges_score_once_per_asteroid(
            rocks in prop::collection::vec((150.0f32..270.0, 1.0f32..8.0, 18.0f32..38.0), 1..8),
        ) {
            let mut game = quiet_session();
            game.ship_y = 60.0;
            game.target_y = 60.0;
            for (i, (y, speed, radius)) in rocks.iter().enumerate() {
                game.asteroids.push(asteroid(660.0 + i as f32 * 45.0, *y, *radius, *speed));
            }

            let mut dodged = 0;
            for i in 0..1200 {
                game.update(i as f64 * FRAME_MS);
                dodged += game
                    .drain_events()
                    .iter()
                    .filter(|e| matches!(e, GameEvent::ObstacleDodged { .. }))
                    .count();
            }

            prop_assert!(game.lifecycle.is_alive());
            prop_assert!(game.asteroids.is_empty());
            prop_assert_eq!(game.score as usize, rocks.len());
            prop_assert_eq!(dodged, rocks.len());
        }
    }
}
