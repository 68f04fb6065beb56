//! Player settings and preferences
//!
//! Persisted separately from pilot profiles in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::POSE_SERVER_URL;
use crate::sim::{GameKind, MAX_PARTICLES};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Particles drawn per frame for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 64,
            QualityPreset::Medium => 160,
            QualityPreset::High => MAX_PARTICLES,
        }
    }

    /// Fraction of each hand trail that gets drawn (1.0 = full)
    pub fn trail_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }

    /// Whether to draw the scrolling starfield behind Gravity Well
    pub fn starfield_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pose service endpoint
    pub pose_server_url: String,
    /// Pilot whose profile collects XP
    pub username: String,
    /// Game opened on load, by id (`gravity-well`, ...)
    pub default_game: Option<String>,

    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Particle effects (explosions, slice sparks)
    pub particles: bool,
    /// Hand trails in Neon Slicer
    pub trails: bool,
    /// Red flash when a laser gets through
    pub damage_flash: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no flashes, no starfield)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pose_server_url: POSE_SERVER_URL.to_string(),
            username: "PILOT".to_string(),
            default_game: None,

            quality: QualityPreset::Medium,

            particles: true,
            trails: true,
            damage_flash: true,

            show_fps: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Game to open on load, if the stored id is still a known game
    pub fn default_game(&self) -> Option<GameKind> {
        self.default_game.as_deref().and_then(GameKind::from_id)
    }

    /// Make `kind` the game opened on the next load.
    ///
    /// Returns true if the stored choice changed and needs saving.
    pub fn remember_game(&mut self, kind: GameKind) -> bool {
        if self.default_game() == Some(kind) {
            return false;
        }
        self.default_game = Some(kind.id().to_string());
        true
    }

    /// Effective damage flash (respects reduced_motion)
    pub fn effective_damage_flash(&self) -> bool {
        self.damage_flash && !self.reduced_motion
    }

    pub fn effective_starfield(&self) -> bool {
        self.quality.starfield_enabled() && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Trail points drawn out of `available`
    pub fn trail_points(&self, available: usize) -> usize {
        if !self.trails {
            return 0;
        }
        (available as f32 * self.quality.trail_quality()).ceil() as usize
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "kineticore_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring corrupt settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
