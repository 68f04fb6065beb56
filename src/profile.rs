//! Pilot profiles
//!
//! Per-username XP, level and daily streak. Persisted to LocalStorage on the
//! web; native builds keep the book in memory only.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// XP needed per pilot level
pub const XP_PER_LEVEL: u64 = 500;

/// Progress record for one pilot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PilotProfile {
    pub total_xp: u64,
    pub level: u64,
    /// Consecutive days played, counting today
    pub streak: u32,
    /// Day index (days since the Unix epoch) of the last session
    pub last_played_day: Option<i64>,
    /// Leaderboard position, when one has been assigned
    pub rank: Option<u32>,
    pub games_played: u32,
    /// Last session XP value already credited
    #[serde(skip)]
    last_session_xp: u64,
}

impl Default for PilotProfile {
    fn default() -> Self {
        Self {
            total_xp: 0,
            level: 1,
            streak: 0,
            last_played_day: None,
            rank: None,
            games_played: 0,
            last_session_xp: 0,
        }
    }
}

impl PilotProfile {
    pub fn level_for(total_xp: u64) -> u64 {
        total_xp / XP_PER_LEVEL + 1
    }

    /// Fraction of the way to the next level (0.0 - 1.0)
    pub fn level_progress(&self) -> f32 {
        (self.total_xp % XP_PER_LEVEL) as f32 / XP_PER_LEVEL as f32
    }

    /// Credit the growth of the session XP counter since the last call.
    ///
    /// Returns the XP actually added. A smaller value than last time (a new
    /// arcade without `begin_session`) is taken as the new baseline.
    pub fn record_session_xp(&mut self, session_xp: u64) -> u64 {
        let gained = session_xp.saturating_sub(self.last_session_xp);
        self.last_session_xp = session_xp;
        if gained > 0 {
            self.total_xp += gained;
            self.level = Self::level_for(self.total_xp);
        }
        gained
    }

    /// Start crediting a fresh session from zero
    pub fn begin_session(&mut self) {
        self.last_session_xp = 0;
    }

    /// Mark `day` as played and update the streak.
    pub fn touch_day(&mut self, day: i64) {
        self.streak = match self.last_played_day {
            Some(last) if last == day => self.streak.max(1),
            Some(last) if last + 1 == day => self.streak + 1,
            _ => 1,
        };
        self.last_played_day = Some(day);
    }

    pub fn record_game_started(&mut self) {
        self.games_played += 1;
    }
}

/// All pilots known on this device
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileBook {
    pub pilots: BTreeMap<String, PilotProfile>,
}

impl ProfileBook {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "kineticore_profiles";

    pub fn new() -> Self {
        Self::default()
    }

    /// Profile for `username`, created on first use
    pub fn pilot(&mut self, username: &str) -> &mut PilotProfile {
        self.pilots.entry(username.to_string()).or_default()
    }

    pub fn get(&self, username: &str) -> Option<&PilotProfile> {
        self.pilots.get(username)
    }

    pub fn is_empty(&self) -> bool {
        self.pilots.is_empty()
    }

    /// Load profiles from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<ProfileBook>(&json) {
                    Ok(book) => {
                        log::info!("Loaded {} pilot profiles", book.pilots.len());
                        return book;
                    }
                    Err(e) => log::warn!("Ignoring corrupt profile data: {}", e),
                }
            }
        }

        log::info!("No pilot profiles found, starting fresh");
        Self::new()
    }

    /// Save profiles to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Pilot profiles saved ({} pilots)", self.pilots.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
