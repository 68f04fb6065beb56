//! Pose channel
//!
//! A long-lived connection to the pose service, modelled as a small state
//! machine fed with transport events. The platform drivers (`native`, `web`)
//! only turn socket callbacks into `TransportEvent`s; connection state,
//! decoding and the reconnect schedule all live here so they behave the same
//! everywhere.
//!
//! Nothing in here is fatal: transport failures become `Offline` plus a
//! scheduled retry, and malformed payloads are dropped.

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::consts::{POSE_SERVER_URL, RECONNECT_DELAY_MS};
use crate::sim::PoseSample;

/// Connection status shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// A connection attempt is in flight
    Connecting,
    Online,
    /// Disconnected; a retry is scheduled unless the channel was shut down
    Offline,
}

impl ConnectionState {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "CONNECTING...",
            ConnectionState::Online => "POSE SERVER ONLINE",
            ConnectionState::Offline => "POSE SERVER OFFLINE",
        }
    }
}

/// What a transport driver observed on the socket
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Opened,
    /// One text frame
    Text(String),
    Failed(String),
    Closed,
}

/// Client side of the pose stream
#[derive(Debug, Clone)]
pub struct PoseChannel {
    url: String,
    reconnect_delay_ms: f64,
    state: ConnectionState,
    latest: Option<PoseSample>,
    reconnect_at: Option<f64>,
    shut_down: bool,
    /// Connection attempts started so far
    pub attempts: u64,
    /// Samples decoded successfully
    pub received: u64,
    /// Payloads dropped as malformed
    pub discarded: u64,
}

impl Default for PoseChannel {
    fn default() -> Self {
        Self::new(POSE_SERVER_URL)
    }
}

impl PoseChannel {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_reconnect_delay(url, RECONNECT_DELAY_MS)
    }

    pub fn with_reconnect_delay(url: impl Into<String>, reconnect_delay_ms: f64) -> Self {
        Self {
            url: url.into(),
            reconnect_delay_ms,
            state: ConnectionState::Offline,
            latest: None,
            reconnect_at: None,
            shut_down: false,
            attempts: 0,
            received: 0,
            discarded: 0,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_online(&self) -> bool {
        self.state == ConnectionState::Online
    }

    /// Last successfully decoded sample, if any arrived yet
    pub fn latest_sample(&self) -> Option<&PoseSample> {
        self.latest.as_ref()
    }

    /// When the next connection attempt is due, if one is scheduled
    pub fn reconnect_at(&self) -> Option<f64> {
        self.reconnect_at
    }

    /// Mark a connection attempt as started. Returns the URL to dial.
    pub fn begin_connect(&mut self) -> &str {
        self.state = ConnectionState::Connecting;
        self.reconnect_at = None;
        self.attempts += 1;
        log::info!("Connecting to pose server {} (attempt {})", self.url, self.attempts);
        &self.url
    }

    /// True when a scheduled retry is due; the caller then calls `begin_connect`.
    pub fn poll_reconnect(&self, now_ms: f64) -> bool {
        !self.shut_down
            && self.state == ConnectionState::Offline
            && self.reconnect_at.is_some_and(|at| now_ms >= at)
    }

    /// Feed one transport event. Returns the sample if a frame decoded.
    pub fn handle(&mut self, event: TransportEvent, now_ms: f64) -> Option<&PoseSample> {
        match event {
            TransportEvent::Opened => {
                self.on_open();
                None
            }
            TransportEvent::Text(text) => self.on_message(&text),
            TransportEvent::Failed(reason) => {
                log::warn!("Pose channel error: {}", reason);
                self.on_disconnect(now_ms);
                None
            }
            TransportEvent::Closed => {
                self.on_disconnect(now_ms);
                None
            }
        }
    }

    pub fn on_open(&mut self) {
        if self.shut_down {
            return;
        }
        self.state = ConnectionState::Online;
        self.reconnect_at = None;
        log::info!("Pose server online");
    }

    /// Decode a text frame; malformed payloads are dropped without touching
    /// the connection state.
    pub fn on_message(&mut self, text: &str) -> Option<&PoseSample> {
        match PoseSample::parse(text) {
            Ok(sample) => {
                self.received += 1;
                self.latest = Some(sample);
                self.latest.as_ref()
            }
            Err(e) => {
                self.discarded += 1;
                log::debug!("Discarding malformed pose payload: {}", e);
                None
            }
        }
    }

    /// Error or close: go offline and schedule one retry.
    pub fn on_disconnect(&mut self, now_ms: f64) {
        let was = self.state;
        self.state = ConnectionState::Offline;
        if self.shut_down || self.reconnect_at.is_some() {
            return;
        }
        self.reconnect_at = Some(now_ms + self.reconnect_delay_ms);
        if was != ConnectionState::Offline {
            log::info!("Pose server offline, retrying in {} ms", self.reconnect_delay_ms);
        }
    }

    /// Application teardown: cancel any pending retry for good.
    pub fn shutdown(&mut self) {
        self.shut_down = true;
        self.reconnect_at = None;
        self.state = ConnectionState::Offline;
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}
