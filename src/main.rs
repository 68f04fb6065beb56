//! KinetiCore entry point
//!
//! Browser: canvas + WebSocket + requestAnimationFrame loop.
//! Native: headless runner that plays one game against a live pose server
//! and logs what happens.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement};

    use kineticore::net::web::WebTransport;
    use kineticore::renderer::CanvasRenderer;
    use kineticore::sim::{GameEvent, GameKind};
    use kineticore::{Arcade, ProfileBook, Settings, day_index};

    /// Everything the page keeps alive between frames
    struct App {
        arcade: Arcade,
        transport: WebTransport,
        renderer: CanvasRenderer,
        settings: Settings,
        profiles: ProfileBook,
        /// Pending requestAnimationFrame handle
        frame_id: Option<i32>,
        stopped: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            self.transport.pump(&mut self.arcade, time);

            for event in self.arcade.frame(time) {
                match event {
                    GameEvent::ShipDestroyed { score } => log::info!("Ship destroyed at {}", score),
                    GameEvent::ShieldDown { blocked } => log::info!("Shield down after {} blocks", blocked),
                    other => log::debug!("{:?}", other),
                }
            }

            let pilot = self.profiles.pilot(&self.settings.username);
            if pilot.record_session_xp(self.arcade.session_xp()) > 0 {
                self.profiles.save();
            }

            self.renderer.render(
                self.arcade.runtime().map(|rt| rt.game()),
                self.arcade.channel().state(),
                &self.settings,
            );

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 && time > oldest_time {
                self.fps = (60000.0 / (time - oldest_time)).round() as u32;
            }
        }

        /// Switch games from a selection button
        fn toggle(&mut self, kind: GameKind) {
            if let Some(selected) = self.arcade.toggle(kind) {
                self.profiles.pilot(&self.settings.username).record_game_started();
                self.profiles.save();
                if self.settings.remember_game(selected) {
                    self.settings.save();
                }
                log::info!("{} selected ({})", selected.title(), selected.exercise());
            }
        }

        /// Page is going away: no more frames, no more reconnects
        fn teardown(&mut self) {
            if self.stopped {
                return;
            }
            self.stopped = true;
            if let (Some(id), Some(window)) = (self.frame_id.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
            self.arcade.shutdown();
            self.transport.close();
            self.profiles.save();
            log::info!("KinetiCore stopped");
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(pilot) = self.profiles.get(&self.settings.username) {
                if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                    el.set_text_content(Some(&pilot.level.to_string()));
                }
                if let Some(el) = document.query_selector("#hud-xp .hud-value").ok().flatten() {
                    el.set_text_content(Some(&pilot.total_xp.to_string()));
                }
                if let Some(el) = document.query_selector("#hud-streak .hud-value").ok().flatten() {
                    el.set_text_content(Some(&format!("{} DAYS", pilot.streak)));
                }
            }

            if let Some(el) = document.query_selector("#hud-session .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!("+{}", self.arcade.session_xp())));
            }

            if let Some(el) = document.get_element_by_id("pose-feedback") {
                let text = self
                    .arcade
                    .channel()
                    .latest_sample()
                    .map(|s| s.feedback.as_str())
                    .unwrap_or("");
                el.set_text_content(Some(text));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    el.set_text_content(Some(&format!("{} FPS", self.fps)));
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("KinetiCore starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let renderer = CanvasRenderer::new(&canvas)?;

        let settings = Settings::load();
        let now = js_sys::Date::now();
        let mut profiles = ProfileBook::load();
        let pilot = profiles.pilot(&settings.username);
        pilot.begin_session();
        pilot.touch_day(day_index(now));
        profiles.save();

        let mut arcade = Arcade::new(settings.pose_server_url.clone(), now as u64);
        let transport = WebTransport::start(&mut arcade);

        let app = Rc::new(RefCell::new(App {
            arcade,
            transport,
            renderer,
            settings,
            profiles,
            frame_id: None,
            stopped: false,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }));

        let default_game = app.borrow().settings.default_game();
        if let Some(kind) = default_game {
            app.borrow_mut().toggle(kind);
        }

        setup_game_buttons(&document, app.clone())?;
        setup_teardown(&window, app.clone());

        request_animation_frame(app);

        log::info!("KinetiCore running!");
        Ok(())
    }

    fn setup_game_buttons(document: &web_sys::Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let buttons = document.query_selector_all("[data-game]")?;
        for i in 0..buttons.length() {
            let Some(button) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let id = button.get_attribute("data-game").unwrap_or_default();
            let Some(kind) = GameKind::from_id(&id) else {
                log::warn!("Ignoring button for unknown game '{}'", id);
                continue;
            };

            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                app.borrow_mut().toggle(kind);
            });
            button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_teardown(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().teardown();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle = app.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(handle, time);
        });
        if let Ok(id) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            app.borrow_mut().frame_id = Some(id);
        }
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut app = app.borrow_mut();
            app.frame_id = None;
            if app.stopped {
                return;
            }
            app.frame(time);
            app.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    use anyhow::Context;
    use tokio::time::MissedTickBehavior;

    use kineticore::consts::FRAME_MS;
    use kineticore::net::ConnectionState;
    use kineticore::net::native::NativeTransport;
    use kineticore::sim::{GameEvent, GameKind};
    use kineticore::{Arcade, ProfileBook, Settings, day_index};

    /// Parse `[pose-url] [game-id]`, falling back to settings
    pub fn parse_args(
        mut args: impl Iterator<Item = String>,
        settings: &Settings,
    ) -> anyhow::Result<(String, GameKind)> {
        let url = args.next().unwrap_or_else(|| settings.pose_server_url.clone());
        let kind = match args.next() {
            Some(id) => GameKind::from_id(&id).with_context(|| {
                let known: Vec<_> = GameKind::ALL.iter().map(|k| k.id()).collect();
                format!("unknown game '{}' (expected one of: {})", id, known.join(", "))
            })?,
            None => settings.default_game().unwrap_or(GameKind::GravityWell),
        };
        Ok((url, kind))
    }

    pub async fn run(url: String, kind: GameKind, settings: Settings) {
        let wall_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        let mut profiles = ProfileBook::load();
        let pilot = profiles.pilot(&settings.username);
        pilot.begin_session();
        pilot.touch_day(day_index(wall_ms as f64));
        pilot.record_game_started();

        let mut arcade = Arcade::new(url, wall_ms);
        arcade.select(kind);
        let mut transport = NativeTransport::start(&mut arcade);

        let mut interval = tokio::time::interval(Duration::from_secs_f64(FRAME_MS / 1000.0));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        let start = Instant::now();
        let mut last_state = arcade.channel().state();

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let now = start.elapsed().as_secs_f64() * 1000.0;
                    transport.pump(&mut arcade, now);

                    let state = arcade.channel().state();
                    if state != last_state {
                        if state == ConnectionState::Offline {
                            log::warn!("{}", state.label());
                        }
                        last_state = state;
                    }

                    for event in arcade.frame(now) {
                        log_event(event);
                    }

                    let gained = profiles
                        .pilot(&settings.username)
                        .record_session_xp(arcade.session_xp());
                    if gained > 0 {
                        log::info!("+{} XP", gained);
                    }
                }
                _ = &mut ctrl_c => break,
            }
        }

        arcade.shutdown();
        transport.close();
        profiles.save();

        if let Some(pilot) = profiles.get(&settings.username) {
            log::info!(
                "{} finished: level {}, {} XP, {} pose samples ({} malformed)",
                settings.username,
                pilot.level,
                pilot.total_xp,
                arcade.channel().received,
                arcade.channel().discarded,
            );
        }
    }

    fn log_event(event: GameEvent) {
        match event {
            GameEvent::ShipDestroyed { score } => log::info!("Ship destroyed, score {}", score),
            GameEvent::ShieldDown { blocked } => log::info!("Shield down, {} blocked", blocked),
            GameEvent::LaserHit { health } => log::info!("Laser hit, health {}", health),
            GameEvent::SessionReset => log::info!("Session reset"),
            other => log::debug!("{:?}", other),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut settings = kineticore::Settings::load();
    let (url, kind) = native::parse_args(std::env::args().skip(1), &settings)?;
    if settings.remember_game(kind) {
        settings.save();
    }
    log::info!("KinetiCore (native) playing {} against {}", kind.title(), url);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(native::run(url, kind, settings));
    Ok(())
}
