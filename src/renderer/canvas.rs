//! Canvas2D drawing of the active minigame

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::net::ConnectionState;
use crate::settings::Settings;
use crate::sim::{
    ActiveGame, Core, GravityWell, Hand, HandCursor, LASER_COLOR, NeonSlicer, Particle,
    SHIELD_COLOR, ShieldWall,
};

const W: f64 = CANVAS_WIDTH as f64;
const H: f64 = CANVAS_HEIGHT as f64;

const HUD_FONT: &str = "bold 12px 'Orbitron',monospace";
const HINT_FONT: &str = "10px 'Share Tech Mono',monospace";

fn css(color: u32) -> String {
    format!("#{:06x}", color & 0xff_ffff)
}

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { ctx })
    }

    /// Draw one frame. `game` is None when nothing is selected.
    pub fn render(&self, game: Option<&ActiveGame>, connection: ConnectionState, settings: &Settings) {
        let ctx = &self.ctx;
        ctx.set_shadow_blur(0.0);
        ctx.set_global_alpha(1.0);
        ctx.clear_rect(0.0, 0.0, W, H);

        match game {
            Some(ActiveGame::GravityWell(g)) => self.draw_gravity_well(g, settings),
            Some(ActiveGame::NeonSlicer(g)) => self.draw_neon_slicer(g, settings),
            Some(ActiveGame::ShieldWall(g)) => self.draw_shield_wall(g, settings),
            None => self.draw_idle(),
        }

        self.draw_connection(connection);
    }

    fn draw_idle(&self) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str("#060612");
        ctx.fill_rect(0.0, 0.0, W, H);
        ctx.set_text_align("center");
        ctx.set_font(HUD_FONT);
        ctx.set_fill_style_str("#444466");
        let _ = ctx.fill_text("SELECT A GAME", W / 2.0, H / 2.0);
        ctx.set_text_align("left");
    }

    fn draw_connection(&self, state: ConnectionState) {
        let ctx = &self.ctx;
        let color = match state {
            ConnectionState::Online => "#22c55e",
            ConnectionState::Connecting => "#facc15",
            ConnectionState::Offline => "#ef4444",
        };
        ctx.set_shadow_blur(0.0);
        ctx.set_font(HINT_FONT);
        ctx.set_text_align("right");
        ctx.set_fill_style_str(color);
        let _ = ctx.fill_text(state.label(), W - 14.0, 22.0);
        ctx.set_text_align("left");
    }

    fn grid(&self, step: f64, color: &str) {
        let ctx = &self.ctx;
        ctx.set_stroke_style_str(color);
        ctx.set_line_width(1.0);
        ctx.begin_path();
        let mut x = 0.0;
        while x < W {
            ctx.move_to(x, 0.0);
            ctx.line_to(x, H);
            x += step;
        }
        let mut y = 0.0;
        while y < H {
            ctx.move_to(0.0, y);
            ctx.line_to(W, y);
            y += step;
        }
        ctx.stroke();
    }

    fn hud(&self, text: &str, color: u32, hint: &str) {
        let ctx = &self.ctx;
        let color = css(color);
        ctx.set_fill_style_str(&color);
        ctx.set_font(HUD_FONT);
        ctx.set_shadow_blur(8.0);
        ctx.set_shadow_color(&color);
        let _ = ctx.fill_text(text, 14.0, 22.0);

        ctx.set_shadow_blur(0.0);
        ctx.set_fill_style_str("#ffffff33");
        ctx.set_font(HINT_FONT);
        ctx.set_text_align("center");
        let _ = ctx.fill_text(hint, W / 2.0, H - 10.0);
        ctx.set_text_align("left");
    }

    fn banner(&self, title: &str, detail: &str, color: &str) {
        let ctx = &self.ctx;
        ctx.set_text_align("center");
        ctx.set_fill_style_str(color);
        ctx.set_font("bold 26px 'Orbitron',monospace");
        ctx.set_shadow_blur(20.0);
        ctx.set_shadow_color(color);
        let _ = ctx.fill_text(title, W / 2.0, H / 2.0 - 16.0);
        ctx.set_shadow_blur(0.0);
        ctx.set_font("13px 'Share Tech Mono',monospace");
        ctx.set_fill_style_str("#ffffff88");
        let _ = ctx.fill_text(detail, W / 2.0, H / 2.0 + 14.0);
        ctx.set_text_align("left");
    }

    fn particles(&self, particles: &[Particle], settings: &Settings) {
        let ctx = &self.ctx;
        let limit = settings.max_particles();
        // Newest particles are at the back
        let skip = particles.len().saturating_sub(limit);
        for p in &particles[skip..] {
            ctx.set_global_alpha(p.life.clamp(0.0, 1.0) as f64);
            ctx.set_fill_style_str(&css(p.color));
            ctx.fill_rect(p.pos.x as f64, p.pos.y as f64, p.size as f64, p.size as f64);
        }
        ctx.set_global_alpha(1.0);
    }

    // Gravity Well

    fn draw_gravity_well(&self, g: &GravityWell, settings: &Settings) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str("#030310");
        ctx.fill_rect(0.0, 0.0, W, H);

        if settings.effective_starfield() {
            ctx.set_fill_style_str("#ffffff");
            let drift = g.tick as f64 * 0.4;
            for i in 0..60u32 {
                let size = if i % 3 == 0 { 1.5 } else { 0.8 };
                let x = (i as f64 * 137.0 + drift) % W;
                let y = (i as f64 * 97.0) % H;
                ctx.fill_rect(x, y, size, size);
            }
        }
        self.grid(40.0, "#00fff706");

        for a in &g.asteroids {
            let color = css(a.color);
            ctx.save();
            let _ = ctx.translate(a.pos.x as f64, a.pos.y as f64);
            let _ = ctx.rotate(a.rotation as f64);
            ctx.set_stroke_style_str(&color);
            ctx.set_line_width(2.0);
            ctx.set_shadow_blur(10.0);
            ctx.set_shadow_color(&color);
            ctx.begin_path();
            for i in 0..7 {
                let angle = TAU / 7.0 * i as f64;
                // Fixed lumpy outline so the rock does not shimmer
                let rad = a.radius as f64 * (0.8 + 0.2 * ((i * 5 % 7) as f64 / 7.0));
                let (x, y) = (angle.cos() * rad, angle.sin() * rad);
                if i == 0 {
                    ctx.move_to(x, y);
                } else {
                    ctx.line_to(x, y);
                }
            }
            ctx.close_path();
            ctx.stroke();
            ctx.restore();
        }

        self.particles(&g.particles, settings);

        if g.lifecycle.is_alive() {
            self.draw_ship(g);
        } else {
            self.banner("SHIP DESTROYED", &format!("FINAL SCORE: {}", g.score), "#ef4444");
        }

        self.hud(&format!("SCORE: {}", g.score), 0x00fff7, "SQUAT → DESCEND  |  STAND → ASCEND");
    }

    fn draw_ship(&self, g: &GravityWell) {
        let ctx = &self.ctx;
        let ship = g.ship_pos();
        ctx.save();
        let _ = ctx.translate(ship.x as f64, ship.y as f64);
        ctx.set_shadow_blur(18.0);
        ctx.set_shadow_color("#00fff7");
        ctx.set_fill_style_str("#00fff7");
        ctx.begin_path();
        ctx.move_to(20.0, 0.0);
        ctx.line_to(-14.0, -10.0);
        ctx.line_to(-8.0, 0.0);
        ctx.line_to(-14.0, 10.0);
        ctx.close_path();
        ctx.fill();

        // Engine flicker
        ctx.set_fill_style_str(if g.tick % 6 < 3 { "#ff00aa" } else { "#facc15" });
        ctx.begin_path();
        ctx.move_to(-8.0, -5.0);
        ctx.line_to(-22.0, 0.0);
        ctx.line_to(-8.0, 5.0);
        ctx.close_path();
        ctx.fill();
        ctx.restore();
    }

    // Neon Slicer

    fn draw_neon_slicer(&self, g: &NeonSlicer, settings: &Settings) {
        let ctx = &self.ctx;
        ctx.set_fill_style_str("#060612");
        ctx.fill_rect(0.0, 0.0, W, H);
        self.grid(50.0, "#ff00aa09");

        for core in &g.cores {
            self.draw_core(core);
        }

        for hand in Hand::BOTH {
            let cursor = g.cursor(hand);
            self.draw_trail(cursor, hand.color(), settings);
            self.draw_hand(cursor, hand.color());
        }

        self.particles(&g.particles, settings);
        self.hud(
            &format!("CORES SLICED: {}", g.score),
            0xff00aa,
            "SWING YOUR HANDS TO SLICE ENERGY CORES",
        );
    }

    fn draw_core(&self, core: &Core) {
        let ctx = &self.ctx;
        let color = css(core.color);
        let (x, y) = (core.pos.x as f64, core.pos.y as f64);
        let life = core.life.clamp(0.0, 1.0) as f64;
        let size = core.radius as f64 + (core.pulse as f64).sin() * 5.0;

        ctx.set_stroke_style_str(&color);
        ctx.set_line_width(1.0);
        for i in (1..=core.rings).rev() {
            ctx.set_global_alpha(life * 0.15 / i as f64);
            ctx.begin_path();
            let _ = ctx.arc(x, y, size * (1.0 + i as f64 * 0.3), 0.0, TAU);
            ctx.stroke();
        }

        ctx.set_global_alpha(life);
        ctx.begin_path();
        let _ = ctx.arc(x, y, size, 0.0, TAU);
        ctx.set_fill_style_str(&format!("{}22", color));
        ctx.set_shadow_blur(20.0);
        ctx.set_shadow_color(&color);
        ctx.fill();
        ctx.set_line_width(2.0);
        ctx.stroke();

        ctx.set_shadow_blur(0.0);
        ctx.set_global_alpha(life * 0.7);
        ctx.set_line_width(1.5);
        ctx.begin_path();
        ctx.move_to(x - size * 0.5, y);
        ctx.line_to(x + size * 0.5, y);
        ctx.move_to(x, y - size * 0.5);
        ctx.line_to(x, y + size * 0.5);
        ctx.stroke();
        ctx.set_global_alpha(1.0);
    }

    fn draw_trail(&self, cursor: &HandCursor, color: u32, settings: &Settings) {
        let shown = settings.trail_points(cursor.trail.len());
        let points = &cursor.trail[cursor.trail.len() - shown..];
        if points.len() < 2 {
            return;
        }
        let ctx = &self.ctx;
        let color = css(color);
        ctx.set_stroke_style_str(&color);
        ctx.set_shadow_blur(12.0);
        ctx.set_shadow_color(&color);
        for (i, pair) in points.windows(2).enumerate() {
            let alpha = ((i + 1) as f64 / points.len() as f64) * 0.8 * pair[1].life as f64;
            ctx.set_global_alpha(alpha);
            ctx.set_line_width(4.0 * alpha);
            ctx.begin_path();
            ctx.move_to(pair[0].pos.x as f64, pair[0].pos.y as f64);
            ctx.line_to(pair[1].pos.x as f64, pair[1].pos.y as f64);
            ctx.stroke();
        }
        ctx.set_global_alpha(1.0);
        ctx.set_shadow_blur(0.0);
    }

    fn draw_hand(&self, cursor: &HandCursor, color: u32) {
        let Some(pos) = cursor.shown_at() else {
            return;
        };
        let ctx = &self.ctx;
        let color = css(color);
        let (x, y) = (pos.x as f64, pos.y as f64);
        ctx.set_global_alpha(0.9);
        ctx.set_stroke_style_str(&color);
        ctx.set_line_width(2.0);
        ctx.set_shadow_blur(14.0);
        ctx.set_shadow_color(&color);
        ctx.begin_path();
        let _ = ctx.arc(x, y, 16.0, 0.0, TAU);
        ctx.stroke();
        ctx.set_fill_style_str(&color);
        ctx.begin_path();
        let _ = ctx.arc(x, y, 4.0, 0.0, TAU);
        ctx.fill();
        ctx.set_global_alpha(1.0);
        ctx.set_shadow_blur(0.0);
    }

    // Shield Wall

    fn draw_shield_wall(&self, g: &ShieldWall, settings: &Settings) {
        let ctx = &self.ctx;
        let t = &g.tuning;
        ctx.set_fill_style_str("#0a0505");
        ctx.fill_rect(0.0, 0.0, W, H);

        // Lane guides
        ctx.set_stroke_style_str("#f9731612");
        ctx.set_line_width(1.0);
        ctx.begin_path();
        for lane in t.lanes {
            ctx.move_to(lane as f64, 0.0);
            ctx.line_to(lane as f64, H);
        }
        ctx.stroke();

        // Impact band
        ctx.set_fill_style_str("#f9731610");
        ctx.fill_rect(
            0.0,
            t.impact_top as f64,
            W,
            (t.impact_bottom - t.impact_top) as f64,
        );

        let laser_color = css(LASER_COLOR);
        ctx.set_stroke_style_str(&laser_color);
        ctx.set_shadow_color(&laser_color);
        ctx.set_shadow_blur(10.0);
        ctx.set_line_width(3.0);
        for laser in &g.lasers {
            let pos = laser.pos(t.wobble_amplitude);
            ctx.begin_path();
            ctx.move_to(pos.x as f64, pos.y as f64 - 18.0);
            ctx.line_to(pos.x as f64, pos.y as f64);
            ctx.stroke();
        }
        ctx.set_shadow_blur(0.0);

        if g.lifecycle.is_alive() {
            let half = t.shield_width as f64 / 2.0;
            let shield_color = css(SHIELD_COLOR);
            ctx.set_fill_style_str(&shield_color);
            ctx.set_shadow_blur(16.0);
            ctx.set_shadow_color(&shield_color);
            ctx.fill_rect(g.shield_x as f64 - half, t.shield_y as f64 - 4.0, half * 2.0, 8.0);
            ctx.set_shadow_blur(0.0);
        }

        self.particles(&g.particles, settings);

        if settings.effective_damage_flash() && g.damage_flash > 0.0 {
            ctx.set_global_alpha(g.damage_flash as f64 * 0.35);
            ctx.set_fill_style_str("#ef4444");
            ctx.fill_rect(0.0, 0.0, W, H);
            ctx.set_global_alpha(1.0);
        }

        // Health bar
        let frac = g.health as f64 / t.max_health.max(1) as f64;
        ctx.set_fill_style_str("#1e2040");
        ctx.fill_rect(14.0, 32.0, 120.0, 6.0);
        ctx.set_fill_style_str(if frac > 0.3 { "#22c55e" } else { "#ef4444" });
        ctx.fill_rect(14.0, 32.0, 120.0 * frac, 6.0);

        if !g.lifecycle.is_alive() {
            self.banner("SHIELD DOWN", &format!("BLOCKED: {}", g.blocked), "#ef4444");
        }

        self.hud(
            &format!("BLOCKED: {}  HP: {}", g.blocked, g.health),
            0xf97316,
            "LUNGE LEFT / RIGHT TO MOVE THE SHIELD",
        );
    }
}
