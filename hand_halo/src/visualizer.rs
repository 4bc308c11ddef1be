//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                                                     │
//! │                   ✦ particle halo ✦                 │
//! │              (orbit glow about center)              │
//! │                                                     │
//! │  status bar                                         │
//! │  key legend                                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The window is resizable; the framebuffer is reallocated on size changes
//! and the orbit center follows the surface center — particle state is never
//! reset by a resize.

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use halo_field::glyph::{glyph_rows, GLYPH_COLS, GLYPH_ROWS};
use halo_field::ParticleField;

use crate::error::HaloError;
use crate::hand::{HandPose, SimInput};

use std::sync::mpsc::Sender;

// ════════════════════════════════════════════════════════════════════════════
// Layout and palette constants
// ════════════════════════════════════════════════════════════════════════════

pub const WIN_W: usize = 1200;
pub const WIN_H: usize = 700;

const BG_COLOR:       u32 = 0xFF060814;
const TEXT_BG:        u32 = 0xFF0F3460;
const STATUS_COLOR:   u32 = 0xFFEEEEEE;
const LEGEND_COLOR:   u32 = 0xFF888888;
const PARTICLE_COLOR: u32 = 0xFF9BE7FF;

const PARTICLE_RADIUS: i32 = 2;

/// Planet glow: radial gradient from 0.3 alpha at the inner radius to
/// transparent at the outer.
const GLOW_INNER: f32 = 40.0;
const GLOW_OUTER: f32 = 160.0;
const GLOW_ALPHA: f32 = 0.3;
const GLOW_COLOR: u32 = 0xFF64C8FF; // (100, 200, 255)

const STATUS_BAR_H: usize = 36;

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    width:  usize,
    height: usize,
    sim_tx: Sender<SimInput>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>) -> Result<Self, HaloError> {
        let mut window = Window::new(
            "Hand Halo — Gesture Particle Messages",
            WIN_W,
            WIN_H,
            WindowOptions { resize: true, ..WindowOptions::default() },
        )
        .map_err(|e| HaloError::Window(e.to_string()))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            width: WIN_W,
            height: WIN_H,
            sim_tx,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn surface_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    /// Poll keyboard input, translating pose keys to [`SimInput`] events.
    /// Returns false when the app should quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() {
            return false;
        }
        self.track_resize();

        let one_shot = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);

        if one_shot(&self.window, Key::Q) {
            return false;
        }
        if one_shot(&self.window, Key::V) {
            let _ = self.sim_tx.send(SimInput::Pose(HandPose::Vee));
        }
        if one_shot(&self.window, Key::O) {
            let _ = self.sim_tx.send(SimInput::Pose(HandPose::Open));
        }
        if one_shot(&self.window, Key::F) {
            let _ = self.sim_tx.send(SimInput::Pose(HandPose::Fist));
        }

        true
    }

    /// Render one frame.
    pub fn render(&mut self, field: &ParticleField, status: &str) {
        self.track_resize();
        self.buf.fill(BG_COLOR);

        self.draw_glow();

        let positions: Vec<(f32, f32)> = field.positions().collect();
        for (x, y) in positions {
            self.fill_circle(x as i32, y as i32, PARTICLE_RADIUS, PARTICLE_COLOR);
        }

        // ── Status bar + key legend ───────────────────────────────────────
        let status_y = self.height.saturating_sub(STATUS_BAR_H);
        self.fill_rect(0, status_y, self.width, STATUS_BAR_H, TEXT_BG);
        self.draw_label(status, 10, status_y + 6, STATUS_COLOR);
        self.draw_label(
            "V: PEACE   O: OPEN PALM   F: FIST   Q: QUIT",
            10,
            status_y + 22,
            LEGEND_COLOR,
        );

        let (w, h) = (self.width, self.height);
        self.window.update_with_buffer(&self.buf, w, h).ok();
    }

    /// Reallocate the framebuffer when the window size changed.
    fn track_resize(&mut self) {
        let (w, h) = self.window.get_size();
        if (w, h) != (self.width, self.height) && w > 0 && h > 0 {
            self.width = w;
            self.height = h;
            self.buf = vec![BG_COLOR; w * h];
        }
    }

    // ── Planet glow ───────────────────────────────────────────────────────

    fn draw_glow(&mut self) {
        let (cx, cy) = self.center();
        let x_lo = (cx - GLOW_OUTER).floor().max(0.0) as usize;
        let x_hi = ((cx + GLOW_OUTER).ceil() as usize).min(self.width);
        let y_lo = (cy - GLOW_OUTER).floor().max(0.0) as usize;
        let y_hi = ((cy + GLOW_OUTER).ceil() as usize).min(self.height);

        for y in y_lo..y_hi {
            for x in x_lo..x_hi {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d >= GLOW_OUTER {
                    continue;
                }
                let t = ((d - GLOW_INNER) / (GLOW_OUTER - GLOW_INNER)).clamp(0.0, 1.0);
                let a = GLOW_ALPHA * (1.0 - t);
                let idx = y * self.width + x;
                self.buf[idx] = blend(self.buf[idx], GLOW_COLOR, a);
            }
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_circle(&mut self, cx: i32, cy: i32, r: i32, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let (x, y) = (cx + dx, cy + dy);
                if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
                    self.buf[y as usize * self.width + x as usize] = color;
                }
            }
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    /// Draw a label with the core crate's 5×7 bitmap font at scale 1.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let rows = glyph_rows(ch);
            for (row, &bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_COLS {
                    if bits & (1 << (GLYPH_COLS - 1 - col)) != 0 {
                        self.set_pixel(cx + col, y + row, color);
                    }
                }
            }
            cx += GLYPH_COLS + 1;
            if cx + GLYPH_COLS >= self.width {
                break;
            }
        }
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF;
    let br = (b >> 16) & 0xFF;
    let ag = (a >> 8) & 0xFF;
    let bg = (b >> 8) & 0xFF;
    let ab = a & 0xFF;
    let bb = b & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
    }

    #[test]
    fn blend_midpoint_is_gray() {
        let mid = blend(0xFF000000, 0xFFFFFFFF, 0.5);
        let r = (mid >> 16) & 0xFF;
        assert!((126..=128).contains(&r));
    }
}
