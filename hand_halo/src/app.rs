//! Top-level application state and frame loop.
//!
//! `AppState` owns the `ParticleField` and the `Choreographer`; it consumes
//! classified hand frames and drives the visualizer each frame.  The hand
//! source runs on its own thread and is drained once per frame, keeping only
//! the most recent frame — a single-slot mailbox, no backlog.

use std::sync::mpsc::{self, TryRecvError};
use std::time::Instant;

use rand::rngs::ThreadRng;

use halo_field::{classify, Choreographer, MessageSet, Mode, OrbitParams, ParticleField};

use crate::error::HaloError;
use crate::hand::{spawn_hand_source, HandFrame};
use crate::visualizer::Visualizer;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub messages:       MessageSet,
    pub particle_count: usize,
    pub base_radius:    f32,
    pub radius_jitter:  f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let orbit = OrbitParams::default();
        AppConfig {
            messages:       MessageSet::default(),
            particle_count: orbit.count,
            base_radius:    orbit.base_radius,
            radius_jitter:  orbit.radius_jitter,
        }
    }
}

impl AppConfig {
    fn orbit_params(&self) -> OrbitParams {
        OrbitParams {
            count:         self.particle_count,
            base_radius:   self.base_radius,
            radius_jitter: self.radius_jitter,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    field:  ParticleField,
    choreo: Choreographer,
    rng:    ThreadRng,
    pub status: String,
}

impl AppState {
    pub fn new(cfg: AppConfig, surface: (usize, usize)) -> Self {
        let params = cfg.orbit_params();
        let mut rng = rand::thread_rng();
        let mut field = ParticleField::new();
        field.reinitialize(
            params.count,
            params.base_radius,
            params.radius_jitter,
            center_of(surface),
            &mut rng,
        );
        AppState {
            field,
            choreo: Choreographer::new(cfg.messages, params),
            rng,
            status: format!("ORBITING: {} PARTICLES", params.count),
        }
    }

    /// Process one hand frame at camera cadence: classify, then offer the
    /// label to the choreographer.  Rejected or unclassifiable frames leave
    /// no trace.
    pub fn handle_hand_frame(
        &mut self,
        frame: &HandFrame,
        now: Instant,
        surface: (usize, usize),
    ) {
        let Some(label) = classify(&frame.landmarks) else { return };
        if self.choreo.observe(label, now, &mut self.field, surface) {
            self.status = format!(
                "{}: {}",
                label.name().to_uppercase(),
                self.choreo.message_for(label)
            );
        }
    }

    /// Per-render-frame tick: check the dwell deadline, then advance every
    /// particle under the current mode about the current surface center.
    pub fn tick(&mut self, now: Instant, surface: (usize, usize)) {
        let center = center_of(surface);
        if self.choreo.tick(now, &mut self.field, center, &mut self.rng) {
            self.status = format!("ORBITING: {} PARTICLES", self.field.len());
        }
        self.field.advance(self.choreo.mode(), center);
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn mode(&self) -> Mode {
        self.choreo.mode()
    }
}

fn center_of(surface: (usize, usize)) -> (f32, f32) {
    (surface.0 as f32 / 2.0, surface.1 as f32 / 2.0)
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Creates the visualizer and the hand source (keyboard simulation by
/// default, LeapMotion hardware with `--features leap`), then drives the
/// event/render loop at ~60 fps.
pub fn run(cfg: AppConfig) -> Result<(), HaloError> {
    // ── Hand source ───────────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel();

    #[cfg(not(feature = "leap"))]
    let hand_rx = spawn_hand_source(crate::hand::SimHandSource { rx: sim_rx });
    #[cfg(feature = "leap")]
    let hand_rx = {
        drop(sim_rx); // pose keys are inert in hardware mode
        spawn_hand_source(crate::hand::LeapHandSource)
    };

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(sim_tx)?;

    // ── App state ─────────────────────────────────────────────────────────
    let mut app = AppState::new(cfg, vis.surface_size());
    tracing::info!(particles = app.field().len(), "halo running");

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        if !vis.poll_input() {
            break;
        }

        // Drain hand frames, most recent wins.
        let mut latest: Option<HandFrame> = None;
        loop {
            match hand_rx.try_recv() {
                Ok(frame) => latest = Some(frame),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            }
        }
        if let Some(frame) = latest {
            app.handle_hand_frame(&frame, Instant::now(), vis.surface_size());
        }

        app.tick(Instant::now(), vis.surface_size());
        vis.render(app.field(), &app.status);
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{pose_landmarks, HandPose};
    use halo_field::DWELL;
    use std::time::Duration;

    const SURFACE: (usize, usize) = (1200, 700);

    fn make_app() -> AppState {
        AppState::new(AppConfig::default(), SURFACE)
    }

    fn pose_frame(pose: HandPose) -> HandFrame {
        HandFrame { landmarks: pose_landmarks(pose) }
    }

    #[test]
    fn vee_pose_enters_converge_mode() {
        let mut app = make_app();
        app.handle_hand_frame(&pose_frame(HandPose::Vee), Instant::now(), SURFACE);
        assert_eq!(app.mode(), Mode::Converging);
        assert!(app.status.starts_with("V:"));
    }

    #[test]
    fn each_pose_maps_to_its_message() {
        let cfg = AppConfig::default();
        for (pose, expected) in [
            (HandPose::Vee, cfg.messages.vee.clone()),
            (HandPose::Open, cfg.messages.open.clone()),
            (HandPose::Fist, cfg.messages.fist.clone()),
        ] {
            let mut app = AppState::new(cfg.clone(), SURFACE);
            app.handle_hand_frame(&pose_frame(pose), Instant::now(), SURFACE);
            assert_eq!(app.mode(), Mode::Converging);
            assert!(app.status.contains(&expected), "{}", app.status);
        }
    }

    #[test]
    fn frame_without_hand_is_ignored() {
        let mut app = make_app();
        app.handle_hand_frame(
            &HandFrame { landmarks: Vec::new() },
            Instant::now(),
            SURFACE,
        );
        assert_eq!(app.mode(), Mode::Orbiting);
    }

    #[test]
    fn dwell_reverts_to_orbit() {
        let mut app = make_app();
        let t0 = Instant::now();
        app.handle_hand_frame(&pose_frame(HandPose::Fist), t0, SURFACE);
        assert_eq!(app.mode(), Mode::Converging);

        app.tick(t0 + DWELL + Duration::from_millis(1), SURFACE);
        assert_eq!(app.mode(), Mode::Orbiting);
        assert!(app.status.starts_with("ORBITING"));
    }

    #[test]
    fn tick_moves_particles() {
        let mut app = make_app();
        let before: Vec<(f32, f32)> = app.field().positions().collect();
        app.tick(Instant::now(), SURFACE);
        let after: Vec<(f32, f32)> = app.field().positions().collect();
        assert_ne!(before, after);
    }

    #[test]
    fn resize_shifts_center_without_reset() {
        let mut app = make_app();
        let count = app.field().len();
        app.tick(Instant::now(), (600, 400));
        assert_eq!(app.field().len(), count);
        // All particles now orbit the new center.
        let (cx, cy) = (300.0_f32, 200.0_f32);
        for p in app.field().particles() {
            let d = ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt();
            assert!((d - p.radius).abs() < 1e-3);
        }
    }
}
