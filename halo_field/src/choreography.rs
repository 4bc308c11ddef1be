//! The mode state machine: orbit → converge on an accepted gesture, converge
//! → orbit when the dwell deadline passes.
//!
//! The choreographer owns the process-wide [`Mode`] and mutates it only
//! through its two transition operations.  The dwell timer is an explicit
//! deadline checked each tick rather than a scheduled callback, so it cannot
//! double-arm.

use std::time::{Duration, Instant};

use rand::Rng;

use crate::field::ParticleField;
use crate::gesture::GestureLabel;
use crate::glyph;

/// Minimum time between accepted gesture triggers.
pub const COOLDOWN: Duration = Duration::from_millis(1500);

/// Time spent converged on a message before auto-reverting to orbit.
pub const DWELL: Duration = Duration::from_millis(2600);

// ════════════════════════════════════════════════════════════════════════════
// Mode
// ════════════════════════════════════════════════════════════════════════════

/// The two motion regimes of the particle field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Orbiting,
    Converging,
}

// ════════════════════════════════════════════════════════════════════════════
// MessageSet / OrbitParams
// ════════════════════════════════════════════════════════════════════════════

/// The three trigger messages — the only externally meaningful configuration.
#[derive(Clone, Debug)]
pub struct MessageSet {
    pub vee:  String,
    pub open: String,
    pub fist: String,
}

impl MessageSet {
    pub fn for_label(&self, label: GestureLabel) -> &str {
        match label {
            GestureLabel::Vee  => &self.vee,
            GestureLabel::Open => &self.open,
            GestureLabel::Fist => &self.fist,
        }
    }
}

impl Default for MessageSet {
    fn default() -> Self {
        MessageSet {
            vee:  "YOU ARE KINDA SPECIAL".to_string(),
            open: "HEY... SMILE!".to_string(),
            fist: "THIS IS FOR YOU".to_string(),
        }
    }
}

/// Field parameters used on every orbit reinitialization.
#[derive(Clone, Copy, Debug)]
pub struct OrbitParams {
    pub count:         usize,
    pub base_radius:   f32,
    pub radius_jitter: f32,
}

impl Default for OrbitParams {
    fn default() -> Self {
        OrbitParams { count: 700, base_radius: 120.0, radius_jitter: 25.0 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Choreographer
// ════════════════════════════════════════════════════════════════════════════

pub struct Choreographer {
    mode:         Mode,
    last_trigger: Option<Instant>,
    revert_at:    Option<Instant>,
    messages:     MessageSet,
    orbit:        OrbitParams,
}

impl Choreographer {
    pub fn new(messages: MessageSet, orbit: OrbitParams) -> Self {
        Choreographer {
            mode: Mode::Orbiting,
            last_trigger: None,
            revert_at: None,
            messages,
            orbit,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn orbit_params(&self) -> OrbitParams {
        self.orbit
    }

    pub fn message_for(&self, label: GestureLabel) -> &str {
        self.messages.for_label(label)
    }

    /// Feed one classified gesture.  Returns true iff the field entered
    /// converge mode.
    ///
    /// Gestures are silently dropped while a dwell is in flight (whatever
    /// their label) and while within [`COOLDOWN`] of the last accepted
    /// trigger; dropped gestures leave no trace.  An accepted gesture whose
    /// message samples to an empty target set consumes the cooldown but the
    /// field stays in orbit.
    pub fn observe(
        &mut self,
        label: GestureLabel,
        now: Instant,
        field: &mut ParticleField,
        surface: (usize, usize),
    ) -> bool {
        if self.mode == Mode::Converging {
            return false;
        }
        if let Some(last) = self.last_trigger {
            if now.duration_since(last) < COOLDOWN {
                return false;
            }
        }
        self.last_trigger = Some(now);

        let (width, height) = surface;
        let targets = glyph::sample(self.messages.for_label(label), width, height);
        if targets.is_empty() {
            // No targets available — skip the transition, stay orbiting.
            return false;
        }

        field.assign_targets(&targets);
        self.mode = Mode::Converging;
        self.revert_at = Some(now + DWELL);
        tracing::info!(gesture = label.name(), targets = targets.len(), "converging");
        true
    }

    /// Check the dwell deadline.  Returns true iff the field reverted to
    /// orbit this tick (which also reinitializes it wholesale).
    pub fn tick(
        &mut self,
        now: Instant,
        field: &mut ParticleField,
        center: (f32, f32),
        rng: &mut impl Rng,
    ) -> bool {
        if self.mode != Mode::Converging {
            return false;
        }
        match self.revert_at {
            Some(at) if now >= at => {
                self.mode = Mode::Orbiting;
                self.revert_at = None;
                field.reinitialize(
                    self.orbit.count,
                    self.orbit.base_radius,
                    self.orbit.radius_jitter,
                    center,
                    rng,
                );
                tracing::info!(particles = field.len(), "reverted to orbit");
                true
            }
            _ => false,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SURFACE: (usize, usize) = (640, 480);
    const CENTER: (f32, f32) = (320.0, 240.0);

    fn rig(messages: MessageSet) -> (Choreographer, ParticleField, StdRng) {
        let params = OrbitParams { count: 50, ..OrbitParams::default() };
        let mut rng = StdRng::seed_from_u64(11);
        let mut field = ParticleField::new();
        field.reinitialize(params.count, 120.0, 25.0, CENTER, &mut rng);
        (Choreographer::new(messages, params), field, rng)
    }

    fn short_messages() -> MessageSet {
        MessageSet {
            vee:  "OK".to_string(),
            open: "HI".to_string(),
            fist: "NO".to_string(),
        }
    }

    #[test]
    fn accepted_gesture_converges_and_assigns_targets() {
        let (mut ch, mut field, _rng) = rig(short_messages());
        let t0 = Instant::now();
        assert!(ch.observe(GestureLabel::Vee, t0, &mut field, SURFACE));
        assert_eq!(ch.mode(), Mode::Converging);
        // At least one particle's target moved off its orbit position.
        assert!(field.particles().iter().any(|p| (p.tx, p.ty) != (p.x, p.y)));
    }

    #[test]
    fn cooldown_rejects_second_trigger() {
        // An empty message consumes the cooldown without leaving orbit,
        // exposing the cooldown check on its own.
        let mut msgs = short_messages();
        msgs.vee = String::new();
        let (mut ch, mut field, _rng) = rig(msgs);
        let t0 = Instant::now();

        assert!(!ch.observe(GestureLabel::Vee, t0, &mut field, SURFACE));
        assert_eq!(ch.mode(), Mode::Orbiting);

        // 1000 ms later: inside the cooldown window, silently dropped.
        let t1 = t0 + Duration::from_millis(1000);
        assert!(!ch.observe(GestureLabel::Open, t1, &mut field, SURFACE));
        assert_eq!(ch.mode(), Mode::Orbiting);

        // Rejected gestures must not refresh the clock: 1500 ms after the
        // *accepted* trigger a new gesture goes through.
        let t2 = t0 + Duration::from_millis(1500);
        assert!(ch.observe(GestureLabel::Open, t2, &mut field, SURFACE));
        assert_eq!(ch.mode(), Mode::Converging);
    }

    #[test]
    fn dwell_reverts_exactly_once() {
        let (mut ch, mut field, mut rng) = rig(short_messages());
        let t0 = Instant::now();
        assert!(ch.observe(GestureLabel::Fist, t0, &mut field, SURFACE));

        let just_before = t0 + DWELL - Duration::from_millis(1);
        assert!(!ch.tick(just_before, &mut field, CENTER, &mut rng));
        assert_eq!(ch.mode(), Mode::Converging);

        let at_deadline = t0 + DWELL;
        assert!(ch.tick(at_deadline, &mut field, CENTER, &mut rng));
        assert_eq!(ch.mode(), Mode::Orbiting);

        let after = at_deadline + Duration::from_millis(1);
        assert!(!ch.tick(after, &mut field, CENTER, &mut rng));
    }

    #[test]
    fn gestures_during_dwell_are_dropped() {
        let (mut ch, mut field, mut rng) = rig(short_messages());
        let t0 = Instant::now();
        assert!(ch.observe(GestureLabel::Vee, t0, &mut field, SURFACE));

        // Past the cooldown but still converging — any label is a no-op.
        let t1 = t0 + Duration::from_millis(1600);
        assert!(!ch.observe(GestureLabel::Fist, t1, &mut field, SURFACE));
        assert_eq!(ch.mode(), Mode::Converging);

        // Still exactly one revert, at the original deadline.
        assert!(ch.tick(t0 + DWELL, &mut field, CENTER, &mut rng));
    }

    #[test]
    fn revert_reinitializes_the_field() {
        let (mut ch, mut field, mut rng) = rig(short_messages());
        let t0 = Instant::now();
        ch.observe(GestureLabel::Vee, t0, &mut field, SURFACE);
        for _ in 0..30 {
            field.advance(Mode::Converging, CENTER);
        }
        ch.tick(t0 + DWELL, &mut field, CENTER, &mut rng);

        assert_eq!(field.len(), ch.orbit_params().count);
        for p in field.particles() {
            // Fresh orbit particles carry no pending convergence target.
            assert_eq!((p.tx, p.ty), (p.x, p.y));
        }
    }

    #[test]
    fn empty_target_set_aborts_transition() {
        let mut msgs = short_messages();
        msgs.open = "   ".to_string();
        let (mut ch, mut field, _rng) = rig(msgs);
        let before: Vec<(f32, f32)> =
            field.particles().iter().map(|p| (p.tx, p.ty)).collect();

        assert!(!ch.observe(GestureLabel::Open, Instant::now(), &mut field, SURFACE));
        assert_eq!(ch.mode(), Mode::Orbiting);
        let after: Vec<(f32, f32)> =
            field.particles().iter().map(|p| (p.tx, p.ty)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn trigger_accepted_again_after_revert() {
        let (mut ch, mut field, mut rng) = rig(short_messages());
        let t0 = Instant::now();
        assert!(ch.observe(GestureLabel::Vee, t0, &mut field, SURFACE));
        assert!(ch.tick(t0 + DWELL, &mut field, CENTER, &mut rng));

        // DWELL > COOLDOWN, so the next gesture is immediately eligible.
        let t1 = t0 + DWELL + Duration::from_millis(1);
        assert!(ch.observe(GestureLabel::Fist, t1, &mut field, SURFACE));
    }
}
