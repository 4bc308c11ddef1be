//! Hand-landmark sources — LeapMotion hardware and keyboard simulation.
//!
//! The public interface is [`HandFrame`] delivered over a `mpsc` channel.
//! Consumers don't need to know whether frames came from a real tracker or
//! the keyboard simulator; both feed the same classifier.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use halo_field::gesture::{Landmark, LANDMARK_COUNT};

// ════════════════════════════════════════════════════════════════════════════
// HandFrame
// ════════════════════════════════════════════════════════════════════════════

/// One camera-cadence delivery: zero or one tracked hand's keypoints, in
/// normalized image coordinates (origin top-left, y down).
///
/// Sources only send frames when a hand is present; "no hand" is the absence
/// of a frame.
#[derive(Clone, Debug)]
pub struct HandFrame {
    pub landmarks: Vec<Landmark>,
}

// ════════════════════════════════════════════════════════════════════════════
// HandSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`HandFrame`]s over a channel.
pub trait HandSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<HandFrame>);
}

/// Spawn a hand source on its own thread and return the receiving end.
pub fn spawn_hand_source<S: HandSource>(source: S) -> Receiver<HandFrame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource — keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    Pose(HandPose),
}

/// Hand poses the simulator can synthesize (mapped from V / O / F keys).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandPose {
    Vee,
    Open,
    Fist,
}

/// Hand source driven by [`SimInput`] events from the visualizer's window.
///
/// Each key press is turned into a full synthetic 21-point landmark frame,
/// so the real classifier runs end to end even without a tracker.
pub struct SimHandSource {
    pub rx: Receiver<SimInput>,
}

impl HandSource for SimHandSource {
    fn run(self: Box<Self>, tx: Sender<HandFrame>) {
        for input in self.rx {
            let SimInput::Pose(pose) = input;
            let frame = HandFrame { landmarks: pose_landmarks(pose) };
            if tx.send(frame).is_err() {
                return;
            }
        }
    }
}

/// Synthesize a 21-point landmark set for a pose.
///
/// Joint heights are fixed mid-frame; extended tips sit 0.08 above their
/// joints (well past the classifier's 0.03 margin), curled tips sit below.
pub fn pose_landmarks(pose: HandPose) -> Vec<Landmark> {
    const PIP_Y:      f32 = 0.50;
    const EXTENDED_Y: f32 = 0.42;
    const CURLED_Y:   f32 = 0.56;

    let mut lm = vec![Landmark { x: 0.5, y: 0.55 }; LANDMARK_COUNT];
    lm[0] = Landmark { x: 0.5, y: 0.82 }; // wrist

    let (index_up, middle_up, ring_up) = match pose {
        HandPose::Vee  => (true, true, false),
        HandPose::Open => (true, true, true),
        HandPose::Fist => (false, false, false),
    };

    // (pip, tip, x, extended) for the three classified fingers.
    let fingers = [
        (6usize, 8usize, 0.42, index_up),
        (10, 12, 0.50, middle_up),
        (14, 16, 0.58, ring_up),
    ];
    for (pip, tip, x, up) in fingers {
        lm[pip] = Landmark { x, y: PIP_Y };
        lm[tip] = Landmark { x, y: if up { EXTENDED_Y } else { CURLED_Y } };
    }
    lm
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Hand source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// The first tracked hand's palm and 5×4 bone joints are mapped onto the
/// 21-point normalized layout; device millimeters become normalized image
/// coordinates with the y-axis flipped to image convention (Leap y grows
/// upward, image y grows downward).
#[cfg(feature = "leap")]
pub struct LeapHandSource;

#[cfg(feature = "leap")]
impl HandSource for LeapHandSource {
    fn run(self: Box<Self>, tx: Sender<HandFrame>) {
        use leaprs::*;

        let mut connection = Connection::create(ConnectionConfig::default())
            .expect("Failed to open LeapC connection");
        connection.open().expect("Failed to open LeapMotion device");
        tracing::info!("LeapMotion connection open");

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(tracking) = msg.event() {
                let hands: Vec<_> = tracking.hands().collect();
                let Some(hand) = hands.first() else { continue };
                if let Some(frame) = map_hand(hand) {
                    if tx.send(frame).is_err() {
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(feature = "leap")]
fn map_hand(hand: &leaprs::Hand) -> Option<HandFrame> {
    // Tracking volume half-span used for normalization, in millimeters.
    const SPAN_MM:   f32 = 200.0;
    const HEIGHT_MM: f32 = 400.0;

    let normalize = |x_mm: f32, y_mm: f32| Landmark {
        x: (0.5 + x_mm / (SPAN_MM * 2.0)).clamp(0.0, 1.0),
        y: (1.0 - y_mm / HEIGHT_MM).clamp(0.0, 1.0),
    };

    let digits: Vec<_> = hand.digits().collect();
    if digits.len() < 5 {
        return None;
    }

    let mut landmarks = Vec::with_capacity(LANDMARK_COUNT);
    let palm = hand.palm().position();
    landmarks.push(normalize(palm.x, palm.y)); // wrist stand-in

    // Per finger: knuckle, two mid joints, tip — matching the 21-point order.
    for digit in &digits {
        let joints = [
            digit.metacarpal().next_joint(),
            digit.proximal().next_joint(),
            digit.intermediate().next_joint(),
            digit.distal().next_joint(),
        ];
        for j in joints {
            landmarks.push(normalize(j.x, j.y));
        }
    }

    Some(HandFrame { landmarks })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use halo_field::gesture::{classify, GestureLabel};
    use std::time::Duration;

    #[test]
    fn synthetic_poses_classify_to_their_labels() {
        let cases = [
            (HandPose::Vee, GestureLabel::Vee),
            (HandPose::Open, GestureLabel::Open),
            (HandPose::Fist, GestureLabel::Fist),
        ];
        for (pose, label) in cases {
            let lm = pose_landmarks(pose);
            assert_eq!(lm.len(), LANDMARK_COUNT);
            assert_eq!(classify(&lm), Some(label), "{:?}", pose);
        }
    }

    #[test]
    fn sim_source_forwards_pose_frames() {
        let (sim_tx, sim_rx) = mpsc::channel();
        let hand_rx = spawn_hand_source(SimHandSource { rx: sim_rx });

        sim_tx.send(SimInput::Pose(HandPose::Vee)).unwrap();
        let frame = hand_rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(classify(&frame.landmarks), Some(GestureLabel::Vee));
    }

    #[test]
    fn sim_source_stops_when_input_closes() {
        let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
        let hand_rx = spawn_hand_source(SimHandSource { rx: sim_rx });
        drop(sim_tx);
        // Source thread exits, closing its sender.
        assert!(hand_rx.recv_timeout(Duration::from_secs(2)).is_err());
    }
}
