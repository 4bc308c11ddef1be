//! Hand-gesture classification.
//!
//! A pure function of one frame's landmarks — debouncing and mode transitions
//! are the choreographer's job.  Landmarks follow the 21-point hand layout in
//! normalized image coordinates (origin top-left, y grows downward), so a
//! fingertip *above* its joint on screen has the *smaller* y.

/// Keypoints per tracked hand.
pub const LANDMARK_COUNT: usize = 21;

/// Vertical clearance (normalized image height) a tip must have over its
/// joint to count as extended.
pub const EXTENSION_MARGIN: f32 = 0.03;

const INDEX_TIP:  usize = 8;
const INDEX_PIP:  usize = 6;
const MIDDLE_TIP: usize = 12;
const MIDDLE_PIP: usize = 10;
const RING_TIP:   usize = 16;
const RING_PIP:   usize = 14;

// ════════════════════════════════════════════════════════════════════════════
// Landmark / GestureLabel
// ════════════════════════════════════════════════════════════════════════════

/// One normalized hand keypoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

/// The recognized gesture vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureLabel {
    /// Index + middle extended, ring curled.
    Vee,
    /// Index + middle + ring extended.
    Open,
    /// All three curled.
    Fist,
}

impl GestureLabel {
    pub fn name(&self) -> &'static str {
        match self {
            GestureLabel::Vee  => "v",
            GestureLabel::Open => "open",
            GestureLabel::Fist => "fist",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// classify
// ════════════════════════════════════════════════════════════════════════════

/// Map one frame's landmarks to a gesture label, or `None`.
///
/// A sequence shorter than the full layout is treated identically to "no
/// hand detected".
pub fn classify(landmarks: &[Landmark]) -> Option<GestureLabel> {
    if landmarks.len() < LANDMARK_COUNT {
        return None;
    }

    let extended =
        |tip: usize, pip: usize| landmarks[tip].y < landmarks[pip].y - EXTENSION_MARGIN;

    let index  = extended(INDEX_TIP, INDEX_PIP);
    let middle = extended(MIDDLE_TIP, MIDDLE_PIP);
    let ring   = extended(RING_TIP, RING_PIP);

    match (index, middle, ring) {
        (true,  true,  false) => Some(GestureLabel::Vee),
        (true,  true,  true)  => Some(GestureLabel::Open),
        (false, false, false) => Some(GestureLabel::Fist),
        _                     => None,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// A neutral hand: every tip resting at its joint height.
    fn hand(index_tip_y: f32, middle_tip_y: f32, ring_tip_y: f32) -> Vec<Landmark> {
        let mut lm = vec![Landmark { x: 0.5, y: 0.5 }; LANDMARK_COUNT];
        lm[INDEX_TIP].y = index_tip_y;
        lm[MIDDLE_TIP].y = middle_tip_y;
        lm[RING_TIP].y = ring_tip_y;
        lm
    }

    #[test]
    fn index_and_middle_up_is_vee() {
        assert_eq!(classify(&hand(0.45, 0.45, 0.55)), Some(GestureLabel::Vee));
    }

    #[test]
    fn three_up_is_open() {
        assert_eq!(classify(&hand(0.45, 0.45, 0.45)), Some(GestureLabel::Open));
    }

    #[test]
    fn three_down_is_fist() {
        assert_eq!(classify(&hand(0.55, 0.55, 0.55)), Some(GestureLabel::Fist));
        // Tips level with joints also read as curled.
        assert_eq!(classify(&hand(0.5, 0.5, 0.5)), Some(GestureLabel::Fist));
    }

    #[test]
    fn other_combinations_are_none() {
        assert_eq!(classify(&hand(0.45, 0.55, 0.55)), None);
        assert_eq!(classify(&hand(0.55, 0.45, 0.45)), None);
        assert_eq!(classify(&hand(0.45, 0.55, 0.45)), None);
    }

    #[test]
    fn margin_requires_clear_clearance() {
        // Exactly at joint − margin is not yet extended.
        let y = 0.5 - EXTENSION_MARGIN;
        assert_eq!(classify(&hand(y, y, y)), Some(GestureLabel::Fist));
        // Just beyond the margin is.
        let y = 0.5 - EXTENSION_MARGIN - 0.001;
        assert_eq!(classify(&hand(y, y, y)), Some(GestureLabel::Open));
    }

    #[test]
    fn short_sequence_is_no_hand() {
        let lm = vec![Landmark { x: 0.5, y: 0.5 }; LANDMARK_COUNT - 1];
        assert_eq!(classify(&lm), None);
        assert_eq!(classify(&[]), None);
    }
}
