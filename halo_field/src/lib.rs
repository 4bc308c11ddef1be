//! # halo_field
//!
//! The particle choreography core behind `hand_halo`: a field of particles
//! orbits a center and, on a recognized hand gesture, converges onto the
//! silhouette of a short message before reverting to orbit.
//!
//! ## Gesture → Message mapping
//!
//! | Gesture | Fingers (index / middle / ring) | Effect |
//! |---|---|---|
//! | `v` | up / up / down | converge on the "v" message |
//! | `open` | up / up / up | converge on the "open" message |
//! | `fist` | down / down / down | converge on the "fist" message |
//!
//! Recognition is debounced by a 1500 ms cooldown; a converged field holds
//! its message for 2600 ms, then the orbit is reseeded wholesale.
//!
//! ## Pipeline
//!
//! ```text
//! landmarks ─→ gesture::classify ─→ Choreographer::observe ─→ glyph::sample
//!                                           │                      │
//!                                           ▼                      ▼
//!                                      Mode switch ◀── targets assigned
//!                                           │
//! render tick ─→ ParticleField::advance(mode) ─→ positions() ─→ draw
//! ```
//!
//! The crate is I/O-free: landmark capture, windowing, and drawing live in
//! the `hand_halo` app crate.

pub mod choreography;
pub mod field;
pub mod gesture;
pub mod glyph;

pub use choreography::{Choreographer, MessageSet, Mode, OrbitParams, COOLDOWN, DWELL};
pub use field::{Particle, ParticleField, EASE, ORBIT_STEP};
pub use gesture::{classify, GestureLabel, Landmark, EXTENSION_MARGIN, LANDMARK_COUNT};
pub use glyph::{sample, TargetPoint, ALPHA_THRESHOLD, MASK_FONT_PX, SAMPLE_STRIDE};
