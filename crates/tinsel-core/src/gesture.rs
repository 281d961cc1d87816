//! Per-frame gesture classification over MediaPipe hand landmarks.
//!
//! The classifier is intentionally stateless: every camera frame is mapped
//! straight to a [`GestureReading`] and overwrites the active display state.
//! There is no smoothing or hysteresis, so jitter near a threshold flickers.

use glam::Vec2;
use smallvec::SmallVec;

use crate::constants::{FIST_AVG_DIST, HAND_X_DEFAULT, HEART_PAIR_DIST, PINCH_DIST};
use crate::state::DisplayState;

// MediaPipe Hands landmark indices.
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

pub const LANDMARK_COUNT: usize = 21;

/// Non-thumb fingertips used for the open/closed palm measure.
const FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// One detected hand: 21 normalized 2D landmarks.
#[derive(Clone, Debug)]
pub struct HandFrame {
    pub landmarks: [Vec2; LANDMARK_COUNT],
}

impl HandFrame {
    pub fn new(landmarks: [Vec2; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    #[inline]
    fn dist(&self, a: usize, b: usize) -> f32 {
        self.landmarks[a].distance(self.landmarks[b])
    }

    /// Mean distance from the four non-thumb fingertips to the wrist.
    /// Small values mean a closed fist.
    pub fn avg_fingertip_to_wrist(&self) -> f32 {
        let sum: f32 = FINGERTIPS.iter().map(|&i| self.dist(i, WRIST)).sum();
        sum / FINGERTIPS.len() as f32
    }

    /// Thumb-tip to index-tip distance. Small values mean a pinch.
    pub fn pinch_distance(&self) -> f32 {
        self.dist(THUMB_TIP, INDEX_TIP)
    }
}

/// Up to two hands per camera frame.
pub type HandSet = SmallVec<[HandFrame; 2]>;

/// Result of classifying one camera frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureReading {
    pub state: DisplayState,
    /// Horizontal palm position in [0, 1], used to bias rotation.
    pub hand_x: f32,
}

/// Map a frame's hand landmarks to a display state, in priority order:
/// two-handed heart, then fist / pinch / open hand, then no-hand fallback.
pub fn classify(hands: &[HandFrame]) -> GestureReading {
    if let [h1, h2] = hands {
        let index_gap = h1.landmarks[INDEX_TIP].distance(h2.landmarks[INDEX_TIP]);
        let thumb_gap = h1.landmarks[THUMB_TIP].distance(h2.landmarks[THUMB_TIP]);
        if index_gap < HEART_PAIR_DIST && thumb_gap < HEART_PAIR_DIST {
            // The heart pose wins before the palm position is read.
            return GestureReading {
                state: DisplayState::Heart,
                hand_x: HAND_X_DEFAULT,
            };
        }
    }

    match hands.first() {
        Some(hand) => {
            let hand_x = hand.landmarks[MIDDLE_MCP].x;
            let state = if hand.avg_fingertip_to_wrist() < FIST_AVG_DIST {
                DisplayState::Tree
            } else if hand.pinch_distance() < PINCH_DIST {
                DisplayState::Photo
            } else {
                DisplayState::Explode
            };
            GestureReading { state, hand_x }
        }
        None => GestureReading {
            state: DisplayState::Tree,
            hand_x: HAND_X_DEFAULT,
        },
    }
}
