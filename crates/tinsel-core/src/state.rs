//! Display-state model shared between the gesture callback and the frame loop.
//!
//! Both callbacks run on the browser's single-threaded event loop, so the
//! frontend wraps `SceneState` in `Rc<RefCell<_>>`. Nothing here touches
//! platform APIs; the types are host-testable.

use crate::constants::HAND_X_DEFAULT;

/// The four mutually exclusive visual formations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DisplayState {
    /// Particles hold the tree cone, title and star shown.
    #[default]
    Tree,
    /// Particles scatter into the sphere, photo ring orbits.
    Explode,
    /// Particles form the heart, love banner pulses.
    Heart,
    /// Selected photo eases to the close-up position.
    Photo,
}

impl DisplayState {
    /// Photo-focus reuses the explode layout; everything else has its own.
    #[inline]
    pub fn target_layout(self) -> TargetLayout {
        match self {
            DisplayState::Tree => TargetLayout::Tree,
            DisplayState::Explode | DisplayState::Photo => TargetLayout::Explode,
            DisplayState::Heart => TargetLayout::Heart,
        }
    }
}

/// One of the three precomputed per-particle position sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetLayout {
    Tree,
    Explode,
    Heart,
}

/// Mutable scene state written by the gesture callback, read by the frame loop.
#[derive(Clone, Copy, Debug)]
pub struct SceneState {
    pub display: DisplayState,
    /// Normalized horizontal hand position in [0, 1]; 0.5 when no hand.
    pub hand_x: f32,
    /// Index of the photo currently closest to the viewer (explode state
    /// updates it, photo state reads it).
    pub selected_photo: usize,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            display: DisplayState::Tree,
            hand_x: HAND_X_DEFAULT,
            selected_photo: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_state_reuses_explode_layout() {
        assert_eq!(DisplayState::Photo.target_layout(), TargetLayout::Explode);
        assert_eq!(DisplayState::Explode.target_layout(), TargetLayout::Explode);
        assert_eq!(DisplayState::Tree.target_layout(), TargetLayout::Tree);
        assert_eq!(DisplayState::Heart.target_layout(), TargetLayout::Heart);
    }

    #[test]
    fn default_state_is_tree_with_centered_hand() {
        let s = SceneState::default();
        assert_eq!(s.display, DisplayState::Tree);
        assert_eq!(s.hand_x, 0.5);
        assert_eq!(s.selected_photo, 0);
    }
}
