//! Decoration animation policy: title banner, tree-top star, love banner.
//!
//! Pure per-frame state, rendered as textured quads by the frontend.

use glam::Vec3;

use crate::constants::TREE_HEIGHT;
use crate::particles::blend_toward;
use crate::state::DisplayState;

pub const TITLE_POSITION: Vec3 = Vec3::new(0.0, 50.0, 0.0);
pub const LOVE_POSITION: Vec3 = Vec3::new(0.0, 0.0, 20.0);

#[inline]
pub fn star_position() -> Vec3 {
    Vec3::new(0.0, TREE_HEIGHT / 2.0 + 2.0, 0.0)
}

#[derive(Clone, Copy, Debug)]
pub struct Decorations {
    pub title_visible: bool,
    pub title_scale: f32,
    pub star_visible: bool,
    pub star_rotation: f32,
    pub star_opacity: f32,
    pub love_visible: bool,
    pub love_scale: f32,
}

impl Default for Decorations {
    fn default() -> Self {
        Self {
            title_visible: true,
            title_scale: 1.0,
            star_visible: true,
            star_rotation: 0.0,
            star_opacity: 1.0,
            love_visible: false,
            love_scale: 1.0,
        }
    }
}

impl Decorations {
    pub fn step(&mut self, state: DisplayState, time: f32) {
        match state {
            DisplayState::Tree => {
                self.title_visible = true;
                self.star_visible = true;
                self.love_visible = false;
                self.title_scale = blend_toward(self.title_scale, 1.0, 0.1);
                self.star_rotation -= 0.02;
                self.star_opacity = 0.7 + 0.3 * (time * 5.0).sin();
            }
            DisplayState::Heart => {
                self.title_visible = false;
                self.star_visible = false;
                self.love_visible = true;
                self.love_scale = 1.0 + (time * 3.0).sin().abs() * 0.1;
            }
            DisplayState::Explode | DisplayState::Photo => {
                self.title_visible = false;
                self.star_visible = false;
                self.love_visible = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_follows_state() {
        let mut d = Decorations::default();
        d.step(DisplayState::Tree, 0.0);
        assert!(d.title_visible && d.star_visible && !d.love_visible);
        d.step(DisplayState::Heart, 0.0);
        assert!(!d.title_visible && !d.star_visible && d.love_visible);
        d.step(DisplayState::Explode, 0.0);
        assert!(!d.title_visible && !d.star_visible && !d.love_visible);
        d.step(DisplayState::Photo, 0.0);
        assert!(!d.title_visible && !d.star_visible && !d.love_visible);
    }

    #[test]
    fn star_spins_backwards_in_tree_state() {
        let mut d = Decorations::default();
        for _ in 0..5 {
            d.step(DisplayState::Tree, 1.0);
        }
        assert!((d.star_rotation + 0.1).abs() < 1e-6);
    }

    #[test]
    fn star_opacity_stays_in_band() {
        let mut d = Decorations::default();
        for i in 0..100 {
            d.step(DisplayState::Tree, i as f32 * 0.13);
            assert!(d.star_opacity >= 0.4 - 1e-6 && d.star_opacity <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn love_pulse_stays_in_band() {
        let mut d = Decorations::default();
        for i in 0..100 {
            d.step(DisplayState::Heart, i as f32 * 0.21);
            assert!(d.love_scale >= 1.0 && d.love_scale <= 1.1 + 1e-6);
        }
    }

    #[test]
    fn star_sits_just_above_the_tree() {
        let p = star_position();
        assert_eq!(p.y, TREE_HEIGHT / 2.0 + 2.0);
    }
}
