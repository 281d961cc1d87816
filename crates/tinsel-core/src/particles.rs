//! Particle groups: target-layout generation and per-frame animation.
//!
//! Each group owns a fixed set of particles with one precomputed target
//! position per layout (tree / explode / heart). Every frame the positions
//! move a fixed fraction of the remaining distance toward the layout selected
//! by the display state, with per-state cosmetic effects (spin, flicker,
//! heartbeat scale) layered on top.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

use crate::constants::{
    EXPLODE_RADIUS, GIFT_COUNT, GIFT_RGB, GIFT_SIZE, GOLD_COUNT, GOLD_RGB, GOLD_SIZE,
    HAND_ROTATION_EASE, POSITION_BLEND, RED_COUNT, RED_RGB, RED_SIZE, TREE_BASE_RADIUS,
    TREE_HEIGHT, TREE_SPIN_PER_FRAME,
};
use crate::state::{DisplayState, TargetLayout};

/// The three particle flavors, each with its own count, sprite, and palette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleKind {
    Gold,
    Red,
    Gift,
}

impl ParticleKind {
    pub fn count(self) -> usize {
        match self {
            ParticleKind::Gold => GOLD_COUNT,
            ParticleKind::Red => RED_COUNT,
            ParticleKind::Gift => GIFT_COUNT,
        }
    }

    pub fn base_size(self) -> f32 {
        match self {
            ParticleKind::Gold => GOLD_SIZE,
            ParticleKind::Red => RED_SIZE,
            ParticleKind::Gift => GIFT_SIZE,
        }
    }

    pub fn base_color(self) -> [f32; 3] {
        match self {
            ParticleKind::Gold => GOLD_RGB,
            ParticleKind::Red => RED_RGB,
            ParticleKind::Gift => GIFT_RGB,
        }
    }

    /// Gift sprites are opaque boxes; the glows blend additively.
    pub fn additive(self) -> bool {
        !matches!(self, ParticleKind::Gift)
    }

    /// Gifts scatter a little wider than the glow particles.
    fn explode_multiplier(self) -> f32 {
        match self {
            ParticleKind::Gift => 1.2,
            _ => 1.0,
        }
    }
}

/// Exponential approach: move `current` a fixed fraction of the remaining
/// distance toward `target`. With `factor` in (0, 1) this is monotone and
/// never overshoots.
#[inline]
pub fn blend_toward(current: f32, target: f32, factor: f32) -> f32 {
    current + (target - current) * factor
}

/// Draw one tree-layout target: a cone with radius shrinking linearly with
/// height. Gold fills the volume (sqrt-density), red and gift hug the rim.
pub fn tree_target(kind: ParticleKind, rng: &mut impl Rng) -> Vec3 {
    let h = rng.gen::<f32>() * TREE_HEIGHT;
    let y = h - TREE_HEIGHT / 2.0;
    let radius_ratio = match kind {
        ParticleKind::Gold => rng.gen::<f32>().sqrt(),
        _ => 0.9 + rng.gen::<f32>() * 0.1,
    };
    let max_r = (1.0 - h / TREE_HEIGHT) * TREE_BASE_RADIUS;
    let r = max_r * radius_ratio;
    let theta = rng.gen::<f32>() * TAU;
    Vec3::new(r * theta.cos(), y, r * theta.sin())
}

/// Draw one explode-layout target: uniform direction on the sphere, radius
/// distributed by cube root for uniform volume density.
pub fn explode_target(kind: ParticleKind, rng: &mut impl Rng) -> Vec3 {
    let u = rng.gen::<f32>();
    let v = rng.gen::<f32>();
    let phi = (2.0 * v - 1.0).acos();
    let lam = TAU * u;
    let rad = EXPLODE_RADIUS * rng.gen::<f32>().cbrt() * kind.explode_multiplier();
    Vec3::new(
        rad * phi.sin() * lam.cos(),
        rad * phi.sin() * lam.sin(),
        rad * phi.cos(),
    )
}

/// Draw one heart-layout target: the classic parametric heart curve, filled
/// radially and softened with jitter.
pub fn heart_target(rng: &mut impl Rng) -> Vec3 {
    let t = rng.gen::<f32>() * TAU;
    let mut hx = 16.0 * t.sin().powi(3);
    let mut hy = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();

    let fill = rng.gen::<f32>().powf(0.3);
    hx *= fill;
    hy *= fill;
    let mut hz = (rng.gen::<f32>() - 0.5) * 8.0 * fill;

    let noise = 1.0;
    hx += (rng.gen::<f32>() - 0.5) * noise;
    hy += (rng.gen::<f32>() - 0.5) * noise;
    hz += (rng.gen::<f32>() - 0.5) * noise;

    let scale = 2.2;
    Vec3::new(hx * scale, hy * scale + 5.0, hz)
}

/// A fixed-size particle collection with one target per layout.
pub struct ParticleGroup {
    pub kind: ParticleKind,
    pub positions: Vec<Vec3>,
    tree_targets: Vec<Vec3>,
    explode_targets: Vec<Vec3>,
    heart_targets: Vec<Vec3>,
    phases: Vec<f32>,
    /// Per-particle sprite size; zeroed to hide a particle.
    pub sizes: Vec<f32>,
    /// Per-particle RGB after brightness flicker is applied.
    pub colors: Vec<[f32; 3]>,
    pub rotation_y: f32,
    pub scale: f32,
}

impl ParticleGroup {
    /// Generate all three target layouts up front; particles start on the
    /// tree layout.
    pub fn generate(kind: ParticleKind, rng: &mut impl Rng) -> Self {
        let count = kind.count();
        let mut tree_targets = Vec::with_capacity(count);
        let mut explode_targets = Vec::with_capacity(count);
        let mut heart_targets = Vec::with_capacity(count);
        let mut phases = Vec::with_capacity(count);
        for _ in 0..count {
            tree_targets.push(tree_target(kind, rng));
            explode_targets.push(explode_target(kind, rng));
            heart_targets.push(heart_target(rng));
            phases.push(rng.gen::<f32>() * TAU);
        }
        let positions = tree_targets.clone();
        Self {
            kind,
            positions,
            tree_targets,
            explode_targets,
            heart_targets,
            phases,
            sizes: vec![kind.base_size(); count],
            colors: vec![kind.base_color(); count],
            rotation_y: 0.0,
            scale: 1.0,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn targets(&self, layout: TargetLayout) -> &[Vec3] {
        match layout {
            TargetLayout::Tree => &self.tree_targets,
            TargetLayout::Explode => &self.explode_targets,
            TargetLayout::Heart => &self.heart_targets,
        }
    }

    /// Advance one frame: blend positions toward the active layout, then
    /// apply the state's spin/scale/flicker policy.
    pub fn step(&mut self, state: DisplayState, hand_rot_y: f32, time: f32) {
        let layout = state.target_layout();
        {
            let targets = match layout {
                TargetLayout::Tree => &self.tree_targets,
                TargetLayout::Explode => &self.explode_targets,
                TargetLayout::Heart => &self.heart_targets,
            };
            for (p, t) in self.positions.iter_mut().zip(targets) {
                p.x = blend_toward(p.x, t.x, POSITION_BLEND);
                p.y = blend_toward(p.y, t.y, POSITION_BLEND);
                p.z = blend_toward(p.z, t.z, POSITION_BLEND);
            }
        }

        let base_size = self.kind.base_size();
        let base = self.kind.base_color();
        match state {
            DisplayState::Tree => {
                self.rotation_y += TREE_SPIN_PER_FRAME;
                self.scale = 1.0;
                for i in 0..self.len() {
                    self.sizes[i] = base_size;
                    let brightness = match self.kind {
                        ParticleKind::Red => 0.5 + 0.5 * (time * 3.0 + self.phases[i]).sin(),
                        ParticleKind::Gold => 0.8 + 0.4 * (time * 10.0 + self.phases[i]).sin(),
                        ParticleKind::Gift => 1.0,
                    };
                    self.colors[i] = scaled(base, brightness);
                }
            }
            DisplayState::Heart => {
                self.rotation_y = 0.0;
                self.scale = 1.0 + (time * 3.0).sin().abs() * 0.15;
                for i in 0..self.len() {
                    self.colors[i] = base;
                    // Thin the heart out: keep every third particle.
                    self.sizes[i] = if i % 3 == 0 { base_size } else { 0.0 };
                }
            }
            DisplayState::Explode | DisplayState::Photo => {
                self.scale = 1.0;
                self.rotation_y = blend_toward(self.rotation_y, hand_rot_y, HAND_ROTATION_EASE);
                for i in 0..self.len() {
                    self.sizes[i] = base_size;
                    let brightness = match self.kind {
                        ParticleKind::Gold | ParticleKind::Red => {
                            0.8 + 0.5 * (time * 12.0 + self.phases[i]).sin()
                        }
                        ParticleKind::Gift => 1.0,
                    };
                    self.colors[i] = scaled(base, brightness);
                }
            }
        }
    }
}

#[inline]
fn scaled(rgb: [f32; 3], k: f32) -> [f32; 3] {
    [rgb[0] * k, rgb[1] * k, rgb[2] * k]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0xC0FFEE)
    }

    #[test]
    fn tree_radius_never_exceeds_cone_bound() {
        let mut r = rng();
        for kind in [ParticleKind::Gold, ParticleKind::Red, ParticleKind::Gift] {
            for _ in 0..5000 {
                let p = tree_target(kind, &mut r);
                let h = p.y + TREE_HEIGHT / 2.0;
                let max_r = (1.0 - h / TREE_HEIGHT) * TREE_BASE_RADIUS;
                let radius = (p.x * p.x + p.z * p.z).sqrt();
                assert!(
                    radius <= max_r + 1e-3,
                    "radius {radius} exceeds cone bound {max_r} at height {h}"
                );
            }
        }
    }

    #[test]
    fn explode_radius_stays_within_sphere() {
        let mut r = rng();
        for (kind, mult) in [
            (ParticleKind::Gold, 1.0),
            (ParticleKind::Red, 1.0),
            (ParticleKind::Gift, 1.2),
        ] {
            for _ in 0..5000 {
                let p = explode_target(kind, &mut r);
                let radius = p.length();
                assert!(radius >= 0.0);
                assert!(
                    radius <= EXPLODE_RADIUS * mult + 1e-3,
                    "radius {radius} out of bounds for {kind:?}"
                );
            }
        }
    }

    #[test]
    fn blend_converges_monotonically_without_overshoot() {
        let target = 10.0_f32;
        let mut x = -3.0_f32;
        let mut prev_gap = (target - x).abs();
        for _ in 0..500 {
            x = blend_toward(x, target, POSITION_BLEND);
            let gap = (target - x).abs();
            assert!(gap <= prev_gap, "distance to target must not grow");
            assert!(x <= target, "blend must not overshoot");
            prev_gap = gap;
        }
        assert!(prev_gap < 1e-3);
    }

    #[test]
    fn group_counts_are_fixed_after_generation() {
        let mut r = rng();
        let g = ParticleGroup::generate(ParticleKind::Red, &mut r);
        assert_eq!(g.len(), RED_COUNT);
        assert_eq!(g.targets(TargetLayout::Tree).len(), RED_COUNT);
        assert_eq!(g.targets(TargetLayout::Explode).len(), RED_COUNT);
        assert_eq!(g.targets(TargetLayout::Heart).len(), RED_COUNT);
        assert_eq!(g.sizes.len(), RED_COUNT);
        assert_eq!(g.colors.len(), RED_COUNT);
    }

    #[test]
    fn initial_positions_sit_on_tree_layout() {
        let mut r = rng();
        let g = ParticleGroup::generate(ParticleKind::Gold, &mut r);
        assert_eq!(g.positions, g.targets(TargetLayout::Tree));
    }

    #[test]
    fn heart_state_hides_two_of_three_particles() {
        let mut r = rng();
        let mut g = ParticleGroup::generate(ParticleKind::Gold, &mut r);
        g.step(DisplayState::Heart, 0.0, 1.0);
        for (i, &s) in g.sizes.iter().enumerate() {
            if i % 3 == 0 {
                assert_eq!(s, GOLD_SIZE);
            } else {
                assert_eq!(s, 0.0);
            }
        }
        assert!(g.scale >= 1.0 && g.scale <= 1.15);
        assert_eq!(g.rotation_y, 0.0);
    }

    #[test]
    fn tree_state_accumulates_spin() {
        let mut r = rng();
        let mut g = ParticleGroup::generate(ParticleKind::Gift, &mut r);
        for _ in 0..10 {
            g.step(DisplayState::Tree, 0.0, 0.0);
        }
        assert!((g.rotation_y - 10.0 * TREE_SPIN_PER_FRAME).abs() < 1e-6);
    }

    #[test]
    fn explode_rotation_eases_toward_hand_angle() {
        let mut r = rng();
        let mut g = ParticleGroup::generate(ParticleKind::Gift, &mut r);
        let hand = 1.5_f32;
        let mut prev_gap = hand.abs();
        for _ in 0..200 {
            g.step(DisplayState::Explode, hand, 0.0);
            let gap = (hand - g.rotation_y).abs();
            assert!(gap <= prev_gap);
            prev_gap = gap;
        }
        assert!(prev_gap < 1e-3);
    }

    #[test]
    fn photo_state_blends_toward_explode_targets() {
        let mut r = rng();
        let mut g = ParticleGroup::generate(ParticleKind::Red, &mut r);
        let before: f32 = g
            .positions
            .iter()
            .zip(g.targets(TargetLayout::Explode).to_vec())
            .map(|(p, t)| p.distance(t))
            .sum();
        g.step(DisplayState::Photo, 0.0, 0.0);
        let after: f32 = g
            .positions
            .iter()
            .zip(g.targets(TargetLayout::Explode).to_vec())
            .map(|(p, t)| p.distance(t))
            .sum();
        assert!(after < before);
    }

    #[test]
    fn gift_particles_never_flicker() {
        let mut r = rng();
        let mut g = ParticleGroup::generate(ParticleKind::Gift, &mut r);
        g.step(DisplayState::Explode, 0.0, 2.7);
        assert!(g.colors.iter().all(|&c| c == GIFT_RGB));
        g.step(DisplayState::Tree, 0.0, 2.7);
        assert!(g.colors.iter().all(|&c| c == GIFT_RGB));
    }
}
