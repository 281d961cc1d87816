// End-to-end scene behavior: gestures drive the display state, which drives
// particles, the photo ring, and the decorations over many frames.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tinsel_core::{
    classify, DisplayState, Decorations, HandFrame, ParticleGroup, ParticleKind, PhotoRing,
    SceneState, TargetLayout, INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP, MIDDLE_TIP, PINKY_TIP,
    RING_TIP, THUMB_TIP, WRIST,
};

fn open_hand(cx: f32) -> HandFrame {
    let mut lm = [Vec2::new(cx, 0.8); LANDMARK_COUNT];
    lm[WRIST] = Vec2::new(cx, 0.9);
    lm[THUMB_TIP] = Vec2::new(cx - 0.2, 0.5);
    lm[INDEX_TIP] = Vec2::new(cx - 0.1, 0.4);
    lm[MIDDLE_MCP] = Vec2::new(cx, 0.7);
    lm[MIDDLE_TIP] = Vec2::new(cx, 0.4);
    lm[RING_TIP] = Vec2::new(cx + 0.1, 0.4);
    lm[PINKY_TIP] = Vec2::new(cx + 0.2, 0.45);
    HandFrame::new(lm)
}

fn pinch_hand(cx: f32) -> HandFrame {
    let mut h = open_hand(cx);
    h.landmarks[THUMB_TIP] = Vec2::new(cx, 0.40);
    h.landmarks[INDEX_TIP] = Vec2::new(cx + 0.02, 0.40);
    h
}

fn heart_hands() -> [HandFrame; 2] {
    let mut left = open_hand(0.45);
    let mut right = open_hand(0.55);
    left.landmarks[INDEX_TIP] = Vec2::new(0.49, 0.3);
    right.landmarks[INDEX_TIP] = Vec2::new(0.51, 0.3);
    left.landmarks[THUMB_TIP] = Vec2::new(0.49, 0.5);
    right.landmarks[THUMB_TIP] = Vec2::new(0.51, 0.5);
    [left, right]
}

/// Feed a reading into the scene the way the tracking callback does.
fn apply_gesture(scene: &mut SceneState, hands: &[HandFrame]) {
    let reading = classify(hands);
    scene.display = reading.state;
    scene.hand_x = reading.hand_x;
}

#[test]
fn open_hand_scatters_particles_to_the_explode_cloud() {
    let mut scene = SceneState::default();
    apply_gesture(&mut scene, &[open_hand(0.5)]);
    assert_eq!(scene.display, DisplayState::Explode);

    let mut rng = StdRng::seed_from_u64(11);
    let mut group = ParticleGroup::generate(ParticleKind::Gold, &mut rng);
    for frame in 0..400 {
        group.step(scene.display, 0.0, frame as f32 / 60.0);
    }
    let targets = group.targets(TargetLayout::Explode).to_vec();
    for (p, t) in group.positions.iter().zip(&targets) {
        assert!(p.distance(*t) < 1e-2);
    }
}

#[test]
fn pinch_after_explode_focuses_the_deepest_photo() {
    let mut scene = SceneState::default();
    let mut ring = PhotoRing::new(5);

    apply_gesture(&mut scene, &[open_hand(0.5)]);
    for frame in 0..120 {
        scene.selected_photo =
            ring.step(scene.display, scene.selected_photo, 0.0, frame as f32 / 60.0);
    }
    // With base angle 0 the slot at angle 0 faces the camera.
    assert_eq!(scene.selected_photo, 0);

    apply_gesture(&mut scene, &[pinch_hand(0.5)]);
    assert_eq!(scene.display, DisplayState::Photo);
    for frame in 0..400 {
        scene.selected_photo =
            ring.step(scene.display, scene.selected_photo, 0.0, frame as f32 / 60.0);
    }
    assert_eq!(scene.selected_photo, 0);
    assert!(ring.poses[0].position.z > 50.0);
    assert!(ring.poses[0].scale > 4.5);
    for pose in &ring.poses[1..] {
        assert!(pose.scale < 0.05);
    }
}

#[test]
fn heart_hides_two_thirds_and_shows_the_love_banner() {
    let mut scene = SceneState::default();
    apply_gesture(&mut scene, &heart_hands());
    assert_eq!(scene.display, DisplayState::Heart);

    let mut rng = StdRng::seed_from_u64(3);
    let mut group = ParticleGroup::generate(ParticleKind::Red, &mut rng);
    group.step(scene.display, 0.0, 1.0);
    let hidden = group.sizes.iter().filter(|&&s| s == 0.0).count();
    assert_eq!(hidden, group.len() - group.len().div_ceil(3));

    let mut deco = Decorations::default();
    deco.step(scene.display, 1.0);
    assert!(deco.love_visible);
    assert!(!deco.title_visible);
    assert!(!deco.star_visible);
}

#[test]
fn dropping_the_hands_restores_the_tree() {
    let mut scene = SceneState::default();
    apply_gesture(&mut scene, &[open_hand(0.2)]);
    assert_eq!(scene.display, DisplayState::Explode);

    apply_gesture(&mut scene, &[]);
    assert_eq!(scene.display, DisplayState::Tree);
    assert_eq!(scene.hand_x, 0.5);

    let mut deco = Decorations::default();
    for frame in 0..400 {
        deco.step(scene.display, frame as f32 / 60.0);
    }
    assert!(deco.title_visible);
    assert!((deco.title_scale - 1.0).abs() < 1e-2);
    assert!(deco.star_visible);
    assert!(deco.star_rotation < 0.0);
}

#[test]
fn same_seed_reproduces_the_same_formation() {
    let a = ParticleGroup::generate(ParticleKind::Gift, &mut StdRng::seed_from_u64(77));
    let b = ParticleGroup::generate(ParticleKind::Gift, &mut StdRng::seed_from_u64(77));
    assert_eq!(a.positions, b.positions);
    assert_eq!(a.targets(TargetLayout::Explode), b.targets(TargetLayout::Explode));
    assert_eq!(a.targets(TargetLayout::Heart), b.targets(TargetLayout::Heart));
}
