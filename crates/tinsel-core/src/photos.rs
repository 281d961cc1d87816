//! Photo manifest parsing and gallery layout.
//!
//! The manifest is a small JSON list fetched once at startup; its order
//! defines the ring order. Layout is a pure per-frame step over poses, so the
//! renderer only has to billboard and draw.

use glam::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::constants::{
    PHOTO_BOB_AMPLITUDE, PHOTO_FAR_SCALE, PHOTO_FOCUS_SCALE, PHOTO_FOCUS_Z, PHOTO_LERP,
    PHOTO_NEAR_SCALE_SPAN, PHOTO_NEAR_Z_CUTOFF, PHOTO_ORBIT_RADIUS,
};
use crate::particles::blend_toward;
use crate::state::DisplayState;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid photo manifest: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("photo manifest lists no photos")]
    Empty,
}

/// One manifest record: identifier, display caption, image path.
#[derive(Clone, Debug, Deserialize)]
pub struct PhotoEntry {
    pub id: String,
    pub alt: String,
    pub path: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PhotoManifest {
    pub photos: Vec<PhotoEntry>,
}

impl PhotoManifest {
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        let manifest: PhotoManifest = serde_json::from_str(json)?;
        if manifest.photos.is_empty() {
            return Err(ManifestError::Empty);
        }
        log::debug!("parsed photo manifest: {} entries", manifest.photos.len());
        Ok(manifest)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

/// Animated transform of one photo plane.
#[derive(Clone, Copy, Debug)]
pub struct PhotoPose {
    pub position: Vec3,
    pub scale: f32,
    pub visible: bool,
}

impl Default for PhotoPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: 0.0,
            visible: false,
        }
    }
}

/// The photo ring: fixed-size pose list driven by the display state.
pub struct PhotoRing {
    pub poses: Vec<PhotoPose>,
}

impl PhotoRing {
    pub fn new(count: usize) -> Self {
        Self {
            poses: vec![PhotoPose::default(); count],
        }
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Advance one frame and return the (possibly updated) selected index.
    ///
    /// Only the explode state re-picks the selection: the photo whose ring
    /// slot has the greatest z (closest to the viewer) wins, and among equal
    /// depths the later index wins.
    pub fn step(
        &mut self,
        state: DisplayState,
        selected: usize,
        base_angle: f32,
        time: f32,
    ) -> usize {
        match state {
            DisplayState::Tree | DisplayState::Heart => {
                for pose in &mut self.poses {
                    pose.scale = blend_toward(pose.scale, 0.0, PHOTO_LERP);
                    pose.visible = false;
                }
                selected
            }
            DisplayState::Explode => {
                let n = self.poses.len();
                if n == 0 {
                    return selected;
                }
                let angle_step = std::f32::consts::TAU / n as f32;
                let mut depths = Vec::with_capacity(n);
                for (i, pose) in self.poses.iter_mut().enumerate() {
                    pose.visible = true;
                    let angle = base_angle + i as f32 * angle_step;
                    let x = angle.sin() * PHOTO_ORBIT_RADIUS;
                    let z = angle.cos() * PHOTO_ORBIT_RADIUS;
                    let y = (time + i as f32).sin() * PHOTO_BOB_AMPLITUDE;

                    let target = Vec3::new(x, y, z);
                    pose.position.x = blend_toward(pose.position.x, target.x, PHOTO_LERP);
                    pose.position.y = blend_toward(pose.position.y, target.y, PHOTO_LERP);
                    pose.position.z = blend_toward(pose.position.z, target.z, PHOTO_LERP);

                    depths.push(z);

                    let scale_target = if z > PHOTO_NEAR_Z_CUTOFF {
                        1.0 + (z / PHOTO_ORBIT_RADIUS) * PHOTO_NEAR_SCALE_SPAN
                    } else {
                        PHOTO_FAR_SCALE
                    };
                    pose.scale = blend_toward(pose.scale, scale_target, PHOTO_LERP);
                }
                deepest_index(&depths)
            }
            DisplayState::Photo => {
                for (i, pose) in self.poses.iter_mut().enumerate() {
                    if i == selected {
                        let target = Vec3::new(0.0, 0.0, PHOTO_FOCUS_Z);
                        pose.position.x = blend_toward(pose.position.x, target.x, PHOTO_LERP);
                        pose.position.y = blend_toward(pose.position.y, target.y, PHOTO_LERP);
                        pose.position.z = blend_toward(pose.position.z, target.z, PHOTO_LERP);
                        pose.scale = blend_toward(pose.scale, PHOTO_FOCUS_SCALE, PHOTO_LERP);
                    } else {
                        pose.scale = blend_toward(pose.scale, 0.0, PHOTO_LERP);
                    }
                }
                selected
            }
        }
    }
}

/// Index of the greatest depth; among equal maxima the later index wins.
#[inline]
pub fn deepest_index(depths: &[f32]) -> usize {
    let mut best_idx = 0;
    let mut max_z = f32::NEG_INFINITY;
    for (i, &z) in depths.iter().enumerate() {
        if z >= max_z {
            max_z = z;
            best_idx = i;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST_JSON: &str = r#"{
        "photos": [
            { "id": "p1", "alt": "First snow", "path": "./images/p1.jpg" },
            { "id": "p2", "alt": "Market lights", "path": "./images/p2.jpg" },
            { "id": "p3", "alt": "Sledding", "path": "./images/p3.jpg" }
        ]
    }"#;

    #[test]
    fn manifest_parses_records_in_order() {
        let m = PhotoManifest::from_json(MANIFEST_JSON).unwrap();
        assert_eq!(m.len(), 3);
        assert_eq!(m.photos[0].id, "p1");
        assert_eq!(m.photos[2].alt, "Sledding");
        assert_eq!(m.photos[1].path, "./images/p2.jpg");
    }

    #[test]
    fn empty_manifest_is_rejected() {
        let err = PhotoManifest::from_json(r#"{ "photos": [] }"#).unwrap_err();
        assert!(matches!(err, ManifestError::Empty));
    }

    #[test]
    fn malformed_manifest_is_a_parse_error() {
        let err = PhotoManifest::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
    }

    #[test]
    fn tree_and_heart_shrink_and_hide_every_photo() {
        let mut ring = PhotoRing::new(4);
        for pose in &mut ring.poses {
            pose.scale = 1.0;
            pose.visible = true;
        }
        let sel = ring.step(DisplayState::Tree, 2, 0.0, 0.0);
        assert_eq!(sel, 2);
        for pose in &ring.poses {
            assert!(!pose.visible);
            assert!(pose.scale < 1.0);
        }
    }

    #[test]
    fn explode_selects_deepest_photo() {
        let mut ring = PhotoRing::new(4);
        // base_angle 0: slot 0 sits at angle 0 -> z = +R, the rest behind.
        let sel = ring.step(DisplayState::Explode, 0, 0.0, 0.0);
        assert_eq!(sel, 0);
        assert!(ring.poses.iter().all(|p| p.visible));
    }

    #[test]
    fn tie_break_prefers_later_index() {
        assert_eq!(deepest_index(&[1.0, 1.0, 0.5]), 1);
        assert_eq!(deepest_index(&[0.5, 2.0, 2.0, 2.0, -1.0]), 3);
        assert_eq!(deepest_index(&[-3.0, -3.0]), 1);
        assert_eq!(deepest_index(&[7.0]), 0);
    }

    #[test]
    fn photo_state_keeps_selection_and_focuses_it() {
        let mut ring = PhotoRing::new(3);
        for pose in &mut ring.poses {
            pose.visible = true;
            pose.scale = 1.0;
        }
        let mut sel = 1;
        for _ in 0..400 {
            sel = ring.step(DisplayState::Photo, sel, 0.0, 0.0);
        }
        assert_eq!(sel, 1);
        let focused = ring.poses[1];
        assert!((focused.position.z - PHOTO_FOCUS_Z).abs() < 1e-2);
        assert!((focused.scale - PHOTO_FOCUS_SCALE).abs() < 1e-2);
        assert!(ring.poses[0].scale < 1e-2);
        assert!(ring.poses[2].scale < 1e-2);
    }

    #[test]
    fn explode_scale_splits_on_depth_cutoff() {
        let mut ring = PhotoRing::new(2);
        // Run to convergence so the lerped scales approach their targets.
        for _ in 0..400 {
            ring.step(DisplayState::Explode, 0, 0.0, 0.0);
        }
        // Slot 0 at z = +R (near side), slot 1 at z = -R (far side).
        let near = ring.poses[0].scale;
        let far = ring.poses[1].scale;
        assert!((near - 1.8).abs() < 1e-2, "near scale was {near}");
        assert!((far - PHOTO_FAR_SCALE).abs() < 1e-2, "far scale was {far}");
    }
}
