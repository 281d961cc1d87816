// Shared scene/animation tuning constants used by the web frontend.

// Particle counts per group
pub const GOLD_COUNT: usize = 2000;
pub const RED_COUNT: usize = 300;
pub const GIFT_COUNT: usize = 150;

// Scene dimensions
pub const EXPLODE_RADIUS: f32 = 65.0;
pub const PHOTO_ORBIT_RADIUS: f32 = 25.0;
pub const TREE_HEIGHT: f32 = 70.0;
pub const TREE_BASE_RADIUS: f32 = 35.0;

// Particle sprite base sizes (world units)
pub const GOLD_SIZE: f32 = 2.0;
pub const RED_SIZE: f32 = 3.5;
pub const GIFT_SIZE: f32 = 3.0;

// Per-frame position blend factor toward the active target layout
pub const POSITION_BLEND: f32 = 0.08;
// Continuous tree spin (radians per frame)
pub const TREE_SPIN_PER_FRAME: f32 = 0.003;
// Ease factor for hand-driven rotation in explode/photo states
pub const HAND_ROTATION_EASE: f32 = 0.1;
// Photo position/scale lerp factor
pub const PHOTO_LERP: f32 = 0.1;
// Hand x in [0,1] maps to rotation in [-2,+2] radians
pub const HAND_ROTATION_SPAN: f32 = 4.0;

// Gesture thresholds (normalized landmark space)
pub const HEART_PAIR_DIST: f32 = 0.15;
pub const FIST_AVG_DIST: f32 = 0.25;
pub const PINCH_DIST: f32 = 0.05;
pub const HAND_X_DEFAULT: f32 = 0.5;

// Camera
pub const CAMERA_FOVY_DEG: f32 = 60.0;
pub const CAMERA_Z: f32 = 100.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Photo gallery
pub const PHOTO_NEAR_Z_CUTOFF: f32 = 5.0;
pub const PHOTO_NEAR_SCALE_SPAN: f32 = 0.8;
pub const PHOTO_FAR_SCALE: f32 = 0.6;
pub const PHOTO_FOCUS_Z: f32 = 60.0;
pub const PHOTO_FOCUS_SCALE: f32 = 5.0;
pub const PHOTO_BOB_AMPLITUDE: f32 = 3.0;

// Audio
pub const MUSIC_URL: &str = "./audio.mp3";
pub const MUSIC_VOLUME: f64 = 1.0;
pub const MUSIC_LOOP: bool = true;

// Photo manifest location
pub const PHOTO_MANIFEST_URL: &str = "./images/images.json";

// Camera preview canvas (CSS pixels)
pub const PREVIEW_WIDTH: f64 = 100.0;
pub const PREVIEW_HEIGHT: f64 = 75.0;

// Hand-tracking capture resolution
pub const CAPTURE_WIDTH: u32 = 320;
pub const CAPTURE_HEIGHT: u32 = 240;

// Base palette
pub const GOLD_RGB: [f32; 3] = [1.0, 0.843, 0.0];
pub const RED_RGB: [f32; 3] = [1.0, 0.0, 0.0];
pub const GIFT_RGB: [f32; 3] = [1.0, 1.0, 1.0];
