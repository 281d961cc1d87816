//! Procedural sprite textures as plain RGBA8 pixel buffers.
//!
//! Kept free of any rendering API so the generators are host-testable; the
//! frontend uploads the buffers to GPU textures. Text banners are the one
//! exception (they need font rasterization) and are drawn via the 2D canvas
//! in the web crate.

use std::f32::consts::PI;

pub const SPRITE_SIZE: u32 = 128;

/// RGBA8 image, row-major, premultiplication left to the uploader.
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width * height * 4) as usize],
        }
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    #[inline]
    fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = ((y * self.width + x) * 4) as usize;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }
}

/// A radial gradient stop: offset in [0,1] and straight RGBA color.
type GradientStop = (f32, [u8; 4]);

fn sample_gradient(stops: &[GradientStop], t: f32) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    let mut prev = stops[0];
    for &stop in stops {
        if t <= stop.0 {
            let span = stop.0 - prev.0;
            let k = if span > 0.0 { (t - prev.0) / span } else { 0.0 };
            let mut out = [0u8; 4];
            for c in 0..4 {
                out[c] = (prev.1[c] as f32 + (stop.1[c] as f32 - prev.1[c] as f32) * k) as u8;
            }
            return out;
        }
        prev = stop;
    }
    stops[stops.len() - 1].1
}

/// Fill a square buffer with a radial gradient of the given pixel radius,
/// transparent beyond it.
fn radial_sprite(radius: f32, stops: &[GradientStop]) -> PixelBuffer {
    let mut buf = PixelBuffer::new(SPRITE_SIZE, SPRITE_SIZE);
    let c = SPRITE_SIZE as f32 / 2.0;
    for y in 0..SPRITE_SIZE {
        for x in 0..SPRITE_SIZE {
            let dx = x as f32 + 0.5 - c;
            let dy = y as f32 + 0.5 - c;
            let d = (dx * dx + dy * dy).sqrt();
            if d < radius {
                buf.put(x, y, sample_gradient(stops, d / radius));
            }
        }
    }
    buf
}

/// Soft white-to-gold glow for the gold particles.
pub fn gold_glow() -> PixelBuffer {
    radial_sprite(
        40.0,
        &[
            (0.0, [0xFF, 0xFF, 0xFF, 0xFF]),
            (0.2, [0xFF, 0xFF, 0xE0, 0xFF]),
            (0.5, [0xFF, 0xD7, 0x00, 0xFF]),
            (1.0, [0x00, 0x00, 0x00, 0x00]),
        ],
    )
}

/// Warm red light for the ornament particles.
pub fn red_light() -> PixelBuffer {
    radial_sprite(
        50.0,
        &[
            (0.0, [0xFF, 0xAA, 0xAA, 0xFF]),
            (0.3, [0xFF, 0x00, 0x00, 0xFF]),
            (1.0, [0x00, 0x00, 0x00, 0x00]),
        ],
    )
}

/// Wrapped gift box: red body, gold cross ribbon, faint dark outline.
pub fn gift_box() -> PixelBuffer {
    const BOX_MIN: u32 = 20;
    const BOX_MAX: u32 = 108;
    const RIBBON_MIN: u32 = 54;
    const RIBBON_MAX: u32 = 74;
    const RED: [u8; 4] = [0xD3, 0x2F, 0x2F, 0xFF];
    const GOLD: [u8; 4] = [0xFF, 0xD7, 0x00, 0xFF];
    const OUTLINE: [u8; 4] = [0x30, 0x30, 0x30, 0xFF];

    let mut buf = PixelBuffer::new(SPRITE_SIZE, SPRITE_SIZE);
    for y in BOX_MIN..BOX_MAX {
        for x in BOX_MIN..BOX_MAX {
            let ribbon = (RIBBON_MIN..RIBBON_MAX).contains(&x) || (RIBBON_MIN..RIBBON_MAX).contains(&y);
            let edge = x < BOX_MIN + 2 || x >= BOX_MAX - 2 || y < BOX_MIN + 2 || y >= BOX_MAX - 2;
            let color = if edge {
                OUTLINE
            } else if ribbon {
                GOLD
            } else {
                RED
            };
            buf.put(x, y, color);
        }
    }
    buf
}

/// Five-point star polygon (outer radius 50, inner 20) with a 2x2
/// supersampled edge so the spinning tree-topper does not shimmer.
pub fn star() -> PixelBuffer {
    let c = SPRITE_SIZE as f32 / 2.0;
    let outer = 50.0;
    let inner = 20.0;
    let mut poly = Vec::with_capacity(10);
    for i in 0..5 {
        let a_outer = (18.0 + i as f32 * 72.0) * PI / 180.0;
        let a_inner = (54.0 + i as f32 * 72.0) * PI / 180.0;
        poly.push((c + a_outer.cos() * outer, c - a_outer.sin() * outer));
        poly.push((c + a_inner.cos() * inner, c - a_inner.sin() * inner));
    }

    let mut buf = PixelBuffer::new(SPRITE_SIZE, SPRITE_SIZE);
    const YELLOW: [u8; 3] = [0xFF, 0xFF, 0x00];
    for y in 0..SPRITE_SIZE {
        for x in 0..SPRITE_SIZE {
            let mut hits = 0u32;
            for (sx, sy) in [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)] {
                if point_in_polygon(x as f32 + sx, y as f32 + sy, &poly) {
                    hits += 1;
                }
            }
            if hits > 0 {
                let alpha = (hits * 255 / 4) as u8;
                buf.put(x, y, [YELLOW[0], YELLOW[1], YELLOW[2], alpha]);
            }
        }
    }
    buf
}

/// Even-odd ray cast.
fn point_in_polygon(px: f32, py: f32, poly: &[(f32, f32)]) -> bool {
    let mut inside = false;
    let n = poly.len();
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = poly[i];
        let (xj, yj) = poly[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprites_are_square_rgba() {
        for buf in [gold_glow(), red_light(), gift_box(), star()] {
            assert_eq!(buf.width, SPRITE_SIZE);
            assert_eq!(buf.height, SPRITE_SIZE);
            assert_eq!(buf.data.len(), (SPRITE_SIZE * SPRITE_SIZE * 4) as usize);
        }
    }

    #[test]
    fn glows_are_bright_centered_and_transparent_at_corners() {
        for buf in [gold_glow(), red_light()] {
            let center = buf.pixel(64, 64);
            assert_eq!(center[3], 0xFF);
            assert!(center[0] > 0xC0);
            assert_eq!(buf.pixel(0, 0)[3], 0);
            assert_eq!(buf.pixel(127, 127)[3], 0);
        }
    }

    #[test]
    fn glow_fades_outward() {
        let buf = gold_glow();
        let mid = buf.pixel(64 + 12, 64);
        let rim = buf.pixel(64 + 36, 64);
        assert!(mid[3] >= rim[3]);
    }

    #[test]
    fn gift_has_ribbon_cross_on_red_body() {
        let buf = gift_box();
        // ribbon center
        assert_eq!(buf.pixel(64, 64), [0xFF, 0xD7, 0x00, 0xFF]);
        // body off-ribbon
        assert_eq!(buf.pixel(30, 30), [0xD3, 0x2F, 0x2F, 0xFF]);
        // outside the box
        assert_eq!(buf.pixel(4, 4)[3], 0);
        // outline
        assert_eq!(buf.pixel(20, 64), [0x30, 0x30, 0x30, 0xFF]);
    }

    #[test]
    fn star_center_filled_tips_reach_out() {
        let buf = star();
        assert_eq!(buf.pixel(64, 64)[3], 0xFF);
        // Top tip: angle 90 deg is an outer vertex, so a pixel slightly
        // below y = 64 - 50 must be inside.
        assert!(buf.pixel(64, 20)[3] > 0);
        assert_eq!(buf.pixel(2, 2)[3], 0);
    }
}
