//! Per-pixel opacity masks and mask-overlap collision.
//!
//! Collision here is pixel-accurate, not bounding-box: a bird pixel only
//! counts if it is opaque in the sprite, so the transparent corners of the
//! bird slide past pipe caps.

use image::RgbaImage;

use crate::config::{FIELD_H, FIELD_W, PLAY_BOTTOM};

/// Boolean opacity grid matching a sprite image pixel for pixel.
pub struct Mask {
    w: i32,
    h: i32,
    bits: Vec<bool>,
}

impl Mask {
    /// Build a mask from a decoded RGBA image: a cell is set iff the pixel's
    /// alpha channel is non-zero.
    pub fn from_image(img: &RgbaImage) -> Self {
        let (w, h) = img.dimensions();
        let mut bits = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                bits.push(img.get_pixel(x, y)[3] != 0);
            }
        }
        Mask {
            w: w as i32,
            h: h as i32,
            bits,
        }
    }

    pub fn width(&self) -> i32 {
        self.w
    }

    pub fn height(&self) -> i32 {
        self.h
    }

    /// `x` and `y` must be inside the mask.
    pub fn at(&self, x: i32, y: i32) -> bool {
        self.bits[(y * self.w + x) as usize]
    }
}

/// Scratch plane the moving sprite is stamped onto. One spare row and column
/// past the field keep the inclusive stamp bounds indexable.
struct Plane {
    cells: Vec<bool>,
}

impl Plane {
    fn new() -> Self {
        Plane {
            cells: vec![false; ((FIELD_W + 1) * (FIELD_H + 1)) as usize],
        }
    }

    fn set(&mut self, x: i32, y: i32) {
        self.cells[(x * (FIELD_H + 1) + y) as usize] = true;
    }

    fn get(&self, x: i32, y: i32) -> bool {
        self.cells[(x * (FIELD_H + 1) + y) as usize]
    }
}

/// Pixel-level overlap between a moving sprite and a fixed sprite, both
/// placed on the playfield. Positions are truncated to whole pixels before
/// indexing. Coordinates in the ground strip never collide. The moving
/// sprite stamps with inclusive field bounds, the fixed sprite reads with
/// strict ones; that asymmetry is inherited behavior and kept as is.
pub fn collides(
    moving: &Mask,
    (mx, my): (i32, i32),
    fixed: &Mask,
    (fx, fy): (i32, i32),
) -> bool {
    let mut plane = Plane::new();

    for i in mx..mx + moving.width() {
        for j in my..my + moving.height() {
            if i >= 0 && i <= FIELD_W && j >= 0 && j <= PLAY_BOTTOM && moving.at(i - mx, j - my) {
                plane.set(i, j);
            }
        }
    }

    for i in fx..fx + fixed.width() {
        for j in fy..fy + fixed.height() {
            if i >= 0 && i < FIELD_W && j >= 0 && j < PLAY_BOTTOM {
                if fixed.at(i - fx, j - fy) && plane.get(i, j) {
                    return true;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// 3x2 image: opaque except (2,0); (2,1) has a barely non-zero alpha.
    fn sample_image() -> RgbaImage {
        let mut img = RgbaImage::new(3, 2);
        for (_, _, px) in img.enumerate_pixels_mut() {
            *px = Rgba([200, 100, 50, 255]);
        }
        img.put_pixel(2, 0, Rgba([200, 100, 50, 0]));
        img.put_pixel(2, 1, Rgba([0, 0, 0, 7]));
        img
    }

    /// Single opaque pixel at (ox, oy) inside a w x h transparent image.
    fn dot(w: u32, h: u32, ox: u32, oy: u32) -> Mask {
        let mut img = RgbaImage::new(w, h);
        img.put_pixel(ox, oy, Rgba([255, 255, 255, 255]));
        Mask::from_image(&img)
    }

    #[test]
    fn mask_matches_alpha_channel() {
        let img = sample_image();
        let mask = Mask::from_image(&img);
        assert_eq!(mask.width(), 3);
        assert_eq!(mask.height(), 2);
        assert!(mask.at(0, 0));
        assert!(mask.at(1, 1));
        assert!(!mask.at(2, 0), "alpha 0 must be transparent");
        assert!(mask.at(2, 1), "any non-zero alpha counts as opaque");
    }

    #[test]
    fn overlap_at_single_pixel() {
        let a = dot(4, 4, 3, 3);
        let b = dot(4, 4, 0, 0);
        // a's pixel lands at (103, 103), b's at (103, 103)
        assert!(collides(&a, (100, 100), &b, (103, 103)));
        // aligned bounding boxes but no opaque pixels in common
        assert!(!collides(&a, (100, 100), &b, (100, 100)));
    }

    #[test]
    fn shifted_sprites_do_not_collide() {
        let a = dot(4, 4, 2, 2);
        let b = dot(4, 4, 2, 2);
        assert!(collides(&a, (50, 50), &b, (50, 50)));
        assert!(!collides(&a, (50, 50), &b, (51, 50)));
        assert!(!collides(&a, (50, 50), &b, (50, 49)));
    }

    #[test]
    fn ground_strip_never_collides() {
        let a = dot(2, 2, 0, 0);
        let b = dot(2, 2, 0, 0);
        // overlap just above the ground strip still counts
        assert!(collides(&a, (10, PLAY_BOTTOM - 1), &b, (10, PLAY_BOTTOM - 1)));
        // overlap inside the ground strip is ignored
        assert!(!collides(&a, (10, PLAY_BOTTOM), &b, (10, PLAY_BOTTOM)));
    }

    #[test]
    fn off_field_overlap_is_ignored() {
        let a = dot(2, 2, 0, 0);
        let b = dot(2, 2, 0, 0);
        assert!(!collides(&a, (-5, 10), &b, (-5, 10)));
        assert!(!collides(&a, (FIELD_W, 10), &b, (FIELD_W, 10)));
    }
}
