//! Per-pixel collision masks and rectangle math
//!
//! Hazards and the player carry a bitmask derived from their sprite's alpha
//! channel. Collision tests use mask overlap for visual fidelity; the cheaper
//! rect overlap is only used during spawn-avoidance searches.

/// Axis-aligned integer rectangle (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// True if the horizontal extents of the two rects overlap
    #[inline]
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    /// Full rect intersection test
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.overlaps_horizontally(other)
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Alpha threshold above which a pixel counts as solid (pygame-style masks)
const ALPHA_THRESHOLD: u8 = 127;

/// A sprite image reduced to its alpha channel
///
/// The renderer owns the real pixel data; the simulation only needs alpha to
/// build collision masks and to scale sprites into lane-sized hazards.
#[derive(Debug, Clone)]
pub struct SpriteImage {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl SpriteImage {
    /// Build from a row-major alpha buffer; rejects mismatched dimensions
    pub fn from_alpha(width: u32, height: u32, alpha: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || alpha.len() != (width * height) as usize {
            log::warn!(
                "rejecting sprite image: {}x{} with {} alpha bytes",
                width,
                height,
                alpha.len()
            );
            return None;
        }
        Some(Self {
            width,
            height,
            alpha,
        })
    }

    /// Fully opaque rectangle (procedural placeholder for traffic/BR hazards)
    pub fn filled_rect(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            alpha: vec![255; (width * height) as usize],
        }
    }

    /// Opaque ellipse inscribed in the bounds (placeholder for cracks/spills)
    pub fn filled_ellipse(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let rx = width as f32 / 2.0;
        let ry = height as f32 / 2.0;
        let mut alpha = vec![0u8; (width * height) as usize];
        for y in 0..height {
            for x in 0..width {
                let dx = (x as f32 + 0.5 - rx) / rx;
                let dy = (y as f32 + 0.5 - ry) / ry;
                if dx * dx + dy * dy <= 1.0 {
                    alpha[(y * width + x) as usize] = 255;
                }
            }
        }
        Self {
            width,
            height,
            alpha,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn alpha_at(&self, x: u32, y: u32) -> u8 {
        self.alpha[(y * self.width + x) as usize]
    }

    /// Nearest-neighbour scale to an exact size
    pub fn scaled(&self, target_width: u32, target_height: u32) -> Self {
        let target_width = target_width.max(1);
        let target_height = target_height.max(1);
        if target_width == self.width && target_height == self.height {
            return self.clone();
        }
        let mut alpha = Vec::with_capacity((target_width * target_height) as usize);
        for y in 0..target_height {
            let src_y = (y as u64 * self.height as u64 / target_height as u64) as u32;
            for x in 0..target_width {
                let src_x = (x as u64 * self.width as u64 / target_width as u64) as u32;
                alpha.push(self.alpha_at(src_x, src_y));
            }
        }
        Self {
            width: target_width,
            height: target_height,
            alpha,
        }
    }

    /// Scale to a target width, preserving aspect ratio with a height floor
    pub fn scaled_to_width(&self, target_width: u32, min_height: u32) -> Self {
        let target_width = target_width.max(1);
        let scaled_height =
            ((self.height as u64 * target_width as u64) / self.width as u64) as u32;
        self.scaled(target_width, scaled_height.max(min_height))
    }
}

/// Bit-per-pixel collision mask
#[derive(Debug, Clone)]
pub struct Mask {
    width: u32,
    height: u32,
    /// Row-major bits, `words_per_row` u64 words per row
    words: Vec<u64>,
    words_per_row: u32,
}

impl Mask {
    /// Build from a sprite's alpha channel
    pub fn from_image(image: &SpriteImage) -> Self {
        let width = image.width();
        let height = image.height();
        let words_per_row = width.div_ceil(64);
        let mut words = vec![0u64; (words_per_row * height) as usize];
        for y in 0..height {
            for x in 0..width {
                if image.alpha_at(x, y) > ALPHA_THRESHOLD {
                    let idx = (y * words_per_row + x / 64) as usize;
                    words[idx] |= 1u64 << (x % 64);
                }
            }
        }
        Self {
            width,
            height,
            words,
            words_per_row,
        }
    }

    /// Fully solid mask of the given size
    pub fn solid(width: u32, height: u32) -> Self {
        Self::from_image(&SpriteImage::filled_rect(width, height))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn bit(&self, x: u32, y: u32) -> bool {
        let idx = (y * self.words_per_row + x / 64) as usize;
        self.words[idx] & (1u64 << (x % 64)) != 0
    }

    /// Number of solid pixels (used by tests and debug overlays)
    pub fn count(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// True if any solid pixel of `other`, placed at `(dx, dy)` relative to
    /// this mask's origin, lands on a solid pixel of this mask
    pub fn overlaps(&self, other: &Mask, dx: i32, dy: i32) -> bool {
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (dx + other.width as i32).min(self.width as i32);
        let y1 = (dy + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }
        for y in y0..y1 {
            for x in x0..x1 {
                if self.bit(x as u32, y as u32)
                    && other.bit((x - dx) as u32, (y - dy) as u32)
                {
                    return true;
                }
            }
        }
        false
    }
}

/// Mask collision between two positioned sprites
pub fn masks_collide(a: &Mask, a_pos: (i32, i32), b: &Mask, b_pos: (i32, i32)) -> bool {
    a.overlaps(b, b_pos.0 - a_pos.0, b_pos.1 - a_pos.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        let c = Rect::new(20, 0, 10, 10);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(a.overlaps_horizontally(&b));
        assert!(!a.overlaps_horizontally(&c));
    }

    #[test]
    fn test_rect_edge_touching_does_not_overlap() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_sprite_from_alpha_rejects_bad_dimensions() {
        assert!(SpriteImage::from_alpha(4, 4, vec![255; 15]).is_none());
        assert!(SpriteImage::from_alpha(0, 4, vec![]).is_none());
        assert!(SpriteImage::from_alpha(4, 4, vec![255; 16]).is_some());
    }

    #[test]
    fn test_ellipse_mask_is_sparser_than_rect() {
        let rect = Mask::solid(20, 10);
        let ellipse = Mask::from_image(&SpriteImage::filled_ellipse(20, 10));
        assert_eq!(rect.count(), 200);
        assert!(ellipse.count() < rect.count());
        assert!(ellipse.count() > 0);
    }

    #[test]
    fn test_scaled_preserves_aspect() {
        let image = SpriteImage::filled_rect(100, 50);
        let scaled = image.scaled_to_width(40, 1);
        assert_eq!(scaled.width(), 40);
        assert_eq!(scaled.height(), 20);
    }

    #[test]
    fn test_mask_overlap_solid() {
        let a = Mask::solid(10, 10);
        let b = Mask::solid(10, 10);
        assert!(a.overlaps(&b, 5, 5));
        assert!(a.overlaps(&b, -9, -9));
        assert!(!a.overlaps(&b, 10, 0));
        assert!(!a.overlaps(&b, 0, -10));
    }

    #[test]
    fn test_mask_overlap_respects_transparency() {
        // Two ellipses whose bounding rects overlap only at a corner where
        // both are transparent must not collide.
        let e = Mask::from_image(&SpriteImage::filled_ellipse(20, 20));
        assert!(!e.overlaps(&e.clone(), 19, 19));
        assert!(e.overlaps(&e.clone(), 2, 2));
    }

    #[test]
    fn test_masks_collide_positioned() {
        let a = Mask::solid(10, 10);
        let b = Mask::solid(10, 10);
        assert!(masks_collide(&a, (100, 100), &b, (105, 105)));
        assert!(!masks_collide(&a, (100, 100), &b, (200, 100)));
    }

    #[test]
    fn test_mask_wide_rows() {
        // Exercise multi-word rows (width > 64)
        let a = Mask::solid(100, 3);
        let b = Mask::solid(4, 3);
        assert!(a.overlaps(&b, 96, 0));
        assert!(!a.overlaps(&b, 100, 0));
    }
}
