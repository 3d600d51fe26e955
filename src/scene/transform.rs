//! Logical-to-presentation coordinate mapping
//!
//! Logical space is centered on the scene origin with +Y up. Presentation
//! ratios run 0..1 across the surface with +Y down.

use glam::Vec2;

/// Scene dimensions plus the mapping into surface ratios
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    pub width: f32,
    pub height: f32,
}

impl CoordinateTransform {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Build a transform whose height follows the surface aspect ratio
    ///
    /// A surface with a zero dimension has no aspect ratio; the scene is
    /// square until a real size is known.
    pub fn for_surface(width: f32, surface: (u32, u32)) -> Self {
        let (sw, sh) = surface;
        let height = if sw == 0 || sh == 0 {
            log::warn!("Degenerate surface {sw}x{sh}, using a square scene");
            width
        } else {
            sh as f32 / sw as f32 * width
        };
        Self { width, height }
    }

    /// Logical position to presentation ratio (origin maps to 0.5, 0.5)
    #[inline]
    pub fn to_presentation_ratio(&self, pos: Vec2) -> Vec2 {
        Vec2::new(pos.x / self.width + 0.5, pos.y / -self.height + 0.5)
    }

    /// Logical size to presentation ratio (no inversion, no offset)
    #[inline]
    pub fn size_to_presentation_ratio(&self, size: Vec2) -> Vec2 {
        Vec2::new(size.x / self.width, size.y / self.height)
    }

    /// Logical position to surface pixels
    pub fn to_surface(&self, pos: Vec2, surface: Vec2) -> Vec2 {
        self.to_presentation_ratio(pos) * surface
    }

    /// Half extents of the visible area
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }
}
