//! Placement transforms and axis-aligned bounding rectangles
//!
//! Every entity is placed on screen by a 2D affine transform. The simulation
//! only ever changes the translation part; scale is set once for the
//! background layers and never touched again.

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};

/// On-screen placement of an entity (2D affine transform)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    transform: DAffine2,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            transform: DAffine2::IDENTITY,
        }
    }
}

impl Placement {
    /// Pure translation to (x, y)
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            transform: DAffine2::from_translation(DVec2::new(x, y)),
        }
    }

    /// Pure scale, origin at (0, 0)
    pub fn scaled(sx: f64, sy: f64) -> Self {
        Self {
            transform: DAffine2::from_scale(DVec2::new(sx, sy)),
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.transform.translation.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.transform.translation.y
    }

    /// Overwrite the x offset, leaving scale and y untouched
    #[inline]
    pub fn set_x(&mut self, x: f64) {
        self.transform.translation.x = x;
    }

    /// Overwrite the y offset, leaving scale and x untouched
    #[inline]
    pub fn set_y(&mut self, y: f64) {
        self.transform.translation.y = y;
    }

    /// Move by (dx, dy) in screen space
    #[inline]
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.transform.translation += DVec2::new(dx, dy);
    }

    /// Full transform, for drawing
    pub fn transform(&self) -> DAffine2 {
        self.transform
    }

    /// Horizontal scale factor
    pub fn scale_x(&self) -> f64 {
        self.transform.matrix2.x_axis.x
    }
}

/// Axis-aligned rectangle in whole pixels, `max` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Rect {
    /// Build a rectangle, swapping coordinates so min <= max
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// Rectangle covering a `width` x `height` sprite at `placement`
    ///
    /// Coordinates truncate toward zero.
    pub fn from_placement(placement: &Placement, width: u32, height: u32) -> Self {
        let x = placement.x();
        let y = placement.y();
        Self::new(
            x as i32,
            y as i32,
            (x + f64::from(width)) as i32,
            y as i32 + height as i32,
        )
    }

    pub fn width(&self) -> i32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> i32 {
        self.max_y - self.min_y
    }

    pub fn is_empty(&self) -> bool {
        self.min_x >= self.max_x || self.min_y >= self.max_y
    }

    /// Non-empty intersection test; shared edges do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

/// An entity with a placement, a fixed size and a cached bounding rectangle
///
/// The cached rectangle goes stale whenever the placement moves; call
/// [`Bounded::update_rect`] before any collision or scoring check reads it.
pub trait Bounded {
    fn placement(&self) -> &Placement;
    fn size(&self) -> (u32, u32);
    fn rect(&self) -> &Rect;
    fn rect_mut(&mut self) -> &mut Rect;

    fn update_rect(&mut self) {
        let (width, height) = self.size();
        let rect = Rect::from_placement(self.placement(), width, height);
        *self.rect_mut() = rect;
    }

    /// Current right edge in screen space (placement + width)
    fn right_edge(&self) -> f64 {
        self.placement().x() + f64::from(self.size().0)
    }

    /// Current bottom edge in screen space (placement + height)
    fn bottom_edge(&self) -> f64 {
        self.placement().y() + f64::from(self.size().1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_x_keeps_scale_and_y() {
        let mut p = Placement::scaled(2.0, 0.5);
        p.translate(10.0, 20.0);
        p.set_x(-3.0);
        assert_eq!(p.x(), -3.0);
        assert_eq!(p.y(), 20.0);
        assert_eq!(p.scale_x(), 2.0);

        p.set_y(7.5);
        assert_eq!(p.x(), -3.0);
        assert_eq!(p.y(), 7.5);
    }

    #[test]
    fn test_translate_accumulates() {
        let mut p = Placement::at(800.0, 0.0);
        for _ in 0..10 {
            p.translate(-4.0, 0.0);
        }
        assert_eq!(p.x(), 760.0);
    }

    #[test]
    fn test_rect_from_placement_truncates() {
        let p = Placement::at(12.9, -0.7);
        let r = Rect::from_placement(&p, 70, 40);
        assert_eq!(r, Rect::new(12, 0, 82, 40));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 15, 15);
        let c = Rect::new(10, 0, 20, 10);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Shared edge only
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_empty_rect_never_overlaps() {
        let a = Rect::new(0, 0, 10, 10);
        let empty = Rect::new(3, 3, 3, 8);
        assert!(empty.is_empty());
        assert!(!a.overlaps(&empty));
        assert!(!empty.overlaps(&a));
    }

    #[test]
    fn test_new_normalizes_corners() {
        let r = Rect::new(10, 20, 0, 5);
        assert_eq!((r.min_x, r.min_y, r.max_x, r.max_y), (0, 5, 10, 20));
        assert_eq!(r.width(), 10);
        assert_eq!(r.height(), 15);
    }
}
