use serde::{Deserialize, Serialize};

use crate::feature::{GeoPoint, LabelPos};

/// Axis-aligned pixel rectangle, `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Bounds {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn from_origin_size(origin: (f32, f32), size: (f32, f32)) -> Self {
        Self {
            x1: origin.0,
            y1: origin.1,
            x2: origin.0 + size.0,
            y2: origin.1 + size.1,
        }
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn is_empty(&self) -> bool {
        self.x2 <= self.x1 || self.y2 <= self.y1
    }

    /// Strict open-interval overlap: rectangles that only share an edge
    /// do not intersect, and degenerate rectangles never intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x1 < other.x2 && other.x1 < self.x2 && self.y1 < other.y2 && other.y1 < self.y2
    }

    /// Closed-interval point containment, used for reference-point culling.
    pub fn contains(&self, point: (f32, f32)) -> bool {
        point.0 >= self.x1 && point.0 <= self.x2 && point.1 >= self.y1 && point.1 <= self.y2
    }

    /// True when the rectangle lies entirely outside `view` on either axis.
    /// Degenerate rectangles at an interior point are not outside.
    pub fn outside(&self, view: &Bounds) -> bool {
        self.x1 > view.x2 || self.x2 < view.x1 || self.y1 > view.y2 || self.y2 < view.y1
    }
}

/// One placed occurrence of a label. Point and polygon labels place at
/// most one; repeated line labels may place several.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedInstance {
    /// Geographic anchor this instance was projected from; the animation
    /// repositioner re-projects it under interpolated transforms.
    pub anchor_geo: GeoPoint,
    /// Top-left pixel of the label box.
    pub origin: (f32, f32),
    pub bounds: Bounds,
    pub pos: LabelPos,
}

/// Summary of one full layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassStats {
    /// Labels considered (everything in the registry).
    pub labels: usize,
    /// Labels with at least one placed instance.
    pub placed: usize,
    /// Placed instances in total, counting line repetitions.
    pub instances: usize,
}
