//! Rectangular operating area.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Point;

/// Axis-aligned rectangle in world units.
///
/// `top` is the smaller y coordinate, matching a y-down display frame.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    /// Smallest x.
    pub left: f64,
    /// Smallest y.
    pub top: f64,
    /// Largest x.
    pub right: f64,
    /// Largest y.
    pub bottom: f64,
}

impl Boundary {
    /// Construct a boundary from its edges.
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Boundary {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Width in world units.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Height in world units.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Center of the area.
    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Whether `point` lies inside the area, edges included.
    pub fn contains(&self, point: Point) -> bool {
        (self.left..=self.right).contains(&point.x) && (self.top..=self.bottom).contains(&point.y)
    }

    /// The closest point inside the area.
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(
            point.x.max(self.left).min(self.right),
            point.y.max(self.top).min(self.bottom),
        )
    }
}

impl Default for Boundary {
    /// A 6 m by 5 m area at 100 units per meter, inset 50 units from the origin.
    fn default() -> Self {
        Boundary::new(50.0, 50.0, 650.0, 550.0)
    }
}
