//! Plain geometry types shared by the slider, the coordinator and the
//! surface hosts.
//!
//! All coordinates are in pixels.  Pointer positions delivered to a
//! [`GestureSlider`](crate::slider::GestureSlider) are **surface-local**:
//! `(0, 0)` is the top-left corner of the strip, `y` grows downwards.

use crate::command::Edge;

/// A pointer position in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `p` lies inside the rectangle.
    ///
    /// The left and top borders are inclusive, the right and bottom
    /// borders exclusive, so two adjacent rectangles never both claim the
    /// same point.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Size of the screen the overlays are placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenInfo {
    /// Horizontal resolution in pixels.
    pub width: u32,
    /// Vertical resolution in pixels.
    pub height: u32,
}

/// Where a surface for a given edge goes on the screen.
///
/// Hosts that position surfaces absolutely use `x` / `y`; anchor-based
/// hosts (layer-shell) only need `edge`, `width` and `height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub edge: Edge,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Compute the placement of the strip for `edge`.
    ///
    /// The strip is vertically centered, flush with the named edge,
    /// `width` pixels wide and `height_fraction` of the screen height
    /// tall.
    pub fn for_edge(edge: Edge, screen: ScreenInfo, width: u32, height_fraction: f64) -> Self {
        let width = width.min(screen.width);
        let height = ((screen.height as f64 * height_fraction).round() as u32).min(screen.height);
        let x = match edge {
            Edge::Left => 0,
            Edge::Right => screen.width as i32 - width as i32,
        };
        let y = (screen.height as i32 - height as i32) / 2;
        Self {
            edge,
            x,
            y,
            width,
            height,
        }
    }
}
