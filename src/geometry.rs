//! Plane geometry primitives shared by hit-testing and transforms.

use serde::{Deserialize, Serialize};

/// How close the pointer must be (on both axes) to grab a corner/endpoint handle.
pub const HANDLE_PROXIMITY: f64 = 5.0;

/// Slack for the segment-interior test on line shapes.
pub const SEGMENT_SLACK: f64 = 1.0;

/// Slack for the segment-interior test on pencil strokes.
pub const STROKE_SLACK: f64 = 5.0;

/// A point on the canvas, in canvas-local (pan-adjusted) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// True if `p` is within [`HANDLE_PROXIMITY`] of `target` on both axes.
pub fn near_point(p: Point, target: Point) -> bool {
    (p.x - target.x).abs() < HANDLE_PROXIMITY && (p.y - target.y).abs() < HANDLE_PROXIMITY
}

/// True if `p` lies on the segment `a`..`b`, within `max_distance` of slack.
///
/// The test compares the segment length against the sum of distances from `p`
/// to each endpoint. This is a length-sum slack, not a perpendicular-distance
/// test; hit behavior is calibrated to this exact formula, so it must not be
/// swapped for one.
pub fn on_segment(a: Point, b: Point, p: Point, max_distance: f64) -> bool {
    let offset = distance(a, b) - (distance(a, p) + distance(b, p));
    offset.abs() < max_distance
}

/// Viewport pan state. Pointer events arrive in screen space; everything in
/// the engine works in canvas space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a canvas-relative screen coordinate to canvas coordinates.
    pub fn to_canvas(&self, screen: Point) -> Point {
        Point::new(screen.x - self.offset_x, screen.y - self.offset_y)
    }

    /// Convert canvas coordinates back to screen coordinates.
    pub fn to_screen(&self, pos: Point) -> Point {
        Point::new(pos.x + self.offset_x, pos.y + self.offset_y)
    }

    /// Pan the viewport by a delta.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }
}
