//! Hit-testing: what part of which shape is under the pointer.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, Point, SEGMENT_SLACK, STROKE_SLACK};
use crate::scene::Scene;
use crate::shapes::{Shape, ShapeId, ShapeKind};

/// The part of a shape the pointer is touching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitRegion {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Line start endpoint handle.
    Start,
    /// Line end endpoint handle.
    End,
    /// Shape body; a grab here moves the shape rather than resizing it.
    Inside,
}

impl HitRegion {
    /// The cursor the UI should show while hovering this region.
    pub fn cursor(&self) -> CursorIcon {
        match self {
            HitRegion::TopLeft | HitRegion::BottomRight | HitRegion::Start | HitRegion::End => {
                CursorIcon::NwseResize
            }
            HitRegion::TopRight | HitRegion::BottomLeft => CursorIcon::NeswResize,
            HitRegion::Inside => CursorIcon::Move,
        }
    }
}

/// Cursor kinds the hit-testing layer can request, as CSS cursor names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorIcon {
    NwseResize,
    NeswResize,
    Move,
    Crosshair,
    Default,
}

impl CursorIcon {
    pub fn css_name(&self) -> &'static str {
        match self {
            CursorIcon::NwseResize => "nwse-resize",
            CursorIcon::NeswResize => "nesw-resize",
            CursorIcon::Move => "move",
            CursorIcon::Crosshair => "crosshair",
            CursorIcon::Default => "default",
        }
    }
}

/// A hit-test result: which shape, and which part of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub id: ShapeId,
    pub region: HitRegion,
}

/// Classify `p` against a single shape.
///
/// Handle regions outrank `Inside`: a point that is both near an endpoint and
/// on the segment reports the endpoint.
pub fn region_at(p: Point, shape: &Shape) -> Option<HitRegion> {
    match shape.kind() {
        ShapeKind::Line { start, end } => {
            if geometry::near_point(p, *start) {
                Some(HitRegion::Start)
            } else if geometry::near_point(p, *end) {
                Some(HitRegion::End)
            } else if geometry::on_segment(*start, *end, p, SEGMENT_SLACK) {
                Some(HitRegion::Inside)
            } else {
                None
            }
        }
        ShapeKind::Rectangle { .. } | ShapeKind::Triangle { .. } | ShapeKind::Ellipse { .. } => {
            // Box-like kinds: four corner handles, then bounding-box interior.
            // Triangles and ellipses keep their drag order, so classify
            // against the normalized box or a reversed drag is unhittable.
            let c = shape.coords()?.normalized();
            if geometry::near_point(p, c.start()) {
                Some(HitRegion::TopLeft)
            } else if geometry::near_point(p, Point::new(c.x2, c.y1)) {
                Some(HitRegion::TopRight)
            } else if geometry::near_point(p, Point::new(c.x1, c.y2)) {
                Some(HitRegion::BottomLeft)
            } else if geometry::near_point(p, c.end()) {
                Some(HitRegion::BottomRight)
            } else if c.contains(p) {
                Some(HitRegion::Inside)
            } else {
                None
            }
        }
        ShapeKind::Pencil { points } => {
            // Strokes have no handles; the hit is anywhere along the polyline.
            let on_stroke = points
                .windows(2)
                .any(|pair| geometry::on_segment(pair[0], pair[1], p, STROKE_SLACK));
            on_stroke.then_some(HitRegion::Inside)
        }
        ShapeKind::Text { .. } => {
            let c = shape.coords()?;
            c.contains(p).then_some(HitRegion::Inside)
        }
    }
}

/// Find the topmost shape under `p`. Later shapes draw on top, so the scan
/// runs back-to-front and the first match wins.
pub fn shape_at(p: Point, scene: &Scene) -> Option<Hit> {
    scene.iter().rev().find_map(|shape| {
        region_at(p, shape).map(|region| Hit {
            id: shape.id,
            region,
        })
    })
}

/// Cursor for whatever is under the pointer while the selection tool is
/// active. Empty space gets the default cursor.
pub fn cursor_at(p: Point, scene: &Scene) -> CursorIcon {
    shape_at(p, scene).map_or(CursorIcon::Default, |hit| hit.region.cursor())
}
