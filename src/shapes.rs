//! Shape model and factory.
//!
//! `ShapeKind` is the closed set of drawable kinds. Tool identifiers coming
//! from untrusted input (config files, saved documents) go through
//! `Tool::from_str`, which is the one place an unknown kind can surface.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Point;

/// Stable shape identifier. Always equal to the shape's index in its scene.
pub type ShapeId = usize;

/// A tool identifier named something outside the drawable set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tool not recognised: {0}")]
pub struct UnknownTool(pub String);

/// The active tool. Every drawing tool maps 1:1 onto a shape kind;
/// `Selection` manipulates existing shapes and produces none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Selection,
    Line,
    Rectangle,
    Triangle,
    Ellipse,
    Pencil,
    Text,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Selection => "selection",
            Tool::Line => "line",
            Tool::Rectangle => "rectangle",
            Tool::Triangle => "triangle",
            Tool::Ellipse => "ellipse",
            Tool::Pencil => "pencil",
            Tool::Text => "text",
        }
    }

    /// Kinds whose corners get canonicalized after a drag completes.
    pub fn needs_normalization(&self) -> bool {
        matches!(self, Tool::Line | Tool::Rectangle)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "selection" => Ok(Tool::Selection),
            "line" => Ok(Tool::Line),
            "rectangle" => Ok(Tool::Rectangle),
            "triangle" => Ok(Tool::Triangle),
            "ellipse" => Ok(Tool::Ellipse),
            "pencil" => Ok(Tool::Pencil),
            "text" => Ok(Tool::Text),
            other => Err(UnknownTool(other.to_string())),
        }
    }
}

/// Per-shape stroke color as a CSS color string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeColor(String);

impl StrokeColor {
    pub fn new(css: impl Into<String>) -> Self {
        Self(css.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StrokeColor {
    fn default() -> Self {
        Self("#000000".to_string())
    }
}

/// The two defining corners/endpoints of a shape, in drag order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coords {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Coords {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn from_points(start: Point, end: Point) -> Self {
        Self::new(start.x, start.y, end.x, end.y)
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Axis-aligned containment, assuming `(x1, y1)` is the top-left corner.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }

    /// The same box with `(x1, y1)` forced to the top-left corner. Kinds that
    /// keep their drag order (triangle, ellipse) may store reversed corners.
    pub fn normalized(&self) -> Self {
        Self::new(
            self.x1.min(self.x2),
            self.y1.min(self.y2),
            self.x1.max(self.x2),
            self.y1.max(self.y2),
        )
    }
}

/// Geometric data for one shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    /// A line from start to end.
    Line { start: Point, end: Point },
    /// A rectangle defined by two opposite corners.
    Rectangle { start: Point, end: Point },
    /// A triangle: base corners at `(x1, y1)` and `(x2, y1)`, apex at
    /// `((x1 + x2) / 2, y2)`.
    Triangle { start: Point, end: Point },
    /// An ellipse inscribed in the box spanned by start and end.
    Ellipse { start: Point, end: Point },
    /// Freehand stroke: the point list grows while the stroke is drawn.
    Pencil { points: Vec<Point> },
    /// Text with its top-left at start; end is the computed bottom-right of
    /// the measured text box.
    Text { start: Point, end: Point, content: String },
}

impl ShapeKind {
    pub fn tool(&self) -> Tool {
        match self {
            ShapeKind::Line { .. } => Tool::Line,
            ShapeKind::Rectangle { .. } => Tool::Rectangle,
            ShapeKind::Triangle { .. } => Tool::Triangle,
            ShapeKind::Ellipse { .. } => Tool::Ellipse,
            ShapeKind::Pencil { .. } => Tool::Pencil,
            ShapeKind::Text { .. } => Tool::Text,
        }
    }

    /// The corner pair, for every kind that has one. Pencil strokes have no
    /// corner representation.
    pub fn coords(&self) -> Option<Coords> {
        match self {
            ShapeKind::Line { start, end }
            | ShapeKind::Rectangle { start, end }
            | ShapeKind::Triangle { start, end }
            | ShapeKind::Ellipse { start, end }
            | ShapeKind::Text { start, end, .. } => Some(Coords::from_points(*start, *end)),
            ShapeKind::Pencil { .. } => None,
        }
    }

    /// Same kind with replaced corners. Pencil strokes pass through untouched.
    pub fn with_coords(&self, c: Coords) -> Self {
        let (start, end) = (c.start(), c.end());
        match self {
            ShapeKind::Line { .. } => ShapeKind::Line { start, end },
            ShapeKind::Rectangle { .. } => ShapeKind::Rectangle { start, end },
            ShapeKind::Triangle { .. } => ShapeKind::Triangle { start, end },
            ShapeKind::Ellipse { .. } => ShapeKind::Ellipse { start, end },
            ShapeKind::Text { content, .. } => ShapeKind::Text {
                start,
                end,
                content: content.clone(),
            },
            ShapeKind::Pencil { points } => ShapeKind::Pencil { points: points.clone() },
        }
    }

    /// Create a translated copy of this shape.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let shift = |p: &Point| Point::new(p.x + dx, p.y + dy);
        match self {
            ShapeKind::Line { start, end } => ShapeKind::Line {
                start: shift(start),
                end: shift(end),
            },
            ShapeKind::Rectangle { start, end } => ShapeKind::Rectangle {
                start: shift(start),
                end: shift(end),
            },
            ShapeKind::Triangle { start, end } => ShapeKind::Triangle {
                start: shift(start),
                end: shift(end),
            },
            ShapeKind::Ellipse { start, end } => ShapeKind::Ellipse {
                start: shift(start),
                end: shift(end),
            },
            ShapeKind::Pencil { points } => ShapeKind::Pencil {
                points: points.iter().map(shift).collect(),
            },
            ShapeKind::Text { start, end, content } => ShapeKind::Text {
                start: shift(start),
                end: shift(end),
                content: content.clone(),
            },
        }
    }
}

/// Renderer-owned draw description, precomputed from the geometry.
///
/// Regenerated on every coordinate change; pencil and text shapes are drawn
/// straight from their fields and carry no path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderPath {
    Segment { start: Point, end: Point },
    Rect { origin: Point, width: f64, height: f64 },
    Polygon(Vec<Point>),
    Ellipse { center: Point, width: f64, height: f64 },
}

impl RenderPath {
    /// Compute the path for a kind, if it has one.
    pub fn for_kind(kind: &ShapeKind) -> Option<Self> {
        let c = kind.coords()?;
        match kind {
            ShapeKind::Line { .. } => Some(RenderPath::Segment {
                start: c.start(),
                end: c.end(),
            }),
            ShapeKind::Rectangle { .. } => Some(RenderPath::Rect {
                origin: c.start(),
                width: c.width(),
                height: c.height(),
            }),
            ShapeKind::Triangle { .. } => Some(RenderPath::Polygon(vec![
                Point::new(c.x1, c.y1),
                Point::new((c.x1 + c.x2) / 2.0, c.y2),
                Point::new(c.x2, c.y1),
            ])),
            ShapeKind::Ellipse { .. } => Some(RenderPath::Ellipse {
                center: Point::new((c.x1 + c.x2) / 2.0, (c.y1 + c.y2) / 2.0),
                width: c.width(),
                height: c.height(),
            }),
            ShapeKind::Pencil { .. } | ShapeKind::Text { .. } => None,
        }
    }
}

/// One drawable shape: geometry, stroke color, cached render path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    kind: ShapeKind,
    pub color: StrokeColor,
    /// Derived from `kind`; rebuilt on every geometry change and after
    /// deserialization.
    #[serde(skip)]
    path: Option<RenderPath>,
}

// The cached path is derived state and excluded from equality.
impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.kind == other.kind && self.color == other.color
    }
}

impl Shape {
    pub fn new(id: ShapeId, kind: ShapeKind, color: StrokeColor) -> Self {
        let path = RenderPath::for_kind(&kind);
        Self { id, kind, color, path }
    }

    /// Build a shape from a drag gesture: `start` is where the pointer went
    /// down, `end` where it currently is. Fails for tools that draw nothing.
    pub fn from_drag(
        id: ShapeId,
        start: Point,
        end: Point,
        tool: Tool,
        color: StrokeColor,
    ) -> Result<Self, UnknownTool> {
        let kind = match tool {
            Tool::Line => ShapeKind::Line { start, end },
            Tool::Rectangle => ShapeKind::Rectangle { start, end },
            Tool::Triangle => ShapeKind::Triangle { start, end },
            Tool::Ellipse => ShapeKind::Ellipse { start, end },
            Tool::Pencil => ShapeKind::Pencil { points: vec![start] },
            Tool::Text => ShapeKind::Text {
                start,
                end,
                content: String::new(),
            },
            Tool::Selection => return Err(UnknownTool(tool.name().to_string())),
        };
        Ok(Self::new(id, kind, color))
    }

    /// Build a shape from an untrusted tool identifier.
    pub fn from_tool_name(
        id: ShapeId,
        start: Point,
        end: Point,
        name: &str,
        color: StrokeColor,
    ) -> Result<Self, UnknownTool> {
        Self::from_drag(id, start, end, name.parse()?, color)
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn tool(&self) -> Tool {
        self.kind.tool()
    }

    pub fn coords(&self) -> Option<Coords> {
        self.kind.coords()
    }

    /// The cached render path, if this kind has one.
    pub fn path(&self) -> Option<&RenderPath> {
        self.path.as_ref()
    }

    /// Replace the geometry wholesale, regenerating the render path.
    pub fn set_kind(&mut self, kind: ShapeKind) {
        self.path = RenderPath::for_kind(&kind);
        self.kind = kind;
    }

    /// Replace the corner pair, regenerating the render path.
    pub fn apply_coords(&mut self, c: Coords) {
        self.set_kind(self.kind.with_coords(c));
    }

    /// Append a point to a pencil stroke. Ignored for other kinds.
    pub fn push_point(&mut self, p: Point) {
        if let ShapeKind::Pencil { points } = &mut self.kind {
            points.push(p);
        }
    }

    /// Set text content together with its measured box.
    pub fn set_text(&mut self, content: impl Into<String>, c: Coords) {
        if let ShapeKind::Text { .. } = self.kind {
            self.kind = ShapeKind::Text {
                start: c.start(),
                end: c.end(),
                content: content.into(),
            };
        }
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.id, self.kind.translated(dx, dy), self.color.clone())
    }

    /// Recompute the cached render path, e.g. after deserialization.
    pub fn rebuild_path(&mut self) {
        self.path = RenderPath::for_kind(&self.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn factory_builds_each_drawable_kind() {
        let color = StrokeColor::default();
        for tool in [Tool::Line, Tool::Rectangle, Tool::Triangle, Tool::Ellipse] {
            let shape = Shape::from_drag(0, p(0.0, 0.0), p(10.0, 20.0), tool, color.clone())
                .expect("drawable tool");
            assert_eq!(shape.tool(), tool);
            assert!(shape.path().is_some(), "{tool} must carry a render path");
        }
    }

    #[test]
    fn pencil_starts_with_single_point() {
        let shape =
            Shape::from_drag(3, p(4.0, 5.0), p(4.0, 5.0), Tool::Pencil, StrokeColor::default())
                .unwrap();
        assert_eq!(shape.kind(), &ShapeKind::Pencil { points: vec![p(4.0, 5.0)] });
        assert!(shape.path().is_none());
    }

    #[test]
    fn text_starts_empty() {
        let shape =
            Shape::from_drag(0, p(1.0, 2.0), p(1.0, 2.0), Tool::Text, StrokeColor::default())
                .unwrap();
        let ShapeKind::Text { content, .. } = shape.kind() else {
            panic!("expected text kind");
        };
        assert!(content.is_empty());
    }

    #[test]
    fn triangle_path_has_midpoint_apex() {
        let shape =
            Shape::from_drag(0, p(0.0, 0.0), p(10.0, 8.0), Tool::Triangle, StrokeColor::default())
                .unwrap();
        assert_eq!(
            shape.path(),
            Some(&RenderPath::Polygon(vec![p(0.0, 0.0), p(5.0, 8.0), p(10.0, 0.0)]))
        );
    }

    #[test]
    fn unknown_tool_name_is_rejected() {
        let err =
            Shape::from_tool_name(0, p(0.0, 0.0), p(1.0, 1.0), "circle", StrokeColor::default())
                .unwrap_err();
        assert_eq!(err, UnknownTool("circle".to_string()));
    }

    #[test]
    fn selection_tool_draws_nothing() {
        assert!(
            Shape::from_drag(0, p(0.0, 0.0), p(1.0, 1.0), Tool::Selection, StrokeColor::default())
                .is_err()
        );
    }

    #[test]
    fn apply_coords_regenerates_path() {
        let mut shape =
            Shape::from_drag(0, p(0.0, 0.0), p(10.0, 10.0), Tool::Line, StrokeColor::default())
                .unwrap();
        shape.apply_coords(Coords::new(0.0, 0.0, 30.0, 40.0));
        assert_eq!(
            shape.path(),
            Some(&RenderPath::Segment { start: p(0.0, 0.0), end: p(30.0, 40.0) })
        );
    }

    #[test]
    fn serde_round_trip_rebuilds_path() {
        let shape =
            Shape::from_drag(1, p(0.0, 0.0), p(4.0, 4.0), Tool::Rectangle, StrokeColor::default())
                .unwrap();
        let json = serde_json::to_string(&shape).unwrap();
        let mut back: Shape = serde_json::from_str(&json).unwrap();
        assert!(back.path().is_none());
        back.rebuild_path();
        assert_eq!(back.path(), shape.path());
        assert_eq!(back, shape);
    }

    #[test]
    fn translated_moves_every_pencil_point() {
        let mut shape =
            Shape::from_drag(0, p(0.0, 0.0), p(0.0, 0.0), Tool::Pencil, StrokeColor::default())
                .unwrap();
        shape.push_point(p(2.0, 2.0));
        let moved = shape.translated(5.0, -1.0);
        assert_eq!(
            moved.kind(),
            &ShapeKind::Pencil { points: vec![p(5.0, -1.0), p(7.0, 1.0)] }
        );
    }
}
