//! Editor session: pointer gestures in, scene edits and history commits out.
//!
//! The session owns the history and the per-gesture state. Callers translate
//! raw input into canvas-local coordinates (via [`Viewport::to_canvas`]) and
//! drive the begin/update/finish methods; the session never reads ambient
//! state beyond what it was explicitly given.
//!
//! History policy: a gesture's begin commits exactly one new entry; every
//! subsequent move overwrites it; finish leaves the final overwrite standing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{Point, Viewport};
use crate::history::History;
use crate::hit::{self, CursorIcon, HitRegion};
use crate::scene::Scene;
use crate::shapes::{Coords, ShapeId, ShapeKind, StrokeColor, Tool, UnknownTool};
use crate::transform::{normalized_coords, resized_coords};

/// Fixed text line height, matching the renderer's 24px sans-serif font.
pub const TEXT_LINE_HEIGHT: f64 = 24.0;

/// Measures rendered text width. Implemented by the embedding UI over its
/// canvas context; the engine cannot rasterize fonts itself.
pub trait TextMeasurer {
    fn text_width(&self, content: &str) -> f64;
}

/// Stroke configuration stamped onto newly drawn shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: StrokeColor,
    pub width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: StrokeColor::default(),
            width: 1.0,
        }
    }
}

/// In-progress draw gesture. `anchor` is the corner fixed at pointer-down.
#[derive(Debug, Clone, Copy)]
struct DrawState {
    id: ShapeId,
    anchor: Point,
}

/// How a shape was grabbed for moving.
#[derive(Debug, Clone)]
enum Grab {
    /// Pointer offset to every stroke point at grab time, so the whole
    /// polyline follows the pointer rigidly.
    Stroke { offsets: Vec<Point> },
    /// Pointer offset to the shape's first corner; size is preserved.
    Corner { offset: Point },
}

/// In-progress move gesture.
#[derive(Debug, Clone)]
struct MoveState {
    id: ShapeId,
    grab: Grab,
    origin: Point,
}

/// In-progress resize gesture.
#[derive(Debug, Clone, Copy)]
struct ResizeState {
    id: ShapeId,
    region: HitRegion,
}

/// In-progress pan gesture.
#[derive(Debug, Clone, Copy)]
struct PanState {
    start: Point,
}

/// A text shape currently being written into.
#[derive(Debug, Clone, Copy)]
struct WritingState {
    id: ShapeId,
}

/// The whiteboard editor state machine.
pub struct Session {
    history: History,
    pub tool: Tool,
    pub stroke: StrokeStyle,
    pub viewport: Viewport,
    draw_state: Option<DrawState>,
    move_state: Option<MoveState>,
    resize_state: Option<ResizeState>,
    pan_state: Option<PanState>,
    writing: Option<WritingState>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            history: History::default(),
            tool: Tool::Pencil,
            stroke: StrokeStyle::default(),
            viewport: Viewport::new(),
            draw_state: None,
            move_state: None,
            resize_state: None,
            pan_state: None,
            writing: None,
        }
    }

    /// The current scene (the active history snapshot).
    pub fn scene(&self) -> &Scene {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn undo(&mut self) {
        self.history.undo();
    }

    pub fn redo(&mut self) {
        self.history.redo();
    }

    /// Wipe the board. Undoable like any other commit.
    pub fn clear(&mut self) {
        self.history.commit(Scene::new());
    }

    /// Cursor the UI should show for a hover at `pos`.
    pub fn cursor_hint(&self, pos: Point) -> CursorIcon {
        if self.tool == Tool::Selection {
            hit::cursor_at(pos, self.scene())
        } else {
            CursorIcon::Crosshair
        }
    }

    // --- draw gesture -----------------------------------------------------

    /// Begin drawing with the active tool. Creates the shape and the
    /// gesture's single history entry. The text tool enters writing mode
    /// instead of dragging.
    pub fn begin_draw(&mut self, pos: Point) -> Result<ShapeId, UnknownTool> {
        let mut scene = self.scene().clone();
        let id = scene.add_shape(self.tool, pos, pos, self.stroke.color.clone())?;
        self.history.commit(scene);
        if self.tool == Tool::Text {
            self.writing = Some(WritingState { id });
        } else {
            self.draw_state = Some(DrawState { id, anchor: pos });
        }
        debug!(tool = %self.tool, id, "begin draw");
        Ok(id)
    }

    /// Extend the in-progress shape to the pointer. Pencil strokes grow;
    /// every other kind is rebuilt from its anchored corner.
    pub fn update_draw(&mut self, pos: Point) {
        let Some(state) = self.draw_state else { return };
        let mut scene = self.scene().clone();
        // Dispatch on the shape being drawn, not the active tool: a tool
        // switch mid-gesture must not corrupt the gesture.
        let is_stroke = scene
            .get(state.id)
            .is_some_and(|s| matches!(s.kind(), ShapeKind::Pencil { .. }));
        if is_stroke {
            scene.append_stroke_point(state.id, pos);
        } else {
            scene.update_coords(state.id, Coords::from_points(state.anchor, pos));
        }
        self.history.overwrite(scene);
    }

    /// Finish the draw gesture, canonicalizing corners where required.
    pub fn finish_draw(&mut self) {
        if let Some(state) = self.draw_state.take() {
            self.normalize_shape(state.id);
        }
    }

    /// Abandon the draw gesture. The last overwritten snapshot stands.
    pub fn cancel_draw(&mut self) {
        self.draw_state = None;
    }

    // --- select gesture ---------------------------------------------------

    /// Begin a selection gesture at `pos`. A hit on a shape body starts a
    /// move, a hit on a handle starts a resize. Returns false on empty space.
    pub fn begin_select(&mut self, pos: Point) -> bool {
        let Some(hit) = self.scene().hit_test(pos) else {
            return false;
        };
        // Duplicate the active snapshot so the pre-gesture state survives the
        // overwrites that follow.
        self.history.commit(self.scene().clone());

        let Some(shape) = self.scene().get(hit.id) else {
            return false;
        };
        match hit.region {
            HitRegion::Inside => {
                let grab = match shape.kind() {
                    ShapeKind::Pencil { points } => Grab::Stroke {
                        offsets: points
                            .iter()
                            .map(|pt| Point::new(pos.x - pt.x, pos.y - pt.y))
                            .collect(),
                    },
                    _ => {
                        let c = shape.coords().unwrap_or_default();
                        Grab::Corner {
                            offset: Point::new(pos.x - c.x1, pos.y - c.y1),
                        }
                    }
                };
                self.move_state = Some(MoveState {
                    id: hit.id,
                    grab,
                    origin: pos,
                });
            }
            region => {
                self.resize_state = Some(ResizeState { id: hit.id, region });
            }
        }
        debug!(id = hit.id, region = ?hit.region, "begin select");
        true
    }

    /// Route a pointer move to whichever select sub-gesture is active.
    pub fn update_select(&mut self, pos: Point) {
        if self.move_state.is_some() {
            self.update_move(pos);
        } else if self.resize_state.is_some() {
            self.update_resize(pos);
        }
    }

    fn update_move(&mut self, pos: Point) {
        let Some(state) = self.move_state.clone() else {
            return;
        };
        let mut scene = self.scene().clone();
        let Some(shape) = scene.get(state.id) else {
            return;
        };
        match &state.grab {
            Grab::Stroke { offsets } => {
                let moved: Vec<Point> = offsets
                    .iter()
                    .map(|o| Point::new(pos.x - o.x, pos.y - o.y))
                    .collect();
                let mut updated = shape.clone();
                updated.set_kind(ShapeKind::Pencil { points: moved });
                scene.replace(updated);
            }
            Grab::Corner { offset } => {
                let Some(c) = shape.coords() else { return };
                let (w, h) = (c.width(), c.height());
                let nx = pos.x - offset.x;
                let ny = pos.y - offset.y;
                scene.update_coords(state.id, Coords::new(nx, ny, nx + w, ny + h));
            }
        }
        self.history.overwrite(scene);
    }

    fn update_resize(&mut self, pos: Point) {
        let Some(state) = self.resize_state else {
            return;
        };
        let Some(c) = self.scene().get(state.id).and_then(|s| s.coords()) else {
            return;
        };
        // Corner regions are labelled against the normalized box; resolve the
        // resize against the same box so the grabbed corner is the one that
        // follows the pointer.
        let c = match state.region {
            HitRegion::Start | HitRegion::End => c,
            _ => c.normalized(),
        };
        if let Some(resized) = resized_coords(pos, state.region, c) {
            let mut scene = self.scene().clone();
            scene.update_coords(state.id, resized);
            self.history.overwrite(scene);
        }
    }

    /// Finish the selection gesture. A click on a text shape that never moved
    /// re-enters writing mode instead.
    pub fn finish_select(&mut self, pos: Point) {
        if let Some(state) = self.move_state.take() {
            let is_text = self
                .scene()
                .get(state.id)
                .is_some_and(|s| matches!(s.kind(), ShapeKind::Text { .. }));
            if is_text && pos == state.origin {
                self.writing = Some(WritingState { id: state.id });
                return;
            }
        }
        if let Some(state) = self.resize_state.take() {
            self.normalize_shape(state.id);
        }
    }

    // --- text gesture -----------------------------------------------------

    pub fn is_writing(&self) -> bool {
        self.writing.is_some()
    }

    /// Finish text entry: the content is stored with its measured box, top
    /// edge at the shape's original corner.
    pub fn commit_text(&mut self, content: &str, measurer: &dyn TextMeasurer) {
        let Some(state) = self.writing.take() else {
            return;
        };
        let Some(c) = self.scene().get(state.id).and_then(|s| s.coords()) else {
            return;
        };
        let width = measurer.text_width(content);
        let mut scene = self.scene().clone();
        scene.set_text(
            state.id,
            content,
            Coords::new(c.x1, c.y1, c.x1 + width, c.y1 + TEXT_LINE_HEIGHT),
        );
        self.history.overwrite(scene);
    }

    // --- pan gesture ------------------------------------------------------

    pub fn begin_pan(&mut self, pos: Point) {
        self.pan_state = Some(PanState { start: pos });
    }

    pub fn update_pan(&mut self, pos: Point) {
        if let Some(state) = self.pan_state {
            self.viewport.pan(pos.x - state.start.x, pos.y - state.start.y);
        }
    }

    pub fn end_pan(&mut self) {
        self.pan_state = None;
    }

    // ----------------------------------------------------------------------

    /// Canonicalize a shape's corners after a draw or resize, if its kind
    /// requires it.
    fn normalize_shape(&mut self, id: ShapeId) {
        let Some(shape) = self.scene().get(id) else {
            return;
        };
        let tool = shape.tool();
        if !tool.needs_normalization() {
            return;
        }
        let Some(c) = shape.coords() else { return };
        let mut scene = self.scene().clone();
        scene.update_coords(id, normalized_coords(c, tool));
        self.history.overwrite(scene);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
