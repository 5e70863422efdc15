//! inkboard — geometry and scene-state engine for a freehand whiteboard.
//!
//! The engine covers the algorithmic core of a drawing surface: a typed shape
//! model, hit-testing with handle regions, coordinate normalization, resize
//! resolution, and linear undo/redo over scene snapshots. On top of that sits
//! an editor [`session`](session::Session) that turns pointer gestures into
//! history commits, and a [`raster`] backend that exports a scene as a PNG.
//!
//! Event plumbing, widget chrome, and actual paint belong to the embedding
//! UI; it talks to the engine through canvas-local coordinates and the
//! [`render::Renderer`] collaborator trait.

pub mod geometry;
pub mod history;
pub mod hit;
pub mod raster;
pub mod render;
pub mod scene;
pub mod session;
pub mod shapes;
pub mod transform;

pub use geometry::{Point, Viewport};
pub use history::History;
pub use hit::{CursorIcon, Hit, HitRegion};
pub use render::{RenderOptions, Renderer};
pub use scene::Scene;
pub use session::{Session, StrokeStyle, TextMeasurer};
pub use shapes::{Coords, RenderPath, Shape, ShapeId, ShapeKind, StrokeColor, Tool, UnknownTool};
pub use transform::{normalized_coords, resized_coords};
