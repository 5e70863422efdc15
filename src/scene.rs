//! The scene: an append-only arena of shapes, insertion order = z-order.
//!
//! Shape ids are indices into the arena. Shapes are never removed one at a
//! time; the arena only grows or is replaced wholesale (clear, undo).

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::hit::{self, Hit};
use crate::shapes::{Coords, Shape, ShapeId, StrokeColor, Tool, UnknownTool};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    shapes: Vec<Shape>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Iterate shapes bottom-to-top.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Append a new shape drawn with `tool`; its id is the next free index.
    pub fn add_shape(
        &mut self,
        tool: Tool,
        start: Point,
        end: Point,
        color: StrokeColor,
    ) -> Result<ShapeId, UnknownTool> {
        let id = self.shapes.len();
        let shape = Shape::from_drag(id, start, end, tool, color)?;
        self.shapes.push(shape);
        Ok(id)
    }

    /// Replace the shape at `id` with an updated version of itself.
    pub fn replace(&mut self, shape: Shape) {
        debug_assert!(shape.id < self.shapes.len());
        let id = shape.id;
        self.shapes[id] = shape;
    }

    /// Update a shape's corner pair, regenerating its render path.
    pub fn update_coords(&mut self, id: ShapeId, c: Coords) {
        if let Some(shape) = self.shapes.get_mut(id) {
            shape.apply_coords(c);
        }
    }

    /// Extend a pencil stroke by one point.
    pub fn append_stroke_point(&mut self, id: ShapeId, p: Point) {
        if let Some(shape) = self.shapes.get_mut(id) {
            shape.push_point(p);
        }
    }

    /// Set a text shape's content and measured box.
    pub fn set_text(&mut self, id: ShapeId, content: &str, c: Coords) {
        if let Some(shape) = self.shapes.get_mut(id) {
            shape.set_text(content, c);
        }
    }

    /// Drop every shape.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Topmost shape under `p`, with the region hit.
    pub fn hit_test(&self, p: Point) -> Option<Hit> {
        hit::shape_at(p, self)
    }

    /// Rebuild every cached render path, e.g. after deserialization.
    pub fn rebuild_paths(&mut self) {
        for shape in &mut self.shapes {
            shape.rebuild_path();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn ids_match_indices() {
        let mut scene = Scene::new();
        for i in 0..4 {
            let id = scene
                .add_shape(Tool::Line, p(0.0, 0.0), p(1.0, 1.0), StrokeColor::default())
                .unwrap();
            assert_eq!(id, i);
        }
        for (idx, shape) in scene.iter().enumerate() {
            assert_eq!(shape.id, idx);
        }
    }

    #[test]
    fn selection_tool_cannot_be_added() {
        let mut scene = Scene::new();
        assert!(
            scene
                .add_shape(Tool::Selection, p(0.0, 0.0), p(1.0, 1.0), StrokeColor::default())
                .is_err()
        );
        assert!(scene.is_empty());
    }

    #[test]
    fn update_coords_regenerates_path() {
        let mut scene = Scene::new();
        let id = scene
            .add_shape(Tool::Rectangle, p(0.0, 0.0), p(10.0, 10.0), StrokeColor::default())
            .unwrap();
        scene.update_coords(id, Coords::new(0.0, 0.0, 20.0, 5.0));
        let c = scene.get(id).unwrap().coords().unwrap();
        assert_eq!(c, Coords::new(0.0, 0.0, 20.0, 5.0));
        assert!(scene.get(id).unwrap().path().is_some());
    }

    #[test]
    fn clear_empties_the_arena() {
        let mut scene = Scene::new();
        scene
            .add_shape(Tool::Pencil, p(0.0, 0.0), p(0.0, 0.0), StrokeColor::default())
            .unwrap();
        scene.clear();
        assert!(scene.is_empty());
    }
}
