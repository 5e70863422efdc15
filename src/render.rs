//! Renderer collaborator contract.
//!
//! The engine owns geometry and hands draw calls to a [`Renderer`]; how the
//! paint actually lands (HTML canvas, raster buffer, test recorder) is the
//! collaborator's business. Rendering is side-effect only: nothing flows back
//! into the scene state.

use crate::geometry::Point;
use crate::scene::Scene;
use crate::shapes::{RenderPath, Shape, ShapeKind};

/// Font used for text shapes, top-baseline aligned at the shape's corner.
pub const TEXT_FONT: &str = "24px sans-serif";

/// Per-render options supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderOptions {
    /// Forces every stroke white, regardless of per-shape color.
    pub dark_mode: bool,
    pub stroke_width: f64,
}

/// Draw-call sink implemented by rendering backends.
pub trait Renderer {
    /// Draw a precomputed shape path (line, rectangle, triangle, ellipse).
    fn draw_path(&mut self, path: &RenderPath, color: &str, stroke_width: f64);

    /// Fill and stroke a smoothed pencil outline.
    fn draw_stroke(&mut self, outline: &[Point], color: &str, stroke_width: f64);

    /// Draw text with its top-left at `origin`, in [`TEXT_FONT`].
    fn draw_text(&mut self, origin: Point, content: &str, color: &str);
}

/// Draw one shape through the renderer.
pub fn draw_shape<R: Renderer>(renderer: &mut R, shape: &Shape, opts: RenderOptions) {
    let color = if opts.dark_mode {
        "#ffffff"
    } else {
        shape.color.as_str()
    };
    match shape.kind() {
        ShapeKind::Line { .. }
        | ShapeKind::Rectangle { .. }
        | ShapeKind::Triangle { .. }
        | ShapeKind::Ellipse { .. } => {
            if let Some(path) = shape.path() {
                renderer.draw_path(path, color, opts.stroke_width);
            }
        }
        ShapeKind::Pencil { points } => {
            renderer.draw_stroke(&smooth_stroke(points), color, opts.stroke_width);
        }
        ShapeKind::Text { start, content, .. } => {
            renderer.draw_text(*start, content, color);
        }
    }
}

/// Draw the whole scene in z-order.
pub fn render_scene<R: Renderer>(renderer: &mut R, scene: &Scene, opts: RenderOptions) {
    for shape in scene.iter() {
        draw_shape(renderer, shape, opts);
    }
}

/// Smooth a raw pointer trail into a drawable outline by chaining each point
/// with the midpoint to its successor. Degenerate trails pass through as-is.
pub fn smooth_stroke(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut outline = Vec::with_capacity(points.len() * 2);
    for (i, p) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        outline.push(*p);
        outline.push(Point::new((p.x + next.x) / 2.0, (p.y + next.y) / 2.0));
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{StrokeColor, Tool};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    /// Records draw calls for assertions.
    #[derive(Default)]
    struct Recorder {
        paths: Vec<(RenderPath, String)>,
        strokes: Vec<(usize, String)>,
        texts: Vec<(Point, String, String)>,
    }

    impl Renderer for Recorder {
        fn draw_path(&mut self, path: &RenderPath, color: &str, _w: f64) {
            self.paths.push((path.clone(), color.to_string()));
        }

        fn draw_stroke(&mut self, outline: &[Point], color: &str, _w: f64) {
            self.strokes.push((outline.len(), color.to_string()));
        }

        fn draw_text(&mut self, origin: Point, content: &str, color: &str) {
            self.texts.push((origin, content.to_string(), color.to_string()));
        }
    }

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        scene
            .add_shape(Tool::Rectangle, p(0.0, 0.0), p(10.0, 10.0), StrokeColor::new("#ff0000"))
            .unwrap();
        scene
            .add_shape(Tool::Pencil, p(0.0, 0.0), p(0.0, 0.0), StrokeColor::default())
            .unwrap();
        scene
            .add_shape(Tool::Text, p(5.0, 5.0), p(5.0, 5.0), StrokeColor::default())
            .unwrap();
        scene
    }

    #[test]
    fn scene_renders_in_z_order_with_per_kind_calls() {
        let mut recorder = Recorder::default();
        render_scene(&mut recorder, &sample_scene(), RenderOptions::default());
        assert_eq!(recorder.paths.len(), 1);
        assert_eq!(recorder.strokes.len(), 1);
        assert_eq!(recorder.texts.len(), 1);
        assert_eq!(recorder.paths[0].1, "#ff0000");
        assert_eq!(recorder.texts[0].0, p(5.0, 5.0));
    }

    #[test]
    fn dark_mode_forces_white_strokes() {
        let mut recorder = Recorder::default();
        let opts = RenderOptions {
            dark_mode: true,
            stroke_width: 1.0,
        };
        render_scene(&mut recorder, &sample_scene(), opts);
        assert_eq!(recorder.paths[0].1, "#ffffff");
        assert_eq!(recorder.strokes[0].1, "#ffffff");
        assert_eq!(recorder.texts[0].2, "#ffffff");
    }

    #[test]
    fn smooth_stroke_passes_short_trails_through() {
        let trail = vec![p(0.0, 0.0), p(4.0, 0.0)];
        assert_eq!(smooth_stroke(&trail), trail);
    }

    #[test]
    fn smooth_stroke_interleaves_midpoints() {
        let trail = vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0)];
        let outline = smooth_stroke(&trail);
        assert_eq!(outline.len(), 6);
        assert_eq!(outline[1], p(2.0, 0.0));
        assert_eq!(outline[3], p(4.0, 2.0));
    }
}
