//! Raster export: render a scene into an RGBA buffer and save it as PNG.
//!
//! This is the one persistence surface of the engine. Shape paths are plotted
//! as 1..n pixel strokes with Bresenham segments; ellipses are sampled
//! parametrically. Text glyphs need a font stack the engine does not carry,
//! so text shapes are left to the embedding canvas and skipped here.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::geometry::Point;
use crate::render::{self, RenderOptions, Renderer};
use crate::scene::Scene;
use crate::shapes::{RenderPath, ShapeKind};

/// Blank border around the scene content, in canvas units.
const MARGIN: f64 = 20.0;

/// Sampling resolution for ellipse outlines.
const ELLIPSE_SEGMENTS: usize = 64;

const LIGHT_BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const DARK_BACKGROUND: Rgba<u8> = Rgba([18, 18, 18, 255]);

/// An RGBA buffer positioned over a region of the canvas.
pub struct RasterCanvas {
    img: RgbaImage,
    /// Canvas coordinate mapped to pixel (0, 0).
    origin: Point,
    stroke_radius: i64,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32, origin: Point, background: Rgba<u8>) -> Self {
        Self {
            img: RgbaImage::from_pixel(width, height, background),
            origin,
            stroke_radius: 0,
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    fn to_pixel(&self, p: Point) -> (i64, i64) {
        (
            (p.x - self.origin.x).round() as i64,
            (p.y - self.origin.y).round() as i64,
        )
    }

    fn plot(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        let r = self.stroke_radius;
        for py in (y - r)..=(y + r) {
            for px in (x - r)..=(x + r) {
                if px >= 0 && py >= 0 && (px as u32) < self.img.width() && (py as u32) < self.img.height() {
                    self.img.put_pixel(px as u32, py as u32, color);
                }
            }
        }
    }

    /// Plot a segment with Bresenham's algorithm.
    fn line(&mut self, from: Point, to: Point, color: Rgba<u8>) {
        let (x0, y0) = self.to_pixel(from);
        let (x1, y1) = self.to_pixel(to);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;
        loop {
            self.plot(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn polyline(&mut self, points: &[Point], color: Rgba<u8>, close: bool) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], color);
        }
        if close && points.len() > 2 {
            self.line(points[points.len() - 1], points[0], color);
        }
    }

    fn set_stroke_width(&mut self, width: f64) {
        self.stroke_radius = ((width.max(1.0) - 1.0) / 2.0).round() as i64;
    }
}

impl Renderer for RasterCanvas {
    fn draw_path(&mut self, path: &RenderPath, color: &str, stroke_width: f64) {
        let color = parse_css_color(color);
        self.set_stroke_width(stroke_width);
        match path {
            RenderPath::Segment { start, end } => self.line(*start, *end, color),
            RenderPath::Rect { origin, width, height } => {
                let corners = [
                    *origin,
                    Point::new(origin.x + width, origin.y),
                    Point::new(origin.x + width, origin.y + height),
                    Point::new(origin.x, origin.y + height),
                ];
                self.polyline(&corners, color, true);
            }
            RenderPath::Polygon(points) => self.polyline(points, color, true),
            RenderPath::Ellipse { center, width, height } => {
                let rx = width / 2.0;
                let ry = height / 2.0;
                let samples: Vec<Point> = (0..=ELLIPSE_SEGMENTS)
                    .map(|i| {
                        let t = i as f64 / ELLIPSE_SEGMENTS as f64 * std::f64::consts::TAU;
                        Point::new(center.x + rx * t.cos(), center.y + ry * t.sin())
                    })
                    .collect();
                self.polyline(&samples, color, false);
            }
        }
    }

    fn draw_stroke(&mut self, outline: &[Point], color: &str, stroke_width: f64) {
        let color = parse_css_color(color);
        self.set_stroke_width(stroke_width);
        if outline.len() == 1 {
            let (x, y) = self.to_pixel(outline[0]);
            self.plot(x, y, color);
        } else {
            self.polyline(outline, color, false);
        }
    }

    fn draw_text(&mut self, _origin: Point, _content: &str, _color: &str) {
        // Glyph rasterization stays with the embedding canvas.
    }
}

/// Bounding box of every shape in the scene, in canvas coordinates.
/// `None` for an empty scene.
pub fn scene_bounds(scene: &Scene) -> Option<(Point, Point)> {
    let mut min = Point::new(f64::MAX, f64::MAX);
    let mut max = Point::new(f64::MIN, f64::MIN);
    let mut any = false;

    let mut extend = |p: Point| {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    };

    for shape in scene.iter() {
        match shape.kind() {
            ShapeKind::Pencil { points } => {
                for p in points {
                    extend(*p);
                    any = true;
                }
            }
            _ => {
                if let Some(c) = shape.coords() {
                    // Corners may be unnormalized; take both.
                    extend(c.start());
                    extend(c.end());
                    any = true;
                }
            }
        }
    }

    any.then_some((min, max))
}

/// Render the scene into an image with a margin around its content.
/// `None` for an empty scene.
pub fn render_to_image(scene: &Scene, opts: RenderOptions) -> Option<RgbaImage> {
    let (min, max) = scene_bounds(scene)?;
    let width = (max.x - min.x + 2.0 * MARGIN).ceil() as u32;
    let height = (max.y - min.y + 2.0 * MARGIN).ceil() as u32;
    let origin = Point::new(min.x - MARGIN, min.y - MARGIN);
    let background = if opts.dark_mode {
        DARK_BACKGROUND
    } else {
        LIGHT_BACKGROUND
    };

    let mut canvas = RasterCanvas::new(width, height, origin, background);
    render::render_scene(&mut canvas, scene, opts);
    Some(canvas.into_image())
}

/// Render the scene and save it as a PNG file.
pub fn export_png(scene: &Scene, opts: RenderOptions, path: &Path) -> Result<()> {
    let img = render_to_image(scene, opts).context("nothing to export: scene is empty")?;
    debug!(path = %path.display(), width = img.width(), height = img.height(), "export png");
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Parse a `#rrggbb` CSS color. Anything unparseable falls back to black.
fn parse_css_color(css: &str) -> Rgba<u8> {
    let hex = css.strip_prefix('#').unwrap_or(css);
    if hex.len() == 6 {
        if let (Ok(r), Ok(g), Ok(b)) = (
            u8::from_str_radix(&hex[0..2], 16),
            u8::from_str_radix(&hex[2..4], 16),
            u8::from_str_radix(&hex[4..6], 16),
        ) {
            return Rgba([r, g, b, 255]);
        }
    }
    Rgba([0, 0, 0, 255])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{StrokeColor, Tool};

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn color_parsing() {
        assert_eq!(parse_css_color("#ff0080"), Rgba([255, 0, 128, 255]));
        assert_eq!(parse_css_color("ffffff"), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_css_color("not-a-color"), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn bounds_cover_strokes_and_corners() {
        let mut scene = Scene::new();
        scene
            .add_shape(Tool::Rectangle, p(50.0, 10.0), p(10.0, 50.0), StrokeColor::default())
            .unwrap();
        let id = scene
            .add_shape(Tool::Pencil, p(-5.0, 0.0), p(0.0, 0.0), StrokeColor::default())
            .unwrap();
        scene.append_stroke_point(id, p(100.0, 70.0));

        let (min, max) = scene_bounds(&scene).unwrap();
        assert_eq!(min, p(-5.0, 0.0));
        assert_eq!(max, p(100.0, 70.0));
    }

    #[test]
    fn empty_scene_has_no_image() {
        assert!(render_to_image(&Scene::new(), RenderOptions::default()).is_none());
    }

    #[test]
    fn rectangle_outline_lands_on_pixels() {
        let mut scene = Scene::new();
        scene
            .add_shape(Tool::Rectangle, p(0.0, 0.0), p(10.0, 10.0), StrokeColor::new("#ff0000"))
            .unwrap();
        let opts = RenderOptions {
            dark_mode: false,
            stroke_width: 1.0,
        };
        let img = render_to_image(&scene, opts).unwrap();
        assert_eq!(img.width(), 50);
        assert_eq!(img.height(), 50);
        // Top-left corner of the rectangle sits one margin in.
        assert_eq!(img.get_pixel(20, 20), &Rgba([255, 0, 0, 255]));
        // The interior stays background.
        assert_eq!(img.get_pixel(25, 25), &LIGHT_BACKGROUND);
    }

    #[test]
    fn stroke_width_thickens_the_line() {
        let mut scene = Scene::new();
        scene
            .add_shape(Tool::Line, p(0.0, 0.0), p(10.0, 0.0), StrokeColor::default())
            .unwrap();
        let opts = RenderOptions {
            dark_mode: false,
            stroke_width: 5.0,
        };
        let img = render_to_image(&scene, opts).unwrap();
        // Two pixels above the line center are still painted at width 5.
        assert_eq!(img.get_pixel(25, 18), &Rgba([0, 0, 0, 255]));
    }
}
