//! Coordinate normalization and resize resolution.

use crate::geometry::Point;
use crate::hit::HitRegion;
use crate::shapes::{Coords, Tool};

/// Canonicalize corners after an arbitrary-direction drag.
///
/// Rectangles become top-left/bottom-right; lines keep their endpoints unless
/// the start comes after the end in the `(x, then y)` order, in which case the
/// endpoints swap. Kinds without [`Tool::needs_normalization`] pass through.
pub fn normalized_coords(c: Coords, tool: Tool) -> Coords {
    match tool {
        Tool::Rectangle => Coords::new(
            c.x1.min(c.x2),
            c.y1.min(c.y2),
            c.x1.max(c.x2),
            c.y1.max(c.y2),
        ),
        _ => {
            if c.x1 < c.x2 || (c.x1 == c.x2 && c.y1 < c.y2) {
                c
            } else {
                Coords::new(c.x2, c.y2, c.x1, c.y1)
            }
        }
    }
}

/// Resolve a resize drag: the pointer position plus the grabbed handle yield
/// the new corner pair. Non-handle regions resolve to `None` (not an error:
/// a grab on the body is a move, not a resize).
pub fn resized_coords(pointer: Point, region: HitRegion, c: Coords) -> Option<Coords> {
    match region {
        HitRegion::TopLeft | HitRegion::Start => {
            Some(Coords::new(pointer.x, pointer.y, c.x2, c.y2))
        }
        HitRegion::TopRight => Some(Coords::new(c.x1, pointer.y, pointer.x, c.y2)),
        HitRegion::BottomLeft => Some(Coords::new(pointer.x, c.y1, c.x2, pointer.y)),
        HitRegion::BottomRight | HitRegion::End => {
            Some(Coords::new(c.x1, c.y1, pointer.x, pointer.y))
        }
        HitRegion::Inside => None,
    }
}
