use foundation::bounds::{Aabb2, Size};
use foundation::math::{Vec2, Vec3};

use crate::clipping::clip_polygon;
use crate::frustum::FovBounds;
use crate::marker::{Anchor, Marker, MarkerKind};
use crate::viewer::Viewer;

/// 2D transform of an overlay element: translate to the top-left corner, then
/// rotate around the anchor point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform2D {
    pub translate: Vec2,
    pub rotate_deg: f64,
    pub origin: Anchor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointProjection {
    pub visible: bool,
    pub top_left: Vec2,
    /// Size used for the visibility test (measured or declared).
    pub size: Size,
    pub transform: Transform2D,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonProjection {
    pub visible: bool,
    /// Clipped outline in screen pixels, in input order.
    pub points: Vec<Vec2>,
    pub bbox: Option<Aabb2>,
    /// How many points lie on the window boundary.
    pub synthesized: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Point(PointProjection),
    Polygon(PolygonProjection),
}

impl Projection {
    pub fn is_visible(&self) -> bool {
        match self {
            Projection::Point(p) => p.visible,
            Projection::Polygon(p) => p.visible,
        }
    }

    /// Top-left screen position, `None` when not visible.
    pub fn position2d(&self) -> Option<Vec2> {
        match self {
            Projection::Point(p) if p.visible => Some(p.top_left),
            Projection::Polygon(p) if p.visible => p.bbox.map(|b| b.min),
            _ => None,
        }
    }
}

/// Point visibility: the user flag, facing the camera, and overlapping the
/// viewport once the marker box is placed at `top_left`.
pub fn is_point_visible(
    visible_flag: bool,
    position3d: Vec3,
    top_left: Vec2,
    size: Size,
    bounds: &FovBounds,
) -> bool {
    visible_flag
        && position3d.dot(bounds.view_direction) > 0.0
        && Aabb2::from_origin_size(top_left, size).intersects(&bounds.viewport_box())
}

/// Project one marker for the frame described by `bounds`.
///
/// `measured` is the element size reported by the rendering surface; it
/// replaces the undeclared dimensions of point markers.
pub fn project_marker<V: Viewer + ?Sized>(
    marker: &Marker,
    measured: Option<Size>,
    bounds: &FovBounds,
    viewer: &V,
) -> Projection {
    match &marker.kind {
        MarkerKind::Point { position3d, .. } => {
            let size = match measured {
                Some(reported) => marker.measured.resolve(marker.size, reported),
                None => marker.size,
            };
            let top_left = viewer.project_to_screen(*position3d) - marker.anchor.offset(size);
            Projection::Point(PointProjection {
                visible: is_point_visible(marker.visible, *position3d, top_left, size, bounds),
                top_left,
                size,
                transform: Transform2D {
                    translate: top_left,
                    rotate_deg: bounds.roll_degrees,
                    origin: marker.anchor,
                },
            })
        }
        MarkerKind::Polygon {
            polygon_rad,
            positions3d,
        } => {
            let clipped = clip_polygon(positions3d, polygon_rad, bounds);
            let points: Vec<Vec2> = clipped
                .iter()
                .map(|c| viewer.project_to_screen(c.position))
                .collect();
            let bbox = Aabb2::from_points(&points);
            Projection::Polygon(PolygonProjection {
                visible: marker.visible && !points.is_empty() && bbox.is_some(),
                synthesized: clipped.iter().filter(|c| c.synthesized).count(),
                points,
                bbox,
            })
        }
    }
}
