use foundation::bounds::Size;
use foundation::math::Spherical;
use serde::Deserialize;

use crate::error::MarkerError;
use crate::marker::{Anchor, Marker, MarkerId, MarkerKind, Measured, Tooltip};
use crate::surface::ElementId;
use crate::viewer::Viewer;

/// Spherical position in radians as it appears in marker definitions.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
pub struct PositionInput {
    pub longitude: f64,
    pub latitude: f64,
}

impl From<PositionInput> for Spherical {
    fn from(p: PositionInput) -> Self {
        Spherical::new(p.longitude, p.latitude)
    }
}

impl From<Spherical> for PositionInput {
    fn from(s: Spherical) -> Self {
        PositionInput {
            longitude: s.longitude,
            latitude: s.latitude,
        }
    }
}

/// Marker definition, used both to create markers and as a partial update.
///
/// Exactly one of `position` (point marker) or `polygon_rad` (polygon marker,
/// `[longitude, latitude]` pairs in radians) describes the geometry. Point
/// markers without `width`/`height` are sized by the rendering surface.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MarkerProperties {
    pub id: Option<String>,
    pub position: Option<PositionInput>,
    pub polygon_rad: Option<Vec<[f64; 2]>>,
    pub anchor: Option<Anchor>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub visible: Option<bool>,
    pub tooltip: Option<Tooltip>,
    pub content: Option<String>,
    pub data: Option<serde_json::Value>,
}

impl MarkerProperties {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    pub fn point(id: impl Into<String>, position: Spherical) -> Self {
        Self::new(id).with_position(position)
    }

    pub fn polygon(id: impl Into<String>, vertices: &[Spherical]) -> Self {
        Self::new(id).with_polygon(vertices)
    }

    pub fn with_position(mut self, position: Spherical) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_polygon(mut self, vertices: &[Spherical]) -> Self {
        self.polygon_rad = Some(vertices.iter().map(|v| [v.longitude, v.latitude]).collect());
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_tooltip(mut self, tooltip: Tooltip) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub(crate) fn require_id(&self) -> Result<&str, MarkerError> {
        match self.id.as_deref() {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(MarkerError::MissingId),
        }
    }

    /// Geometry described by these properties, if any.
    pub(crate) fn resolve_kind<V: Viewer + ?Sized>(
        &self,
        id: &str,
        viewer: &V,
    ) -> Result<Option<MarkerKind>, MarkerError> {
        let invalid = |reason| MarkerError::InvalidGeometry {
            id: id.to_string(),
            reason,
        };

        match (&self.position, &self.polygon_rad) {
            (Some(_), Some(_)) => Err(invalid("both position and polygon_rad given")),
            (None, None) => Ok(None),
            (Some(p), None) => {
                let position = Spherical::from(*p);
                if !position.longitude.is_finite() || !position.latitude.is_finite() {
                    return Err(invalid("position is not finite"));
                }
                Ok(Some(MarkerKind::Point {
                    position,
                    position3d: viewer.spherical_to_vector(position),
                }))
            }
            (None, Some(raw)) => {
                if raw.len() < 3 {
                    return Err(invalid("polygon needs at least 3 vertices"));
                }
                if raw.iter().flatten().any(|c| !c.is_finite()) {
                    return Err(invalid("polygon vertex is not finite"));
                }
                let polygon_rad: Vec<Spherical> =
                    raw.iter().map(|[lon, lat]| Spherical::new(*lon, *lat)).collect();
                let positions3d = polygon_rad
                    .iter()
                    .map(|p| viewer.spherical_to_vector(*p))
                    .collect();
                Ok(Some(MarkerKind::Polygon {
                    polygon_rad,
                    positions3d,
                }))
            }
        }
    }

    pub(crate) fn build_marker(
        &self,
        id: &str,
        kind: MarkerKind,
        element: ElementId,
    ) -> Marker {
        let measured = if kind.is_polygon() {
            Measured::NONE
        } else {
            Measured::undeclared(self.width, self.height)
        };
        Marker {
            id: MarkerId::new(id),
            kind,
            anchor: self.anchor.unwrap_or_default(),
            size: Size::new(self.width.unwrap_or(0.0), self.height.unwrap_or(0.0)),
            measured,
            visible: self.visible.unwrap_or(true),
            position2d: None,
            tooltip: self.tooltip.clone(),
            content: self.content.clone(),
            data: self.data.clone(),
            element,
        }
    }

    /// Merge the provided fields into `marker`. Geometry has already been
    /// resolved by the caller so this cannot fail.
    ///
    /// A polygon turned into a point starts over from the given size, like a
    /// new marker. On an existing point each declared dimension stops being
    /// measured.
    pub(crate) fn merge_into(&self, marker: &mut Marker, kind: Option<MarkerKind>) {
        if let Some(kind) = kind {
            let became_point = marker.kind.is_polygon() && !kind.is_polygon();
            marker.kind = kind;
            if became_point {
                marker.size = Size::new(self.width.unwrap_or(0.0), self.height.unwrap_or(0.0));
                marker.measured = Measured::undeclared(self.width, self.height);
            }
        }
        if let Some(anchor) = self.anchor {
            marker.anchor = anchor;
        }
        if let Some(width) = self.width {
            marker.size.width = width;
            marker.measured.width = false;
        }
        if let Some(height) = self.height {
            marker.size.height = height;
            marker.measured.height = false;
        }
        if marker.kind.is_polygon() {
            marker.measured = Measured::NONE;
        }
        if let Some(visible) = self.visible {
            marker.visible = visible;
        }
        if let Some(tooltip) = &self.tooltip {
            marker.tooltip = Some(tooltip.clone());
        }
        if let Some(content) = &self.content {
            marker.content = Some(content.clone());
        }
        if let Some(data) = &self.data {
            marker.data = Some(data.clone());
        }
    }
}

/// Parse a JSON array of marker definitions.
pub fn markers_from_json_str(s: &str) -> Result<Vec<MarkerProperties>, serde_json::Error> {
    serde_json::from_str(s)
}

#[cfg(test)]
mod tests {
    use super::{MarkerProperties, markers_from_json_str};
    use crate::camera::SphereCamera;
    use crate::error::MarkerError;
    use crate::marker::{Anchor, MarkerKind, Tooltip};
    use foundation::bounds::Size;
    use foundation::math::Spherical;
    use pretty_assertions::assert_eq;

    fn camera() -> SphereCamera {
        SphereCamera::new(Size::new(800.0, 600.0), 90f64.to_radians())
    }

    #[test]
    fn deserializes_point_and_polygon_definitions() {
        let json = r#"[
            {
                "id": "door",
                "position": {"longitude": 0.5, "latitude": -0.1},
                "anchor": "bottom center",
                "width": 32, "height": 32,
                "tooltip": "Front door",
                "data": {"floor": 1}
            },
            {
                "id": "lawn",
                "polygon_rad": [[0.1, 0.0], [0.3, 0.0], [0.3, -0.2]],
                "tooltip": {"content": "Lawn", "side": "right"},
                "content": "<p>Freshly mown</p>",
                "visible": false
            }
        ]"#;
        let defs = markers_from_json_str(json).expect("parse");
        assert_eq!(defs.len(), 2);

        let expected_door = MarkerProperties::point("door", Spherical::new(0.5, -0.1))
            .with_anchor(Anchor { top: 1.0, left: 0.5 })
            .with_size(32.0, 32.0)
            .with_tooltip(Tooltip::new("Front door"))
            .with_data(serde_json::json!({"floor": 1}));
        assert_eq!(defs[0], expected_door);

        assert_eq!(defs[1].polygon_rad.as_ref().map(Vec::len), Some(3));
        assert_eq!(defs[1].visible, Some(false));
    }

    #[test]
    fn resolve_rejects_ambiguous_or_short_geometry() {
        let cam = camera();
        let both = MarkerProperties::point("x", Spherical::new(0.0, 0.0))
            .with_polygon(&[Spherical::new(0.0, 0.0); 3]);
        assert!(matches!(
            both.resolve_kind("x", &cam),
            Err(MarkerError::InvalidGeometry { .. })
        ));

        let short = MarkerProperties::polygon("y", &[Spherical::new(0.0, 0.0); 2]);
        assert_eq!(
            short.resolve_kind("y", &cam),
            Err(MarkerError::InvalidGeometry {
                id: "y".into(),
                reason: "polygon needs at least 3 vertices",
            })
        );

        assert_eq!(MarkerProperties::new("z").resolve_kind("z", &cam), Ok(None));
    }

    #[test]
    fn resolve_derives_parallel_vectors_for_polygons() {
        let cam = camera();
        let verts = [
            Spherical::new(0.0, 0.0),
            Spherical::new(0.2, 0.0),
            Spherical::new(0.2, 0.2),
        ];
        let kind = MarkerProperties::polygon("p", &verts)
            .resolve_kind("p", &cam)
            .expect("valid")
            .expect("geometry");
        let MarkerKind::Polygon {
            polygon_rad,
            positions3d,
        } = kind
        else {
            panic!("expected polygon");
        };
        assert_eq!(polygon_rad, verts.to_vec());
        assert_eq!(positions3d.len(), polygon_rad.len());
    }

    #[test]
    fn empty_id_is_missing() {
        let props = MarkerProperties {
            id: Some(String::new()),
            ..MarkerProperties::default()
        };
        assert_eq!(props.require_id(), Err(MarkerError::MissingId));
    }
}
