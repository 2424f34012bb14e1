use std::borrow::Borrow;
use std::str::FromStr;

use foundation::bounds::Size;
use foundation::math::{Spherical, Vec2, Vec3};
use serde::Deserialize;

use crate::surface::ElementId;
use crate::viewer::Viewer;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(String);

impl MarkerId {
    pub fn new(id: impl Into<String>) -> Self {
        MarkerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for MarkerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MarkerId {
    fn from(id: &str) -> Self {
        MarkerId::new(id)
    }
}

/// Anything that names a marker: a raw id or a marker itself.
pub trait AsMarkerId {
    fn marker_id(&self) -> &str;
}

impl AsMarkerId for str {
    fn marker_id(&self) -> &str {
        self
    }
}

impl AsMarkerId for String {
    fn marker_id(&self) -> &str {
        self
    }
}

impl AsMarkerId for MarkerId {
    fn marker_id(&self) -> &str {
        self.as_str()
    }
}

impl AsMarkerId for Marker {
    fn marker_id(&self) -> &str {
        self.id.as_str()
    }
}

/// Which part of the marker box sits on the projected point, as fractions of
/// the box size.
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(try_from = "AnchorRepr")]
pub struct Anchor {
    pub top: f64,
    pub left: f64,
}

impl Anchor {
    pub const CENTER: Anchor = Anchor {
        top: 0.5,
        left: 0.5,
    };

    pub fn new(top: f64, left: f64) -> Result<Self, AnchorParseError> {
        if !(0.0..=1.0).contains(&top) || !(0.0..=1.0).contains(&left) {
            return Err(AnchorParseError(format!("{top} {left}")));
        }
        Ok(Anchor { top, left })
    }

    /// Offset from the anchor point to the top-left corner of a box of `size`.
    pub fn offset(&self, size: Size) -> Vec2 {
        Vec2::new(size.width * self.left, size.height * self.top)
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Anchor::CENTER
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorParseError(pub String);

impl std::fmt::Display for AnchorParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid anchor `{}`", self.0)
    }
}

impl std::error::Error for AnchorParseError {}

/// Accepts CSS-like positions: keywords (`"bottom center"`, `"left"`) in any
/// order, or two percentages in `"<left>% <top>%"` order.
impl FromStr for Anchor {
    type Err = AnchorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AnchorParseError(s.to_string());
        let tokens: Vec<&str> = s.split_whitespace().collect();
        if tokens.is_empty() || tokens.len() > 2 {
            return Err(err());
        }

        if tokens.iter().all(|t| t.ends_with('%')) {
            let mut fractions = Vec::with_capacity(2);
            for t in &tokens {
                let pct: f64 = t.trim_end_matches('%').parse().map_err(|_| err())?;
                fractions.push(pct / 100.0);
            }
            let left = fractions[0];
            let top = *fractions.get(1).unwrap_or(&left);
            return Anchor::new(top, left).map_err(|_| err());
        }

        let mut top: Option<f64> = None;
        let mut left: Option<f64> = None;
        for t in &tokens {
            match t.to_ascii_lowercase().as_str() {
                "top" if top.is_none() => top = Some(0.0),
                "bottom" if top.is_none() => top = Some(1.0),
                "left" if left.is_none() => left = Some(0.0),
                "right" if left.is_none() => left = Some(1.0),
                "center" => {}
                _ => return Err(err()),
            }
        }
        Ok(Anchor {
            top: top.unwrap_or(0.5),
            left: left.unwrap_or(0.5),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnchorRepr {
    Text(String),
    Fractions { top: f64, left: f64 },
}

impl TryFrom<AnchorRepr> for Anchor {
    type Error = AnchorParseError;

    fn try_from(repr: AnchorRepr) -> Result<Self, Self::Error> {
        match repr {
            AnchorRepr::Text(s) => s.parse(),
            AnchorRepr::Fractions { top, left } => Anchor::new(top, left),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipSide {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "TooltipRepr")]
pub struct Tooltip {
    pub content: String,
    pub side: TooltipSide,
}

impl Tooltip {
    pub fn new(content: impl Into<String>) -> Self {
        Tooltip {
            content: content.into(),
            side: TooltipSide::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TooltipRepr {
    Text(String),
    Full {
        content: String,
        #[serde(default)]
        side: TooltipSide,
    },
}

impl From<TooltipRepr> for Tooltip {
    fn from(repr: TooltipRepr) -> Self {
        match repr {
            TooltipRepr::Text(content) => Tooltip::new(content),
            TooltipRepr::Full { content, side } => Tooltip { content, side },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerKind {
    Point {
        position: Spherical,
        position3d: Vec3,
    },
    /// Closed loop; `polygon_rad[i]` and `positions3d[i]` describe the same
    /// vertex.
    Polygon {
        polygon_rad: Vec<Spherical>,
        positions3d: Vec<Vec3>,
    },
}

impl MarkerKind {
    pub fn is_polygon(&self) -> bool {
        matches!(self, MarkerKind::Polygon { .. })
    }

    pub(crate) fn same_variant(&self, other: &MarkerKind) -> bool {
        self.is_polygon() == other.is_polygon()
    }
}

/// Box dimensions taken from the rendering surface instead of the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Measured {
    pub width: bool,
    pub height: bool,
}

impl Measured {
    pub const NONE: Self = Self {
        width: false,
        height: false,
    };

    /// Every dimension the caller left out is measured.
    pub fn undeclared(width: Option<f64>, height: Option<f64>) -> Self {
        Self {
            width: width.is_none(),
            height: height.is_none(),
        }
    }

    pub fn any(self) -> bool {
        self.width || self.height
    }

    /// Declared size with the measured dimensions replaced by `reported`.
    pub fn resolve(self, declared: Size, reported: Size) -> Size {
        Size::new(
            if self.width { reported.width } else { declared.width },
            if self.height { reported.height } else { declared.height },
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub(crate) id: MarkerId,
    pub(crate) kind: MarkerKind,
    pub(crate) anchor: Anchor,
    pub(crate) size: Size,
    pub(crate) measured: Measured,
    pub(crate) visible: bool,
    pub(crate) position2d: Option<Vec2>,
    pub(crate) tooltip: Option<Tooltip>,
    pub(crate) content: Option<String>,
    pub(crate) data: Option<serde_json::Value>,
    pub(crate) element: ElementId,
}

impl Marker {
    pub fn id(&self) -> &MarkerId {
        &self.id
    }

    pub fn kind(&self) -> &MarkerKind {
        &self.kind
    }

    pub fn is_polygon(&self) -> bool {
        self.kind.is_polygon()
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    pub fn is_measured(&self) -> bool {
        self.measured.any()
    }

    pub fn measured(&self) -> Measured {
        self.measured
    }

    /// The user visibility toggle, independent of the view.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Top-left screen position from the last pass, `None` when off-screen.
    pub fn position2d(&self) -> Option<Vec2> {
        self.position2d
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Where `goto` points the camera: the point itself, or the normalized
    /// centroid of a polygon's vertices.
    pub fn center<V: Viewer + ?Sized>(&self, viewer: &V) -> Spherical {
        match &self.kind {
            MarkerKind::Point { position, .. } => *position,
            MarkerKind::Polygon {
                polygon_rad,
                positions3d,
            } => {
                let sum = positions3d.iter().fold(Vec3::ZERO, |acc, v| acc + *v);
                match sum.normalize() {
                    Some(dir) => viewer.vector_to_spherical(dir),
                    None => polygon_rad.first().copied().unwrap_or_default(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Anchor, Tooltip, TooltipSide};

    #[test]
    fn parses_keyword_anchors_in_any_order() {
        let a: Anchor = "bottom center".parse().expect("anchor");
        assert_eq!(a, Anchor { top: 1.0, left: 0.5 });
        let b: Anchor = "center bottom".parse().expect("anchor");
        assert_eq!(a, b);
        let c: Anchor = "right".parse().expect("anchor");
        assert_eq!(c, Anchor { top: 0.5, left: 1.0 });
        let d: Anchor = "center".parse().expect("anchor");
        assert_eq!(d, Anchor::CENTER);
    }

    #[test]
    fn parses_percent_anchors_left_first() {
        let a: Anchor = "25% 100%".parse().expect("anchor");
        assert_eq!(a, Anchor { top: 1.0, left: 0.25 });
    }

    #[test]
    fn rejects_malformed_anchors() {
        assert!("".parse::<Anchor>().is_err());
        assert!("top bottom".parse::<Anchor>().is_err());
        assert!("middle".parse::<Anchor>().is_err());
        assert!("150% 10%".parse::<Anchor>().is_err());
        assert!("top left center".parse::<Anchor>().is_err());
    }

    #[test]
    fn anchor_deserializes_from_text_or_fractions() {
        let a: Anchor = serde_json::from_str("\"top left\"").expect("text");
        assert_eq!(a, Anchor { top: 0.0, left: 0.0 });
        let b: Anchor = serde_json::from_str(r#"{"top": 0.2, "left": 0.8}"#).expect("object");
        assert_eq!(b, Anchor { top: 0.2, left: 0.8 });
        assert!(serde_json::from_str::<Anchor>("\"sideways\"").is_err());
    }

    #[test]
    fn tooltip_deserializes_from_shorthand() {
        let t: Tooltip = serde_json::from_str("\"Entrance\"").expect("text");
        assert_eq!(t, Tooltip::new("Entrance"));
        let full: Tooltip =
            serde_json::from_str(r#"{"content": "Exit", "side": "bottom"}"#).expect("object");
        assert_eq!(full.side, TooltipSide::Bottom);
    }
}
