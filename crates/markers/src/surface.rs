use foundation::arena::Arena;
use foundation::bounds::Size;
use foundation::handles::Handle;
use foundation::math::Vec2;

use crate::marker::MarkerId;
use crate::projection::Transform2D;

/// Identity of a visual element on the HUD surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub Handle);

/// Which drawing layer an element lives on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Plain box overlay used by point markers.
    Overlay,
    /// Vector drawing layer used by polygon markers.
    Vector,
}

/// Render state of one marker element, written by the projection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementVisual {
    owner: MarkerId,
    surface: SurfaceKind,
    visible: bool,
    transform: Option<Transform2D>,
    points: Vec<Vec2>,
    measured: Option<Size>,
}

impl ElementVisual {
    pub fn owner(&self) -> &MarkerId {
        &self.owner
    }

    pub fn surface(&self) -> SurfaceKind {
        self.surface
    }

    /// The "visible" visual flag.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Last transform applied to an overlay element.
    pub fn transform(&self) -> Option<Transform2D> {
        self.transform
    }

    /// Vertex list of a vector element, in screen pixels.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Rendered size reported by the host for content-sized elements.
    pub fn measured_size(&self) -> Option<Size> {
        self.measured
    }
}

/// The two drawing layers of the HUD.
///
/// Elements carry an owned back-reference to their marker so pointer hits
/// resolve by identity, without walking any element tree.
#[derive(Debug, Default)]
pub struct HudSurface {
    elements: Arena<ElementVisual>,
}

impl HudSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn attach(&mut self, owner: MarkerId, surface: SurfaceKind) -> ElementId {
        ElementId(self.elements.insert(ElementVisual {
            owner,
            surface,
            visible: false,
            transform: None,
            points: Vec::new(),
            measured: None,
        }))
    }

    pub fn detach(&mut self, element: ElementId) -> Option<ElementVisual> {
        self.elements.remove(element.0)
    }

    pub fn get(&self, element: ElementId) -> Option<&ElementVisual> {
        self.elements.get(element.0)
    }

    pub fn owner(&self, element: ElementId) -> Option<&MarkerId> {
        self.get(element).map(ElementVisual::owner)
    }

    /// Host callback: the element's rendered box changed.
    pub fn report_size(&mut self, element: ElementId, size: Size) {
        if let Some(el) = self.elements.get_mut(element.0) {
            el.measured = Some(size);
        }
    }

    pub fn measured_size(&self, element: ElementId) -> Option<Size> {
        self.get(element).and_then(ElementVisual::measured_size)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &ElementVisual)> + '_ {
        self.elements.iter().map(|(h, el)| (ElementId(h), el))
    }

    pub(crate) fn set_visible(&mut self, element: ElementId, visible: bool) {
        if let Some(el) = self.elements.get_mut(element.0) {
            el.visible = visible;
        }
    }

    pub(crate) fn set_transform(&mut self, element: ElementId, transform: Transform2D) {
        if let Some(el) = self.elements.get_mut(element.0) {
            el.transform = Some(transform);
        }
    }

    pub(crate) fn set_points(&mut self, element: ElementId, points: Vec<Vec2>) {
        if let Some(el) = self.elements.get_mut(element.0) {
            el.points = points;
        }
    }
}
