//! Pointer handling: hover tooltips, click selection and screen picking.

use foundation::bounds::{Aabb2, Size};
use foundation::math::Vec2;

use crate::events::{HudEvent, Notifier};
use crate::marker::{Marker, MarkerId};
use crate::registry::MarkersHud;
use crate::surface::ElementId;
use crate::viewer::{PanelSurface, TooltipRequest, TooltipSurface, Viewer};

/// What the pointer is over, as reported by the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    Marker(ElementId),
    /// The open tooltip itself.
    Tooltip,
    Background,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Auxiliary,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Click {
    pub target: PointerTarget,
    pub button: PointerButton,
    pub double: bool,
}

impl Click {
    pub fn primary(target: PointerTarget) -> Self {
        Self {
            target,
            button: PointerButton::Primary,
            double: false,
        }
    }
}

/// How the host should continue with a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    /// Marker to attach to the host's own click notification.
    pub marker: Option<MarkerId>,
    /// `false` when the HUD consumed the click.
    pub propagate: bool,
}

/// Even-odd test of `p` against a closed outline.
fn polygon_contains(points: &[Vec2], p: Vec2) -> bool {
    let mut inside = false;
    let mut j = points.len().wrapping_sub(1);
    for (i, a) in points.iter().enumerate() {
        let b = points[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

impl<V, T, P, N> MarkersHud<V, T, P, N>
where
    V: Viewer,
    T: TooltipSurface,
    P: PanelSurface,
    N: Notifier,
{
    fn owner_of(&self, element: ElementId) -> Option<MarkerId> {
        let id = self.surface.owner(element)?;
        self.markers.contains_key(id).then(|| id.clone())
    }

    fn is_polygon(&self, id: &MarkerId) -> bool {
        self.markers.get(id).is_some_and(Marker::is_polygon)
    }

    fn notify(&mut self, event: HudEvent) {
        self.notifier.emit(self.frame, event);
    }

    /// Pointer entered a marker element. Point markers become the hovered
    /// marker and show their tooltip at their screen position.
    pub fn pointer_enter(&mut self, element: ElementId) {
        let Some(id) = self.owner_of(element) else {
            return;
        };
        let Some(marker) = self.markers.get(&id) else {
            return;
        };
        if marker.is_polygon() {
            return;
        }

        let request = match (marker.tooltip(), marker.position2d()) {
            (Some(tooltip), Some(pos)) => Some(TooltipRequest {
                content: tooltip.content.clone(),
                side: tooltip.side,
                top: pos.y,
                left: pos.x,
                size_hint: marker.size(),
            }),
            _ => None,
        };

        if let Some(old) = self.hovering.replace(id.clone()).filter(|old| *old != id) {
            self.notify(HudEvent::LeaveMarker { marker: old });
        }
        self.notify(HudEvent::OverMarker { marker: id });
        if let Some(request) = request {
            self.tooltip.open(request);
        }
    }

    /// Pointer left a marker element for `related`.
    ///
    /// Moving from a polygon into its own tooltip keeps the hover.
    pub fn pointer_leave(&mut self, element: ElementId, related: PointerTarget) {
        let Some(id) = self.owner_of(element) else {
            return;
        };
        if self.is_polygon(&id) && related == PointerTarget::Tooltip {
            return;
        }
        if self.hovering.as_ref() == Some(&id) {
            self.hovering = None;
            self.notify(HudEvent::LeaveMarker { marker: id });
        }
        self.tooltip.close();
    }

    /// Pointer moved to `pointer` over `target`. Polygon tooltips follow the
    /// pointer.
    pub fn pointer_move(&mut self, target: PointerTarget, pointer: Vec2) {
        let polygon = match target {
            PointerTarget::Marker(element) => {
                self.owner_of(element).filter(|id| self.is_polygon(id))
            }
            PointerTarget::Tooltip => self.hovering.clone().filter(|id| self.is_polygon(id)),
            PointerTarget::Background => None,
        };

        match polygon {
            Some(id) => {
                if self.hovering.as_ref() != Some(&id) {
                    if let Some(old) = self.hovering.replace(id.clone()) {
                        self.notify(HudEvent::LeaveMarker { marker: old });
                    }
                    self.notify(HudEvent::OverMarker { marker: id.clone() });
                }

                let arrow = self.config.tooltip_arrow_size;
                let tooltip = self.markers.get(&id).and_then(|m| m.tooltip()).cloned();
                if let Some(tooltip) = tooltip {
                    self.tooltip.open(TooltipRequest {
                        content: tooltip.content,
                        side: tooltip.side,
                        top: pointer.y - arrow / 2.0,
                        left: pointer.x - arrow,
                        size_hint: Size::new(arrow * 2.0, arrow * 2.0),
                    });
                }
            }
            None => {
                let hovered_polygon = self.hovering.clone().filter(|id| self.is_polygon(id));
                if let Some(old) = hovered_polygon {
                    self.hovering = None;
                    self.notify(HudEvent::LeaveMarker { marker: old });
                    self.tooltip.close();
                }
            }
        }
    }

    /// Handle a click and tell the host whether to propagate it.
    pub fn click(&mut self, click: Click) -> ClickOutcome {
        let mut outcome = ClickOutcome {
            marker: None,
            propagate: true,
        };
        if click.button != PointerButton::Primary {
            return outcome;
        }

        let hit = match click.target {
            PointerTarget::Marker(element) => self.owner_of(element),
            PointerTarget::Tooltip | PointerTarget::Background => None,
        };

        let content = match &hit {
            Some(id) => {
                let (content, data) = match self.markers.get(id) {
                    Some(m) => (m.content().map(str::to_string), m.data().cloned()),
                    None => (None, None),
                };
                self.selection = Some(id.clone());
                self.notify(HudEvent::SelectMarker {
                    marker: id.clone(),
                    double_click: click.double,
                    data,
                });
                if self.config.click_event_on_marker {
                    outcome.marker = Some(id.clone());
                } else {
                    outcome.propagate = false;
                }
                content
            }
            None => {
                if let Some(old) = self.selection.take() {
                    self.notify(HudEvent::UnselectMarker { marker: old });
                }
                None
            }
        };

        match content {
            Some(content) => self.panel.open(&content),
            None => {
                if self.panel.is_open() {
                    self.panel.close();
                    outcome.propagate = false;
                }
            }
        }
        outcome
    }

    /// Topmost visible marker under a screen point.
    ///
    /// Ordering contract:
    /// - Point markers (drawn above polygons) win over polygons.
    /// - Within a layer the marker with the greatest id wins, matching draw
    ///   order.
    pub fn pick(&self, point: Vec2) -> Option<&Marker> {
        let over_point = self
            .markers
            .values()
            .filter(|m| !m.is_polygon())
            .filter(|m| {
                m.position2d()
                    .is_some_and(|pos| Aabb2::from_origin_size(pos, m.size()).contains(point))
            })
            .last();
        if over_point.is_some() {
            return over_point;
        }

        self.markers
            .values()
            .filter(|m| m.is_polygon() && m.position2d().is_some())
            .filter(|m| {
                self.surface
                    .get(m.element())
                    .is_some_and(|el| polygon_contains(el.points(), point))
            })
            .last()
    }

    /// Resolve a screen point to a pointer target.
    pub fn target_at(&self, point: Vec2) -> PointerTarget {
        self.pick(point)
            .map(|m| PointerTarget::Marker(m.element()))
            .unwrap_or(PointerTarget::Background)
    }
}
