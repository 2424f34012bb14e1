use std::collections::BTreeMap;
use std::time::Duration;

use runtime::frame::Frame;
use tracing::{debug, trace};

use crate::config::HudConfig;
use crate::error::MarkerError;
use crate::events::Notifier;
use crate::frustum::FovBounds;
use crate::marker::{AsMarkerId, Marker, MarkerId, MarkerKind};
use crate::projection::{Projection, project_marker};
use crate::properties::MarkerProperties;
use crate::surface::{HudSurface, SurfaceKind};
use crate::viewer::{PanelSurface, TooltipSurface, Viewer};

/// Whether a registry change reprojects immediately.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Render {
    #[default]
    Now,
    /// Leave the screen state stale until the next pass.
    Deferred,
}

fn surface_for(kind: &MarkerKind) -> SurfaceKind {
    if kind.is_polygon() {
        SurfaceKind::Vector
    } else {
        SurfaceKind::Overlay
    }
}

/// Marker registry and per-frame projector.
///
/// Markers iterate in id order. Failed operations leave the registry
/// unchanged.
#[derive(Debug)]
pub struct MarkersHud<V, T, P, N> {
    pub(crate) viewer: V,
    pub(crate) tooltip: T,
    pub(crate) panel: P,
    pub(crate) notifier: N,
    pub(crate) config: HudConfig,
    pub(crate) markers: BTreeMap<MarkerId, Marker>,
    pub(crate) surface: HudSurface,
    pub(crate) hovering: Option<MarkerId>,
    pub(crate) selection: Option<MarkerId>,
    pub(crate) frame: Frame,
}

impl<V, T, P, N> MarkersHud<V, T, P, N>
where
    V: Viewer,
    T: TooltipSurface,
    P: PanelSurface,
    N: Notifier,
{
    pub fn new(viewer: V, tooltip: T, panel: P, notifier: N, config: HudConfig) -> Self {
        Self {
            viewer,
            tooltip,
            panel,
            notifier,
            config,
            markers: BTreeMap::new(),
            surface: HudSurface::new(),
            hovering: None,
            selection: None,
            frame: Frame::first(),
        }
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    /// Camera changes take effect on the next pass.
    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    pub fn tooltip(&self) -> &T {
        &self.tooltip
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn surface(&self) -> &HudSurface {
        &self.surface
    }

    /// Lets the host report rendered element sizes.
    pub fn surface_mut(&mut self) -> &mut HudSurface {
        &mut self.surface
    }

    pub fn config(&self) -> &HudConfig {
        &self.config
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> + '_ {
        self.markers.values()
    }

    pub fn add(&mut self, props: MarkerProperties, render: Render) -> Result<&Marker, MarkerError> {
        let id = props.require_id()?.to_string();
        if self.markers.contains_key(id.as_str()) {
            return Err(MarkerError::DuplicateId(id));
        }
        let kind = props
            .resolve_kind(&id, &self.viewer)?
            .ok_or_else(|| MarkerError::InvalidGeometry {
                id: id.clone(),
                reason: "position or polygon_rad is required",
            })?;

        let element = self.surface.attach(MarkerId::new(id.as_str()), surface_for(&kind));
        let marker = props.build_marker(&id, kind, element);
        debug!(marker = %id, polygon = marker.is_polygon(), "marker added");
        self.markers.insert(marker.id.clone(), marker);

        if render == Render::Now {
            self.update_positions();
        }
        self.marker(&id)
    }

    pub fn get<I: AsMarkerId + ?Sized>(&self, id: &I) -> Result<&Marker, MarkerError> {
        self.marker(id.marker_id())
    }

    fn marker(&self, id: &str) -> Result<&Marker, MarkerError> {
        self.markers
            .get(id)
            .ok_or_else(|| MarkerError::NotFound(id.to_string()))
    }

    fn marker_mut(&mut self, id: &str) -> Result<&mut Marker, MarkerError> {
        self.markers
            .get_mut(id)
            .ok_or_else(|| MarkerError::NotFound(id.to_string()))
    }

    pub fn get_current_selection(&self) -> Option<&Marker> {
        self.selection.as_ref().and_then(|id| self.markers.get(id))
    }

    pub fn hovering(&self) -> Option<&Marker> {
        self.hovering.as_ref().and_then(|id| self.markers.get(id))
    }

    /// Merge `props` into the marker named by `props.id`.
    ///
    /// New geometry replaces the old one; switching between point and polygon
    /// moves the visual element to the other surface.
    pub fn update(&mut self, props: MarkerProperties, render: Render) -> Result<&Marker, MarkerError> {
        let id = props.require_id()?.to_string();
        self.marker(&id)?;
        // Validate before touching the marker.
        let kind = props.resolve_kind(&id, &self.viewer)?;

        let Some(marker) = self.markers.get_mut(id.as_str()) else {
            return Err(MarkerError::NotFound(id));
        };
        let moved = kind.as_ref().filter(|k| !marker.kind.same_variant(k)).map(surface_for);
        props.merge_into(marker, kind);
        if let Some(surface_kind) = moved {
            self.surface.detach(marker.element);
            marker.element = self.surface.attach(marker.id.clone(), surface_kind);
            marker.position2d = None;
        }
        debug!(marker = %id, moved = moved.is_some(), "marker updated");

        if render == Render::Now {
            self.update_positions();
        }
        self.marker(&id)
    }

    pub fn remove<I: AsMarkerId + ?Sized>(&mut self, id: &I, render: Render) -> Result<(), MarkerError> {
        let id = self.get(id)?.id.clone();
        self.detach_marker(&id);
        debug!(marker = %id, "marker removed");

        if render == Render::Now {
            self.update_positions();
        }
        Ok(())
    }

    pub fn clear(&mut self, render: Render) {
        let ids: Vec<MarkerId> = self.markers.keys().cloned().collect();
        for id in &ids {
            self.detach_marker(id);
        }
        debug!(removed = ids.len(), "markers cleared");

        if render == Render::Now {
            self.update_positions();
        }
    }

    /// Drop the marker with its element, and release hover or selection on it.
    fn detach_marker(&mut self, id: &MarkerId) {
        let Some(marker) = self.markers.remove(id) else {
            return;
        };
        self.surface.detach(marker.element);

        if self.hovering.as_ref() == Some(id) {
            self.hovering = None;
            self.tooltip.close();
        }
        if self.selection.as_ref() == Some(id) {
            self.selection = None;
        }
    }

    pub fn hide<I: AsMarkerId + ?Sized>(&mut self, id: &I) -> Result<(), MarkerError> {
        self.set_visible(id.marker_id(), |_| false)
    }

    pub fn show<I: AsMarkerId + ?Sized>(&mut self, id: &I) -> Result<(), MarkerError> {
        self.set_visible(id.marker_id(), |_| true)
    }

    pub fn toggle<I: AsMarkerId + ?Sized>(&mut self, id: &I) -> Result<(), MarkerError> {
        self.set_visible(id.marker_id(), |v| !v)
    }

    fn set_visible(&mut self, id: &str, f: impl FnOnce(bool) -> bool) -> Result<(), MarkerError> {
        let marker = self.marker_mut(id)?;
        marker.visible = f(marker.visible);
        self.update_positions();
        Ok(())
    }

    /// Animate the camera onto the marker.
    pub fn goto<I: AsMarkerId + ?Sized>(&mut self, id: &I, duration: Duration) -> Result<(), MarkerError> {
        let target = self.get(id)?.center(&self.viewer);
        self.viewer.animate_to(target, duration);
        Ok(())
    }

    /// Render tick: advance the frame clock by `dt` and reproject.
    pub fn on_render(&mut self, dt: Duration) {
        self.frame = self.frame.advance(dt);
        self.update_positions();
    }

    /// Recompute every marker's screen state from the current camera.
    pub fn update_positions(&mut self) {
        let bounds = FovBounds::from_viewer(&self.viewer);
        let mut visible = 0usize;

        for marker in self.markers.values_mut() {
            let measured = self.surface.measured_size(marker.element);
            let projection = project_marker(marker, measured, &bounds, &self.viewer);
            if projection.is_visible() {
                visible += 1;
            }
            apply_projection(marker, &mut self.surface, projection);
        }

        trace!(
            frame = self.frame.index,
            markers = self.markers.len(),
            visible,
            "hud positions updated"
        );
    }
}

fn apply_projection(marker: &mut Marker, surface: &mut HudSurface, projection: Projection) {
    let element = marker.element;
    let visible = projection.is_visible();
    marker.position2d = projection.position2d();
    surface.set_visible(element, visible);

    match projection {
        Projection::Point(p) => {
            if marker.measured.any() {
                marker.size = p.size;
            }
            if visible {
                surface.set_transform(element, p.transform);
            }
        }
        Projection::Polygon(p) => {
            if !visible {
                return;
            }
            if let Some(bbox) = p.bbox {
                marker.size = bbox.size();
            }
            surface.set_points(element, p.points);
        }
    }
}
