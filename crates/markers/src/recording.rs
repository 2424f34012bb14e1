//! In-memory surfaces that record what the HUD asked them to show.

use runtime::event_bus::EventBus;

use crate::camera::SphereCamera;
use crate::events::HudEvent;
use crate::registry::MarkersHud;
use crate::viewer::{PanelSurface, TooltipRequest, TooltipSurface};

#[derive(Debug, Default)]
pub struct RecordingTooltip {
    current: Option<TooltipRequest>,
    history: Vec<TooltipRequest>,
    closes: usize,
}

impl RecordingTooltip {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tooltip currently shown.
    pub fn current(&self) -> Option<&TooltipRequest> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Every open request, oldest first.
    pub fn history(&self) -> &[TooltipRequest] {
        &self.history
    }

    pub fn closes(&self) -> usize {
        self.closes
    }
}

impl TooltipSurface for RecordingTooltip {
    fn open(&mut self, request: TooltipRequest) {
        self.history.push(request.clone());
        self.current = Some(request);
    }

    fn close(&mut self) {
        self.current = None;
        self.closes += 1;
    }
}

#[derive(Debug, Default)]
pub struct RecordingPanel {
    content: Option<String>,
    opens: usize,
}

impl RecordingPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn opens(&self) -> usize {
        self.opens
    }
}

impl PanelSurface for RecordingPanel {
    fn open(&mut self, content: &str) {
        self.content = Some(content.to_string());
        self.opens += 1;
    }

    fn close(&mut self) {
        self.content = None;
    }

    fn is_open(&self) -> bool {
        self.content.is_some()
    }
}

/// HUD wired to the reference camera and recording surfaces.
pub type RecordingHud = MarkersHud<SphereCamera, RecordingTooltip, RecordingPanel, EventBus<HudEvent>>;

impl RecordingHud {
    pub fn recording(camera: SphereCamera, config: crate::config::HudConfig) -> Self {
        MarkersHud::new(
            camera,
            RecordingTooltip::new(),
            RecordingPanel::new(),
            EventBus::new(),
            config,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordingPanel, RecordingTooltip};
    use crate::marker::TooltipSide;
    use crate::viewer::{PanelSurface, TooltipRequest, TooltipSurface};
    use foundation::bounds::Size;

    #[test]
    fn tooltip_keeps_history_across_close() {
        let mut t = RecordingTooltip::new();
        let req = TooltipRequest {
            content: "hi".into(),
            side: TooltipSide::Top,
            top: 1.0,
            left: 2.0,
            size_hint: Size::new(3.0, 4.0),
        };
        t.open(req.clone());
        assert_eq!(t.current(), Some(&req));
        t.close();
        assert!(!t.is_open());
        assert_eq!(t.history(), &[req]);
        assert_eq!(t.closes(), 1);
    }

    #[test]
    fn panel_tracks_open_state() {
        let mut p = RecordingPanel::new();
        assert!(!p.is_open());
        p.open("<b>x</b>");
        assert_eq!(p.content(), Some("<b>x</b>"));
        p.close();
        assert!(!p.is_open());
        assert_eq!(p.opens(), 1);
    }
}
