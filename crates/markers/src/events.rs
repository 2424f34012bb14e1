use runtime::event_bus::EventBus;
use runtime::frame::Frame;

use crate::marker::MarkerId;

/// Notifications raised by the HUD.
#[derive(Debug, Clone, PartialEq)]
pub enum HudEvent {
    SelectMarker {
        marker: MarkerId,
        double_click: bool,
        data: Option<serde_json::Value>,
    },
    UnselectMarker {
        marker: MarkerId,
    },
    OverMarker {
        marker: MarkerId,
    },
    LeaveMarker {
        marker: MarkerId,
    },
}

impl HudEvent {
    /// Wire name of the notification.
    pub fn name(&self) -> &'static str {
        match self {
            HudEvent::SelectMarker { .. } => "select-marker",
            HudEvent::UnselectMarker { .. } => "unselect-marker",
            HudEvent::OverMarker { .. } => "over-marker",
            HudEvent::LeaveMarker { .. } => "leave-marker",
        }
    }

    pub fn marker(&self) -> &MarkerId {
        match self {
            HudEvent::SelectMarker { marker, .. }
            | HudEvent::UnselectMarker { marker }
            | HudEvent::OverMarker { marker }
            | HudEvent::LeaveMarker { marker } => marker,
        }
    }
}

/// Sink for HUD notifications.
pub trait Notifier {
    fn emit(&mut self, frame: Frame, event: HudEvent);
}

impl Notifier for EventBus<HudEvent> {
    fn emit(&mut self, frame: Frame, event: HudEvent) {
        EventBus::emit(self, frame, event);
    }
}
