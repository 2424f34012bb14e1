use crate::frame::Frame;

/// An emitted event together with the frame it was raised in.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded<E> {
    pub frame_index: u64,
    pub event: E,
}

/// Recording notification bus.
///
/// Events are kept in emission order until drained by the host.
#[derive(Debug)]
pub struct EventBus<E> {
    events: Vec<Recorded<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, event: E) {
        self.events.push(Recorded {
            frame_index: frame.index,
            event,
        });
    }

    pub fn events(&self) -> &[Recorded<E>] {
        &self.events
    }

    pub fn last(&self) -> Option<&E> {
        self.events.last().map(|r| &r.event)
    }

    pub fn drain(&mut self) -> Vec<Recorded<E>> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use crate::frame::Frame;
    use std::time::Duration;

    #[test]
    fn records_events_with_frame_index() {
        let mut bus = EventBus::new();
        let f = Frame::first().advance(Duration::from_millis(16));
        bus.emit(f, "select");
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].frame_index, 1);
        assert_eq!(bus.last(), Some(&"select"));
    }

    #[test]
    fn drain_preserves_order_and_clears() {
        let mut bus = EventBus::new();
        bus.emit(Frame::first(), 1);
        bus.emit(Frame::first(), 2);
        let drained: Vec<i32> = bus.drain().into_iter().map(|r| r.event).collect();
        assert_eq!(drained, vec![1, 2]);
        assert!(bus.events().is_empty());
    }
}
