//! Input abstraction layer.
//!
//! Mouse, touch and pen events are adapted into one `PointerInput` before
//! they reach the positioner or the whiteboard, so both engines run the same
//! coordinate math regardless of device.

use kurbo::Point;
use std::cell::Cell;

/// Which device produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    /// Map a DOM `PointerEvent.pointerType`.
    pub fn from_pointer_type(name: &str) -> Self {
        match name {
            "touch" => Self::Touch,
            "pen" => Self::Pen,
            _ => Self::Mouse,
        }
    }
}

/// A normalized pointer sample in viewport (client) coordinates.
#[derive(Debug, Clone)]
pub struct PointerInput {
    pub client: Point,
    pub kind: PointerKind,
    /// Event timestamp in milliseconds (`Event.timeStamp`).
    pub timestamp_ms: f64,
    scroll_prevented: Cell<bool>,
}

impl PointerInput {
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            client: Point::new(x, y),
            kind,
            timestamp_ms: 0.0,
            scroll_prevented: Cell::new(false),
        }
    }

    pub fn mouse(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Mouse, x, y)
    }

    pub fn touch(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Touch, x, y)
    }

    /// Adapt a touch list: the first touch point drives the gesture.
    pub fn from_touches(touches: &[(f64, f64)]) -> Option<Self> {
        touches.first().map(|&(x, y)| Self::touch(x, y))
    }

    pub fn at_time(mut self, timestamp_ms: f64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// Ask the host to suppress the default action (page scroll) for this
    /// event. The bridge checks [`Self::scroll_prevented`] after dispatch.
    pub fn prevent_scroll(&self) {
        self.scroll_prevented.set(true);
    }

    pub fn scroll_prevented(&self) -> bool {
        self.scroll_prevented.get()
    }

    pub fn is_touch(&self) -> bool {
        self.kind == PointerKind::Touch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_touch_drives_gesture() {
        let input = PointerInput::from_touches(&[(10.0, 20.0), (99.0, 99.0)]).unwrap();
        assert_eq!(input.client, Point::new(10.0, 20.0));
        assert!(input.is_touch());
        assert!(PointerInput::from_touches(&[]).is_none());
    }

    #[test]
    fn prevent_scroll_is_sticky() {
        let input = PointerInput::mouse(0.0, 0.0);
        assert!(!input.scroll_prevented());
        input.prevent_scroll();
        assert!(input.scroll_prevented());
    }

    #[test]
    fn pointer_type_names() {
        assert_eq!(PointerKind::from_pointer_type("touch"), PointerKind::Touch);
        assert_eq!(PointerKind::from_pointer_type("pen"), PointerKind::Pen);
        assert_eq!(PointerKind::from_pointer_type("mouse"), PointerKind::Mouse);
    }
}
