//! Coordinate-space conversion.
//!
//! Pointer events report viewport (client) coordinates. Notes are positioned
//! relative to a scrollable container, and whiteboard strokes are drawn in
//! canvas-local pixels. Everything here is pure so the drag and stroke math
//! can be tested without a rendering surface.

pub use kurbo::{Point, Rect, Vec2};

/// Live geometry of the scrollable notes container, read from the DOM on
/// every pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerMetrics {
    /// Viewport position of the container's padding box top-left.
    pub origin: Point,
    /// Current scroll offset (`scrollLeft`, `scrollTop`).
    pub scroll: Vec2,
}

impl ContainerMetrics {
    pub fn new(origin: Point, scroll: Vec2) -> Self {
        Self { origin, scroll }
    }

    pub fn to_local(&self, client: Point) -> Point {
        screen_to_local(client, self.origin, self.scroll)
    }

    pub fn to_screen(&self, local: Point) -> Point {
        local_to_screen(local, self.origin, self.scroll)
    }
}

/// Convert a viewport point into the local space of a (possibly scrolled)
/// container whose top-left sits at `container_origin`.
pub fn screen_to_local(pointer: Point, container_origin: Point, scroll: Vec2) -> Point {
    pointer - container_origin.to_vec2() + scroll
}

/// Inverse of [`screen_to_local`].
pub fn local_to_screen(local: Point, container_origin: Point, scroll: Vec2) -> Point {
    local + container_origin.to_vec2() - scroll
}

/// Canvas-local point from a viewport point and the canvas bounding rect.
pub fn canvas_local(pointer: Point, canvas_rect: Rect) -> Point {
    screen_to_local(pointer, canvas_rect.origin(), Vec2::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unscrolled_container_subtracts_origin() {
        let local = screen_to_local(Point::new(150.0, 90.0), Point::new(50.0, 40.0), Vec2::ZERO);
        assert_eq!(local, Point::new(100.0, 50.0));
    }

    #[test]
    fn scroll_offset_moves_into_content() {
        let local = screen_to_local(
            Point::new(150.0, 90.0),
            Point::new(50.0, 40.0),
            Vec2::new(0.0, 300.0),
        );
        assert_eq!(local, Point::new(100.0, 350.0));
    }

    #[test]
    fn local_and_screen_are_inverse() {
        let metrics = ContainerMetrics::new(Point::new(12.0, 64.0), Vec2::new(7.0, 120.0));
        let client = Point::new(333.0, 222.0);
        assert_eq!(metrics.to_screen(metrics.to_local(client)), client);
    }

    #[test]
    fn canvas_local_uses_rect_origin() {
        let rect = Rect::new(10.0, 20.0, 810.0, 620.0);
        assert_eq!(canvas_local(Point::new(15.0, 25.0), rect), Point::new(5.0, 5.0));
    }
}
