//! Whiteboard drawing tools.
//!
//! | Tool      | Gesture                                 | Preview          |
//! |-----------|-----------------------------------------|------------------|
//! | Brush     | segment last → current on every move    | cumulative       |
//! | Eraser    | as brush, in the background color       | cumulative       |
//! | Line      | origin → current                        | redrawn per move |
//! | Rectangle | corner at origin, opposite at current   | redrawn per move |
//! | Circle    | center at origin, radius to current     | redrawn per move |
//! | Text      | click opens a text prompt               | none             |

use kurbo::Point;
use pb_core::model::Color;
use pb_render::paint::{self, StrokeStyle};
use pb_render::raster::Raster;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Line,
    Rectangle,
    Circle,
    Text,
}

impl ToolKind {
    /// Map a toolbar `data-tool` name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "brush" => Some(Self::Brush),
            "eraser" => Some(Self::Eraser),
            "line" => Some(Self::Line),
            "rectangle" => Some(Self::Rectangle),
            "circle" => Some(Self::Circle),
            "text" => Some(Self::Text),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Brush => "brush",
            Self::Eraser => "eraser",
            Self::Line => "line",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Text => "text",
        }
    }

    /// Shape tools redraw their preview from the last snapshot on every move.
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Line | Self::Rectangle | Self::Circle)
    }

    /// Paint one pointer move. Shape tools expect the caller to have
    /// restored the base snapshot already. Text paints nothing here.
    pub fn paint(
        &self,
        raster: &mut Raster,
        origin: Point,
        last: Point,
        current: Point,
        style: &StrokeStyle,
        background: Color,
    ) {
        match self {
            Self::Brush => paint::stroke_segment(raster, last, current, style),
            Self::Eraser => {
                let eraser = StrokeStyle::new(background, style.width);
                paint::stroke_segment(raster, last, current, &eraser);
            }
            Self::Line => paint::stroke_segment(raster, origin, current, style),
            Self::Rectangle => paint::stroke_rect(raster, origin, current, style),
            Self::Circle => paint::stroke_circle(raster, origin, origin.distance(current), style),
            Self::Text => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for tool in [
            ToolKind::Brush,
            ToolKind::Eraser,
            ToolKind::Line,
            ToolKind::Rectangle,
            ToolKind::Circle,
            ToolKind::Text,
        ] {
            assert_eq!(ToolKind::from_name(tool.name()), Some(tool));
        }
        assert_eq!(ToolKind::from_name("spray"), None);
    }

    #[test]
    fn only_geometric_tools_are_shapes() {
        assert!(ToolKind::Line.is_shape());
        assert!(ToolKind::Circle.is_shape());
        assert!(!ToolKind::Brush.is_shape());
        assert!(!ToolKind::Text.is_shape());
    }

    #[test]
    fn eraser_paints_background() {
        let mut r = Raster::new(10, 10);
        r.fill(Color::BLACK);
        let style = StrokeStyle::new(Color::BLACK, 4.0);
        let p = Point::new(5.0, 5.0);
        ToolKind::Eraser.paint(&mut r, p, p, Point::new(6.0, 5.0), &style, Color::WHITE);
        assert_eq!(r.pixel(5, 5), Some(Color::WHITE));
    }

    #[test]
    fn circle_radius_follows_pointer_distance() {
        let mut r = Raster::new(40, 40);
        let style = StrokeStyle::new(Color::BLACK, 2.0);
        let o = Point::new(20.0, 20.0);
        ToolKind::Circle.paint(&mut r, o, o, Point::new(26.0, 28.0), &style, Color::WHITE);
        // radius 10
        assert_eq!(r.pixel(29, 19), Some(Color::BLACK));
        assert_eq!(r.pixel(20, 20), Some(Color::TRANSPARENT));
    }
}
