//! Engine configuration.
//!
//! These are build-time knobs rather than user settings; user-facing
//! preferences live in [`crate::model::Settings`] and are persisted.

use crate::model::{Color, DEFAULT_NOTE_COLOR};
use kurbo::Size;

/// Configuration for the note board and its drag positioner.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Stacking order applied to a note while it is being dragged.
    pub drag_z_index: i32,

    /// Stacking order a note falls back to after a drag.
    pub rest_z_index: i32,

    /// Delay before the resting stacking order is restored after a drop,
    /// so overlapping notes do not flicker. Default: **100 ms**.
    pub stacking_restore_delay_ms: f64,

    /// New notes spawn at a random spot inside this area (container-local).
    pub spawn_area: Size,

    pub default_color: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            drag_z_index: 1000,
            rest_z_index: 1,
            stacking_restore_delay_ms: 100.0,
            spawn_area: Size::new(900.0, 500.0),
            default_color: DEFAULT_NOTE_COLOR.to_string(),
        }
    }
}

/// Configuration for the whiteboard stroke engine.
#[derive(Debug, Clone)]
pub struct WhiteboardConfig {
    /// Maximum undo snapshots kept. Default: **20**.
    pub history_limit: usize,

    /// Color the eraser paints with.
    pub background: Color,

    pub stroke_color: Color,
    pub line_width: f64,

    /// Text tool font size = line width × this factor.
    pub text_scale: f64,
}

impl Default for WhiteboardConfig {
    fn default() -> Self {
        Self {
            history_limit: 20,
            background: Color::WHITE,
            stroke_color: Color::BLACK,
            line_width: 2.0,
            text_scale: 10.0,
        }
    }
}
