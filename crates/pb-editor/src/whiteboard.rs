//! Whiteboard stroke engine.
//!
//! One pointer gesture at a time is rasterized into a [`Raster`] according to
//! the selected [`ToolKind`]. Each completed gesture commits a full snapshot
//! to a bounded [`SnapshotStack`], which is persisted as PNG data URLs under
//! the `whiteboardState` key. The stack is never empty: clearing commits a
//! blank snapshot.
//!
//! The text tool does not draw on pointer-down. It moves the engine into
//! [`StrokeState::AwaitingTextInput`] and the host answers with
//! [`Whiteboard::submit_text`], or the prompt is resolved in place through
//! [`Whiteboard::begin_stroke_with_prompt`].

use crate::board::NoteBoard;
use crate::history::{Snapshot, SnapshotStack};
use crate::input::PointerInput;
use crate::tools::ToolKind;
use chrono::{DateTime, Utc};
use kurbo::{Point, Rect};
use pb_core::config::WhiteboardConfig;
use pb_core::css::parse_color;
use pb_core::geometry::canvas_local;
use pb_core::id::NoteId;
use pb_core::model::{Color, NoteDraft};
use pb_core::storage::{KeyValueStore, Persistence, keys};
use pb_render::image::{ImageError, to_data_url};
use pb_render::paint::{StrokeStyle, fill_text};
use pb_render::raster::Raster;

pub const TEXT_PROMPT: &str = "Enter text:";

const DRAWING_NOTE_TITLE: &str = "Whiteboard Drawing";
const DRAWING_NOTE_CATEGORY: &str = "ideas";
const DRAWING_NOTE_COLOR: &str = "#ffffff";

/// Host-side text entry (a `prompt()` dialog in the browser).
pub trait TextPrompt {
    fn request_text(&mut self, message: &str) -> Option<String>;
}

impl<F: FnMut(&str) -> Option<String>> TextPrompt for F {
    fn request_text(&mut self, message: &str) -> Option<String> {
        self(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    Drawing {
        tool: ToolKind,
        origin: Point,
        last: Point,
    },
    AwaitingTextInput {
        origin: Point,
    },
}

/// Result of a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeOutcome {
    Started,
    /// The text tool wants a string to draw at `origin`.
    NeedsText { origin: Point },
    /// Text was drawn and committed.
    Committed,
    /// Text prompt was cancelled or left empty.
    Ignored,
}

pub struct Whiteboard<S> {
    raster: Raster,
    history: SnapshotStack,
    tool: ToolKind,
    style: StrokeStyle,
    state: StrokeState,
    canvas_rect: Rect,
    config: WhiteboardConfig,
    persistence: Persistence<S>,
}

impl<S: KeyValueStore> Whiteboard<S> {
    /// Create a `width × height` board and restore the persisted history.
    /// A missing, empty or undecodable history starts from one blank
    /// snapshot.
    pub fn new(width: u32, height: u32, store: S, config: WhiteboardConfig) -> Self {
        let persistence = Persistence::new(store);
        let stored: Vec<String> = persistence.load(keys::WHITEBOARD, Vec::new());
        let restored = match SnapshotStack::from_data_urls(&stored, config.history_limit) {
            Ok(stack) => stack,
            Err(e) => {
                log::error!("Error restoring whiteboard: {e}");
                SnapshotStack::new(config.history_limit)
            }
        };

        let mut wb = Self {
            raster: Raster::new(width, height),
            history: restored,
            tool: ToolKind::default(),
            style: StrokeStyle::new(config.stroke_color, config.line_width),
            state: StrokeState::Idle,
            canvas_rect: Rect::new(0.0, 0.0, f64::from(width), f64::from(height)),
            config,
            persistence,
        };

        match wb.history.top() {
            Some(top) => {
                wb.raster.draw_image(top.raster());
                log::debug!("restored {} whiteboard snapshots", wb.history.len());
            }
            None => wb.clear(),
        }
        wb
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn history(&self) -> &SnapshotStack {
        &self.history
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    // ─── Setup ───────────────────────────────────────────────────────────

    /// Viewport rectangle of the canvas element (`getBoundingClientRect()`).
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    /// Takes effect from the next gesture.
    pub fn select_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
    }

    pub fn set_color(&mut self, color: Color) {
        self.style.color = color;
    }

    /// Set the stroke color from a CSS color string. Returns `false` and
    /// keeps the current color when it does not parse.
    pub fn set_color_css(&mut self, css: &str) -> bool {
        match parse_color(css) {
            Some(color) => {
                self.set_color(color);
                true
            }
            None => {
                log::warn!("ignoring unparseable stroke color {css:?}");
                false
            }
        }
    }

    pub fn set_line_width(&mut self, width: f64) {
        if width.is_finite() {
            self.style.width = width.max(1.0);
        }
    }

    fn local(&self, input: &PointerInput) -> Point {
        canvas_local(input.client, self.canvas_rect)
    }

    // ─── Gestures ────────────────────────────────────────────────────────

    /// Pointer-down. An active stroke is committed first; a pending text
    /// request is dropped.
    pub fn begin_stroke(&mut self, input: &PointerInput) -> StrokeOutcome {
        match self.state {
            StrokeState::Drawing { .. } => {
                self.end_stroke();
            }
            StrokeState::AwaitingTextInput { .. } => {
                log::debug!("text request abandoned");
                self.state = StrokeState::Idle;
            }
            StrokeState::Idle => {}
        }
        if input.is_touch() {
            input.prevent_scroll();
        }

        let origin = self.local(input);
        if self.tool == ToolKind::Text {
            self.state = StrokeState::AwaitingTextInput { origin };
            return StrokeOutcome::NeedsText { origin };
        }
        self.state = StrokeState::Drawing {
            tool: self.tool,
            origin,
            last: origin,
        };
        log::debug!("{} stroke at {origin:?}", self.tool.name());
        StrokeOutcome::Started
    }

    /// Pointer-down with the text request answered synchronously.
    pub fn begin_stroke_with_prompt(
        &mut self,
        input: &PointerInput,
        prompt: &mut dyn TextPrompt,
    ) -> StrokeOutcome {
        match self.begin_stroke(input) {
            StrokeOutcome::NeedsText { .. } => {
                let text = prompt.request_text(TEXT_PROMPT);
                self.submit_text(text)
            }
            other => other,
        }
    }

    /// Answer a text request. Empty or cancelled input draws nothing.
    pub fn submit_text(&mut self, text: Option<String>) -> StrokeOutcome {
        let StrokeState::AwaitingTextInput { origin } = self.state else {
            return StrokeOutcome::Ignored;
        };
        self.state = StrokeState::Idle;
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return StrokeOutcome::Ignored;
        };
        let size = self.style.width * self.config.text_scale;
        fill_text(&mut self.raster, &text, origin, size, self.style.color);
        self.commit();
        StrokeOutcome::Committed
    }

    /// Pointer-move. Returns whether anything was painted.
    pub fn extend_stroke(&mut self, input: &PointerInput) -> bool {
        let StrokeState::Drawing { tool, origin, last } = self.state else {
            return false;
        };
        if input.is_touch() {
            input.prevent_scroll();
        }
        let current = self.local(input);
        if tool.is_shape() {
            if let Some(top) = self.history.top() {
                self.raster.restore_from(top.raster());
            }
        }
        tool.paint(
            &mut self.raster,
            origin,
            last,
            current,
            &self.style,
            self.config.background,
        );
        log::trace!("{} {last:?} → {current:?}", tool.name());
        self.state = StrokeState::Drawing {
            tool,
            origin,
            last: current,
        };
        true
    }

    /// Pointer-up. Commits the stroke. Returns `false` when no stroke was
    /// active.
    pub fn end_stroke(&mut self) -> bool {
        if !matches!(self.state, StrokeState::Drawing { .. }) {
            return false;
        }
        self.state = StrokeState::Idle;
        self.commit();
        true
    }

    /// Pointer leaving the canvas ends the stroke like pointer-up.
    pub fn pointer_leave(&mut self) -> bool {
        self.end_stroke()
    }

    // ─── History ─────────────────────────────────────────────────────────

    fn commit(&mut self) {
        self.history.push(Snapshot::capture(&self.raster));
        self.persist();
    }

    fn persist(&mut self) -> bool {
        match self.history.to_data_urls() {
            Ok(urls) => self.persistence.save(keys::WHITEBOARD, &urls),
            Err(e) => {
                log::error!("Error saving whiteboard: {e}");
                false
            }
        }
    }

    /// Step back one snapshot. With nothing to step back to, clears.
    pub fn undo(&mut self) {
        self.state = StrokeState::Idle;
        if self.history.len() <= 1 {
            self.clear();
            return;
        }
        self.history.pop();
        if let Some(top) = self.history.top() {
            self.raster.restore_from(top.raster());
        }
        self.persist();
    }

    /// Erase everything and restart history from one blank snapshot.
    pub fn clear(&mut self) {
        self.state = StrokeState::Idle;
        self.raster.clear();
        self.history.clear();
        self.commit();
    }

    /// Resize the bitmap, then redraw the latest snapshot so content in the
    /// overlapping region survives.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.raster.resize(width, height);
        if let Some(top) = self.history.top() {
            self.raster.draw_image(top.raster());
        }
        log::debug!("whiteboard resized to {width}x{height}");
    }

    // ─── Output ──────────────────────────────────────────────────────────

    pub fn export_image(&self) -> Result<String, ImageError> {
        to_data_url(&self.raster)
    }

    /// Embed the current drawing in a new note.
    pub fn save_as_note<B: KeyValueStore>(
        &self,
        board: &mut NoteBoard<B>,
        now: DateTime<Utc>,
    ) -> Result<Option<NoteId>, ImageError> {
        let url = self.export_image()?;
        let draft = NoteDraft::new(
            DRAWING_NOTE_TITLE,
            format!(r#"<img src="{url}" style="max-width: 100%;" alt="Drawing">"#),
        )
        .with_category(DRAWING_NOTE_CATEGORY)
        .with_color(DRAWING_NOTE_COLOR);
        Ok(board.create_note(draft, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pb_core::storage::MemoryStore;

    fn board() -> Whiteboard<MemoryStore> {
        Whiteboard::new(50, 40, MemoryStore::new(), WhiteboardConfig::default())
    }

    #[test]
    fn new_board_starts_with_one_blank_snapshot() {
        let wb = board();
        assert_eq!(wb.history().len(), 1);
        assert!(wb.raster().is_blank());
        assert_eq!(wb.store().write_count(keys::WHITEBOARD), 1);
    }

    #[test]
    fn move_without_stroke_paints_nothing() {
        let mut wb = board();
        assert!(!wb.extend_stroke(&PointerInput::mouse(5.0, 5.0)));
        assert!(!wb.end_stroke());
        assert_eq!(wb.history().len(), 1);
    }

    #[test]
    fn canvas_rect_offsets_pointer() {
        let mut wb = board();
        wb.set_canvas_rect(Rect::new(100.0, 200.0, 150.0, 240.0));
        wb.begin_stroke(&PointerInput::mouse(110.0, 210.0));
        assert_eq!(
            wb.state(),
            StrokeState::Drawing {
                tool: ToolKind::Brush,
                origin: Point::new(10.0, 10.0),
                last: Point::new(10.0, 10.0),
            }
        );
    }

    #[test]
    fn tool_change_applies_to_next_gesture() {
        let mut wb = board();
        wb.begin_stroke(&PointerInput::mouse(1.0, 1.0));
        wb.select_tool(ToolKind::Line);
        assert!(matches!(
            wb.state(),
            StrokeState::Drawing { tool: ToolKind::Brush, .. }
        ));
        wb.end_stroke();
        wb.begin_stroke(&PointerInput::mouse(1.0, 1.0));
        assert!(matches!(
            wb.state(),
            StrokeState::Drawing { tool: ToolKind::Line, .. }
        ));
    }

    #[test]
    fn cancelled_text_commits_nothing() {
        let mut wb = board();
        wb.select_tool(ToolKind::Text);
        let outcome = wb.begin_stroke_with_prompt(&PointerInput::mouse(5.0, 30.0), &mut |_: &str| -> Option<String> { None });
        assert_eq!(outcome, StrokeOutcome::Ignored);
        assert_eq!(wb.history().len(), 1);
        assert_eq!(wb.state(), StrokeState::Idle);
    }

    #[test]
    fn bad_css_color_is_ignored() {
        let mut wb = board();
        assert!(!wb.set_color_css("not-a-color"));
        assert_eq!(wb.style().color, Color::BLACK);
        assert!(wb.set_color_css("#ff0000"));
        assert_eq!(wb.style().color, Color::rgb(255, 0, 0));
    }

    #[test]
    fn corrupt_history_falls_back_to_blank() {
        let store = MemoryStore::new();
        store.insert_raw(keys::WHITEBOARD, r#"["data:image/png;base64,AAAA"]"#);
        let wb = Whiteboard::new(10, 10, store, WhiteboardConfig::default());
        assert_eq!(wb.history().len(), 1);
        assert!(wb.raster().is_blank());
    }
}
