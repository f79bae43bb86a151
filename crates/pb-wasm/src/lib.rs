//! WASM bridge for Pinboard: exposes the note board and the whiteboard to
//! the page script.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the DOM; it
//! forwards pointer and keyboard events here, reads back JSON or plain
//! values, and applies the returned positions and bitmaps.

mod logger;
mod storage;

use chrono::Utc;
use pb_core::config::{BoardConfig, WhiteboardConfig};
use pb_core::export::ExportFormat;
use pb_core::geometry::{ContainerMetrics, Point, Rect, Vec2};
use pb_core::id::NoteId;
use pb_core::model::{Note, NoteCard, NoteDraft, NoteField, Position, ViewMode};
use pb_editor::board::NoteBoard;
use pb_editor::input::{PointerInput, PointerKind};
use pb_editor::positioner::{FrameRequest, NoteTarget, Placement};
use pb_editor::shortcuts::{ShortcutAction, ShortcutMap};
use pb_editor::tools::ToolKind;
use pb_editor::whiteboard::{StrokeOutcome, Whiteboard};
use serde_json::json;
use storage::LocalStorage;
use wasm_bindgen::Clamped;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, ImageData};

fn pointer(client_x: f64, client_y: f64, pointer_type: &str) -> PointerInput {
    PointerInput::new(PointerKind::from_pointer_type(pointer_type), client_x, client_y)
        .at_time(js_sys::Date::now())
}

fn cards_json(notes: Vec<&Note>) -> String {
    let cards: Vec<NoteCard<'_>> = notes.into_iter().map(NoteCard::from).collect();
    serde_json::to_string(&cards).unwrap_or_else(|_| "[]".to_string())
}

fn error_json(message: impl std::fmt::Display) -> String {
    json!({ "ok": false, "error": message.to_string() }).to_string()
}

// ─── Note board ──────────────────────────────────────────────────────────

/// The note board controller. All note mutations from the page go through
/// this struct and are persisted to `localStorage`.
#[wasm_bindgen]
pub struct PinBoard {
    board: NoteBoard<LocalStorage>,
}

#[wasm_bindgen]
impl PinBoard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        logger::init(log::LevelFilter::Info);
        Self {
            board: NoteBoard::load(LocalStorage::open(), BoardConfig::default()),
        }
    }

    /// Visible notes in render order (pinned last), as a JSON array. Each
    /// record carries `displayDate` and, when categorized, `categoryLabel`.
    pub fn notes_json(&self) -> String {
        cards_json(self.board.render_order())
    }

    pub fn search_json(&self, query: &str) -> String {
        cards_json(self.board.search(query))
    }

    pub fn categories_json(&self) -> String {
        serde_json::to_string(self.board.categories()).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn settings_json(&self) -> String {
        serde_json::to_string(self.board.settings()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Create a note. Returns its id, or an empty string for a blank draft.
    pub fn create_note(&mut self, title: &str, text: &str, category: &str, color: &str) -> String {
        let draft = NoteDraft::new(title, text)
            .with_category(category)
            .with_color(color);
        self.board
            .create_note(draft, Utc::now())
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn delete_note(&mut self, id: &str) -> bool {
        NoteId::lookup(id).is_some_and(|id| self.board.delete_note(id))
    }

    pub fn clear_all(&mut self) {
        self.board.clear_all();
    }

    /// Edit one field (`title`, `text`, `category` or `color`).
    pub fn update_note(&mut self, id: &str, field: &str, value: &str) -> bool {
        let field = NoteField::from_name(field, value.to_string());
        let (Some(id), Some(field)) = (NoteId::lookup(id), field) else {
            return false;
        };
        self.board.update_note(id, field)
    }

    pub fn toggle_pin(&mut self, id: &str) -> bool {
        NoteId::lookup(id).is_some_and(|id| self.board.toggle_pin(id))
    }

    /// Assign a random pastel color. Returns the CSS color, or `""`.
    pub fn recolor_note(&mut self, id: &str) -> String {
        NoteId::lookup(id)
            .and_then(|id| self.board.recolor_note(id))
            .unwrap_or_default()
    }

    /// Returns `{"ok":true,"category":"..."}` or `{"ok":false,"error":"..."}`.
    pub fn add_category(&mut self, name: &str) -> String {
        match self.board.add_category(name) {
            Ok(category) => json!({ "ok": true, "category": category }).to_string(),
            Err(e) => error_json(e),
        }
    }

    pub fn set_category_filter(&mut self, category: &str) {
        self.board.set_category_filter(category);
    }

    /// `"grid"` or `"list"`.
    pub fn set_view_mode(&mut self, mode: &str) -> bool {
        let mode = match mode {
            "grid" => ViewMode::Grid,
            "list" => ViewMode::List,
            _ => return false,
        };
        self.board.set_view_mode(mode, js_sys::Date::now());
        true
    }

    /// Returns the new theme name.
    pub fn toggle_dark_mode(&mut self) -> String {
        self.board.toggle_dark_mode();
        self.board.settings().theme.name().to_string()
    }

    pub fn save_all(&mut self) -> bool {
        self.board.save_all()
    }

    /// Export every note. Returns `{"ok":true,"filename","mime","content"}`.
    pub fn export(&self, format: &str) -> String {
        let format: ExportFormat = match format.parse() {
            Ok(f) => f,
            Err(e) => return error_json(e),
        };
        match self.board.export(format, Utc::now()) {
            Ok(file) => json!({
                "ok": true,
                "filename": file.filename,
                "mime": file.mime,
                "content": file.content,
            })
            .to_string(),
            Err(e) => error_json(e),
        }
    }

    // ─── Drag API ────────────────────────────────────────────────────────

    /// Pointer-down on the notes container. `note_id` is empty when the
    /// pointer is not over a note. Returns
    /// `{"dragging":bool,"preventDefault":bool}`.
    #[allow(clippy::too_many_arguments)]
    pub fn pointer_down(
        &mut self,
        note_id: &str,
        rect_x: f64,
        rect_y: f64,
        rect_w: f64,
        rect_h: f64,
        client_x: f64,
        client_y: f64,
        pointer_type: &str,
        container_x: f64,
        container_y: f64,
        scroll_x: f64,
        scroll_y: f64,
    ) -> String {
        let input = pointer(client_x, client_y, pointer_type);
        let target = NoteId::lookup(note_id).map(|id| NoteTarget {
            id,
            rect: Rect::new(rect_x, rect_y, rect_x + rect_w, rect_y + rect_h),
        });
        let container = ContainerMetrics::new(
            Point::new(container_x, container_y),
            Vec2::new(scroll_x, scroll_y),
        );
        let dragging = self.board.begin_drag(&input, target, &container);
        json!({ "dragging": dragging, "preventDefault": input.scroll_prevented() }).to_string()
    }

    /// Returns `{"requestFrame":bool,"preventDefault":bool}`.
    #[allow(clippy::too_many_arguments)]
    pub fn pointer_move(
        &mut self,
        client_x: f64,
        client_y: f64,
        pointer_type: &str,
        container_x: f64,
        container_y: f64,
        scroll_x: f64,
        scroll_y: f64,
    ) -> String {
        let input = pointer(client_x, client_y, pointer_type);
        let container = ContainerMetrics::new(
            Point::new(container_x, container_y),
            Vec2::new(scroll_x, scroll_y),
        );
        let request = self.board.update_drag(&input, &container);
        json!({
            "requestFrame": request == FrameRequest::Schedule,
            "preventDefault": input.scroll_prevented(),
        })
        .to_string()
    }

    /// `requestAnimationFrame` callback. Returns `{"id","left","top"}` for
    /// the note to move, or `""`.
    pub fn animation_frame(&mut self) -> String {
        match self.board.on_animation_frame() {
            Some((id, point)) => {
                let position = Position::from_point(point);
                json!({ "id": id.as_str(), "left": position.left, "top": position.top })
                    .to_string()
            }
            None => String::new(),
        }
    }

    /// Pointer-up / touch-end. Returns whether a note was dropped.
    pub fn pointer_up(&mut self) -> bool {
        self.board.end_drag(js_sys::Date::now()).is_some()
    }

    /// Apply due stacking restores. Call from a timer.
    pub fn tick(&mut self) {
        self.board.tick(js_sys::Date::now());
    }

    /// Style to apply to a note element:
    /// `{"position":"absolute"|"static","left","top","zIndex","dragging"}`.
    pub fn note_style_json(&self, id: &str) -> String {
        let Some(visual) = NoteId::lookup(id).and_then(|id| self.board.visual(id)) else {
            return String::new();
        };
        let mut style = json!({ "zIndex": visual.z_index, "dragging": visual.dragging });
        match visual.placement {
            Placement::Absolute(p) => {
                let position = Position::from_point(p);
                style["position"] = json!("absolute");
                style["left"] = json!(position.left);
                style["top"] = json!(position.top);
            }
            Placement::Flow => style["position"] = json!("static"),
        }
        style.to_string()
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Resolve a key event. Saving is handled here; the other actions are
    /// returned by name for the page (or the whiteboard) to perform.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return "none".to_string();
        };
        if action == ShortcutAction::SaveAll {
            self.board.save_all();
        }
        action_to_name(action).to_string()
    }
}

impl Default for PinBoard {
    fn default() -> Self {
        Self::new()
    }
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::SaveAll => "saveAll",
        ShortcutAction::FocusNewNote => "focusNewNote",
        ShortcutAction::AddNote => "addNote",
        ShortcutAction::Undo => "undo",
        ShortcutAction::CloseOverlays => "closeOverlays",
    }
}

// ─── Whiteboard ──────────────────────────────────────────────────────────

/// The whiteboard controller. The page blits the bitmap with [`render`]
/// after any call that returns `true`.
///
/// [`render`]: WhiteboardCanvas::render
#[wasm_bindgen]
pub struct WhiteboardCanvas {
    whiteboard: Whiteboard<LocalStorage>,
}

#[wasm_bindgen]
impl WhiteboardCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> Self {
        logger::init(log::LevelFilter::Info);
        Self {
            whiteboard: Whiteboard::new(
                width,
                height,
                LocalStorage::open(),
                WhiteboardConfig::default(),
            ),
        }
    }

    /// Canvas `getBoundingClientRect()`.
    pub fn set_canvas_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.whiteboard
            .set_canvas_rect(Rect::new(x, y, x + width, y + height));
    }

    pub fn set_tool(&mut self, name: &str) -> bool {
        match ToolKind::from_name(name) {
            Some(tool) => {
                self.whiteboard.select_tool(tool);
                true
            }
            None => false,
        }
    }

    pub fn get_tool_name(&self) -> String {
        self.whiteboard.tool().name().to_string()
    }

    pub fn set_color(&mut self, css: &str) -> bool {
        self.whiteboard.set_color_css(css)
    }

    pub fn set_line_width(&mut self, width: f64) {
        self.whiteboard.set_line_width(width);
    }

    /// Returns `{"outcome","preventDefault":bool}`. The outcome is
    /// `"started"`, `"needsText"` (call [`submit_text`] with the prompt
    /// answer) or `"ignored"`.
    ///
    /// [`submit_text`]: WhiteboardCanvas::submit_text
    pub fn pointer_down(&mut self, client_x: f64, client_y: f64, pointer_type: &str) -> String {
        let input = pointer(client_x, client_y, pointer_type);
        let outcome = match self.whiteboard.begin_stroke(&input) {
            StrokeOutcome::Started => "started",
            StrokeOutcome::NeedsText { .. } => "needsText",
            StrokeOutcome::Committed => "committed",
            StrokeOutcome::Ignored => "ignored",
        };
        json!({ "outcome": outcome, "preventDefault": input.scroll_prevented() }).to_string()
    }

    /// Returns `{"redraw":bool,"preventDefault":bool}`.
    pub fn pointer_move(&mut self, client_x: f64, client_y: f64, pointer_type: &str) -> String {
        let input = pointer(client_x, client_y, pointer_type);
        let redraw = self.whiteboard.extend_stroke(&input);
        json!({ "redraw": redraw, "preventDefault": input.scroll_prevented() }).to_string()
    }

    pub fn pointer_up(&mut self) -> bool {
        self.whiteboard.end_stroke()
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.whiteboard.pointer_leave()
    }

    /// Answer a text request; `None` when the prompt was cancelled.
    pub fn submit_text(&mut self, text: Option<String>) -> bool {
        self.whiteboard.submit_text(text) == StrokeOutcome::Committed
    }

    pub fn undo(&mut self) {
        self.whiteboard.undo();
    }

    pub fn clear(&mut self) {
        self.whiteboard.clear();
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.whiteboard.resize(width, height);
    }

    /// PNG data URL of the current drawing, or `""` on encoder failure.
    pub fn export_image(&self) -> String {
        self.whiteboard.export_image().unwrap_or_else(|e| {
            log::error!("Error exporting whiteboard: {e}");
            String::new()
        })
    }

    /// Create a note embedding the drawing. Returns its id, or `""`.
    pub fn save_as_note(&self, board: &mut PinBoard) -> String {
        match self.whiteboard.save_as_note(&mut board.board, Utc::now()) {
            Ok(Some(id)) => id.as_str().to_string(),
            Ok(None) => String::new(),
            Err(e) => {
                log::error!("Error saving drawing as note: {e}");
                String::new()
            }
        }
    }

    /// Blit the bitmap onto a 2D context.
    pub fn render(&self, ctx: &CanvasRenderingContext2d) -> bool {
        let raster = self.whiteboard.raster();
        let bytes = raster.to_rgba();
        let image = match ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(bytes.as_slice()),
            raster.width(),
            raster.height(),
        ) {
            Ok(image) => image,
            Err(e) => {
                log::error!("Error creating image data: {e:?}");
                return false;
            }
        };
        ctx.put_image_data(&image, 0.0, 0.0).is_ok()
    }
}
