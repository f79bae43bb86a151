//! Integration tests: whiteboard strokes and snapshot history (pb-editor).
//!
//! Exercises the stroke engine end to end against an in-memory store:
//! bounded undo, clear, shape previews, the eraser, resize, text and
//! persistence across reloads.

use chrono::{DateTime, Utc};
use pb_core::config::{BoardConfig, WhiteboardConfig};
use pb_core::model::Color;
use pb_core::storage::{MemoryStore, keys};
use pb_editor::board::NoteBoard;
use pb_editor::input::PointerInput;
use pb_editor::tools::ToolKind;
use pb_editor::whiteboard::{StrokeOutcome, StrokeState, Whiteboard};
use pretty_assertions::assert_eq;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn whiteboard(width: u32, height: u32) -> (Whiteboard<MemoryStore>, MemoryStore) {
    init_logs();
    let store = MemoryStore::new();
    let wb = Whiteboard::new(width, height, store.clone(), WhiteboardConfig::default());
    (wb, store)
}

fn stroke(wb: &mut Whiteboard<MemoryStore>, from: (f64, f64), to: (f64, f64)) {
    wb.begin_stroke(&PointerInput::mouse(from.0, from.1));
    wb.extend_stroke(&PointerInput::mouse(to.0, to.1));
    wb.end_stroke();
}

fn stored_snapshots(store: &MemoryStore) -> Vec<String> {
    serde_json::from_str(&store.raw(keys::WHITEBOARD).unwrap()).unwrap()
}

// ─── History bounds ─────────────────────────────────────────────────────

#[test]
fn twenty_five_strokes_keep_twenty_snapshots() {
    let (mut wb, store) = whiteboard(120, 120);
    let mut before_last = None;
    for i in 0..25 {
        if i == 24 {
            before_last = Some(wb.raster().clone());
        }
        let y = 4.0 * i as f64 + 2.0;
        stroke(&mut wb, (5.0, y), (100.0, y));
    }
    assert_eq!(wb.history().len(), 20);
    assert_eq!(stored_snapshots(&store).len(), 20);

    wb.undo();
    assert_eq!(wb.history().len(), 19);
    assert_eq!(Some(wb.raster().clone()), before_last);
    assert_eq!(stored_snapshots(&store).len(), 19);
}

#[test]
fn undo_on_single_snapshot_equals_clear() {
    let (mut wb, _) = whiteboard(30, 30);
    wb.undo();
    assert_eq!(wb.history().len(), 1);
    assert!(wb.raster().is_blank());

    stroke(&mut wb, (2.0, 2.0), (20.0, 20.0));
    wb.undo();
    wb.undo();
    assert_eq!(wb.history().len(), 1);
    assert!(wb.raster().is_blank());
}

#[test]
fn clear_leaves_exactly_one_blank_snapshot() {
    let (mut wb, store) = whiteboard(30, 30);
    for i in 0..5 {
        let y = 5.0 * i as f64 + 2.0;
        stroke(&mut wb, (2.0, y), (25.0, y));
    }
    wb.clear();
    assert_eq!(wb.history().len(), 1);
    assert!(wb.raster().is_blank());
    assert!(wb.history().top().unwrap().raster().is_blank());
    assert_eq!(stored_snapshots(&store).len(), 1);
}

// ─── Tools ──────────────────────────────────────────────────────────────

fn draw_shape(tool: ToolKind, moves: &[(f64, f64)]) -> Whiteboard<MemoryStore> {
    let (mut wb, _) = whiteboard(80, 80);
    stroke(&mut wb, (5.0, 75.0), (75.0, 75.0));
    wb.select_tool(tool);
    wb.begin_stroke(&PointerInput::mouse(10.0, 10.0));
    for &(x, y) in moves {
        wb.extend_stroke(&PointerInput::mouse(x, y));
    }
    wb.end_stroke();
    wb
}

#[test]
fn shape_preview_leaves_only_the_final_shape() {
    for tool in [ToolKind::Line, ToolKind::Rectangle, ToolKind::Circle] {
        let wobbly = draw_shape(
            tool,
            &[(60.0, 60.0), (40.0, 30.0), (70.0, 20.0), (30.0, 50.0)],
        );
        let direct = draw_shape(tool, &[(30.0, 50.0)]);
        assert!(
            wobbly.raster() == direct.raster(),
            "{} left preview pixels behind",
            tool.name()
        );
        assert_eq!(wobbly.history().len(), 3, "{}", tool.name());
    }
}

#[test]
fn touch_strokes_suppress_page_scroll() {
    let (mut wb, _) = whiteboard(40, 40);
    let down = PointerInput::touch(5.0, 5.0);
    wb.begin_stroke(&down);
    assert!(down.scroll_prevented());
    let moved = PointerInput::touch(30.0, 30.0);
    assert!(wb.extend_stroke(&moved));
    assert!(moved.scroll_prevented());
    wb.end_stroke();

    let mouse = PointerInput::mouse(5.0, 5.0);
    wb.begin_stroke(&mouse);
    assert!(!mouse.scroll_prevented());
}

#[test]
fn eraser_paints_background_color() {
    let (mut wb, _) = whiteboard(40, 40);
    wb.set_line_width(6.0);
    stroke(&mut wb, (5.0, 20.0), (35.0, 20.0));
    assert_eq!(wb.raster().pixel(20, 20), Some(Color::BLACK));

    wb.select_tool(ToolKind::Eraser);
    stroke(&mut wb, (5.0, 20.0), (35.0, 20.0));
    assert_eq!(wb.raster().pixel(20, 20), Some(Color::WHITE));
    assert_eq!(wb.raster().count(|c| c == Color::BLACK), 0);
}

#[test]
fn text_is_drawn_at_pointer_and_committed() {
    let (mut wb, _) = whiteboard(100, 60);
    wb.select_tool(ToolKind::Text);
    let outcome = wb.begin_stroke(&PointerInput::mouse(10.0, 30.0));
    assert!(matches!(outcome, StrokeOutcome::NeedsText { .. }));
    assert!(matches!(wb.state(), StrokeState::AwaitingTextInput { .. }));

    assert_eq!(wb.submit_text(Some("H".to_string())), StrokeOutcome::Committed);
    assert_eq!(wb.history().len(), 2);
    // line width 2 → 20px glyph box above the baseline
    assert_eq!(wb.raster().pixel(10, 10), Some(Color::BLACK));
    assert_eq!(wb.raster().pixel(10, 31), Some(Color::TRANSPARENT));
}

#[test]
fn prompt_answer_is_drawn_immediately() {
    let (mut wb, _) = whiteboard(100, 60);
    wb.select_tool(ToolKind::Text);
    let mut asked = Vec::new();
    let mut prompt = |message: &str| -> Option<String> {
        asked.push(message.to_string());
        Some("ok".to_string())
    };
    let outcome = wb.begin_stroke_with_prompt(&PointerInput::mouse(5.0, 40.0), &mut prompt);
    assert_eq!(outcome, StrokeOutcome::Committed);
    assert_eq!(asked, vec!["Enter text:".to_string()]);
    assert!(!wb.raster().is_blank());
}

#[test]
fn resize_keeps_the_overlapping_region() {
    let (mut wb, _) = whiteboard(50, 40);
    stroke(&mut wb, (5.0, 5.0), (45.0, 5.0));

    wb.resize(30, 30);
    assert_eq!((wb.raster().width(), wb.raster().height()), (30, 30));
    assert_eq!(wb.raster().pixel(5, 5), Some(Color::BLACK));
    assert_eq!(wb.raster().pixel(29, 5), Some(Color::BLACK));

    wb.resize(80, 80);
    assert_eq!(wb.raster().pixel(44, 5), Some(Color::BLACK));
    assert_eq!(wb.raster().pixel(70, 5), Some(Color::TRANSPARENT));
    assert_eq!(wb.history().len(), 2);
}

#[test]
fn pointer_leave_ends_the_stroke() {
    let (mut wb, _) = whiteboard(30, 30);
    wb.begin_stroke(&PointerInput::mouse(2.0, 2.0));
    wb.extend_stroke(&PointerInput::mouse(20.0, 2.0));
    assert!(wb.pointer_leave());
    assert_eq!(wb.state(), StrokeState::Idle);
    assert_eq!(wb.history().len(), 2);
    assert!(!wb.extend_stroke(&PointerInput::mouse(25.0, 25.0)));
}

// ─── Persistence ────────────────────────────────────────────────────────

#[test]
fn reload_restores_latest_snapshot() {
    let (mut wb, store) = whiteboard(40, 40);
    stroke(&mut wb, (5.0, 5.0), (35.0, 35.0));
    stroke(&mut wb, (35.0, 5.0), (5.0, 35.0));

    let reloaded = Whiteboard::new(40, 40, store, WhiteboardConfig::default());
    assert_eq!(reloaded.history().len(), 3);
    assert!(reloaded.raster() == wb.raster());
}

#[test]
fn full_storage_does_not_break_drawing() {
    init_logs();
    let store = MemoryStore::with_quota(16);
    let mut wb = Whiteboard::new(20, 20, store.clone(), WhiteboardConfig::default());
    stroke(&mut wb, (2.0, 2.0), (18.0, 18.0));
    assert_eq!(wb.history().len(), 2);
    assert!(store.raw(keys::WHITEBOARD).is_none());
}

#[test]
fn drawing_can_be_saved_as_a_note() {
    let (mut wb, store) = whiteboard(20, 20);
    stroke(&mut wb, (2.0, 2.0), (18.0, 18.0));
    let mut board = NoteBoard::load(store, BoardConfig::default());
    let now: DateTime<Utc> = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc);

    let id = wb.save_as_note(&mut board, now).unwrap().unwrap();
    let note = board.note(id).unwrap();
    assert_eq!(note.title, "Whiteboard Drawing");
    assert_eq!(note.category, "ideas");
    assert_eq!(note.color, "#ffffff");
    assert!(note.text.starts_with(r#"<img src="data:image/png;base64,"#));
    assert!(note.text.ends_with(r#"" style="max-width: 100%;" alt="Drawing">"#));
}
