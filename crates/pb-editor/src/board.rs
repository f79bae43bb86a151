//! Note board: the note collection, its categories and settings, and the
//! drag positioner that moves notes around.
//!
//! All mutations go through [`NoteBoard`] and are saved immediately. Note
//! positions only change at the end of a drag gesture.

use crate::input::PointerInput;
use crate::positioner::{FrameRequest, NoteTarget, NoteVisual, Positioner};
use chrono::{DateTime, Utc};
use kurbo::Point;
use pb_core::config::BoardConfig;
use pb_core::css::format_pastel;
use pb_core::export::{ExportFile, ExportFormat, export_notes};
use pb_core::geometry::ContainerMetrics;
use pb_core::id::NoteId;
use pb_core::model::{Note, NoteDraft, NoteField, Position, Settings, ViewMode};
use pb_core::search::{self, ALL_CATEGORIES, DEFAULT_CATEGORIES};
use pb_core::storage::{KeyValueStore, Persistence, keys};
use rand::Rng;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CategoryError {
    #[error("category name is empty")]
    Blank,

    #[error("category {0:?} already exists")]
    Duplicate(String),
}

pub struct NoteBoard<S> {
    notes: Vec<Note>,
    categories: Vec<String>,
    settings: Settings,
    active_category: String,
    positioner: Positioner,
    persistence: Persistence<S>,
    config: BoardConfig,
}

impl<S: KeyValueStore> NoteBoard<S> {
    /// Load notes, categories and settings from `store`. Missing or
    /// unreadable records fall back to an empty board with the default
    /// categories.
    pub fn load(store: S, config: BoardConfig) -> Self {
        let persistence = Persistence::new(store);
        let notes: Vec<Note> = persistence.load(keys::NOTES, Vec::new());
        let default_categories: Vec<String> =
            DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
        let categories = persistence.load(keys::CATEGORIES, default_categories);
        let settings = persistence.load(keys::SETTINGS, Settings::default());

        let mut positioner = Positioner::new(&config);
        for note in &notes {
            positioner.sync_note(note.id, stored_point(note));
        }
        log::debug!("loaded {} notes, {} categories", notes.len(), categories.len());

        Self {
            notes,
            categories,
            settings,
            active_category: ALL_CATEGORIES.to_string(),
            positioner,
            persistence,
            config,
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    pub fn view_mode(&self) -> ViewMode {
        self.positioner.view_mode()
    }

    pub fn visual(&self, id: NoteId) -> Option<&NoteVisual> {
        self.positioner.visual(id)
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    /// Notes in the active category, pinned notes last.
    pub fn render_order(&self) -> Vec<&Note> {
        search::arrange(&self.notes, &self.active_category)
    }

    pub fn search(&self, query: &str) -> Vec<&Note> {
        search::search(&self.notes, query, &self.active_category)
    }

    pub fn export(
        &self,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Result<ExportFile, serde_json::Error> {
        export_notes(&self.notes, format, now)
    }

    // ─── Note lifecycle ──────────────────────────────────────────────────

    /// Create a note at a random spot inside the spawn area. Blank drafts
    /// are rejected.
    pub fn create_note(&mut self, draft: NoteDraft, now: DateTime<Utc>) -> Option<NoteId> {
        let area = self.config.spawn_area;
        let mut rng = rand::thread_rng();
        let spawn = Point::new(
            rng.gen_range(0.0..area.width.max(1.0)).floor(),
            rng.gen_range(0.0..area.height.max(1.0)).floor(),
        );
        self.create_note_at(draft, now, spawn)
    }

    pub fn create_note_at(
        &mut self,
        draft: NoteDraft,
        now: DateTime<Utc>,
        spawn: Point,
    ) -> Option<NoteId> {
        if draft.is_blank() {
            log::warn!("refusing to create an empty note");
            return None;
        }
        let mut draft = draft;
        if draft.color.trim().is_empty() {
            draft.color = self.config.default_color.clone();
        }
        let mut note = Note::new(draft, now);
        note.position = Some(Position::from_point(spawn));
        let id = note.id;
        self.positioner.sync_note(id, Some(spawn));
        self.notes.push(note);
        self.save_notes();
        log::debug!("created note {id}");
        Some(id)
    }

    pub fn delete_note(&mut self, id: NoteId) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        if self.notes.len() == before {
            return false;
        }
        self.positioner.forget(id);
        self.save_notes();
        true
    }

    pub fn clear_all(&mut self) {
        self.notes.clear();
        self.positioner.forget_all();
        self.save_notes();
    }

    pub fn update_note(&mut self, id: NoteId, field: NoteField) -> bool {
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        field.apply(note);
        self.save_notes();
        true
    }

    /// Flip the pinned flag. Returns `false` when the note does not exist.
    pub fn toggle_pin(&mut self, id: NoteId) -> bool {
        let Some(note) = self.notes.iter_mut().find(|n| n.id == id) else {
            return false;
        };
        note.pinned = !note.pinned;
        self.save_notes();
        true
    }

    /// Assign a random pastel color.
    pub fn recolor_note(&mut self, id: NoteId) -> Option<String> {
        let hue: u16 = rand::thread_rng().gen_range(0..360);
        let color = format_pastel(hue);
        self.update_note(id, NoteField::Color(color.clone()))
            .then_some(color)
    }

    pub fn save_notes(&mut self) -> bool {
        self.persistence.save(keys::NOTES, &self.notes)
    }

    // ─── Categories ──────────────────────────────────────────────────────

    pub fn add_category(&mut self, name: &str) -> Result<String, CategoryError> {
        let category = search::normalize_category(name).ok_or(CategoryError::Blank)?;
        if self.categories.contains(&category) {
            return Err(CategoryError::Duplicate(category));
        }
        self.categories.push(category.clone());
        self.persistence.save(keys::CATEGORIES, &self.categories);
        Ok(category)
    }

    pub fn set_category_filter(&mut self, category: &str) {
        self.active_category = category.to_string();
    }

    // ─── Settings ────────────────────────────────────────────────────────

    pub fn toggle_dark_mode(&mut self) {
        self.settings.toggle_dark_mode();
        self.save_settings();
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.save_settings();
    }

    pub fn save_settings(&mut self) -> bool {
        self.persistence.save(keys::SETTINGS, &self.settings)
    }

    /// Persist every record (Ctrl+S).
    pub fn save_all(&mut self) -> bool {
        let notes = self.save_notes();
        let categories = self.persistence.save(keys::CATEGORIES, &self.categories);
        let settings = self.save_settings();
        notes && categories && settings
    }

    // ─── Drag gestures ───────────────────────────────────────────────────

    /// Grab a note. `None` (the pointer is not over a note) and unknown ids
    /// are ignored. An active drag is committed before the new one starts.
    pub fn begin_drag(
        &mut self,
        input: &PointerInput,
        target: Option<NoteTarget>,
        container: &ContainerMetrics,
    ) -> bool {
        let Some(target) = target else {
            return false;
        };
        if self.note(target.id).is_none() {
            log::debug!("drag target {} is not a note", target.id);
            return false;
        }
        if self.positioner.is_dragging() {
            self.end_drag(input.timestamp_ms);
        }
        self.positioner.begin(input, target, container)
    }

    pub fn update_drag(&mut self, input: &PointerInput, container: &ContainerMetrics) -> FrameRequest {
        self.positioner.update(input, container)
    }

    pub fn on_animation_frame(&mut self) -> Option<(NoteId, Point)> {
        self.positioner.on_animation_frame()
    }

    /// Drop the dragged note: store its final position and save once.
    pub fn end_drag(&mut self, now_ms: f64) -> Option<Point> {
        let (id, point) = self.positioner.end(now_ms)?;
        let note = self.notes.iter_mut().find(|n| n.id == id)?;
        note.position = Some(Position::from_point(point));
        self.save_notes();
        Some(point)
    }

    pub fn tick(&mut self, now_ms: f64) {
        self.positioner.tick(now_ms);
    }

    pub fn is_dragging(&self) -> bool {
        self.positioner.is_dragging()
    }

    /// Switch between grid and list layout, ending any drag first.
    pub fn set_view_mode(&mut self, mode: ViewMode, now_ms: f64) {
        if self.positioner.is_dragging() {
            self.end_drag(now_ms);
        }
        let stored: Vec<(NoteId, Option<Point>)> =
            self.notes.iter().map(|n| (n.id, stored_point(n))).collect();
        self.positioner.set_view_mode(mode, stored);
    }
}

fn stored_point(note: &Note) -> Option<Point> {
    note.position.as_ref().and_then(Position::to_point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pb_core::css::parse_color;
    use pb_core::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn board() -> NoteBoard<MemoryStore> {
        NoteBoard::load(MemoryStore::new(), BoardConfig::default())
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-04T09:15:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn fresh_board_has_default_categories() {
        let b = board();
        assert!(b.notes().is_empty());
        assert_eq!(b.categories(), &["work", "personal", "other"]);
        assert_eq!(b.active_category(), "all");
    }

    #[test]
    fn create_spawns_inside_area_and_saves() {
        let mut b = board();
        let id = b.create_note(NoteDraft::new("Groceries", "milk"), now()).unwrap();
        let p = b.note(id).unwrap().position.as_ref().unwrap().to_point().unwrap();
        assert!((0.0..900.0).contains(&p.x) && (0.0..500.0).contains(&p.y));
        assert_eq!(b.store().write_count(keys::NOTES), 1);
        assert_eq!(b.note(id).unwrap().color, "#fff9b1");
    }

    #[test]
    fn blank_draft_is_rejected() {
        let mut b = board();
        assert_eq!(b.create_note(NoteDraft::new("  ", "\n"), now()), None);
        assert_eq!(b.store().write_count(keys::NOTES), 0);
    }

    #[test]
    fn update_and_pin_unknown_note_report_false() {
        let mut b = board();
        let ghost = NoteId::intern("ghost_note");
        assert!(!b.toggle_pin(ghost));
        assert!(!b.update_note(ghost, NoteField::Title("x".into())));
        assert!(!b.delete_note(ghost));
    }

    #[test]
    fn pinned_notes_render_last() {
        let mut b = board();
        let a = b.create_note_at(NoteDraft::new("a", ""), now(), Point::ZERO).unwrap();
        let c = b.create_note_at(NoteDraft::new("c", ""), now(), Point::ZERO).unwrap();
        assert!(b.toggle_pin(a));
        let order: Vec<NoteId> = b.render_order().iter().map(|n| n.id).collect();
        assert_eq!(order, vec![c, a]);
    }

    #[test]
    fn category_filter_and_search() {
        let mut b = board();
        b.create_note_at(NoteDraft::new("Standup", "").with_category("work"), now(), Point::ZERO);
        b.create_note_at(NoteDraft::new("Gym", "legs").with_category("personal"), now(), Point::ZERO);
        b.set_category_filter("work");
        assert_eq!(b.render_order().len(), 1);
        assert_eq!(b.search("LEGS")[0].title, "Gym");
        assert_eq!(b.search("")[0].title, "Standup");
    }

    #[test]
    fn add_category_normalizes_and_rejects_duplicates() {
        let mut b = board();
        assert_eq!(b.add_category("  Side  Projects "), Ok("side-projects".to_string()));
        assert_eq!(
            b.add_category("side projects"),
            Err(CategoryError::Duplicate("side-projects".into()))
        );
        assert_eq!(b.add_category("   "), Err(CategoryError::Blank));
        assert_eq!(b.store().write_count(keys::CATEGORIES), 1);
    }

    #[test]
    fn recolor_stores_pastel_hsl() {
        let mut b = board();
        let id = b.create_note_at(NoteDraft::new("t", ""), now(), Point::ZERO).unwrap();
        let color = b.recolor_note(id).unwrap();
        assert!(color.starts_with("hsl(") && color.ends_with(", 100%, 85%)"));
        let parsed = parse_color(&color).unwrap();
        assert!(parsed.r >= 0xb2 && parsed.g >= 0xb2 && parsed.b >= 0xb2);
        assert_eq!(b.note(id).unwrap().color, color);
    }

    #[test]
    fn board_reloads_from_store() {
        let store = MemoryStore::new();
        let mut b = NoteBoard::load(store.clone(), BoardConfig::default());
        let id = b
            .create_note_at(NoteDraft::new("keep", "me"), now(), Point::new(12.0, 34.0))
            .unwrap();
        b.toggle_dark_mode();

        let reloaded = NoteBoard::load(store, BoardConfig::default());
        assert_eq!(reloaded.notes(), b.notes());
        assert_eq!(reloaded.settings(), b.settings());
        assert_eq!(
            reloaded.note(id).unwrap().position,
            Some(Position::from_point(Point::new(12.0, 34.0)))
        );
    }
}
