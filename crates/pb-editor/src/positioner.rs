//! Note positioner: drag sessions over the freeform note collection.
//!
//! A drag captures the offset between the pointer and the note's top-left
//! corner at grab time and keeps it fixed for the whole gesture. Each move
//! computes a container-local top-left that is staged and applied on the
//! next animation frame, so bursts of pointer events coalesce into one
//! visual update per frame.
//!
//! The positioner owns the visual state of every rendered note (placement,
//! stacking order, dragging mark). It never touches stored notes; the
//! [`NoteBoard`](crate::board::NoteBoard) commits the final position.

use crate::input::PointerInput;
use kurbo::{Point, Rect, Vec2};
use pb_core::config::BoardConfig;
use pb_core::geometry::ContainerMetrics;
use pb_core::id::NoteId;
use pb_core::model::ViewMode;
use smallvec::SmallVec;
use std::collections::HashMap;

/// The element a drag starts on: the note id plus its rendered
/// viewport rectangle (`getBoundingClientRect()`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteTarget {
    pub id: NoteId,
    pub rect: Rect,
}

/// How a note element is laid out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Normal document flow.
    Flow,
    /// Absolute top-left in container coordinates.
    Absolute(Point),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteVisual {
    pub placement: Placement,
    pub z_index: i32,
    pub dragging: bool,
}

/// What the host must do after a drag update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRequest {
    /// No session; nothing staged.
    Idle,
    /// First staged position since the last frame: request an animation frame.
    Schedule,
    /// A frame is already requested; the staged position was replaced.
    Coalesced,
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    note: NoteId,
    pointer_offset: Vec2,
}

pub struct Positioner {
    session: Option<DragSession>,
    /// Position waiting for the next animation frame.
    staged: Option<Point>,
    visuals: HashMap<NoteId, NoteVisual>,
    /// Stacking restores due at a timestamp (ms).
    pending_restores: SmallVec<[(NoteId, f64); 2]>,
    view: ViewMode,
    drag_z_index: i32,
    rest_z_index: i32,
    restore_delay_ms: f64,
}

impl Positioner {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            session: None,
            staged: None,
            visuals: HashMap::new(),
            pending_restores: SmallVec::new(),
            view: ViewMode::Grid,
            drag_z_index: config.drag_z_index,
            rest_z_index: config.rest_z_index,
            restore_delay_ms: config.stacking_restore_delay_ms,
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view
    }

    pub fn visual(&self, id: NoteId) -> Option<&NoteVisual> {
        self.visuals.get(&id)
    }

    pub fn active_note(&self) -> Option<NoteId> {
        self.session.map(|s| s.note)
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    fn placement_for(&self, stored: Option<Point>) -> Placement {
        match (self.view, stored) {
            (ViewMode::Grid, Some(p)) => Placement::Absolute(p),
            _ => Placement::Flow,
        }
    }

    /// Register (or refresh) a rendered note with its stored position.
    pub fn sync_note(&mut self, id: NoteId, stored: Option<Point>) {
        let placement = self.placement_for(stored);
        let rest = self.rest_z_index;
        let visual = self.visuals.entry(id).or_insert(NoteVisual {
            placement,
            z_index: rest,
            dragging: false,
        });
        if !visual.dragging {
            visual.placement = placement;
        }
    }

    pub fn forget(&mut self, id: NoteId) {
        self.visuals.remove(&id);
        self.pending_restores.retain(|(n, _)| *n != id);
        if self.active_note() == Some(id) {
            self.session = None;
            self.staged = None;
        }
    }

    pub fn forget_all(&mut self) {
        self.visuals.clear();
        self.pending_restores.clear();
        self.session = None;
        self.staged = None;
    }

    /// Switch layout mode. List view forces every note into flow; grid view
    /// restores each note's stored absolute position. Callers end any active
    /// drag first.
    pub fn set_view_mode(
        &mut self,
        mode: ViewMode,
        stored: impl IntoIterator<Item = (NoteId, Option<Point>)>,
    ) {
        self.view = mode;
        for (id, position) in stored {
            let placement = self.placement_for(position);
            if let Some(visual) = self.visuals.get_mut(&id) {
                visual.placement = placement;
            }
        }
    }

    /// Start dragging `target`. Returns `false` (and does nothing) when a
    /// session is already active, the note is not rendered, or the board is
    /// in list view.
    pub fn begin(
        &mut self,
        input: &PointerInput,
        target: NoteTarget,
        container: &ContainerMetrics,
    ) -> bool {
        if self.session.is_some() {
            log::warn!("drag already active; ignoring grab on {}", target.id);
            return false;
        }
        if self.view == ViewMode::List {
            log::debug!("list view: drag on {} ignored", target.id);
            return false;
        }
        let drag_z = self.drag_z_index;
        let Some(visual) = self.visuals.get_mut(&target.id) else {
            log::debug!("drag target {} is not a rendered note", target.id);
            return false;
        };

        // Pin a flowing note where it currently sits so it does not jump.
        if visual.placement == Placement::Flow {
            visual.placement = Placement::Absolute(container.to_local(target.rect.origin()));
        }
        visual.z_index = drag_z;
        visual.dragging = true;

        self.pending_restores.retain(|(n, _)| *n != target.id);
        self.session = Some(DragSession {
            note: target.id,
            pointer_offset: input.client - target.rect.origin(),
        });
        self.staged = None;

        if input.is_touch() {
            input.prevent_scroll();
        }
        log::debug!("drag start {} at {:?}", target.id, input.client);
        true
    }

    /// Stage the note position for the current pointer sample.
    pub fn update(&mut self, input: &PointerInput, container: &ContainerMetrics) -> FrameRequest {
        let Some(session) = self.session else {
            return FrameRequest::Idle;
        };
        if input.is_touch() {
            input.prevent_scroll();
        }
        let top_left = container.to_local(input.client - session.pointer_offset);
        log::trace!("drag {} → {:?}", session.note, top_left);
        match self.staged.replace(top_left) {
            None => FrameRequest::Schedule,
            Some(_) => FrameRequest::Coalesced,
        }
    }

    /// Animation-frame callback: apply the staged position, if any.
    pub fn on_animation_frame(&mut self) -> Option<(NoteId, Point)> {
        let position = self.staged.take()?;
        let session = self.session?;
        if self.view == ViewMode::List {
            return None;
        }
        let visual = self.visuals.get_mut(&session.note)?;
        visual.placement = Placement::Absolute(position);
        Some((session.note, position))
    }

    /// Finish the gesture. Flushes a staged frame, clears the dragging mark
    /// and schedules the stacking restore. Returns the note and its final
    /// container-local position.
    pub fn end(&mut self, now_ms: f64) -> Option<(NoteId, Point)> {
        self.on_animation_frame();
        let session = self.session.take()?;
        let visual = self.visuals.get_mut(&session.note)?;
        visual.dragging = false;
        self.pending_restores
            .push((session.note, now_ms + self.restore_delay_ms));
        log::debug!("drag end {}", session.note);
        match visual.placement {
            Placement::Absolute(p) => Some((session.note, p)),
            Placement::Flow => None,
        }
    }

    /// Apply stacking restores that are due. Returns the notes restored.
    pub fn tick(&mut self, now_ms: f64) -> SmallVec<[NoteId; 2]> {
        let mut restored = SmallVec::new();
        let rest = self.rest_z_index;
        self.pending_restores.retain(|(id, due)| {
            if *due > now_ms {
                return true;
            }
            restored.push(*id);
            false
        });
        for id in &restored {
            if let Some(visual) = self.visuals.get_mut(id) {
                visual.z_index = rest;
            }
        }
        restored
    }
}
