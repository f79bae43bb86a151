//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. On macOS
//! `meta` is ⌘; elsewhere `ctrl` plays the same role.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Persist notes, categories and settings.
    SaveAll,
    /// Move focus to the new-note title field.
    FocusNewNote,
    /// Submit the new-note form.
    AddNote,
    /// Whiteboard undo.
    Undo,
    /// Close the whiteboard and any open modal.
    CloseOverlays,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a `KeyboardEvent.key` plus modifiers. `None` if unbound.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        _shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd {
            return match key {
                "s" | "S" => Some(ShortcutAction::SaveAll),
                "n" | "N" => Some(ShortcutAction::FocusNewNote),
                "Enter" => Some(ShortcutAction::AddNote),
                "z" | "Z" => Some(ShortcutAction::Undo),
                _ => None,
            };
        }

        match key {
            "Escape" => Some(ShortcutAction::CloseOverlays),
            _ => None,
        }
    }
}
