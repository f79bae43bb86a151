pub mod board;
pub mod history;
pub mod input;
pub mod positioner;
pub mod shortcuts;
pub mod tools;
pub mod whiteboard;

pub use board::{CategoryError, NoteBoard};
pub use history::{Snapshot, SnapshotStack};
pub use input::{PointerInput, PointerKind};
pub use positioner::{FrameRequest, NoteTarget, NoteVisual, Placement, Positioner};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::ToolKind;
pub use whiteboard::{StrokeOutcome, StrokeState, TextPrompt, Whiteboard};
