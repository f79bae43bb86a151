pub mod config;
pub mod css;
pub mod export;
pub mod geometry;
pub mod id;
pub mod model;
pub mod search;
pub mod storage;

pub use config::{BoardConfig, WhiteboardConfig};
pub use css::{format_px, parse_color, parse_px};
pub use export::{ExportFile, ExportFormat, export_notes};
pub use geometry::{ContainerMetrics, Point, Rect, Vec2, screen_to_local};
pub use id::NoteId;
pub use model::*;
pub use storage::{KeyValueStore, MemoryStore, Persistence, StorageError, keys};
