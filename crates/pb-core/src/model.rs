//! Core data model for pinboard documents.
//!
//! Notes are stored as flat JSON records (one array under the `notes` key),
//! so field names and value shapes follow the wire format: positions are
//! pixel strings (`"120px"`), colors are CSS strings, dates are RFC 3339.

use crate::css::{format_px, parse_px};
use crate::id::NoteId;
use crate::search::category_label;
use chrono::{DateTime, Utc};
use kurbo::Point;
use serde::{Deserialize, Serialize};

// ─── Colors ──────────────────────────────────────────────────────────────

/// 8-bit RGBA color, the native format of the whiteboard raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        match bytes.len() {
            3 | 4 => {
                let r = hex_val(bytes[0])? * 17;
                let g = hex_val(bytes[1])? * 17;
                let b = hex_val(bytes[2])? * 17;
                let a = match bytes.get(3) {
                    Some(&c) => hex_val(c)? * 17,
                    None => 255,
                };
                Some(Self::rgba(r, g, b, a))
            }
            6 | 8 => {
                let r = hex_val(bytes[0])? << 4 | hex_val(bytes[1])?;
                let g = hex_val(bytes[2])? << 4 | hex_val(bytes[3])?;
                let b = hex_val(bytes[4])? << 4 | hex_val(bytes[5])?;
                let a = if bytes.len() == 8 {
                    hex_val(bytes[6])? << 4 | hex_val(bytes[7])?
                } else {
                    255
                };
                Some(Self::rgba(r, g, b, a))
            }
            _ => None,
        }
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Convert HSL (hue in degrees, saturation and lightness in 0..=1).
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 360.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);

        if s == 0.0 {
            let v = channel(l);
            return Self::rgb(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::rgb(
            channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            channel(hue_to_rgb(p, q, h)),
            channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
        )
    }
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

// ─── Notes ───────────────────────────────────────────────────────────────

pub const DEFAULT_CATEGORY: &str = "none";
pub const DEFAULT_NOTE_COLOR: &str = "#fff9b1";

/// Absolute note placement inside the notes container, as CSS pixel strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub left: String,
    pub top: String,
}

impl Position {
    pub fn from_point(p: Point) -> Self {
        Self {
            left: format_px(p.x),
            top: format_px(p.y),
        }
    }

    /// Numeric top-left corner. `None` if either coordinate is not a pixel
    /// length (e.g. hand-edited storage).
    pub fn to_point(&self) -> Option<Point> {
        Some(Point::new(parse_px(&self.left)?, parse_px(&self.top)?))
    }
}

/// One sticky note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_color")]
    pub color: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub pinned: bool,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_color() -> String {
    DEFAULT_NOTE_COLOR.to_string()
}

impl Note {
    /// Build a note from user input. Empty category and color fall back to
    /// the defaults.
    pub fn new(draft: NoteDraft, date: DateTime<Utc>) -> Self {
        let category = if draft.category.trim().is_empty() {
            default_category()
        } else {
            draft.category
        };
        let color = if draft.color.trim().is_empty() {
            default_color()
        } else {
            draft.color
        };
        Self {
            id: NoteId::generate(),
            title: draft.title,
            text: draft.text,
            category,
            color,
            date,
            position: None,
            pinned: false,
        }
    }

    /// Short human date, e.g. `Mar 4, 09:15`.
    pub fn display_date(&self) -> String {
        self.date.format("%b %-d, %H:%M").to_string()
    }

    pub fn has_category(&self) -> bool {
        !self.category.is_empty() && self.category != DEFAULT_CATEGORY
    }
}

/// A note as the page renders it: the stored record plus display fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCard<'a> {
    #[serde(flatten)]
    pub note: &'a Note,
    pub display_date: String,
    /// Badge text; absent for uncategorized notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_label: Option<String>,
}

impl<'a> From<&'a Note> for NoteCard<'a> {
    fn from(note: &'a Note) -> Self {
        Self {
            note,
            display_date: note.display_date(),
            category_label: note
                .has_category()
                .then(|| category_label(&note.category)),
        }
    }
}

/// User input for a new note.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub category: String,
    pub color: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// A draft needs a title or body; whitespace alone does not count.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.text.trim().is_empty()
    }
}

/// A single editable note field. Position is deliberately absent: it only
/// changes through drag gestures.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteField {
    Title(String),
    Text(String),
    Category(String),
    Color(String),
}

impl NoteField {
    /// Map a DOM field name (`title`, `text`, `category`, `color`).
    pub fn from_name(name: &str, value: String) -> Option<Self> {
        match name {
            "title" => Some(Self::Title(value)),
            "text" => Some(Self::Text(value)),
            "category" => Some(Self::Category(value)),
            "color" => Some(Self::Color(value)),
            _ => None,
        }
    }

    pub fn apply(self, note: &mut Note) {
        match self {
            Self::Title(v) => note.title = v,
            Self::Text(v) => note.text = v,
            Self::Category(v) => note.category = v,
            Self::Color(v) => note.color = v,
        }
    }
}

// ─── Layout mode ─────────────────────────────────────────────────────────

/// Grid view places notes freely (absolute); list view stacks them in
/// normal document flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

// ─── Settings ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Sepia,
}

impl Theme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "sepia" => Some(Self::Sepia),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Sepia => "sepia",
        }
    }
}

/// UI settings record, persisted under the `settings` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    pub font_size: u32,
    pub auto_save: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            font_size: 14,
            auto_save: true,
        }
    }
}

impl Settings {
    /// Dark ↔ light. Sepia switches to dark.
    pub fn toggle_dark_mode(&mut self) {
        self.theme = match self.theme {
            Theme::Dark => Theme::Light,
            Theme::Light | Theme::Sepia => Theme::Dark,
        };
    }
}
