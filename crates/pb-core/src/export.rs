//! Note export: JSON, plain text and standalone HTML.

use crate::model::Note;
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Txt,
    Html,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "txt" => Ok(Self::Txt),
            "html" => Ok(Self::Html),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Txt => "txt",
            Self::Html => "html",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Txt => "text/plain",
            Self::Html => "text/html",
        }
    }
}

/// A rendered export, ready to hand to a download link.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub mime: &'static str,
    pub content: String,
}

pub fn export_notes(
    notes: &[Note],
    format: ExportFormat,
    now: DateTime<Utc>,
) -> Result<ExportFile, serde_json::Error> {
    let content = match format {
        ExportFormat::Json => serde_json::to_string_pretty(notes)?,
        ExportFormat::Txt => export_txt(notes),
        ExportFormat::Html => export_html(notes, now),
    };
    Ok(ExportFile {
        filename: format!("pinboard_notes.{}", format.extension()),
        mime: format.mime(),
        content,
    })
}

fn long_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn or_untitled(title: &str) -> &str {
    if title.is_empty() { "Untitled" } else { title }
}

fn export_txt(notes: &[Note]) -> String {
    let mut out = String::new();
    for note in notes {
        let _ = writeln!(out, "Title: {}", or_untitled(&note.title));
        let _ = writeln!(out, "Date: {}", long_date(&note.date));
        let _ = writeln!(out, "Category: {}\n", note.category);
        let _ = writeln!(out, "{}\n", note.text);
        out.push_str("------------------------\n\n");
    }
    out
}

fn export_html(notes: &[Note], now: DateTime<Utc>) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>Pinboard Export</title>\n<style>\n\
         body { font-family: sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }\n\
         .note { padding: 15px; margin-bottom: 20px; border-radius: 5px; }\n\
         .note-title { font-size: 18px; font-weight: bold; margin-bottom: 5px; }\n\
         .note-meta { color: #666; font-size: 12px; margin-bottom: 10px; }\n\
         .note-content { white-space: pre-wrap; }\n\
         </style>\n</head>\n<body>\n<h1>Pinboard Notes Export</h1>\n",
    );
    let _ = writeln!(out, "<p>Exported on {}</p>", long_date(&now));

    for note in notes {
        let _ = writeln!(
            out,
            "<div class=\"note\" style=\"background-color: {}\">",
            escape_html(&note.color)
        );
        let _ = writeln!(
            out,
            "<div class=\"note-title\">{}</div>",
            escape_html(or_untitled(&note.title))
        );
        let _ = writeln!(
            out,
            "<div class=\"note-meta\">Date: {}<br>Category: {}</div>",
            long_date(&note.date),
            escape_html(&note.category)
        );
        let _ = writeln!(
            out,
            "<div class=\"note-content\">{}</div>\n</div>",
            escape_html(&note.text)
        );
    }

    out.push_str("</body>\n</html>\n");
    out
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#039;Jerry&#039;&lt;/b&gt;"
        );
    }

    #[test]
    fn format_names() {
        assert_eq!("JSON".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert_eq!("html".parse::<ExportFormat>(), Ok(ExportFormat::Html));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
