//! Category filtering, text search and render ordering.

use crate::model::Note;

/// Category filter value that matches every note.
pub const ALL_CATEGORIES: &str = "all";

/// Categories offered on first start.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["work", "personal", "other"];

/// Normalize a user-entered category name: lower-case, whitespace runs
/// collapsed to `-`. Returns `None` for blank input.
pub fn normalize_category(name: &str) -> Option<String> {
    let words: Vec<String> = name.split_whitespace().map(str::to_lowercase).collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join("-"))
    }
}

/// Display label for a category (`personal` → `Personal`).
pub fn category_label(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn in_category(note: &Note, category: &str) -> bool {
    category == ALL_CATEGORIES || note.category == category
}

/// Case-insensitive substring match over title and body.
pub fn matches_query(note: &Note, query: &str) -> bool {
    let needle = query.to_lowercase();
    note.title.to_lowercase().contains(&needle) || note.text.to_lowercase().contains(&needle)
}

/// Notes visible under `category`, pinned notes moved to the end so they
/// render on top. Relative order is otherwise insertion order.
pub fn arrange<'a>(notes: &'a [Note], category: &str) -> Vec<&'a Note> {
    pinned_last(notes.iter().filter(|n| in_category(n, category)))
}

/// Search across every note. An empty query falls back to the category view.
pub fn search<'a>(notes: &'a [Note], query: &str, category: &str) -> Vec<&'a Note> {
    if query.is_empty() {
        return arrange(notes, category);
    }
    pinned_last(notes.iter().filter(|n| matches_query(n, query)))
}

fn pinned_last<'a>(notes: impl Iterator<Item = &'a Note>) -> Vec<&'a Note> {
    let (pinned, loose): (Vec<&Note>, Vec<&Note>) = notes.partition(|n| n.pinned);
    loose.into_iter().chain(pinned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NoteDraft;
    use chrono::Utc;

    fn note(title: &str, text: &str, category: &str, pinned: bool) -> Note {
        let mut n = Note::new(NoteDraft::new(title, text).with_category(category), Utc::now());
        n.pinned = pinned;
        n
    }

    #[test]
    fn category_normalization() {
        assert_eq!(normalize_category("  Side   Projects "), Some("side-projects".into()));
        assert_eq!(normalize_category("   "), None);
        assert_eq!(category_label("personal"), "Personal");
    }

    #[test]
    fn pinned_notes_render_last() {
        let notes = vec![
            note("a", "", "work", true),
            note("b", "", "work", false),
            note("c", "", "personal", false),
        ];
        let titles: Vec<&str> = arrange(&notes, ALL_CATEGORIES)
            .iter()
            .map(|n| n.title.as_str())
            .collect();
        assert_eq!(titles, vec!["b", "c", "a"]);

        let work: Vec<&str> = arrange(&notes, "work").iter().map(|n| n.title.as_str()).collect();
        assert_eq!(work, vec!["b", "a"]);
    }

    #[test]
    fn search_matches_title_or_text_ignoring_case() {
        let notes = vec![
            note("Shopping", "Milk and eggs", "none", false),
            note("Ideas", "buy a MILK frother", "none", false),
            note("Work", "standup", "work", false),
        ];
        let hits: Vec<&str> = search(&notes, "milk", "work")
            .iter()
            .map(|n| n.title.as_str())
            .collect();
        assert_eq!(hits, vec!["Shopping", "Ideas"]);
        assert_eq!(search(&notes, "", "work").len(), 1);
    }
}
