use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for note IDs.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Interned identifier of a sticky note.
///
/// Notes are looked up by id on every drag frame and every DOM callback,
/// so the id is a 4-byte `Copy` handle rather than an owned `String`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteId(Spur);

impl NoteId {
    /// Intern an existing id string (e.g. read back from storage or the DOM).
    pub fn intern(s: &str) -> Self {
        NoteId(INTERNER.get_or_intern(s))
    }

    /// Look up an id without interning it. Returns `None` for strings that
    /// were never seen, which means no note can carry that id.
    pub fn lookup(s: &str) -> Option<Self> {
        INTERNER.get(s).map(NoteId)
    }

    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a fresh random id (UUID v4, hyphen-less).
    pub fn generate() -> Self {
        let raw = uuid::Uuid::new_v4().simple().to_string();
        Self::intern(&raw)
    }
}

impl fmt::Debug for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NoteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(NoteId::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = NoteId::intern("k3j9x0");
        let b = NoteId::intern("k3j9x0");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "k3j9x0");
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = NoteId::generate();
        let b = NoteId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn lookup_does_not_intern() {
        assert!(NoteId::lookup("never-seen-note-id").is_none());
        let id = NoteId::intern("seen-note-id");
        assert_eq!(NoteId::lookup("seen-note-id"), Some(id));
    }
}
