use std::fmt;
use thiserror::Error;

/// Color used for cells whose subject is not in the catalog.
pub const FALLBACK_COLOR: &str = "#ddd";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    pub id: &'static str,
    pub name: &'static str,
    pub glyph: &'static str,
    pub color: &'static str,
}

const CATALOG: [Subject; 4] = [
    Subject {
        id: "math",
        name: "Math",
        glyph: "📐",
        color: "#3b82f6",
    },
    Subject {
        id: "eng",
        name: "English",
        glyph: "📚",
        color: "#fb7185",
    },
    Subject {
        id: "bio",
        name: "Biology",
        glyph: "🧬",
        color: "#10b981",
    },
    Subject {
        id: "hist",
        name: "History",
        glyph: "🏺",
        color: "#f59e0b",
    },
];

impl Subject {
    pub fn catalog() -> &'static [Subject] {
        &CATALOG
    }

    pub fn find(id: &str) -> Option<&'static Subject> {
        CATALOG.iter().find(|subject| subject.id == id)
    }

    pub fn lookup(id: &str) -> Result<&'static Subject, UnknownSubject> {
        Self::find(id).ok_or_else(|| UnknownSubject(id.to_string()))
    }

    /// Subject preselected in the picker.
    pub fn default_subject() -> &'static Subject {
        &CATALOG[0]
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.glyph, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown subject '{0}'")]
pub struct UnknownSubject(pub String);
