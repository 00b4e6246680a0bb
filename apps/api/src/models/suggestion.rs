use serde::{Deserialize, Serialize};

/// Number of description characters shown on a library card before truncation.
pub const EXCERPT_CHARS: usize = 150;

/// One proposed project, as returned by a provider and as kept in the saved library.
///
/// `title` doubles as the identifier inside the library; there is no separate id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRecord {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub difficulty: String,
}

impl SuggestionRecord {
    pub fn difficulty_level(&self) -> DifficultyLevel {
        DifficultyLevel::classify(&self.difficulty)
    }

    /// Description cut to [`EXCERPT_CHARS`] characters, suffixed with `...` when cut.
    pub fn excerpt(&self) -> String {
        if self.description.chars().count() > EXCERPT_CHARS {
            let head: String = self.description.chars().take(EXCERPT_CHARS).collect();
            format!("{head}...")
        } else {
            self.description.clone()
        }
    }
}

/// Canonical difficulty buckets. Anything unrecognised lands in `Unknown`.
/// Purely a display hint; nothing branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Unknown,
}

impl DifficultyLevel {
    pub fn classify(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "beginner" => DifficultyLevel::Beginner,
            "intermediate" => DifficultyLevel::Intermediate,
            "advanced" => DifficultyLevel::Advanced,
            _ => DifficultyLevel::Unknown,
        }
    }
}

/// A library listing row: the stored record plus its presentation hints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    #[serde(flatten)]
    pub record: SuggestionRecord,
    pub difficulty_level: DifficultyLevel,
    pub excerpt: String,
}

impl From<SuggestionRecord> for LibraryItem {
    fn from(record: SuggestionRecord) -> Self {
        Self {
            difficulty_level: record.difficulty_level(),
            excerpt: record.excerpt(),
            record,
        }
    }
}
