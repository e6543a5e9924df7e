use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::error::Error;

static SNIPPET_DIR: Dir = include_dir!("src/snippets");

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Rust,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

/// One practice target. Immutable for the duration of a session; the core
/// treats `code` as opaque text and only requires it to be non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub title: String,
    pub language: Language,
    pub category: String,
    pub level: Level,
    pub description: String,
    /// What running the snippet would print; shown after completion.
    #[serde(default)]
    pub output: Option<String>,
    pub code: String,
}

/// The embedded snippet collection, one JSON file per language.
#[derive(Debug, Clone)]
pub struct Catalog {
    snippets: Vec<Snippet>,
}

impl Catalog {
    /// Parse every embedded snippet file. Snippets with empty code are
    /// dropped rather than let an unplayable target into a deck.
    pub fn load() -> Result<Self, Box<dyn Error>> {
        let mut snippets = Vec::new();
        for file in SNIPPET_DIR.files() {
            let text = file
                .contents_utf8()
                .ok_or_else(|| format!("snippet file {:?} is not utf-8", file.path()))?;
            let batch: Vec<Snippet> = serde_json::from_str(text)?;
            snippets.extend(batch.into_iter().filter(|s| !s.code.is_empty()));
        }
        snippets.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(Self { snippets })
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    pub fn all(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn by_id(&self, id: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    /// The ordered deck matching the given filters. `None` means "all".
    pub fn deck(&self, language: Option<Language>, category: Option<&str>) -> Vec<Snippet> {
        self.snippets
            .iter()
            .filter(|s| language.map_or(true, |l| s.language == l))
            .filter(|s| category.map_or(true, |c| s.category.eq_ignore_ascii_case(c)))
            .cloned()
            .collect()
    }

    /// Distinct categories, in catalog order.
    pub fn categories(&self) -> Vec<String> {
        self.snippets
            .iter()
            .map(|s| s.category.clone())
            .unique()
            .collect()
    }
}
