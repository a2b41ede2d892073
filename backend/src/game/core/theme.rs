use serde::{Deserialize, Serialize};

/// A themed word list from the catalog. Read-only for the lifetime of a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub language: String,
    pub difficulty: String,
    pub words: Vec<String>,
    /// Team-name suggestions shown when setting up a game
    pub teams: Vec<String>,
}

/// Catalog listing entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThemeSummary {
    pub id: String,
    pub name: String,
    pub language: String,
    pub difficulty: String,
    pub word_count: i64,
}
