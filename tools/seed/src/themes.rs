use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A theme definition as written in a theme JSON file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ThemeFile {
    pub id: String,
    pub name: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    pub words: Vec<String>,
    /// Suggested team names, shown first when creating a game
    #[serde(default)]
    pub teams: Vec<String>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_difficulty() -> String {
    "medium".to_string()
}

/// Parse a single theme file, or every `*.json` file in a directory.
///
/// A file may hold one theme object or an array of them.
pub fn parse_themes(path: &Path) -> Result<Vec<ThemeFile>, Box<dyn std::error::Error>> {
    if !path.is_dir() {
        return parse_theme_file(path);
    }

    let mut files: Vec<_> = fs::read_dir(path)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();

    let mut themes = Vec::new();
    for file in files {
        themes.extend(parse_theme_file(&file)?);
    }
    Ok(themes)
}

fn parse_theme_file(path: &Path) -> Result<Vec<ThemeFile>, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    parse_theme_json(&contents).map_err(|e| format!("{}: {e}", path.display()).into())
}

pub fn parse_theme_json(contents: &str) -> Result<Vec<ThemeFile>, serde_json::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(ThemeFile),
        Many(Vec<ThemeFile>),
    }

    Ok(match serde_json::from_str(contents)? {
        OneOrMany::One(theme) => vec![theme],
        OneOrMany::Many(themes) => themes,
    })
}
