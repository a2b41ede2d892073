use crate::themes::ThemeFile;
use sqlx::SqlitePool;
use std::collections::HashSet;

/// Statistics from an import operation
#[derive(Debug, Default, PartialEq)]
pub struct ImportStats {
    /// Themes written to the database
    pub themes: usize,
    /// Word rows inserted across all themes
    pub words: usize,
    /// Blank or repeated words dropped before insert
    pub skipped_words: usize,
    /// Themes left out because no usable word remained
    pub skipped_themes: usize,
}

/// Trim words and drop blanks and repeats, keeping first occurrence order
fn clean_words(words: &[String]) -> (Vec<String>, usize) {
    let mut seen = HashSet::new();
    let cleaned: Vec<String> = words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty() && seen.insert(w.to_string()))
        .map(str::to_string)
        .collect();
    let skipped = words.len() - cleaned.len();
    (cleaned, skipped)
}

/// Import themes into the catalog.
///
/// A theme that already exists is replaced along with its words and teams.
/// Each theme is written in its own transaction.
pub async fn import_themes(
    pool: &SqlitePool,
    themes: Vec<ThemeFile>,
) -> Result<ImportStats, Box<dyn std::error::Error>> {
    let mut stats = ImportStats::default();

    for theme in themes {
        let (words, skipped) = clean_words(&theme.words);
        stats.skipped_words += skipped;
        if words.is_empty() {
            println!("  Skipping theme {:?}: no words", theme.id);
            stats.skipped_themes += 1;
            continue;
        }

        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM theme_words WHERE theme_id = ?")
            .bind(&theme.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM theme_teams WHERE theme_id = ?")
            .bind(&theme.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO themes (id, name, language, difficulty) VALUES (?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                language = excluded.language,
                difficulty = excluded.difficulty",
        )
        .bind(&theme.id)
        .bind(&theme.name)
        .bind(&theme.language)
        .bind(&theme.difficulty)
        .execute(&mut *tx)
        .await?;

        for (position, word) in words.iter().enumerate() {
            sqlx::query("INSERT INTO theme_words (theme_id, position, word) VALUES (?, ?, ?)")
                .bind(&theme.id)
                .bind(position as i64)
                .bind(word)
                .execute(&mut *tx)
                .await?;
        }

        let teams = theme.teams.iter().map(|t| t.trim()).filter(|t| !t.is_empty());
        for (position, team) in teams.enumerate() {
            sqlx::query("INSERT INTO theme_teams (theme_id, position, name) VALUES (?, ?, ?)")
                .bind(&theme.id)
                .bind(position as i64)
                .bind(team)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        stats.themes += 1;
        stats.words += words.len();
    }

    Ok(stats)
}
