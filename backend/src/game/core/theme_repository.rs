use super::error::CatalogError;
use super::theme::{Theme, ThemeSummary};
use sqlx::SqlitePool;

/// Read access to the theme catalog
#[derive(Clone)]
pub struct ThemeRepository {
    pool: SqlitePool,
}

impl ThemeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_theme(&self, id: &str) -> Result<Theme, CatalogError> {
        let row: Option<(String, String, String, String)> =
            sqlx::query_as("SELECT id, name, language, difficulty FROM themes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        let Some((id, name, language, difficulty)) = row else {
            return Err(CatalogError::NotFound(id.to_string()));
        };

        let words: Vec<(String,)> =
            sqlx::query_as("SELECT word FROM theme_words WHERE theme_id = $1 ORDER BY position")
                .bind(&id)
                .fetch_all(&self.pool)
                .await?;

        let teams: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM theme_teams WHERE theme_id = $1 ORDER BY position")
                .bind(&id)
                .fetch_all(&self.pool)
                .await?;

        Ok(Theme {
            id,
            name,
            language,
            difficulty,
            words: words.into_iter().map(|(w,)| w).collect(),
            teams: teams.into_iter().map(|(t,)| t).collect(),
        })
    }

    pub async fn list_themes(&self) -> Result<Vec<ThemeSummary>, CatalogError> {
        let rows: Vec<(String, String, String, String, i64)> = sqlx::query_as(
            "SELECT t.id, t.name, t.language, t.difficulty, COUNT(w.word)
             FROM themes t
             LEFT JOIN theme_words w ON w.theme_id = t.id
             GROUP BY t.id
             ORDER BY t.name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, language, difficulty, word_count)| ThemeSummary {
                id,
                name,
                language,
                difficulty,
                word_count,
            })
            .collect())
    }
}
