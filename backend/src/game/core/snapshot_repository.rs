use sqlx::SqlitePool;

/// Key-value store for in-progress game state, keyed by game id
#[derive(Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn save(&self, game_id: &str, state: &str, saved_at: u64) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO game_snapshots (game_id, state, saved_at) VALUES ($1, $2, $3)
             ON CONFLICT(game_id) DO UPDATE SET state = excluded.state, saved_at = excluded.saved_at",
        )
        .bind(game_id)
        .bind(state)
        .bind(saved_at as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn load(&self, game_id: &str) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT state FROM game_snapshots WHERE game_id = $1")
                .bind(game_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(state,)| state))
    }

    pub async fn clear(&self, game_id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM game_snapshots WHERE game_id = $1")
            .bind(game_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
