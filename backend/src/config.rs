use std::env;
use std::time::Duration;

const DEFAULT_DATABASE_URL: &str = "sqlite:wordrush.db?mode=rwc";

pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// How often running games re-check their round countdown
    pub tick_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            tick_interval: env::var("TICK_INTERVAL_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_millis(250)),
        }
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
