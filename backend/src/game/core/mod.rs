pub mod cheat_guard;
pub mod error;
pub mod events;
pub mod messages;
pub mod scoreboard;
pub mod session;
pub mod settings;
pub mod snapshot;
mod snapshot_repository;
pub mod state;
mod theme;
mod theme_repository;
pub mod timer;
pub mod word_queue;

pub use snapshot_repository::SnapshotRepository;
pub use theme::{Theme, ThemeSummary};
pub use theme_repository::ThemeRepository;
