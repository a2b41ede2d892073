pub mod core;
pub mod engine;
pub mod ws;

pub use core::messages;
pub use engine::GameRegistry;
