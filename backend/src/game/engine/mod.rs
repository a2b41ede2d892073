pub mod active_game;
pub mod clock;
pub mod registry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use registry::{EngineError, GameRegistry, NewGame};
