mod engine;
mod ticker;

pub use engine::{Poll, StartOutcome, TickOutcome, TimerEngine, TimerStatus};
pub use ticker::Ticker;
