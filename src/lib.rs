// Library surface for the typing engine; the binary only adds the terminal loop.
pub mod clock;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod passage;
pub mod runtime;
pub mod session;
pub mod sink;
pub mod time_series;
pub mod typing_policy;
pub mod ui;
pub mod validator;

pub use config::Config;
pub use engine::SessionOrchestrator;
pub use error::EngineError;
pub use passage::{Passage, Tier};

/// Interval between clock ticks driven by the terminal front end
pub const TICK_RATE_MS: u64 = 100;
