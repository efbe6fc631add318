// Library surface for the binary, headless tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod difficulty;
pub mod engine;
pub mod history;
pub mod question_generator;
pub mod runtime;
pub mod session;
pub mod store;
pub mod ui;
pub mod util;

/// Interval between ticks driving countdowns and animations
pub const TICK_RATE_MS: u64 = 100;
