//! Headless mode
//!
//! Run arena simulations without graphics for automated testing and
//! batch analysis.

pub mod config;
pub mod runner;

pub use config::HeadlessArenaConfig;
pub use runner::{run_headless_arena, ArenaReport, ArenaRunResult, EnemyResult};
