//! Combat support
//!
//! Cross-cutting combat infrastructure shared by the graphical and headless
//! modes. The simulation itself lives in `states::arena`.

pub mod log;

pub use log::{CombatLog, CombatLogEntry, CombatLogEventType};
