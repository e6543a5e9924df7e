// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod autotype;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod feedback;
pub mod metrics;
pub mod modes;
pub mod report;
pub mod runtime;
pub mod session;
pub mod validate;

/// UI refresh cadence; the bot is paced independently of this.
pub const TICK_RATE_MS: u64 = 100;
