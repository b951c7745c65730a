// src/lib.rs
pub mod cli;
pub mod config;
pub mod core;
pub mod dvr;
pub mod notify;
pub mod retention;
pub mod runner;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::Config;
pub use dvr::{DvrApi, Episode, HttpDvr};
pub use notify::{Category, DiscordNotifier, Notifier};
pub use retention::{Cleanup, CleanupReport, PassOutcome};
pub use runner::Runner;
