// src/retention/mod.rs

pub mod cleanup;
pub mod executor;
pub mod policy;

pub use cleanup::{Cleanup, CleanupReport, DeleteFailure, PassOutcome, ShowReport};
pub use executor::DeletionExecutor;
pub use policy::{CountRetention, RetentionPolicy, ShowGroups, ShowPlan};
