// src/core/mod.rs
pub mod error;

pub use error::{ConfigError, DeleteError, DvrError, DvrResult};
