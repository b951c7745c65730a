// src/dvr/mod.rs

pub mod client;
pub mod fetch;
pub mod types;

pub use client::{DvrApi, HttpDvr, REQUEST_TIMEOUT};
pub use fetch::fetch_recordings;
pub use types::{Episode, FileId, ShowEntry, UNKNOWN_TITLE};
