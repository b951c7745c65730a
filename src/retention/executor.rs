// src/retention/executor.rs
use log::{info, warn};

use crate::core::DeleteError;
use crate::dvr::{DvrApi, Episode};

/// Issues one delete command per episode. Never retries.
pub struct DeletionExecutor<'a> {
    dvr: &'a dyn DvrApi,
}

impl<'a> DeletionExecutor<'a> {
    pub fn new(dvr: &'a dyn DvrApi) -> Self {
        Self { dvr }
    }

    /// Returns the id that was deleted. An episode without a resolvable id
    /// fails without touching the network.
    pub fn delete(&self, episode: &Episode) -> Result<String, DeleteError> {
        let title = episode.show_title();
        let episode_title = episode.episode_title();

        let Some(id) = episode.recording_id() else {
            warn!(
                "[cleanup] could not extract recording ID for {} - {}",
                title, episode_title
            );
            return Err(DeleteError::MissingId);
        };

        match self.dvr.delete_recording(&id) {
            Ok(()) => {
                info!("[cleanup] deleted: {} - {} (ID: {})", title, episode_title, id);
                Ok(id)
            }
            Err(e) => {
                warn!("[cleanup] failed to delete {} - {}: {}", title, episode_title, e);
                Err(e.into())
            }
        }
    }
}
