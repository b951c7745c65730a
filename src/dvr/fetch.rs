// src/dvr/fetch.rs
use log::{info, warn};

use super::client::DvrApi;
use super::types::Episode;
use crate::notify::{Category, Notifier};

/// Walks `recorded_files.json` and every show's episode list into one flat list.
///
/// A failed show list yields an empty result. A failed episode list only drops
/// that show.
pub fn fetch_recordings(dvr: &dyn DvrApi, notifier: &dyn Notifier) -> Vec<Episode> {
    let shows = match dvr.list_shows() {
        Ok(shows) => shows,
        Err(e) => {
            warn!("[dvr] failed to get recordings: {}", e);
            notifier.notify(
                &format!("❌ Failed to get recordings from DVR: {}", e),
                Category::Error,
            );
            return Vec::new();
        }
    };

    let mut all_episodes = Vec::new();

    for show in &shows {
        let Some(url) = show.episodes_url.as_deref().filter(|u| !u.is_empty()) else {
            continue;
        };
        let show_title = show.title.as_deref().unwrap_or_default();

        match dvr.list_episodes(url) {
            Ok(episodes) => {
                all_episodes.extend(episodes.into_iter().map(|mut ep| {
                    ep.series_title = show.title.clone();
                    ep
                }));
            }
            Err(e) => {
                warn!("[dvr] failed to load episodes for {}: {}", show_title, e);
                notifier.notify(
                    &format!(
                        "⚠️ Failed to load episodes for **{}**: {}",
                        show_title, e
                    ),
                    Category::Error,
                );
            }
        }
    }

    info!(
        "[dvr] found {} total episodes across {} series",
        all_episodes.len(),
        shows.len()
    );

    all_episodes
}
