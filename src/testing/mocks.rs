use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::core::{DvrError, DvrResult};
use crate::dvr::{DvrApi, Episode, ShowEntry};
use crate::notify::{Category, Notifier};

/// In-memory DVR. Deletes succeed unless a status was scripted for the id.
#[derive(Default)]
pub struct MockDvr {
    shows: Vec<ShowEntry>,
    episodes: HashMap<String, Vec<Episode>>,
    failing_urls: HashSet<String>,
    show_list_fails: bool,
    delete_statuses: HashMap<String, u16>,
    delete_calls: Mutex<Vec<String>>,
}

impl MockDvr {
    pub fn new() -> Self {
        Self::default()
    }

    fn episodes_url(title: &str) -> String {
        format!("mock://episodes/{}", title)
    }

    pub fn with_show(mut self, title: &str, episodes: Vec<Episode>) -> Self {
        let url = Self::episodes_url(title);
        self.shows.push(ShowEntry {
            title: Some(title.to_string()),
            episodes_url: Some(url.clone()),
        });
        self.episodes.insert(url, episodes);
        self
    }

    pub fn with_failing_show(mut self, title: &str) -> Self {
        let url = Self::episodes_url(title);
        self.shows.push(ShowEntry {
            title: Some(title.to_string()),
            episodes_url: Some(url.clone()),
        });
        self.failing_urls.insert(url);
        self
    }

    pub fn with_show_entry_without_url(mut self, title: &str) -> Self {
        self.shows.push(ShowEntry {
            title: Some(title.to_string()),
            ..Default::default()
        });
        self
    }

    pub fn with_show_list_failure(mut self) -> Self {
        self.show_list_fails = true;
        self
    }

    pub fn with_delete_status(mut self, id: &str, status: u16) -> Self {
        self.delete_statuses.insert(id.to_string(), status);
        self
    }

    /// Ids passed to `delete_recording`, in call order.
    pub fn delete_calls(&self) -> Vec<String> {
        self.delete_calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl DvrApi for MockDvr {
    fn list_shows(&self) -> DvrResult<Vec<ShowEntry>> {
        if self.show_list_fails {
            return Err(DvrError::transport("mock://recorded_files.json", "connection refused"));
        }
        Ok(self.shows.clone())
    }

    fn list_episodes(&self, episodes_url: &str) -> DvrResult<Vec<Episode>> {
        if self.failing_urls.contains(episodes_url) {
            return Err(DvrError::Status {
                url: episodes_url.to_string(),
                status: 500,
            });
        }
        Ok(self
            .episodes
            .get(episodes_url)
            .cloned()
            .unwrap_or_default())
    }

    fn delete_recording(&self, id: &str) -> DvrResult<()> {
        if let Ok(mut calls) = self.delete_calls.lock() {
            calls.push(id.to_string());
        }
        match self.delete_statuses.get(id).copied().unwrap_or(200) {
            200 => Ok(()),
            status => Err(DvrError::Status {
                url: format!("mock://recorded/cmd?cmd=delete&id={}", id),
                status,
            }),
        }
    }
}

/// Keeps every message it is handed.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(Category, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(Category, String)> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    pub fn messages_of(&self, category: Category) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(c, _)| *c == category)
            .map(|(_, m)| m)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, category: Category) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((category, message.to_string()));
        }
    }
}
