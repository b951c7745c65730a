// src/dvr/client.rs
use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;

use super::types::{Episode, ShowEntry};
use crate::core::{DvrError, DvrResult};

/// Every DVR call gives up after this long. There are no retries.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// The three DVR endpoints the cleanup consumes.
pub trait DvrApi {
    /// `GET /recorded_files.json`
    fn list_shows(&self) -> DvrResult<Vec<ShowEntry>>;

    /// `GET <EpisodesURL>` as handed out by [`DvrApi::list_shows`].
    fn list_episodes(&self, episodes_url: &str) -> DvrResult<Vec<Episode>>;

    /// `POST /recorded/cmd?cmd=delete&id=<id>`. Only HTTP 200 counts as success.
    fn delete_recording(&self, id: &str) -> DvrResult<()>;
}

pub struct HttpDvr {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpDvr {
    /// `address` is `host[:port]` as configured in `dvr_ip`.
    pub fn new(address: &str) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        let address = address.trim().trim_end_matches('/');
        let base_url = if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        };
        Self { base_url, agent }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn delete_url(&self, id: &str) -> String {
        format!(
            "{}/recorded/cmd?cmd=delete&id={}",
            self.base_url,
            urlencoding::encode(id)
        )
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> DvrResult<T> {
        let response = match self.agent.get(url).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(status, _)) => {
                return Err(DvrError::Status {
                    url: url.to_string(),
                    status,
                });
            }
            Err(e) => return Err(DvrError::transport(url, e.to_string())),
        };

        let body = response
            .into_string()
            .map_err(|e| DvrError::transport(url, e.to_string()))?;

        serde_json::from_str(&body).map_err(|source| DvrError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl DvrApi for HttpDvr {
    fn list_shows(&self) -> DvrResult<Vec<ShowEntry>> {
        let url = format!("{}/recorded_files.json", self.base_url);
        self.get_json(&url)
    }

    fn list_episodes(&self, episodes_url: &str) -> DvrResult<Vec<Episode>> {
        self.get_json(episodes_url)
    }

    fn delete_recording(&self, id: &str) -> DvrResult<()> {
        let url = self.delete_url(id);
        debug!("[dvr] deleting with URL: {}", url);

        let status = match self.agent.post(&url).call() {
            Ok(resp) => resp.status(),
            Err(ureq::Error::Status(status, _)) => status,
            Err(e) => return Err(DvrError::transport(url, e.to_string())),
        };
        debug!("[dvr] response: status={}", status);

        if status == 200 {
            Ok(())
        } else {
            Err(DvrError::Status { url, status })
        }
    }
}
