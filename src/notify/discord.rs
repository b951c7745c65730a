// src/notify/discord.rs
use std::time::Duration;

use log::debug;
use serde_json::{Value, json};

use super::{Category, Notifier};
use crate::config::DiscordConfig;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DiscordNotifier {
    settings: DiscordConfig,
    webhook_url: Option<String>,
    agent: ureq::Agent,
}

impl DiscordNotifier {
    /// A missing or empty `webhook_url` disables delivery whatever `settings` say.
    pub fn new(settings: DiscordConfig, webhook_url: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(WEBHOOK_TIMEOUT).build();
        Self {
            settings,
            webhook_url: webhook_url.filter(|u| !u.trim().is_empty()),
            agent,
        }
    }

    pub fn is_enabled_for(&self, category: Category) -> bool {
        if !self.settings.enabled {
            return false;
        }
        match category {
            Category::Startup => self.settings.notify_on_startup,
            Category::Info | Category::Success | Category::Warning => {
                self.settings.notify_on_cleanup
            }
            Category::Error => self.settings.notify_on_error,
        }
    }

    pub fn payload(message: &str, category: Category) -> Value {
        let timestamp = chrono::Utc::now()
            .format("%Y-%m-%dT%H:%M:%S.000Z")
            .to_string();
        json!({
            "embeds": [{
                "description": message,
                "color": category.color(),
                "timestamp": timestamp,
            }]
        })
    }

    fn send(&self, url: &str, message: &str, category: Category) -> Result<(), ureq::Error> {
        self.agent
            .post(url)
            .set("Content-Type", "application/json")
            .send_string(&Self::payload(message, category).to_string())?;
        Ok(())
    }
}

impl Notifier for DiscordNotifier {
    fn notify(&self, message: &str, category: Category) {
        if !self.is_enabled_for(category) {
            return;
        }

        let Some(url) = self.webhook_url.as_deref() else {
            debug!("[notify] webhook URL not configured");
            return;
        };

        match self.send(url, message, category) {
            Ok(()) => debug!(
                "[notify] sent: {}...",
                message.chars().take(50).collect::<String>()
            ),
            Err(e) => debug!("[notify] failed to send notification: {}", e),
        }
    }
}
