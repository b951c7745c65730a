// src/runner.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::info;

use crate::cli::Mode;
use crate::config::Config;
use crate::dvr::{self, DvrApi};
use crate::notify::{Category, Notifier};
use crate::retention::policy;
use crate::retention::{Cleanup, CleanupReport};

/// Granularity of the wait between passes; bounds how late a shutdown is noticed.
const SLEEP_SLICE: Duration = Duration::from_millis(250);

pub struct Runner<'a> {
    config: &'a Config,
    dvr: &'a dyn DvrApi,
    notifier: &'a dyn Notifier,
}

impl<'a> Runner<'a> {
    pub fn new(config: &'a Config, dvr: &'a dyn DvrApi, notifier: &'a dyn Notifier) -> Self {
        Self {
            config,
            dvr,
            notifier,
        }
    }

    pub fn run(&self, mode: Mode, max_episodes: Option<u32>, running: &AtomicBool) {
        match mode {
            Mode::List => {
                self.list_shows();
            }
            Mode::Show(target) => {
                self.run_show(&target, max_episodes);
            }
            Mode::Once => {
                self.run_once(max_episodes);
            }
            Mode::Continuous => self.run_continuous(max_episodes, running),
        }
    }

    /// Show titles with their recording counts, sorted by title. Deletes nothing.
    pub fn list_shows(&self) -> Vec<(String, usize)> {
        let recordings = dvr::fetch_recordings(self.dvr, self.notifier);
        if recordings.is_empty() {
            info!("[runner] no recordings found");
            return Vec::new();
        }

        let shows: Vec<(String, usize)> = policy::group_by_show(recordings)
            .into_iter()
            .map(|(title, episodes)| (title, episodes.len()))
            .collect();

        info!("[runner] found {} shows:", shows.len());
        for (title, count) in &shows {
            info!("[runner]   {}: {} recordings", title, count);
        }
        shows
    }

    pub fn run_show(&self, target: &str, max_episodes: Option<u32>) -> CleanupReport {
        info!("[runner] running single cleanup for show matching '{}'", target);
        let report = self.cleanup().run(Some(target), max_episodes);
        info!("[runner] cleanup complete");
        report
    }

    pub fn run_once(&self, max_episodes: Option<u32>) -> CleanupReport {
        match max_episodes {
            Some(max) => info!(
                "[runner] running one-time cleanup (keeping {} per show, overriding config)",
                max
            ),
            None => {
                info!(
                    "[runner] running one-time cleanup (default: {} per show)",
                    self.config.default_episodes
                );
                if !self.config.show_overrides.is_empty() {
                    info!("[runner] show overrides: {:?}", self.config.show_overrides);
                }
            }
        }

        let report = self.cleanup().run(None, max_episodes);
        info!("[runner] cleanup complete");
        report
    }

    /// Runs passes back to back, `poll_interval_minutes` apart, until `running`
    /// is cleared. A pass in progress always finishes first.
    pub fn run_continuous(&self, max_episodes: Option<u32>, running: &AtomicBool) {
        match max_episodes {
            Some(max) => info!(
                "[runner] starting cleanup (keeping {} per show, overriding config)",
                max
            ),
            None => {
                info!(
                    "[runner] starting cleanup (default: {} per show)",
                    self.config.default_episodes
                );
                if !self.config.show_overrides.is_empty() {
                    info!(
                        "[runner] show overrides configured: {:?}",
                        self.config.show_overrides.keys().collect::<Vec<_>>()
                    );
                }
            }
        }
        info!(
            "[runner] polling every {} minute(s)",
            self.config.poll_interval_minutes
        );
        self.notifier
            .notify(&self.startup_message(max_episodes), Category::Startup);

        loop {
            self.cleanup().run(None, max_episodes);
            if !wait_while_running(self.config.poll_interval(), running) {
                break;
            }
        }

        info!("[runner] stopped");
    }

    pub fn startup_message(&self, max_episodes: Option<u32>) -> String {
        let header = "🚀 **DVR Cleanup Started**\nMode: Continuous monitoring";
        let interval = format!(
            "Poll interval: {} minute(s)",
            self.config.poll_interval_minutes
        );

        if let Some(max) = max_episodes {
            return format!(
                "{}\nKeeping: {} episodes per show (override)\n{}",
                header, max, interval
            );
        }

        let default = self.config.default_episodes;
        if self.config.show_overrides.is_empty() {
            return format!(
                "{}\nKeeping: {} episodes per show\n{}",
                header, default, interval
            );
        }

        let overrides: Vec<String> = self
            .config
            .show_overrides
            .iter()
            .map(|(show, count)| format!("• {}: {}", show, count))
            .collect();
        format!(
            "{}\nDefault: {} episodes per show\n{}\n\n**Show Overrides:**\n{}",
            header,
            default,
            interval,
            overrides.join("\n")
        )
    }

    fn cleanup(&self) -> Cleanup<'_> {
        Cleanup::new(self.config, self.dvr, self.notifier)
    }
}

/// Sleeps for `total` in short slices. Returns `false` as soon as `running` is cleared.
fn wait_while_running(total: Duration, running: &AtomicBool) -> bool {
    // no deadline when `total` is past what `Instant` can represent
    let deadline = Instant::now().checked_add(total);
    while running.load(Ordering::Relaxed) {
        let remaining = match deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()),
            None => SLEEP_SLICE,
        };
        if remaining.is_zero() {
            return true;
        }
        std::thread::sleep(SLEEP_SLICE.min(remaining));
    }
    false
}
