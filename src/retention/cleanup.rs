// src/retention/cleanup.rs
use log::{debug, error, info};

use super::executor::DeletionExecutor;
use super::policy::{self, CountRetention, ShowPlan};
use crate::config::Config;
use crate::dvr::{self, DvrApi, Episode};
use crate::notify::{Category, Notifier};

/// Deleted titles listed by name in a show notification before summarising.
const LISTED_EPISODES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    NoRecordings,
    NoMatch { target: String, available: Vec<String> },
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    pub episode_title: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowReport {
    pub title: String,
    pub total: usize,
    pub keep: u32,
    pub attempted: usize,
    /// Episode titles, oldest first.
    pub deleted: Vec<String>,
    pub failures: Vec<DeleteFailure>,
}

impl ShowReport {
    pub fn needed_cleanup(&self) -> bool {
        self.attempted > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub outcome: PassOutcome,
    pub shows: Vec<ShowReport>,
}

impl CleanupReport {
    fn empty(outcome: PassOutcome) -> Self {
        Self {
            outcome,
            shows: Vec::new(),
        }
    }

    pub fn show(&self, title: &str) -> Option<&ShowReport> {
        self.shows.iter().find(|s| s.title == title)
    }

    /// Shows with at least one successful delete.
    pub fn shows_cleaned(&self) -> usize {
        self.shows.iter().filter(|s| !s.deleted.is_empty()).count()
    }

    pub fn total_deleted(&self) -> usize {
        self.shows.iter().map(|s| s.deleted.len()).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.shows.iter().map(|s| s.failures.len()).sum()
    }
}

/// One fetch, group, trim and delete pass.
pub struct Cleanup<'a> {
    config: &'a Config,
    dvr: &'a dyn DvrApi,
    notifier: &'a dyn Notifier,
}

impl<'a> Cleanup<'a> {
    pub fn new(config: &'a Config, dvr: &'a dyn DvrApi, notifier: &'a dyn Notifier) -> Self {
        Self {
            config,
            dvr,
            notifier,
        }
    }

    /// `target` limits the pass to shows whose title contains it (any case).
    /// `max_episodes` replaces every configured retention count.
    pub fn run(&self, target: Option<&str>, max_episodes: Option<u32>) -> CleanupReport {
        let recordings = dvr::fetch_recordings(self.dvr, self.notifier);
        if recordings.is_empty() {
            info!("[cleanup] no recordings found");
            return CleanupReport::empty(PassOutcome::NoRecordings);
        }

        let mut groups = policy::group_by_show(recordings);

        if let Some(target) = target {
            let available: Vec<String> = groups.keys().cloned().collect();
            groups = policy::filter_shows(groups, target);

            if groups.is_empty() {
                error!("[cleanup] no show found matching '{}'", target);
                info!("[cleanup] available shows: {}", available.join(", "));
                self.notifier.notify(
                    &format!("❌ No show found matching **'{}'**", target),
                    Category::Error,
                );
                return CleanupReport::empty(PassOutcome::NoMatch {
                    target: target.to_string(),
                    available,
                });
            }

            if groups.len() > 1 {
                info!("[cleanup] multiple shows match '{}':", target);
                for title in groups.keys() {
                    info!("[cleanup]   - {}", title);
                }
            }
        }

        let retention = CountRetention::new(self.config, max_episodes);
        let executor = DeletionExecutor::new(self.dvr);

        let shows: Vec<ShowReport> = policy::plan_all(groups, &retention)
            .into_iter()
            .map(|plan| self.clean_show(&executor, plan))
            .collect();

        let report = CleanupReport {
            outcome: PassOutcome::Completed,
            shows,
        };

        if report.total_deleted() > 0 {
            self.notifier.notify(
                &format!(
                    "✅ **Cleanup Complete**\nProcessed {} show(s)\nDeleted {} recording(s)",
                    report.shows_cleaned(),
                    report.total_deleted()
                ),
                Category::Info,
            );
        }

        report
    }

    fn clean_show(&self, executor: &DeletionExecutor<'_>, plan: ShowPlan) -> ShowReport {
        let mut report = ShowReport {
            title: plan.title.clone(),
            total: plan.total,
            keep: plan.keep,
            attempted: plan.to_delete.len(),
            deleted: Vec::new(),
            failures: Vec::new(),
        };

        if !plan.needs_cleanup() {
            debug!(
                "[cleanup] {}: {} recordings (no cleanup needed, keeping {})",
                plan.title, plan.total, plan.keep
            );
            return report;
        }

        info!(
            "[cleanup] {}: {} recordings → trimming to {}",
            plan.title, plan.total, plan.keep
        );
        debug!(
            "[cleanup] recordings to delete: {:?}",
            plan.to_delete
                .iter()
                .map(Episode::recording_id)
                .collect::<Vec<_>>()
        );

        for episode in &plan.to_delete {
            let episode_title = episode.episode_title().to_string();
            match executor.delete(episode) {
                Ok(_) => report.deleted.push(episode_title),
                Err(e) => report.failures.push(DeleteFailure {
                    episode_title,
                    reason: e.to_string(),
                }),
            }
        }

        info!(
            "[cleanup] successfully deleted {} of {} recordings",
            report.deleted.len(),
            report.attempted
        );

        if !report.deleted.is_empty() {
            self.notifier
                .notify(&show_summary(&report), Category::Success);
        }
        if !report.failures.is_empty() {
            self.notifier.notify(
                &format!(
                    "⚠️ **{}**\nFailed to delete {} of {} recordings",
                    report.title,
                    report.failures.len(),
                    report.attempted
                ),
                Category::Warning,
            );
        }

        report
    }
}

fn show_summary(report: &ShowReport) -> String {
    let mut listed: Vec<String> = report
        .deleted
        .iter()
        .take(LISTED_EPISODES)
        .map(|t| format!("• {}", t))
        .collect();
    if report.deleted.len() > LISTED_EPISODES {
        listed.push(format!(
            "• ...and {} more",
            report.deleted.len() - LISTED_EPISODES
        ));
    }

    format!(
        "🗑️ **{}**\nDeleted {} of {} recordings (keeping {})\n\n{}",
        report.title,
        report.deleted.len(),
        report.attempted,
        report.keep,
        listed.join("\n")
    )
}
