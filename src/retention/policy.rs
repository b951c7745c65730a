// src/retention/policy.rs
use std::collections::BTreeMap;

use crate::config::Config;
use crate::dvr::Episode;

/// Episodes of one pass, keyed by exact show title.
pub type ShowGroups = BTreeMap<String, Vec<Episode>>;

/// Decides how many of a show's newest episodes survive.
pub trait RetentionPolicy {
    fn keep_for(&self, title: &str) -> u32;
}

/// Count based retention: a global override beats a per-show override, which
/// beats the configured default.
pub struct CountRetention<'a> {
    config: &'a Config,
    global_override: Option<u32>,
}

impl<'a> CountRetention<'a> {
    pub fn new(config: &'a Config, global_override: Option<u32>) -> Self {
        Self {
            config,
            global_override,
        }
    }
}

impl RetentionPolicy for CountRetention<'_> {
    fn keep_for(&self, title: &str) -> u32 {
        self.global_override
            .or_else(|| self.config.show_override(title))
            .unwrap_or(self.config.default_episodes)
    }
}

pub fn group_by_show(episodes: Vec<Episode>) -> ShowGroups {
    let mut groups = ShowGroups::new();
    for ep in episodes {
        groups
            .entry(ep.show_title().to_string())
            .or_default()
            .push(ep);
    }
    groups
}

/// Keeps the groups whose title contains `target`, ignoring case.
/// An empty result is the "no match" case.
pub fn filter_shows(groups: ShowGroups, target: &str) -> ShowGroups {
    let needle = target.to_lowercase();
    groups
        .into_iter()
        .filter(|(title, _)| title.to_lowercase().contains(&needle))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShowPlan {
    pub title: String,
    pub total: usize,
    pub keep: u32,
    /// Oldest first.
    pub to_delete: Vec<Episode>,
}

impl ShowPlan {
    pub fn needs_cleanup(&self) -> bool {
        !self.to_delete.is_empty()
    }
}

/// Orders a show oldest first and cuts off everything but the newest `keep`
/// episodes. Equal or missing start times keep their fetch order.
pub fn plan_show(title: &str, mut episodes: Vec<Episode>, keep: u32) -> ShowPlan {
    let total = episodes.len();
    episodes.sort_by_key(Episode::start_time);

    let keep_count = usize::try_from(keep).unwrap_or(usize::MAX);
    if total <= keep_count {
        episodes.clear();
    } else {
        // keep == 0 leaves the whole group in the deletion set
        episodes.truncate(total - keep_count);
    }

    ShowPlan {
        title: title.to_string(),
        total,
        keep,
        to_delete: episodes,
    }
}

pub fn plan_all(groups: ShowGroups, policy: &dyn RetentionPolicy) -> Vec<ShowPlan> {
    groups
        .into_iter()
        .map(|(title, episodes)| {
            let keep = policy.keep_for(&title);
            plan_show(&title, episodes, keep)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dvr::UNKNOWN_TITLE;

    fn ep(title: Option<&str>, name: &str, start: Option<i64>) -> Episode {
        Episode {
            title: title.map(str::to_string),
            episode_title: Some(name.to_string()),
            start_time: start,
            ..Default::default()
        }
    }

    fn names(episodes: &[Episode]) -> Vec<&str> {
        episodes.iter().map(Episode::episode_title).collect()
    }

    fn show(n: i64) -> Vec<Episode> {
        (1..=n)
            .map(|t| ep(Some("S"), &t.to_string(), Some(t)))
            .collect()
    }

    #[test]
    fn test_keeps_newest_k() {
        for n in 1..=8 {
            for k in 1..n {
                let plan = plan_show("S", show(n), k as u32);
                assert_eq!(plan.to_delete.len(), (n - k) as usize);
                let deleted: Vec<i64> = plan.to_delete.iter().map(Episode::start_time).collect();
                assert_eq!(deleted, (1..=n - k).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn test_zero_deletes_everything() {
        for n in 0..5 {
            let plan = plan_show("S", show(n), 0);
            assert_eq!(plan.to_delete.len(), n as usize);
        }
    }

    #[test]
    fn test_small_group_is_untouched() {
        let plan = plan_show("S", show(3), 3);
        assert!(!plan.needs_cleanup());
        let plan = plan_show("S", show(2), 5);
        assert!(plan.to_delete.is_empty());
        assert_eq!(plan.total, 2);
    }

    #[test]
    fn test_unsorted_input_is_ordered_oldest_first() {
        let eps = vec![
            ep(Some("S"), "c", Some(30)),
            ep(Some("S"), "a", Some(10)),
            ep(Some("S"), "d", Some(40)),
            ep(Some("S"), "b", Some(20)),
        ];
        let plan = plan_show("S", eps, 1);
        assert_eq!(names(&plan.to_delete), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_keep_fetch_order() {
        let eps = vec![
            ep(Some("S"), "x1", Some(5)),
            ep(Some("S"), "none1", None),
            ep(Some("S"), "x2", Some(5)),
            ep(Some("S"), "none2", None),
            ep(Some("S"), "x3", Some(5)),
        ];
        let plan = plan_show("S", eps, 2);
        // missing start time sorts as 0
        assert_eq!(names(&plan.to_delete), vec!["none1", "none2", "x1"]);
    }

    #[test]
    fn test_grouping_by_exact_title() {
        let groups = group_by_show(vec![
            ep(Some("News"), "1", Some(1)),
            ep(Some("news"), "2", Some(2)),
            ep(None, "3", Some(3)),
            ep(Some("News"), "4", Some(4)),
        ]);
        assert_eq!(groups.len(), 3);
        assert_eq!(names(&groups["News"]), vec!["1", "4"]);
        assert_eq!(names(&groups[UNKNOWN_TITLE]), vec!["3"]);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let groups = group_by_show(vec![
            ep(Some("Nightly News"), "1", None),
            ep(Some("Morning News"), "2", None),
            ep(Some("Cartoons"), "3", None),
        ]);

        let matched = filter_shows(groups.clone(), "NEWS");
        assert_eq!(
            matched.keys().collect::<Vec<_>>(),
            vec!["Morning News", "Nightly News"]
        );

        assert!(filter_shows(groups.clone(), "weather").is_empty());
        assert_eq!(filter_shows(groups, "toon").len(), 1);
    }

    #[test]
    fn test_resolution_priority() {
        let mut config = Config::default();
        config.default_episodes = 4;
        config.show_overrides.insert("Special".into(), 2);
        config.show_overrides.insert("Purge".into(), 0);

        let policy = CountRetention::new(&config, None);
        assert_eq!(policy.keep_for("Special"), 2);
        assert_eq!(policy.keep_for("Purge"), 0);
        assert_eq!(policy.keep_for("special"), 4);
        assert_eq!(policy.keep_for("Other"), 4);

        let policy = CountRetention::new(&config, Some(7));
        assert_eq!(policy.keep_for("Special"), 7);
        assert_eq!(policy.keep_for("Other"), 7);

        let policy = CountRetention::new(&config, Some(0));
        assert_eq!(policy.keep_for("Special"), 0);
    }

    #[test]
    fn test_plan_all_uses_policy_per_show() {
        let mut config = Config::default();
        config.default_episodes = 1;
        config.show_overrides.insert("B".into(), 3);

        let mut eps = Vec::new();
        for t in 1..=3 {
            eps.push(ep(Some("A"), &format!("a{}", t), Some(t)));
            eps.push(ep(Some("B"), &format!("b{}", t), Some(t)));
        }

        let plans = plan_all(group_by_show(eps), &CountRetention::new(&config, None));
        assert_eq!(plans.len(), 2);
        assert_eq!(names(&plans[0].to_delete), vec!["a1", "a2"]);
        assert!(plans[1].to_delete.is_empty());
        assert_eq!(plans[1].keep, 3);
    }
}
