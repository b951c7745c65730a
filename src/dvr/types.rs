// src/dvr/types.rs
use log::debug;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Group key for episodes that arrive without a title.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// One entry of `recorded_files.json`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ShowEntry {
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "EpisodesURL", default)]
    pub episodes_url: Option<String>,
}

/// Identifier fields are strings on current firmware, numbers on some older units.
#[derive(Debug, Clone, PartialEq)]
pub enum FileId {
    Text(String),
    Number(u64),
}

impl FileId {
    fn as_id(&self) -> Option<String> {
        match self {
            FileId::Text(s) if s.trim().is_empty() => None,
            FileId::Text(s) => Some(s.trim().to_string()),
            FileId::Number(n) => Some(n.to_string()),
        }
    }
}

/// A single recorded program as returned by a show's episode list.
/// Fields with an unexpected type decode as absent so one odd record does not
/// fail the whole list.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Episode {
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "EpisodeTitle", default)]
    pub episode_title: Option<String>,
    #[serde(rename = "StartTime", default, deserialize_with = "lenient_start_time")]
    pub start_time: Option<i64>,
    #[serde(rename = "CmdURL", default)]
    pub cmd_url: Option<String>,
    #[serde(rename = "PlayURL", default)]
    pub play_url: Option<String>,
    #[serde(rename = "FileID", default, deserialize_with = "lenient_file_id")]
    pub file_id: Option<FileId>,
    /// Title of the show entry the episode was listed under. Set by the fetcher.
    #[serde(skip)]
    pub series_title: Option<String>,
}

impl Episode {
    pub fn show_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN_TITLE)
    }

    pub fn episode_title(&self) -> &str {
        self.episode_title.as_deref().unwrap_or("")
    }

    /// Seconds since the epoch, 0 when the DVR did not report one.
    pub fn start_time(&self) -> i64 {
        self.start_time.unwrap_or(0)
    }

    /// Recording id used by the delete command.
    ///
    /// Checked in order: the `id` query parameter of `CmdURL`, the same
    /// parameter of `PlayURL`, then the bare `FileID` field.
    pub fn recording_id(&self) -> Option<String> {
        self.cmd_url
            .as_deref()
            .and_then(query_id)
            .or_else(|| self.play_url.as_deref().and_then(query_id))
            .or_else(|| self.file_id.as_ref().and_then(FileId::as_id))
    }
}

/// Integer seconds, a float (truncated) or a numeric string. Anything else is dropped.
fn lenient_start_time<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    if parsed.is_none() && !value.is_null() {
        debug!("[dvr] ignoring unusable StartTime {}", value);
    }
    Ok(parsed)
}

/// A string or a non-negative integer. Anything else is dropped.
fn lenient_file_id<'de, D>(deserializer: D) -> Result<Option<FileId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::String(s) => Some(FileId::Text(s.clone())),
        Value::Number(n) => n.as_u64().map(FileId::Number),
        _ => None,
    };
    if parsed.is_none() && !value.is_null() {
        debug!("[dvr] ignoring unusable FileID {}", value);
    }
    Ok(parsed)
}

/// Extracts the value of the `id` parameter from a URL or a bare query string.
pub fn query_id(url: &str) -> Option<String> {
    let query = match url.split_once('?') {
        Some((_, q)) => q,
        None => url,
    };
    let query = query.split('#').next().unwrap_or(query);

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "id")
        .and_then(|(_, value)| {
            let value = urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string());
            if value.is_empty() {
                None
            } else {
                Some(value)
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_cmd_url() {
        let ep = Episode {
            cmd_url: Some("http://10.0.0.2/recorded/cmd?cmd=x&id=42&foo=bar".into()),
            play_url: Some("http://10.0.0.2/recorded/play.ts?id=99".into()),
            file_id: Some(FileId::Text("7".into())),
            ..Default::default()
        };
        assert_eq!(ep.recording_id().as_deref(), Some("42"));
    }

    #[test]
    fn test_id_from_bare_query_fragment() {
        assert_eq!(query_id("...&id=42&...").as_deref(), Some("42"));
        assert_eq!(query_id("cmd=delete&id=abc%2F1").as_deref(), Some("abc/1"));
        assert_eq!(query_id("http://x/play?fileid=3"), None);
        assert_eq!(query_id("http://x/play?id="), None);
    }

    #[test]
    fn test_id_falls_back_to_play_url() {
        let ep = Episode {
            cmd_url: Some("http://10.0.0.2/recorded/cmd".into()),
            play_url: Some("http://10.0.0.2/recorded/play.ts?id=99".into()),
            ..Default::default()
        };
        assert_eq!(ep.recording_id().as_deref(), Some("99"));
    }

    #[test]
    fn test_empty_cmd_id_falls_through() {
        let ep = Episode {
            cmd_url: Some("http://10.0.0.2/recorded/cmd?id=".into()),
            play_url: Some("http://10.0.0.2/recorded/play.ts?id=99".into()),
            ..Default::default()
        };
        assert_eq!(ep.recording_id().as_deref(), Some("99"));

        let ep = Episode {
            cmd_url: Some("http://10.0.0.2/recorded/cmd?id=".into()),
            ..Default::default()
        };
        assert_eq!(ep.recording_id(), None);
    }

    #[test]
    fn test_show_entry_ignores_extra_keys() {
        let entry: ShowEntry = serde_json::from_str(
            r#"{ "SeriesID": "C1", "Title": "News", "EpisodesURL": "http://x/e?SeriesID=C1" }"#,
        )
        .unwrap();
        assert_eq!(entry.title.as_deref(), Some("News"));
        assert_eq!(entry.episodes_url.as_deref(), Some("http://x/e?SeriesID=C1"));
    }

    #[test]
    fn test_id_falls_back_to_file_id() {
        let ep = Episode {
            file_id: Some(FileId::Text("file-7".into())),
            ..Default::default()
        };
        assert_eq!(ep.recording_id().as_deref(), Some("file-7"));

        let ep = Episode {
            play_url: Some("http://10.0.0.2/recorded/play.ts".into()),
            file_id: Some(FileId::Number(12)),
            ..Default::default()
        };
        assert_eq!(ep.recording_id().as_deref(), Some("12"));
    }

    #[test]
    fn test_no_id() {
        assert_eq!(Episode::default().recording_id(), None);

        let ep = Episode {
            file_id: Some(FileId::Text(" ".into())),
            ..Default::default()
        };
        assert_eq!(ep.recording_id(), None);
    }

    #[test]
    fn test_defaults_for_absent_fields() {
        let ep: Episode = serde_json::from_str(r#"{ "EpisodeTitle": "Pilot" }"#).unwrap();
        assert_eq!(ep.show_title(), UNKNOWN_TITLE);
        assert_eq!(ep.episode_title(), "Pilot");
        assert_eq!(ep.start_time(), 0);
    }

    #[test]
    fn test_parse_dvr_episode() {
        let json = r#"{
            "Category": "series",
            "ChannelNumber": "5.1",
            "CmdURL": "http://192.168.1.20:80/recorded/cmd?id=a1b2",
            "EpisodeTitle": "Tuesday",
            "FileID": 31337,
            "PlayURL": "http://192.168.1.20:80/recorded/play?id=a1b2",
            "StartTime": 1700000000,
            "Title": "Nightly News"
        }"#;
        let ep: Episode = serde_json::from_str(json).unwrap();
        assert_eq!(ep.show_title(), "Nightly News");
        assert_eq!(ep.start_time(), 1_700_000_000);
        assert_eq!(ep.file_id, Some(FileId::Number(31337)));
        assert_eq!(ep.recording_id().as_deref(), Some("a1b2"));
    }

    #[test]
    fn test_odd_field_types_only_affect_their_record() {
        let json = r#"[
            { "Title": "A", "StartTime": 1, "FileID": "f1" },
            { "Title": "A", "StartTime": "2", "FileID": 7 },
            { "Title": "A", "StartTime": 3.9, "FileID": -1 },
            { "Title": "A", "StartTime": "soon", "FileID": 1.5 },
            { "Title": "A", "StartTime": null, "FileID": { "id": 1 } }
        ]"#;
        let eps: Vec<Episode> = serde_json::from_str(json).unwrap();

        assert_eq!(eps.len(), 5);
        let starts: Vec<i64> = eps.iter().map(Episode::start_time).collect();
        assert_eq!(starts, vec![1, 2, 3, 0, 0]);

        assert_eq!(eps[0].recording_id().as_deref(), Some("f1"));
        assert_eq!(eps[1].recording_id().as_deref(), Some("7"));
        assert_eq!(eps[2].recording_id(), None);
        assert_eq!(eps[3].recording_id(), None);
        assert_eq!(eps[4].recording_id(), None);
    }
}
