use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Persisted per-day totals: ISO date -> subject -> whole minutes.
///
/// Both levels keep insertion order; the aggregator folds in that order and
/// subject colors follow from it.
pub type Records = IndexMap<String, IndexMap<String, u32>>;

pub const DEFAULT_SUBJECTS: [&str; 5] = ["Math", "Japanese", "English", "Science", "Social Studies"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    #[serde(rename = "timer")]
    Countdown,
    #[serde(rename = "stopwatch")]
    Stopwatch,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Countdown => "Timer",
            Mode::Stopwatch => "Stopwatch",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Mode::Countdown => Mode::Stopwatch,
            Mode::Stopwatch => Mode::Countdown,
        }
    }
}

/// Window used to scope aggregation of historical records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Range {
    Day,
    Week,
    Month,
}

impl Range {
    pub const ALL: [Range; 3] = [Range::Day, Range::Week, Range::Month];

    pub fn label(self) -> &'static str {
        match self {
            Range::Day => "Day",
            Range::Week => "Week",
            Range::Month => "Month",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Range::Day => Range::Week,
            Range::Week => Range::Month,
            Range::Month => Range::Day,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Range::Day => Range::Month,
            Range::Week => Range::Day,
            Range::Month => Range::Week,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: Mode,
    pub subjects: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            subjects: DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Settings {
    /// Appends a subject unless it is blank or already listed.
    /// Returns the stored name when the list changed.
    pub fn add_subject(&mut self, name: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() || self.subjects.iter().any(|s| s == name) {
            return None;
        }
        self.subjects.push(name.to_string());
        Some(name.to_string())
    }

    /// Drops blank and repeated entries; an empty list falls back to the defaults.
    pub fn normalized(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.subjects.len());
        for subject in self.subjects.drain(..) {
            let subject = subject.trim().to_string();
            if !subject.is_empty() && !seen.contains(&subject) {
                seen.push(subject);
            }
        }
        self.subjects = if seen.is_empty() {
            Settings::default().subjects
        } else {
            seen
        };
        self
    }
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_uses_persisted_names() {
        assert_eq!(serde_json::to_string(&Mode::Countdown).unwrap(), "\"timer\"");
        assert_eq!(serde_json::to_string(&Mode::Stopwatch).unwrap(), "\"stopwatch\"");
        let mode: Mode = serde_json::from_str("\"stopwatch\"").unwrap();
        assert_eq!(mode, Mode::Stopwatch);
    }

    #[test]
    fn add_subject_ignores_blank_and_duplicates() {
        let mut settings = Settings::default();
        let before = settings.subjects.len();
        assert_eq!(settings.add_subject("   "), None);
        assert_eq!(settings.add_subject("Math"), None);
        assert_eq!(settings.add_subject(" Physics "), Some("Physics".to_string()));
        assert_eq!(settings.subjects.len(), before + 1);
        assert_eq!(settings.subjects.last().map(String::as_str), Some("Physics"));
    }

    #[test]
    fn partial_settings_blob_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"mode":"stopwatch"}"#).unwrap();
        assert_eq!(settings.mode, Mode::Stopwatch);
        assert_eq!(settings.subjects.len(), DEFAULT_SUBJECTS.len());
    }

    #[test]
    fn normalized_dedupes_and_falls_back() {
        let settings = Settings {
            mode: Mode::Countdown,
            subjects: vec!["A".into(), "A".into(), " ".into(), "B".into()],
        }
        .normalized();
        assert_eq!(settings.subjects, vec!["A".to_string(), "B".to_string()]);

        let empty = Settings {
            mode: Mode::Countdown,
            subjects: Vec::new(),
        }
        .normalized();
        assert_eq!(empty.subjects, Settings::default().subjects);
    }

    #[test]
    fn date_keys_round_trip() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(date_key(date), "2024-06-01");
        assert_eq!(parse_date_key("2024-06-01"), Some(date));
        assert_eq!(parse_date_key("June 1st"), None);
    }
}
