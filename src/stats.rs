use chrono::{DateTime, Datelike, Local, LocalResult, NaiveDate, NaiveTime, TimeZone};
use tracing::debug;

use crate::types::{Range, Records, parse_date_key};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Per-subject minute totals for one range, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    entries: Vec<(String, u32)>,
}

impl Totals {
    pub fn add(&mut self, subject: &str, minutes: u32) {
        match self.entries.iter_mut().find(|(name, _)| name == subject) {
            Some((_, total)) => *total = total.saturating_add(minutes),
            None => self.entries.push((subject.to_string(), minutes)),
        }
    }

    pub fn get(&self, subject: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(name, _)| name == subject)
            .map(|(_, minutes)| *minutes)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(name, minutes)| (name.as_str(), *minutes))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sum(&self) -> u64 {
        self.entries.iter().map(|(_, minutes)| u64::from(*minutes)).sum()
    }

    pub fn max(&self) -> u32 {
        self.entries.iter().map(|(_, minutes)| *minutes).max().unwrap_or(0)
    }
}

impl<'a> FromIterator<(&'a str, u32)> for Totals {
    fn from_iter<I: IntoIterator<Item = (&'a str, u32)>>(iter: I) -> Self {
        let mut totals = Totals::default();
        for (subject, minutes) in iter {
            totals.add(subject, minutes);
        }
        totals
    }
}

pub fn compute_range_totals(records: &Records, range: Range, now: DateTime<Local>) -> Totals {
    let mut totals = Totals::default();
    for (key, subjects) in records {
        let Some(date) = parse_date_key(key) else {
            debug!(key = %key, "skipping record with malformed date");
            continue;
        };
        if !in_range(date, range, now) {
            continue;
        }
        for (subject, minutes) in subjects {
            totals.add(subject, *minutes);
        }
    }
    totals
}

fn in_range(date: NaiveDate, range: Range, now: DateTime<Local>) -> bool {
    match range {
        Range::Day => days_since(date, now) < 1.0,
        Range::Week => days_since(date, now) < 7.0,
        Range::Month => date.month() == now.month() && date.year() == now.year(),
    }
}

/// Fractional days between local midnight of `date` and `now`.
fn days_since(date: NaiveDate, now: DateTime<Local>) -> f64 {
    let start = local_start_of_day(date);
    now.signed_duration_since(start).num_milliseconds() as f64 / MILLIS_PER_DAY
}

fn local_start_of_day(date: NaiveDate) -> DateTime<Local> {
    let naive = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => Local.from_utc_datetime(&naive),
    }
}
