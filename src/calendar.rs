use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Day of the week, ordered Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown day {0:?}")]
pub struct DayParseError(pub String);

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Position in the week, Monday = 0 through Sunday = 6.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ordinal)).copied()
    }

    /// The day of the week a calendar date falls on.
    pub fn of(date: NaiveDate) -> Self {
        Self::from(date.weekday())
    }

    pub fn is_weekend(self) -> bool {
        matches!(self, Day::Saturday | Day::Sunday)
    }

    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    /// Inclusive membership in the circular range `start..=end`.
    ///
    /// When `end` precedes `start` the range wraps past Sunday, so
    /// Friday..=Monday covers Friday, Saturday, Sunday and Monday.
    pub fn in_range(self, start: Day, end: Day) -> bool {
        let (day, start, end) = (self.ordinal(), start.ordinal(), end.ordinal());
        if start <= end {
            start <= day && day <= end
        } else {
            day >= start || day <= end
        }
    }
}

pub fn is_weekend(day: Day) -> bool {
    day.is_weekend()
}

pub fn is_day_in_range(day: Day, start: Day, end: Day) -> bool {
    day.in_range(start, end)
}

impl From<Weekday> for Day {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Mon => Day::Monday,
            Weekday::Tue => Day::Tuesday,
            Weekday::Wed => Day::Wednesday,
            Weekday::Thu => Day::Thursday,
            Weekday::Fri => Day::Friday,
            Weekday::Sat => Day::Saturday,
            Weekday::Sun => Day::Sunday,
        }
    }
}

impl From<Day> for Weekday {
    fn from(value: Day) -> Self {
        match value {
            Day::Monday => Weekday::Mon,
            Day::Tuesday => Weekday::Tue,
            Day::Wednesday => Weekday::Wed,
            Day::Thursday => Weekday::Thu,
            Day::Friday => Weekday::Fri,
            Day::Saturday => Weekday::Sat,
            Day::Sunday => Weekday::Sun,
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Day {
    type Err = DayParseError;

    /// Accepts full names or three-letter abbreviations in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Day::ALL
            .into_iter()
            .find(|day| {
                let label = day.label().to_ascii_lowercase();
                label == needle || label[..3] == needle
            })
            .ok_or_else(|| DayParseError(s.to_string()))
    }
}

/// One checkbox per day of the week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySelection([bool; 7]);

impl DaySelection {
    pub fn from_days<'a, I>(days: I) -> Self
    where
        I: IntoIterator<Item = &'a Day>,
    {
        let mut selection = Self::default();
        for day in days {
            selection.set(*day, true);
        }
        selection
    }

    pub fn set(&mut self, day: Day, selected: bool) {
        self.0[usize::from(day.ordinal())] = selected;
    }

    pub fn is_selected(&self, day: Day) -> bool {
        self.0[usize::from(day.ordinal())]
    }

    /// Selected days in calendar order.
    pub fn to_days(&self) -> Vec<Day> {
        Day::ALL
            .into_iter()
            .filter(|day| self.is_selected(*day))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|selected| **selected).count()
    }
}

/// Short human summary of a set of active days.
pub fn describe_active_days(days: &[Day]) -> String {
    let selection = DaySelection::from_days(days);
    let mut weekdays = Day::ALL.iter().filter(|day| !day.is_weekend());
    let weekend = [Day::Saturday, Day::Sunday];

    if days.is_empty() {
        return "No days selected".to_string();
    }
    if selection.count() == 7 {
        return "Every day".to_string();
    }
    if selection.count() == 5 && weekdays.all(|day| selection.is_selected(*day)) {
        return "Weekdays".to_string();
    }
    if selection.count() == 2 && weekend.iter().all(|day| selection.is_selected(*day)) {
        return "Weekends".to_string();
    }

    // first occurrence wins, so the user's ordering survives
    let mut seen = DaySelection::default();
    days.iter()
        .filter(|day| {
            let first = !seen.is_selected(**day);
            seen.set(**day, true);
            first
        })
        .map(|day| day.label())
        .collect::<Vec<_>>()
        .join(", ")
}
