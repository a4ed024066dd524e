use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid clock time {0:?} (expected HH:MM, 00:00 to 23:59)")]
pub struct TimeParseError(pub String);

/// A wall-clock time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    hours: u8,
    minutes: u8,
}

impl ClockTime {
    pub fn new(hours: u8, minutes: u8) -> Option<Self> {
        if hours > 23 || minutes > 59 {
            return None;
        }
        Some(Self { hours, minutes })
    }

    /// Parses `H:MM` or `HH:MM`. Minutes must always have two digits.
    pub fn parse(value: &str) -> Result<Self, TimeParseError> {
        let err = || TimeParseError(value.to_string());
        let (hours_s, minutes_s) = value.split_once(':').ok_or_else(err)?;
        if hours_s.is_empty() || hours_s.len() > 2 || minutes_s.len() != 2 {
            return Err(err());
        }
        if !hours_s.bytes().chain(minutes_s.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let hours: u8 = hours_s.parse().map_err(|_| err())?;
        let minutes: u8 = minutes_s.parse().map_err(|_| err())?;
        Self::new(hours, minutes).ok_or_else(err)
    }

    pub fn from_minutes(total: u32) -> Option<Self> {
        if total >= MINUTES_PER_DAY {
            return None;
        }
        Self::new((total / 60) as u8, (total % 60) as u8)
    }

    pub fn hours(self) -> u8 {
        self.hours
    }

    pub fn minute(self) -> u8 {
        self.minutes
    }

    /// Minutes since midnight.
    pub fn minutes(self) -> u32 {
        u32::from(self.hours) * 60 + u32::from(self.minutes)
    }

    /// 12-hour rendering, e.g. `9:05 AM`.
    pub fn format_12h(self) -> String {
        let period = if self.hours >= 12 { "PM" } else { "AM" };
        let display_hours = match self.hours % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", display_hours, self.minutes, period)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}

impl FromStr for ClockTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

pub fn is_valid_time(value: &str) -> bool {
    ClockTime::parse(value).is_ok()
}

pub fn time_to_minutes(value: &str) -> Option<u32> {
    ClockTime::parse(value).ok().map(ClockTime::minutes)
}

/// True when both values are valid clock times and `start` is strictly earlier than `end`.
pub fn is_time_range_valid(start: &str, end: &str) -> bool {
    match (time_to_minutes(start), time_to_minutes(end)) {
        (Some(start), Some(end)) => start < end,
        _ => false,
    }
}

/// How long a flexible task takes each time it is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskDuration {
    pub hours: u32,
    pub minutes: u32,
}

impl TaskDuration {
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self { hours, minutes }
    }

    pub fn total_minutes(&self) -> u32 {
        self.hours * 60 + self.minutes
    }
}

impl Default for TaskDuration {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

impl fmt::Display for TaskDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.hours, self.minutes) {
            (0, m) => write!(f, "{m}m"),
            (h, 0) => write!(f, "{h}h"),
            (h, m) => write!(f, "{h}h {m}m"),
        }
    }
}
