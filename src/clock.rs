//! Requested snooze times.
//!
//! The voice platform hands us either a clock time (`"13:30"`) or a coarse
//! period code (`"MO"`, `"AF"`, `"EV"`, `"NI"`). Both are parsed into
//! [`RequestedTime`], which always normalizes to a concrete [`ClockTime`].

use crate::error::SkillError;
use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static CLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?\d|2[0-3]):([0-5]\d)$").expect("valid clock regex"));

/// Coarse time-of-day periods the voice platform can resolve a spoken time to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPeriod {
    /// Parse a period token, accepting both platform codes and plain words.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "mo" | "morning" => Some(DayPeriod::Morning),
            "af" | "afternoon" => Some(DayPeriod::Afternoon),
            "ev" | "evening" => Some(DayPeriod::Evening),
            "ni" | "night" => Some(DayPeriod::Night),
            _ => None,
        }
    }

    pub fn clock_time(self) -> ClockTime {
        match self {
            DayPeriod::Morning => ClockTime { hour: 9, minute: 0 },
            DayPeriod::Afternoon => ClockTime { hour: 13, minute: 0 },
            DayPeriod::Evening => ClockTime { hour: 19, minute: 0 },
            DayPeriod::Night => ClockTime { hour: 21, minute: 0 },
        }
    }
}

/// A wall-clock time of day in 24-hour form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    hour: u32,
    minute: u32,
}

impl ClockTime {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = CLOCK_RE
            .captures(s.trim())
            .ok_or_else(|| SkillError::InvalidTime(s.to_string()))?;
        let hour = caps[1].parse().map_err(|_| SkillError::InvalidTime(s.to_string()))?;
        let minute = caps[2].parse().map_err(|_| SkillError::InvalidTime(s.to_string()))?;
        ClockTime::new(hour, minute).ok_or_else(|| SkillError::InvalidTime(s.to_string()))
    }
}

/// The time a user asked to be left alone until.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedTime {
    Period(DayPeriod),
    Clock(ClockTime),
}

impl RequestedTime {
    pub fn normalize(self) -> ClockTime {
        match self {
            RequestedTime::Period(period) => period.clock_time(),
            RequestedTime::Clock(time) => time,
        }
    }
}

impl FromStr for RequestedTime {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(period) = DayPeriod::from_token(s) {
            return Ok(RequestedTime::Period(period));
        }
        s.parse().map(RequestedTime::Clock)
    }
}

/// String-level normalization: period tokens become their `HH:mm` time and
/// anything else is returned untouched.
pub fn normalize_time_token(input: &str) -> String {
    match DayPeriod::from_token(input) {
        Some(period) => period.clock_time().to_string(),
        None => input.to_string(),
    }
}
