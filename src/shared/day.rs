use std::{fmt, str::FromStr};

use chrono::{Datelike, Local, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Day of the week as stored in the schedule calendar.
///
/// The single-letter codes are part of the store format and must not change:
/// `d m t w y f s` for Sunday through Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayCode {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown day code {0:?}")]
pub struct ParseDayCodeError(pub String);

impl DayCode {
    pub const ALL: [DayCode; 7] = [
        DayCode::Sunday,
        DayCode::Monday,
        DayCode::Tuesday,
        DayCode::Wednesday,
        DayCode::Thursday,
        DayCode::Friday,
        DayCode::Saturday,
    ];

    pub fn today() -> Self {
        Local::now().weekday().into()
    }

    pub const fn code(&self) -> char {
        match self {
            DayCode::Sunday => 'd',
            DayCode::Monday => 'm',
            DayCode::Tuesday => 't',
            DayCode::Wednesday => 'w',
            DayCode::Thursday => 'y',
            DayCode::Friday => 'f',
            DayCode::Saturday => 's',
        }
    }

    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'd' => Some(DayCode::Sunday),
            'm' => Some(DayCode::Monday),
            't' => Some(DayCode::Tuesday),
            'w' => Some(DayCode::Wednesday),
            'y' => Some(DayCode::Thursday),
            'f' => Some(DayCode::Friday),
            's' => Some(DayCode::Saturday),
            _ => None,
        }
    }

    /// Parses a calendar day string such as `"mtwyf"`, skipping unknown letters.
    pub fn parse_days(days: &str) -> Box<[DayCode]> {
        days.chars().filter_map(DayCode::from_code).collect()
    }
}

impl From<Weekday> for DayCode {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Sun => DayCode::Sunday,
            Weekday::Mon => DayCode::Monday,
            Weekday::Tue => DayCode::Tuesday,
            Weekday::Wed => DayCode::Wednesday,
            Weekday::Thu => DayCode::Thursday,
            Weekday::Fri => DayCode::Friday,
            Weekday::Sat => DayCode::Saturday,
        }
    }
}

impl fmt::Display for DayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for DayCode {
    type Err = ParseDayCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => {
                DayCode::from_code(code).ok_or_else(|| ParseDayCodeError(s.to_string()))
            }
            _ => Err(ParseDayCodeError(s.to_string())),
        }
    }
}

impl TryFrom<String> for DayCode {
    type Error = ParseDayCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayCode> for String {
    fn from(value: DayCode) -> Self {
        value.code().to_string()
    }
}
