use std::{
    fmt,
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

use chrono::{Local, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

const HOUR_TO_SEC: u32 = 60 * 60;
const MINUTE_TO_SEC: u32 = 60;

/// Wall-clock time relative to the start of a service day.
///
/// Stored as seconds since midnight. Hours are not capped at 23: schedules
/// write trips that run past midnight as `25:10:00` and keep them on the
/// previous service day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(u32);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid time {0:?}, expected HH:MM:SS")]
pub struct ParseTimeError(pub String);

impl From<u32> for Time {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Sub<Time> for Time {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration(self.0 - rhs.0)
    }
}

impl Add<Duration> for Time {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign<Duration> for Time {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0
    }
}

impl Time {
    /// Panics if `minute` or `second` is 60 or more, or if the total does
    /// not fit in a `u32` of seconds (hours up to 1 193 046).
    pub const fn new(hour: u32, minute: u32, second: u32) -> Self {
        match Self::try_new(hour, minute, second) {
            Some(time) => time,
            None => panic!("minute and second must be below 60 and the time must fit in u32 seconds"),
        }
    }

    /// `None` when `minute` or `second` is out of range or the total
    /// overflows.
    pub const fn try_new(hour: u32, minute: u32, second: u32) -> Option<Self> {
        if minute >= 60 || second >= 60 {
            return None;
        }
        let Some(hours) = hour.checked_mul(HOUR_TO_SEC) else {
            return None;
        };
        match hours.checked_add(minute * MINUTE_TO_SEC + second) {
            Some(secs) => Some(Self(secs)),
            None => None,
        }
    }

    pub fn now() -> Self {
        let now = Local::now();
        Self(now.num_seconds_from_midnight())
    }

    pub const fn from_seconds(secs: u32) -> Self {
        Self(secs)
    }

    pub const fn as_seconds(&self) -> u32 {
        self.0
    }

    pub const fn hour(&self) -> u32 {
        self.0 / HOUR_TO_SEC
    }

    pub const fn minute(&self) -> u32 {
        (self.0 % HOUR_TO_SEC) / MINUTE_TO_SEC
    }

    pub const fn second(&self) -> u32 {
        self.0 % MINUTE_TO_SEC
    }

    pub fn to_hms_string(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }

    pub fn from_hms(time: &str) -> Option<Self> {
        let mut split = time.trim().split(':');
        let hours: u32 = split.next()?.parse().ok()?;
        let minutes: u32 = split.next()?.parse().ok()?;
        let seconds: u32 = split.next()?.parse().ok()?;
        if split.next().is_some() {
            return None;
        }
        Self::try_new(hours, minutes, seconds)
    }

    /// Time left between `now` and this instant.
    ///
    /// Returns `None` once the instant has passed. There is no roll-over to
    /// the next day: a departure at `08:00:00` seen at `09:00:00` is gone.
    pub fn time_remaining(&self, now: Time) -> Option<Duration> {
        self.checked_sub(now)
    }

    pub fn time_remaining_from_now(&self) -> Option<Duration> {
        self.time_remaining(Time::now())
    }

    pub fn checked_sub(self, rhs: Time) -> Option<Duration> {
        self.0.checked_sub(rhs.0).map(Duration)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

impl FromStr for Time {
    type Err = ParseTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hms(s).ok_or_else(|| ParseTimeError(s.to_string()))
    }
}

impl Serialize for Time {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Time {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

#[test]
fn parse_unparse_1() {
    let time = "00:00:00";
    let stime = Time::from_hms(time).unwrap();
    assert_eq!(time, stime.to_hms_string())
}

#[test]
fn parse_unparse_2() {
    let time = "25:10:00";
    let stime = Time::from_hms(time).unwrap();
    assert_eq!(time, stime.to_hms_string())
}

#[test]
fn parse_unparse_3() {
    let time = "12:30:30";
    let stime = Time::from_hms(time).unwrap();
    assert_eq!(time, stime.to_hms_string())
}

#[test]
fn unpadded_hour_is_accepted() {
    let stime = Time::from_hms("5:04:03").unwrap();
    assert_eq!("05:04:03", stime.to_hms_string())
}

#[test]
fn minute_out_of_range() {
    assert!(Time::from_hms("10:60:00").is_none());
    assert!(Time::try_new(10, 0, 60).is_none());
}

#[test]
fn hour_overflow_is_rejected() {
    assert!(Time::from_hms("1193047:00:00").is_none());
    assert!("4294967295:00:00".parse::<Time>().is_err());
    assert!(Time::try_new(1_193_046, 28, 16).is_none());
    assert_eq!(
        Time::try_new(1_193_046, 28, 15).map(|time| time.as_seconds()),
        Some(u32::MAX)
    );
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Duration(u32);

impl From<u32> for Duration {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Duration {
    pub const ZERO: Duration = Duration(0);

    pub const fn from_seconds(secs: u32) -> Self {
        Self(secs)
    }

    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes * MINUTE_TO_SEC)
    }

    pub const fn from_hours(hours: u32) -> Self {
        Self(hours * HOUR_TO_SEC)
    }

    pub const fn as_seconds(&self) -> u32 {
        self.0
    }

    /// Whole hours in this span.
    pub const fn hours(&self) -> u32 {
        self.0 / HOUR_TO_SEC
    }

    /// Minutes left over after whole hours.
    pub const fn minutes(&self) -> u32 {
        (self.0 % HOUR_TO_SEC) / MINUTE_TO_SEC
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}
