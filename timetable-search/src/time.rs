use std::convert::TryInto;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
use serde::{de, ser};

/// A local time of day as written in a timetable, eg. "07:05", with the following focus:
/// * parsing the loose `H:M` form found in hand-written timetables
/// * no date and no zone, those are supplied when a trip is resolved against a day
/// * minute precision
#[derive(Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Time {
    minutes_since_midnight: u16,
}

impl Time {
    /// # Panics
    /// On out of range input
    pub fn from_hm(hours: u32, minutes: u32) -> Time {
        assert!(hours < 24 && minutes < 60);
        Time {
            minutes_since_midnight: (hours * 60 + minutes)
                .try_into()
                .expect("time of day to fit in a u16"),
        }
    }

    /// get the clock hour, 0 to 23
    pub fn hour(self) -> u32 {
        u32::from(self.minutes_since_midnight) / 60
    }

    /// get the minute of the hour
    pub fn minute(self) -> u32 {
        u32::from(self.minutes_since_midnight) % 60
    }

    pub fn to_naive(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0)
            .expect("hour and minute to have been range checked")
    }

    /// This time on a calendar date in a zone, seconds are always zero.
    /// `None` when the local time doesn't exist on that date (a DST gap), an ambiguous local
    /// time resolves to the earlier instant.
    pub fn on<Tz: TimeZone>(self, date: NaiveDate, zone: &Tz) -> Option<DateTime<Tz>> {
        zone.from_local_datetime(&date.and_time(self.to_naive()))
            .earliest()
    }
}

impl fmt::Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// # String representations
/// Exactly two `:` separated numeric parts, padding is optional
/// ```rust
/// use timetable_search::time::Time;
/// let time: Time = "7:05".parse().unwrap();
/// assert_eq!(time, "07:05".parse().unwrap());
/// assert_eq!(time.to_string(), "07:05");
/// let time: Time = "23:59".parse().unwrap();
/// assert!("7:05:00".parse::<Time>().is_err());
/// assert!("24:00".parse::<Time>().is_err());
/// ```
impl std::str::FromStr for Time {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let (hh, mm) = match (parts.next(), parts.next(), parts.next()) {
            (Some(hh), Some(mm), None) => (hh, mm),
            _ => return Err(TimeParseError::InvalidFormat),
        };
        let hours: u32 = hh.parse()?;
        let minutes: u32 = mm.parse()?;
        if hours > 23 || minutes > 59 {
            return Err(TimeParseError::OutOfRange);
        }
        Ok(Time::from_hm(hours, minutes))
    }
}

impl ser::Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

struct TimeVisitor;

impl<'de> de::Visitor<'de> for TimeVisitor {
    type Value = Time;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "time formatted eg. \"[h]h:mm\"")
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        s.parse().map_err(de::Error::custom)
    }
}

impl<'de> de::Deserialize<'de> for Time {
    fn deserialize<D>(deserializer: D) -> Result<Time, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(TimeVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    InvalidFormat,
    OutOfRange,
    ParseIntError(std::num::ParseIntError),
}

impl From<std::num::ParseIntError> for TimeParseError {
    fn from(err: std::num::ParseIntError) -> TimeParseError {
        TimeParseError::ParseIntError(err)
    }
}

impl fmt::Display for TimeParseError {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TimeParseError::*;
        match self {
            InvalidFormat => write!(f, "Time should use format eg. 23:59"),
            OutOfRange => write!(f, "Maximum hour is 23 and maximum minute is 59"),
            ParseIntError(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for TimeParseError {}
