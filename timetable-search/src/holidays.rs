//! Public holidays on which the Sunday timetable runs.
//!
//! The list is supplied as plain lines of `Y/M/D`. Lines which can't be read are skipped one at a
//! time rather than rejecting the list, [`parse_line`] makes that decision visible.

use chrono::Datelike;
use std::collections::HashSet;
use std::fmt;
use std::num::ParseIntError;

/// A calendar day, written `Y/M/D` without zero padding, eg. `2024/1/1`.
/// The components are not range checked, `2024/13/99` is a valid key which will never match a
/// real date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct DateKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DateKey {
    /// The key of a calendar date, the caller picks the zone the date is taken in
    pub fn of<D: Datelike>(date: &D) -> DateKey {
        DateKey {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.year, self.month, self.day)
    }
}

/// Why a line didn't make it into the set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Not exactly three `/` separated parts
    WrongComponentCount(usize),
    NotNumeric(ParseIntError),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::WrongComponentCount(count) => {
                write!(f, "expected year/month/day, found {} parts", count)
            }
            SkipReason::NotNumeric(err) => write!(f, "{}", err),
        }
    }
}

/// The outcome of reading one raw line of the holiday list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HolidayLine {
    Date(DateKey),
    Blank,
    Skipped { line: String, reason: SkipReason },
}

/// Read one line, surrounding whitespace is ignored
pub fn parse_line(raw: &str) -> HolidayLine {
    let line = raw.trim();
    if line.is_empty() {
        return HolidayLine::Blank;
    }
    let parts: Vec<&str> = line.split('/').collect();
    if parts.len() != 3 {
        return HolidayLine::Skipped {
            line: line.to_owned(),
            reason: SkipReason::WrongComponentCount(parts.len()),
        };
    }
    let parsed = parts[0].parse::<i32>().and_then(|year| {
        Ok(DateKey {
            year,
            month: parts[1].parse()?,
            day: parts[2].parse()?,
        })
    });
    match parsed {
        Ok(key) => HolidayLine::Date(key),
        Err(err) => HolidayLine::Skipped {
            line: line.to_owned(),
            reason: SkipReason::NotNumeric(err),
        },
    }
}

/// A set of calendar days, duplicates collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidaySet {
    keys: HashSet<DateKey>,
}

impl HolidaySet {
    pub fn new() -> HolidaySet {
        HolidaySet::default()
    }

    /// Build from raw lines, silently dropping anything which isn't a date
    pub fn build<I, S>(lines: I) -> HolidaySet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        HolidaySet::build_with_skipped(lines).0
    }

    /// Build from raw lines, also returning the lines which were skipped so that a loader can
    /// report them
    pub fn build_with_skipped<I, S>(lines: I) -> (HolidaySet, Vec<(String, SkipReason)>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HolidaySet::new();
        let mut skipped = vec![];
        for raw in lines {
            match parse_line(raw.as_ref()) {
                HolidayLine::Date(key) => {
                    set.insert(key);
                }
                HolidayLine::Blank => {}
                HolidayLine::Skipped { line, reason } => skipped.push((line, reason)),
            }
        }
        (set, skipped)
    }

    /// Returns whether the key was newly added
    pub fn insert(&mut self, key: DateKey) -> bool {
        self.keys.insert(key)
    }

    pub fn contains(&self, key: &DateKey) -> bool {
        self.keys.contains(key)
    }

    /// Is this calendar date in the set
    pub fn contains_date<D: Datelike>(&self, date: &D) -> bool {
        self.contains(&DateKey::of(date))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl std::iter::FromIterator<DateKey> for HolidaySet {
    fn from_iter<I: IntoIterator<Item = DateKey>>(iter: I) -> Self {
        HolidaySet {
            keys: iter.into_iter().collect(),
        }
    }
}
