//! The static weekly timetable of a single route from a single stop.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::time::{Time, TimeParseError};

/// One scheduled journey, kept exactly as written in the source timetable.
/// The times are only parsed when the trip is resolved against a day, so that a single bad
/// entry can be skipped without rejecting the whole timetable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trip {
    /// Departure from the stop, local time of day "HH:MM"
    pub depart: String,
    /// Arrival at the end of the route, local time of day "HH:MM"
    pub arrive: String,
}

/// Which of the two times of a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TripField {
    Depart,
    Arrive,
}

impl Trip {
    pub fn new(depart: impl Into<String>, arrive: impl Into<String>) -> Trip {
        Trip {
            depart: depart.into(),
            arrive: arrive.into(),
        }
    }

    pub fn departure_time(&self) -> Result<Time, TimeParseError> {
        self.depart.parse()
    }

    pub fn arrival_time(&self) -> Result<Time, TimeParseError> {
        self.arrive.parse()
    }

    /// Both times parsed, or the first field which doesn't parse
    pub fn times(&self) -> Result<(Time, Time), (TripField, TimeParseError)> {
        let depart = self
            .departure_time()
            .map_err(|err| (TripField::Depart, err))?;
        let arrive = self.arrival_time().map_err(|err| (TripField::Arrive, err))?;
        Ok((depart, arrive))
    }
}

impl fmt::Display for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}→{}", self.depart, self.arrive)
    }
}

impl fmt::Display for TripField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TripField::Depart => "depart",
            TripField::Arrive => "arrive",
        })
    }
}

/// The trips of one service type in source order, which is ascending by departure by
/// convention of the source data
pub type DaySchedule = Vec<Trip>;

/// Classification of a calendar day, deciding which timetable applies.
/// Variants are declared in order of precedence, a holiday beats a Saturday.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ServiceType {
    Weekday,
    Saturday,
    SundayHoliday,
}

impl ServiceType {
    pub const ALL: &'static [ServiceType] = &[
        ServiceType::Weekday,
        ServiceType::Saturday,
        ServiceType::SundayHoliday,
    ];

    /// The label shown on the timetable boards at the stop
    pub fn label(self) -> &'static str {
        match self {
            ServiceType::Weekday => "平日",
            ServiceType::Saturday => "土曜",
            ServiceType::SundayHoliday => "日曜・祝日",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServiceType::Weekday => "weekday",
            ServiceType::Saturday => "saturday",
            ServiceType::SundayHoliday => "sunday/holiday",
        })
    }
}

/// The whole timetable for the route, as loaded from config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub route_name: String,
    pub stop_name: String,
    pub weekday: DaySchedule,
    pub saturday: DaySchedule,
    pub sunday_holiday: DaySchedule,
}

impl Schedule {
    /// Get the trips which run on a type of day
    pub fn trips_of(&self, service_type: ServiceType) -> &[Trip] {
        match service_type {
            ServiceType::Weekday => &self.weekday,
            ServiceType::Saturday => &self.saturday,
            ServiceType::SundayHoliday => &self.sunday_holiday,
        }
    }

    /// Trips of every service type which can never be resolved, for diagnostics when loading
    pub fn unparseable_trips(
        &self,
    ) -> impl Iterator<Item = (ServiceType, &Trip, TripField, TimeParseError)> + '_ {
        ServiceType::ALL.iter().flat_map(move |&service_type| {
            self.trips_of(service_type)
                .iter()
                .filter_map(move |trip| match trip.times() {
                    Ok(_) => None,
                    Err((field, err)) => Some((service_type, trip, field, err)),
                })
        })
    }
}
