//! Timetable search for a single bus route from a single stop.
//!
//! * [`time`]: the "HH:MM" times of day found in timetables
//! * [`timetable`]: the weekly schedule, one list of trips per type of day
//! * [`holidays`]: the holiday list, which switches a day onto the Sunday timetable
//! * [`calendar`]: reading instants as service days in the route's zone
//! * [`resolver`]: turning a day's trips into concrete upcoming departures
//!
//! Nothing in this crate does any I/O, loading the timetable is up to the caller.

pub mod calendar;
pub mod holidays;
pub mod resolver;
pub mod time;
pub mod timetable;

pub use calendar::{ServiceCalendar, SERVICE_ZONE};
pub use holidays::{DateKey, HolidaySet};
pub use resolver::{Candidate, Timetable, DEFAULT_LIMIT};
pub use timetable::{DaySchedule, Schedule, ServiceType, Trip};
