use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Weekday};
use chrono_tz::Tz;

use crate::holidays::{DateKey, HolidaySet};
use crate::timetable::ServiceType;

/// The zone the route runs in, every instant is read as a Tokyo wall clock regardless of the
/// host's zone
pub const SERVICE_ZONE: Tz = chrono_tz::Asia::Tokyo;

/// Classify a calendar day: a listed holiday or a Sunday runs the Sunday/holiday timetable, a
/// Saturday the Saturday one and everything else the weekday one
pub fn service_type_of_date(date: NaiveDate, holidays: &HolidaySet) -> ServiceType {
    if holidays.contains(&DateKey::of(&date)) || date.weekday() == Weekday::Sun {
        ServiceType::SundayHoliday
    } else if date.weekday() == Weekday::Sat {
        ServiceType::Saturday
    } else {
        ServiceType::Weekday
    }
}

/// The zone and holidays used to read instants as service days.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCalendar {
    zone: Tz,
    holidays: HolidaySet,
}

impl ServiceCalendar {
    pub fn new(zone: Tz, holidays: HolidaySet) -> ServiceCalendar {
        ServiceCalendar { zone, holidays }
    }

    /// A calendar in [`SERVICE_ZONE`]
    pub fn tokyo(holidays: HolidaySet) -> ServiceCalendar {
        ServiceCalendar::new(SERVICE_ZONE, holidays)
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn holidays(&self) -> &HolidaySet {
        &self.holidays
    }

    /// The same instant on the local wall clock
    pub fn local<T: TimeZone>(&self, instant: &DateTime<T>) -> DateTime<Tz> {
        instant.with_timezone(&self.zone)
    }

    /// Calendar date of the instant in the local zone
    pub fn date_of<T: TimeZone>(&self, instant: &DateTime<T>) -> NaiveDate {
        self.local(instant).date_naive()
    }

    /// The unpadded `Y/M/D` key of the instant's local date
    pub fn date_key<T: TimeZone>(&self, instant: &DateTime<T>) -> DateKey {
        DateKey::of(&self.date_of(instant))
    }

    /// Day of the week numbered from Sunday = 1 to Saturday = 7
    pub fn weekday_number<T: TimeZone>(&self, instant: &DateTime<T>) -> u32 {
        self.local(instant).weekday().number_from_sunday()
    }

    pub fn is_holiday<T: TimeZone>(&self, instant: &DateTime<T>) -> bool {
        self.holidays.contains(&self.date_key(instant))
    }

    /// Which timetable applies on the local day of the instant
    pub fn service_type<T: TimeZone>(&self, instant: &DateTime<T>) -> ServiceType {
        service_type_of_date(self.date_of(instant), &self.holidays)
    }
}
