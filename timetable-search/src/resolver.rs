//! Resolving the timetable of a day into concrete departures.
//!
//! Everything here is a pure function of the schedule, the calendar and the reference instant:
//! the same inputs always give the same candidates, in the same order. Only the current service
//! day is ever considered, once the last bus has left the result is empty until midnight.

use chrono::{DateTime, NaiveDate, TimeZone};
use chrono_tz::Tz;

use crate::calendar::ServiceCalendar;
use crate::time::TimeParseError;
use crate::timetable::{Schedule, ServiceType, Trip, TripField};

/// How many departures a board shows unless asked otherwise
pub const DEFAULT_LIMIT: usize = 3;

/// A trip resolved against a day, relative to the instant it was resolved at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub trip: Trip,
    pub departure: DateTime<Tz>,
    pub arrival: DateTime<Tz>,
    pub reference: DateTime<Tz>,
}

impl Candidate {
    /// Whole minutes from the reference instant until departure, never negative
    pub fn minutes_until(&self) -> i64 {
        (self.departure - self.reference).num_minutes().max(0)
    }

    /// Stable identifier for list rendering, the same trip always gets the same id
    pub fn id(&self) -> String {
        format!("{}-{}", self.trip.depart, self.trip.arrive)
    }

    /// Has the bus left by the reference instant
    pub fn has_departed(&self) -> bool {
        self.departure < self.reference
    }
}

/// Why a trip couldn't be placed on a day
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipCause {
    Unparseable(TimeParseError),
    /// The wall clock time doesn't exist on that day in the zone
    NonexistentLocalTime,
}

/// The outcome of placing one trip on a day. Skipped trips never become candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTrip {
    Resolved(Candidate),
    Skipped {
        trip: Trip,
        field: TripField,
        cause: SkipCause,
    },
}

impl ResolvedTrip {
    pub fn candidate(self) -> Option<Candidate> {
        match self {
            ResolvedTrip::Resolved(candidate) => Some(candidate),
            ResolvedTrip::Skipped { .. } => None,
        }
    }
}

/// Place a trip on a calendar date in the calendar's zone
pub fn resolve_trip(
    trip: &Trip,
    date: NaiveDate,
    reference: DateTime<Tz>,
    calendar: &ServiceCalendar,
) -> ResolvedTrip {
    let zone = calendar.zone();
    let skip = |field, cause| ResolvedTrip::Skipped {
        trip: trip.clone(),
        field,
        cause,
    };
    let (depart, arrive) = match trip.times() {
        Ok(times) => times,
        Err((field, err)) => return skip(field, SkipCause::Unparseable(err)),
    };
    let departure = match depart.on(date, &zone) {
        Some(departure) => departure,
        None => return skip(TripField::Depart, SkipCause::NonexistentLocalTime),
    };
    let arrival = match arrive.on(date, &zone) {
        Some(arrival) => arrival,
        None => return skip(TripField::Arrive, SkipCause::NonexistentLocalTime),
    };
    ResolvedTrip::Resolved(Candidate {
        trip: trip.clone(),
        departure,
        arrival,
        reference,
    })
}

/// Every trip of the service day containing `base`, each either resolved or skipped, in
/// timetable order
pub fn resolve_day_detailed<T: TimeZone>(
    base: &DateTime<T>,
    schedule: &Schedule,
    calendar: &ServiceCalendar,
) -> (ServiceType, Vec<ResolvedTrip>) {
    let reference = calendar.local(base);
    let date = reference.date_naive();
    let service_type = calendar.service_type(&reference);
    let trips = schedule
        .trips_of(service_type)
        .iter()
        .map(|trip| resolve_trip(trip, date, reference, calendar))
        .collect();
    (service_type, trips)
}

/// All candidates of the service day containing `base`, in timetable order, unparseable trips
/// left out
pub fn resolve_day<T: TimeZone>(
    base: &DateTime<T>,
    schedule: &Schedule,
    calendar: &ServiceCalendar,
) -> Vec<Candidate> {
    resolve_day_detailed(base, schedule, calendar)
        .1
        .into_iter()
        .filter_map(ResolvedTrip::candidate)
        .collect()
}

/// Up to `limit` of today's departures which haven't left yet, earliest first. A bus leaving
/// exactly at `now` still counts. Empty once today's service is over.
pub fn next_departures<T: TimeZone>(
    now: &DateTime<T>,
    schedule: &Schedule,
    calendar: &ServiceCalendar,
    limit: usize,
) -> Vec<Candidate> {
    let mut upcoming: Vec<Candidate> = resolve_day(now, schedule, calendar)
        .into_iter()
        .filter(|candidate| !candidate.has_departed())
        .collect();
    upcoming.sort_by(|a, b| a.departure.cmp(&b.departure));
    upcoming.truncate(limit);
    upcoming
}

/// The trip of the day containing `base` whose departure is written exactly as `hhmm`, "7:05"
/// does not match "07:05"
pub fn find_by_departure_time<T: TimeZone>(
    hhmm: &str,
    base: &DateTime<T>,
    schedule: &Schedule,
    calendar: &ServiceCalendar,
) -> Option<Candidate> {
    resolve_day(base, schedule, calendar)
        .into_iter()
        .find(|candidate| candidate.trip.depart == hhmm)
}

/// A loaded timetable snapshot, bundling the schedule with the calendar it is read with
#[derive(Debug, Clone)]
pub struct Timetable {
    pub schedule: Schedule,
    pub calendar: ServiceCalendar,
}

impl Timetable {
    pub fn new(schedule: Schedule, calendar: ServiceCalendar) -> Timetable {
        Timetable { schedule, calendar }
    }

    pub fn service_type<T: TimeZone>(&self, instant: &DateTime<T>) -> ServiceType {
        self.calendar.service_type(instant)
    }

    pub fn resolve_day<T: TimeZone>(&self, base: &DateTime<T>) -> Vec<Candidate> {
        resolve_day(base, &self.schedule, &self.calendar)
    }

    pub fn next_departures<T: TimeZone>(&self, now: &DateTime<T>, limit: usize) -> Vec<Candidate> {
        next_departures(now, &self.schedule, &self.calendar, limit)
    }

    pub fn find_by_departure_time<T: TimeZone>(
        &self,
        hhmm: &str,
        base: &DateTime<T>,
    ) -> Option<Candidate> {
        find_by_departure_time(hhmm, base, &self.schedule, &self.calendar)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::calendar::SERVICE_ZONE;
    use crate::holidays::HolidaySet;
    use chrono::Utc;

    fn schedule() -> Schedule {
        Schedule {
            route_name: "Route 1".into(),
            stop_name: "Station Front".into(),
            weekday: vec![
                Trip::new("07:00", "07:20"),
                Trip::new("07:15", "07:35"),
                Trip::new("07:30", "07:50"),
            ],
            saturday: vec![Trip::new("08:00", "08:20"), Trip::new("09:00", "09:20")],
            sunday_holiday: vec![Trip::new("10:00", "10:20")],
        }
    }

    fn timetable(holidays: &[&str]) -> Timetable {
        Timetable::new(schedule(), ServiceCalendar::tokyo(HolidaySet::build(holidays)))
    }

    fn tokyo(day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Tz> {
        SERVICE_ZONE.with_ymd_and_hms(2024, 1, day, hour, min, sec).unwrap()
    }

    fn departs(candidates: &[Candidate]) -> Vec<(&str, &str)> {
        candidates
            .iter()
            .map(|c| (c.trip.depart.as_str(), c.trip.arrive.as_str()))
            .collect()
    }

    #[test]
    fn next_departures_on_a_tuesday() {
        // Tuesday
        let now = tokyo(9, 7, 10, 0);
        let next = timetable(&[]).next_departures(&now, DEFAULT_LIMIT);
        assert_eq!(departs(&next), vec![("07:15", "07:35"), ("07:30", "07:50")]);
        assert_eq!(next[0].departure, tokyo(9, 7, 15, 0));
        assert_eq!(next[0].arrival, tokyo(9, 7, 35, 0));
        assert_eq!(next[0].reference, now);
        assert_eq!(next[0].minutes_until(), 5);
    }

    #[test]
    fn after_the_last_bus() {
        let now = tokyo(9, 8, 0, 0);
        assert!(timetable(&[]).next_departures(&now, DEFAULT_LIMIT).is_empty());
    }

    #[test]
    fn departing_now_is_upcoming() {
        let now = tokyo(9, 7, 15, 0);
        let next = timetable(&[]).next_departures(&now, DEFAULT_LIMIT);
        assert_eq!(departs(&next), vec![("07:15", "07:35"), ("07:30", "07:50")]);
        assert_eq!(next[0].minutes_until(), 0);
    }

    #[test]
    fn one_second_late_is_departed() {
        let now = tokyo(9, 7, 15, 1);
        let next = timetable(&[]).next_departures(&now, DEFAULT_LIMIT);
        assert_eq!(departs(&next), vec![("07:30", "07:50")]);
        assert_eq!(next[0].minutes_until(), 14);
    }

    #[test]
    fn limit_truncates() {
        let now = tokyo(9, 5, 0, 0);
        let timetable = timetable(&[]);
        assert_eq!(timetable.next_departures(&now, 2).len(), 2);
        assert_eq!(timetable.next_departures(&now, 10).len(), 3);
        assert!(timetable.next_departures(&now, 0).is_empty());
    }

    #[test]
    fn no_rollover_into_tomorrow() {
        // Friday night, Saturday's first bus isn't offered
        let now = tokyo(12, 23, 0, 0);
        assert!(timetable(&[]).next_departures(&now, DEFAULT_LIMIT).is_empty());
    }

    #[test]
    fn saturday_holiday_uses_the_holiday_timetable() {
        let now = tokyo(6, 6, 0, 0);
        let timetable = timetable(&["2024/1/6"]);
        assert_eq!(timetable.service_type(&now), ServiceType::SundayHoliday);
        let next = timetable.next_departures(&now, DEFAULT_LIMIT);
        assert_eq!(departs(&next), vec![("10:00", "10:20")]);
    }

    #[test]
    fn now_in_another_zone() {
        // 22:10 UTC on Monday is 07:10 on Tuesday in Tokyo
        let now = Utc.with_ymd_and_hms(2024, 1, 8, 22, 10, 0).unwrap();
        let next = timetable(&[]).next_departures(&now, DEFAULT_LIMIT);
        assert_eq!(departs(&next), vec![("07:15", "07:35"), ("07:30", "07:50")]);
        assert_eq!(next[0].reference, tokyo(9, 7, 10, 0));
    }

    #[test]
    fn unsorted_source_is_sorted() {
        let mut timetable = timetable(&[]);
        timetable.schedule.weekday.reverse();
        let now = tokyo(9, 6, 0, 0);
        assert_eq!(
            departs(&timetable.resolve_day(&now)),
            vec![("07:30", "07:50"), ("07:15", "07:35"), ("07:00", "07:20")]
        );
        assert_eq!(
            departs(&timetable.next_departures(&now, DEFAULT_LIMIT)),
            vec![("07:00", "07:20"), ("07:15", "07:35"), ("07:30", "07:50")]
        );
    }

    #[test]
    fn resolve_day_includes_departed_trips() {
        let now = tokyo(9, 23, 0, 0);
        let day = timetable(&[]).resolve_day(&now);
        assert_eq!(day.len(), 3);
        assert!(day.iter().all(Candidate::has_departed));
        assert!(day.iter().all(|c| c.minutes_until() == 0));
    }

    #[test]
    fn malformed_trips_are_skipped() {
        let mut timetable = timetable(&[]);
        timetable.schedule.weekday = vec![
            Trip::new("07:00", "07:20"),
            Trip::new("7", "07:35"),
            Trip::new("07:30", "late"),
            Trip::new("25:00", "25:20"),
            Trip::new("7:45", "8:05"),
        ];
        let now = tokyo(9, 6, 0, 0);
        let (service_type, detailed) =
            resolve_day_detailed(&now, &timetable.schedule, &timetable.calendar);
        assert_eq!(service_type, ServiceType::Weekday);
        let skipped: Vec<_> = detailed
            .iter()
            .filter_map(|resolved| match resolved {
                ResolvedTrip::Skipped { trip, field, cause } => {
                    Some((trip.depart.as_str(), *field, cause.clone()))
                }
                ResolvedTrip::Resolved(_) => None,
            })
            .collect();
        assert_eq!(
            skipped,
            vec![
                (
                    "7",
                    TripField::Depart,
                    SkipCause::Unparseable(TimeParseError::InvalidFormat)
                ),
                (
                    "07:30",
                    TripField::Arrive,
                    SkipCause::Unparseable("late".parse::<crate::time::Time>().unwrap_err())
                ),
                (
                    "25:00",
                    TripField::Depart,
                    SkipCause::Unparseable(TimeParseError::OutOfRange)
                ),
            ]
        );
        assert_eq!(
            departs(&timetable.next_departures(&now, DEFAULT_LIMIT)),
            vec![("07:00", "07:20"), ("7:45", "8:05")]
        );
    }

    #[test]
    fn find_by_exact_departure_string() {
        let mut timetable = timetable(&[]);
        timetable.schedule.weekday.push(Trip::new("7:45", "8:05"));
        let base = tokyo(9, 23, 0, 0);
        let found = timetable.find_by_departure_time("07:15", &base).unwrap();
        assert_eq!(found.trip, Trip::new("07:15", "07:35"));
        assert_eq!(found.departure, tokyo(9, 7, 15, 0));
        assert!(timetable.find_by_departure_time("7:15", &base).is_none());
        assert!(timetable.find_by_departure_time("07:45", &base).is_none());
        assert!(timetable.find_by_departure_time("7:45", &base).is_some());
        // Saturday timetable doesn't have it
        assert!(timetable
            .find_by_departure_time("07:15", &tokyo(13, 6, 0, 0))
            .is_none());
    }

    #[test]
    fn ids_come_from_the_trip() {
        let now = tokyo(9, 6, 0, 0);
        let first = timetable(&[]).next_departures(&now, 1);
        assert_eq!(first[0].id(), "07:00-07:20");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::calendar::SERVICE_ZONE;
    use crate::holidays::HolidaySet;
    use proptest::prelude::*;

    prop_compose! {
        fn any_trip()(hour in 0u32..24, minute in 0u32..60, ride in 1u32..60) -> Trip {
            let arrive_minutes = (hour * 60 + minute + ride).min(23 * 60 + 59);
            Trip::new(
                format!("{:02}:{:02}", hour, minute),
                format!("{:02}:{:02}", arrive_minutes / 60, arrive_minutes % 60),
            )
        }
    }

    prop_compose! {
        fn any_schedule()(
            weekday in proptest::collection::vec(any_trip(), 0..30),
            saturday in proptest::collection::vec(any_trip(), 0..30),
            sunday_holiday in proptest::collection::vec(any_trip(), 0..30),
        ) -> Schedule {
            let (mut weekday, mut saturday, mut sunday_holiday) = (weekday, saturday, sunday_holiday);
            for trips in [&mut weekday, &mut saturday, &mut sunday_holiday].iter_mut() {
                trips.sort_by(|a, b| a.depart.cmp(&b.depart));
                trips.dedup_by(|a, b| a.depart == b.depart);
            }
            Schedule {
                route_name: "route".into(),
                stop_name: "stop".into(),
                weekday,
                saturday,
                sunday_holiday,
            }
        }
    }

    prop_compose! {
        fn any_now()(
            month in 1u32..=12,
            day in 1u32..=28,
            hour in 0u32..24,
            minute in 0u32..60,
            second in 0u32..60,
        ) -> DateTime<Tz> {
            SERVICE_ZONE
                .with_ymd_and_hms(2024, month, day, hour, minute, second)
                .unwrap()
        }
    }

    fn calendar() -> ServiceCalendar {
        ServiceCalendar::tokyo(HolidaySet::build(vec!["2024/1/1", "2024/5/3", "2024/11/23"]))
    }

    proptest! {
        #[test]
        fn deterministic(schedule in any_schedule(), now in any_now(), limit in 0usize..6) {
            let calendar = calendar();
            prop_assert_eq!(
                next_departures(&now, &schedule, &calendar, limit),
                next_departures(&now, &schedule, &calendar, limit)
            );
        }

        #[test]
        fn ordered_upcoming_and_limited(schedule in any_schedule(), now in any_now(), limit in 0usize..6) {
            let next = next_departures(&now, &schedule, &calendar(), limit);
            prop_assert!(next.len() <= limit);
            for candidate in &next {
                prop_assert!(candidate.departure >= now);
            }
            for pair in next.windows(2) {
                prop_assert!(pair[0].departure < pair[1].departure);
            }
        }

        #[test]
        fn nothing_upcoming_is_missed(schedule in any_schedule(), now in any_now()) {
            let calendar = calendar();
            let all = resolve_day(&now, &schedule, &calendar);
            let next = next_departures(&now, &schedule, &calendar, usize::MAX);
            let upcoming = all.iter().filter(|c| c.departure >= now).count();
            prop_assert_eq!(next.len(), upcoming);
        }

        #[test]
        fn lookup_round_trip(schedule in any_schedule(), now in any_now()) {
            let calendar = calendar();
            for candidate in resolve_day(&now, &schedule, &calendar) {
                let found = find_by_departure_time(&candidate.trip.depart, &now, &schedule, &calendar);
                prop_assert_eq!(found.map(|found| found.trip), Some(candidate.trip));
            }
        }
    }
}
