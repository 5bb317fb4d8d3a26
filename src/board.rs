//! What a departure board shows: the next few buses, that service is over for the day, or that
//! the timetable couldn't be loaded. The last two must never look the same.

use chrono::{DateTime, SecondsFormat, TimeZone};
use serde::Serialize;
use std::fmt;

use timetable_search::{Candidate, ServiceType, Timetable, SERVICE_ZONE};

use crate::error::LoadError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRow {
    pub id: String,
    pub depart: String,
    pub arrive: String,
    pub minutes_until: i64,
}

impl From<&Candidate> for BoardRow {
    fn from(candidate: &Candidate) -> BoardRow {
        BoardRow {
            id: candidate.id(),
            depart: candidate.trip.depart.clone(),
            arrive: candidate.trip.arrive.clone(),
            minutes_until: candidate.minutes_until(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteHeader {
    pub route_name: String,
    pub stop_name: String,
    pub service_type: ServiceType,
    pub service_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BoardState {
    Departures {
        header: RouteHeader,
        rows: Vec<BoardRow>,
    },
    NoMoreBuses {
        header: RouteHeader,
    },
    Unavailable {
        message: String,
        #[serde(rename = "notFound")]
        not_found: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    /// Tokyo wall clock time the board was resolved at, RFC 3339
    pub generated_at: String,
    pub state: BoardState,
}

fn generated_at<T: TimeZone>(now: &DateTime<T>) -> String {
    now.with_timezone(&SERVICE_ZONE)
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}

impl Board {
    /// The next `limit` departures as of `now`
    pub fn build<T: TimeZone>(timetable: &Timetable, now: &DateTime<T>, limit: usize) -> Board {
        let service_type = timetable.service_type(now);
        let header = RouteHeader {
            route_name: timetable.schedule.route_name.clone(),
            stop_name: timetable.schedule.stop_name.clone(),
            service_type,
            service_label: service_type.label(),
        };
        let rows: Vec<BoardRow> = timetable
            .next_departures(now, limit)
            .iter()
            .map(BoardRow::from)
            .collect();
        let state = if rows.is_empty() {
            BoardState::NoMoreBuses { header }
        } else {
            BoardState::Departures { header, rows }
        };
        Board {
            generated_at: generated_at(now),
            state,
        }
    }

    pub fn unavailable<T: TimeZone>(error: &LoadError, now: &DateTime<T>) -> Board {
        Board {
            generated_at: generated_at(now),
            state: BoardState::Unavailable {
                message: error.to_string(),
                not_found: error.is_not_found(),
            },
        }
    }

    /// Load and build in one go, a load failure becomes an unavailable board
    pub fn from_load<T: TimeZone>(
        loaded: Result<&Timetable, &LoadError>,
        now: &DateTime<T>,
        limit: usize,
    ) -> Board {
        match loaded {
            Ok(timetable) => Board::build(timetable, now, limit),
            Err(error) => Board::unavailable(error, now),
        }
    }

    pub fn rows(&self) -> &[BoardRow] {
        match &self.state {
            BoardState::Departures { rows, .. } => rows.as_slice(),
            _ => &[],
        }
    }
}

impl fmt::Display for RouteHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} from {} [{} / {}]",
            self.route_name, self.stop_name, self.service_label, self.service_type
        )
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            BoardState::Departures { header, rows } => {
                writeln!(f, "{}", header)?;
                for row in rows {
                    writeln!(
                        f,
                        "  {:>5} → {:>5}  in {} min",
                        row.depart, row.arrive, row.minutes_until
                    )?;
                }
            }
            BoardState::NoMoreBuses { header } => {
                writeln!(f, "{}", header)?;
                writeln!(f, "  No more buses today")?;
            }
            BoardState::Unavailable { message, .. } => {
                writeln!(f, "Timetable unavailable: {}", message)?;
            }
        }
        write!(f, "  as of {}", self.generated_at)
    }
}
