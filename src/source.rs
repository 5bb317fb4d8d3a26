//! Loading the timetable and holiday list from config files.

use log::{info, warn};
use std::path::{Path, PathBuf};

use timetable_search::holidays::{HolidaySet, SkipReason};
use timetable_search::{Schedule, ServiceCalendar, ServiceType, Timetable};

use crate::error::LoadError;

pub const SCHEDULE_FILE: &str = "schedule.json";
pub const HOLIDAYS_FILE: &str = "holidays.txt";

const BOM: &[u8] = b"\xef\xbb\xbf";

/// Lines of the holiday list, each decoded on its own so that bytes which aren't UTF-8 only spoil
/// the line they are on
fn holiday_lines(contents: &[u8]) -> impl Iterator<Item = String> + '_ {
    let contents = contents.strip_prefix(BOM).unwrap_or(contents);
    contents
        .split(|&byte| byte == b'\n')
        .map(|line| String::from_utf8_lossy(line).into_owned())
}

/// The holiday set along with the lines which were left out of it
#[derive(Debug, Clone)]
pub struct HolidayReport {
    pub holidays: HolidaySet,
    pub skipped: Vec<(String, SkipReason)>,
}

/// Directories searched in order for the config files, the first directory containing a file
/// wins.
#[derive(Debug, Clone)]
pub struct TimetableSource {
    search_dirs: Vec<PathBuf>,
}

impl TimetableSource {
    pub fn new(search_dirs: Vec<PathBuf>) -> TimetableSource {
        TimetableSource { search_dirs }
    }

    /// `explicit` if given, then `./config`, then the working directory
    pub fn with_default_dirs(explicit: Option<&Path>) -> TimetableSource {
        let mut search_dirs: Vec<PathBuf> = explicit.into_iter().map(Path::to_path_buf).collect();
        search_dirs.push(PathBuf::from("config"));
        search_dirs.push(PathBuf::from("."));
        TimetableSource::new(search_dirs)
    }

    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    fn locate(&self, file: &'static str) -> Result<PathBuf, LoadError> {
        self.search_dirs
            .iter()
            .map(|dir| dir.join(file))
            .find(|path| path.is_file())
            .ok_or_else(|| LoadError::NotFound {
                file,
                searched: self.search_dirs.clone(),
            })
    }

    fn read(&self, file: &'static str) -> Result<(PathBuf, Vec<u8>), LoadError> {
        let path = self.locate(file)?;
        info!("Opening {}", path.display());
        match std::fs::read(&path) {
            Ok(contents) => Ok((path, contents)),
            Err(source) => Err(LoadError::Io { path, source }),
        }
    }

    pub fn load_schedule(&self) -> Result<Schedule, LoadError> {
        let (path, contents) = self.read(SCHEDULE_FILE)?;
        let schedule: Schedule = match serde_json::from_slice(&contents) {
            Ok(schedule) => schedule,
            Err(source) => return Err(LoadError::Malformed { path, source }),
        };
        for (service_type, trip, field, err) in schedule.unparseable_trips() {
            warn!(
                "{} trip {} will be skipped, bad {} time: {}",
                service_type, trip, field, err
            );
        }
        info!(
            "{} from {}: {} weekday, {} saturday and {} sunday/holiday trips",
            schedule.route_name,
            schedule.stop_name,
            schedule.trips_of(ServiceType::Weekday).len(),
            schedule.trips_of(ServiceType::Saturday).len(),
            schedule.trips_of(ServiceType::SundayHoliday).len()
        );
        Ok(schedule)
    }

    pub fn load_holidays(&self) -> Result<HolidayReport, LoadError> {
        let (path, contents) = self.read(HOLIDAYS_FILE)?;
        let (holidays, skipped) = HolidaySet::build_with_skipped(holiday_lines(&contents));
        for (line, reason) in &skipped {
            warn!("{}: skipping holiday {:?}, {}", path.display(), line, reason);
        }
        info!("{} holidays", holidays.len());
        Ok(HolidayReport { holidays, skipped })
    }

    /// Load a snapshot ready for querying, read on the Tokyo clock
    pub fn load(&self) -> Result<Timetable, LoadError> {
        let schedule = self.load_schedule()?;
        let HolidayReport { holidays, .. } = self.load_holidays()?;
        Ok(Timetable::new(schedule, ServiceCalendar::tokyo(holidays)))
    }
}
