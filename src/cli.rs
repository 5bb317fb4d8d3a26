//! Arguments shared by the binaries.

use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use clap::Args;
use std::path::PathBuf;

use timetable_search::SERVICE_ZONE;

use crate::source::TimetableSource;

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Directory holding schedule.json and holidays.txt, searched before ./config and the
    /// working directory
    #[arg(long, env = "TIMETABLE_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Pretend it is this instant instead of now, e.g. 2024-01-09T07:10:00+09:00
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<DateTime<FixedOffset>>,
}

impl SourceArgs {
    pub fn source(&self) -> TimetableSource {
        TimetableSource::with_default_dirs(self.config_dir.as_deref())
    }

    /// `--at` if given, otherwise the current time, on the Tokyo clock
    pub fn now(&self) -> DateTime<Tz> {
        match self.at {
            Some(at) => at.with_timezone(&SERVICE_ZONE),
            None => Utc::now().with_timezone(&SERVICE_ZONE),
        }
    }
}

pub fn parse_instant(arg: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(arg)
}
