//! Departure boards and reminders for a single bus stop, on top of [`timetable_search`].

pub mod board;
pub mod cli;
pub mod error;
pub mod reminder;
pub mod source;

pub use board::Board;
pub use error::LoadError;
pub use reminder::{AlertSink, LogSink, ReminderScheduler};
pub use source::TimetableSource;
