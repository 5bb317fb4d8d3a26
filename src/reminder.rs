//! Reminders ahead of a chosen departure.
//!
//! The scheduler only keeps track of what is due when; actually alerting somebody is left to an
//! [`AlertSink`].

use chrono::{DateTime, Duration, TimeZone};
use chrono_tz::Tz;
use log::info;
use std::collections::BTreeMap;
use std::fmt;

use timetable_search::{Candidate, Trip};

/// How long before departure a reminder fires unless asked otherwise
pub fn default_lead_time() -> Duration {
    Duration::minutes(5)
}

/// Identifies a reminder by the trip it is for, scheduling the same trip again replaces it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct ReminderKey {
    pub depart: String,
    pub arrive: String,
}

impl From<&Trip> for ReminderKey {
    fn from(trip: &Trip) -> ReminderKey {
        ReminderKey {
            depart: trip.depart.clone(),
            arrive: trip.arrive.clone(),
        }
    }
}

impl fmt::Display for ReminderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.depart, self.arrive)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub key: ReminderKey,
    pub trigger: DateTime<Tz>,
    pub departure: DateTime<Tz>,
    pub title: String,
    pub body: String,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReminderError {
    #[error("Too late for a reminder, it would have been at {trigger} and it is now {now}")]
    TriggerInPast {
        trigger: DateTime<Tz>,
        now: DateTime<Tz>,
    },
}

/// Delivers a reminder once it is due
pub trait AlertSink {
    fn deliver(&mut self, reminder: &Reminder);
}

/// Delivers reminders to the log
#[derive(Debug, Default)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn deliver(&mut self, reminder: &Reminder) {
        info!("{}: {}", reminder.title, reminder.body);
    }
}

/// Pending reminders, at most one per trip
#[derive(Debug, Clone)]
pub struct ReminderScheduler {
    lead_time: Duration,
    pending: BTreeMap<ReminderKey, Reminder>,
}

impl Default for ReminderScheduler {
    fn default() -> Self {
        ReminderScheduler::new(default_lead_time())
    }
}

impl ReminderScheduler {
    pub fn new(lead_time: Duration) -> ReminderScheduler {
        ReminderScheduler {
            lead_time,
            pending: BTreeMap::new(),
        }
    }

    pub fn lead_time(&self) -> Duration {
        self.lead_time
    }

    /// Schedule a reminder `lead_time` before the candidate departs. Declined if that moment has
    /// already passed, a reminder due exactly now is accepted. Replaces any pending reminder for
    /// the same trip.
    pub fn schedule<T: TimeZone>(
        &mut self,
        candidate: &Candidate,
        now: &DateTime<T>,
    ) -> Result<Reminder, ReminderError> {
        let now = now.with_timezone(&candidate.departure.timezone());
        let trigger = candidate.departure - self.lead_time;
        if trigger < now {
            return Err(ReminderError::TriggerInPast { trigger, now });
        }
        let key = ReminderKey::from(&candidate.trip);
        let reminder = Reminder {
            title: format!("Bus departs at {}", key.depart),
            body: format!(
                "The {} bus leaves in {} minutes, arriving at {}",
                key.depart,
                self.lead_time.num_minutes(),
                key.arrive
            ),
            key: key.clone(),
            trigger,
            departure: candidate.departure,
        };
        if self.pending.insert(key, reminder.clone()).is_some() {
            info!("Replaced reminder for {}", reminder.key);
        } else {
            info!("Reminder for {} set for {}", reminder.key, reminder.trigger);
        }
        Ok(reminder)
    }

    pub fn cancel(&mut self, key: &ReminderKey) -> Option<Reminder> {
        self.pending.remove(key)
    }

    /// Pending reminders, soonest first
    pub fn pending(&self) -> Vec<&Reminder> {
        let mut pending: Vec<&Reminder> = self.pending.values().collect();
        pending.sort_by(|a, b| a.trigger.cmp(&b.trigger));
        pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// When the next reminder is due
    pub fn next_trigger(&self) -> Option<DateTime<Tz>> {
        self.pending.values().map(|reminder| reminder.trigger).min()
    }

    /// Remove and return every reminder due by `now`, soonest first
    pub fn take_due<T: TimeZone>(&mut self, now: &DateTime<T>) -> Vec<Reminder> {
        let now = now.naive_utc();
        let due_keys: Vec<ReminderKey> = self
            .pending
            .values()
            .filter(|reminder| reminder.trigger.naive_utc() <= now)
            .map(|reminder| reminder.key.clone())
            .collect();
        let mut due: Vec<Reminder> = due_keys
            .iter()
            .filter_map(|key| self.pending.remove(key))
            .collect();
        due.sort_by(|a, b| a.trigger.cmp(&b.trigger));
        due
    }

    /// Deliver every reminder due by `now`, returning how many were delivered
    pub fn deliver_due<T: TimeZone, S: AlertSink>(
        &mut self,
        now: &DateTime<T>,
        sink: &mut S,
    ) -> usize {
        let due = self.take_due(now);
        for reminder in &due {
            sink.deliver(reminder);
        }
        due.len()
    }
}
