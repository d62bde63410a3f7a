use std::fmt;

use chrono::{DateTime, Datelike, NaiveTime, TimeZone, Weekday};

/// Wall-clock trigger for a notification job, evaluated in the caller's time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Daily {
        hour: u32,
        minute: u32,
    },
    Weekly {
        weekday: Weekday,
        hour: u32,
        minute: u32,
    },
}

impl Schedule {
    fn time_of_day(&self) -> Option<NaiveTime> {
        let (hour, minute) = match *self {
            Schedule::Daily { hour, minute } => (hour, minute),
            Schedule::Weekly { hour, minute, .. } => (hour, minute),
        };
        NaiveTime::from_hms_opt(hour, minute, 0)
    }

    fn fires_on(&self, day: Weekday) -> bool {
        match *self {
            Schedule::Daily { .. } => true,
            Schedule::Weekly { weekday, .. } => weekday == day,
        }
    }

    /// First fire time strictly after `now`.
    ///
    /// A fire time that does not exist locally (DST gap) is skipped. Returns
    /// `None` only for an invalid hour/minute.
    pub fn next_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let time = self.time_of_day()?;
        let tz = now.timezone();
        let mut day = now.date_naive();

        // one week plus a day covers a weekly slot lost to a DST gap
        for _ in 0..=8 {
            if self.fires_on(day.weekday()) {
                if let Some(candidate) = tz.from_local_datetime(&day.and_time(time)).earliest() {
                    if candidate > *now {
                        return Some(candidate);
                    }
                }
            }
            day = day.succ_opt()?;
        }
        None
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Daily { hour, minute } => write!(f, "daily at {hour:02}:{minute:02}"),
            Schedule::Weekly {
                weekday,
                hour,
                minute,
            } => write!(f, "weekly on {weekday} at {hour:02}:{minute:02}"),
        }
    }
}
