use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use log::debug;

use crate::policy::SchedulingPolicy;

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// A pickup time of day. Only meaningful alongside the date it was offered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(self) -> u32 {
        self.0.hour()
    }

    pub fn minute(self) -> u32 {
        self.0.minute()
    }

    pub fn time(self) -> NaiveTime {
        self.0
    }

    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        NaiveDateTime::new(date, self.0)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeSlot {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s, "%H:%M").map(Self)
    }
}

impl SchedulingPolicy {
    /// The pickup times offered for `date`, earliest first.
    ///
    /// Every date gets the full business window except today, where the list
    /// starts `lead_time` after `now`, rounded up to the next slot. An empty
    /// list just means nothing is left for that day.
    pub fn enumerate_slots(&self, date: NaiveDate, now: NaiveDateTime) -> Vec<TimeSlot> {
        let lower_bound = if date == now.date() {
            let Some(lower_bound) = self.same_day_lower_bound(date, now) else {
                debug!("No slots left on {} at {}", date, now);
                return Vec::new();
            };
            lower_bound
        } else {
            self.opens_at
        };

        let mut slots = Vec::new();
        let mut current = lower_bound;
        while current <= self.closes_at {
            slots.push(TimeSlot(current));
            let (next, wrapped) = current.overflowing_add_signed(self.slot_length());
            if wrapped != 0 {
                break;
            }
            current = next;
        }

        debug!(
            "Generated {} slots for {} starting {}",
            slots.len(),
            date,
            lower_bound
        );
        slots
    }

    fn same_day_lower_bound(&self, date: NaiveDate, now: NaiveDateTime) -> Option<NaiveTime> {
        let earliest = now + self.lead_time;
        if earliest.date() > date {
            return None;
        }
        if earliest.date() < date {
            return Some(self.opens_at);
        }

        let rounded = ceil_to_slot(earliest.time(), self.slot_minutes * 60)?;
        let lower_bound = rounded.max(self.opens_at);
        if lower_bound > self.closes_at {
            None
        } else {
            Some(lower_bound)
        }
    }
}

// Rounds up to the next multiple of `slot_seconds` past midnight. A time
// already on a boundary is left alone. `None` if that rolls into tomorrow.
fn ceil_to_slot(time: NaiveTime, slot_seconds: u32) -> Option<NaiveTime> {
    let seconds = time.num_seconds_from_midnight();
    let mut slot_index = seconds / slot_seconds;
    if seconds % slot_seconds != 0 || time.nanosecond() != 0 {
        slot_index += 1;
    }

    let rounded = slot_index * slot_seconds;
    if rounded >= SECONDS_PER_DAY {
        return None;
    }
    NaiveTime::from_num_seconds_from_midnight_opt(rounded, 0)
}
