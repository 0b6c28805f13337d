use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::policy::SchedulingPolicy;

impl SchedulingPolicy {
    /// Whether `candidate` can be picked in the date grid at all.
    ///
    /// Today stays selectable right up to the cutover even when the slot list
    /// for today has already run dry.
    pub fn is_selectable(&self, candidate: NaiveDate, now: NaiveDateTime) -> bool {
        let first_bookable_day = self.earliest_bookable_instant(now).date();
        if candidate < first_bookable_day {
            return false;
        }

        let last_bookable_day = self
            .max_advance_days
            .and_then(|days| now.date().checked_add_days(Days::new(u64::from(days))));
        match last_bookable_day {
            Some(last_bookable_day) => candidate <= last_bookable_day,
            None => true,
        }
    }
}
