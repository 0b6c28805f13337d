use chrono::NaiveDateTime;

use crate::policy::SchedulingPolicy;

impl SchedulingPolicy {
    /// The earliest instant a pickup may be booked for, given the current time.
    ///
    /// Once the same-day cutover has passed nothing more can be booked today,
    /// so the answer jumps to midnight at the start of tomorrow.
    pub fn earliest_bookable_instant(&self, now: NaiveDateTime) -> NaiveDateTime {
        if now.time() >= self.same_day_cutover {
            // Only fails at the very end of chrono's date range
            now.date()
                .succ_opt()
                .and_then(|tomorrow| tomorrow.and_hms_opt(0, 0, 0))
                .unwrap_or(now)
        } else {
            now
        }
    }
}
