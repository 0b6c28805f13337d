use chrono::{Local, NaiveDateTime};

// Everything that needs "now" asks a Clock for it so tests can pin the time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time, which is what the pickup rules are written against.
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
