use std::{fs, io::ErrorKind, path::Path};

use anyhow::{Context, Result};
use chrono::{Duration, NaiveTime, Timelike};
use log::info;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("business window opens at {opens_at} but closes at {closes_at}")]
    EmptyWindow {
        opens_at: NaiveTime,
        closes_at: NaiveTime,
    },
    #[error("slot length of {0} minutes doesn't divide an hour")]
    BadSlotLength(u32),
    #[error("opening time {0} isn't on a slot boundary")]
    UnalignedOpening(NaiveTime),
}

/// The rules a pickup has to satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingPolicy {
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
    pub slot_minutes: u32,
    /// Minimum gap between "now" and a same-day pickup.
    pub lead_time: Duration,
    /// From this time of day onwards same-day bookings are closed.
    pub same_day_cutover: NaiveTime,
    /// Furthest ahead a pickup can be booked, in days from today. `None` is unbounded.
    pub max_advance_days: Option<u32>,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            opens_at: hm(6, 0),
            closes_at: hm(20, 0),
            slot_minutes: 15,
            lead_time: Duration::hours(4),
            same_day_cutover: hm(16, 0),
            max_advance_days: None,
        }
    }
}

impl SchedulingPolicy {
    /// Default policy, with the booking horizon read from `max_advance_days_path`
    /// if that file exists.
    pub fn load(max_advance_days_path: &Path) -> Result<Self> {
        let mut policy = Self::default();
        match fs::read_to_string(max_advance_days_path) {
            Ok(contents) => {
                let days = contents.trim().parse::<u32>().with_context(|| {
                    format!(
                        "Invalid max-advance-days in {}",
                        max_advance_days_path.display()
                    )
                })?;
                info!("Bookings limited to {} days ahead", days);
                policy.max_advance_days = Some(days);
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No booking horizon configured");
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Failed to read {}", max_advance_days_path.display())
                })
            }
        }

        policy.validate().context("Invalid scheduling policy")?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.opens_at >= self.closes_at {
            return Err(PolicyError::EmptyWindow {
                opens_at: self.opens_at,
                closes_at: self.closes_at,
            });
        }
        if self.slot_minutes == 0 || 60 % self.slot_minutes != 0 {
            return Err(PolicyError::BadSlotLength(self.slot_minutes));
        }
        if self.opens_at.second() != 0
            || self.opens_at.nanosecond() != 0
            || self.opens_at.minute() % self.slot_minutes != 0
        {
            return Err(PolicyError::UnalignedOpening(self.opens_at));
        }

        Ok(())
    }

    pub(crate) fn slot_length(&self) -> Duration {
        Duration::minutes(i64::from(self.slot_minutes))
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    // Safe to unwrap because it's only ever called with the constants above
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}
