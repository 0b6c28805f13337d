use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info, warn};

use crate::{policy::SchedulingPolicy, slots::TimeSlot};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("invalid selection: {0}")]
    InvalidSelection(InvalidReason),
    #[error("incomplete selection (date set: {date_set}, time set: {time_set})")]
    IncompleteSelection { date_set: bool, time_set: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidReason {
    #[error("no pickup date has been chosen")]
    NoDate,
    #[error("{0} can't be booked")]
    DateUnavailable(NaiveDate),
    #[error("{time} isn't offered on {date}")]
    SlotUnavailable { date: NaiveDate, time: TimeSlot },
}

/// The date and time picked so far in one scheduling dialog.
///
/// A time is only ever held together with the date it was offered for.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionState {
    date: Option<NaiveDate>,
    time: Option<TimeSlot>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn time(&self) -> Option<TimeSlot> {
        self.time
    }

    /// Picks a new date, dropping the chosen time if `date` doesn't offer it.
    pub fn select_date(
        &mut self,
        date: NaiveDate,
        policy: &SchedulingPolicy,
        now: NaiveDateTime,
    ) -> Result<(), SelectionError> {
        if !policy.is_selectable(date, now) {
            warn!("Rejected pickup date {}", date);
            return Err(SelectionError::InvalidSelection(
                InvalidReason::DateUnavailable(date),
            ));
        }

        if let Some(time) = self.time {
            if !policy.enumerate_slots(date, now).contains(&time) {
                debug!("Clearing {} which isn't offered on {}", time, date);
                self.time = None;
            }
        }

        info!("Selected pickup date {}", date);
        self.date = Some(date);
        Ok(())
    }

    pub fn select_time(
        &mut self,
        time: TimeSlot,
        policy: &SchedulingPolicy,
        now: NaiveDateTime,
    ) -> Result<(), SelectionError> {
        let Some(date) = self.date else {
            warn!("Rejected pickup time {} with no date", time);
            return Err(SelectionError::InvalidSelection(InvalidReason::NoDate));
        };

        if !policy.enumerate_slots(date, now).contains(&time) {
            warn!("Rejected pickup time {} on {}", time, date);
            return Err(SelectionError::InvalidSelection(
                InvalidReason::SlotUnavailable { date, time },
            ));
        }

        info!("Selected pickup time {} on {}", time, date);
        self.time = Some(time);
        Ok(())
    }

    pub fn to_pickup_timestamp(&self) -> Result<NaiveDateTime, SelectionError> {
        match (self.date, self.time) {
            (Some(date), Some(time)) => Ok(time.on(date)),
            (date, time) => Err(SelectionError::IncompleteSelection {
                date_set: date.is_some(),
                time_set: time.is_some(),
            }),
        }
    }

    pub fn reset(&mut self) {
        self.date = None;
        self.time = None;
    }
}
