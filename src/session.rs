use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info};

use crate::{
    calendar::{CalendarDay, MonthView},
    clock::Clock,
    policy::SchedulingPolicy,
    selection::{InvalidReason, SelectionError, SelectionState},
    slots::TimeSlot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SelectDate(NaiveDate),
    SelectTime(TimeSlot),
    NextMonth,
    PreviousMonth,
    Reset,
    Close,
}

/// One open date/time picker.
pub struct SchedulingSession<TClock>
where
    TClock: Clock,
{
    clock: TClock,
    policy: SchedulingPolicy,
    selection: SelectionState,
    month: MonthView,
}

impl<TClock> SchedulingSession<TClock>
where
    TClock: Clock,
{
    pub fn new(clock: TClock, policy: SchedulingPolicy) -> Self {
        let month = MonthView::containing(clock.now().date());
        info!("Opened scheduling session on {}", month.title());
        Self {
            clock,
            policy,
            selection: SelectionState::new(),
            month,
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn month(&self) -> MonthView {
        self.month
    }

    /// Handles one picker event. Returns true once the dialog should close.
    ///
    /// A rejected pick comes back as a [`SelectionError`] and leaves the
    /// session usable.
    pub fn handle_event(&mut self, event: SessionEvent) -> Result<bool> {
        let now = self.clock.now();
        match event {
            SessionEvent::SelectDate(date) => {
                self.selection
                    .select_date(date, &self.policy, now)
                    .context("Failed to select pickup date")?;
                self.month = MonthView::containing(date);
            }
            SessionEvent::SelectTime(time) => {
                self.selection
                    .select_time(time, &self.policy, now)
                    .context("Failed to select pickup time")?;
            }
            SessionEvent::NextMonth => {
                self.month = self.month.next_month();
                debug!("Showing {}", self.month.title());
            }
            SessionEvent::PreviousMonth => {
                self.month = self.month.previous_month();
                debug!("Showing {}", self.month.title());
            }
            SessionEvent::Reset => {
                self.selection.reset();
            }
            SessionEvent::Close => {
                info!("Closed scheduling session");
                return Ok(true);
            }
        }

        Ok(false)
    }

    pub fn calendar(&self) -> Vec<CalendarDay> {
        let now = self.clock.now();
        self.month
            .days()
            .into_iter()
            .map(|date| CalendarDay {
                date,
                selectable: self.policy.is_selectable(date, now),
                selected: self.selection.date() == Some(date),
            })
            .collect()
    }

    pub fn available_slots(&self) -> Vec<TimeSlot> {
        match self.selection.date() {
            Some(date) => self.policy.enumerate_slots(date, self.clock.now()),
            None => Vec::new(),
        }
    }

    /// The chosen pickup instant, re-checked against the current time since
    /// a slot can expire while the dialog sits open.
    pub fn confirm(&self) -> Result<NaiveDateTime, SelectionError> {
        let pickup = self.selection.to_pickup_timestamp()?;
        let now = self.clock.now();
        let date = pickup.date();
        if !self.policy.is_selectable(date, now) {
            return Err(SelectionError::InvalidSelection(
                InvalidReason::DateUnavailable(date),
            ));
        }
        // to_pickup_timestamp succeeded so the time is set
        if let Some(time) = self.selection.time() {
            if !self.policy.enumerate_slots(date, now).contains(&time) {
                return Err(SelectionError::InvalidSelection(
                    InvalidReason::SlotUnavailable { date, time },
                ));
            }
        }

        info!("Confirmed pickup at {}", pickup);
        Ok(pickup)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::{Duration, NaiveDate, NaiveDateTime};

    use crate::{
        clock::testhelper::FixedClock,
        policy::SchedulingPolicy,
        selection::{InvalidReason, SelectionError},
        slots::TimeSlot,
    };

    use super::{SchedulingSession, SessionEvent};

    fn d(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn slot(s: &str) -> TimeSlot {
        TimeSlot::from_str(s).unwrap()
    }

    #[test]
    fn opens_on_current_month() {
        let clock = FixedClock::at("2025-06-01T10:00:00");
        let session = SchedulingSession::new(&clock, SchedulingPolicy::default());

        assert_eq!((session.month().year(), session.month().month()), (2025, 6));
        assert!(session.available_slots().is_empty());
        assert!(session.calendar().iter().all(|day| !day.selected));
    }

    #[test]
    fn calendar_after_cutover() {
        let clock = FixedClock::at("2025-06-01T17:00:00");
        let session = SchedulingSession::new(&clock, SchedulingPolicy::default());

        let calendar = session.calendar();
        assert_eq!(calendar.len(), 30);
        assert!(!calendar[0].selectable);
        assert!(calendar[1..].iter().all(|day| day.selectable));
    }

    #[test]
    fn pick_date_and_time() {
        let clock = FixedClock::at("2025-06-01T10:00:00");
        let mut session = SchedulingSession::new(&clock, SchedulingPolicy::default());

        assert!(!session
            .handle_event(SessionEvent::SelectDate(d("2025-06-01")))
            .unwrap());
        assert_eq!(session.available_slots().len(), 25);
        assert!(!session
            .handle_event(SessionEvent::SelectTime(slot("14:30")))
            .unwrap());

        let selected: Vec<_> = session
            .calendar()
            .into_iter()
            .filter(|day| day.selected)
            .collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].date, d("2025-06-01"));

        assert_eq!(
            session.confirm(),
            Ok(NaiveDateTime::from_str("2025-06-01T14:30:00").unwrap())
        );
        assert!(session.handle_event(SessionEvent::Close).unwrap());
    }

    #[test]
    fn rejected_pick_is_recoverable() {
        let clock = FixedClock::at("2025-06-01T10:00:00");
        let mut session = SchedulingSession::new(&clock, SchedulingPolicy::default());

        let err: SelectionError = session
            .handle_event(SessionEvent::SelectTime(slot("14:30")))
            .unwrap_err()
            .downcast()
            .unwrap();
        assert_eq!(err, SelectionError::InvalidSelection(InvalidReason::NoDate));

        session
            .handle_event(SessionEvent::SelectDate(d("2025-06-02")))
            .unwrap();
        session
            .handle_event(SessionEvent::SelectTime(slot("06:00")))
            .unwrap();
        assert_eq!(session.selection().time(), Some(slot("06:00")));
    }

    #[test]
    fn month_navigation_follows_selection() {
        let clock = FixedClock::at("2025-06-01T10:00:00");
        let mut session = SchedulingSession::new(&clock, SchedulingPolicy::default());

        session.handle_event(SessionEvent::PreviousMonth).unwrap();
        assert_eq!(session.month().month(), 5);
        assert!(session.calendar().iter().all(|day| !day.selectable));

        session.handle_event(SessionEvent::NextMonth).unwrap();
        session.handle_event(SessionEvent::NextMonth).unwrap();
        assert_eq!(session.month().month(), 7);

        session
            .handle_event(SessionEvent::SelectDate(d("2025-09-10")))
            .unwrap();
        assert_eq!(session.month().month(), 9);
    }

    #[test]
    fn reset_clears_selection() {
        let clock = FixedClock::at("2025-06-01T10:00:00");
        let mut session = SchedulingSession::new(&clock, SchedulingPolicy::default());
        session
            .handle_event(SessionEvent::SelectDate(d("2025-06-02")))
            .unwrap();
        session.handle_event(SessionEvent::Reset).unwrap();

        assert_eq!(
            session.confirm(),
            Err(SelectionError::IncompleteSelection {
                date_set: false,
                time_set: false
            })
        );
    }

    #[test]
    fn confirm_rejects_slot_that_went_stale() {
        let clock = FixedClock::at("2025-06-01T10:00:00");
        let mut session = SchedulingSession::new(&clock, SchedulingPolicy::default());
        session
            .handle_event(SessionEvent::SelectDate(d("2025-06-01")))
            .unwrap();
        session
            .handle_event(SessionEvent::SelectTime(slot("14:00")))
            .unwrap();

        clock.advance(Duration::minutes(30));
        assert_eq!(
            session.confirm(),
            Err(SelectionError::InvalidSelection(
                InvalidReason::SlotUnavailable {
                    date: d("2025-06-01"),
                    time: slot("14:00")
                }
            ))
        );
    }

    #[test]
    fn confirm_rejects_date_past_cutover() {
        let clock = FixedClock::at("2025-06-01T15:00:00");
        let mut session = SchedulingSession::new(&clock, SchedulingPolicy::default());
        session
            .handle_event(SessionEvent::SelectDate(d("2025-06-01")))
            .unwrap();
        session
            .handle_event(SessionEvent::SelectTime(slot("19:30")))
            .unwrap();

        clock.advance(Duration::hours(1));
        assert_eq!(
            session.confirm(),
            Err(SelectionError::InvalidSelection(
                InvalidReason::DateUnavailable(d("2025-06-01"))
            ))
        );
    }
}
