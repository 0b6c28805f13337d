use chrono::{Datelike, Months, NaiveDate};

/// One calendar month, as shown by the date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    // Always the 1st
    first: NaiveDate,
}

/// A single cell of the date grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub selectable: bool,
    pub selected: bool,
}

impl MonthView {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            // Safe to unwrap because day 1 exists in every month
            first: date.with_day(1).unwrap(),
        }
    }

    pub fn year(self) -> i32 {
        self.first.year()
    }

    pub fn month(self) -> u32 {
        self.first.month()
    }

    // Stepping a month only fails at the ends of chrono's date range, in
    // which case the view stays put.
    pub fn next_month(self) -> Self {
        self.first
            .checked_add_months(Months::new(1))
            .map_or(self, |first| Self { first })
    }

    pub fn previous_month(self) -> Self {
        self.first
            .checked_sub_months(Months::new(1))
            .map_or(self, |first| Self { first })
    }

    pub fn days(self) -> Vec<NaiveDate> {
        self.first
            .iter_days()
            .take_while(|date| date.month() == self.first.month())
            .collect()
    }

    /// Empty cells before the 1st in a grid whose weeks start on Sunday.
    pub fn leading_blanks(self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// Header text such as "June 2025".
    pub fn title(self) -> String {
        self.first.format("%B %Y").to_string()
    }
}
