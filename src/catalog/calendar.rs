use chrono::{Datelike, NaiveDate};

use crate::catalog::Catalog;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub has_quote: bool,
    pub solved: bool,
    pub is_today: bool,
    pub is_future: bool,
}

impl CalendarDay {
    /// Past or present days with a quote can be opened from the calendar.
    pub fn is_playable(&self) -> bool {
        self.has_quote && !self.is_future
    }
}

impl Catalog {
    /// Every day of the given month, annotated for the calendar view.
    /// Returns an empty list for an invalid year/month.
    pub fn month_view(
        &self,
        year: i32,
        month: u32,
        today: NaiveDate,
        is_solved: impl Fn(NaiveDate) -> bool,
    ) -> Vec<CalendarDay> {
        let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return Vec::new();
        };

        first
            .iter_days()
            .take_while(|d| d.month() == month)
            .map(|date| CalendarDay {
                date,
                has_quote: self.contains(date),
                solved: is_solved(date),
                is_today: date == today,
                is_future: date > today,
            })
            .collect()
    }
}

/// Step a (year, month) pair by `delta` months.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}
