use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::models::Appointment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_focused_month: bool,
    pub is_today: bool,
}

/// Month view grid: whole weeks, Sunday-first, covering every day of the
/// reference month plus the lead-in/lead-out days needed to square it off.
/// "Today" comes from the UTC clock, the same frame timestamps are stored in.
pub fn month_grid(reference: NaiveDate) -> Vec<Vec<CalendarDay>> {
    month_grid_at(reference, Utc::now().naive_utc().date())
}

pub fn month_grid_at(reference: NaiveDate, today: NaiveDate) -> Vec<Vec<CalendarDay>> {
    let month_start = reference
        .with_day(1)
        .unwrap_or(reference);
    let month_end = last_day_of_month(month_start);

    let grid_start = week_start(month_start);
    let grid_end = week_start(month_end) + Duration::days(6);

    let mut weeks = Vec::new();
    let mut day = grid_start;
    while day <= grid_end {
        let week = (0..7)
            .map(|offset| {
                let date = day + Duration::days(offset);
                CalendarDay {
                    date,
                    in_focused_month: date.month() == month_start.month()
                        && date.year() == month_start.year(),
                    is_today: date == today,
                }
            })
            .collect();
        weeks.push(week);
        day += Duration::days(7);
    }
    weeks
}

/// Week view grid: exactly the 7 days of the week containing `reference`,
/// same Sunday-first convention as the month view.
pub fn week_grid(reference: NaiveDate) -> Vec<CalendarDay> {
    week_grid_at(reference, Utc::now().naive_utc().date())
}

pub fn week_grid_at(reference: NaiveDate, today: NaiveDate) -> Vec<CalendarDay> {
    let start = week_start(reference);
    (0..7)
        .map(|offset| {
            let date = start + Duration::days(offset);
            CalendarDay {
                date,
                in_focused_month: date.month() == reference.month()
                    && date.year() == reference.year(),
                is_today: date == today,
            }
        })
        .collect()
}

/// Appointments departing on the given calendar date, time-of-day ignored.
/// Feeds both the calendar cell markers and the day-detail listing.
pub fn on_date<'a>(date: NaiveDate, appointments: &'a [Appointment]) -> Vec<&'a Appointment> {
    appointments
        .iter()
        .filter(|a| a.departure_at.date() == date)
        .collect()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

fn last_day_of_month(month_start: NaiveDate) -> NaiveDate {
    let next_month = if month_start.month() == 12 {
        NaiveDate::from_ymd_opt(month_start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(month_start.year(), month_start.month() + 1, 1)
    };
    next_month
        .map(|d| d - Duration::days(1))
        .unwrap_or(month_start)
}
