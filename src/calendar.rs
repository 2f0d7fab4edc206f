use chrono::{Datelike as _, Days, NaiveDate};

use crate::error::{MoonlakeError, MoonlakeResult};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One cell of the 7-column month grid. Cells from adjacent months carry
/// their real date but no weekend/today/entry marks, matching the view they
/// project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub day: u32,
    pub in_month: bool,
    pub weekend: bool,
    pub today: bool,
    pub has_entry: bool,
}

/// Project a (year, month) onto a Sunday-first grid, padded with leading and
/// trailing days from the adjacent months so the cell count is always a
/// multiple of seven. A cell with entries opens the read view of the first
/// matching entry; an empty cell opens the editor pre-seeded with its date —
/// both decisions belong to the UI, which reads `has_entry` and `date`.
pub fn month_grid(
    year: i32,
    month: u32,
    today: NaiveDate,
    entry_dates: &[NaiveDate],
) -> MoonlakeResult<Vec<CalendarCell>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| MoonlakeError::validation(format!("invalid month {year}-{month}")))?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| MoonlakeError::validation("calendar overflow"))?;

    let days_in_month = (next_month - first).num_days() as u32;
    let leading = first.weekday().num_days_from_sunday();

    let mut cells = Vec::new();

    for i in 0..leading {
        let date = first - Days::new(u64::from(leading - i));
        cells.push(CalendarCell {
            date,
            day: date.day(),
            in_month: false,
            weekend: false,
            today: false,
            has_entry: false,
        });
    }

    for day in 0..days_in_month {
        let date = first + Days::new(u64::from(day));
        let dow = date.weekday().num_days_from_sunday();
        cells.push(CalendarCell {
            date,
            day: date.day(),
            in_month: true,
            weekend: dow == 0 || dow == 6,
            today: date == today,
            has_entry: entry_dates.contains(&date),
        });
    }

    let remainder = cells.len() % 7;
    if remainder != 0 {
        for i in 0..(7 - remainder) {
            let date = next_month + Days::new(i as u64);
            cells.push(CalendarCell {
                date,
                day: date.day(),
                in_month: false,
                weekend: false,
                today: false,
                has_entry: false,
            });
        }
    }

    Ok(cells)
}
