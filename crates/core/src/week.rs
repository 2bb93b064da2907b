//! ISO-8601 week date calculation.

use serde::Serialize;
use time::{Date, Duration, Month, OffsetDateTime, macros::format_description};

use crate::menu::Day;
use crate::{MealsyncError, Result};

/// Highest ISO week number.
pub const MAX_ISO_WEEK: i64 = 53;

/// Dates of Monday through Sunday of one ISO week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekDates {
    dates: [Date; 7],
}

impl WeekDates {
    /// Calendar date for a day.
    pub fn date(&self, day: Day) -> Date {
        self.dates[day.offset() as usize]
    }

    /// `YYYY-MM-DD` for a day.
    pub fn iso(&self, day: Day) -> String {
        format_iso(self.date(day))
    }

    pub fn monday(&self) -> String {
        self.iso(Day::Monday)
    }

    pub fn sunday(&self) -> String {
        self.iso(Day::Sunday)
    }

    /// `(day, YYYY-MM-DD)` pairs from Monday to Sunday.
    pub fn iter(&self) -> impl Iterator<Item = (Day, String)> + '_ {
        Day::ALL.into_iter().map(|day| (day, self.iso(day)))
    }
}

impl Serialize for WeekDates {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(7))?;
        for (day, iso) in self.iter() {
            map.serialize_entry(day.key(), &iso)?;
        }
        map.end()
    }
}

/// Computes the seven dates of ISO week `week` in `year`.
///
/// January 4th always falls in week 1, so week 1 starts on the Monday on or
/// before it. Weeks below 1 are treated as 1 and weeks above 53 as 53.
///
/// # Errors
///
/// Returns [`MealsyncError::InvalidYear`] if the year is outside the range
/// supported by the `time` crate.
///
/// # Example
///
/// ```rust
/// use mealsync_core::calculate_week_dates;
///
/// let week = calculate_week_dates(2025, 1).unwrap();
/// assert_eq!(week.monday(), "2024-12-30");
/// assert_eq!(week.sunday(), "2025-01-05");
/// ```
pub fn calculate_week_dates(year: i32, week: i64) -> Result<WeekDates> {
    let week = week.clamp(1, MAX_ISO_WEEK);

    let jan_4 = Date::from_calendar_date(year, Month::January, 4).map_err(|_| MealsyncError::InvalidYear(year))?;
    let week_one_monday = jan_4
        .checked_sub(Duration::days(i64::from(jan_4.weekday().number_days_from_monday())))
        .ok_or(MealsyncError::InvalidYear(year))?;
    let monday = week_one_monday
        .checked_add(Duration::weeks(week - 1))
        .ok_or(MealsyncError::InvalidYear(year))?;

    let mut dates = [monday; 7];
    for (offset, slot) in dates.iter_mut().enumerate() {
        *slot = monday
            .checked_add(Duration::days(offset as i64))
            .ok_or(MealsyncError::InvalidYear(year))?;
    }

    Ok(WeekDates { dates })
}

/// The current UTC calendar year.
pub fn current_year() -> i32 {
    OffsetDateTime::now_utc().year()
}

fn format_iso(date: Date) -> String {
    let format = format_description!("[year]-[month]-[day]");
    date.format(&format)
        .unwrap_or_else(|_| format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2025, 1, "2024-12-30", "2025-01-05")]
    #[case(2025, 26, "2025-06-23", "2025-06-29")]
    #[case(2026, 1, "2025-12-29", "2026-01-04")]
    #[case(2020, 53, "2020-12-28", "2021-01-03")]
    #[case(2021, 1, "2021-01-04", "2021-01-10")]
    fn test_known_weeks(#[case] year: i32, #[case] week: i64, #[case] monday: &str, #[case] sunday: &str) {
        let dates = calculate_week_dates(year, week).unwrap();
        assert_eq!(dates.monday(), monday);
        assert_eq!(dates.sunday(), sunday);
    }

    #[test]
    fn test_weeks_are_consecutive() {
        for year in [1999, 2015, 2024, 2025, 2032] {
            for week in 1..=53 {
                let dates = calculate_week_dates(year, week).unwrap();
                assert_eq!(dates.date(Day::Monday).weekday(), time::Weekday::Monday);
                for pair in Day::ALL.windows(2) {
                    assert_eq!(dates.date(pair[1]) - dates.date(pair[0]), Duration::days(1));
                }
                assert_eq!(dates.date(Day::Sunday) - dates.date(Day::Monday), Duration::days(6));
            }
        }
    }

    #[test]
    fn test_week_below_one_clamps() {
        let first = calculate_week_dates(2025, 1).unwrap();
        assert_eq!(calculate_week_dates(2025, 0).unwrap(), first);
        assert_eq!(calculate_week_dates(2025, -4).unwrap(), first);
    }

    #[test]
    fn test_week_above_max_clamps() {
        let last = calculate_week_dates(2025, 53).unwrap();
        assert_eq!(calculate_week_dates(2025, 9000).unwrap(), last);
    }

    #[test]
    fn test_invalid_year() {
        assert!(matches!(calculate_week_dates(100_000, 1), Err(MealsyncError::InvalidYear(_))));
    }

    #[test]
    fn test_serializes_as_day_map() {
        let dates = calculate_week_dates(2025, 26).unwrap();
        let value = serde_json::to_value(dates).unwrap();
        assert_eq!(value["monday"], "2025-06-23");
        assert_eq!(value["sunday"], "2025-06-29");
    }
}
