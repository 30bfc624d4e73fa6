//! Petits utilitaires de calendrier mensuel (jours 1..=N d'un mois donné).

use crate::model::Holiday;
use chrono::{Datelike, NaiveDate, Weekday};

pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = month_start(year, month) else {
        return 0;
    };
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next.map_or(0, |n| n.signed_duration_since(first).num_days() as u32)
}

/// Séquence ordonnée 1..=N, sans trou.
pub fn month_days(year: i32, month: u32) -> Vec<u32> {
    (1..=days_in_month(year, month)).collect()
}

pub fn date_of(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn is_sunday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

pub fn is_saturday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sat
}

/// Lundi..vendredi.
pub fn is_weekday(date: NaiveDate) -> bool {
    !is_saturday(date) && !is_sunday(date)
}

pub fn is_holiday(date: NaiveDate, holidays: &[Holiday]) -> bool {
    holidays.iter().any(|h| h.date == date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 13), 0);
        assert_eq!(month_days(2025, 4).len(), 30);
    }

    #[test]
    fn weekday_classification() {
        let sat = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let sun = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let mon = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert!(is_saturday(sat) && !is_weekday(sat));
        assert!(is_sunday(sun) && !is_weekday(sun));
        assert!(is_weekday(mon));
    }
}
