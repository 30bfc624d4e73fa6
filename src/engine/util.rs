use super::ConstraintContext;
use crate::calendar;
use crate::model::ShiftCode;
use chrono::NaiveDate;

/// Un jour "ouvré" pour l'adjacence : ni dimanche, ni jour férié listé.
fn is_open_day(ctx: &ConstraintContext<'_>, date: NaiveDate) -> bool {
    !calendar::is_sunday(date) && !calendar::is_holiday(date, ctx.holidays)
}

/// Jour ouvré précédent dans le mois, s'il existe.
pub(super) fn previous_work_day(ctx: &ConstraintContext<'_>, day: u32) -> Option<NaiveDate> {
    (1..day)
        .rev()
        .filter_map(|d| ctx.date(d))
        .find(|date| is_open_day(ctx, *date))
}

/// Jour ouvré suivant dans le mois, s'il existe.
pub(super) fn next_work_day(ctx: &ConstraintContext<'_>, day: u32) -> Option<NaiveDate> {
    (day + 1..=ctx.days_in_month())
        .filter_map(|d| ctx.date(d))
        .find(|date| is_open_day(ctx, *date))
}

/// Longueur de la série de jours travaillés contenant `day` (compté travaillé).
///
/// Un dimanche non travaillé ne coupe pas la série ; la série s'arrête aux
/// bornes du mois.
pub(super) fn work_streak_through<F>(ctx: &ConstraintContext<'_>, day: u32, code_on: F) -> u32
where
    F: Fn(NaiveDate) -> ShiftCode,
{
    let extends = |d: u32| -> Option<bool> {
        let date = ctx.date(d)?;
        if code_on(date).is_work() {
            Some(true)
        } else if calendar::is_sunday(date) {
            Some(false)
        } else {
            None
        }
    };

    let mut count = 1;
    for d in (1..day).rev() {
        match extends(d) {
            Some(true) => count += 1,
            Some(false) => continue,
            None => break,
        }
    }
    for d in day + 1..=ctx.days_in_month() {
        match extends(d) {
            Some(true) => count += 1,
            Some(false) => continue,
            None => break,
        }
    }
    count
}
