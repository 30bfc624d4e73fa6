//! Comptages mensuels : équité de répartition et couverture horaire.

use crate::calendar;
use crate::model::{Schedule, ShiftCategory, ShiftCode, StaffId, StaffMember, TimeRanges};
use crate::patterns::{minutes_of, PatternSet};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Nombre d'occurrences de chaque code pour un membre sur une période.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeCounts(BTreeMap<ShiftCode, u32>);

impl CodeCounts {
    pub fn get(&self, code: ShiftCode) -> u32 {
        self.0.get(&code).copied().unwrap_or(0)
    }

    pub fn work_total(&self) -> u32 {
        ShiftCode::WORK.iter().map(|c| self.get(*c)).sum()
    }

    pub fn early_class(&self) -> u32 {
        self.get(ShiftCode::A) + self.get(ShiftCode::B)
    }

    fn bump(&mut self, code: ShiftCode) {
        *self.0.entry(code).or_insert(0) += 1;
    }
}

/// Compte les codes lus par `code_on` sur `dates` (cases vides ignorées).
pub fn tally<I, F>(dates: I, code_on: F) -> CodeCounts
where
    I: IntoIterator<Item = NaiveDate>,
    F: Fn(NaiveDate) -> ShiftCode,
{
    let mut counts = CodeCounts::default();
    for date in dates {
        let code = code_on(date);
        if code != ShiftCode::Unset {
            counts.bump(code);
        }
    }
    counts
}

/// Comptage par membre et par code sur les jours `days` du mois.
pub fn monthly_counts<'a, I>(
    staff: I,
    schedule: &Schedule,
    year: i32,
    month: u32,
    days: &[u32],
) -> BTreeMap<StaffId, CodeCounts>
where
    I: IntoIterator<Item = &'a StaffMember>,
{
    let dates: Vec<NaiveDate> = days
        .iter()
        .filter_map(|d| calendar::date_of(year, month, *d))
        .collect();
    staff
        .into_iter()
        .map(|member| {
            let counts = tally(dates.iter().copied(), |date| schedule.code(date, member.id));
            (member.id, counts)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffCount {
    pub staff_id: StaffId,
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FairnessScore {
    pub code: ShiftCode,
    pub std_dev: f64,
    pub balanced: bool,
    /// Trié par nombre décroissant, ordre du roster en cas d'égalité.
    pub counts: Vec<StaffCount>,
    pub outlier: Option<StaffId>,
}

pub const DEFAULT_FAIRNESS_THRESHOLD: f64 = 1.5;

/// Écart-type (population) du nombre de `code` parmi le personnel `Regular`.
pub fn fairness(
    staff: &[StaffMember],
    schedule: &Schedule,
    year: i32,
    month: u32,
    days: &[u32],
    code: ShiftCode,
    threshold: f64,
) -> FairnessScore {
    let regular: Vec<&StaffMember> = staff
        .iter()
        .filter(|s| s.category == ShiftCategory::Regular)
        .collect();
    let counts_by_staff = monthly_counts(regular.iter().copied(), schedule, year, month, days);

    let mut counts: Vec<StaffCount> = regular
        .iter()
        .map(|s| StaffCount {
            staff_id: s.id,
            name: s.name.clone(),
            count: counts_by_staff.get(&s.id).map_or(0, |c| c.get(code)),
        })
        .collect();

    if counts.is_empty() {
        return FairnessScore {
            code,
            std_dev: 0.0,
            balanced: true,
            counts,
            outlier: None,
        };
    }

    let n = counts.len() as f64;
    let mean = counts.iter().map(|c| f64::from(c.count)).sum::<f64>() / n;
    let variance = counts
        .iter()
        .map(|c| (f64::from(c.count) - mean).powi(2))
        .sum::<f64>()
        / n;
    let std_dev = variance.sqrt();

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    let outlier = counts.first().map(|c| c.staff_id);

    FairnessScore {
        code,
        std_dev,
        balanced: std_dev <= threshold,
        counts,
        outlier,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourCoverage {
    pub hour: u32,
    pub total: u32,
    pub qualified: u32,
}

pub const COVERAGE_FIRST_HOUR: u32 = 7;
pub const COVERAGE_LAST_HOUR: u32 = 19;

/// Présents à chaque heure pile de 7 h à 19 h, intervalle `[début, fin)`.
///
/// Indicateur de reporting : n'intervient jamais dans l'évaluation des candidats.
pub fn hourly_coverage(
    staff: &[StaffMember],
    schedule: &Schedule,
    time_ranges: &TimeRanges,
    patterns: &PatternSet,
    date: NaiveDate,
) -> Vec<HourCoverage> {
    let day_ranges = time_ranges.get(&date);
    let intervals: Vec<(u32, u32, bool)> = staff
        .iter()
        .filter(|s| s.category.is_rostered())
        .filter_map(|s| {
            let recorded = day_ranges
                .filter(|_| s.category == ShiftCategory::PartTime)
                .and_then(|ranges| ranges.get(&s.id));
            if let Some(range) = recorded {
                return Some((minutes_of(range.start), minutes_of(range.end), s.has_qualification));
            }
            let code = schedule.code(date, s.id);
            if !code.is_work() {
                return None;
            }
            let (start, end) = patterns.get(code)?.bounds_minutes();
            Some((start, end, s.has_qualification))
        })
        .collect();

    (COVERAGE_FIRST_HOUR..=COVERAGE_LAST_HOUR)
        .map(|hour| {
            let mark = hour * 60;
            let present = intervals
                .iter()
                .filter(|(start, end, _)| mark >= *start && mark < *end);
            let (total, qualified) = present.fold((0, 0), |(t, q), (_, _, is_q)| {
                (t + 1, q + u32::from(*is_q))
            });
            HourCoverage {
                hour,
                total,
                qualified,
            }
        })
        .collect()
}
