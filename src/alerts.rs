//! Balayage mensuel : séries de travail, sous-effectif, séries de A et de J.

use crate::calendar;
use crate::engine::Severity;
use crate::model::{Holiday, Schedule, ShiftCode, StaffId, StaffMember};
use crate::stats::{self, CodeCounts};
use serde::Serialize;
use std::collections::BTreeMap;

/// Seuils du balayage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertOptions {
    pub min_headcount: u32,
    pub work_streak: u32,
    pub early_streak: u32,
    pub late_streak: u32,
}

impl Default for AlertOptions {
    fn default() -> Self {
        Self {
            min_headcount: 5,
            work_streak: 6,
            early_streak: 3,
            late_streak: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertKind {
    ConsecutiveWork {
        staff_id: StaffId,
        length: u32,
        first_day: u32,
        last_day: u32,
    },
    Understaffed {
        day: u32,
        count: u32,
        required: u32,
    },
    EarlyStreak {
        staff_id: StaffId,
        length: u32,
        first_day: u32,
        last_day: u32,
    },
    LateStreak {
        staff_id: StaffId,
        length: u32,
        first_day: u32,
        last_day: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub id: String,
    pub kind: AlertKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

/// Série maximale détectée : (longueur, premier jour, dernier jour).
type Run = (u32, u32, u32);

/// Séries de jours consécutifs de `days` où `matches` est vrai, de longueur ≥ `threshold`.
fn runs<F>(days: &[u32], threshold: u32, matches: F) -> Vec<Run>
where
    F: Fn(u32) -> bool,
{
    let mut out = Vec::new();
    let mut length = 0;
    let mut first = 0;
    let mut last = 0;
    for &day in days {
        if matches(day) {
            if length == 0 {
                first = day;
            }
            length += 1;
            last = day;
            continue;
        }
        if length >= threshold && length > 0 {
            out.push((length, first, last));
        }
        length = 0;
    }
    // série encore ouverte en fin de mois
    if length >= threshold && length > 0 {
        out.push((length, first, last));
    }
    out
}

struct Scan<'a> {
    eligible: Vec<&'a StaffMember>,
    counts: BTreeMap<StaffId, CodeCounts>,
    schedule: &'a Schedule,
    days: &'a [u32],
    year: i32,
    month: u32,
}

impl Scan<'_> {
    fn code(&self, staff: StaffId, day: u32) -> ShiftCode {
        calendar::date_of(self.year, self.month, day)
            .map(|date| self.schedule.code(date, staff))
            .unwrap_or_default()
    }

    /// Passe par membre ; `possible` écarte ceux dont le total ne peut atteindre le seuil.
    fn streaks<P, M, A>(&self, threshold: u32, possible: P, matches: M, alert: A) -> Vec<Alert>
    where
        P: Fn(&CodeCounts) -> u32,
        M: Fn(ShiftCode) -> bool,
        A: Fn(&StaffMember, Run) -> Alert,
    {
        let mut out = Vec::new();
        for staff in &self.eligible {
            let total = self.counts.get(&staff.id).map_or(0, &possible);
            if total < threshold.max(1) {
                continue;
            }
            let found = runs(self.days, threshold, |day| matches(self.code(staff.id, day)));
            out.extend(found.into_iter().map(|run| alert(*staff, run)));
        }
        out
    }
}

/// Alertes du mois, dans l'ordre : séries de travail, sous-effectif, séries A, séries J.
pub fn scan_alerts(
    staff: &[StaffMember],
    schedule: &Schedule,
    days: &[u32],
    year: i32,
    month: u32,
    holidays: &[Holiday],
    opts: &AlertOptions,
) -> Vec<Alert> {
    let eligible: Vec<&StaffMember> = staff.iter().filter(|s| s.category.is_rostered()).collect();
    let counts = stats::monthly_counts(eligible.iter().copied(), schedule, year, month, days);
    let scan = Scan {
        eligible,
        counts,
        schedule,
        days,
        year,
        month,
    };

    let mut alerts = scan.streaks(
        opts.work_streak,
        CodeCounts::work_total,
        ShiftCode::is_work,
        |s, (length, first_day, last_day)| Alert {
            id: format!("consecutive-{}-{}", s.id, first_day),
            kind: AlertKind::ConsecutiveWork {
                staff_id: s.id,
                length,
                first_day,
                last_day,
            },
            severity: Severity::Error,
            title: "Jours travaillés consécutifs".to_string(),
            description: format!(
                "{} : {length} jours travaillés d'affilée (du {first_day} au {last_day})",
                s.name
            ),
        },
    );

    alerts.extend(understaffed(&scan, holidays, opts.min_headcount));

    alerts.extend(scan.streaks(
        opts.early_streak,
        |c| c.get(ShiftCode::A),
        |code| code == ShiftCode::A,
        |s, (length, first_day, last_day)| Alert {
            id: format!("early-streak-{}-{}", s.id, first_day),
            kind: AlertKind::EarlyStreak {
                staff_id: s.id,
                length,
                first_day,
                last_day,
            },
            severity: Severity::Warning,
            title: "Postes A consécutifs".to_string(),
            description: format!(
                "{} : poste A {length} jours d'affilée (du {first_day} au {last_day})",
                s.name
            ),
        },
    ));

    alerts.extend(scan.streaks(
        opts.late_streak,
        |c| c.get(ShiftCode::J),
        |code| code == ShiftCode::J,
        |s, (length, first_day, last_day)| Alert {
            id: format!("late-streak-{}-{}", s.id, first_day),
            kind: AlertKind::LateStreak {
                staff_id: s.id,
                length,
                first_day,
                last_day,
            },
            severity: Severity::Warning,
            title: "Postes J consécutifs".to_string(),
            description: format!(
                "{} : poste J {length} jours d'affilée (du {first_day} au {last_day})",
                s.name
            ),
        },
    ));

    #[cfg(feature = "logging")]
    tracing::debug!(year, month, alerts = alerts.len(), "alert scan done");

    alerts
}

/// Jours de semaine non fériés avec `0 < présents < requis`.
///
/// Un jour sans aucun présent est traité comme "pas de données" et ignoré.
fn understaffed(scan: &Scan<'_>, holidays: &[Holiday], required: u32) -> Vec<Alert> {
    let mut out = Vec::new();
    for &day in scan.days {
        let Some(date) = calendar::date_of(scan.year, scan.month, day) else {
            continue;
        };
        if !calendar::is_weekday(date) || calendar::is_holiday(date, holidays) {
            continue;
        }
        let count = scan
            .eligible
            .iter()
            .filter(|s| scan.schedule.code(date, s.id).is_work())
            .count() as u32;
        if count == 0 || count >= required {
            continue;
        }
        out.push(Alert {
            id: format!("understaffed-{day}"),
            kind: AlertKind::Understaffed {
                day,
                count,
                required,
            },
            severity: Severity::Warning,
            title: "Effectif insuffisant".to_string(),
            description: format!(
                "{}/{day} : {count} présent(s) (requis : {required}, manque : {})",
                scan.month,
                required - count
            ),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::runs;

    #[test]
    fn runs_flush_at_month_end() {
        let days: Vec<u32> = (1..=10).collect();
        let found = runs(&days, 3, |d| d >= 8);
        assert_eq!(found, vec![(3, 8, 10)]);
    }

    #[test]
    fn runs_below_threshold_are_dropped() {
        let days: Vec<u32> = (1..=10).collect();
        let found = runs(&days, 3, |d| d == 2 || d == 3 || (5..=7).contains(&d));
        assert_eq!(found, vec![(3, 5, 7)]);
    }
}
