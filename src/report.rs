use crate::alerts::Alert;
use crate::engine::{CandidateEvaluation, Enforcement, Severity, SwapCandidate};
use crate::model::ShiftCode;
use crate::stats::{FairnessScore, HourCoverage};
use chrono::NaiveDate;
use std::fmt::Write;

/// Permet de customiser le rendu des alertes (texte, tableau de bord, etc.).
pub trait AlertRenderer {
    fn render(&self, alerts: &[Alert]) -> String;
}

/// Rendu texte brut pour le terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReport;

fn tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "ERR ",
        Severity::Warning => "WARN",
    }
}

impl AlertRenderer for TextReport {
    fn render(&self, alerts: &[Alert]) -> String {
        let errors = alerts
            .iter()
            .filter(|a| a.severity == Severity::Error)
            .count();
        let mut out = format!(
            "{} alerte(s) : {} erreur(s), {} avertissement(s)\n",
            alerts.len(),
            errors,
            alerts.len() - errors
        );
        for alert in alerts {
            let _ = writeln!(
                out,
                "[{}] {} : {}",
                tag(alert.severity),
                alert.title,
                alert.description
            );
        }
        out
    }
}

pub fn render_candidates(
    date: NaiveDate,
    code: ShiftCode,
    candidates: &[CandidateEvaluation],
) -> String {
    let assignable = candidates.iter().filter(|c| c.is_assignable).count();
    let mut out = format!(
        "{date} poste {code} : {assignable} placable(s), {} bloqué(s)\n",
        candidates.len() - assignable
    );
    for c in candidates {
        let mark = match (c.is_assignable, c.violations.is_empty()) {
            (false, _) => "x",
            (true, true) => "ok",
            (true, false) => "!",
        };
        let _ = writeln!(
            out,
            "{mark:>2} {} (actuel : {})",
            c.staff_name, c.current_code
        );
        for v in &c.violations {
            let level = match v.severity {
                Enforcement::Hard => "bloquant",
                Enforcement::Soft => "indicatif",
            };
            let _ = writeln!(out, "     - [{level}] {}", v.message);
        }
    }
    out
}

pub fn render_swap_candidates(date: NaiveDate, candidates: &[SwapCandidate]) -> String {
    let mut out = format!("{date} : {} échange(s) possible(s)\n", candidates.len());
    for c in candidates {
        let _ = writeln!(
            out,
            "  {} ({}) : {} erreur(s), {} violation(s)",
            c.staff_name,
            c.current_code,
            c.error_count(),
            c.violations.len()
        );
        for v in &c.violations {
            let _ = writeln!(out, "     - [{}] {}", tag(v.severity), v.description);
        }
    }
    out
}

pub fn render_fairness(score: &FairnessScore) -> String {
    let verdict = if score.balanced { "équilibré" } else { "déséquilibré" };
    let mut out = format!(
        "poste {} : écart-type {:.2} ({verdict})\n",
        score.code, score.std_dev
    );
    for c in &score.counts {
        let marker = if Some(c.staff_id) == score.outlier { "*" } else { " " };
        let _ = writeln!(out, " {marker} {:<20} {}", c.name, c.count);
    }
    out
}

pub fn render_coverage(date: NaiveDate, hours: &[HourCoverage]) -> String {
    let mut out = format!("{date} : présents par heure (qualifiés)\n");
    for h in hours {
        let _ = writeln!(out, "  {:02}:00  {:>2} ({})", h.hour, h.total, h.qualified);
    }
    out
}
