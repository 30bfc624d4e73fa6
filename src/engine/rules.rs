//! Règles de placement, une structure par règle.
//!
//! Chaque règle reçoit un [`Probe`] (contexte + placement hypothétique) et
//! renvoie au plus un message. L'ordre du [`RuleSet`] fixe l'ordre des
//! violations : règles bloquantes d'abord, puis indicatives.

use super::{
    util, ConstraintContext, ConstraintViolation, Enforcement, ScheduleView, ViolationKind,
};
use crate::calendar;
use crate::model::{ShiftCode, StaffMember};
use crate::stats;
use chrono::NaiveDate;
use std::fmt;

/// Placement hypothétique : `staff` tient `code` le jour `day`.
#[derive(Debug, Clone, Copy)]
pub struct Probe<'a> {
    pub ctx: &'a ConstraintContext<'a>,
    pub view: &'a ScheduleView<'a>,
    pub staff: &'a StaffMember,
    pub day: u32,
    pub date: NaiveDate,
    pub code: ShiftCode,
}

impl<'a> Probe<'a> {
    /// Code du membre évalué à `date`, placement compris.
    pub fn code_on(&self, date: NaiveDate) -> ShiftCode {
        if date == self.date {
            self.code
        } else {
            self.view.code(date, self.staff.id)
        }
    }

    /// Autres membres soumis aux règles qui tiennent déjà `code` ce jour-là.
    pub fn others_on_same_code(&self) -> impl Iterator<Item = &'a StaffMember> + '_ {
        self.ctx.rostered().filter(move |other| {
            other.id != self.staff.id && self.view.code(self.date, other.id) == self.code
        })
    }

    fn previous_code(&self) -> ShiftCode {
        util::previous_work_day(self.ctx, self.day)
            .map(|date| self.code_on(date))
            .unwrap_or_default()
    }

    fn next_code(&self) -> ShiftCode {
        util::next_work_day(self.ctx, self.day)
            .map(|date| self.code_on(date))
            .unwrap_or_default()
    }
}

pub trait Rule: fmt::Debug + Send + Sync {
    fn kind(&self) -> ViolationKind;
    fn enforcement(&self) -> Enforcement;
    /// `Some(message)` si le placement enfreint la règle.
    fn check(&self, probe: &Probe<'_>) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Incompatibility;

impl Rule for Incompatibility {
    fn kind(&self) -> ViolationKind {
        ViolationKind::Incompatible
    }
    fn enforcement(&self) -> Enforcement {
        Enforcement::Hard
    }
    fn check(&self, probe: &Probe<'_>) -> Option<String> {
        if !probe.code.is_work() {
            return None;
        }
        let names: Vec<&str> = probe
            .others_on_same_code()
            .filter(|other| probe.staff.is_incompatible_with(other))
            .map(|other| other.name.as_str())
            .collect();
        if names.is_empty() {
            return None;
        }
        Some(format!(
            "{} : incompatible avec {} sur le poste {}",
            probe.staff.name,
            names.join(", "),
            probe.code
        ))
    }
}

/// Restrictions de catégorie configurées dans les réglages.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryMismatch;

impl Rule for CategoryMismatch {
    fn kind(&self) -> ViolationKind {
        ViolationKind::CategoryMismatch
    }
    fn enforcement(&self) -> Enforcement {
        Enforcement::Hard
    }
    fn check(&self, probe: &Probe<'_>) -> Option<String> {
        if !probe.code.is_work() {
            return None;
        }
        let settings = probe.ctx.settings;
        if settings.qualified_codes.contains(&probe.code) && !probe.staff.has_qualification {
            return Some(format!(
                "{} : poste {} réservé au personnel qualifié",
                probe.staff.name, probe.code
            ));
        }
        if settings.enforce_saturday_only
            && probe.staff.saturday_only
            && !calendar::is_saturday(probe.date)
        {
            return Some(format!("{} : disponible le samedi uniquement", probe.staff.name));
        }
        None
    }
}

/// Même code sur le jour ouvré précédent ou suivant.
#[derive(Debug, Clone, Copy)]
pub struct RepeatedCode {
    code: ShiftCode,
    kind: ViolationKind,
}

impl RepeatedCode {
    pub fn early() -> Self {
        Self {
            code: ShiftCode::A,
            kind: ViolationKind::ConsecutiveEarly,
        }
    }
    pub fn late() -> Self {
        Self {
            code: ShiftCode::J,
            kind: ViolationKind::ConsecutiveLate,
        }
    }
}

impl Rule for RepeatedCode {
    fn kind(&self) -> ViolationKind {
        self.kind
    }
    fn enforcement(&self) -> Enforcement {
        Enforcement::Soft
    }
    fn check(&self, probe: &Probe<'_>) -> Option<String> {
        if probe.code != self.code {
            return None;
        }
        let before = probe.previous_code() == self.code;
        let after = probe.next_code() == self.code;
        let side = match (before, after) {
            (true, true) => "la veille et le lendemain",
            (true, false) => "la veille",
            (false, true) => "le lendemain",
            (false, false) => return None,
        };
        Some(format!(
            "{} : {} enchaîné avec {}",
            probe.staff.name, self.code, side
        ))
    }
}

/// J suivi de A (veille J puis A, ou J puis lendemain A).
#[derive(Debug, Clone, Copy, Default)]
pub struct LateThenEarly;

impl Rule for LateThenEarly {
    fn kind(&self) -> ViolationKind {
        ViolationKind::LateThenEarly
    }
    fn enforcement(&self) -> Enforcement {
        Enforcement::Soft
    }
    fn check(&self, probe: &Probe<'_>) -> Option<String> {
        match probe.code {
            ShiftCode::A if probe.previous_code() == ShiftCode::J => {
                Some(format!("{} : J la veille puis A", probe.staff.name))
            }
            ShiftCode::J if probe.next_code() == ShiftCode::A => {
                Some(format!("{} : J puis A le lendemain", probe.staff.name))
            }
            _ => None,
        }
    }
}

/// Plafond mensuel de postes du matin (A, B).
///
/// Le décompte lit la grille vue par le [`Probe`] : code actuel du jour évalué
/// pour un candidat, code reçu pour un échange.
#[derive(Debug, Clone, Copy, Default)]
pub struct EarlyLimit;

impl Rule for EarlyLimit {
    fn kind(&self) -> ViolationKind {
        ViolationKind::EarlyLimit
    }
    fn enforcement(&self) -> Enforcement {
        Enforcement::Soft
    }
    fn check(&self, probe: &Probe<'_>) -> Option<String> {
        let limit = probe.staff.early_shift_limit?;
        if !probe.code.is_early_class() {
            return None;
        }
        let month = (1..=probe.ctx.days_in_month()).filter_map(|d| probe.ctx.date(d));
        let count =
            stats::tally(month, |date| probe.view.code(date, probe.staff.id)).early_class();
        if count < limit {
            return None;
        }
        Some(format!(
            "{} : plafond de postes du matin atteint ({count}/{limit})",
            probe.staff.name
        ))
    }
}

/// Deux membres d'un même étage sur le même poste.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameFloor;

impl Rule for SameFloor {
    fn kind(&self) -> ViolationKind {
        ViolationKind::SameFloor
    }
    fn enforcement(&self) -> Enforcement {
        Enforcement::Soft
    }
    fn check(&self, probe: &Probe<'_>) -> Option<String> {
        if !probe.code.is_work() {
            return None;
        }
        let zone = probe.staff.zone()?;
        let other = probe
            .others_on_same_code()
            .find(|other| other.zone() == Some(zone))?;
        Some(format!(
            "{} : {} (étage {zone}) tient déjà le poste {}",
            probe.staff.name, other.name, probe.code
        ))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WorkStreak {
    pub threshold: u32,
}

impl Default for WorkStreak {
    fn default() -> Self {
        Self { threshold: 6 }
    }
}

impl Rule for WorkStreak {
    fn kind(&self) -> ViolationKind {
        ViolationKind::SixConsecutive
    }
    fn enforcement(&self) -> Enforcement {
        Enforcement::Soft
    }
    fn check(&self, probe: &Probe<'_>) -> Option<String> {
        if !probe.code.is_work() {
            return None;
        }
        let streak = util::work_streak_through(probe.ctx, probe.day, |date| probe.code_on(date));
        if streak < self.threshold {
            return None;
        }
        Some(format!(
            "{} : {streak} jours travaillés d'affilée",
            probe.staff.name
        ))
    }
}

/// Liste ordonnée de règles.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    /// Ordre fixe : incompatibilité, catégorie, A-A, J-J, J→A, plafond matin,
    /// étage, série de jours travaillés.
    pub fn standard() -> Self {
        Self::from_rules(vec![
            Box::new(Incompatibility),
            Box::new(CategoryMismatch),
            Box::new(RepeatedCode::early()),
            Box::new(RepeatedCode::late()),
            Box::new(LateThenEarly),
            Box::new(EarlyLimit),
            Box::new(SameFloor),
            Box::new(WorkStreak::default()),
        ])
    }

    /// Conserve l'ordre donné, règles bloquantes remontées en tête.
    pub fn from_rules(mut rules: Vec<Box<dyn Rule>>) -> Self {
        rules.sort_by_key(|rule| rule.enforcement());
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| &**rule as &dyn Rule)
    }

    pub fn evaluate(&self, probe: &Probe<'_>) -> Vec<ConstraintViolation> {
        self.iter()
            .filter_map(|rule| {
                rule.check(probe).map(|message| ConstraintViolation {
                    kind: rule.kind(),
                    severity: rule.enforcement(),
                    message,
                })
            })
            .collect()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}
