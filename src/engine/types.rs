use crate::model::{ShiftCode, StaffId};
use serde::Serialize;
use thiserror::Error;

/// Force d'une règle côté candidats : `Hard` rend le placement impossible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Enforcement {
    Hard,
    Soft,
}

/// Gravité affichée (échanges, alertes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    Incompatible,
    CategoryMismatch,
    ConsecutiveEarly,
    ConsecutiveLate,
    LateThenEarly,
    EarlyLimit,
    SameFloor,
    SixConsecutive,
}

impl ViolationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::Incompatible => "incompatible",
            ViolationKind::CategoryMismatch => "category_mismatch",
            ViolationKind::ConsecutiveEarly => "consecutive_a",
            ViolationKind::ConsecutiveLate => "consecutive_j",
            ViolationKind::LateThenEarly => "late_then_early",
            ViolationKind::EarlyLimit => "early_limit",
            ViolationKind::SameFloor => "same_floor",
            ViolationKind::SixConsecutive => "six_consecutive",
        }
    }

    /// Gravité d'échange : seule l'incompatibilité est une erreur.
    pub fn swap_severity(self) -> Severity {
        match self {
            ViolationKind::Incompatible => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintViolation {
    pub kind: ViolationKind,
    pub severity: Enforcement,
    pub message: String,
}

/// Résultat d'évaluation d'un membre pour une case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateEvaluation {
    pub staff_id: StaffId,
    pub staff_name: String,
    pub current_code: ShiftCode,
    pub is_assignable: bool,
    pub violations: Vec<ConstraintViolation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapViolation {
    pub staff_id: StaffId,
    pub staff_name: String,
    pub kind: ViolationKind,
    pub description: String,
    pub severity: Severity,
}

/// Partenaire d'échange possible, avec les conséquences simulées.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapCandidate {
    pub staff_id: StaffId,
    pub staff_name: String,
    pub current_code: ShiftCode,
    pub violations: Vec<SwapViolation>,
}

impl SwapCandidate {
    pub fn error_count(&self) -> usize {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
            .count()
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("day {day} is outside {year}-{month:02}")]
    DayOutOfRange { year: i32, month: u32, day: u32 },
    #[error("unknown staff: {0}")]
    UnknownStaff(StaffId),
    #[error("swap not applicable: {name} holds {code:?} on that day, only work codes swap")]
    SwapNotApplicable { name: String, code: ShiftCode },
}
