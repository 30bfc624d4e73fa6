mod candidates;
mod context;
pub mod rules;
mod swap;
mod types;
mod util;

pub use context::{ConstraintContext, ScheduleView};
pub use rules::{Probe, Rule, RuleSet};
pub use types::{
    CandidateEvaluation, ConstraintViolation, Enforcement, EngineError, Severity, SwapCandidate,
    SwapViolation, ViolationKind,
};

use crate::model::{ShiftCode, StaffId};

/// Moteur d'évaluation : sans état hormis la liste de règles.
///
/// Chaque appel est une fonction pure de l'instantané reçu ; la grille n'est
/// jamais modifiée.
#[derive(Debug, Default)]
pub struct Engine {
    rules: RuleSet,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            rules: RuleSet::standard(),
        }
    }

    pub fn with_rules(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Une entrée par membre soumis aux règles, dans l'ordre du roster.
    pub fn evaluate_candidates(
        &self,
        ctx: &ConstraintContext<'_>,
        day: u32,
        code: ShiftCode,
    ) -> Vec<CandidateEvaluation> {
        candidates::evaluate_candidates(&self.rules, ctx, day, code)
    }

    /// Simule l'échange des postes de `source` et `target` le jour `day`.
    ///
    /// Violations de `source` d'abord, puis celles de `target`.
    pub fn evaluate_swap(
        &self,
        ctx: &ConstraintContext<'_>,
        source: StaffId,
        target: StaffId,
        day: u32,
    ) -> Result<Vec<SwapViolation>, EngineError> {
        swap::evaluate_swap(&self.rules, ctx, source, target, day)
    }

    pub fn swap_candidates(
        &self,
        ctx: &ConstraintContext<'_>,
        source: StaffId,
        day: u32,
    ) -> Result<Vec<SwapCandidate>, EngineError> {
        swap::swap_candidates(&self.rules, ctx, source, day)
    }
}
