use super::{CandidateEvaluation, ConstraintContext, Enforcement, Probe, RuleSet, ScheduleView};
use crate::model::ShiftCode;

pub(super) fn evaluate_candidates(
    rules: &RuleSet,
    ctx: &ConstraintContext<'_>,
    day: u32,
    code: ShiftCode,
) -> Vec<CandidateEvaluation> {
    let Some(date) = ctx.date(day) else {
        return Vec::new();
    };
    let view = ScheduleView::new(ctx.schedule);

    ctx.rostered()
        .map(|staff| {
            let probe = Probe {
                ctx,
                view: &view,
                staff,
                day,
                date,
                code,
            };
            let violations = rules.evaluate(&probe);
            let is_assignable = violations
                .iter()
                .all(|v| v.severity != Enforcement::Hard);
            CandidateEvaluation {
                staff_id: staff.id,
                staff_name: staff.name.clone(),
                current_code: ctx.schedule.code(date, staff.id),
                is_assignable,
                violations,
            }
        })
        .collect()
}
