use super::{
    ConstraintContext, EngineError, Probe, RuleSet, ScheduleView, SwapCandidate, SwapViolation,
};
use crate::model::{ShiftCode, StaffId, StaffMember};
use chrono::NaiveDate;

/// Participant d'échange : membre soumis aux règles et tenant un poste de travail.
fn participant<'a>(
    ctx: &ConstraintContext<'a>,
    id: StaffId,
    date: NaiveDate,
) -> Result<(&'a StaffMember, ShiftCode), EngineError> {
    let staff = ctx.find_staff(id).ok_or(EngineError::UnknownStaff(id))?;
    let code = ctx.schedule.code(date, id);
    if !staff.category.is_rostered() || !code.is_work() {
        #[cfg(feature = "logging")]
        tracing::debug!(staff = %id, ?code, %date, "swap refused: no work code to exchange");
        return Err(EngineError::SwapNotApplicable {
            name: staff.name.clone(),
            code,
        });
    }
    Ok((staff, code))
}

fn date_of(ctx: &ConstraintContext<'_>, day: u32) -> Result<NaiveDate, EngineError> {
    ctx.date(day).ok_or(EngineError::DayOutOfRange {
        year: ctx.year,
        month: ctx.month,
        day,
    })
}

pub(super) fn evaluate_swap(
    rules: &RuleSet,
    ctx: &ConstraintContext<'_>,
    source: StaffId,
    target: StaffId,
    day: u32,
) -> Result<Vec<SwapViolation>, EngineError> {
    let date = date_of(ctx, day)?;
    let (source, source_code) = participant(ctx, source, date)?;
    let (target, target_code) = participant(ctx, target, date)?;
    if source.id == target.id {
        return Ok(Vec::new());
    }

    let mut view = ScheduleView::with_day_copy(ctx.schedule, date);
    view.set(date, source.id, target_code);
    view.set(date, target.id, source_code);

    let mut out = Vec::new();
    for (staff, code) in [(source, target_code), (target, source_code)] {
        let probe = Probe {
            ctx,
            view: &view,
            staff,
            day,
            date,
            code,
        };
        out.extend(rules.evaluate(&probe).into_iter().map(|v| SwapViolation {
            staff_id: staff.id,
            staff_name: staff.name.clone(),
            kind: v.kind,
            description: v.message,
            severity: v.kind.swap_severity(),
        }));
    }
    Ok(out)
}

pub(super) fn swap_candidates(
    rules: &RuleSet,
    ctx: &ConstraintContext<'_>,
    source: StaffId,
    day: u32,
) -> Result<Vec<SwapCandidate>, EngineError> {
    let date = date_of(ctx, day)?;
    let (source, source_code) = participant(ctx, source, date)?;

    let mut out = Vec::new();
    for other in ctx.rostered() {
        if other.id == source.id {
            continue;
        }
        let code = ctx.schedule.code(date, other.id);
        if !code.is_work() || code == source_code {
            continue;
        }
        let violations = evaluate_swap(rules, ctx, source.id, other.id, day)?;
        out.push(SwapCandidate {
            staff_id: other.id,
            staff_name: other.name.clone(),
            current_code: code,
            violations,
        });
    }

    // tri stable : l'ordre du roster départage les égalités
    out.sort_by_key(|c| (c.error_count(), c.violations.len()));
    Ok(out)
}
