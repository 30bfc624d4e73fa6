#![forbid(unsafe_code)]
use chrono::NaiveDate;
use roulement::{
    ConstraintContext, Engine, EngineError, Schedule, Settings, Severity, ShiftCategory, ShiftCode,
    StaffId, StaffMember, ViolationKind,
};

const YEAR: i32 = 2025;
const MONTH: u32 = 6;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(YEAR, MONTH, day).unwrap()
}

fn id(n: u32) -> StaffId {
    StaffId::new(n)
}

fn regular(n: u32, name: &str) -> StaffMember {
    StaffMember::new(n, name, ShiftCategory::Regular)
}

#[test]
fn swap_rescores_both_staff_and_is_symmetric() {
    let staff = vec![regular(1, "Alice"), regular(2, "Bruno")];
    let mut schedule = Schedule::new();
    schedule.set(d(4), id(1), ShiftCode::A);
    schedule.set(d(5), id(1), ShiftCode::A);
    schedule.set(d(4), id(2), ShiftCode::J);
    schedule.set(d(3), id(2), ShiftCode::A);
    let settings = Settings::default();
    let ctx = ConstraintContext::new(&schedule, &staff, &[], &settings, YEAR, MONTH).unwrap();
    let engine = Engine::new();

    let forward = engine.evaluate_swap(&ctx, id(1), id(2), 4).unwrap();
    let summary: Vec<(u32, ViolationKind, Severity)> = forward
        .iter()
        .map(|v| (v.staff_id.get(), v.kind, v.severity))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, ViolationKind::LateThenEarly, Severity::Warning),
            (2, ViolationKind::ConsecutiveEarly, Severity::Warning),
        ]
    );

    let mut backward = engine.evaluate_swap(&ctx, id(2), id(1), 4).unwrap();
    let mut forward = forward;
    forward.sort_by_key(|v| (v.staff_id, v.kind.as_str()));
    backward.sort_by_key(|v| (v.staff_id, v.kind.as_str()));
    assert_eq!(forward, backward);
}

#[test]
fn incompatible_partner_is_an_error_and_input_is_untouched() {
    let mut alice = regular(1, "Alice");
    alice.incompatible_with = vec![id(3)];
    let staff = vec![alice, regular(2, "Bruno"), regular(3, "Chloé")];
    let mut schedule = Schedule::new();
    schedule.set(d(4), id(1), ShiftCode::A);
    schedule.set(d(4), id(2), ShiftCode::J);
    schedule.set(d(4), id(3), ShiftCode::J);
    let before = schedule.clone();

    let settings = Settings::default();
    let ctx = ConstraintContext::new(&schedule, &staff, &[], &settings, YEAR, MONTH).unwrap();
    let violations = Engine::new().evaluate_swap(&ctx, id(1), id(2), 4).unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].staff_id, id(1));
    assert_eq!(violations[0].kind, ViolationKind::Incompatible);
    assert_eq!(violations[0].severity, Severity::Error);
    assert!(violations[0].description.contains("Chloé"));
    assert_eq!(schedule, before);
}

#[test]
fn leave_days_cannot_be_swapped() {
    let staff = vec![regular(1, "Alice"), regular(2, "Bruno"), regular(3, "Chloé")];
    let mut schedule = Schedule::new();
    schedule.set(d(4), id(1), ShiftCode::Off);
    schedule.set(d(4), id(2), ShiftCode::B);
    let settings = Settings::default();
    let ctx = ConstraintContext::new(&schedule, &staff, &[], &settings, YEAR, MONTH).unwrap();
    let engine = Engine::new();

    let err = engine.evaluate_swap(&ctx, id(1), id(2), 4).unwrap_err();
    assert!(matches!(
        err,
        EngineError::SwapNotApplicable {
            code: ShiftCode::Off,
            ..
        }
    ));
    // cible sans affectation
    let err = engine.evaluate_swap(&ctx, id(2), id(3), 4).unwrap_err();
    assert!(matches!(err, EngineError::SwapNotApplicable { .. }));

    let err = engine.swap_candidates(&ctx, id(1), 4).unwrap_err();
    assert!(matches!(err, EngineError::SwapNotApplicable { .. }));

    let err = engine.evaluate_swap(&ctx, id(9), id(2), 4).unwrap_err();
    assert_eq!(err, EngineError::UnknownStaff(id(9)));
}

#[test]
fn swap_candidates_are_ranked_by_errors_then_count() {
    let mut erin = regular(5, "Erin");
    erin.incompatible_with = vec![id(6)];
    let staff = vec![
        regular(1, "Alice"),
        regular(2, "Bruno"),
        regular(3, "Chloé"),
        regular(4, "Denis"),
        erin,
        regular(6, "Fanny"),
        StaffMember::new(7, "Gaël", ShiftCategory::PartTime),
        regular(8, "Hugo"),
        StaffMember::new(9, "Cuisine", ShiftCategory::Cooking),
    ];
    let mut schedule = Schedule::new();
    let day = [
        (1, ShiftCode::A),
        (2, ShiftCode::J),
        (3, ShiftCode::A),
        (4, ShiftCode::Off),
        (5, ShiftCode::C),
        (6, ShiftCode::A),
        (7, ShiftCode::E),
        (8, ShiftCode::B),
        (9, ShiftCode::D),
    ];
    for (n, code) in day {
        schedule.set(d(4), id(n), code);
    }
    schedule.set(d(3), id(7), ShiftCode::A);

    let settings = Settings::default();
    let ctx = ConstraintContext::new(&schedule, &staff, &[], &settings, YEAR, MONTH).unwrap();
    let candidates = Engine::new().swap_candidates(&ctx, id(1), 4).unwrap();

    let ranked: Vec<(u32, ShiftCode, usize, usize)> = candidates
        .iter()
        .map(|c| {
            (
                c.staff_id.get(),
                c.current_code,
                c.error_count(),
                c.violations.len(),
            )
        })
        .collect();
    assert_eq!(
        ranked,
        vec![
            (2, ShiftCode::J, 0, 0),
            (8, ShiftCode::B, 0, 0),
            (7, ShiftCode::E, 0, 1),
            (5, ShiftCode::C, 1, 1),
        ]
    );
}

#[test]
fn swap_reaching_the_early_cap_is_reported() {
    let mut alice = regular(1, "Alice");
    alice.early_shift_limit = Some(2);
    let staff = vec![alice, regular(2, "Bruno")];
    let mut schedule = Schedule::new();
    schedule.set(d(10), id(1), ShiftCode::A);
    schedule.set(d(4), id(1), ShiftCode::C);
    schedule.set(d(4), id(2), ShiftCode::B);
    let settings = Settings::default();
    let ctx = ConstraintContext::new(&schedule, &staff, &[], &settings, YEAR, MONTH).unwrap();
    let engine = Engine::new();

    // B reçu le 4 + A du 10 : 2/2
    let violations = engine.evaluate_swap(&ctx, id(1), id(2), 4).unwrap();
    let summary: Vec<(u32, ViolationKind, Severity)> = violations
        .iter()
        .map(|v| (v.staff_id.get(), v.kind, v.severity))
        .collect();
    assert_eq!(summary, vec![(1, ViolationKind::EarlyLimit, Severity::Warning)]);
    assert!(violations[0].description.contains("(2/2)"));

    // même échange, plafond plus haut
    let mut staff = staff;
    staff[0].early_shift_limit = Some(3);
    let ctx = ConstraintContext::new(&schedule, &staff, &[], &settings, YEAR, MONTH).unwrap();
    assert!(engine.evaluate_swap(&ctx, id(1), id(2), 4).unwrap().is_empty());
}
