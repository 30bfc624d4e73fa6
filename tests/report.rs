#![forbid(unsafe_code)]
use chrono::NaiveDate;
use roulement::{
    calendar, report, scan_alerts, AlertOptions, AlertRenderer, ConstraintContext, Engine,
    Schedule, Settings, ShiftCategory, ShiftCode, StaffId, StaffMember, TextReport,
};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

#[test]
fn text_report_lists_errors_then_warnings() {
    let staff = vec![
        StaffMember::new(1, "Alice", ShiftCategory::Regular),
        StaffMember::new(2, "Bruno", ShiftCategory::Regular),
    ];
    let mut schedule = Schedule::new();
    for day in 2..=7 {
        schedule.set(d(day), StaffId::new(1), ShiftCode::C);
    }
    for day in 10..=12 {
        schedule.set(d(day), StaffId::new(2), ShiftCode::J);
    }
    let opts = AlertOptions {
        min_headcount: 1,
        ..AlertOptions::default()
    };
    let days = calendar::month_days(2025, 6);
    let alerts = scan_alerts(&staff, &schedule, &days, 2025, 6, &[], &opts);

    let out = TextReport.render(&alerts);
    insta::assert_snapshot!(out.trim_end(), @r###"
    2 alerte(s) : 1 erreur(s), 1 avertissement(s)
    [ERR ] Jours travaillés consécutifs : Alice : 6 jours travaillés d'affilée (du 2 au 7)
    [WARN] Postes J consécutifs : Bruno : poste J 3 jours d'affilée (du 10 au 12)
    "###);
}

#[test]
fn empty_report_has_only_the_header() {
    let out = TextReport.render(&[]);
    assert_eq!(out, "0 alerte(s) : 0 erreur(s), 0 avertissement(s)\n");
}

#[test]
fn candidate_listing() {
    let staff = vec![
        StaffMember::new(1, "Alice", ShiftCategory::Regular),
        StaffMember::new(2, "Bruno", ShiftCategory::Regular),
    ];
    let mut schedule = Schedule::new();
    schedule.set(d(3), StaffId::new(1), ShiftCode::J);
    schedule.set(d(4), StaffId::new(2), ShiftCode::B);
    let settings = Settings::default();
    let ctx = ConstraintContext::new(&schedule, &staff, &[], &settings, 2025, 6).unwrap();
    let candidates = Engine::new().evaluate_candidates(&ctx, 4, ShiftCode::A);

    let out = report::render_candidates(d(4), ShiftCode::A, &candidates);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "2025-06-04 poste A : 2 placable(s), 0 bloqué(s)",
            " ! Alice (actuel : -)",
            "     - [indicatif] Alice : J la veille puis A",
            "ok Bruno (actuel : B)",
        ]
    );
}
