#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveTime};
use roulement::{
    calendar, fairness, hourly_coverage, model::TimeRanges, monthly_counts, PatternSet, Schedule,
    ShiftCategory, ShiftCode, StaffId, StaffMember, TimeRange,
};

const YEAR: i32 = 2025;
const MONTH: u32 = 6;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(YEAR, MONTH, day).unwrap()
}

fn staff_with(category: ShiftCategory, n: u32) -> StaffMember {
    StaffMember::new(n, format!("S{n}"), category)
}

fn assign_a(schedule: &mut Schedule, n: u32, count: u32) {
    for day in 2..2 + count {
        schedule.set(d(day), StaffId::new(n), ShiftCode::A);
    }
}

#[test]
fn monthly_counts_include_leave_codes() {
    let staff = vec![staff_with(ShiftCategory::Regular, 1)];
    let mut schedule = Schedule::new();
    schedule.set(d(2), StaffId::new(1), ShiftCode::A);
    schedule.set(d(3), StaffId::new(1), ShiftCode::B);
    schedule.set(d(4), StaffId::new(1), ShiftCode::PaidLeave);
    schedule.set(d(5), StaffId::new(1), ShiftCode::J);

    let days = calendar::month_days(YEAR, MONTH);
    let counts = monthly_counts(&staff, &schedule, YEAR, MONTH, &days);
    let c = &counts[&StaffId::new(1)];
    assert_eq!(c.work_total(), 3);
    assert_eq!(c.early_class(), 2);
    assert_eq!(c.get(ShiftCode::PaidLeave), 1);
    assert_eq!(c.get(ShiftCode::Off), 0);
}

#[test]
fn balanced_distribution() {
    let staff = vec![
        staff_with(ShiftCategory::Regular, 1),
        staff_with(ShiftCategory::Regular, 2),
        staff_with(ShiftCategory::Regular, 3),
        staff_with(ShiftCategory::PartTime, 4),
    ];
    let mut schedule = Schedule::new();
    assign_a(&mut schedule, 2, 3);
    assign_a(&mut schedule, 3, 3);
    assign_a(&mut schedule, 4, 10);

    let days = calendar::month_days(YEAR, MONTH);
    let score = fairness(&staff, &schedule, YEAR, MONTH, &days, ShiftCode::A, 1.5);
    assert!((score.std_dev - 2f64.sqrt()).abs() < 1e-9);
    assert!(score.balanced);
    assert_eq!(score.outlier, Some(StaffId::new(2)));
    let order: Vec<u32> = score.counts.iter().map(|c| c.staff_id.get()).collect();
    assert_eq!(order, vec![2, 3, 1]);
}

#[test]
fn skewed_distribution() {
    let staff: Vec<StaffMember> = (1..=3)
        .map(|n| staff_with(ShiftCategory::Regular, n))
        .collect();
    let mut schedule = Schedule::new();
    assign_a(&mut schedule, 3, 6);

    let days = calendar::month_days(YEAR, MONTH);
    let score = fairness(&staff, &schedule, YEAR, MONTH, &days, ShiftCode::A, 1.5);
    assert!(!score.balanced);
    assert!((score.std_dev - 8f64.sqrt()).abs() < 1e-9);
    assert_eq!(score.outlier, Some(StaffId::new(3)));
}

#[test]
fn fairness_without_regular_staff() {
    let staff = vec![staff_with(ShiftCategory::Backup, 1)];
    let days = calendar::month_days(YEAR, MONTH);
    let score = fairness(&staff, &Schedule::new(), YEAR, MONTH, &days, ShiftCode::J, 1.5);
    assert!(score.balanced);
    assert_eq!(score.std_dev, 0.0);
    assert!(score.outlier.is_none());
}

#[test]
fn hourly_coverage_counts_patterns_and_part_time_ranges() {
    let mut s1 = staff_with(ShiftCategory::Regular, 1);
    s1.has_qualification = true;
    let mut s2 = staff_with(ShiftCategory::Backup, 2);
    s2.has_qualification = true;
    let s3 = staff_with(ShiftCategory::PartTime, 3);
    let s4 = staff_with(ShiftCategory::Cooking, 4);
    let staff = vec![s1, s2, s3, s4];

    let mut schedule = Schedule::new();
    schedule.set(d(2), StaffId::new(1), ShiftCode::A);
    schedule.set(d(2), StaffId::new(2), ShiftCode::J);
    schedule.set(d(2), StaffId::new(4), ShiftCode::C);

    let hm = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
    let mut ranges = TimeRanges::new();
    ranges
        .entry(d(2))
        .or_default()
        .insert(StaffId::new(3), TimeRange::new(hm(9), hm(12)).unwrap());

    let hours = hourly_coverage(&staff, &schedule, &ranges, &PatternSet::default(), d(2));
    assert_eq!(hours.len(), 13);
    let at = |hour: u32| {
        let h = hours.iter().find(|h| h.hour == hour).unwrap();
        (h.total, h.qualified)
    };
    assert_eq!(at(7), (1, 1));
    assert_eq!(at(9), (2, 1));
    assert_eq!(at(10), (3, 2));
    assert_eq!(at(12), (2, 2));
    assert_eq!(at(16), (1, 1));
    assert_eq!(at(19), (0, 0));
}
