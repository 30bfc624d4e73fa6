use super::EngineError;
use crate::calendar;
use crate::model::{DayAssignments, Holiday, Schedule, Settings, ShiftCode, StaffId, StaffMember};
use chrono::NaiveDate;

/// Instantané immuable partagé par les évaluateurs.
///
/// Simple agrégation de références : à reconstruire dès qu'une entrée change.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintContext<'a> {
    pub schedule: &'a Schedule,
    pub staff: &'a [StaffMember],
    pub holidays: &'a [Holiday],
    pub settings: &'a Settings,
    pub year: i32,
    pub month: u32,
    days_in_month: u32,
}

impl<'a> ConstraintContext<'a> {
    pub fn new(
        schedule: &'a Schedule,
        staff: &'a [StaffMember],
        holidays: &'a [Holiday],
        settings: &'a Settings,
        year: i32,
        month: u32,
    ) -> Result<Self, EngineError> {
        if calendar::month_start(year, month).is_none() {
            return Err(EngineError::InvalidMonth { year, month });
        }
        Ok(Self {
            schedule,
            staff,
            holidays,
            settings,
            year,
            month,
            days_in_month: calendar::days_in_month(year, month),
        })
    }

    pub fn days_in_month(&self) -> u32 {
        self.days_in_month
    }

    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        if day == 0 || day > self.days_in_month {
            return None;
        }
        calendar::date_of(self.year, self.month, day)
    }

    pub fn find_staff(&self, id: StaffId) -> Option<&'a StaffMember> {
        self.staff.iter().find(|s| s.id == id)
    }

    /// Personnel soumis aux règles, dans l'ordre du roster.
    pub fn rostered(&self) -> impl Iterator<Item = &'a StaffMember> {
        self.staff.iter().filter(|s| s.category.is_rostered())
    }
}

/// Lecture de la grille avec, éventuellement, une journée remplacée.
///
/// Seule la journée simulée est copiée ; la grille d'origine n'est jamais modifiée.
#[derive(Debug, Clone)]
pub struct ScheduleView<'a> {
    base: &'a Schedule,
    patch: Option<(NaiveDate, DayAssignments)>,
}

impl<'a> ScheduleView<'a> {
    pub fn new(base: &'a Schedule) -> Self {
        Self { base, patch: None }
    }

    /// Copie la journée `date` pour la modifier via [`ScheduleView::set`].
    pub fn with_day_copy(base: &'a Schedule, date: NaiveDate) -> Self {
        let day = base.day(date).cloned().unwrap_or_default();
        Self {
            base,
            patch: Some((date, day)),
        }
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayAssignments> {
        match &self.patch {
            Some((patched, day)) if *patched == date => Some(day),
            _ => self.base.day(date),
        }
    }

    pub fn code(&self, date: NaiveDate, staff: StaffId) -> ShiftCode {
        self.day(date)
            .and_then(|day| day.get(&staff))
            .copied()
            .unwrap_or_default()
    }

    /// Ne modifie que la journée copiée ; sans effet ailleurs.
    pub fn set(&mut self, date: NaiveDate, staff: StaffId, code: ShiftCode) -> bool {
        match &mut self.patch {
            Some((patched, day)) if *patched == date => {
                if code == ShiftCode::Unset {
                    day.remove(&staff);
                } else {
                    day.insert(staff, code);
                }
                true
            }
            _ => false,
        }
    }
}
