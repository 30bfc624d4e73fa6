use crate::patterns::PatternSet;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Code de poste d'une case du planning.
///
/// Les codes de travail sont ordonnés par heure de début (`A` le plus tôt,
/// `J` le plus tard) ; viennent ensuite les codes de congé puis la case vide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum ShiftCode {
    A,
    B,
    C,
    D,
    E,
    J,
    /// Repos ordinaire.
    #[serde(rename = "休", alias = "off")]
    Off,
    /// Repos compensateur (jour férié reporté).
    #[serde(rename = "振", alias = "transfer")]
    TransferHoliday,
    /// Congé payé.
    #[serde(rename = "有", alias = "paid")]
    PaidLeave,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl ShiftCode {
    pub const WORK: [ShiftCode; 6] = [
        ShiftCode::A,
        ShiftCode::B,
        ShiftCode::C,
        ShiftCode::D,
        ShiftCode::E,
        ShiftCode::J,
    ];

    pub fn is_work(self) -> bool {
        matches!(
            self,
            ShiftCode::A | ShiftCode::B | ShiftCode::C | ShiftCode::D | ShiftCode::E | ShiftCode::J
        )
    }

    pub fn is_leave(self) -> bool {
        matches!(
            self,
            ShiftCode::Off | ShiftCode::TransferHoliday | ShiftCode::PaidLeave
        )
    }

    /// Postes "du matin" comptés dans le plafond mensuel `early_shift_limit`.
    pub fn is_early_class(self) -> bool {
        matches!(self, ShiftCode::A | ShiftCode::B)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftCode::A => "A",
            ShiftCode::B => "B",
            ShiftCode::C => "C",
            ShiftCode::D => "D",
            ShiftCode::E => "E",
            ShiftCode::J => "J",
            ShiftCode::Off => "休",
            ShiftCode::TransferHoliday => "振",
            ShiftCode::PaidLeave => "有",
            ShiftCode::Unset => "",
        }
    }
}

impl fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShiftCode::Unset => f.write_str("-"),
            other => f.write_str(other.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shift code: {0:?}")]
pub struct ParseShiftCodeError(pub String);

impl FromStr for ShiftCode {
    type Err = ParseShiftCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = match s.trim() {
            "A" | "a" => ShiftCode::A,
            "B" | "b" => ShiftCode::B,
            "C" | "c" => ShiftCode::C,
            "D" | "d" => ShiftCode::D,
            "E" | "e" => ShiftCode::E,
            "J" | "j" => ShiftCode::J,
            "休" | "off" => ShiftCode::Off,
            "振" | "transfer" => ShiftCode::TransferHoliday,
            "有" | "paid" => ShiftCode::PaidLeave,
            "" | "-" | "unset" => ShiftCode::Unset,
            other => return Err(ParseShiftCodeError(other.to_string())),
        };
        Ok(code)
    }
}

/// Identifiant fort pour un membre du personnel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaffId(u32);

impl StaffId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catégorie de planning. Seules `Regular`, `Backup` et `PartTime`
/// participent aux règles ; les autres sont ignorées partout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftCategory {
    #[default]
    Regular,
    Backup,
    PartTime,
    Cooking,
    NoShift,
}

impl ShiftCategory {
    pub fn is_rostered(self) -> bool {
        matches!(
            self,
            ShiftCategory::Regular | ShiftCategory::Backup | ShiftCategory::PartTime
        )
    }
}

impl FromStr for ShiftCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "regular" => Ok(ShiftCategory::Regular),
            "backup" => Ok(ShiftCategory::Backup),
            "part_time" | "parttime" => Ok(ShiftCategory::PartTime),
            "cooking" => Ok(ShiftCategory::Cooking),
            "no_shift" | "noshift" => Ok(ShiftCategory::NoShift),
            other => Err(format!("unknown shift category: {other}")),
        }
    }
}

/// Membre du personnel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub name: String,
    #[serde(default)]
    pub category: ShiftCategory,
    #[serde(default)]
    pub has_qualification: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incompatible_with: Vec<StaffId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_shift_limit: Option<u32>,
    #[serde(default)]
    pub saturday_only: bool,
}

impl StaffMember {
    pub fn new<N: Into<String>>(id: u32, name: N, category: ShiftCategory) -> Self {
        Self {
            id: StaffId::new(id),
            name: name.into(),
            category,
            has_qualification: false,
            floor: None,
            incompatible_with: Vec::new(),
            early_shift_limit: None,
            saturday_only: false,
        }
    }

    /// Zone effective : `free`, `none` ou vide ne peuvent jamais entrer en conflit.
    pub fn zone(&self) -> Option<&str> {
        match self.floor.as_deref().map(str::trim) {
            None | Some("") | Some("free") | Some("none") => None,
            Some(zone) => Some(zone),
        }
    }

    /// Incompatibilité vue des deux côtés, même si une seule fiche la déclare.
    pub fn is_incompatible_with(&self, other: &StaffMember) -> bool {
        self.incompatible_with.contains(&other.id) || other.incompatible_with.contains(&self.id)
    }
}

/// Codes d'une journée, par membre du personnel.
pub type DayAssignments = BTreeMap<StaffId, ShiftCode>;

/// Grille mensuelle : date ISO → membre → code. Une case absente vaut `Unset`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule(BTreeMap<NaiveDate, DayAssignments>);

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn code(&self, date: NaiveDate, staff: StaffId) -> ShiftCode {
        self.0
            .get(&date)
            .and_then(|day| day.get(&staff))
            .copied()
            .unwrap_or_default()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayAssignments> {
        self.0.get(&date)
    }

    /// Remplace la case entière ; `Unset` efface la case.
    pub fn set(&mut self, date: NaiveDate, staff: StaffId, code: ShiftCode) {
        if code == ShiftCode::Unset {
            if let Some(day) = self.0.get_mut(&date) {
                day.remove(&staff);
                if day.is_empty() {
                    self.0.remove(&date);
                }
            }
            return;
        }
        self.0.entry(date).or_default().insert(staff, code);
    }
}

/// Jour non travaillé du calendrier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    #[serde(default)]
    pub name: String,
}

impl Holiday {
    pub fn new<N: Into<String>>(date: NaiveDate, name: N) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }
}

/// Réglages mensuels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub saturday_min_headcount: u32,
    pub saturday_shift_code: ShiftCode,
    /// Codes réservés au personnel qualifié (règle bloquante, vide par défaut).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualified_codes: Vec<ShiftCode>,
    /// Bloque le personnel `saturday_only` hors samedi.
    #[serde(default)]
    pub enforce_saturday_only: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            saturday_min_headcount: 3,
            saturday_shift_code: ShiftCode::B,
            qualified_codes: Vec::new(),
            enforce_saturday_only: false,
        }
    }
}

/// Plage horaire libre d'un temps partiel pour une date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, String> {
        if end <= start {
            return Err("time range end must be after start".to_string());
        }
        Ok(Self { start, end })
    }
}

pub type TimeRanges = BTreeMap<NaiveDate, BTreeMap<StaffId, TimeRange>>;

/// Classeur complet, tel que persisté
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Workbook {
    pub staff: Vec<StaffMember>,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    pub holidays: Vec<Holiday>,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub patterns: PatternSet,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub time_ranges: TimeRanges,
}

impl Workbook {
    pub fn find_staff(&self, id: StaffId) -> Option<&StaffMember> {
        self.staff.iter().find(|s| s.id == id)
    }
    pub fn find_staff_by_name<'a>(&'a self, name: &str) -> Option<&'a StaffMember> {
        self.staff.iter().find(|s| s.name == name)
    }

    /// Résout un membre par identifiant numérique ou par nom.
    pub fn resolve_staff(&self, key: &str) -> Option<&StaffMember> {
        match key.trim().parse::<u32>() {
            Ok(id) => self.find_staff(StaffId::new(id)),
            Err(_) => self.find_staff_by_name(key.trim()),
        }
    }

    /// Enregistre la plage horaire d'un temps partiel pour `date`.
    pub fn set_time_range(&mut self, date: NaiveDate, staff: StaffId, range: TimeRange) {
        self.time_ranges.entry(date).or_default().insert(staff, range);
    }

    /// Efface la plage ; `false` si rien n'était enregistré.
    pub fn clear_time_range(&mut self, date: NaiveDate, staff: StaffId) -> bool {
        let Some(day) = self.time_ranges.get_mut(&date) else {
            return false;
        };
        let removed = day.remove(&staff).is_some();
        if day.is_empty() {
            self.time_ranges.remove(&date);
        }
        removed
    }

    pub fn add_holiday(&mut self, holiday: Holiday) {
        if self.holidays.iter().any(|h| h.date == holiday.date) {
            return;
        }
        self.holidays.push(holiday);
        self.holidays.sort_by_key(|h| h.date);
    }
}
