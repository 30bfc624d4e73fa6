use crate::model::ShiftCode;
use anyhow::{bail, Context, Result};
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Définition horaire d'un code de travail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftPattern {
    pub code: ShiftCode,
    pub name: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
    #[serde(default)]
    pub break_minutes: u32,
    #[serde(default = "default_min_headcount")]
    pub min_headcount: u32,
}

fn default_min_headcount() -> u32 {
    1
}

impl ShiftPattern {
    fn validate(&self) -> Result<()> {
        if !self.code.is_work() {
            bail!("pattern code {:?} is not a work code", self.code);
        }
        if self.name.trim().is_empty() {
            bail!("pattern {} name cannot be empty", self.code);
        }
        if self.end <= self.start {
            bail!("pattern {} end must be after start", self.code);
        }
        if i64::from(self.break_minutes) >= self.span_minutes() {
            bail!("pattern {} break is longer than the shift", self.code);
        }
        Ok(())
    }

    pub fn span_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Temps de travail effectif (amplitude moins pause).
    pub fn work_minutes(&self) -> i64 {
        self.span_minutes() - i64::from(self.break_minutes)
    }

    /// Minutes depuis minuit, début inclus, fin exclue.
    pub fn bounds_minutes(&self) -> (u32, u32) {
        (minutes_of(self.start), minutes_of(self.end))
    }
}

pub(crate) fn minutes_of(t: NaiveTime) -> u32 {
    t.num_seconds_from_midnight() / 60
}

/// Jeu de définitions, un par code de travail au plus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternSet(Vec<ShiftPattern>);

impl Default for PatternSet {
    fn default() -> Self {
        let hm = |h: u32, m: u32| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
        let defaults = [
            (ShiftCode::A, "早番", hm(7, 0), hm(16, 0)),
            (ShiftCode::B, "標準", hm(7, 30), hm(16, 30)),
            (ShiftCode::C, "中番", hm(8, 0), hm(17, 0)),
            (ShiftCode::D, "中遅番", hm(8, 30), hm(17, 30)),
            (ShiftCode::E, "遅番", hm(9, 0), hm(18, 0)),
            (ShiftCode::J, "最遅番", hm(10, 0), hm(19, 0)),
        ];
        Self(
            defaults
                .into_iter()
                .map(|(code, name, start, end)| ShiftPattern {
                    code,
                    name: name.to_string(),
                    start,
                    end,
                    break_minutes: 60,
                    min_headcount: 1,
                })
                .collect(),
        )
    }
}

impl PatternSet {
    pub fn new(patterns: Vec<ShiftPattern>) -> Result<Self> {
        let set = Self(patterns);
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<()> {
        for (i, pattern) in self.0.iter().enumerate() {
            pattern.validate()?;
            if self.0.iter().skip(i + 1).any(|p| p.code == pattern.code) {
                bail!("duplicate pattern for code {}", pattern.code);
            }
        }
        Ok(())
    }

    pub fn get(&self, code: ShiftCode) -> Option<&ShiftPattern> {
        self.0.iter().find(|p| p.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShiftPattern> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn load_patterns_from_file<P: AsRef<Path>>(path: P) -> Result<PatternSet> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading patterns {}", path.display()))?;
    let set: PatternSet = serde_json::from_slice(&data)
        .with_context(|| format!("parsing patterns {}", path.display()))?;
    set.validate()?;
    Ok(set)
}

pub fn export_patterns_json<P: AsRef<Path>>(path: P, set: &PatternSet) -> Result<()> {
    let json = serde_json::to_string_pretty(set)?;
    fs::write(path, json)?;
    Ok(())
}
