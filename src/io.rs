use crate::alerts::{Alert, AlertKind};
use crate::engine::Severity;
use crate::model::{ShiftCategory, StaffId, StaffMember, Workbook};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import du personnel depuis CSV:
/// header `id,name,category[,qualified][,floor][,incompatible][,early_limit][,saturday_only]`
///
/// `incompatible` est une liste d'identifiants séparés par `;`.
pub fn import_staff_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<StaffMember>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id: u32 = rec
            .get(0)
            .context("missing id")?
            .trim()
            .parse()
            .context("id must be a positive integer")?;
        let name = rec.get(1).context("missing name")?.trim();
        if name.is_empty() {
            bail!("invalid staff row {id} (empty name)");
        }
        let category: ShiftCategory = rec
            .get(2)
            .context("missing category")?
            .parse()
            .map_err(anyhow::Error::msg)?;

        let mut member = StaffMember::new(id, name, category);
        if let Some(flag) = non_empty(rec.get(3)) {
            member.has_qualification = parse_bool(flag)
                .with_context(|| format!("invalid qualified value for staff {id}"))?;
        }
        member.floor = non_empty(rec.get(4)).map(str::to_string);
        if let Some(list) = non_empty(rec.get(5)) {
            member.incompatible_with = parse_ids(list)
                .with_context(|| format!("invalid incompatible list for staff {id}"))?;
        }
        if let Some(limit) = non_empty(rec.get(6)) {
            member.early_shift_limit = Some(
                limit
                    .parse()
                    .with_context(|| format!("invalid early_limit for staff {id}"))?,
            );
        }
        if let Some(flag) = non_empty(rec.get(7)) {
            member.saturday_only = parse_bool(flag)
                .with_context(|| format!("invalid saturday_only value for staff {id}"))?;
        }
        out.push(member);
    }
    Ok(out)
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

fn parse_ids(raw: &str) -> anyhow::Result<Vec<StaffId>> {
    raw.split(';')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            chunk
                .parse::<u32>()
                .map(StaffId::new)
                .with_context(|| format!("invalid staff id: {chunk}"))
        })
        .collect()
}

/// Export JSON du classeur (jolie mise en forme)
pub fn export_workbook_json<P: AsRef<Path>>(path: P, workbook: &Workbook) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(workbook)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export JSON de n'importe quel résultat du moteur.
pub fn export_json<P: AsRef<Path>, T: serde::Serialize>(path: P, value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des alertes: header `id,type,severity,staff_id,first_day,last_day,description`
pub fn export_alerts_csv<P: AsRef<Path>>(path: P, alerts: &[Alert]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "id",
        "type",
        "severity",
        "staff_id",
        "first_day",
        "last_day",
        "description",
    ])?;
    for alert in alerts {
        let (kind, staff, first, last) = match alert.kind {
            AlertKind::ConsecutiveWork {
                staff_id,
                first_day,
                last_day,
                ..
            } => ("consecutive", Some(staff_id), first_day, last_day),
            AlertKind::Understaffed { day, .. } => ("understaffed", None, day, day),
            AlertKind::EarlyStreak {
                staff_id,
                first_day,
                last_day,
                ..
            } => ("early_streak", Some(staff_id), first_day, last_day),
            AlertKind::LateStreak {
                staff_id,
                first_day,
                last_day,
                ..
            } => ("late_streak", Some(staff_id), first_day, last_day),
        };
        let severity = match alert.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let staff = staff.map(|id| id.to_string()).unwrap_or_default();
        let first = first.to_string();
        let last = last.to_string();
        w.write_record([
            alert.id.as_str(),
            kind,
            severity,
            staff.as_str(),
            first.as_str(),
            last.as_str(),
            alert.description.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
