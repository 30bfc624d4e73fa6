use crate::model::Workbook;
use anyhow::{bail, Context};
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge un classeur depuis un support.
    fn load(&self) -> anyhow::Result<Workbook>;
    /// Sauvegarde de manière atomique.
    fn save(&self, workbook: &Workbook) -> anyhow::Result<()>;
}

/// Classeur persisté dans un seul fichier JSON.
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Classeur vide tant que le fichier n'existe pas encore.
    pub fn load_or_default(&self) -> anyhow::Result<Workbook> {
        if self.path.exists() {
            self.load()
        } else {
            Ok(Workbook::default())
        }
    }

    fn target_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

/// Cohérence minimale d'un classeur lu depuis le disque.
fn check(workbook: &Workbook) -> anyhow::Result<()> {
    let mut seen = BTreeSet::new();
    for member in &workbook.staff {
        if !seen.insert(member.id) {
            bail!("duplicate staff id: {}", member.id);
        }
    }
    workbook.patterns.validate()?;
    for (date, ranges) in &workbook.time_ranges {
        for (staff, range) in ranges {
            if range.end <= range.start {
                bail!("time range of staff {staff} on {date} ends before it starts");
            }
        }
    }
    Ok(())
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Workbook> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let workbook: Workbook = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        check(&workbook).with_context(|| format!("invalid workbook {}", self.path.display()))?;
        Ok(workbook)
    }

    fn save(&self, workbook: &Workbook) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(workbook)?;
        let mut tmp =
            NamedTempFile::new_in(self.target_dir()).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }
}
