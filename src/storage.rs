use crate::model::{ManualEdit, Nurse, ScheduleEntry, VacationDay};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Planning nommé et persisté : cases générées, congés, retouches
/// manuelles, libellés, et un instantané optionnel du roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSchedule {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub entries: Vec<ScheduleEntry>,
    #[serde(default)]
    pub vacations: Vec<VacationDay>,
    #[serde(default)]
    pub manual_edits: Vec<ManualEdit>,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub nurses: Option<Vec<Nurse>>,
    pub created_at: DateTime<Utc>,
}

impl SavedSchedule {
    pub fn new<N: Into<String>>(
        name: N,
        year: i32,
        month: u32,
        entries: Vec<ScheduleEntry>,
        vacations: Vec<VacationDay>,
        roster: &[Nurse],
    ) -> Self {
        let labels = roster
            .iter()
            .map(|n| (n.id.as_str().to_string(), n.name.clone()))
            .collect();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            year,
            month,
            entries,
            vacations,
            manual_edits: Vec::new(),
            labels,
            nurses: Some(roster.to_vec()),
            created_at: Utc::now(),
        }
    }

    /// Cases avec les retouches manuelles appliquées (vue d'affichage).
    pub fn display_entries(&self) -> Vec<ScheduleEntry> {
        let mut entries = self.entries.clone();
        crate::model::apply_manual_edits(&mut entries, &self.manual_edits);
        entries
    }

    /// Remplace ou ajoute la retouche pour cette (infirmière, date).
    pub fn upsert_edit(&mut self, edit: ManualEdit) {
        match self
            .manual_edits
            .iter_mut()
            .find(|e| e.nurse == edit.nurse && e.date == edit.date)
        {
            Some(existing) => *existing = edit,
            None => self.manual_edits.push(edit),
        }
    }
}

/// Résumé d'un planning sur disque, sans charger les cases.
#[derive(Debug, Clone)]
pub struct StoredInfo {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub created_at: DateTime<Utc>,
    pub path: PathBuf,
}

/// Dépôt de plannings : un fichier JSON par id, écrit de manière atomique.
#[derive(Debug, Clone)]
pub struct ScheduleStore {
    base_dir: PathBuf,
}

impl ScheduleStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            base_dir: dir.as_ref().to_path_buf(),
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("creating schedule directory {}", self.base_dir.display()))
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.base_dir.join(format!("{id}.json"))
    }

    pub fn save(&self, schedule: &SavedSchedule) -> Result<PathBuf> {
        self.ensure_dir()?;
        let path = self.path_for(&schedule.id);
        let json = serde_json::to_vec_pretty(schedule)?;
        let mut tmp = NamedTempFile::new_in(&self.base_dir).context("creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).context("atomic rename")?;
        Ok(path)
    }

    pub fn load(&self, id: &str) -> Result<SavedSchedule> {
        let path = self.path_for(id);
        let data =
            fs::read(&path).with_context(|| format!("reading schedule {}", path.display()))?;
        let schedule: SavedSchedule = serde_json::from_slice(&data)
            .with_context(|| format!("parsing schedule {}", path.display()))?;
        Ok(schedule)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self.path_for(id);
        fs::remove_file(&path).with_context(|| format!("deleting schedule {}", path.display()))
    }

    pub fn list(&self) -> Result<Vec<StoredInfo>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }
        let mut infos = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let data = fs::read(&path)?;
            let schedule: SavedSchedule = match serde_json::from_slice(&data) {
                Ok(s) => s,
                Err(err) => {
                    eprintln!("Warning: could not parse schedule {}: {err}", path.display());
                    continue;
                }
            };
            infos.push(StoredInfo {
                id: schedule.id,
                name: schedule.name,
                year: schedule.year,
                month: schedule.month,
                created_at: schedule.created_at,
                path,
            });
        }
        infos.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(infos)
    }
}
