use crate::calendar::HolidayTable;
use crate::model::{Nurse, NurseId, ScheduleEntry, Shift, VacationDay, WorkCondition};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Import d'infirmières depuis CSV : header `id,name,work_condition`.
pub fn import_nurses_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Nurse>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        let condition = rec.get(2).context("missing work_condition")?.trim();
        if id.is_empty() || name.is_empty() {
            bail!("invalid nurse row (empty)");
        }
        let condition: WorkCondition = condition
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("invalid work_condition for nurse {id}"))?;
        out.push(Nurse::new(id, name, condition));
    }
    Ok(out)
}

/// Import de congés : header `nurse,date` (date `YYYY-MM-DD`).
pub fn import_vacations_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<VacationDay>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let nurse = rec.get(0).context("missing nurse")?.trim();
        let date = rec.get(1).context("missing date")?.trim();
        if nurse.is_empty() {
            bail!("invalid vacation row (empty nurse)");
        }
        out.push(VacationDay {
            nurse: NurseId::new(nurse),
            date: parse_date(date)?,
        });
    }
    Ok(out)
}

/// Import de jours fériés : header `date[,name]`.
pub fn import_holidays_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<HolidayTable> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut table = HolidayTable::new();
    for rec in rdr.records() {
        let rec = rec?;
        let date = rec.get(0).context("missing date")?.trim();
        let name = rec.get(1).map(str::trim).unwrap_or("");
        table.insert(parse_date(date)?, name);
    }
    Ok(table)
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Export JSON des cases du planning (jolie mise en forme).
pub fn export_schedule_json<P: AsRef<Path>>(
    path: P,
    entries: &[ScheduleEntry],
) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(entries)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV en grille : une ligne par date, une colonne par infirmière.
/// Header `date,day,<label>...` ; cellule vide si la case manque.
pub fn export_schedule_csv<P: AsRef<Path>>(
    path: P,
    entries: &[ScheduleEntry],
    roster: &[Nurse],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;

    let mut header = vec!["date".to_string(), "day".to_string()];
    header.extend(roster.iter().map(|n| n.name.clone()));
    w.write_record(&header)?;

    let by_cell: HashMap<(&NurseId, NaiveDate), Shift> = entries
        .iter()
        .map(|e| ((&e.nurse, e.date), e.shift))
        .collect();

    let mut dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
    dates.sort_unstable();
    dates.dedup();

    let mut buf = itoa::Buffer::new();
    for date in dates {
        let mut row = vec![date.to_string()];
        row.push(buf.format(chrono::Datelike::day(&date)).to_string());
        for nurse in roster {
            let cell = by_cell
                .get(&(&nurse.id, date))
                .map(|s| s.as_str())
                .unwrap_or("");
            row.push(cell.to_string());
        }
        w.write_record(&row)?;
    }
    w.flush()?;
    Ok(())
}
