use crate::calendar::DayKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Poste assigné à une infirmière pour une journée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Shift {
    Day,
    MidDay,
    Evening,
    Night,
    Off,
}

impl Shift {
    /// Postes travaillés, dans l'ordre de remplissage quotidien.
    pub const WORKING: [Shift; 4] = [Shift::Day, Shift::MidDay, Shift::Evening, Shift::Night];

    pub fn as_str(self) -> &'static str {
        match self {
            Shift::Day => "DAY",
            Shift::MidDay => "MID-DAY",
            Shift::Evening => "EVENING",
            Shift::Night => "NIGHT",
            Shift::Off => "OFF",
        }
    }

    pub fn is_working(self) -> bool {
        self != Shift::Off
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAY" => Ok(Shift::Day),
            "MID-DAY" | "MIDDAY" => Ok(Shift::MidDay),
            "EVENING" => Ok(Shift::Evening),
            "NIGHT" => Ok(Shift::Night),
            "OFF" => Ok(Shift::Off),
            other => Err(format!("unknown shift: {other}")),
        }
    }
}

/// Condition de travail d'une infirmière, fixe pour tout le mois.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkCondition {
    /// Journée uniquement : DAY/MID-DAY en semaine, DAY/EVENING le week-end.
    DaytimeOnly,
    /// Alternance hebdomadaire DAY/EVENING, jamais OFF en semaine, repos le week-end.
    DayEveningAlternate,
    /// Nuit uniquement.
    NightOnly,
    /// Tous les postes.
    Flexible,
}

impl WorkCondition {
    /// Le poste est-il autorisé pour ce type de journée ?
    pub fn allows(self, shift: Shift, kind: DayKind) -> bool {
        match (self, kind) {
            (WorkCondition::DaytimeOnly, DayKind::Weekday) => {
                matches!(shift, Shift::Day | Shift::MidDay | Shift::Off)
            }
            (WorkCondition::DaytimeOnly, DayKind::WeekendHoliday) => {
                matches!(shift, Shift::Day | Shift::Evening | Shift::Off)
            }
            (WorkCondition::DayEveningAlternate, DayKind::Weekday) => {
                matches!(shift, Shift::Day | Shift::Evening)
            }
            (WorkCondition::DayEveningAlternate, DayKind::WeekendHoliday) => shift == Shift::Off,
            (WorkCondition::NightOnly, _) => matches!(shift, Shift::Night | Shift::Off),
            (WorkCondition::Flexible, DayKind::Weekday) => true,
            (WorkCondition::Flexible, DayKind::WeekendHoliday) => {
                matches!(shift, Shift::Day | Shift::Evening | Shift::Night | Shift::Off)
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkCondition::DaytimeOnly => "DAYTIME_ONLY",
            WorkCondition::DayEveningAlternate => "DAY_EVENING_ALTERNATE",
            WorkCondition::NightOnly => "NIGHT_ONLY",
            WorkCondition::Flexible => "FLEXIBLE",
        }
    }
}

impl FromStr for WorkCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAYTIME_ONLY" => Ok(WorkCondition::DaytimeOnly),
            "DAY_EVENING_ALTERNATE" => Ok(WorkCondition::DayEveningAlternate),
            "NIGHT_ONLY" => Ok(WorkCondition::NightOnly),
            "FLEXIBLE" => Ok(WorkCondition::Flexible),
            other => Err(format!("unknown work condition: {other}")),
        }
    }
}

/// Identifiant fort pour une infirmière (jeton opaque, stable sur le mois).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NurseId(String);

impl NurseId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NurseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Infirmière du roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nurse {
    pub id: NurseId,
    pub name: String,
    pub work_condition: WorkCondition,
}

impl Nurse {
    pub fn new<I: AsRef<str>, N: Into<String>>(
        id: I,
        name: N,
        work_condition: WorkCondition,
    ) -> Self {
        Self {
            id: NurseId::new(id),
            name: name.into(),
            work_condition,
        }
    }
}

/// Roster par défaut : 4 journée, 2 alternance, 2 nuit.
pub fn default_roster() -> Vec<Nurse> {
    vec![
        Nurse::new("A", "Infirmière A", WorkCondition::DaytimeOnly),
        Nurse::new("B", "Infirmière B", WorkCondition::DaytimeOnly),
        Nurse::new("C", "Infirmière C", WorkCondition::DaytimeOnly),
        Nurse::new("D", "Infirmière D", WorkCondition::DaytimeOnly),
        Nurse::new("E", "Infirmière E", WorkCondition::DayEveningAlternate),
        Nurse::new("F", "Infirmière F", WorkCondition::DayEveningAlternate),
        Nurse::new("G", "Infirmière G", WorkCondition::NightOnly),
        Nurse::new("H", "Infirmière H", WorkCondition::NightOnly),
    ]
}

/// Une case du planning : (date, infirmière, poste).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub date: NaiveDate,
    pub nurse: NurseId,
    pub shift: Shift,
}

/// Jour de congé : l'infirmière est OFF ce jour-là, quoi qu'il arrive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationDay {
    pub nurse: NurseId,
    pub date: NaiveDate,
}

/// Retouche manuelle appliquée à l'affichage/export, jamais à la génération.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualEdit {
    pub nurse: NurseId,
    pub date: NaiveDate,
    pub shift: Shift,
}

/// Superpose les retouches manuelles sur les cases générées.
/// Une retouche sans case correspondante est ignorée.
pub fn apply_manual_edits(entries: &mut [ScheduleEntry], edits: &[ManualEdit]) {
    for edit in edits {
        if let Some(entry) = entries
            .iter_mut()
            .find(|e| e.nurse == edit.nurse && e.date == edit.date)
        {
            entry.shift = edit.shift;
        }
    }
}
