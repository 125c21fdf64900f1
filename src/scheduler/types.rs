use crate::calendar::DayKind;
use crate::model::{NurseId, ScheduleEntry, Shift};
use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Options de génération.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Graine du bruit aléatoire du scoring ; `None` = entropie système.
    pub seed: Option<u64>,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),
    #[error("invalid year: {0}")]
    InvalidYear(i32),
    #[error("duplicate nurse id: {0}")]
    DuplicateNurse(String),
    #[error("unknown nurse: {0}")]
    UnknownNurse(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Diagnostic non fatal émis pendant la génération.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Effectif requis non atteint pour un poste ce jour-là.
    ShiftShortfall {
        date: NaiveDate,
        shift: Shift,
        missing: u32,
    },
    /// Aucune infirmière éligible pour la nuit ce jour-là.
    NightUncovered { date: NaiveDate },
    /// Couverture obligatoire forcée hors du chemin normal.
    ForcedAssignment {
        date: NaiveDate,
        nurse: NurseId,
        shift: Shift,
    },
    /// Congé posé pour une infirmière absente du roster.
    UnknownVacationNurse { nurse: NurseId },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ShiftShortfall {
                date,
                shift,
                missing,
            } => write!(f, "{date}: {shift} short by {missing}"),
            Warning::NightUncovered { date } => write!(f, "{date}: NIGHT uncovered"),
            Warning::ForcedAssignment { date, nurse, shift } => {
                write!(f, "{date}: forced {nurse} onto {shift}")
            }
            Warning::UnknownVacationNurse { nurse } => {
                write!(f, "vacation for unknown nurse {nurse}, ignored")
            }
        }
    }
}

/// Résultat d'une génération : les cases du mois et les diagnostics.
#[derive(Debug, Clone)]
pub struct Generated {
    pub entries: Vec<ScheduleEntry>,
    pub warnings: Vec<Warning>,
}

/// Effectif requis pour un poste selon le type de journée.
/// Cible du remplissage générique, pas un plafond : la couverture
/// obligatoire (nuit, paire en alternance) peut s'y ajouter.
pub(crate) fn required_count(kind: DayKind, shift: Shift) -> u32 {
    match (kind, shift) {
        (DayKind::Weekday, Shift::Day) => 2,
        (DayKind::Weekday, Shift::MidDay) => 2,
        (DayKind::Weekday, Shift::Evening) => 1,
        (DayKind::Weekday, Shift::Night) => 1,
        (DayKind::WeekendHoliday, Shift::Day) => 1,
        (DayKind::WeekendHoliday, Shift::MidDay) => 0,
        (DayKind::WeekendHoliday, Shift::Evening) => 1,
        (DayKind::WeekendHoliday, Shift::Night) => 1,
        (_, Shift::Off) => 0,
    }
}

/// Objectif d'OFF par semaine (index local au mois) pour les infirmières
/// hors paire d'alternance.
pub(crate) const WEEKLY_OFF_TARGET: u32 = 2;
