use crate::calendar::{month_days, DayKind, HolidayCalendar};
use crate::model::{Nurse, NurseId, ScheduleEntry, Shift, VacationDay};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Écart constaté entre un planning et ses règles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingEntry {
        nurse: NurseId,
        date: NaiveDate,
    },
    DuplicateEntry {
        nurse: NurseId,
        date: NaiveDate,
    },
    ConditionViolation {
        nurse: NurseId,
        date: NaiveDate,
        shift: Shift,
    },
    VacationIgnored {
        nurse: NurseId,
        date: NaiveDate,
    },
    NightStreakExceeded {
        nurse: NurseId,
        end: NaiveDate,
        length: u32,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingEntry { nurse, date } => {
                write!(f, "{date}: no entry for {nurse}")
            }
            Violation::DuplicateEntry { nurse, date } => {
                write!(f, "{date}: duplicate entry for {nurse}")
            }
            Violation::ConditionViolation { nurse, date, shift } => {
                write!(f, "{date}: {shift} not allowed for {nurse}")
            }
            Violation::VacationIgnored { nurse, date } => {
                write!(f, "{date}: {nurse} works despite vacation")
            }
            Violation::NightStreakExceeded { nurse, end, length } => {
                write!(f, "{nurse}: {length} consecutive nights ending {end}")
            }
        }
    }
}

/// Audite un planning contre les invariants du générateur : couverture
/// complète, conditions de travail, congés honorés, plafond de nuits.
pub fn audit(
    entries: &[ScheduleEntry],
    year: i32,
    month: u32,
    roster: &[Nurse],
    vacations: &[VacationDay],
    calendar: &dyn HolidayCalendar,
) -> Vec<Violation> {
    let mut out = Vec::new();
    let Some(days) = month_days(year, month) else {
        return out;
    };

    let vacation_set: HashSet<(&NurseId, NaiveDate)> =
        vacations.iter().map(|v| (&v.nurse, v.date)).collect();

    let mut by_cell: HashMap<(&NurseId, NaiveDate), Vec<Shift>> = HashMap::new();
    for entry in entries {
        by_cell
            .entry((&entry.nurse, entry.date))
            .or_default()
            .push(entry.shift);
    }

    for nurse in roster {
        for &date in &days {
            let kind = DayKind::of(date, calendar);
            let on_vacation = vacation_set.contains(&(&nurse.id, date));
            match by_cell.get(&(&nurse.id, date)).map(Vec::as_slice) {
                None | Some([]) => out.push(Violation::MissingEntry {
                    nurse: nurse.id.clone(),
                    date,
                }),
                Some([shift]) => {
                    if on_vacation && *shift != Shift::Off {
                        out.push(Violation::VacationIgnored {
                            nurse: nurse.id.clone(),
                            date,
                        });
                    }
                    // Un OFF posé par congé est licite même là où la
                    // condition l'interdit (paire d'alternance en semaine).
                    let excused = *shift == Shift::Off && on_vacation;
                    if !excused && !nurse.work_condition.allows(*shift, kind) {
                        out.push(Violation::ConditionViolation {
                            nurse: nurse.id.clone(),
                            date,
                            shift: *shift,
                        });
                    }
                }
                Some(_) => out.push(Violation::DuplicateEntry {
                    nurse: nurse.id.clone(),
                    date,
                }),
            }
        }

        // Séries de nuits, en parcourant le mois dans l'ordre.
        let mut streak = 0u32;
        let mut reported = false;
        for &date in &days {
            let is_night = matches!(
                by_cell.get(&(&nurse.id, date)).map(Vec::as_slice),
                Some([Shift::Night])
            );
            if is_night {
                streak += 1;
                if streak > 3 && !reported {
                    out.push(Violation::NightStreakExceeded {
                        nurse: nurse.id.clone(),
                        end: date,
                        length: streak,
                    });
                    reported = true;
                }
            } else {
                streak = 0;
                reported = false;
            }
        }
    }

    out
}
