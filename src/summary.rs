use crate::calendar::{DayKind, HolidayCalendar};
use crate::model::{Nurse, NurseId, ScheduleEntry, Shift};
use std::collections::HashMap;

/// Totaux mensuels d'une infirmière.
#[derive(Debug, Clone)]
pub struct NurseTotals {
    pub nurse: NurseId,
    pub label: String,
    pub weekday_off: u32,
    pub weekend_off: u32,
    counts: HashMap<Shift, u32>,
}

impl NurseTotals {
    pub fn count(&self, shift: Shift) -> u32 {
        self.counts.get(&shift).copied().unwrap_or(0)
    }

    /// Jours travaillés (tout sauf OFF).
    pub fn worked(&self) -> u32 {
        self.counts
            .iter()
            .filter(|(s, _)| s.is_working())
            .map(|(_, c)| c)
            .sum()
    }
}

/// Agrège un planning en totaux par infirmière, dans l'ordre du roster.
pub fn summarize(
    entries: &[ScheduleEntry],
    roster: &[Nurse],
    calendar: &dyn HolidayCalendar,
) -> Vec<NurseTotals> {
    let mut totals: Vec<NurseTotals> = roster
        .iter()
        .map(|n| NurseTotals {
            nurse: n.id.clone(),
            label: n.name.clone(),
            weekday_off: 0,
            weekend_off: 0,
            counts: HashMap::new(),
        })
        .collect();

    for entry in entries {
        let Some(row) = totals.iter_mut().find(|t| t.nurse == entry.nurse) else {
            continue;
        };
        *row.counts.entry(entry.shift).or_insert(0) += 1;
        if entry.shift == Shift::Off {
            match DayKind::of(entry.date, calendar) {
                DayKind::Weekday => row.weekday_off += 1,
                DayKind::WeekendHoliday => row.weekend_off += 1,
            }
        }
    }

    totals
}

/// Permet de customiser le rendu du récapitulatif (texte, mail, etc.).
pub trait SummaryRenderer {
    fn render(&self, totals: &[NurseTotals]) -> String;
}

/// Tableau texte simple, une ligne par infirmière.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextSummary;

impl SummaryRenderer for TextSummary {
    fn render(&self, totals: &[NurseTotals]) -> String {
        let mut out = String::from(
            "infirmière | DAY | MID-DAY | EVENING | NIGHT | OFF (sem/WE)\n",
        );
        for row in totals {
            out.push_str(&format!(
                "{} ({}) | {} | {} | {} | {} | {} ({}/{})\n",
                row.label,
                row.nurse,
                row.count(Shift::Day),
                row.count(Shift::MidDay),
                row.count(Shift::Evening),
                row.count(Shift::Night),
                row.count(Shift::Off),
                row.weekday_off,
                row.weekend_off,
            ));
        }
        out
    }
}
