use super::alternation::WeeklyAlternation;
use super::night::NightRotation;
use super::scoring::{RankingPolicy, ScoreContext, WeeklyQuota};
use super::stats::StatsBoard;
use super::types::{required_count, Generated, SchedError, Warning, WEEKLY_OFF_TARGET};
use crate::calendar::{month_days, week_of_month, DayKind, HolidayCalendar};
use crate::model::{Nurse, NurseId, ScheduleEntry, Shift, VacationDay, WorkCondition};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// État d'une journée en cours de remplissage.
struct DayState {
    date: NaiveDate,
    kind: DayKind,
    assigned: HashSet<NurseId>,
    slots: HashMap<Shift, u32>,
}

impl DayState {
    fn new(date: NaiveDate, kind: DayKind) -> Self {
        Self {
            date,
            kind,
            assigned: HashSet::new(),
            slots: HashMap::new(),
        }
    }

    fn slot(&self, shift: Shift) -> u32 {
        self.slots.get(&shift).copied().unwrap_or(0)
    }
}

/// État partagé d'une génération : statistiques, sortie, quotas.
struct Run {
    board: StatsBoard,
    entries: Vec<ScheduleEntry>,
    warnings: Vec<Warning>,
    weekly_off: HashMap<NurseId, u32>,
    alternates: Vec<NurseId>,
    daytime: Vec<NurseId>,
    quota_subjects: Vec<NurseId>,
}

impl Run {
    fn new(roster: &[Nurse]) -> Self {
        let alternates: Vec<NurseId> = roster
            .iter()
            .filter(|n| n.work_condition == WorkCondition::DayEveningAlternate)
            .map(|n| n.id.clone())
            .collect();
        let daytime = roster
            .iter()
            .filter(|n| n.work_condition == WorkCondition::DaytimeOnly)
            .map(|n| n.id.clone())
            .collect();
        let quota_subjects = roster
            .iter()
            .filter(|n| n.work_condition != WorkCondition::DayEveningAlternate)
            .map(|n| n.id.clone())
            .collect();
        Self {
            board: StatsBoard::new(roster),
            entries: Vec::new(),
            warnings: Vec::new(),
            weekly_off: HashMap::new(),
            alternates,
            daytime,
            quota_subjects,
        }
    }

    fn is_alternate(&self, id: &NurseId) -> bool {
        self.alternates.contains(id)
    }

    fn weekly_count(&self, id: &NurseId) -> u32 {
        self.weekly_off.get(id).copied().unwrap_or(0)
    }

    fn reset_weekly_quota(&mut self) {
        for id in &self.quota_subjects {
            self.weekly_off.insert(id.clone(), 0);
        }
    }

    /// Pose une case et met à jour toutes les statistiques, une seule fois
    /// par (infirmière, jour), quel que soit le chemin qui y mène.
    fn assign(&mut self, day: &mut DayState, id: &NurseId, shift: Shift) {
        day.assigned.insert(id.clone());
        *day.slots.entry(shift).or_insert(0) += 1;
        if shift == Shift::Night {
            self.board.record_night(id);
        } else {
            self.board.record(id, shift, day.kind);
        }
        if shift == Shift::Off && !self.is_alternate(id) {
            *self.weekly_off.entry(id.clone()).or_insert(0) += 1;
        }
        self.entries.push(ScheduleEntry {
            date: day.date,
            nurse: id.clone(),
            shift,
        });
    }
}

pub(super) fn generate(
    roster: &[Nurse],
    year: i32,
    month: u32,
    vacations: &[VacationDay],
    calendar: &dyn HolidayCalendar,
    policy: &mut dyn RankingPolicy,
) -> Result<Generated, SchedError> {
    let days = month_days(year, month).ok_or(SchedError::InvalidMonth(month))?;

    let mut run = Run::new(roster);
    let mut alternation = WeeklyAlternation::new();
    let mut night = NightRotation::new(roster, year, month, days.len() as u32);

    // Congés indexés par (infirmière, date) ; ids inconnus signalés.
    let roster_ids: HashSet<&NurseId> = roster.iter().map(|n| &n.id).collect();
    let mut vacation_set: HashSet<(NurseId, NaiveDate)> = HashSet::new();
    for vacation in vacations {
        if roster_ids.contains(&vacation.nurse) {
            vacation_set.insert((vacation.nurse.clone(), vacation.date));
        } else {
            let already = run.warnings.iter().any(
                |w| matches!(w, Warning::UnknownVacationNurse { nurse } if *nurse == vacation.nurse),
            );
            if !already {
                run.warnings.push(Warning::UnknownVacationNurse {
                    nurse: vacation.nurse.clone(),
                });
            }
        }
    }

    let mut current_week: Option<u32> = None;

    for &date in &days {
        let kind = DayKind::of(date, calendar);

        // Remise à zéro du quota d'OFF au changement de semaine
        // (index local au mois, pas le numéro continu).
        let week = week_of_month(date);
        if current_week != Some(week) {
            current_week = Some(week);
            run.reset_weekly_quota();
        }

        let mut day = DayState::new(date, kind);

        // 1. Congés : prioritaires sur tout, couverture obligatoire comprise.
        for nurse in roster {
            if vacation_set.contains(&(nurse.id.clone(), date)) {
                run.assign(&mut day, &nurse.id, Shift::Off);
            }
        }

        // 2. Week-end/férié : la paire d'alternance se repose.
        if kind == DayKind::WeekendHoliday {
            for id in run.alternates.clone() {
                if !day.assigned.contains(&id) {
                    run.assign(&mut day, &id, Shift::Off);
                }
            }
        }

        // 3. Rotation des nuits, avant que le remplissage générique ne
        // dispute le créneau.
        if day.slot(Shift::Night) == 0 {
            if let Some(rotation) = night.as_mut() {
                if let Some(id) = rotation.pick(&run.board, &day.assigned) {
                    run.assign(&mut day, &id, Shift::Night);
                }
            }
        }

        // 4. Semaine : la paire est forcée sur son poste de la semaine,
        // effectifs déjà atteints ou non.
        if kind == DayKind::Weekday {
            for (index, id) in run.alternates.clone().into_iter().enumerate() {
                if day.assigned.contains(&id) {
                    continue;
                }
                let shift = alternation.shift_for(index, date);
                run.assign(&mut day, &id, shift);
            }
        }

        // 5. Remplissage générique par score.
        fill_requirements(&mut run, &mut day, roster, &mut alternation, policy);

        // 6. OFF de clôture pour toutes les infirmières restantes.
        trailing_off(&mut run, &mut day, roster, &mut alternation);
    }

    Ok(Generated {
        entries: run.entries,
        warnings: run.warnings,
    })
}

fn fill_requirements(
    run: &mut Run,
    day: &mut DayState,
    roster: &[Nurse],
    alternation: &mut WeeklyAlternation,
    policy: &mut dyn RankingPolicy,
) {
    for shift in Shift::WORKING {
        let required = required_count(day.kind, shift);
        while day.slot(shift) < required {
            let avg_all = run.board.avg_weekend_off();
            let avg_daytime = run.board.avg_weekend_off_among(&run.daytime);

            let mut best: Option<NurseId> = None;
            let mut best_score = f64::NEG_INFINITY;
            for nurse in roster {
                if !eligible(run, day, alternation, nurse, shift) {
                    continue;
                }
                let Some(stats) = run.board.get(&nurse.id) else {
                    continue;
                };
                let weekly = (!run.is_alternate(&nurse.id)).then(|| WeeklyQuota {
                    target: WEEKLY_OFF_TARGET,
                    count: run.weekly_count(&nurse.id),
                });
                let ctx = ScoreContext {
                    nurse,
                    shift,
                    day_kind: day.kind,
                    stats,
                    weekly,
                    avg_weekend_off_all: avg_all,
                    avg_weekend_off_daytime: avg_daytime,
                };
                let score = policy.rank(&ctx);
                if score > best_score {
                    best_score = score;
                    best = Some(nurse.id.clone());
                }
            }

            match best {
                Some(id) => run.assign(day, &id, shift),
                None => {
                    // Pénurie admise : le créneau reste vacant aujourd'hui.
                    let missing = required - day.slot(shift);
                    if shift == Shift::Night {
                        run.warnings.push(Warning::NightUncovered { date: day.date });
                    } else {
                        run.warnings.push(Warning::ShiftShortfall {
                            date: day.date,
                            shift,
                            missing,
                        });
                    }
                    #[cfg(feature = "logging")]
                    tracing::warn!(date = %day.date, shift = %shift, "requirement left unfilled");
                    break;
                }
            }
        }
    }
}

fn eligible(
    run: &Run,
    day: &DayState,
    alternation: &mut WeeklyAlternation,
    nurse: &Nurse,
    shift: Shift,
) -> bool {
    if day.assigned.contains(&nurse.id) {
        return false;
    }
    if !nurse.work_condition.allows(shift, day.kind) {
        return false;
    }
    // La paire, en semaine, ne prend que le poste décidé pour sa semaine.
    if day.kind == DayKind::Weekday {
        if let Some(index) = run.alternates.iter().position(|id| *id == nurse.id) {
            if shift != alternation.shift_for(index, day.date) {
                return false;
            }
        }
    }
    // Plafond dur, quel que soit le chemin : jamais plus de 3 nuits de suite.
    if shift == Shift::Night && run.board.night_next_streak(&nurse.id) > 3 {
        return false;
    }
    true
}

fn trailing_off(
    run: &mut Run,
    day: &mut DayState,
    roster: &[Nurse],
    alternation: &mut WeeklyAlternation,
) {
    if day.kind == DayKind::WeekendHoliday {
        let unassigned: Vec<&Nurse> = roster
            .iter()
            .filter(|n| !day.assigned.contains(&n.id))
            .collect();
        let mut daytime: Vec<&Nurse> = unassigned
            .iter()
            .copied()
            .filter(|n| n.work_condition == WorkCondition::DaytimeOnly)
            .collect();
        let others: Vec<&Nurse> = unassigned
            .iter()
            .copied()
            .filter(|n| n.work_condition != WorkCondition::DaytimeOnly)
            .collect();

        // Les moins reposées d'abord : déficit hebdomadaire, puis OFF de
        // week-end déjà pris.
        daytime.sort_by_key(|n| {
            let deficit = i64::from(run.weekly_count(&n.id)) - i64::from(WEEKLY_OFF_TARGET);
            let weekend_off = run
                .board
                .get(&n.id)
                .map(|s| s.weekend_off_count)
                .unwrap_or(0);
            (deficit, weekend_off)
        });

        // Au plus 2 OFF dans le groupe journée ; le surplus renfloue DAY ou
        // EVENING, côté le moins pourvu.
        let take = daytime.len().min(2);
        for (i, nurse) in daytime.iter().enumerate() {
            if i < take {
                run.assign(day, &nurse.id, Shift::Off);
            } else {
                let shift = if day.slot(Shift::Day) < day.slot(Shift::Evening) {
                    Shift::Day
                } else {
                    Shift::Evening
                };
                run.assign(day, &nurse.id, shift);
            }
        }
        for nurse in others {
            run.assign(day, &nurse.id, Shift::Off);
        }
    } else {
        // La paire doit déjà être posée ; sinon on force, en le signalant.
        for (index, id) in run.alternates.clone().into_iter().enumerate() {
            if day.assigned.contains(&id) {
                continue;
            }
            let shift = alternation.shift_for(index, day.date);
            run.warnings.push(Warning::ForcedAssignment {
                date: day.date,
                nurse: id.clone(),
                shift,
            });
            run.assign(day, &id, shift);
        }

        let mut rest: Vec<&Nurse> = roster
            .iter()
            .filter(|n| !day.assigned.contains(&n.id))
            .collect();
        // Les moins reposées de la semaine passent en premier.
        rest.sort_by_key(|n| run.weekly_count(&n.id));
        for nurse in rest {
            run.assign(day, &nurse.id, Shift::Off);
        }
    }
}
