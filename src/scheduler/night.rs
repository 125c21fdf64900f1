use super::stats::StatsBoard;
use crate::model::{Nurse, NurseId, WorkCondition};
use std::collections::{HashMap, HashSet};

/// Rotation des nuits : blocs contigus de 2 à 3 jours confiés à l'une des
/// deux infirmières de nuit, en alternant à chaque bloc, avec des cibles
/// mensuelles équilibrées.
///
/// Machine à états : « aucun bloc » / « bloc en cours (infirmière, jours
/// restants) ». Elle tourne une fois par jour sur tout le mois.
#[derive(Debug)]
pub(crate) struct NightRotation {
    candidates: Vec<NurseId>,
    targets: HashMap<NurseId, u32>,
    counts: HashMap<NurseId, u32>,
    block_nurse: Option<NurseId>,
    block_days_left: u32,
    /// Longueur préférée du prochain bloc, alternée 2↔3.
    next_len: u32,
    /// Infirmière attendue au prochain bloc, alternée à chaque bloc conclu.
    next_nurse: NurseId,
}

impl NightRotation {
    /// `None` si le roster n'a aucune infirmière de nuit : la nuit retombe
    /// alors sur le remplissage générique.
    pub fn new(roster: &[Nurse], year: i32, month: u32, days_in_month: u32) -> Option<Self> {
        let night: Vec<NurseId> = roster
            .iter()
            .filter(|n| n.work_condition == WorkCondition::NightOnly)
            .map(|n| n.id.clone())
            .take(2)
            .collect();
        let first = night.first()?.clone();

        let mut targets = HashMap::new();
        let preferred = if let Some(second) = night.get(1) {
            // Répartition en deux moitiés ; la plus grosse change de main
            // un mois sur deux.
            let mut first_target = days_in_month / 2;
            let mut second_target = days_in_month - first_target;
            if (year + month as i32) % 2 == 0 {
                std::mem::swap(&mut first_target, &mut second_target);
            }
            targets.insert(first.clone(), first_target);
            targets.insert(second.clone(), second_target);
            if first_target >= second_target {
                first.clone()
            } else {
                second.clone()
            }
        } else {
            targets.insert(first.clone(), days_in_month);
            first.clone()
        };

        let counts = night.iter().map(|id| (id.clone(), 0)).collect();
        Some(Self {
            candidates: night,
            targets,
            counts,
            block_nurse: None,
            block_days_left: 0,
            next_len: 2,
            next_nurse: preferred,
        })
    }

    fn remaining(&self, id: &NurseId) -> u32 {
        let target = self.targets.get(id).copied().unwrap_or(0);
        let count = self.counts.get(id).copied().unwrap_or(0);
        target.saturating_sub(count)
    }

    fn other(&self, id: &NurseId) -> NurseId {
        self.candidates
            .iter()
            .find(|c| *c != id)
            .unwrap_or(id)
            .clone()
    }

    /// Choisit l'infirmière de nuit du jour et met à jour l'état de bloc.
    /// L'appelant enregistre ensuite la case (et la statistique de nuit).
    /// `None` : journée sans nuit posée par la rotation (cas dégénéré).
    pub fn pick(&mut self, board: &StatsBoard, unavailable: &HashSet<NurseId>) -> Option<NurseId> {
        // Extension du bloc en cours.
        if self.block_days_left > 0 {
            if let Some(nurse) = self.block_nurse.clone() {
                if !unavailable.contains(&nurse) {
                    let allowance = board.night_allowance(&nurse);
                    if allowance == 0 {
                        self.block_nurse = None;
                        self.block_days_left = 0;
                    } else if board.night_next_streak(&nurse) <= 3 {
                        self.block_days_left =
                            (self.block_days_left - 1).min(allowance.saturating_sub(1));
                        self.note_assignment(&nurse);
                        return Some(nurse);
                    }
                }
            }
        }

        // Nouveau bloc : d'abord l'infirmière attendue, sinon l'autre.
        let primary = self.next_nurse.clone();
        let secondary = self.other(&primary);
        let mut ordered = vec![primary];
        if secondary != ordered[0] {
            ordered.push(secondary);
        }

        let mut selected: Option<NurseId> = None;
        let mut length = self.next_len;

        // Passe stricte : quota mensuel restant suffisant pour un bloc.
        for candidate in &ordered {
            if unavailable.contains(candidate) {
                continue;
            }
            let remaining = self.remaining(candidate);
            if remaining < 2 {
                continue;
            }
            length = block_length(remaining, self.next_len);
            selected = Some(candidate.clone());
            break;
        }

        // Passe relâchée : capacité = min(quota restant, marge de série).
        if selected.is_none() {
            for candidate in &ordered {
                if unavailable.contains(candidate) {
                    continue;
                }
                let capacity = self
                    .remaining(candidate)
                    .min(board.night_allowance(candidate));
                if capacity < 2 {
                    continue;
                }
                length = block_length(capacity, self.next_len).min(capacity);
                selected = Some(candidate.clone());
                break;
            }
        }

        match selected {
            Some(nurse) => {
                if board.night_next_streak(&nurse) > 3 {
                    // Série pleine : journée perdue pour la rotation,
                    // l'état du bloc précédent reste inerte (0 jour restant).
                    return None;
                }
                self.block_nurse = Some(nurse.clone());
                self.next_len = if self.next_len == 2 { 3 } else { 2 };
                self.block_days_left = length.saturating_sub(1);
                self.next_nurse = self.other(&nurse);
                self.note_assignment(&nurse);
                Some(nurse)
            }
            None => {
                self.block_nurse = None;
                self.block_days_left = 0;
                None
            }
        }
    }

    fn note_assignment(&mut self, id: &NurseId) {
        *self.counts.entry(id.clone()).or_insert(0) += 1;
    }
}

/// Longueur d'un nouveau bloc. Ne laisse jamais exactement 1 jour
/// inassignable dans le quota restant.
fn block_length(remaining: u32, preferred: u32) -> u32 {
    if remaining <= 2 {
        return 2;
    }
    if remaining == 3 {
        return 3;
    }
    let mut length = preferred;
    if length > remaining {
        length = 2;
    }
    if remaining - length == 1 {
        length = 3;
    }
    if !(2..=3).contains(&length) {
        length = if remaining % 2 == 0 { 2 } else { 3 };
    }
    if length > remaining {
        length = if remaining >= 3 { 3 } else { 2 };
    }
    length
}
