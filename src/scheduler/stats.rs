use crate::calendar::DayKind;
use crate::model::{Nurse, NurseId, Shift};
use std::collections::HashMap;

/// Compteurs d'équité d'une infirmière, mis à jour à chaque case produite.
/// Durée de vie : une génération ; rien ne persiste d'un mois à l'autre.
#[derive(Debug, Default, Clone)]
pub struct NurseStats {
    pub off_count: u32,
    pub weekday_off_count: u32,
    pub weekend_off_count: u32,
    pub last_shift: Option<Shift>,
    /// Les deux derniers postes, du plus ancien au plus récent.
    pub last_two: Vec<Shift>,
    /// Série de postes identiques consécutifs. Convention générale : remise
    /// à 0 au changement de poste. Les nuits posées par la rotation comptent
    /// à partir de 1, ce qui fait tenir le plafond de 3 nuits d'affilée.
    pub consecutive_same: u32,
    counts: HashMap<Shift, u32>,
}

impl NurseStats {
    pub fn count(&self, shift: Shift) -> u32 {
        self.counts.get(&shift).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

/// Tableau des statistiques de tout le roster.
#[derive(Debug)]
pub(crate) struct StatsBoard {
    map: HashMap<NurseId, NurseStats>,
}

impl StatsBoard {
    pub fn new(roster: &[Nurse]) -> Self {
        let map = roster
            .iter()
            .map(|n| (n.id.clone(), NurseStats::default()))
            .collect();
        Self { map }
    }

    pub fn get(&self, id: &NurseId) -> Option<&NurseStats> {
        self.map.get(id)
    }

    /// Mise à jour générique, appelée une seule fois par case produite.
    pub fn record(&mut self, id: &NurseId, shift: Shift, kind: DayKind) {
        let Some(stats) = self.map.get_mut(id) else {
            return;
        };
        *stats.counts.entry(shift).or_insert(0) += 1;
        if shift == Shift::Off {
            stats.off_count += 1;
            match kind {
                DayKind::Weekday => stats.weekday_off_count += 1,
                DayKind::WeekendHoliday => stats.weekend_off_count += 1,
            }
        }
        stats.consecutive_same = if stats.last_shift == Some(shift) {
            stats.consecutive_same + 1
        } else {
            0
        };
        stats.last_shift = Some(shift);
        push_recent(&mut stats.last_two, shift);
    }

    /// Variante nuit : la série compte à partir de 1 pour la première nuit
    /// d'un bloc, sinon `allowance = 3 - série` n'arrêterait rien.
    pub fn record_night(&mut self, id: &NurseId) {
        let Some(stats) = self.map.get_mut(id) else {
            return;
        };
        let next = if stats.last_shift == Some(Shift::Night) {
            stats.consecutive_same + 1
        } else {
            1
        };
        *stats.counts.entry(Shift::Night).or_insert(0) += 1;
        stats.consecutive_same = next;
        stats.last_shift = Some(Shift::Night);
        push_recent(&mut stats.last_two, Shift::Night);
    }

    /// Longueur de la série de nuits si on assignait NIGHT aujourd'hui.
    pub fn night_next_streak(&self, id: &NurseId) -> u32 {
        match self.map.get(id) {
            Some(s) if s.last_shift == Some(Shift::Night) => s.consecutive_same + 1,
            _ => 1,
        }
    }

    /// Nuits encore possibles avant le plafond de 3 consécutives.
    pub fn night_allowance(&self, id: &NurseId) -> u32 {
        match self.map.get(id) {
            Some(s) if s.last_shift == Some(Shift::Night) => 3u32.saturating_sub(s.consecutive_same),
            _ => 3,
        }
    }

    /// Moyenne des OFF de week-end sur tout le roster.
    pub fn avg_weekend_off(&self) -> f64 {
        if self.map.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.map.values().map(|s| s.weekend_off_count).sum();
        f64::from(sum) / self.map.len() as f64
    }

    /// Moyenne des OFF de week-end sur un sous-groupe.
    pub fn avg_weekend_off_among(&self, ids: &[NurseId]) -> f64 {
        if ids.is_empty() {
            return 0.0;
        }
        let sum: u32 = ids
            .iter()
            .filter_map(|id| self.map.get(id))
            .map(|s| s.weekend_off_count)
            .sum();
        f64::from(sum) / ids.len() as f64
    }
}

fn push_recent(recent: &mut Vec<Shift>, shift: Shift) {
    recent.push(shift);
    if recent.len() > 2 {
        recent.remove(0);
    }
}
