use crate::calendar::continuous_week_number;
use crate::model::Shift;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Alternance hebdomadaire DAY/EVENING de la paire dédiée.
///
/// La décision est une fonction pure du numéro de semaine continu,
/// mémorisée par semaine le temps d'une génération : tous les jours ouvrés
/// d'une même semaine reçoivent la même paire. Ancrage : la semaine du
/// 2020-01-06 (numéro 0) donne EVENING au premier membre ; parité paire du
/// numéro de semaine ⇒ idem, impaire ⇒ inversé.
#[derive(Debug, Default)]
pub(crate) struct WeeklyAlternation {
    cache: HashMap<i64, (Shift, Shift)>,
}

impl WeeklyAlternation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paire (premier membre, second membre) pour la semaine donnée.
    pub fn shifts_for_week(&mut self, week: i64) -> (Shift, Shift) {
        *self.cache.entry(week).or_insert_with(|| {
            if week.rem_euclid(2) == 0 {
                (Shift::Evening, Shift::Day)
            } else {
                (Shift::Day, Shift::Evening)
            }
        })
    }

    /// Poste du membre `index` de la paire pour la semaine de `date`.
    pub fn shift_for(&mut self, index: usize, date: NaiveDate) -> Shift {
        let (first, second) = self.shifts_for_week(continuous_week_number(date));
        if index % 2 == 0 {
            first
        } else {
            second
        }
    }
}
