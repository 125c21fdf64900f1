use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::BTreeMap;

/// Type de journée pour les règles d'éligibilité et les effectifs requis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Weekday,
    WeekendHoliday,
}

/// Capacité fournie par l'appelant : quels jours sont fériés ?
/// Pas de cache global ni de singleton ; l'oracle appartient à l'appelant.
pub trait HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool;

    /// Nom du jour férié, si connu.
    fn holiday_name(&self, _date: NaiveDate) -> Option<&str> {
        None
    }

    /// Week-end ou férié.
    fn is_non_working_day(&self, date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun) || self.is_holiday(date)
    }
}

/// Calendrier sans jours fériés : seuls les week-ends sont chômés.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeekendOnly;

impl HolidayCalendar for WeekendOnly {
    fn is_holiday(&self, _date: NaiveDate) -> bool {
        false
    }
}

/// Table explicite de jours fériés nommés.
#[derive(Debug, Default, Clone)]
pub struct HolidayTable {
    days: BTreeMap<NaiveDate, String>,
}

impl HolidayTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<N: Into<String>>(&mut self, date: NaiveDate, name: N) {
        self.days.insert(date, name.into());
    }

    pub fn from_dates<I: IntoIterator<Item = (NaiveDate, String)>>(dates: I) -> Self {
        Self {
            days: dates.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl HolidayCalendar for HolidayTable {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.days.contains_key(&date)
    }

    fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.days.get(&date).map(String::as_str)
    }
}

impl DayKind {
    pub fn of(date: NaiveDate, calendar: &dyn HolidayCalendar) -> Self {
        if calendar.is_non_working_day(date) {
            DayKind::WeekendHoliday
        } else {
            DayKind::Weekday
        }
    }
}

/// Tous les jours du mois, dans l'ordre. `None` si (year, month) est invalide.
pub fn month_days(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let mut days = Vec::with_capacity(31);
    let mut current = first;
    while current.month() == month {
        days.push(current);
        current = current.succ_opt()?;
    }
    Some(days)
}

/// Numéro de semaine continu, indépendant du mois et de l'année.
///
/// Semaines lundi→dimanche ; ancrage sur le lundi 2020-01-06 (semaine 0).
/// Deux dates de la même semaine donnent le même numéro, les semaines
/// adjacentes diffèrent d'exactement 1, négatif avant la référence.
pub fn continuous_week_number(date: NaiveDate) -> i64 {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    let reference = NaiveDate::from_ymd_opt(2020, 1, 6).unwrap();
    (monday - reference).num_days() / 7
}

/// Index de semaine local au mois (0 pour les jours 1 à 7, etc.).
/// Sert au quota d'OFF hebdomadaire, distinct du numéro continu.
pub fn week_of_month(date: NaiveDate) -> u32 {
    date.day0() / 7
}
