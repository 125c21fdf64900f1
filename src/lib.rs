#![forbid(unsafe_code)]
//! Roulement — bibliothèque de génération de plannings mensuels
//! d'infirmières (sans BD).
//!
//! - Heuristique gloutonne jour par jour, avec score d'équité.
//! - Rotation des nuits par blocs de 2-3 jours, alternance DAY/EVENING.
//! - Congés et retouches manuelles ; stockage fichiers (JSON/CSV).
//! - Dates naïves ; le calendrier des fériés est injecté par l'appelant.

pub mod calendar;
pub mod io;
pub mod model;
pub mod scheduler;
pub mod storage;
pub mod summary;

pub use calendar::{
    continuous_week_number, month_days, week_of_month, DayKind, HolidayCalendar, HolidayTable,
    WeekendOnly,
};
pub use model::{
    apply_manual_edits, default_roster, ManualEdit, Nurse, NurseId, ScheduleEntry, Shift,
    VacationDay, WorkCondition,
};
pub use scheduler::{
    audit, generate_schedule, generate_schedule_with, GenerateOptions, Generated, NurseStats,
    RankingPolicy, SchedError, ScoreContext, Violation, Warning, WeeklyQuota, WeightedPolicy,
};
pub use storage::{SavedSchedule, ScheduleStore, StoredInfo};
pub use summary::{summarize, NurseTotals, SummaryRenderer, TextSummary};
