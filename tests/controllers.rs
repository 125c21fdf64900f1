#![forbid(unsafe_code)]
use chrono::NaiveDate;
use roulement::{
    continuous_week_number, generate_schedule, month_days, week_of_month, DayKind,
    GenerateOptions, HolidayCalendar, HolidayTable, NurseId, Shift, WeekendOnly,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn continuous_week_is_anchored_on_reference_monday() {
    // 2020-01-06 est le lundi de référence (semaine 0).
    assert_eq!(continuous_week_number(date(2020, 1, 6)), 0);
    // Le dimanche appartient à la semaine commencée le lundi précédent.
    assert_eq!(continuous_week_number(date(2020, 1, 12)), 0);
    assert_eq!(continuous_week_number(date(2020, 1, 13)), 1);
    // Négatif avant la référence.
    assert_eq!(continuous_week_number(date(2020, 1, 5)), -1);
    assert_eq!(continuous_week_number(date(2019, 12, 30)), -1);
}

#[test]
fn continuous_week_shifts_by_one_every_seven_days() {
    let samples = [
        date(2019, 6, 3),
        date(2020, 2, 29),
        date(2024, 12, 31),
        date(2025, 3, 14),
    ];
    for d in samples {
        assert_eq!(
            continuous_week_number(d + chrono::Duration::days(7)),
            continuous_week_number(d) + 1
        );
    }
}

#[test]
fn continuous_week_is_constant_inside_a_week() {
    // Semaine du lundi 2025-03-10 au dimanche 2025-03-16.
    let monday = date(2025, 3, 10);
    let week = continuous_week_number(monday);
    for offset in 0..7 {
        assert_eq!(
            continuous_week_number(monday + chrono::Duration::days(offset)),
            week
        );
    }
}

#[test]
fn week_of_month_is_month_local() {
    assert_eq!(week_of_month(date(2025, 3, 1)), 0);
    assert_eq!(week_of_month(date(2025, 3, 7)), 0);
    assert_eq!(week_of_month(date(2025, 3, 8)), 1);
    assert_eq!(week_of_month(date(2025, 3, 29)), 4);
}

#[test]
fn month_days_handles_length_and_leap_years() {
    assert_eq!(month_days(2025, 3).unwrap().len(), 31);
    assert_eq!(month_days(2025, 2).unwrap().len(), 28);
    assert_eq!(month_days(2024, 2).unwrap().len(), 29);
    assert!(month_days(2025, 13).is_none());
}

#[test]
fn holiday_table_marks_non_working_days() {
    let mut table = HolidayTable::new();
    table.insert(date(2025, 3, 5), "Fête locale");

    assert!(table.is_non_working_day(date(2025, 3, 5))); // mercredi férié
    assert!(table.is_non_working_day(date(2025, 3, 8))); // samedi
    assert!(!table.is_non_working_day(date(2025, 3, 6)));
    assert_eq!(table.holiday_name(date(2025, 3, 5)), Some("Fête locale"));
    assert_eq!(table.holiday_name(date(2025, 3, 6)), None);

    assert_eq!(DayKind::of(date(2025, 3, 5), &table), DayKind::WeekendHoliday);
    assert_eq!(DayKind::of(date(2025, 3, 6), &table), DayKind::Weekday);
    assert!(!WeekendOnly.is_non_working_day(date(2025, 3, 5)));
}

#[test]
fn weekday_holiday_is_scheduled_like_a_weekend() {
    let mut table = HolidayTable::new();
    table.insert(date(2025, 3, 5), "Fête locale");

    let generated = generate_schedule(
        2025,
        3,
        &[],
        &[],
        &table,
        GenerateOptions { seed: Some(8) },
    )
    .unwrap();

    let holiday = date(2025, 3, 5);
    for entry in &generated.entries {
        if entry.date != holiday {
            continue;
        }
        // Pas de MID-DAY un jour chômé, et la paire d'alternance se repose.
        assert_ne!(entry.shift, Shift::MidDay);
        if entry.nurse == NurseId::new("E") || entry.nurse == NurseId::new("F") {
            assert_eq!(entry.shift, Shift::Off);
        }
    }
}
