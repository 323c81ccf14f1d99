//! Export round-trip tests: an exported odds file feeds back through the
//! migrator without creating anything.

use ufc_data::export::{export_events_csv, export_fighters_csv, export_odds_csv};
use ufc_data::migrate::rows::OddsCsvRow;
use ufc_data::migrate::sample::seed_sample_data;
use ufc_data::migrate::Migrator;
use ufc_data::storage::UfcDatabase;
use ufc_data::FightOutcome;

fn odds_reader(data: &[u8]) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(data)
}

#[test]
fn test_odds_export_reimports_as_noop() {
    let db = UfcDatabase::open_in_memory().unwrap();
    seed_sample_data(&db).unwrap();

    let mut exported = Vec::new();
    export_odds_csv(&db, &mut exported).unwrap();

    let summary = Migrator::new(&db)
        .migrate_odds_reader(&mut odds_reader(&exported))
        .unwrap();
    assert_eq!(summary.rows_read, 4);
    assert_eq!(summary.rows_skipped, 0);
    assert_eq!(summary.fighters_created, 0);
    assert_eq!(summary.events_created, 0);
    assert_eq!(summary.fights_inserted, 0);
    assert_eq!(summary.fights_skipped, 4);
    assert_eq!(summary.odds_inserted, 0);
}

#[test]
fn test_odds_export_carries_results_into_fresh_database() {
    let db = UfcDatabase::open_in_memory().unwrap();
    seed_sample_data(&db).unwrap();

    // Resolve one fight, then export.
    let edwards = db.get_fighter_id_by_name("Leon Edwards").unwrap().unwrap();
    let muhammad = db.get_fighter_id_by_name("Belal Muhammad").unwrap().unwrap();
    let event = db
        .get_event_by_natural_key(
            "UFC 304: Edwards vs Muhammad 2",
            chrono::NaiveDate::from_ymd_opt(2025, 7, 19).unwrap(),
        )
        .unwrap()
        .unwrap();
    let fight_id = db
        .find_fight(event.event_id, edwards, muhammad)
        .unwrap()
        .unwrap();
    db.record_fight_result(fight_id, FightOutcome::Fighter2, None, None, None)
        .unwrap();

    let mut exported = Vec::new();
    export_odds_csv(&db, &mut exported).unwrap();

    // The result column names the winner, not a corner label.
    let rows: Vec<OddsCsvRow> = odds_reader(&exported)
        .deserialize()
        .collect::<Result<_, _>>()
        .unwrap();
    let edwards_row = rows
        .iter()
        .find(|row| row.fighter1 == "Leon Edwards")
        .unwrap();
    assert_eq!(edwards_row.result, "Belal Muhammad");

    let fresh = UfcDatabase::open_in_memory().unwrap();
    Migrator::new(&fresh)
        .migrate_odds_reader(&mut odds_reader(&exported))
        .unwrap();

    let muhammad = fresh
        .get_fighter_id_by_name("Belal Muhammad")
        .unwrap()
        .unwrap();
    let record = fresh.get_fighter_record(muhammad).unwrap();
    assert_eq!(record.wins, 1);

    let edwards = fresh.get_fighter_id_by_name("Leon Edwards").unwrap().unwrap();
    let odds = fresh
        .get_odds_for_fight(
            fresh
                .find_fight(
                    fresh
                        .get_event_by_natural_key(
                            "UFC 304: Edwards vs Muhammad 2",
                            chrono::NaiveDate::from_ymd_opt(2025, 7, 19).unwrap(),
                        )
                        .unwrap()
                        .unwrap()
                        .event_id,
                    edwards,
                    muhammad,
                )
                .unwrap()
                .unwrap(),
        )
        .unwrap();
    assert_eq!(odds.len(), 1);
    assert_eq!(odds[0].favourite_odds, 1.85);
}

#[test]
fn test_fighters_export_is_sorted_by_name() {
    let db = UfcDatabase::open_in_memory().unwrap();
    seed_sample_data(&db).unwrap();

    let mut out = Vec::new();
    export_fighters_csv(&db, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let names: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(names.len(), 8);
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[test]
fn test_events_export() {
    let db = UfcDatabase::open_in_memory().unwrap();
    seed_sample_data(&db).unwrap();

    let mut out = Vec::new();
    export_events_csv(&db, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("name,date,location\n"));
    assert_eq!(text.lines().count(), 3);
    assert!(text.contains("UFC 304: Edwards vs Muhammad 2,2025-07-19,"));
}
