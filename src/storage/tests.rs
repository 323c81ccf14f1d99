//! Unit tests for the storage layer.

use super::*;
use crate::cli::types::{EventId, FighterId, FightId, FightOutcome};
use crate::error::UfcError;
use chrono::NaiveDate;

fn create_test_db() -> UfcDatabase {
    UfcDatabase::open_in_memory().unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn add_fighter(db: &UfcDatabase, name: &str) -> FighterId {
    db.get_or_create_fighter(name, &FighterAttrs::default())
        .unwrap()
        .id()
}

fn add_event(db: &UfcDatabase, name: &str) -> EventId {
    db.get_or_create_event(name, date(2025, 7, 19), None)
        .unwrap()
        .id()
}

fn add_fight(
    db: &UfcDatabase,
    event_id: EventId,
    fighter1_id: FighterId,
    fighter2_id: FighterId,
    outcome: Option<FightOutcome>,
) -> FightId {
    db.insert_fight(&NewFight {
        event_id,
        fighter1_id,
        fighter2_id,
        weight_class_id: None,
        outcome,
        method: None,
        round: None,
        time: None,
        referee: None,
    })
    .unwrap()
}

#[test]
fn test_database_creation() {
    let _db = create_test_db();
}

#[test]
fn test_schema_is_idempotent() {
    let db = create_test_db();
    // Re-running schema creation must not touch existing tables.
    add_fighter(&db, "Leon Edwards");
    db.initialize_schema().unwrap();
    assert!(db.get_fighter_id_by_name("Leon Edwards").unwrap().is_some());
}

#[test]
fn test_seed_weight_classes_idempotent() {
    let db = create_test_db();
    let first = db.seed_weight_classes().unwrap();
    assert!(first > 0);
    assert_eq!(db.seed_weight_classes().unwrap(), 0);
}

#[test]
fn test_get_or_create_fighter_tags_creation() {
    let db = create_test_db();

    let first = db
        .get_or_create_fighter("Leon Edwards", &FighterAttrs::default())
        .unwrap();
    assert!(first.was_created());

    let second = db
        .get_or_create_fighter("Leon Edwards", &FighterAttrs::default())
        .unwrap();
    assert!(!second.was_created());
    assert_eq!(first.id(), second.id());
}

#[test]
fn test_get_fighter_id_by_name_missing() {
    let db = create_test_db();
    assert!(db.get_fighter_id_by_name("Nobody").unwrap().is_none());
}

#[test]
fn test_update_fighter_attrs_fills_only_nulls() {
    let db = create_test_db();
    let id = db
        .get_or_create_fighter(
            "Leon Edwards",
            &FighterAttrs {
                height_cm: Some(183.0),
                ..Default::default()
            },
        )
        .unwrap()
        .id();

    let updated = db
        .update_fighter_attrs(
            id,
            &FighterAttrs {
                height_cm: Some(999.0), // must not overwrite
                reach_cm: Some(188.0),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(updated);

    let fighter = db.get_fighter(id).unwrap().unwrap();
    assert_eq!(fighter.height_cm, Some(183.0));
    assert_eq!(fighter.reach_cm, Some(188.0));
}

#[test]
fn test_update_fighter_attrs_missing_id_is_noop() {
    let db = create_test_db();
    let updated = db
        .update_fighter_attrs(FighterId::new(9999), &FighterAttrs::default())
        .unwrap();
    assert!(!updated);
}

#[test]
fn test_get_or_create_event_natural_key() {
    let db = create_test_db();

    let first = db
        .get_or_create_event("UFC 304", date(2025, 7, 19), Some("Manchester"))
        .unwrap();
    assert!(first.was_created());

    // Same name + date resolves; same name on another date is a new event.
    let replay = db
        .get_or_create_event("UFC 304", date(2025, 7, 19), None)
        .unwrap();
    assert_eq!(replay.id(), first.id());
    assert!(!replay.was_created());

    let other_date = db
        .get_or_create_event("UFC 304", date(2025, 7, 20), None)
        .unwrap();
    assert!(other_date.was_created());
}

#[test]
fn test_insert_fight_rejects_same_fighter_twice() {
    let db = create_test_db();
    let event_id = add_event(&db, "UFC 304");
    let fighter = add_fighter(&db, "Leon Edwards");

    let result = db.insert_fight(&NewFight {
        event_id,
        fighter1_id: fighter,
        fighter2_id: fighter,
        weight_class_id: None,
        outcome: None,
        method: None,
        round: None,
        time: None,
        referee: None,
    });
    assert!(matches!(result, Err(UfcError::InputFormat(_))));
}

#[test]
fn test_insert_fight_unknown_event_is_referential_error() {
    let db = create_test_db();
    let a = add_fighter(&db, "Leon Edwards");
    let b = add_fighter(&db, "Belal Muhammad");

    let result = db.insert_fight(&NewFight {
        event_id: EventId::new(9999),
        fighter1_id: a,
        fighter2_id: b,
        weight_class_id: None,
        outcome: None,
        method: None,
        round: None,
        time: None,
        referee: None,
    });
    assert!(matches!(result, Err(UfcError::Referential(_))));
}

#[test]
fn test_find_fight_ignores_corner_order() {
    let db = create_test_db();
    let event_id = add_event(&db, "UFC 304");
    let a = add_fighter(&db, "Leon Edwards");
    let b = add_fighter(&db, "Belal Muhammad");
    let fight_id = add_fight(&db, event_id, a, b, None);

    assert_eq!(db.find_fight(event_id, a, b).unwrap(), Some(fight_id));
    assert_eq!(db.find_fight(event_id, b, a).unwrap(), Some(fight_id));
    assert_eq!(db.find_fight(event_id, a, FighterId::new(777)).unwrap(), None);
}

#[test]
fn test_record_fight_result_writes_once() {
    let db = create_test_db();
    let event_id = add_event(&db, "UFC 304");
    let a = add_fighter(&db, "Leon Edwards");
    let b = add_fighter(&db, "Belal Muhammad");
    let fight_id = add_fight(&db, event_id, a, b, None);

    assert!(db
        .record_fight_result(fight_id, FightOutcome::Fighter2, Some("Decision"), Some(5), None)
        .unwrap());
    // Already resolved: no-op.
    assert!(!db
        .record_fight_result(fight_id, FightOutcome::Fighter1, None, None, None)
        .unwrap());

    let fight = db.get_fight(fight_id).unwrap().unwrap();
    assert_eq!(fight.outcome, Some(FightOutcome::Fighter2));
    assert_eq!(fight.method.as_deref(), Some("Decision"));
}

#[test]
fn test_update_fight_details_fills_only_nulls() {
    let db = create_test_db();
    db.seed_weight_classes().unwrap();
    let event_id = add_event(&db, "UFC 304");
    let a = add_fighter(&db, "Leon Edwards");
    let b = add_fighter(&db, "Belal Muhammad");
    let fight_id = add_fight(&db, event_id, a, b, None);

    let welterweight = db.get_weight_class_id_by_name("Welterweight").unwrap();
    assert!(db
        .update_fight_details(fight_id, welterweight, Some("Herb Dean"))
        .unwrap());

    let fight = db.get_fight(fight_id).unwrap().unwrap();
    assert_eq!(fight.weight_class_id, welterweight);
    assert_eq!(fight.referee.as_deref(), Some("Herb Dean"));

    // Filled columns are not overwritten.
    let lightweight = db.get_weight_class_id_by_name("Lightweight").unwrap();
    db.update_fight_details(fight_id, lightweight, Some("Marc Goddard"))
        .unwrap();
    let fight = db.get_fight(fight_id).unwrap().unwrap();
    assert_eq!(fight.weight_class_id, welterweight);
    assert_eq!(fight.referee.as_deref(), Some("Herb Dean"));

    assert!(!db
        .update_fight_details(FightId::new(9999), None, None)
        .unwrap());
}

#[test]
fn test_update_event_location_fills_only_null() {
    let db = create_test_db();
    let event_id = add_event(&db, "UFC 304");

    assert!(db.update_event_location(event_id, "Manchester England").unwrap());
    let event = db.get_event(event_id).unwrap().unwrap();
    assert_eq!(event.location.as_deref(), Some("Manchester England"));

    db.update_event_location(event_id, "London England").unwrap();
    let event = db.get_event(event_id).unwrap().unwrap();
    assert_eq!(event.location.as_deref(), Some("Manchester England"));

    assert!(!db
        .update_event_location(EventId::new(9999), "Nowhere")
        .unwrap());
}

#[test]
fn test_insert_betting_odds_unknown_fight_is_referential_error() {
    let db = create_test_db();
    let a = add_fighter(&db, "Leon Edwards");

    let result = db.insert_betting_odds(&NewBettingOdds {
        fight_id: FightId::new(9999),
        favourite_fighter_id: a,
        bookmaker: "consensus".to_string(),
        favourite_odds: 1.85,
        underdog_odds: 1.95,
        odds_date: None,
        source_link: None,
    });
    assert!(matches!(result, Err(UfcError::Referential(_))));

    // The failed insert left nothing behind.
    let count: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM betting_odds", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_insert_betting_odds_skips_exact_duplicates() {
    let db = create_test_db();
    let event_id = add_event(&db, "UFC 304");
    let a = add_fighter(&db, "Leon Edwards");
    let b = add_fighter(&db, "Belal Muhammad");
    let fight_id = add_fight(&db, event_id, a, b, None);

    let odds = NewBettingOdds {
        fight_id,
        favourite_fighter_id: a,
        bookmaker: "consensus".to_string(),
        favourite_odds: 1.85,
        underdog_odds: 1.95,
        odds_date: Some("2025-07-01".to_string()),
        source_link: None,
    };
    assert!(db.insert_betting_odds(&odds).unwrap().is_some());
    assert!(db.insert_betting_odds(&odds).unwrap().is_none());

    // A different bookmaker's price for the same fight is a new row.
    let pinnacle = NewBettingOdds {
        bookmaker: "pinnacle".to_string(),
        ..odds
    };
    assert!(db.insert_betting_odds(&pinnacle).unwrap().is_some());
    assert_eq!(db.get_odds_for_fight(fight_id).unwrap().len(), 2);
}

#[test]
fn test_fighter_stats_are_immutable() {
    let db = create_test_db();
    let event_id = add_event(&db, "UFC 304");
    let a = add_fighter(&db, "Leon Edwards");
    let b = add_fighter(&db, "Belal Muhammad");
    let fight_id = add_fight(&db, event_id, a, b, None);

    let stat = NewFighterStat {
        fight_id,
        fighter_id: a,
        sig_strikes_landed: Some(120),
        sig_strikes_attempted: Some(210),
        takedowns: Some(0),
        knockdowns: Some(1),
        control_time_seconds: Some(45),
    };
    assert!(db.insert_fighter_stat(&stat).unwrap().is_some());
    // Second snapshot for the same (fight, fighter) pair is ignored.
    assert!(db.insert_fighter_stat(&stat).unwrap().is_none());
}

#[test]
fn test_get_fighter_record() {
    let db = create_test_db();
    let event_id = add_event(&db, "UFC 304");
    let a = add_fighter(&db, "Leon Edwards");
    let b = add_fighter(&db, "Belal Muhammad");
    let c = add_fighter(&db, "Kamaru Usman");

    add_fight(&db, event_id, a, b, Some(FightOutcome::Fighter1));
    add_fight(&db, event_id, c, a, Some(FightOutcome::Fighter2));
    add_fight(&db, event_id, b, c, Some(FightOutcome::Fighter1));
    // Unresolved fights stay out of the record.
    add_fight(&db, event_id, a, c, None);

    let record = db.get_fighter_record(a).unwrap();
    assert_eq!(record.wins, 2);
    assert_eq!(record.losses, 0);
    assert_eq!(record.total_fights(), 2);
    assert!((record.win_rate() - 1.0).abs() < f64::EPSILON);

    let record_b = db.get_fighter_record(b).unwrap();
    assert_eq!(record_b.wins, 1);
    assert_eq!(record_b.losses, 1);
    assert!((record_b.win_rate() - 0.5).abs() < f64::EPSILON);
}

#[test]
fn test_get_fighter_record_unknown_fighter() {
    let db = create_test_db();
    let result = db.get_fighter_record(FighterId::new(9999));
    assert!(matches!(result, Err(UfcError::NotFound { .. })));
}

#[test]
fn test_get_rankings_respects_min_fights() {
    let db = create_test_db();
    let event_id = add_event(&db, "UFC 304");
    let a = add_fighter(&db, "Leon Edwards");
    let b = add_fighter(&db, "Belal Muhammad");
    let c = add_fighter(&db, "Kamaru Usman");

    add_fight(&db, event_id, a, b, Some(FightOutcome::Fighter1));
    add_fight(&db, event_id, a, c, Some(FightOutcome::Fighter1));
    add_fight(&db, event_id, b, c, Some(FightOutcome::Fighter2));

    let rankings = db.get_rankings(None, 2, 10).unwrap();
    assert_eq!(rankings.len(), 3);
    assert_eq!(rankings[0].name, "Leon Edwards");
    assert_eq!(rankings[0].wins, 2);
    assert!((rankings[0].win_rate - 1.0).abs() < f64::EPSILON);

    // Nobody has five fights.
    assert!(db.get_rankings(None, 5, 10).unwrap().is_empty());
}

#[test]
fn test_head_to_head_is_symmetric() {
    let db = create_test_db();
    let a = add_fighter(&db, "Leon Edwards");
    let b = add_fighter(&db, "Kamaru Usman");

    let event1 = db
        .get_or_create_event("UFC 278", date(2022, 8, 20), None)
        .unwrap()
        .id();
    let event2 = db
        .get_or_create_event("UFC 286", date(2023, 3, 18), None)
        .unwrap()
        .id();
    let event3 = db
        .get_or_create_event("UFC 251", date(2020, 7, 12), None)
        .unwrap()
        .id();

    // Usman wins one, Edwards wins two (stored with mixed corner order).
    add_fight(&db, event3, b, a, Some(FightOutcome::Fighter1));
    add_fight(&db, event1, a, b, Some(FightOutcome::Fighter1));
    add_fight(&db, event2, b, a, Some(FightOutcome::Fighter2));

    let forward = db.get_head_to_head(a, b).unwrap();
    assert_eq!(forward.fighter_a_wins, 2);
    assert_eq!(forward.fighter_b_wins, 1);
    assert_eq!(forward.total_meetings, 3);

    let reversed = db.get_head_to_head(b, a).unwrap();
    assert_eq!(reversed.fighter_a_wins, forward.fighter_b_wins);
    assert_eq!(reversed.fighter_b_wins, forward.fighter_a_wins);
    assert_eq!(reversed.draws, forward.draws);
    assert_eq!(reversed.no_contests, forward.no_contests);
    assert_eq!(reversed.total_meetings, forward.total_meetings);
}

#[test]
fn test_head_to_head_never_met_is_all_zero() {
    let db = create_test_db();
    let a = add_fighter(&db, "Leon Edwards");
    let b = add_fighter(&db, "Tom Aspinall");

    let h2h = db.get_head_to_head(a, b).unwrap();
    assert_eq!(h2h.total_meetings, 0);
    assert_eq!(h2h.fighter_a_wins, 0);
    assert_eq!(h2h.fighter_b_wins, 0);
}

#[test]
fn test_event_report_includes_latest_odds() {
    let db = create_test_db();
    let event_id = add_event(&db, "UFC 304");
    let a = add_fighter(&db, "Leon Edwards");
    let b = add_fighter(&db, "Belal Muhammad");
    let fight_id = add_fight(&db, event_id, a, b, Some(FightOutcome::Fighter2));

    for (odds, day) in [(1.80, "2025-07-01"), (1.85, "2025-07-18")] {
        db.insert_betting_odds(&NewBettingOdds {
            fight_id,
            favourite_fighter_id: a,
            bookmaker: "consensus".to_string(),
            favourite_odds: odds,
            underdog_odds: 1.95,
            odds_date: Some(day.to_string()),
            source_link: None,
        })
        .unwrap();
    }

    let report = db.get_event_report(event_id).unwrap();
    assert_eq!(report.fights.len(), 1);
    let line = &report.fights[0];
    assert_eq!(line.fighter1_name, "Leon Edwards");
    assert_eq!(line.outcome, Some(FightOutcome::Fighter2));
    assert_eq!(line.favourite_name.as_deref(), Some("Leon Edwards"));
    assert_eq!(line.favourite_odds, Some(1.85));
}

#[test]
fn test_prediction_features() {
    let db = create_test_db();
    db.seed_weight_classes().unwrap();
    let event_id = add_event(&db, "UFC 304");
    let a = db
        .get_or_create_fighter(
            "Leon Edwards",
            &FighterAttrs {
                height_cm: Some(183.0),
                reach_cm: Some(188.0),
                stance: Some("Southpaw".to_string()),
                date_of_birth: Some(date(1991, 8, 25)),
            },
        )
        .unwrap()
        .id();
    let b = add_fighter(&db, "Belal Muhammad");
    let welterweight = db.get_weight_class_id_by_name("Welterweight").unwrap();

    let fight_id = db
        .insert_fight(&NewFight {
            event_id,
            fighter1_id: a,
            fighter2_id: b,
            weight_class_id: welterweight,
            outcome: None,
            method: None,
            round: None,
            time: None,
            referee: None,
        })
        .unwrap();

    db.insert_betting_odds(&NewBettingOdds {
        fight_id,
        favourite_fighter_id: a,
        bookmaker: "consensus".to_string(),
        favourite_odds: 1.85,
        underdog_odds: 1.95,
        odds_date: None,
        source_link: None,
    })
    .unwrap();

    let features = db.get_prediction_features_for_fight(fight_id).unwrap();
    assert_eq!(features.weight_class.as_deref(), Some("Welterweight"));
    assert_eq!(features.fighter1.name, "Leon Edwards");
    assert_eq!(features.fighter1.height_cm, Some(183.0));
    assert_eq!(features.fighter1.latest_odds, Some(1.85));
    assert_eq!(features.fighter2.latest_odds, Some(1.95));
    // No completed fights yet.
    assert_eq!(features.fighter1.wins, 0);
    assert!(features.fighter1.avg_sig_strikes_landed.is_none());
}

#[test]
fn test_prediction_features_unknown_fight() {
    let db = create_test_db();
    let result = db.get_prediction_features_for_fight(FightId::new(42));
    assert!(matches!(result, Err(UfcError::NotFound { .. })));
}

#[test]
fn test_model_registration_and_accuracy() {
    let db = create_test_db();
    let event_id = add_event(&db, "UFC 304");
    let a = add_fighter(&db, "Leon Edwards");
    let b = add_fighter(&db, "Belal Muhammad");
    let fight_id = add_fight(&db, event_id, a, b, None);

    let config = ModelConfig {
        feature_set: Some("career-v2".to_string()),
        learning_rate: Some(0.05),
        n_estimators: Some(400),
        ..Default::default()
    };
    let model = db.get_or_create_model("gbdt", "2.1", &config).unwrap();
    assert!(model.was_created());

    // Replay resolves the same model and keeps the stored config.
    let replay = db
        .get_or_create_model("gbdt", "2.1", &ModelConfig::default())
        .unwrap();
    assert_eq!(replay.id(), model.id());
    let stored = db.get_model(model.id()).unwrap().unwrap();
    assert_eq!(stored.config, config);

    let prediction_id = db
        .insert_prediction(&NewPrediction {
            model_id: model.id(),
            fight_id,
            predicted_outcome: FightOutcome::Fighter1,
            confidence: 0.62,
        })
        .unwrap();

    let unresolved = db.get_model_accuracy(model.id()).unwrap();
    assert_eq!(unresolved.total_predictions, 1);
    assert_eq!(unresolved.resolved, 0);
    assert!(unresolved.accuracy.is_none());

    // The actual outcome is written exactly once.
    assert!(db
        .record_actual_outcome(prediction_id, FightOutcome::Fighter1)
        .unwrap());
    assert!(!db
        .record_actual_outcome(prediction_id, FightOutcome::Fighter2)
        .unwrap());

    let accuracy = db.get_model_accuracy(model.id()).unwrap();
    assert_eq!(accuracy.resolved, 1);
    assert_eq!(accuracy.correct, 1);
    assert_eq!(accuracy.accuracy, Some(1.0));
}

#[test]
fn test_predictions_with_corrupted_outcome_text_error() {
    let db = create_test_db();
    let event_id = add_event(&db, "UFC 304");
    let a = add_fighter(&db, "Leon Edwards");
    let b = add_fighter(&db, "Belal Muhammad");
    let fight_id = add_fight(&db, event_id, a, b, None);

    let model = db
        .get_or_create_model("gbdt", "2.1", &ModelConfig::default())
        .unwrap();
    db.insert_prediction(&NewPrediction {
        model_id: model.id(),
        fight_id,
        predicted_outcome: FightOutcome::Fighter1,
        confidence: 0.62,
    })
    .unwrap();

    let predictions = db.get_predictions_for_model(model.id()).unwrap();
    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0].predicted_outcome, FightOutcome::Fighter1);

    // Corrupt the stored text behind the CHECK constraint's back: the read
    // must fail instead of relabeling the prediction.
    db.conn
        .execute_batch("PRAGMA ignore_check_constraints = ON")
        .unwrap();
    db.conn
        .execute("UPDATE predictions SET predicted_outcome = 'ko'", [])
        .unwrap();
    db.conn
        .execute_batch("PRAGMA ignore_check_constraints = OFF")
        .unwrap();

    assert!(db.get_predictions_for_model(model.id()).is_err());
}

#[test]
fn test_insert_lineup_is_atomic() {
    let mut db = create_test_db();
    let event_id = add_event(&db, "UFC 304");
    let a = add_fighter(&db, "Leon Edwards");

    // Second slot references a fighter that does not exist: the whole
    // lineup must roll back.
    let result = db.insert_lineup(
        &NewLineup {
            event_id,
            name: "main card stack".to_string(),
            salary_cap: 50_000,
        },
        &[
            NewLineupFighter {
                fighter_id: a,
                salary: 9_200,
                projected_points: Some(88.5),
            },
            NewLineupFighter {
                fighter_id: FighterId::new(9999),
                salary: 7_400,
                projected_points: Some(71.0),
            },
        ],
    );
    assert!(matches!(result, Err(UfcError::Referential(_))));

    let count: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM draftkings_lineups", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_lineup_round_trip_and_actuals() {
    let mut db = create_test_db();
    let event_id = add_event(&db, "UFC 304");
    let a = add_fighter(&db, "Leon Edwards");
    let b = add_fighter(&db, "Tom Aspinall");

    let lineup_id = db
        .insert_lineup(
            &NewLineup {
                event_id,
                name: "main card stack".to_string(),
                salary_cap: 50_000,
            },
            &[
                NewLineupFighter {
                    fighter_id: a,
                    salary: 9_200,
                    projected_points: Some(88.5),
                },
                NewLineupFighter {
                    fighter_id: b,
                    salary: 8_100,
                    projected_points: Some(92.0),
                },
            ],
        )
        .unwrap();

    let (lineup, fighters) = db.get_lineup(lineup_id).unwrap().unwrap();
    assert_eq!(lineup.salary_cap, 50_000);
    assert_eq!(lineup.total_projected_points, Some(180.5));
    assert_eq!(fighters.len(), 2);
    assert!(lineup.total_actual_points.is_none());

    assert!(db
        .update_lineup_actuals(lineup_id, &[(a, 101.25), (b, 64.25)])
        .unwrap());
    let (lineup, _) = db.get_lineup(lineup_id).unwrap().unwrap();
    assert_eq!(lineup.total_actual_points, Some(165.5));

    // Unknown lineup: silent no-op.
    assert!(!db
        .update_lineup_actuals(crate::cli::types::LineupId::new(777), &[(a, 1.0)])
        .unwrap());
}
