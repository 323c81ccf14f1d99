//! CSV exporters.
//!
//! Odds are written back in the scraper wire format, so feeding an export
//! through `migrate odds` creates no new rows. Fighters and events are
//! plain table dumps.

use crate::cli::types::FightOutcome;
use crate::error::Result;
use crate::migrate::rows::OddsCsvRow;
use crate::storage::UfcDatabase;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct FighterCsvRow {
    name: String,
    height_cm: Option<f64>,
    reach_cm: Option<f64>,
    stance: Option<String>,
    date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct EventCsvRow {
    name: String,
    date: NaiveDate,
    location: Option<String>,
}

/// Export every odds row in the scraper wire format
/// (`link,date,event,fighter1,fighter2,fighter1_odds,fighter2_odds,result,timestamp`).
///
/// The favourite takes the fighter1 column, matching how the migrator picks
/// favourites on the way in, so the round trip is exact.
pub fn export_odds_csv<W: Write>(db: &UfcDatabase, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut stmt = db.conn.prepare(
        "SELECT COALESCE(bo.source_link, ''), e.event_date, e.name,
                fav.name, dog.name, bo.favourite_odds, bo.underdog_odds,
                ft.outcome, ft.fighter1_id, bo.favourite_fighter_id,
                COALESCE(bo.odds_date, '')
         FROM betting_odds bo
         JOIN fights ft ON ft.fight_id = bo.fight_id
         JOIN events e ON e.event_id = ft.event_id
         JOIN fighters fav ON fav.fighter_id = bo.favourite_fighter_id
         JOIN fighters dog ON dog.fighter_id = CASE
             WHEN ft.fighter1_id = bo.favourite_fighter_id
             THEN ft.fighter2_id ELSE ft.fighter1_id END
         ORDER BY bo.odds_id",
    )?;

    let rows = stmt.query_map([], |row| {
        let link: String = row.get(0)?;
        let event_date: NaiveDate = row.get(1)?;
        let event: String = row.get(2)?;
        let favourite_name: String = row.get(3)?;
        let underdog_name: String = row.get(4)?;
        let favourite_odds: f64 = row.get(5)?;
        let underdog_odds: f64 = row.get(6)?;
        let outcome = FightOutcome::from_db(row.get(7)?);
        let fighter1_id: i64 = row.get(8)?;
        let favourite_id: i64 = row.get(9)?;
        let timestamp: String = row.get(10)?;

        // Stored outcomes are relative to the fight's corner order; the
        // export names the winner instead so the file stands on its own.
        let favourite_is_corner1 = fighter1_id == favourite_id;
        let result = match outcome {
            None => String::new(),
            Some(FightOutcome::Draw) => "draw".to_string(),
            Some(FightOutcome::NoContest) => "NC".to_string(),
            Some(FightOutcome::Fighter1) => if favourite_is_corner1 {
                favourite_name.clone()
            } else {
                underdog_name.clone()
            },
            Some(FightOutcome::Fighter2) => if favourite_is_corner1 {
                underdog_name.clone()
            } else {
                favourite_name.clone()
            },
        };

        Ok(OddsCsvRow {
            link,
            date: event_date.to_string(),
            event,
            fighter1: favourite_name,
            fighter2: underdog_name,
            fighter1_odds: Some(favourite_odds),
            fighter2_odds: Some(underdog_odds),
            result,
            timestamp,
        })
    })?;

    for row in rows {
        writer.serialize(row?)?;
    }
    writer.flush()?;
    Ok(())
}

/// Dump the fighters table.
pub fn export_fighters_csv<W: Write>(db: &UfcDatabase, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for fighter in db.get_all_fighters()? {
        writer.serialize(FighterCsvRow {
            name: fighter.name,
            height_cm: fighter.height_cm,
            reach_cm: fighter.reach_cm,
            stance: fighter.stance,
            date_of_birth: fighter.date_of_birth,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Dump the events table.
pub fn export_events_csv<W: Write>(db: &UfcDatabase, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut stmt = db
        .conn
        .prepare("SELECT name, event_date, location FROM events ORDER BY event_date, name")?;
    let rows = stmt.query_map([], |row| {
        Ok(EventCsvRow {
            name: row.get(0)?,
            date: row.get(1)?,
            location: row.get(2)?,
        })
    })?;

    for row in rows {
        writer.serialize(row?)?;
    }
    writer.flush()?;
    Ok(())
}
