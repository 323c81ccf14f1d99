//! CSV-to-SQLite migration.
//!
//! Each source file is one batch, wrapped in one transaction: a storage
//! failure rolls the whole batch back, while a malformed row is logged and
//! skipped. Parent rows (weight class, event, fighters) are resolved or
//! created before the dependent fight/stat/odds rows, and every step is
//! get-or-create, so re-running a migration on the same file is a no-op.

pub mod rows;
pub mod sample;


use crate::cli::types::{FighterId, FightId, FightOutcome};
use crate::error::{Result, UfcError};
use crate::storage::{
    FighterAttrs, NewBettingOdds, NewFight, NewFighterStat, UfcDatabase,
};
use rows::{parse_event_date, required, resolve_result, FightCsvRow, OddsCsvRow};
use serde::Serialize;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Bookmaker recorded for rows coming from the scraper wire format, which
/// carries a single blended price with no bookmaker column.
pub const SCRAPED_BOOKMAKER: &str = "consensus";

/// Counters for one migration batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationSummary {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub fighters_created: usize,
    pub events_created: usize,
    pub fights_inserted: usize,
    /// Rows whose fight already existed (replays, mostly).
    pub fights_skipped: usize,
    pub odds_inserted: usize,
    pub stats_inserted: usize,
}

/// Transforms CSV rows into a consistent graph of entity operations.
pub struct Migrator<'a> {
    db: &'a UfcDatabase,
}

impl<'a> Migrator<'a> {
    pub fn new(db: &'a UfcDatabase) -> Self {
        Self { db }
    }

    /// Migrate a file in the odds wire format.
    pub fn migrate_odds_file(&self, path: &Path) -> Result<MigrationSummary> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        self.migrate_odds_reader(&mut reader)
    }

    /// Migrate odds rows from any CSV reader.
    pub fn migrate_odds_reader<R: io::Read>(
        &self,
        reader: &mut csv::Reader<R>,
    ) -> Result<MigrationSummary> {
        // Header occupies line 1.
        let records = reader.deserialize().enumerate().map(|(i, r)| (i + 2, r));
        self.run_batch(records, Self::ingest_odds_row)
    }

    /// Migrate already-parsed odds rows (the sample seeder uses this).
    pub fn migrate_odds_rows(
        &self,
        rows: impl IntoIterator<Item = OddsCsvRow>,
    ) -> Result<MigrationSummary> {
        let records = rows.into_iter().enumerate().map(|(i, r)| (i + 1, Ok(r)));
        self.run_batch(records, Self::ingest_odds_row)
    }

    /// Migrate a file in the complete fight-data format.
    pub fn migrate_fights_file(&self, path: &Path) -> Result<MigrationSummary> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        self.migrate_fights_reader(&mut reader)
    }

    /// Migrate fight rows from any CSV reader.
    pub fn migrate_fights_reader<R: io::Read>(
        &self,
        reader: &mut csv::Reader<R>,
    ) -> Result<MigrationSummary> {
        let records = reader.deserialize().enumerate().map(|(i, r)| (i + 2, r));
        self.run_batch(records, Self::ingest_fight_row)
    }

    /// Run one batch under a single transaction. `InputFormat` errors are
    /// row-local (skip and keep going); anything else aborts the batch and
    /// the dropped transaction rolls it back.
    fn run_batch<T>(
        &self,
        records: impl Iterator<Item = (usize, csv::Result<T>)>,
        ingest: impl Fn(&Self, &T, &mut MigrationSummary) -> Result<()>,
    ) -> Result<MigrationSummary> {
        let tx = self.db.conn.unchecked_transaction()?;
        let mut summary = MigrationSummary::default();

        for (line, record) in records {
            summary.rows_read += 1;
            let row = match record {
                Ok(row) => row,
                Err(e) => {
                    warn!(line, error = %e, "skipping malformed row");
                    summary.rows_skipped += 1;
                    continue;
                }
            };
            match ingest(self, &row, &mut summary) {
                Ok(()) => {}
                Err(UfcError::InputFormat(message)) => {
                    warn!(line, %message, "skipping row");
                    summary.rows_skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tx.commit()?;
        info!(
            rows = summary.rows_read,
            skipped = summary.rows_skipped,
            fights = summary.fights_inserted,
            odds = summary.odds_inserted,
            "batch committed"
        );
        Ok(summary)
    }

    fn ingest_odds_row(&self, row: &OddsCsvRow, summary: &mut MigrationSummary) -> Result<()> {
        let event_name = required(&row.event, "event")?;
        let fighter1 = required(&row.fighter1, "fighter1")?;
        let fighter2 = required(&row.fighter2, "fighter2")?;
        if fighter1.eq_ignore_ascii_case(fighter2) {
            return Err(UfcError::InputFormat(format!(
                "fighter1 and fighter2 are the same: {fighter1:?}"
            )));
        }

        let event_date = parse_event_date(&row.date)?;
        let fighter1_odds = parse_odds(row.fighter1_odds, "fighter1_odds")?;
        let fighter2_odds = parse_odds(row.fighter2_odds, "fighter2_odds")?;
        let outcome = resolve_result(&row.result, fighter1, fighter2)?;

        let event = self.db.get_or_create_event(event_name, event_date, None)?;
        if event.was_created() {
            summary.events_created += 1;
        }

        let attrs = FighterAttrs::default();
        let f1 = self.db.get_or_create_fighter(fighter1, &attrs)?;
        let f2 = self.db.get_or_create_fighter(fighter2, &attrs)?;
        summary.fighters_created +=
            usize::from(f1.was_created()) + usize::from(f2.was_created());

        let fight_id = match self.db.find_fight(event.id(), f1.id(), f2.id())? {
            Some(id) => {
                summary.fights_skipped += 1;
                if let Some(outcome) = outcome {
                    // Backfill a result the earlier scrape didn't have yet.
                    let outcome = self.align_outcome(id, f1.id(), outcome)?;
                    self.db.record_fight_result(id, outcome, None, None, None)?;
                }
                id
            }
            None => {
                let fight_id = self.db.insert_fight(&NewFight {
                    event_id: event.id(),
                    fighter1_id: f1.id(),
                    fighter2_id: f2.id(),
                    weight_class_id: None,
                    outcome,
                    method: None,
                    round: None,
                    time: None,
                    referee: None,
                })?;
                summary.fights_inserted += 1;
                fight_id
            }
        };

        // Lower decimal price is the favourite; ties go to fighter1.
        let (favourite_fighter_id, favourite_odds, underdog_odds) =
            if fighter1_odds <= fighter2_odds {
                (f1.id(), fighter1_odds, fighter2_odds)
            } else {
                (f2.id(), fighter2_odds, fighter1_odds)
            };

        let odds = NewBettingOdds {
            fight_id,
            favourite_fighter_id,
            bookmaker: SCRAPED_BOOKMAKER.to_string(),
            favourite_odds,
            underdog_odds,
            odds_date: non_empty(&row.timestamp),
            source_link: non_empty(&row.link),
        };
        if self.db.insert_betting_odds(&odds)?.is_some() {
            summary.odds_inserted += 1;
        }

        Ok(())
    }

    fn ingest_fight_row(&self, row: &FightCsvRow, summary: &mut MigrationSummary) -> Result<()> {
        let event_name = required(&row.event, "event")?;
        let fighter1 = required(&row.fighter1, "fighter1")?;
        let fighter2 = required(&row.fighter2, "fighter2")?;
        if fighter1.eq_ignore_ascii_case(fighter2) {
            return Err(UfcError::InputFormat(format!(
                "fighter1 and fighter2 are the same: {fighter1:?}"
            )));
        }

        let event_date = parse_event_date(&row.date)?;
        let outcome = resolve_result(&row.winner, fighter1, fighter2)?;

        let weight_class_id = match non_empty(&row.weight_class) {
            Some(name) => Some(self.db.get_or_create_weight_class(&name)?.id()),
            None => None,
        };

        let event =
            self.db
                .get_or_create_event(event_name, event_date, non_empty(&row.location).as_deref())?;
        if event.was_created() {
            summary.events_created += 1;
        } else if let Some(location) = non_empty(&row.location) {
            // An odds-only scrape may have created the event without one.
            self.db.update_event_location(event.id(), &location)?;
        }

        // Attribute dates parse leniently: a garbled date of birth costs the
        // attribute, not the row.
        let attrs1 = FighterAttrs {
            height_cm: row.fighter1_height_cm,
            reach_cm: row.fighter1_reach_cm,
            stance: non_empty(&row.fighter1_stance),
            date_of_birth: parse_event_date(&row.fighter1_dob).ok(),
        };
        let attrs2 = FighterAttrs {
            height_cm: row.fighter2_height_cm,
            reach_cm: row.fighter2_reach_cm,
            stance: non_empty(&row.fighter2_stance),
            date_of_birth: parse_event_date(&row.fighter2_dob).ok(),
        };

        let f1 = self.db.get_or_create_fighter(fighter1, &attrs1)?;
        let f2 = self.db.get_or_create_fighter(fighter2, &attrs2)?;
        summary.fighters_created +=
            usize::from(f1.was_created()) + usize::from(f2.was_created());
        if !f1.was_created() && !attrs1.is_empty() {
            self.db.update_fighter_attrs(f1.id(), &attrs1)?;
        }
        if !f2.was_created() && !attrs2.is_empty() {
            self.db.update_fighter_attrs(f2.id(), &attrs2)?;
        }

        let fight_id = match self.db.find_fight(event.id(), f1.id(), f2.id())? {
            Some(id) => {
                summary.fights_skipped += 1;
                self.db
                    .update_fight_details(id, weight_class_id, non_empty(&row.referee).as_deref())?;
                if let Some(outcome) = outcome {
                    let outcome = self.align_outcome(id, f1.id(), outcome)?;
                    self.db.record_fight_result(
                        id,
                        outcome,
                        non_empty(&row.method).as_deref(),
                        row.round,
                        non_empty(&row.time).as_deref(),
                    )?;
                }
                id
            }
            None => {
                let fight_id = self.db.insert_fight(&NewFight {
                    event_id: event.id(),
                    fighter1_id: f1.id(),
                    fighter2_id: f2.id(),
                    weight_class_id,
                    outcome,
                    method: non_empty(&row.method),
                    round: row.round,
                    time: non_empty(&row.time),
                    referee: non_empty(&row.referee),
                })?;
                summary.fights_inserted += 1;
                fight_id
            }
        };

        for stat in [
            NewFighterStat {
                fight_id,
                fighter_id: f1.id(),
                sig_strikes_landed: row.fighter1_sig_strikes_landed,
                sig_strikes_attempted: row.fighter1_sig_strikes_attempted,
                takedowns: row.fighter1_takedowns,
                knockdowns: row.fighter1_knockdowns,
                control_time_seconds: row.fighter1_control_time_seconds,
            },
            NewFighterStat {
                fight_id,
                fighter_id: f2.id(),
                sig_strikes_landed: row.fighter2_sig_strikes_landed,
                sig_strikes_attempted: row.fighter2_sig_strikes_attempted,
                takedowns: row.fighter2_takedowns,
                knockdowns: row.fighter2_knockdowns,
                control_time_seconds: row.fighter2_control_time_seconds,
            },
        ] {
            let has_data = stat.sig_strikes_landed.is_some()
                || stat.sig_strikes_attempted.is_some()
                || stat.takedowns.is_some()
                || stat.knockdowns.is_some()
                || stat.control_time_seconds.is_some();
            if has_data && self.db.insert_fighter_stat(&stat)?.is_some() {
                summary.stats_inserted += 1;
            }
        }

        Ok(())
    }

    /// Align a CSV-relative outcome with the stored fight's corner order.
    ///
    /// `find_fight` matches the pairing regardless of order, so a replay row
    /// may list the corners the other way around than the stored fight does.
    fn align_outcome(
        &self,
        fight_id: FightId,
        csv_fighter1: FighterId,
        outcome: FightOutcome,
    ) -> Result<FightOutcome> {
        match self.db.get_fight(fight_id)? {
            Some(fight) if fight.fighter1_id != csv_fighter1 => Ok(outcome.swap_corners()),
            _ => Ok(outcome),
        }
    }
}

fn parse_odds(value: Option<f64>, field: &str) -> Result<f64> {
    match value {
        Some(odds) if odds.is_finite() && odds > 0.0 => Ok(odds),
        Some(odds) => Err(UfcError::InputFormat(format!(
            "{field} is not a valid decimal price: {odds}"
        ))),
        None => Err(UfcError::InputFormat(format!("missing required field: {field}"))),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
