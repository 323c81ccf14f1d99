//! `report`: read-only analytics over the stored data.

use super::common::open_database;
use crate::cli::{FighterId, ReportCmd};
use crate::storage::UfcDatabase;
use anyhow::{bail, Context, Result};
use std::path::Path;

pub fn handle_report(db_path: Option<&Path>, cmd: ReportCmd) -> Result<()> {
    let db = open_database(db_path)?;

    match cmd {
        ReportCmd::Rankings {
            weight_class,
            min_fights,
            limit,
            json,
        } => {
            let rankings = db.get_rankings(weight_class.as_deref(), min_fights, limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rankings)?);
            } else if rankings.is_empty() {
                println!("No fighters with at least {min_fights} completed fights");
            } else {
                for (rank, entry) in rankings.iter().enumerate() {
                    println!(
                        "{:>3}. {} - {}-{} ({:.0}% over {} fights)",
                        rank + 1,
                        entry.name,
                        entry.wins,
                        entry.losses,
                        entry.win_rate * 100.0,
                        entry.total_fights
                    );
                }
            }
        }

        ReportCmd::HeadToHead {
            fighter_a,
            fighter_b,
            json,
        } => {
            let a = fighter_id_by_name(&db, &fighter_a)?;
            let b = fighter_id_by_name(&db, &fighter_b)?;
            let h2h = db.get_head_to_head(a, b)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&h2h)?);
            } else if h2h.total_meetings == 0 {
                println!(
                    "{} and {} have never fought",
                    h2h.fighter_a_name, h2h.fighter_b_name
                );
            } else {
                println!(
                    "{} {} - {} {} ({} draws, {} no-contests, {} meetings)",
                    h2h.fighter_a_name,
                    h2h.fighter_a_wins,
                    h2h.fighter_b_wins,
                    h2h.fighter_b_name,
                    h2h.draws,
                    h2h.no_contests,
                    h2h.total_meetings
                );
            }
        }

        ReportCmd::Event { name, date, json } => {
            let event = db
                .get_event_by_natural_key(&name, date)?
                .with_context(|| format!("no event named {name:?} on {date}"))?;
            let report = db.get_event_report(event.event_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} - {}", report.event.name, report.event.event_date);
                if let Some(location) = &report.event.location {
                    println!("{location}");
                }
                for fight in &report.fights {
                    let outcome = fight
                        .outcome
                        .map(|o| o.to_string())
                        .unwrap_or_else(|| "upcoming".to_string());
                    let odds = match (&fight.favourite_name, fight.favourite_odds) {
                        (Some(name), Some(odds)) => format!(" [{name} {odds:.2}]"),
                        _ => String::new(),
                    };
                    println!(
                        "  {} vs {} - {}{}",
                        fight.fighter1_name, fight.fighter2_name, outcome, odds
                    );
                }
            }
        }

        ReportCmd::Features { fight_id, json } => {
            let features = db.get_prediction_features_for_fight(fight_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&features)?);
            } else {
                println!(
                    "fight {} on {} ({})",
                    features.fight_id,
                    features.event_date,
                    features.weight_class.as_deref().unwrap_or("unknown division")
                );
                for corner in [&features.fighter1, &features.fighter2] {
                    println!(
                        "  {}: {}-{} ({:.0}%), odds {}",
                        corner.name,
                        corner.wins,
                        corner.losses,
                        corner.win_rate * 100.0,
                        corner
                            .latest_odds
                            .map(|o| format!("{o:.2}"))
                            .unwrap_or_else(|| "n/a".to_string())
                    );
                }
            }
        }

        ReportCmd::ModelAccuracy { model_id, json } => {
            let accuracy = db.get_model_accuracy(model_id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&accuracy)?);
            } else {
                match accuracy.accuracy {
                    Some(rate) => println!(
                        "{}: {}/{} correct ({:.0}%), {} predictions total",
                        accuracy.model_name,
                        accuracy.correct,
                        accuracy.resolved,
                        rate * 100.0,
                        accuracy.total_predictions
                    ),
                    None => println!(
                        "{}: no resolved predictions yet ({} recorded)",
                        accuracy.model_name, accuracy.total_predictions
                    ),
                }
            }
        }
    }

    Ok(())
}

fn fighter_id_by_name(db: &UfcDatabase, name: &str) -> Result<FighterId> {
    match db.get_fighter_id_by_name(name)? {
        Some(id) => Ok(id),
        None => bail!("unknown fighter: {name:?}"),
    }
}
