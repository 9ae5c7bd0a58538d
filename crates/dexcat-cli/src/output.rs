//! Terminal and JSON rendering of displayed entries.

use anyhow::Result;
use colored::Colorize;
use dexcat_ingest::{IngestProgress, IngestReport};
use dexcat_model::{EntityRecord, Locale};
use dexcat_session::Session;
use serde::Serialize;

/// One row of `--json` output.
#[derive(Serialize)]
struct JsonEntry<'a> {
    #[serde(flatten)]
    record: &'a EntityRecord,
    display_name: &'a str,
    image_uri: String,
    disabled: bool,
    chosen: bool,
}

fn json_entry<'a>(session: &Session, record: &'a EntityRecord, locale: &'a Locale) -> JsonEntry<'a> {
    JsonEntry {
        record,
        display_name: record.display_name(locale),
        image_uri: record.image.uri().into_owned(),
        disabled: session.selection().is_disabled(record.id),
        chosen: session.selection().chosen_id() == Some(record.id),
    }
}

pub fn print_json(session: &Session, records: &[&EntityRecord]) -> Result<()> {
    let locale = session.locale();
    let rows: Vec<JsonEntry<'_>> = records
        .iter()
        .map(|record| json_entry(session, record, locale))
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

pub fn format_row(session: &Session, record: &EntityRecord) -> String {
    let categories = record
        .categories
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("/");
    let flags = record
        .flags
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(",");
    let color = record.color.map(|c| c.as_str()).unwrap_or("-");

    let mut row = format!(
        "#{:04}  {:<24} {:<18} gen {}  stage {}  {:<7}",
        record.id,
        record.display_name(session.locale()),
        categories,
        record.generation,
        record.evolution_depth,
        color,
    );
    if !flags.is_empty() {
        row.push_str(&format!(" [{flags}]"));
    }
    row
}

pub fn print_table(session: &Session, records: &[&EntityRecord]) {
    for record in records {
        let row = format_row(session, record);
        if session.selection().chosen_id() == Some(record.id) {
            println!("{} {}", "*".green().bold(), row.bold());
        } else if session.selection().is_disabled(record.id) {
            println!("  {}", row.dimmed());
        } else {
            println!("  {row}");
        }
    }
    eprintln!(
        "{} {} of {} entries",
        "shown".green().bold(),
        records.len(),
        session.catalog().len()
    );
}

pub fn print_progress(event: &IngestProgress) {
    eprintln!("{} {:>3}% {}", "ingest".cyan().bold(), event.percent, event.message);
}

pub fn print_report(report: &IngestReport) {
    if report.is_complete() {
        return;
    }
    if !report.failed_generations.is_empty() {
        let gens = report
            .failed_generations
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        eprintln!(
            "{} lineage unavailable for generation(s) {gens}; their entries show as generation 1",
            "warning:".yellow().bold()
        );
    }
    if !report.dropped.is_empty() {
        eprintln!(
            "{} {} entr{} could not be loaded",
            "warning:".yellow().bold(),
            report.dropped.len(),
            if report.dropped.len() == 1 { "y" } else { "ies" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dexcat_model::{Catalog, Category, Color, SpecialFlag};

    #[test]
    fn rows_show_facets_and_localized_name() {
        let record = EntityRecord::new(150, "mewtwo", vec![Category::Psychic])
            .unwrap()
            .with_flag(SpecialFlag::Legendary)
            .with_color(Some(Color::Purple))
            .with_localized_name("ja", "ミュウツー");
        let mut session = Session::with_seed(Catalog::from_records(vec![record.clone()]), 0);
        session.preferences_mut().locale = Locale::new("ja");

        let row = format_row(&session, &record);
        assert!(row.starts_with("#0150  ミュウツー"));
        assert!(row.contains("psychic"));
        assert!(row.contains("purple"));
        assert!(row.ends_with("[legendary]"));
    }
}
