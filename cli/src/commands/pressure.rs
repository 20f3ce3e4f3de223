use anyhow::Result;
use chrono::Local;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use pantau_core::cache::CacheStore;
use pantau_core::models::BloodPressureRecord;
use pantau_core::notify::Notify;
use pantau_core::remote::RemoteTransport;
use pantau_core::stats::filter_period;
use pantau_core::sync::{HistorySession, SaveOutcome, SyncSource};

use super::helpers::{parse_date, parse_period, parse_reading, require_valid};

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_pressure_log(
    remote: &dyn RemoteTransport,
    cache: &CacheStore,
    notifier: &dyn Notify,
    morning: &str,
    evening: &str,
    medication: bool,
    breakfast: String,
    lunch: String,
    dinner: String,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let (systolic_morning, diastolic_morning) = parse_reading(morning)?;
    let (systolic_evening, diastolic_evening) = parse_reading(evening)?;

    let record = BloodPressureRecord {
        date: parse_date(date)?,
        systolic_morning,
        diastolic_morning,
        systolic_evening,
        diastolic_evening,
        medication_taken: medication,
        meal_morning: breakfast,
        meal_afternoon: lunch,
        meal_evening: dinner,
    };
    require_valid(notifier, record.validate());

    let mut session = HistorySession::<BloodPressureRecord>::new(remote, cache, notifier);
    session.load();
    let outcome = session.save(record.clone())?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "record": record,
                "status": record.status().label(),
                "synced": outcome == SaveOutcome::Synced,
            }))?
        );
    } else {
        println!(
            "Logged {}/{} (morning) and {}/{} (evening) for {}, status: {}",
            record.systolic_morning,
            record.diastolic_morning,
            record.systolic_evening,
            record.diastolic_evening,
            record.date.format("%Y-%m-%d"),
            record.status().label()
        );
    }

    Ok(())
}

pub(crate) fn cmd_pressure_history(
    remote: &dyn RemoteTransport,
    cache: &CacheStore,
    notifier: &dyn Notify,
    limit: usize,
    period: Option<String>,
    json: bool,
) -> Result<()> {
    let mut session = HistorySession::<BloodPressureRecord>::new(remote, cache, notifier);
    session.load();

    let history = match period {
        Some(p) => filter_period(
            session.history(),
            parse_period(&p)?,
            Local::now().date_naive(),
        ),
        None => session.history().to_vec(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&history)?);
        return Ok(());
    }

    if session.is_empty() {
        eprintln!("No blood-pressure entries yet. Use `pantau pressure log` to record one.");
        return Ok(());
    }
    if history.is_empty() {
        eprintln!("No blood-pressure entries in the selected period.");
        return Ok(());
    }
    if session.source() == SyncSource::LocalFallback {
        eprintln!("(server unreachable, showing locally cached data)");
    }

    #[derive(Tabled)]
    struct PressureRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Morning")]
        morning: String,
        #[tabled(rename = "Evening")]
        evening: String,
        #[tabled(rename = "Medication")]
        medication: String,
        #[tabled(rename = "Status")]
        status: String,
    }

    let rows: Vec<PressureRow> = history
        .iter()
        .take(limit)
        .map(|record| PressureRow {
            date: record.date.format("%Y-%m-%d").to_string(),
            morning: format!("{}/{}", record.systolic_morning, record.diastolic_morning),
            evening: format!("{}/{}", record.systolic_evening, record.diastolic_evening),
            medication: if record.medication_taken { "yes" } else { "no" }.to_string(),
            status: record.status().label().to_string(),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..3)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}
