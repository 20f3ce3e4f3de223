use anyhow::{Result, bail};
use chrono::Local;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use pantau_core::cache::CacheStore;
use pantau_core::models::{Biodata, WeightRecord};
use pantau_core::notify::Notify;
use pantau_core::remote::RemoteTransport;
use pantau_core::stats::filter_period;
use pantau_core::sync::{HistorySession, ProfileSession, SaveOutcome, SyncSource};

use super::helpers::{parse_date, parse_period, require_valid};

pub(crate) fn cmd_weight_log(
    remote: &dyn RemoteTransport,
    cache: &CacheStore,
    notifier: &dyn Notify,
    morning: f64,
    evening: f64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    // Daily entry is gated on the profile: without height there is no
    // ideal-weight band to measure against.
    let mut profile = ProfileSession::new(remote, cache, notifier);
    profile.load();
    if profile.profile().is_none() {
        bail!("No biodata profile yet. Create one first with `pantau weight biodata set`");
    }

    let record = WeightRecord {
        date: parse_date(date)?,
        morning_kg: morning,
        evening_kg: evening,
    };
    require_valid(notifier, record.validate());

    let mut session = HistorySession::<WeightRecord>::new(remote, cache, notifier);
    session.load();
    let outcome = session.save(record.clone())?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "record": record,
                "average": record.average_kg(),
                "synced": outcome == SaveOutcome::Synced,
            }))?
        );
    } else {
        println!(
            "Logged {:.1} / {:.1} kg for {} (average {:.1} kg)",
            record.morning_kg,
            record.evening_kg,
            record.date.format("%Y-%m-%d"),
            record.average_kg()
        );
    }

    Ok(())
}

pub(crate) fn cmd_weight_history(
    remote: &dyn RemoteTransport,
    cache: &CacheStore,
    notifier: &dyn Notify,
    limit: usize,
    period: Option<String>,
    json: bool,
) -> Result<()> {
    let mut session = HistorySession::<WeightRecord>::new(remote, cache, notifier);
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
        eprintln!("No weight entries yet. Use `pantau weight log` to record your weight.");
        return Ok(());
    }
    if history.is_empty() {
        eprintln!("No weight entries in the selected period.");
        return Ok(());
    }
    if session.source() == SyncSource::LocalFallback {
        eprintln!("(server unreachable, showing locally cached data)");
    }

    #[derive(Tabled)]
    struct WeightRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Morning (kg)")]
        morning: String,
        #[tabled(rename = "Evening (kg)")]
        evening: String,
        #[tabled(rename = "Average (kg)")]
        average: String,
        #[tabled(rename = "Change")]
        change: String,
    }

    let rows: Vec<WeightRow> = history
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, record)| {
            let change = history.get(i + 1).map_or("-".to_string(), |previous| {
                let diff = record.average_kg() - previous.average_kg();
                if diff > 0.0 {
                    format!("+{diff:.1} kg")
                } else if diff < 0.0 {
                    format!("{diff:.1} kg")
                } else {
                    "0 kg".to_string()
                }
            });
            WeightRow {
                date: record.date.format("%Y-%m-%d").to_string(),
                morning: format!("{:.1}", record.morning_kg),
                evening: format!("{:.1}", record.evening_kg),
                average: format!("{:.1}", record.average_kg()),
                change,
            }
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_biodata_set(
    remote: &dyn RemoteTransport,
    cache: &CacheStore,
    notifier: &dyn Notify,
    name: String,
    age: u32,
    birthplace: String,
    birth_date: String,
    hobby: String,
    occupation: String,
    height: f64,
    initial_weight: f64,
    json: bool,
) -> Result<()> {
    let biodata = Biodata {
        full_name: name,
        age,
        birthplace,
        birth_date: parse_date(Some(birth_date))?,
        hobby,
        occupation,
        height_cm: height,
        initial_weight_kg: initial_weight,
    };
    require_valid(notifier, biodata.validate());

    let mut session = ProfileSession::new(remote, cache, notifier);
    let outcome = session.save(biodata.clone())?;
    let band = biodata.ideal_weight();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "profile": biodata,
                "ideal_weight": band,
                "synced": outcome == SaveOutcome::Synced,
            }))?
        );
    } else {
        println!(
            "Ideal weight for {:.0} cm: {:.1} kg (normal range {:.1} to {:.1} kg)",
            biodata.height_cm, band.ideal_kg, band.low_kg, band.high_kg
        );
    }

    Ok(())
}

pub(crate) fn cmd_biodata_show(
    remote: &dyn RemoteTransport,
    cache: &CacheStore,
    notifier: &dyn Notify,
    json: bool,
) -> Result<()> {
    let mut session = ProfileSession::new(remote, cache, notifier);
    session.load();

    let Some(biodata) = session.profile() else {
        if json {
            println!("{}", serde_json::json!({ "error": "No biodata profile yet" }));
        } else {
            eprintln!("No biodata profile yet. Use `pantau weight biodata set` to create one.");
        }
        return Ok(());
    };

    let band = biodata.ideal_weight();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "profile": biodata,
                "ideal_weight": band,
            }))?
        );
    } else {
        println!("{}", biodata.full_name);
        println!("{} years | {}", biodata.age, biodata.occupation);
        println!(
            "Born {} in {}",
            biodata.birth_date.format("%Y-%m-%d"),
            biodata.birthplace
        );
        if !biodata.hobby.is_empty() {
            println!("Hobby: {}", biodata.hobby);
        }
        println!(
            "Height: {:.0} cm | Starting weight: {:.1} kg",
            biodata.height_cm, biodata.initial_weight_kg
        );
        println!(
            "Ideal weight: {:.1} kg (normal range {:.1} to {:.1} kg)",
            band.ideal_kg, band.low_kg, band.high_kg
        );
    }

    Ok(())
}
