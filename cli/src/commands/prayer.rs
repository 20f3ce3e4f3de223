use anyhow::Result;
use chrono::Local;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use pantau_core::cache::CacheStore;
use pantau_core::models::PrayerRecord;
use pantau_core::notify::Notify;
use pantau_core::remote::RemoteTransport;
use pantau_core::stats::{filter_period, percentage};
use pantau_core::sync::{HistorySession, SaveOutcome, SyncSource};

use super::helpers::{parse_date, parse_period, parse_prayer_flags};

pub(crate) fn cmd_prayer_log(
    remote: &dyn RemoteTransport,
    cache: &CacheStore,
    notifier: &dyn Notify,
    done: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let flags = parse_prayer_flags(done)?;
    let record = PrayerRecord::new(parse_date(date)?, flags);

    let mut session = HistorySession::<PrayerRecord>::new(remote, cache, notifier);
    session.load();
    let outcome = session.save(record.clone())?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "record": record,
                "synced": outcome == SaveOutcome::Synced,
            }))?
        );
    } else {
        println!(
            "Logged {}/7 prayers for {}",
            record.total,
            record.date.format("%Y-%m-%d")
        );
    }

    Ok(())
}

pub(crate) fn cmd_prayer_history(
    remote: &dyn RemoteTransport,
    cache: &CacheStore,
    notifier: &dyn Notify,
    limit: usize,
    period: Option<String>,
    json: bool,
) -> Result<()> {
    let mut session = HistorySession::<PrayerRecord>::new(remote, cache, notifier);
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
        eprintln!("No prayer entries yet. Use `pantau prayer log` to record a day.");
        return Ok(());
    }
    if history.is_empty() {
        eprintln!("No prayer entries in the selected period.");
        return Ok(());
    }
    if session.source() == SyncSource::LocalFallback {
        eprintln!("(server unreachable, showing locally cached data)");
    }

    #[derive(Tabled)]
    struct PrayerRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Fard")]
        fard: String,
        #[tabled(rename = "Dhuha")]
        dhuha: String,
        #[tabled(rename = "Tahajud")]
        tahajud: String,
        #[tabled(rename = "Total")]
        total: String,
        #[tabled(rename = "Done")]
        done: String,
    }

    let rows: Vec<PrayerRow> = history
        .iter()
        .take(limit)
        .map(|record| PrayerRow {
            date: record.date.format("%Y-%m-%d").to_string(),
            fard: format!("{}/5", record.obligatory_count()),
            dhuha: if record.dhuha { "✓" } else { "✗" }.to_string(),
            tahajud: if record.tahajud { "✓" } else { "✗" }.to_string(),
            total: format!("{}/7", record.total),
            done: format!("{}%", percentage(u32::from(record.total), 7)),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}
