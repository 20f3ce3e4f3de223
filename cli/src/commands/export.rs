use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use chrono::Local;
use serde::Serialize;

use pantau_core::cache::CacheStore;
use pantau_core::export::{PdfRequest, history_to_csv, request_pdf};
use pantau_core::models::{BloodPressureRecord, PrayerRecord, WeightRecord};
use pantau_core::notify::{Notice, Notify};
use pantau_core::remote::RemoteTransport;
use pantau_core::sync::HistorySession;

use super::helpers::parse_date;

pub(crate) fn cmd_export_csv(
    remote: &dyn RemoteTransport,
    cache: &CacheStore,
    notifier: &dyn Notify,
    kind: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    match kind {
        "weight" => {
            let mut session = HistorySession::<WeightRecord>::new(remote, cache, notifier);
            session.load();
            write_csv(session.history(), notifier, kind, output)
        }
        "pressure" => {
            let mut session = HistorySession::<BloodPressureRecord>::new(remote, cache, notifier);
            session.load();
            write_csv(session.history(), notifier, kind, output)
        }
        "prayer" => {
            let mut session = HistorySession::<PrayerRecord>::new(remote, cache, notifier);
            session.load();
            write_csv(session.history(), notifier, kind, output)
        }
        _ => bail!("Unknown collection '{kind}'. Use weight, pressure, or prayer"),
    }
}

fn write_csv<T: Serialize>(
    records: &[T],
    notifier: &dyn Notify,
    kind: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    if records.is_empty() {
        notifier.notify(Notice::Warning, "no data to export");
        process::exit(2);
    }

    let csv = history_to_csv(records)?;
    let path = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "{kind}_{}.csv",
            Local::now().date_naive().format("%Y-%m-%d")
        ))
    });
    std::fs::write(&path, csv)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote {} records to {}", records.len(), path.display());

    Ok(())
}

#[allow(clippy::fn_params_excessive_bools)]
pub(crate) fn cmd_export_pdf(
    remote: &dyn RemoteTransport,
    notifier: &dyn Notify,
    start: String,
    end: String,
    skip_weight: bool,
    skip_pressure: bool,
    skip_prayer: bool,
) -> Result<()> {
    let request = PdfRequest {
        start_date: parse_date(Some(start))?,
        end_date: parse_date(Some(end))?,
        include_weight: !skip_weight,
        include_pressure: !skip_pressure,
        include_prayer: !skip_prayer,
    };
    if request.start_date > request.end_date {
        bail!("Start date must not be after end date");
    }

    match request_pdf(remote, &request) {
        Ok(url) => {
            notifier.notify(Notice::Success, "PDF report ready");
            println!("{url}");
            Ok(())
        }
        Err(err) => {
            notifier.notify(Notice::Error, "failed to generate PDF report");
            Err(err.into())
        }
    }
}
