use std::collections::BTreeMap;
use std::process;

use anyhow::Result;
use chrono::{Datelike, Local};
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use pantau_core::cache::CacheStore;
use pantau_core::remote::RemoteTransport;
use pantau_core::stats;
use pantau_core::sync::{DashboardSession, SyncSource};

pub(crate) fn cmd_dashboard(
    remote: &dyn RemoteTransport,
    cache: &CacheStore,
    json: bool,
) -> Result<()> {
    let mut session = DashboardSession::new(remote, cache);
    session.load();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "source": session.source(),
                "data": session.data(),
            }))?
        );
        return Ok(());
    }

    if session.data().is_empty() {
        eprintln!("No data yet. Log weight, blood pressure, or prayers first.");
        process::exit(2);
    }
    if session.source() == SyncSource::LocalFallback {
        eprintln!("(server unreachable, showing locally cached data)");
    }

    let data = session.data();
    let today = Local::now().date_naive();

    if let Some(summary) = stats::weight_summary(&data.weight) {
        let change = summary.change_kg.map_or(String::new(), |diff| {
            if diff > 0.0 {
                format!("  (+{diff:.1} kg)")
            } else if diff < 0.0 {
                format!("  ({diff:.1} kg)")
            } else {
                "  (no change)".to_string()
            }
        });
        println!("Weight:          {:.1} kg{change}", summary.latest_kg);
    }
    if let Some(summary) = stats::pressure_summary(&data.pressure) {
        println!(
            "Blood pressure:  {}/{} mmHg  ({})",
            summary.systolic,
            summary.diastolic,
            summary.status.label()
        );
    }
    if let Some(percent) =
        stats::monthly_prayer_percentage(&data.prayer, today.year(), today.month())
    {
        println!("Prayers:         {percent}% completed this month");
    }
    println!();

    #[derive(Tabled)]
    struct RecentRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Weight (kg)")]
        weight: String,
        #[tabled(rename = "Pressure")]
        pressure: String,
        #[tabled(rename = "Prayers")]
        prayers: String,
    }

    let rows: Vec<RecentRow> = stats::recent_overview(data, today, 7)
        .into_iter()
        .map(|day| RecentRow {
            date: day.date.format("%Y-%m-%d").to_string(),
            weight: day
                .weight_avg_kg
                .map_or("-".to_string(), |kg| format!("{kg:.1}")),
            pressure: day
                .pressure
                .map_or("-".to_string(), |(sys, dia)| format!("{sys}/{dia}")),
            prayers: day
                .prayers_total
                .map_or("-".to_string(), |total| format!("{total}/7")),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    print_monthly_averages(data);

    Ok(())
}

fn print_monthly_averages(data: &pantau_core::sync::DashboardData) {
    let weight = stats::monthly_weight_averages(&data.weight);
    let systolic = stats::monthly_systolic_averages(&data.pressure);
    if weight.is_empty() && systolic.is_empty() {
        return;
    }

    let mut months: BTreeMap<String, (Option<f64>, Option<f64>)> = BTreeMap::new();
    for (month, avg) in weight {
        months.entry(month).or_default().0 = Some(avg);
    }
    for (month, avg) in systolic {
        months.entry(month).or_default().1 = Some(avg);
    }

    #[derive(Tabled)]
    struct MonthRow {
        #[tabled(rename = "Month")]
        month: String,
        #[tabled(rename = "Avg weight (kg)")]
        weight: String,
        #[tabled(rename = "Avg systolic")]
        systolic: String,
    }

    let rows: Vec<MonthRow> = months
        .into_iter()
        .map(|(month, (weight, systolic))| MonthRow {
            month,
            weight: weight.map_or("-".to_string(), |v| format!("{v:.1}")),
            systolic: systolic.map_or("-".to_string(), |v| format!("{v:.0}")),
        })
        .collect();

    println!();
    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}
