use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use std::process;

use pantau_core::models::{PRAYER_NAMES, ValidationError};
use pantau_core::notify::{Notice, Notify};
use pantau_core::stats::Period;

/// Prints notices the way a terminal user expects them: successes and
/// informational notes to stdout, warnings and errors to stderr.
pub(crate) struct ConsoleNotifier;

impl Notify for ConsoleNotifier {
    fn notify(&self, notice: Notice, message: &str) {
        match notice {
            Notice::Success => println!("✓ {message}"),
            Notice::Info => println!("{message}"),
            Notice::Warning => eprintln!("warning: {message}"),
            Notice::Error => eprintln!("error: {message}"),
        }
    }
}

/// Surface a validation failure as a warning and stop before anything is
/// written, locally or remotely.
pub(crate) fn require_valid(notifier: &dyn Notify, result: Result<(), ValidationError>) {
    if let Err(err) = result {
        notifier.notify(Notice::Warning, &err.to_string());
        process::exit(2);
    }
}

pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    match date_str {
        None => Ok(Local::now().date_naive()),
        Some(s) => match s.as_str() {
            "today" => Ok(Local::now().date_naive()),
            "yesterday" => Ok(Local::now().date_naive() - chrono::Duration::days(1)),
            _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday")),
        },
    }
}

/// Parse a blood-pressure reading written as `systolic/diastolic`.
pub(crate) fn parse_reading(s: &str) -> Result<(i32, i32)> {
    let parts: Vec<&str> = s.trim().splitn(2, '/').collect();
    if parts.len() != 2 {
        bail!("Invalid reading '{s}'. Use systolic/diastolic, e.g. 120/80");
    }
    let systolic: i32 = parts[0]
        .trim()
        .parse()
        .with_context(|| format!("Invalid systolic value in '{s}'"))?;
    let diastolic: i32 = parts[1]
        .trim()
        .parse()
        .with_context(|| format!("Invalid diastolic value in '{s}'"))?;
    Ok((systolic, diastolic))
}

pub(crate) fn parse_period(s: &str) -> Result<Period> {
    match s {
        "day" => Ok(Period::Day),
        "week" => Ok(Period::Week),
        "month" => Ok(Period::Month),
        "year" => Ok(Period::Year),
        _ => bail!("Invalid period '{s}'. Use day, week, month, or year"),
    }
}

/// Parse a comma-separated list of completed prayers into checklist flags.
/// An empty string means nothing was completed.
pub(crate) fn parse_prayer_flags(s: &str) -> Result<[bool; 7]> {
    let mut flags = [false; 7];
    for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let lower = name.to_lowercase();
        match PRAYER_NAMES.iter().position(|p| *p == lower) {
            Some(index) => flags[index] = true,
            None => bail!(
                "Unknown prayer '{name}'. Use any of: {}",
                PRAYER_NAMES.join(", ")
            ),
        }
    }
    Ok(flags)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_none_is_today() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date(None).unwrap(), today);
    }

    #[test]
    fn test_parse_date_keywords() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date(Some("today".to_string())).unwrap(), today);
        assert_eq!(
            parse_date(Some("yesterday".to_string())).unwrap(),
            today - chrono::Duration::days(1)
        );
    }

    #[test]
    fn test_parse_date_iso() {
        let date = parse_date(Some("2024-01-15".to_string())).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(parse_date(Some("nope".to_string())).is_err());
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(parse_period("week").unwrap(), Period::Week);
        assert_eq!(parse_period("year").unwrap(), Period::Year);
        assert!(parse_period("fortnight").is_err());
    }

    #[test]
    fn test_parse_reading() {
        assert_eq!(parse_reading("120/80").unwrap(), (120, 80));
        assert_eq!(parse_reading(" 118 / 78 ").unwrap(), (118, 78));
    }

    #[test]
    fn test_parse_reading_invalid() {
        assert!(parse_reading("120").is_err());
        assert!(parse_reading("120-80").is_err());
        assert!(parse_reading("abc/80").is_err());
    }

    #[test]
    fn test_parse_prayer_flags() {
        let flags = parse_prayer_flags("subuh, dzuhur,maghrib").unwrap();
        assert_eq!(flags, [true, true, false, true, false, false, false]);
    }

    #[test]
    fn test_parse_prayer_flags_empty() {
        assert_eq!(parse_prayer_flags("").unwrap(), [false; 7]);
    }

    #[test]
    fn test_parse_prayer_flags_case_insensitive() {
        let flags = parse_prayer_flags("Subuh,TAHAJUD").unwrap();
        assert_eq!(flags, [true, false, false, false, false, false, true]);
    }

    #[test]
    fn test_parse_prayer_flags_unknown_name() {
        assert!(parse_prayer_flags("subuh,brunch").is_err());
    }
}
