use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::keys;
use crate::remote::Action;
use crate::sync::TrackedRecord;

/// A record (or profile) failed input validation. Nothing is written,
/// locally or remotely, when this is returned.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    fn new(message: impl Into<String>) -> Self {
        ValidationError(message.into())
    }
}

// --- Daily weight ---

/// Morning and evening body weight for one calendar date.
///
/// Wire names match the backend's sheet columns; the `alias` spellings are
/// what the combined dashboard payload uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    #[serde(rename = "tanggal")]
    pub date: NaiveDate,
    #[serde(rename = "beratPagi", alias = "pagi")]
    pub morning_kg: f64,
    #[serde(rename = "beratMalam", alias = "malam")]
    pub evening_kg: f64,
}

impl WeightRecord {
    #[must_use]
    pub fn average_kg(&self) -> f64 {
        (self.morning_kg + self.evening_kg) / 2.0
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.morning_kg.is_finite() || self.morning_kg <= 0.0 {
            return Err(ValidationError::new("Morning weight must be greater than 0"));
        }
        if !self.evening_kg.is_finite() || self.evening_kg <= 0.0 {
            return Err(ValidationError::new("Evening weight must be greater than 0"));
        }
        Ok(())
    }
}

impl TrackedRecord for WeightRecord {
    const FETCH_ACTION: Action = Action::WeightHistory;
    const SAVE_ACTION: Action = Action::SaveWeight;
    const CACHE_KEY: &'static str = keys::WEIGHT_HISTORY;
    const LABEL: &'static str = "weight";

    fn date(&self) -> NaiveDate {
        self.date
    }
}

// --- Blood pressure ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PressureStatus {
    Normal,
    High,
    Low,
}

impl PressureStatus {
    /// Classify an averaged reading. High wins when both bounds are crossed.
    #[must_use]
    pub fn classify(systolic: i32, diastolic: i32) -> Self {
        if systolic > 120 || diastolic > 80 {
            PressureStatus::High
        } else if systolic < 90 || diastolic < 60 {
            PressureStatus::Low
        } else {
            PressureStatus::Normal
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PressureStatus::Normal => "normal",
            PressureStatus::High => "high",
            PressureStatus::Low => "low",
        }
    }
}

/// Morning and evening blood-pressure readings for one calendar date, plus
/// the medication flag and meal notes logged alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressureRecord {
    #[serde(rename = "tanggal")]
    pub date: NaiveDate,
    #[serde(rename = "sistolikPagi", alias = "sistolik_pagi")]
    pub systolic_morning: i32,
    #[serde(rename = "diastolikPagi", alias = "diastolik_pagi")]
    pub diastolic_morning: i32,
    #[serde(rename = "sistolikMalam", alias = "sistolik_malam")]
    pub systolic_evening: i32,
    #[serde(rename = "diastolikMalam", alias = "diastolik_malam")]
    pub diastolic_evening: i32,
    #[serde(rename = "sudahMinumObat", default)]
    pub medication_taken: bool,
    #[serde(rename = "makananPagi", default)]
    pub meal_morning: String,
    #[serde(rename = "makananSiang", default)]
    pub meal_afternoon: String,
    #[serde(rename = "makananMalam", default)]
    pub meal_evening: String,
}

impl BloodPressureRecord {
    #[must_use]
    pub fn average_systolic(&self) -> i32 {
        (self.systolic_morning + self.systolic_evening + 1) / 2
    }

    #[must_use]
    pub fn average_diastolic(&self) -> i32 {
        (self.diastolic_morning + self.diastolic_evening + 1) / 2
    }

    #[must_use]
    pub fn status(&self) -> PressureStatus {
        PressureStatus::classify(self.average_systolic(), self.average_diastolic())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let readings = [
            ("Morning systolic", self.systolic_morning),
            ("Morning diastolic", self.diastolic_morning),
            ("Evening systolic", self.systolic_evening),
            ("Evening diastolic", self.diastolic_evening),
        ];
        for (name, value) in readings {
            if value <= 0 {
                return Err(ValidationError::new(format!(
                    "{name} reading must be greater than 0"
                )));
            }
        }
        Ok(())
    }
}

impl TrackedRecord for BloodPressureRecord {
    const FETCH_ACTION: Action = Action::PressureHistory;
    const SAVE_ACTION: Action = Action::SavePressure;
    const CACHE_KEY: &'static str = keys::PRESSURE_HISTORY;
    const LABEL: &'static str = "blood pressure";

    fn date(&self) -> NaiveDate {
        self.date
    }
}

// --- Prayer checklist ---

/// Checklist order: the five obligatory prayers first, then dhuha and tahajud.
pub const PRAYER_NAMES: [&str; 7] = [
    "subuh", "dzuhur", "ashar", "maghrib", "isya", "dhuha", "tahajud",
];

/// One day's prayer checklist. `total` is derived from the seven flags and
/// recounted whenever a record crosses a serialization boundary, so a stale
/// count can never survive a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerRecord {
    #[serde(rename = "tanggal")]
    pub date: NaiveDate,
    #[serde(default)]
    pub subuh: bool,
    #[serde(default)]
    pub dzuhur: bool,
    #[serde(default)]
    pub ashar: bool,
    #[serde(default)]
    pub maghrib: bool,
    #[serde(default)]
    pub isya: bool,
    #[serde(default)]
    pub dhuha: bool,
    #[serde(default)]
    pub tahajud: bool,
    #[serde(default)]
    pub total: u8,
}

impl PrayerRecord {
    #[must_use]
    pub fn new(date: NaiveDate, flags: [bool; 7]) -> Self {
        let mut record = PrayerRecord {
            date,
            subuh: flags[0],
            dzuhur: flags[1],
            ashar: flags[2],
            maghrib: flags[3],
            isya: flags[4],
            dhuha: flags[5],
            tahajud: flags[6],
            total: 0,
        };
        record.recount();
        record
    }

    #[must_use]
    pub fn flags(&self) -> [bool; 7] {
        [
            self.subuh,
            self.dzuhur,
            self.ashar,
            self.maghrib,
            self.isya,
            self.dhuha,
            self.tahajud,
        ]
    }

    #[must_use]
    pub fn completed_count(&self) -> u8 {
        self.flags().iter().filter(|done| **done).count() as u8
    }

    /// Count of the five obligatory prayers completed.
    #[must_use]
    pub fn obligatory_count(&self) -> u8 {
        self.flags()[..5].iter().filter(|done| **done).count() as u8
    }

    pub fn recount(&mut self) {
        self.total = self.completed_count();
    }
}

impl TrackedRecord for PrayerRecord {
    const FETCH_ACTION: Action = Action::PrayerHistory;
    const SAVE_ACTION: Action = Action::SavePrayer;
    const CACHE_KEY: &'static str = keys::PRAYER_HISTORY;
    const LABEL: &'static str = "prayer";

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn normalize(&mut self) {
        self.recount();
    }
}

// --- Biodata profile (weight domain) ---

/// Singleton profile for the weight domain. Edited in place; no history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biodata {
    #[serde(rename = "namaLengkap")]
    pub full_name: String,
    #[serde(rename = "umur")]
    pub age: u32,
    #[serde(rename = "tempatLahir")]
    pub birthplace: String,
    #[serde(rename = "tanggalLahir")]
    pub birth_date: NaiveDate,
    #[serde(rename = "hobi", default)]
    pub hobby: String,
    #[serde(rename = "pekerjaan")]
    pub occupation: String,
    #[serde(rename = "tinggiBadan")]
    pub height_cm: f64,
    #[serde(rename = "beratBadanAwal")]
    pub initial_weight_kg: f64,
}

impl Biodata {
    #[must_use]
    pub fn ideal_weight(&self) -> WeightBand {
        ideal_weight_band(self.height_cm)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::new("Full name must not be empty"));
        }
        if self.age == 0 {
            return Err(ValidationError::new("Age must be greater than 0"));
        }
        if self.birthplace.trim().is_empty() {
            return Err(ValidationError::new("Birthplace must not be empty"));
        }
        if self.occupation.trim().is_empty() {
            return Err(ValidationError::new("Occupation must not be empty"));
        }
        if !self.height_cm.is_finite() || self.height_cm <= 0.0 {
            return Err(ValidationError::new("Height must be greater than 0"));
        }
        if !self.initial_weight_kg.is_finite() || self.initial_weight_kg <= 0.0 {
            return Err(ValidationError::new("Initial weight must be greater than 0"));
        }
        Ok(())
    }
}

/// Ideal-weight band derived from height via fixed BMI thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightBand {
    pub ideal_kg: f64,
    pub low_kg: f64,
    pub high_kg: f64,
}

/// BMI 22 is taken as ideal; 18.5 and 24.9 bound the normal range.
/// All three are rounded to one decimal.
#[must_use]
pub fn ideal_weight_band(height_cm: f64) -> WeightBand {
    let height_m = height_cm / 100.0;
    let squared = height_m * height_m;
    WeightBand {
        ideal_kg: round_to_tenth(squared * 22.0),
        low_kg: round_to_tenth(squared * 18.5),
        high_kg: round_to_tenth(squared * 24.9),
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_weight_average() {
        let record = WeightRecord {
            date: date("2024-01-05"),
            morning_kg: 75.2,
            evening_kg: 75.8,
        };
        assert!((record.average_kg() - 75.5).abs() < 1e-9);
    }

    #[test]
    fn test_weight_validation() {
        let mut record = WeightRecord {
            date: date("2024-01-05"),
            morning_kg: 75.2,
            evening_kg: 75.8,
        };
        assert!(record.validate().is_ok());

        record.morning_kg = 0.0;
        assert!(record.validate().is_err());

        record.morning_kg = 75.2;
        record.evening_kg = -1.0;
        assert!(record.validate().is_err());

        record.evening_kg = f64::NAN;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_weight_wire_names() {
        let record = WeightRecord {
            date: date("2024-01-05"),
            morning_kg: 75.2,
            evening_kg: 75.8,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["tanggal"], "2024-01-05");
        assert_eq!(value["beratPagi"], 75.2);
        assert_eq!(value["beratMalam"], 75.8);
    }

    #[test]
    fn test_weight_dashboard_aliases() {
        let record: WeightRecord =
            serde_json::from_str(r#"{"tanggal":"2024-01-05","pagi":75.2,"malam":75.8}"#).unwrap();
        assert!((record.morning_kg - 75.2).abs() < 1e-9);
        assert!((record.evening_kg - 75.8).abs() < 1e-9);
    }

    #[test]
    fn test_pressure_averages_round_half_up() {
        let record = BloodPressureRecord {
            date: date("2024-01-05"),
            systolic_morning: 120,
            diastolic_morning: 80,
            systolic_evening: 119,
            diastolic_evening: 78,
            medication_taken: false,
            meal_morning: String::new(),
            meal_afternoon: String::new(),
            meal_evening: String::new(),
        };
        // (120 + 119) / 2 = 119.5 rounds to 120
        assert_eq!(record.average_systolic(), 120);
        assert_eq!(record.average_diastolic(), 79);
    }

    #[test]
    fn test_pressure_classification() {
        assert_eq!(PressureStatus::classify(120, 80), PressureStatus::Normal);
        assert_eq!(PressureStatus::classify(121, 80), PressureStatus::High);
        assert_eq!(PressureStatus::classify(110, 81), PressureStatus::High);
        assert_eq!(PressureStatus::classify(89, 70), PressureStatus::Low);
        assert_eq!(PressureStatus::classify(100, 59), PressureStatus::Low);
        // High is checked first: a wide reading counts as high
        assert_eq!(PressureStatus::classify(130, 55), PressureStatus::High);
    }

    #[test]
    fn test_pressure_wire_names_and_aliases() {
        let record = BloodPressureRecord {
            date: date("2024-01-05"),
            systolic_morning: 120,
            diastolic_morning: 80,
            systolic_evening: 118,
            diastolic_evening: 78,
            medication_taken: true,
            meal_morning: "bubur".to_string(),
            meal_afternoon: String::new(),
            meal_evening: String::new(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["sistolikPagi"], 120);
        assert_eq!(value["sudahMinumObat"], true);
        assert_eq!(value["makananPagi"], "bubur");

        let parsed: BloodPressureRecord = serde_json::from_str(
            r#"{"tanggal":"2024-01-05","sistolik_pagi":120,"diastolik_pagi":80,
                "sistolik_malam":118,"diastolik_malam":78}"#,
        )
        .unwrap();
        assert_eq!(parsed.systolic_evening, 118);
        assert!(!parsed.medication_taken);
        assert!(parsed.meal_morning.is_empty());
    }

    #[test]
    fn test_prayer_total_counts_true_flags() {
        let record = PrayerRecord::new(
            date("2024-01-05"),
            [true, true, false, true, false, false, false],
        );
        assert_eq!(record.total, 3);
        assert_eq!(record.completed_count(), 3);
        assert_eq!(record.obligatory_count(), 3);
    }

    #[test]
    fn test_prayer_obligatory_excludes_extras() {
        let record = PrayerRecord::new(
            date("2024-01-05"),
            [true, true, true, true, true, true, true],
        );
        assert_eq!(record.total, 7);
        assert_eq!(record.obligatory_count(), 5);
    }

    #[test]
    fn test_prayer_recount_fixes_stale_total() {
        let mut record: PrayerRecord = serde_json::from_str(
            r#"{"tanggal":"2024-01-05","subuh":true,"dzuhur":true,"total":7}"#,
        )
        .unwrap();
        assert_eq!(record.total, 7);
        record.recount();
        assert_eq!(record.total, 2);
    }

    #[test]
    fn test_biodata_wire_names() {
        let biodata = Biodata {
            full_name: "Budi Santoso".to_string(),
            age: 54,
            birthplace: "Bandung".to_string(),
            birth_date: date("1970-03-12"),
            hobby: "berkebun".to_string(),
            occupation: "guru".to_string(),
            height_cm: 170.0,
            initial_weight_kg: 78.0,
        };
        let value = serde_json::to_value(&biodata).unwrap();
        assert_eq!(value["namaLengkap"], "Budi Santoso");
        assert_eq!(value["umur"], 54);
        assert_eq!(value["tinggiBadan"], 170.0);
        assert_eq!(value["beratBadanAwal"], 78.0);
    }

    #[test]
    fn test_biodata_validation() {
        let valid = Biodata {
            full_name: "Budi Santoso".to_string(),
            age: 54,
            birthplace: "Bandung".to_string(),
            birth_date: date("1970-03-12"),
            hobby: String::new(),
            occupation: "guru".to_string(),
            height_cm: 170.0,
            initial_weight_kg: 78.0,
        };
        assert!(valid.validate().is_ok());

        let mut invalid = valid.clone();
        invalid.full_name = "   ".to_string();
        assert!(invalid.validate().is_err());

        let mut invalid = valid.clone();
        invalid.age = 0;
        assert!(invalid.validate().is_err());

        let mut invalid = valid.clone();
        invalid.height_cm = 0.0;
        assert!(invalid.validate().is_err());

        let mut invalid = valid;
        invalid.initial_weight_kg = -5.0;
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_ideal_weight_band_170cm() {
        let band = ideal_weight_band(170.0);
        assert!((band.ideal_kg - 63.6).abs() < 0.1);
        assert!((band.low_kg - 53.5).abs() < 0.1);
        assert!((band.high_kg - 72.0).abs() < 0.1);
    }

    #[test]
    fn test_ideal_weight_band_rounds_to_one_decimal() {
        let band = ideal_weight_band(163.0);
        // 1.63^2 * 22 = 58.4518
        assert!((band.ideal_kg - 58.5).abs() < 1e-9);
    }
}
