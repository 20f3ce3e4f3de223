mod dashboard;
mod export;
mod helpers;
mod prayer;
mod pressure;
mod weight;

pub(crate) use dashboard::cmd_dashboard;
pub(crate) use export::{cmd_export_csv, cmd_export_pdf};
pub(crate) use helpers::ConsoleNotifier;
pub(crate) use prayer::{cmd_prayer_history, cmd_prayer_log};
pub(crate) use pressure::{cmd_pressure_history, cmd_pressure_log};
pub(crate) use weight::{cmd_biodata_set, cmd_biodata_show, cmd_weight_history, cmd_weight_log};
