use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::cache::{CacheStore, keys};
use crate::models::Biodata;
use crate::notify::{Notice, Notify};
use crate::remote::{Action, RemoteError, RemoteTransport};

/// Domain tag the backend uses to select the biodata sheet.
const BIODATA_TYPE: &str = "beratBadan";

/// Where the session's current view of its data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncSource {
    /// The last read (or save) went through to the backend.
    Remote,
    /// The backend was unreachable; the view is served from the local cache.
    LocalFallback,
    /// Neither the backend nor the cache had anything.
    Empty,
}

/// How a save was committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written to the backend and mirrored to the local cache.
    Synced,
    /// The backend was unreachable; written to the local cache only.
    SavedOffline,
}

/// A date-keyed record kind the sync layer can manage.
///
/// `normalize` runs after every deserialization and before every save so
/// derived fields can never go stale across a boundary.
pub trait TrackedRecord: Serialize + DeserializeOwned + Clone {
    const FETCH_ACTION: Action;
    const SAVE_ACTION: Action;
    const CACHE_KEY: &'static str;
    const LABEL: &'static str;

    fn date(&self) -> NaiveDate;

    fn normalize(&mut self) {}
}

fn sort_newest_first<R: TrackedRecord>(records: &mut [R]) {
    records.sort_by(|a, b| b.date().cmp(&a.date()));
}

fn read_cached<T: DeserializeOwned>(cache: &CacheStore, key: &str) -> Option<T> {
    match cache.read(key) {
        Ok(value) => value,
        Err(err) => {
            warn!(key, error = %err, "unreadable cache entry, ignoring");
            None
        }
    }
}

/// One page-session's view of a record kind's history.
///
/// Constructed per command invocation, loaded once, then saved through.
/// The invariants it maintains:
/// - at most one record per date (saves upsert by date)
/// - the list is ordered newest first, whatever order the backend returns
/// - a user-entered record is never dropped: a failed remote save still
///   commits to the in-memory list and the local cache, and that local
///   commit is never rolled back
pub struct HistorySession<'a, R: TrackedRecord> {
    remote: &'a dyn RemoteTransport,
    cache: &'a CacheStore,
    notifier: &'a dyn Notify,
    history: Vec<R>,
    source: SyncSource,
}

impl<'a, R: TrackedRecord> HistorySession<'a, R> {
    pub fn new(
        remote: &'a dyn RemoteTransport,
        cache: &'a CacheStore,
        notifier: &'a dyn Notify,
    ) -> Self {
        HistorySession {
            remote,
            cache,
            notifier,
            history: Vec::new(),
            source: SyncSource::Empty,
        }
    }

    /// Fetch history from the backend, falling back to the local cache.
    ///
    /// Read failures of any kind degrade silently; the worst outcome is an
    /// empty view.
    pub fn load(&mut self) {
        match self.fetch_remote() {
            Ok(mut records) => {
                for record in &mut records {
                    record.normalize();
                }
                sort_newest_first(&mut records);
                self.history = records;
                self.source = SyncSource::Remote;
            }
            Err(err) => {
                warn!(kind = R::LABEL, error = %err, "remote read failed, falling back to cache");
                self.load_from_cache();
            }
        }
    }

    fn fetch_remote(&self) -> Result<Vec<R>, RemoteError> {
        let envelope = self.remote.invoke(R::FETCH_ACTION, json!({}))?;
        if envelope.data.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(envelope.data).map_err(|e| RemoteError::Parse(e.to_string()))
    }

    fn load_from_cache(&mut self) {
        match read_cached::<Vec<R>>(self.cache, R::CACHE_KEY) {
            Some(mut records) if !records.is_empty() => {
                for record in &mut records {
                    record.normalize();
                }
                sort_newest_first(&mut records);
                self.history = records;
                self.source = SyncSource::LocalFallback;
            }
            _ => {
                self.history = Vec::new();
                self.source = SyncSource::Empty;
            }
        }
    }

    /// Commit a record: backend first, then the local stores either way.
    ///
    /// Callers validate before calling; by this point the record will be
    /// written somewhere. Only a local cache failure is an error.
    pub fn save(&mut self, mut record: R) -> Result<SaveOutcome> {
        record.normalize();
        let payload = serde_json::to_value(&record)
            .with_context(|| format!("Failed to serialize {} record", R::LABEL))?;

        let outcome = match self.remote.invoke(R::SAVE_ACTION, payload) {
            Ok(_) => SaveOutcome::Synced,
            Err(err) => {
                warn!(kind = R::LABEL, error = %err, "remote save failed, committing locally only");
                SaveOutcome::SavedOffline
            }
        };

        self.upsert(record);
        self.cache
            .write(R::CACHE_KEY, &self.history)
            .with_context(|| format!("Failed to persist {} history locally", R::LABEL))?;

        if self.source == SyncSource::Empty {
            self.source = match outcome {
                SaveOutcome::Synced => SyncSource::Remote,
                SaveOutcome::SavedOffline => SyncSource::LocalFallback,
            };
        }

        match outcome {
            SaveOutcome::Synced => self
                .notifier
                .notify(Notice::Success, &format!("{} record saved", R::LABEL)),
            SaveOutcome::SavedOffline => self.notifier.notify(
                Notice::Info,
                &format!("{} record saved offline (server unreachable)", R::LABEL),
            ),
        }

        Ok(outcome)
    }

    /// Replace the record sharing this date, or insert at its
    /// descending-date position.
    fn upsert(&mut self, record: R) {
        if let Some(existing) = self
            .history
            .iter_mut()
            .find(|r| r.date() == record.date())
        {
            *existing = record;
            return;
        }
        let position = self
            .history
            .iter()
            .position(|r| r.date() < record.date())
            .unwrap_or(self.history.len());
        self.history.insert(position, record);
    }

    /// Newest first.
    #[must_use]
    pub fn history(&self) -> &[R] {
        &self.history
    }

    #[must_use]
    pub fn source(&self) -> SyncSource {
        self.source
    }

    #[must_use]
    pub fn latest(&self) -> Option<&R> {
        self.history.first()
    }

    #[must_use]
    pub fn find(&self, date: NaiveDate) -> Option<&R> {
        self.history.iter().find(|r| r.date() == date)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

/// The weight domain's biodata profile: a singleton with the same
/// load-with-fallback and never-roll-back save policy as a history.
pub struct ProfileSession<'a> {
    remote: &'a dyn RemoteTransport,
    cache: &'a CacheStore,
    notifier: &'a dyn Notify,
    profile: Option<Biodata>,
    source: SyncSource,
}

impl<'a> ProfileSession<'a> {
    pub fn new(
        remote: &'a dyn RemoteTransport,
        cache: &'a CacheStore,
        notifier: &'a dyn Notify,
    ) -> Self {
        ProfileSession {
            remote,
            cache,
            notifier,
            profile: None,
            source: SyncSource::Empty,
        }
    }

    /// A successful response with null data means "no profile yet" and is
    /// not a fallback case: the backend answered, there is nothing stored.
    pub fn load(&mut self) {
        match self.fetch_remote() {
            Ok(profile) => {
                self.source = SyncSource::Remote;
                self.profile = profile;
            }
            Err(err) => {
                warn!(error = %err, "biodata read failed, falling back to cache");
                self.profile = read_cached(self.cache, keys::WEIGHT_BIODATA);
                self.source = if self.profile.is_some() {
                    SyncSource::LocalFallback
                } else {
                    SyncSource::Empty
                };
            }
        }
    }

    fn fetch_remote(&self) -> Result<Option<Biodata>, RemoteError> {
        let envelope = self
            .remote
            .invoke(Action::GetBiodata, json!({ "type": BIODATA_TYPE }))?;
        if envelope.data.is_null() {
            return Ok(None);
        }
        serde_json::from_value(envelope.data)
            .map(Some)
            .map_err(|e| RemoteError::Parse(e.to_string()))
    }

    /// Create or overwrite the profile. Same commit policy as history
    /// saves: the local copy is written whether or not the backend was
    /// reachable.
    pub fn save(&mut self, profile: Biodata) -> Result<SaveOutcome> {
        let payload = json!({ "type": BIODATA_TYPE, "data": &profile });

        let outcome = match self.remote.invoke(Action::SaveBiodata, payload) {
            Ok(_) => SaveOutcome::Synced,
            Err(err) => {
                warn!(error = %err, "remote biodata save failed, committing locally only");
                SaveOutcome::SavedOffline
            }
        };

        self.cache
            .write(keys::WEIGHT_BIODATA, &profile)
            .context("Failed to persist biodata locally")?;
        self.profile = Some(profile);
        self.source = match outcome {
            SaveOutcome::Synced => SyncSource::Remote,
            SaveOutcome::SavedOffline => SyncSource::LocalFallback,
        };

        match outcome {
            SaveOutcome::Synced => self.notifier.notify(Notice::Success, "biodata saved"),
            SaveOutcome::SavedOffline => self
                .notifier
                .notify(Notice::Info, "biodata saved offline (server unreachable)"),
        }

        Ok(outcome)
    }

    #[must_use]
    pub fn profile(&self) -> Option<&Biodata> {
        self.profile.as_ref()
    }

    #[must_use]
    pub fn source(&self) -> SyncSource {
        self.source
    }
}

/// The combined payload behind the dashboard view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(rename = "beratBadan", default)]
    pub weight: Vec<crate::models::WeightRecord>,
    #[serde(rename = "tekananDarah", default)]
    pub pressure: Vec<crate::models::BloodPressureRecord>,
    #[serde(rename = "sholat", default)]
    pub prayer: Vec<crate::models::PrayerRecord>,
}

impl DashboardData {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weight.is_empty() && self.pressure.is_empty() && self.prayer.is_empty()
    }

    fn normalize(&mut self) {
        for record in &mut self.prayer {
            record.recount();
        }
        sort_newest_first(&mut self.weight);
        sort_newest_first(&mut self.pressure);
        sort_newest_first(&mut self.prayer);
    }
}

/// Read-only session over all three record kinds at once.
///
/// The backend serves the three collections in one call; when that fails
/// the session assembles the same view from the per-kind cache entries.
pub struct DashboardSession<'a> {
    remote: &'a dyn RemoteTransport,
    cache: &'a CacheStore,
    data: DashboardData,
    source: SyncSource,
}

impl<'a> DashboardSession<'a> {
    pub fn new(remote: &'a dyn RemoteTransport, cache: &'a CacheStore) -> Self {
        DashboardSession {
            remote,
            cache,
            data: DashboardData::default(),
            source: SyncSource::Empty,
        }
    }

    pub fn load(&mut self) {
        match self.fetch_remote() {
            Ok(mut data) => {
                data.normalize();
                self.data = data;
                self.source = SyncSource::Remote;
            }
            Err(err) => {
                warn!(error = %err, "dashboard read failed, falling back to cache");
                let mut data = DashboardData {
                    weight: read_cached(self.cache, keys::WEIGHT_HISTORY).unwrap_or_default(),
                    pressure: read_cached(self.cache, keys::PRESSURE_HISTORY).unwrap_or_default(),
                    prayer: read_cached(self.cache, keys::PRAYER_HISTORY).unwrap_or_default(),
                };
                data.normalize();
                self.source = if data.is_empty() {
                    SyncSource::Empty
                } else {
                    SyncSource::LocalFallback
                };
                self.data = data;
            }
        }
    }

    fn fetch_remote(&self) -> Result<DashboardData, RemoteError> {
        let envelope = self.remote.invoke(Action::Dashboard, json!({}))?;
        if envelope.data.is_null() {
            return Ok(DashboardData::default());
        }
        serde_json::from_value(envelope.data).map_err(|e| RemoteError::Parse(e.to_string()))
    }

    #[must_use]
    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    #[must_use]
    pub fn source(&self) -> SyncSource {
        self.source
    }
}
