use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, error, info};

use crate::domain::models::setting::{Setting, SettingValue};
use crate::domain::ports::{Clock, SettingRepository};
use crate::error::AppError;

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

pub const BOOKINGS_ENABLED: &str = "bookings_enabled";
pub const CHALLENGE_ENABLED: &str = "challenge_enabled";
pub const GIFT_CARD_VALIDITY_DAYS: &str = "gift_card_validity_days";

struct CachedSetting {
    value: SettingValue,
    is_public: bool,
}

struct Snapshot {
    entries: HashMap<String, CachedSetting>,
    loaded_at: DateTime<Utc>,
}

impl Snapshot {
    fn empty(now: DateTime<Utc>) -> Self {
        Self { entries: HashMap::new(), loaded_at: now }
    }
}

/// Whole-table snapshot of the settings rows, reloaded once it is older than the TTL.
///
/// No lock is held while reloading. Callers racing past an expired snapshot
/// each reload, and the last one to finish is kept. A reload that overlaps an
/// `invalidate` still answers its caller but is not kept.
pub struct SettingsCache {
    repo: Arc<dyn SettingRepository>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    /// Bumped by every `invalidate`, under the snapshot write lock.
    generation: AtomicU64,
}

impl SettingsCache {
    pub fn new(repo: Arc<dyn SettingRepository>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::seconds(DEFAULT_TTL.as_secs() as i64));
        Self {
            repo,
            clock,
            ttl,
            snapshot: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    async fn current(&self) -> Arc<Snapshot> {
        let now = self.clock.now();
        let cached = self.snapshot.read().clone();

        if let Some(snapshot) = cached
            && now.signed_duration_since(snapshot.loaded_at) < self.ttl
        {
            return snapshot;
        }

        let generation = self.generation.load(Ordering::Acquire);

        match self.repo.list_all().await {
            Ok(rows) => {
                let entries = rows
                    .into_iter()
                    .map(|row| {
                        let value = row.decoded();
                        (row.key, CachedSetting { value, is_public: row.is_public })
                    })
                    .collect::<HashMap<_, _>>();

                let snapshot = Arc::new(Snapshot { entries, loaded_at: now });

                let mut slot = self.snapshot.write();
                if self.generation.load(Ordering::Acquire) == generation {
                    debug!("Settings cache reloaded with {} entries", snapshot.entries.len());
                    *slot = Some(snapshot.clone());
                } else {
                    debug!("Settings changed during reload, snapshot not kept");
                }
                snapshot
            }
            Err(e) => {
                error!("Failed to load settings, serving defaults: {:?}", e);
                Arc::new(Snapshot::empty(now))
            }
        }
    }

    pub async fn get(&self, key: &str, default: SettingValue) -> SettingValue {
        self.current()
            .await
            .entries
            .get(key)
            .map(|entry| entry.value.clone())
            .unwrap_or(default)
    }

    pub async fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key, SettingValue::Boolean(default)).await {
            SettingValue::Boolean(b) => b,
            _ => default,
        }
    }

    pub async fn get_number(&self, key: &str, default: f64) -> f64 {
        match self.get(key, SettingValue::Number(default)).await {
            SettingValue::Number(n) => n,
            _ => default,
        }
    }

    pub async fn get_all(&self) -> BTreeMap<String, SettingValue> {
        self.current()
            .await
            .entries
            .iter()
            .map(|(k, entry)| (k.clone(), entry.value.clone()))
            .collect()
    }

    pub async fn public(&self) -> BTreeMap<String, SettingValue> {
        self.current()
            .await
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_public)
            .map(|(k, entry)| (k.clone(), entry.value.clone()))
            .collect()
    }

    /// Persists the value with its type tag, then drops the snapshot.
    pub async fn set(&self, key: &str, value: SettingValue, is_public: bool) -> Result<Setting, AppError> {
        let setting = Setting::new(key.to_string(), &value, is_public, self.clock.now());
        let saved = self.repo.upsert(&setting).await?;
        self.invalidate();
        info!("Setting '{}' saved as {}", saved.key, saved.value_type);
        Ok(saved)
    }

    pub async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.repo.delete(key).await?;
        self.invalidate();
        info!("Setting '{}' removed", key);
        Ok(())
    }

    pub fn invalidate(&self) {
        let mut slot = self.snapshot.write();
        self.generation.fetch_add(1, Ordering::AcqRel);
        *slot = None;
    }
}
