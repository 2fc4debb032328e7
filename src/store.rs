use crate::errors::AppError;
use crate::fields::FieldUpdate;
use crate::models::{DayRecord, MonthData};
use crate::stats::{DateRange, days_in_range};
use crate::storage::StorageBackend;
use crate::sync::apply_update;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Date-keyed record store over a pluggable backend.
///
/// Reads never persist. Writes run read-modify-write under one lock and are
/// rolled back in memory if the backend rejects them.
pub struct DayStore {
    backend: Arc<dyn StorageBackend>,
    data: Mutex<MonthData>,
}

impl DayStore {
    pub async fn open(backend: Arc<dyn StorageBackend>) -> Self {
        let data = backend.load().await;
        info!("loaded {} day records", data.days.len());
        Self {
            backend,
            data: Mutex::new(data),
        }
    }

    /// Stored record for `date`, or a fresh default that is not saved.
    pub async fn get(&self, date: NaiveDate) -> DayRecord {
        self.find(date)
            .await
            .unwrap_or_else(|| DayRecord::new(date))
    }

    pub async fn find(&self, date: NaiveDate) -> Option<DayRecord> {
        self.data.lock().await.days.get(&date).cloned()
    }

    /// Persists a default record for `date` unless one already exists.
    pub async fn ensure(&self, date: NaiveDate) -> Result<DayRecord, AppError> {
        let mut data = self.data.lock().await;
        if let Some(record) = data.days.get(&date) {
            return Ok(record.clone());
        }

        let record = DayRecord::new(date);
        data.days.insert(date, record.clone());
        if let Err(err) = self.backend.save(&data).await {
            data.days.remove(&date);
            return Err(err);
        }
        debug!(%date, "created day record");
        Ok(record)
    }

    /// Applies one field write plus its derived-field sync, then persists.
    pub async fn upsert(&self, date: NaiveDate, update: FieldUpdate) -> Result<DayRecord, AppError> {
        let mut data = self.data.lock().await;
        let field = update.field();
        let previous = data.days.get(&date).cloned();

        let mut record = previous.clone().unwrap_or_else(|| DayRecord::new(date));
        apply_update(&mut record, update);
        data.days.insert(date, record.clone());

        if let Err(err) = self.backend.save(&data).await {
            match previous {
                Some(previous) => data.days.insert(date, previous),
                None => data.days.remove(&date),
            };
            return Err(err);
        }
        debug!(%date, %field, "updated day record");
        Ok(record)
    }

    /// Every day in `range`, defaults substituted for days never touched.
    pub async fn range(&self, range: &DateRange) -> Vec<DayRecord> {
        days_in_range(&*self.data.lock().await, range)
    }

    pub async fn snapshot(&self) -> MonthData {
        self.data.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FlagField, ListField, TextField};
    use crate::models::Mood;
    use crate::stats::week_range;
    use crate::storage::MemoryBackend;
    use async_trait::async_trait;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    async fn store() -> (Arc<MemoryBackend>, DayStore) {
        let backend = Arc::new(MemoryBackend::default());
        let store = DayStore::open(backend.clone()).await;
        (backend, store)
    }

    struct FailingBackend;

    #[async_trait]
    impl StorageBackend for FailingBackend {
        async fn load(&self) -> MonthData {
            MonthData::default()
        }

        async fn save(&self, _data: &MonthData) -> Result<(), AppError> {
            Err(std::io::Error::other("disk full").into())
        }
    }

    #[tokio::test]
    async fn get_on_empty_store_is_default_and_not_saved() {
        let (backend, store) = store().await;
        for raw in ["2024-01-01", "2024-02-29", "2024-06-15"] {
            let record = store.get(date(raw)).await;
            assert_eq!(record, DayRecord::new(date(raw)));
        }
        assert!(store.find(date("2024-06-15")).await.is_none());
        assert!(backend.snapshot().await.days.is_empty());
    }

    #[tokio::test]
    async fn ensure_persists_once() {
        let (backend, store) = store().await;
        store
            .upsert(date("2024-06-15"), FieldUpdate::Flag(FlagField::HabitRead, true))
            .await
            .unwrap();
        let record = store.ensure(date("2024-06-15")).await.unwrap();
        assert!(record.habit_read);

        store.ensure(date("2024-06-16")).await.unwrap();
        assert_eq!(backend.snapshot().await.days.len(), 2);
    }

    #[tokio::test]
    async fn upsert_syncs_and_persists() {
        let (backend, store) = store().await;
        let day = date("2024-06-15");
        store.upsert(day, FieldUpdate::Mood(Some(Mood::Happy))).await.unwrap();
        let record = store
            .upsert(day, FieldUpdate::Text(TextField::LogTotalCalories, "1800".into()))
            .await
            .unwrap();
        assert_eq!(record.day_stats_mood, Some(Mood::Happy));
        assert_eq!(record.day_stats_total_calories, "1800");

        let saved = backend.snapshot().await;
        assert_eq!(saved.days[&day], record);
    }

    #[tokio::test]
    async fn reopening_restores_records() {
        let (backend, store) = store().await;
        let day = date("2024-06-15");
        store
            .upsert(day, FieldUpdate::List(ListField::StudyTopics, vec!["rust".into()]))
            .await
            .unwrap();
        drop(store);

        let reopened = DayStore::open(backend).await;
        assert_eq!(reopened.get(day).await.study_log_topics, vec!["rust"]);
    }

    #[tokio::test]
    async fn open_normalizes_seeded_records() {
        let day = date("2024-06-15");
        let mut stale = DayRecord::new(date("2024-06-10"));
        stale.habit_sleep = true;
        let mut seeded = MonthData::default();
        seeded.days.insert(day, stale);

        let store = DayStore::open(Arc::new(MemoryBackend::new(seeded))).await;
        let record = store.get(day).await;
        assert_eq!(record.creation_date, day);
        assert_eq!(record.day_of_week, "Saturday");
        assert!(record.habit_sleep);
    }

    #[tokio::test]
    async fn failed_save_rolls_back() {
        let store = DayStore::open(Arc::new(FailingBackend)).await;
        let day = date("2024-06-15");
        let result = store.upsert(day, FieldUpdate::Mood(Some(Mood::Sad))).await;
        assert!(result.is_err());
        assert!(store.find(day).await.is_none());
        assert!(store.ensure(day).await.is_err());
        assert!(store.snapshot().await.days.is_empty());
    }

    #[tokio::test]
    async fn range_fills_untouched_days() {
        let (_backend, store) = store().await;
        store
            .upsert(date("2024-06-12"), FieldUpdate::Flag(FlagField::HabitExercise, true))
            .await
            .unwrap();
        let week = store.range(&week_range(date("2024-06-12"))).await;
        assert_eq!(week.len(), 7);
        assert_eq!(week.iter().filter(|day| day.habit_exercise).count(), 1);
    }
}
