//! Gamification counters, kept apart from the entity store.
//!
//! Stats live in a single JSON document:
//! ```text
//! .prospect-tracker/
//! └── gamification.json
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use prospect_core::{FollowUp, FollowUpOutcome, GamificationStats};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::clock::Clock;
use crate::error::{Result, TrackerError};

#[async_trait]
pub trait GamificationStore: Send + Sync {
    /// Stored stats, or defaults when nothing was saved yet.
    async fn load(&self) -> Result<GamificationStats>;

    async fn save(&self, stats: &GamificationStats) -> Result<()>;
}

/// Stats persisted as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileGamificationStore {
    path: PathBuf,
}

impl JsonFileGamificationStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl GamificationStore for JsonFileGamificationStore {
    async fn load(&self) -> Result<GamificationStats> {
        if !self.path.exists() {
            debug!("No gamification file at {}, starting fresh", self.path.display());
            return Ok(GamificationStats::default());
        }

        let content = fs::read_to_string(&self.path).await?;
        serde_json::from_str(&content).map_err(|e| {
            error!("Failed to parse gamification JSON: {}", e);
            TrackerError::Gamification(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, stats: &GamificationStats) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).await?;
            }
        }

        let content = serde_json::to_string_pretty(stats)
            .map_err(|e| TrackerError::Gamification(format!("Failed to serialize stats: {}", e)))?;
        fs::write(&self.path, content).await?;

        debug!("Saved gamification stats to {}", self.path.display());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryGamificationStore {
    stats: Mutex<GamificationStats>,
}

impl InMemoryGamificationStore {
    pub fn new(stats: GamificationStats) -> Self {
        Self {
            stats: Mutex::new(stats),
        }
    }
}

#[async_trait]
impl GamificationStore for InMemoryGamificationStore {
    async fn load(&self) -> Result<GamificationStats> {
        Ok(self.stats.lock().await.clone())
    }

    async fn save(&self, stats: &GamificationStats) -> Result<()> {
        *self.stats.lock().await = stats.clone();
        Ok(())
    }
}

/// Applies prospect-added and follow-up-resolved events to the stats.
/// Each load-modify-save runs under one mutex.
#[derive(Clone)]
pub struct GamificationTracker {
    store: Arc<dyn GamificationStore>,
    clock: Arc<dyn Clock>,
    write_lock: Arc<Mutex<()>>,
}

impl GamificationTracker {
    pub fn new(store: Arc<dyn GamificationStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::new(Arc::new(InMemoryGamificationStore::default()), clock)
    }

    pub async fn on_prospect_added(&self) -> Result<GamificationStats> {
        let _guard = self.write_lock.lock().await;
        let today = self.clock.today();

        let mut stats = self.store.load().await?;
        stats.record_prospect_added(today);
        self.store.save(&stats).await?;

        info!(
            daily_prospects_added = stats.daily_prospects_added,
            date = %today,
            "Prospect added"
        );
        Ok(stats)
    }

    /// Counts `after` once it has left Pending. Returns the outcome, or `None`
    /// when nothing was recorded.
    pub async fn on_follow_up_status_changed(
        &self,
        before: &FollowUp,
        after: &FollowUp,
    ) -> Result<Option<(FollowUpOutcome, GamificationStats)>> {
        if after.is_pending() || before.status == after.status {
            return Ok(None);
        }

        let _guard = self.write_lock.lock().await;
        let completed_on = self.clock.today();

        let mut stats = self.store.load().await?;
        let Some(outcome) = stats.record_follow_up_resolved(after.date, after.status, completed_on)
        else {
            return Ok(None);
        };
        self.store.save(&stats).await?;

        info!(
            follow_up_id = %after.id,
            outcome = ?outcome,
            streak = stats.follow_up_streak,
            "Follow-up resolved"
        );
        Ok(Some((outcome, stats)))
    }

    /// Current stats; the daily counter reads as zero once the day has rolled over.
    pub async fn stats(&self) -> Result<GamificationStats> {
        let stats = self.store.load().await?;
        Ok(stats.refreshed(self.clock.today()))
    }
}

impl std::fmt::Debug for GamificationTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GamificationTracker").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{NaiveDate, NaiveTime};
    use prospect_core::{CreateFollowUpRequest, FollowUpMethod, FollowUpStatus};
    use tempfile::TempDir;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scheduled_on(day: NaiveDate) -> FollowUp {
        FollowUp::new(CreateFollowUpRequest {
            prospect_id: Uuid::new_v4(),
            date: day,
            time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            method: FollowUpMethod::Email,
            notes: String::new(),
            ai_suggested_tone: None,
            ai_suggested_content: None,
            ai_suggested_tool: None,
        })
    }

    fn resolved(before: &FollowUp, status: FollowUpStatus) -> FollowUp {
        let mut after = before.clone();
        after.status = status;
        after
    }

    #[tokio::test]
    async fn test_daily_count_resets_on_new_day() {
        let clock = Arc::new(FixedClock::at_date(date(2024, 1, 1)));
        let store = Arc::new(InMemoryGamificationStore::new(GamificationStats {
            daily_prospects_added: 3,
            last_prospect_added_date: Some(date(2024, 1, 1)),
            ..Default::default()
        }));
        let tracker = GamificationTracker::new(store, clock.clone());

        clock.set_date(date(2024, 1, 2));
        let stats = tracker.on_prospect_added().await.unwrap();
        assert_eq!(stats.daily_prospects_added, 1);
        assert_eq!(stats.last_prospect_added_date, Some(date(2024, 1, 2)));

        let stats = tracker.on_prospect_added().await.unwrap();
        assert_eq!(stats.daily_prospects_added, 2);
    }

    #[tokio::test]
    async fn test_stats_read_zero_after_rollover() {
        let clock = Arc::new(FixedClock::at_date(date(2024, 1, 1)));
        let tracker = GamificationTracker::in_memory(clock.clone());
        tracker.on_prospect_added().await.unwrap();
        assert_eq!(tracker.stats().await.unwrap().daily_prospects_added, 1);

        clock.set_date(date(2024, 1, 2));
        assert_eq!(tracker.stats().await.unwrap().daily_prospects_added, 0);
    }

    #[tokio::test]
    async fn test_early_completion_extends_streak() {
        let clock = Arc::new(FixedClock::at_date(date(2024, 1, 9)));
        let tracker = GamificationTracker::in_memory(clock);

        let before = scheduled_on(date(2024, 1, 10));
        let (outcome, stats) = tracker
            .on_follow_up_status_changed(&before, &resolved(&before, FollowUpStatus::Completed))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outcome, FollowUpOutcome::OnTime);
        assert_eq!(stats.follow_up_streak, 1);
        assert_eq!(stats.total_on_time_follow_ups, 1);
    }

    #[tokio::test]
    async fn test_late_completion_breaks_streak() {
        let clock = Arc::new(FixedClock::at_date(date(2024, 1, 15)));
        let store = Arc::new(InMemoryGamificationStore::new(GamificationStats {
            follow_up_streak: 4,
            ..Default::default()
        }));
        let tracker = GamificationTracker::new(store, clock);

        let before = scheduled_on(date(2024, 1, 10));
        let (outcome, stats) = tracker
            .on_follow_up_status_changed(&before, &resolved(&before, FollowUpStatus::Completed))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outcome, FollowUpOutcome::Late);
        assert_eq!(stats.follow_up_streak, 0);
        assert_eq!(stats.total_missed_follow_ups, 1);
    }

    #[tokio::test]
    async fn test_missed_and_unchanged_statuses() {
        let clock = Arc::new(FixedClock::at_date(date(2024, 1, 5)));
        let tracker = GamificationTracker::in_memory(clock);
        let before = scheduled_on(date(2024, 1, 10));

        let unchanged = tracker
            .on_follow_up_status_changed(&before, &before.clone())
            .await
            .unwrap();
        assert!(unchanged.is_none());

        let (outcome, stats) = tracker
            .on_follow_up_status_changed(&before, &resolved(&before, FollowUpStatus::Missed))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome, FollowUpOutcome::Missed);
        assert_eq!(stats.total_missed_follow_ups, 1);
    }

    #[tokio::test]
    async fn test_json_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileGamificationStore::new(dir.path().join("nested").join("stats.json"));

        assert_eq!(store.load().await.unwrap(), GamificationStats::default());

        let stats = GamificationStats {
            daily_prospects_added: 2,
            last_prospect_added_date: Some(date(2024, 3, 1)),
            follow_up_streak: 5,
            total_on_time_follow_ups: 7,
            total_missed_follow_ups: 1,
        };
        store.save(&stats).await.unwrap();

        let reopened = JsonFileGamificationStore::new(store.path());
        assert_eq!(reopened.load().await.unwrap(), stats);
    }

    #[tokio::test]
    async fn test_json_file_store_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonFileGamificationStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, TrackerError::Gamification(_)));
    }
}
