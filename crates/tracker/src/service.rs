//! Entity store service: every mutation of prospects, interactions and
//! follow-ups goes through here so derived state stays consistent.

use std::sync::Arc;

use ai::{Assistant, MessageSuggestion, ScheduleSuggestion, ToolSuggestions};
use chrono::{Days, NaiveDate};
use db::DbError;
use events::{Event, EventBus};
use prospect_core::{
    AccountabilitySummary, CreateFollowUpRequest, CreateInteractionRequest, CreateProspectRequest,
    FollowUp, GamificationStats, Interaction, Prospect, UpdateFollowUpRequest,
    UpdateProspectRequest,
};
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::accountability;
use crate::clock::Clock;
use crate::error::{Result, TrackerError};
use crate::gamification::GamificationTracker;
use crate::locks::ProspectLocks;
use crate::store::{FollowUpStore, ProspectStore};
use crate::sync;

pub const DEFAULT_UPCOMING_WINDOW_DAYS: u32 = 7;

#[derive(Clone)]
pub struct ProspectService {
    prospects: Arc<dyn ProspectStore>,
    follow_ups: Arc<dyn FollowUpStore>,
    assistant: Assistant,
    gamification: GamificationTracker,
    clock: Arc<dyn Clock>,
    locks: ProspectLocks,
    events: EventBus,
}

impl ProspectService {
    pub fn new(
        prospects: Arc<dyn ProspectStore>,
        follow_ups: Arc<dyn FollowUpStore>,
        assistant: Assistant,
        gamification: GamificationTracker,
        clock: Arc<dyn Clock>,
        events: EventBus,
    ) -> Self {
        Self {
            prospects,
            follow_ups,
            assistant,
            gamification,
            clock,
            locks: ProspectLocks::new(),
            events,
        }
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn assistant(&self) -> &Assistant {
        &self.assistant
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    // ---------------------------------------------------------------------
    // Prospects
    // ---------------------------------------------------------------------

    pub async fn create_prospect(&self, request: CreateProspectRequest) -> Result<Prospect> {
        request.validate()?;

        let color = sync::regenerate_color_code(
            &self.assistant,
            request.follow_up_stage_number,
            request.name.trim(),
        )
        .await;
        let fallback = color.is_neutral();

        let prospect = Prospect::new(request, color).stamped(self.clock.now());
        self.prospects.insert(&prospect).await?;

        info!(
            prospect_id = %prospect.id,
            stage_number = prospect.follow_up_stage_number,
            color_code = %prospect.color_code,
            "Created prospect"
        );

        self.events.emit(Event::ProspectCreated {
            prospect_id: prospect.id,
            name: prospect.name.clone(),
        });
        self.events.emit(Event::ColorCodeChanged {
            prospect_id: prospect.id,
            color_code: prospect.color_code.clone(),
            fallback,
        });
        self.record_prospect_added().await;

        Ok(prospect)
    }

    pub async fn get_prospect(&self, id: Uuid) -> Result<Prospect> {
        debug!(prospect_id = %id, "Fetching prospect");
        self.prospects
            .get(id)
            .await?
            .ok_or_else(|| TrackerError::prospect_not_found(id))
    }

    pub async fn list_prospects(&self) -> Result<Vec<Prospect>> {
        Ok(self.prospects.list().await?)
    }

    /// Merges `request` into the prospect. A changed stage number regenerates
    /// the color; if that fails the previous color stays.
    pub async fn update_prospect(&self, id: Uuid, request: UpdateProspectRequest) -> Result<Prospect> {
        request.validate()?;
        let (_guard, mut prospect) = self.lock_existing(id).await?;

        let stage_number_changed = prospect.apply_update(&request)?;
        prospect.updated_at = self.clock.now();

        let mut new_color = None;
        if stage_number_changed {
            match sync::try_regenerate_color_code(
                &self.assistant,
                prospect.follow_up_stage_number,
                &prospect.name,
            )
            .await
            {
                Ok(color) => {
                    prospect.apply_color(color);
                    new_color = Some(prospect.color_code.clone());
                }
                Err(e) => warn!(
                    prospect_id = %id,
                    error = %e,
                    "Color regeneration failed, keeping previous color"
                ),
            }
        }

        if !self.prospects.update(&prospect).await? {
            return Err(TrackerError::prospect_not_found(id));
        }

        info!(prospect_id = %id, stage_number_changed, "Updated prospect");
        self.events.emit(Event::ProspectUpdated { prospect_id: id });
        if let Some(color_code) = new_color {
            self.events.emit(Event::ColorCodeChanged {
                prospect_id: id,
                color_code,
                fallback: false,
            });
        }

        Ok(prospect)
    }

    /// Deletes the prospect along with its follow-ups and interactions.
    pub async fn delete_prospect(&self, id: Uuid) -> Result<()> {
        {
            let _guard = self.locks.lock(id).await;
            if !self.prospects.delete(id).await? {
                return Err(TrackerError::prospect_not_found(id));
            }
        }
        self.locks.remove(id).await;

        info!(prospect_id = %id, "Deleted prospect");
        self.events.emit(Event::ProspectDeleted { prospect_id: id });
        Ok(())
    }

    pub async fn add_interaction(
        &self,
        prospect_id: Uuid,
        request: CreateInteractionRequest,
    ) -> Result<Prospect> {
        request.validate()?;
        let (_guard, mut prospect) = self.lock_existing(prospect_id).await?;

        let now = self.clock.now();
        let interaction = Interaction::new(CreateInteractionRequest {
            date: request.date.or(Some(now)),
            ..request
        });
        prospect.record_interaction(interaction.clone());
        prospect.updated_at = now;

        self.prospects
            .append_interaction(&prospect, &interaction)
            .await
            .map_err(|e| match e {
                DbError::ProspectNotFound(id) => TrackerError::prospect_not_found(id),
                other => other.into(),
            })?;

        info!(
            prospect_id = %prospect_id,
            interaction_id = %interaction.id,
            interaction_type = interaction.interaction_type.as_str(),
            "Logged interaction"
        );
        self.events.emit(Event::InteractionLogged {
            prospect_id,
            interaction_id: interaction.id,
        });

        Ok(prospect)
    }

    /// Regenerates colors of prospects still on the neutral fallback (or none
    /// at all). Returns how many were updated.
    pub async fn backfill_color_codes(&self) -> Result<usize> {
        let candidates: Vec<Uuid> = self
            .prospects
            .list()
            .await?
            .into_iter()
            .filter(Prospect::has_neutral_color)
            .map(|p| p.id)
            .collect();

        info!(candidates = candidates.len(), "Backfilling color codes");

        let mut updated = 0;
        for id in candidates {
            let _guard = self.locks.lock(id).await;

            let Some(mut prospect) = self.prospects.get(id).await? else {
                continue;
            };
            if !prospect.has_neutral_color() {
                continue;
            }

            let color = match sync::try_regenerate_color_code(
                &self.assistant,
                prospect.follow_up_stage_number,
                &prospect.name,
            )
            .await
            {
                Ok(color) if !color.is_neutral() => color,
                Ok(_) => continue,
                Err(e) => {
                    warn!(prospect_id = %id, error = %e, "Backfill generation failed");
                    continue;
                }
            };

            prospect.apply_color(color);
            if self.prospects.update(&prospect).await? {
                updated += 1;
                self.events.emit(Event::ColorCodeChanged {
                    prospect_id: id,
                    color_code: prospect.color_code.clone(),
                    fallback: false,
                });
            }
        }

        info!(updated, "Color code backfill finished");
        Ok(updated)
    }

    // ---------------------------------------------------------------------
    // Follow-ups
    // ---------------------------------------------------------------------

    pub async fn add_follow_up(&self, request: CreateFollowUpRequest) -> Result<FollowUp> {
        let prospect_id = request.prospect_id;
        let (_guard, _) = self.lock_existing(prospect_id).await?;

        let follow_up = FollowUp::new(request).stamped(self.clock.now());
        self.follow_ups.insert(&follow_up).await?;

        info!(
            prospect_id = %prospect_id,
            follow_up_id = %follow_up.id,
            date = %follow_up.date,
            "Scheduled follow-up"
        );
        self.events.emit(Event::FollowUpScheduled {
            prospect_id,
            follow_up_id: follow_up.id,
            date: follow_up.date,
        });

        self.sync_next_follow_up(prospect_id).await?;
        Ok(follow_up)
    }

    pub async fn get_follow_up(&self, id: Uuid) -> Result<FollowUp> {
        self.follow_ups
            .get(id)
            .await?
            .ok_or_else(|| TrackerError::follow_up_not_found(id))
    }

    pub async fn update_follow_up(&self, id: Uuid, request: UpdateFollowUpRequest) -> Result<FollowUp> {
        let prospect_id = self.get_follow_up(id).await?.prospect_id;
        let _guard = self.locks.lock(prospect_id).await;

        let mut follow_up = self.get_follow_up(id).await?;
        let before = follow_up.clone();
        let change = follow_up.apply_update(&request)?;
        follow_up.updated_at = before.updated_at;
        if follow_up == before {
            debug!(follow_up_id = %id, "Follow-up update changed nothing");
            return Ok(before);
        }
        follow_up.updated_at = self.clock.now();

        if !self.follow_ups.update(&follow_up).await? {
            return Err(TrackerError::follow_up_not_found(id));
        }

        info!(
            follow_up_id = %id,
            status = follow_up.status.as_str(),
            status_changed = change.status_changed,
            date_changed = change.date_changed,
            "Updated follow-up"
        );
        self.events.emit(Event::FollowUpUpdated {
            prospect_id,
            follow_up_id: id,
            status: follow_up.status.as_str().to_string(),
        });

        if change.affects_schedule() {
            self.sync_next_follow_up(prospect_id).await?;
        }
        if change.status_changed {
            self.record_follow_up_resolved(&before, &follow_up).await;
        }

        Ok(follow_up)
    }

    pub async fn delete_follow_up(&self, id: Uuid) -> Result<()> {
        let prospect_id = self.get_follow_up(id).await?.prospect_id;
        let _guard = self.locks.lock(prospect_id).await;

        if !self.follow_ups.delete(id).await? {
            return Err(TrackerError::follow_up_not_found(id));
        }

        info!(follow_up_id = %id, prospect_id = %prospect_id, "Deleted follow-up");
        self.events.emit(Event::FollowUpDeleted {
            prospect_id,
            follow_up_id: id,
        });

        self.sync_next_follow_up(prospect_id).await?;
        Ok(())
    }

    pub async fn list_follow_ups(&self) -> Result<Vec<FollowUp>> {
        Ok(self.follow_ups.list().await?)
    }

    pub async fn list_follow_ups_for_prospect(&self, prospect_id: Uuid) -> Result<Vec<FollowUp>> {
        if self.prospects.get(prospect_id).await?.is_none() {
            return Err(TrackerError::prospect_not_found(prospect_id));
        }
        Ok(self.follow_ups.list_for_prospect(prospect_id).await?)
    }

    /// Pending follow-ups dated from today through `window_days` ahead.
    pub async fn list_upcoming_follow_ups(&self, window_days: u32) -> Result<Vec<FollowUp>> {
        let today = self.clock.today();
        let until = today
            .checked_add_days(Days::new(window_days.into()))
            .ok_or_else(|| {
                TrackerError::Validation(format!("Window of {} days is out of range", window_days))
            })?;
        debug!(from = %today, to = %until, "Listing upcoming follow-ups");
        Ok(self.follow_ups.list_pending_between(today, until).await?)
    }

    /// Creates one follow-up per schedule entry that is still in the future.
    pub async fn apply_schedule(
        &self,
        prospect_id: Uuid,
        schedule: ScheduleSuggestion,
    ) -> Result<Vec<FollowUp>> {
        if self.prospects.get(prospect_id).await?.is_none() {
            return Err(TrackerError::prospect_not_found(prospect_id));
        }

        let schedule = schedule.validate(self.clock.local_now());
        let mut created = Vec::with_capacity(schedule.follow_up_schedule.len());
        for item in schedule.follow_up_schedule {
            let follow_up = self
                .add_follow_up(CreateFollowUpRequest {
                    prospect_id,
                    date: item.date,
                    time: item.time,
                    method: item.method,
                    notes: item.notes,
                    ai_suggested_tone: None,
                    ai_suggested_content: None,
                    ai_suggested_tool: None,
                })
                .await?;
            created.push(follow_up);
        }

        info!(prospect_id = %prospect_id, count = created.len(), "Applied follow-up schedule");
        Ok(created)
    }

    /// Takes the prospect's lock and loads it. Unknown ids leave no entry in
    /// the lock map.
    async fn lock_existing(&self, id: Uuid) -> Result<(OwnedMutexGuard<()>, Prospect)> {
        let guard = self.locks.lock(id).await;
        match self.prospects.get(id).await {
            Ok(Some(prospect)) => Ok((guard, prospect)),
            outcome => {
                drop(guard);
                self.locks.release(id).await;
                Err(match outcome {
                    Err(e) => e.into(),
                    _ => TrackerError::prospect_not_found(id),
                })
            }
        }
    }

    /// Recomputes the prospect's next follow-up date from its follow-ups.
    /// Callers hold the prospect's lock.
    async fn sync_next_follow_up(&self, prospect_id: Uuid) -> Result<Option<NaiveDate>> {
        let Some(prospect) = self.prospects.get(prospect_id).await? else {
            return Ok(None);
        };

        let follow_ups = self.follow_ups.list_for_prospect(prospect_id).await?;
        let next = sync::compute_next_follow_up_date(prospect_id, &follow_ups);

        if prospect.next_follow_up_date != next {
            self.prospects
                .set_next_follow_up_date(prospect_id, next)
                .await?;
            debug!(prospect_id = %prospect_id, next = ?next, "Next follow-up date changed");
            self.events.emit(Event::NextFollowUpChanged {
                prospect_id,
                next_follow_up_date: next,
            });
        }

        Ok(next)
    }

    // ---------------------------------------------------------------------
    // Suggestions
    // ---------------------------------------------------------------------

    /// Defaults `follow_up_number` to the prospect's stage number.
    pub async fn suggest_message(
        &self,
        prospect_id: Uuid,
        follow_up_number: Option<u32>,
    ) -> Result<MessageSuggestion> {
        let prospect = self.get_prospect(prospect_id).await?;
        let number = follow_up_number.unwrap_or_else(|| u32::from(prospect.follow_up_stage_number));
        Ok(self.assistant.suggest_message(&prospect, number).await)
    }

    pub async fn suggest_schedule(
        &self,
        prospect_id: Uuid,
        user_preferences: Option<&str>,
    ) -> Result<ScheduleSuggestion> {
        let prospect = self.get_prospect(prospect_id).await?;
        Ok(self
            .assistant
            .suggest_schedule(&prospect, user_preferences, self.clock.local_now())
            .await)
    }

    pub async fn suggest_tools(&self, prospect_id: Uuid) -> Result<ToolSuggestions> {
        let prospect = self.get_prospect(prospect_id).await?;
        Ok(self.assistant.suggest_tools(&prospect).await)
    }

    // ---------------------------------------------------------------------
    // Stats
    // ---------------------------------------------------------------------

    pub async fn gamification_stats(&self) -> Result<GamificationStats> {
        self.gamification.stats().await
    }

    pub async fn accountability_summary(&self, window_days: u32) -> Result<AccountabilitySummary> {
        let prospects = self.prospects.list().await?;
        let follow_ups = self.follow_ups.list().await?;
        let streak = self.gamification.stats().await?.follow_up_streak;

        accountability::summarize(
            self.clock.now(),
            window_days,
            &prospects,
            &follow_ups,
            streak,
        )
    }

    async fn record_prospect_added(&self) {
        match self.gamification.on_prospect_added().await {
            Ok(stats) => self.emit_gamification(&stats),
            Err(e) => self.report_gamification_failure("prospect added", e),
        }
    }

    async fn record_follow_up_resolved(&self, before: &FollowUp, after: &FollowUp) {
        match self
            .gamification
            .on_follow_up_status_changed(before, after)
            .await
        {
            Ok(Some((_, stats))) => self.emit_gamification(&stats),
            Ok(None) => {}
            Err(e) => self.report_gamification_failure("follow-up resolved", e),
        }
    }

    fn emit_gamification(&self, stats: &GamificationStats) {
        self.events.emit(Event::GamificationUpdated {
            daily_prospects_added: stats.daily_prospects_added,
            follow_up_streak: stats.follow_up_streak,
        });
    }

    fn report_gamification_failure(&self, context: &str, err: TrackerError) {
        error!(error = %err, context, "Failed to update gamification stats");
        self.events.emit(Event::Error {
            message: err.to_string(),
            context: Some(format!("gamification: {}", context)),
        });
    }
}

impl std::fmt::Debug for ProspectService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProspectService")
            .field("assistant", &self.assistant)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
