//! Storage seams of the entity store. The SQLite repositories from `db`
//! implement them; the service only ever sees the traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use db::{DbError, FollowUpRepository, ProspectRepository};
use prospect_core::{FollowUp, Interaction, Prospect};
use uuid::Uuid;

#[async_trait]
pub trait ProspectStore: Send + Sync {
    async fn insert(&self, prospect: &Prospect) -> Result<(), DbError>;

    async fn get(&self, id: Uuid) -> Result<Option<Prospect>, DbError>;

    /// Newest first.
    async fn list(&self) -> Result<Vec<Prospect>, DbError>;

    /// Writes scalar fields; the interaction history is append-only.
    async fn update(&self, prospect: &Prospect) -> Result<bool, DbError>;

    async fn set_next_follow_up_date(
        &self,
        id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<bool, DbError>;

    /// Persists `interaction` and the contact fields `prospect` already carries.
    async fn append_interaction(
        &self,
        prospect: &Prospect,
        interaction: &Interaction,
    ) -> Result<(), DbError>;

    /// Removes the prospect together with its interactions and follow-ups.
    async fn delete(&self, id: Uuid) -> Result<bool, DbError>;
}

#[async_trait]
pub trait FollowUpStore: Send + Sync {
    async fn insert(&self, follow_up: &FollowUp) -> Result<(), DbError>;

    async fn get(&self, id: Uuid) -> Result<Option<FollowUp>, DbError>;

    /// Ascending by date, then time.
    async fn list(&self) -> Result<Vec<FollowUp>, DbError>;

    async fn list_for_prospect(&self, prospect_id: Uuid) -> Result<Vec<FollowUp>, DbError>;

    /// Pending follow-ups dated within `[from, to]`, ascending.
    async fn list_pending_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FollowUp>, DbError>;

    async fn update(&self, follow_up: &FollowUp) -> Result<bool, DbError>;

    async fn delete(&self, id: Uuid) -> Result<bool, DbError>;
}

#[async_trait]
impl ProspectStore for ProspectRepository {
    async fn insert(&self, prospect: &Prospect) -> Result<(), DbError> {
        self.create(prospect).await.map(|_| ())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Prospect>, DbError> {
        self.find_by_id(id).await
    }

    async fn list(&self) -> Result<Vec<Prospect>, DbError> {
        self.find_all().await
    }

    async fn update(&self, prospect: &Prospect) -> Result<bool, DbError> {
        ProspectRepository::update(self, prospect).await
    }

    async fn set_next_follow_up_date(
        &self,
        id: Uuid,
        date: Option<NaiveDate>,
    ) -> Result<bool, DbError> {
        ProspectRepository::set_next_follow_up_date(self, id, date).await
    }

    async fn append_interaction(
        &self,
        prospect: &Prospect,
        interaction: &Interaction,
    ) -> Result<(), DbError> {
        ProspectRepository::append_interaction(self, prospect, interaction).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        ProspectRepository::delete(self, id).await
    }
}

#[async_trait]
impl FollowUpStore for FollowUpRepository {
    async fn insert(&self, follow_up: &FollowUp) -> Result<(), DbError> {
        self.create(follow_up).await.map(|_| ())
    }

    async fn get(&self, id: Uuid) -> Result<Option<FollowUp>, DbError> {
        self.find_by_id(id).await
    }

    async fn list(&self) -> Result<Vec<FollowUp>, DbError> {
        self.find_all().await
    }

    async fn list_for_prospect(&self, prospect_id: Uuid) -> Result<Vec<FollowUp>, DbError> {
        self.find_by_prospect_id(prospect_id).await
    }

    async fn list_pending_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FollowUp>, DbError> {
        self.find_pending_between(from, to).await
    }

    async fn update(&self, follow_up: &FollowUp) -> Result<bool, DbError> {
        FollowUpRepository::update(self, follow_up).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        FollowUpRepository::delete(self, id).await
    }
}
