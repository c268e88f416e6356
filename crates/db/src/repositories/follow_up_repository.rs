use chrono::NaiveDate;
use prospect_core::FollowUp;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{FollowUpRow, DATE_FORMAT};

const SELECT_COLUMNS: &str = r#"
    SELECT id, prospect_id, date, time, method, notes, status,
           ai_suggested_tone, ai_suggested_content, ai_suggested_tool, created_at, updated_at
    FROM follow_ups
"#;

#[derive(Clone)]
pub struct FollowUpRepository {
    pool: SqlitePool,
}

impl FollowUpRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, follow_up: &FollowUp) -> Result<FollowUp, DbError> {
        let row = FollowUpRow::from(follow_up);

        sqlx::query(
            r#"
            INSERT INTO follow_ups (id, prospect_id, date, time, method, notes, status,
                                    ai_suggested_tone, ai_suggested_content, ai_suggested_tool, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.prospect_id)
        .bind(&row.date)
        .bind(&row.time)
        .bind(&row.method)
        .bind(&row.notes)
        .bind(&row.status)
        .bind(&row.ai_suggested_tone)
        .bind(&row.ai_suggested_content)
        .bind(&row.ai_suggested_tool)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(follow_up.clone())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FollowUp>, DbError> {
        let row: Option<FollowUpRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(FollowUpRow::into_domain).transpose()
    }

    pub async fn find_all(&self) -> Result<Vec<FollowUp>, DbError> {
        let rows: Vec<FollowUpRow> =
            sqlx::query_as(&format!("{SELECT_COLUMNS} ORDER BY date ASC, time ASC"))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(FollowUpRow::into_domain).collect()
    }

    pub async fn find_by_prospect_id(&self, prospect_id: Uuid) -> Result<Vec<FollowUp>, DbError> {
        let rows: Vec<FollowUpRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE prospect_id = ? ORDER BY date ASC, time ASC"
        ))
        .bind(prospect_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(FollowUpRow::into_domain).collect()
    }

    /// Pending follow-ups dated within `[from, to]`, soonest first.
    pub async fn find_pending_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FollowUp>, DbError> {
        let rows: Vec<FollowUpRow> = sqlx::query_as(&format!(
            "{SELECT_COLUMNS} WHERE status = 'pending' AND date >= ? AND date <= ? ORDER BY date ASC, time ASC"
        ))
        .bind(from.format(DATE_FORMAT).to_string())
        .bind(to.format(DATE_FORMAT).to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(FollowUpRow::into_domain).collect()
    }

    pub async fn update(&self, follow_up: &FollowUp) -> Result<bool, DbError> {
        let row = FollowUpRow::from(follow_up);

        let result = sqlx::query(
            r#"
            UPDATE follow_ups
            SET date = ?, time = ?, method = ?, notes = ?, status = ?,
                ai_suggested_tone = ?, ai_suggested_content = ?, ai_suggested_tool = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&row.date)
        .bind(&row.time)
        .bind(&row.method)
        .bind(&row.notes)
        .bind(&row.status)
        .bind(&row.ai_suggested_tone)
        .bind(&row.ai_suggested_content)
        .bind(&row.ai_suggested_tool)
        .bind(row.updated_at)
        .bind(&row.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM follow_ups WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_memory_pool, run_migrations, ProspectRepository};
    use chrono::NaiveTime;
    use prospect_core::{
        ColorCode, CreateFollowUpRequest, CreateProspectRequest, FollowUpMethod, FollowUpStatus,
        FunnelStage, Prospect,
    };

    async fn setup_test_db() -> (SqlitePool, Uuid) {
        let pool = create_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();

        let prospect = Prospect::new(
            CreateProspectRequest {
                name: "Morgan Blake".to_string(),
                email: None,
                phone: None,
                initial_data: "Inbound web form".to_string(),
                current_funnel_stage: FunnelStage::Prospect,
                follow_up_stage_number: 1,
            },
            ColorCode::neutral(),
        );
        ProspectRepository::new(pool.clone())
            .create(&prospect)
            .await
            .unwrap();

        (pool, prospect.id)
    }

    fn follow_up(prospect_id: Uuid, day: u32, hour: u32) -> FollowUp {
        FollowUp::new(CreateFollowUpRequest {
            prospect_id,
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            method: FollowUpMethod::Email,
            notes: format!("Follow up on the {day}th"),
            ai_suggested_tone: Some("friendly".to_string()),
            ai_suggested_content: None,
            ai_suggested_tool: None,
        })
    }

    #[tokio::test]
    async fn test_create_and_find_follow_up() {
        let (pool, prospect_id) = setup_test_db().await;
        let repo = FollowUpRepository::new(pool);

        let fu = follow_up(prospect_id, 10, 9);
        repo.create(&fu).await.unwrap();

        let found = repo.find_by_id(fu.id).await.unwrap().unwrap();
        assert_eq!(found.prospect_id, prospect_id);
        assert_eq!(found.date, fu.date);
        assert_eq!(found.time, fu.time);
        assert_eq!(found.ai_suggested_tone.as_deref(), Some("friendly"));
        assert_eq!(found.status, FollowUpStatus::Pending);
    }

    #[tokio::test]
    async fn test_find_by_prospect_sorted() {
        let (pool, prospect_id) = setup_test_db().await;
        let repo = FollowUpRepository::new(pool);

        repo.create(&follow_up(prospect_id, 12, 9)).await.unwrap();
        repo.create(&follow_up(prospect_id, 10, 15)).await.unwrap();
        repo.create(&follow_up(prospect_id, 10, 8)).await.unwrap();

        let found = repo.find_by_prospect_id(prospect_id).await.unwrap();
        let keys: Vec<_> = found.iter().map(|f| (f.date.to_string(), f.time.to_string())).collect();
        assert_eq!(
            keys,
            vec![
                ("2024-05-10".to_string(), "08:00:00".to_string()),
                ("2024-05-10".to_string(), "15:00:00".to_string()),
                ("2024-05-12".to_string(), "09:00:00".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_find_pending_between_excludes_resolved() {
        let (pool, prospect_id) = setup_test_db().await;
        let repo = FollowUpRepository::new(pool);

        let mut done = follow_up(prospect_id, 11, 9);
        done.status = FollowUpStatus::Completed;
        repo.create(&done).await.unwrap();
        repo.create(&follow_up(prospect_id, 12, 9)).await.unwrap();
        repo.create(&follow_up(prospect_id, 20, 9)).await.unwrap();

        let from = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let pending = repo.find_pending_between(from, to).await.unwrap();

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].date, NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
    }

    #[tokio::test]
    async fn test_update_and_delete_follow_up() {
        let (pool, prospect_id) = setup_test_db().await;
        let repo = FollowUpRepository::new(pool);

        let mut fu = follow_up(prospect_id, 10, 9);
        repo.create(&fu).await.unwrap();

        fu.status = FollowUpStatus::Missed;
        fu.notes = "No answer".to_string();
        assert!(repo.update(&fu).await.unwrap());

        let found = repo.find_by_id(fu.id).await.unwrap().unwrap();
        assert_eq!(found.status, FollowUpStatus::Missed);
        assert_eq!(found.notes, "No answer");

        assert!(repo.delete(fu.id).await.unwrap());
        assert!(repo.find_by_id(fu.id).await.unwrap().is_none());
        assert!(!repo.delete(fu.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_follow_up_requires_existing_prospect() {
        let (pool, _) = setup_test_db().await;
        let repo = FollowUpRepository::new(pool);

        let orphan = follow_up(Uuid::new_v4(), 10, 9);
        assert!(repo.create(&orphan).await.is_err());
    }
}
