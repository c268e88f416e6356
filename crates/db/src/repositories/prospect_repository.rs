use std::collections::HashMap;

use chrono::NaiveDate;
use prospect_core::{Interaction, Prospect};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{datetime_to_timestamp, InteractionRow, ProspectRow, DATE_FORMAT};

#[derive(Clone)]
pub struct ProspectRepository {
    pool: SqlitePool,
}

impl ProspectRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, prospect: &Prospect) -> Result<Prospect, DbError> {
        let row = ProspectRow::from(prospect);
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO prospects (id, name, email, phone, initial_data, current_funnel_stage, follow_up_stage_number,
                                   color_code, color_code_reasoning, last_contacted_date, next_follow_up_date, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&row.id)
        .bind(&row.name)
        .bind(&row.email)
        .bind(&row.phone)
        .bind(&row.initial_data)
        .bind(&row.current_funnel_stage)
        .bind(row.follow_up_stage_number)
        .bind(&row.color_code)
        .bind(&row.color_code_reasoning)
        .bind(row.last_contacted_date)
        .bind(&row.next_follow_up_date)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, interaction) in prospect.interaction_history.iter().enumerate() {
            let interaction_row = InteractionRow::new(prospect.id, position as i64, interaction);
            insert_interaction(&mut tx, &interaction_row).await?;
        }

        tx.commit().await?;
        Ok(prospect.clone())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Prospect>, DbError> {
        let row: Option<ProspectRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, phone, initial_data, current_funnel_stage, follow_up_stage_number,
                   color_code, color_code_reasoning, last_contacted_date, next_follow_up_date, created_at, updated_at
            FROM prospects
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let interaction_rows: Vec<InteractionRow> = sqlx::query_as(
            r#"
            SELECT id, prospect_id, position, date, interaction_type, summary, outcome
            FROM interactions
            WHERE prospect_id = ?
            ORDER BY position ASC
            "#,
        )
        .bind(id.to_string())
        .fetch_all(&self.pool)
        .await?;

        let interactions = interaction_rows
            .into_iter()
            .map(InteractionRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;

        row.into_domain(interactions).map(Some)
    }

    pub async fn find_all(&self) -> Result<Vec<Prospect>, DbError> {
        let rows: Vec<ProspectRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, phone, initial_data, current_funnel_stage, follow_up_stage_number,
                   color_code, color_code_reasoning, last_contacted_date, next_follow_up_date, created_at, updated_at
            FROM prospects
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let interaction_rows: Vec<InteractionRow> = sqlx::query_as(
            r#"
            SELECT id, prospect_id, position, date, interaction_type, summary, outcome
            FROM interactions
            ORDER BY prospect_id, position ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_prospect: HashMap<String, Vec<Interaction>> = HashMap::new();
        for interaction_row in interaction_rows {
            let prospect_id = interaction_row.prospect_id.clone();
            by_prospect
                .entry(prospect_id)
                .or_default()
                .push(interaction_row.into_domain()?);
        }

        debug!("Loaded {} prospects", rows.len());

        rows.into_iter()
            .map(|row| {
                let interactions = by_prospect.remove(&row.id).unwrap_or_default();
                row.into_domain(interactions)
            })
            .collect()
    }

    /// Persists the scalar fields of `prospect`. Interactions are written by
    /// [`ProspectRepository::append_interaction`] only.
    pub async fn update(&self, prospect: &Prospect) -> Result<bool, DbError> {
        let row = ProspectRow::from(prospect);

        let result = sqlx::query(
            r#"
            UPDATE prospects
            SET name = ?, email = ?, phone = ?, initial_data = ?, current_funnel_stage = ?, follow_up_stage_number = ?,
                color_code = ?, color_code_reasoning = ?, last_contacted_date = ?, next_follow_up_date = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&row.name)
        .bind(&row.email)
        .bind(&row.phone)
        .bind(&row.initial_data)
        .bind(&row.current_funnel_stage)
        .bind(row.follow_up_stage_number)
        .bind(&row.color_code)
        .bind(&row.color_code_reasoning)
        .bind(row.last_contacted_date)
        .bind(&row.next_follow_up_date)
        .bind(row.updated_at)
        .bind(&row.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_next_follow_up_date(
        &self,
        id: Uuid,
        next_follow_up_date: Option<NaiveDate>,
    ) -> Result<bool, DbError> {
        let result = sqlx::query("UPDATE prospects SET next_follow_up_date = ? WHERE id = ?")
            .bind(next_follow_up_date.map(|d| d.format(DATE_FORMAT).to_string()))
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Inserts the interaction at the end of the prospect's history and stores
    /// the prospect's contact bookkeeping in the same transaction.
    pub async fn append_interaction(
        &self,
        prospect: &Prospect,
        interaction: &Interaction,
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let (next_position,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM interactions WHERE prospect_id = ?",
        )
        .bind(prospect.id.to_string())
        .fetch_one(&mut *tx)
        .await?;

        let result = sqlx::query(
            "UPDATE prospects SET last_contacted_date = ?, updated_at = ? WHERE id = ?",
        )
        .bind(prospect.last_contacted_date.map(datetime_to_timestamp))
        .bind(datetime_to_timestamp(prospect.updated_at))
        .bind(prospect.id.to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::ProspectNotFound(prospect.id));
        }

        let row = InteractionRow::new(prospect.id, next_position, interaction);
        insert_interaction(&mut tx, &row).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Deletes the prospect with its interactions and follow-ups.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM follow_ups WHERE prospect_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM interactions WHERE prospect_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM prospects WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

async fn insert_interaction(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    row: &InteractionRow,
) -> Result<(), DbError> {
    sqlx::query(
        r#"
        INSERT INTO interactions (id, prospect_id, position, date, interaction_type, summary, outcome)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&row.id)
    .bind(&row.prospect_id)
    .bind(row.position)
    .bind(row.date)
    .bind(&row.interaction_type)
    .bind(&row.summary)
    .bind(&row.outcome)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
