//! # Event Repository
//!
//! Events and their schedules. An event and its schedule are created and
//! deleted together in one unit of work; a schedule row never exists
//! without its event and vice versa.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::info;

use lylas_core::{EventDetail, EventType};

use crate::error::{DbError, DbResult};

/// Data for creating an event with its schedule.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub event_type_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Repository for event and schedule operations.
#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: SqlitePool,
}

impl EventRepository {
    pub fn new(pool: SqlitePool) -> Self {
        EventRepository { pool }
    }

    /// Lists events joined with their schedule and type.
    pub async fn list(&self) -> DbResult<Vec<EventDetail>> {
        let events = sqlx::query_as::<_, EventDetail>(
            "SELECT e.id, e.title, et.category AS event_category,
                    s.id AS schedule_id, s.start_date, s.end_date
             FROM events e
             JOIN event_types et ON et.id = e.event_type_id
             JOIN schedules s ON s.event_id = e.id
             ORDER BY s.start_date DESC, e.id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Lists the event type lookup table.
    pub async fn list_event_types(&self) -> DbResult<Vec<EventType>> {
        let types =
            sqlx::query_as::<_, EventType>("SELECT id, category FROM event_types ORDER BY category")
                .fetch_all(&self.pool)
                .await?;

        Ok(types)
    }

    /// Creates an event and its schedule atomically.
    ///
    /// Returns the new event's ID.
    pub async fn create(&self, new: NewEvent) -> DbResult<i64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("INSERT INTO events (title, event_type_id) VALUES (?, ?)")
            .bind(&new.title)
            .bind(new.event_type_id)
            .execute(&mut *tx)
            .await?;
        let event_id = result.last_insert_rowid();

        sqlx::query("INSERT INTO schedules (event_id, start_date, end_date) VALUES (?, ?, ?)")
            .bind(event_id)
            .bind(new.start_date)
            .bind(new.end_date)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(event_id, title = %new.title, "Event created");
        Ok(event_id)
    }

    /// Deletes an event and its schedules atomically.
    pub async fn delete(&self, event_id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM schedules WHERE event_id = ?")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DbError::not_found("Event", event_id));
        }

        tx.commit().await?;

        info!(event_id, "Event deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("INSERT INTO event_types (category) VALUES ('Wedding')")
            .execute(db.pool())
            .await
            .unwrap();
        db
    }

    fn new_event() -> NewEvent {
        NewEvent {
            title: "Reyes Wedding".to_string(),
            event_type_id: 1,
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 2).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_event_with_schedule() {
        let db = test_db().await;
        let event_id = db.events().create(new_event()).await.unwrap();

        let events = db.events().list().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, event_id);
        assert_eq!(events[0].event_category, "Wedding");
        assert_eq!(
            events[0].start_date,
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
        );
    }

    #[tokio::test]
    async fn test_delete_event_removes_schedule() {
        let db = test_db().await;
        let event_id = db.events().create(new_event()).await.unwrap();

        db.events().delete(event_id).await.unwrap();

        let schedules: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schedules")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(schedules, 0);
        assert!(db.events().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_event_is_not_found() {
        let db = test_db().await;
        let err = db.events().delete(7).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_event_types() {
        let db = test_db().await;
        let types = db.events().list_event_types().await.unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].category, "Wedding");
    }
}
