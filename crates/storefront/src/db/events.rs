//! Event repository and capacity guard.
//!
//! Admission is one conditional `UPDATE` on the event row: the row lock it
//! takes serializes concurrent registrations, and the `WHERE` clause only
//! matches while a seat is free. The registration insert reads from that
//! update's `RETURNING` set, so a registration row exists exactly when the
//! counter moved.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use wellnest_core::{Email, EventId, RegistrationId, RegistrationStatus, UserId};

use super::RepositoryError;
use crate::models::{Event, Registrant, Registration};

#[derive(sqlx::FromRow)]
struct EventRow {
    id: EventId,
    title: String,
    starts_at: Option<DateTime<Utc>>,
    capacity: Option<i32>,
    current_count: i32,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            starts_at: row.starts_at,
            capacity: row.capacity,
            current_count: row.current_count,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RegistrationRow {
    id: RegistrationId,
    event_id: EventId,
    registrant_id: Option<UserId>,
    name: String,
    email: Email,
    phone: Option<String>,
    status: RegistrationStatus,
    created_at: DateTime<Utc>,
}

impl From<RegistrationRow> for Registration {
    fn from(row: RegistrationRow) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            registrant_id: row.registrant_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Repository for events and registrations.
pub struct EventRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> EventRepository<'a> {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an event.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the event does not exist.
    pub async fn get(&self, event_id: EventId) -> Result<Event, RepositoryError> {
        let row = sqlx::query_as::<_, EventRow>(
            r"
            SELECT id, title, starts_at, capacity, current_count
            FROM shop.event
            WHERE id = $1
            ",
        )
        .bind(event_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound("event".to_owned()))?;

        Ok(row.into())
    }

    /// Register for an event if a seat is free.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the event does not exist.
    /// Returns `RepositoryError::CapacityExceeded` if the event is full.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, registrant), fields(event = %event_id))]
    pub async fn register(
        &self,
        event_id: EventId,
        registrant: &Registrant,
    ) -> Result<Registration, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let admitted = sqlx::query_as::<_, RegistrationRow>(
            r"
            WITH admitted AS (
                UPDATE shop.event
                SET current_count = current_count + 1
                WHERE id = $1
                  AND (capacity IS NULL OR current_count < capacity)
                RETURNING id
            )
            INSERT INTO shop.event_registration (event_id, registrant_id, name, email, phone)
            SELECT admitted.id, $2, $3, $4, $5
            FROM admitted
            RETURNING id, event_id, registrant_id, name, email, phone, status, created_at
            ",
        )
        .bind(event_id)
        .bind(registrant.registrant_id)
        .bind(&registrant.name)
        .bind(&registrant.email)
        .bind(registrant.phone.as_deref())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = admitted else {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM shop.event WHERE id = $1)")
                    .bind(event_id)
                    .fetch_one(&mut *tx)
                    .await?;

            if !exists {
                return Err(RepositoryError::NotFound("event".to_owned()));
            }
            tracing::warn!("registration rejected, event is full");
            return Err(RepositoryError::CapacityExceeded);
        };

        tx.commit().await?;

        tracing::info!(registration = %row.id, "event registration confirmed");
        Ok(row.into())
    }

    /// Registrations for an event, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn registrations(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Registration>, RepositoryError> {
        let rows = sqlx::query_as::<_, RegistrationRow>(
            r"
            SELECT id, event_id, registrant_id, name, email, phone, status, created_at
            FROM shop.event_registration
            WHERE event_id = $1
            ORDER BY created_at, id
            ",
        )
        .bind(event_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Registration::from).collect())
    }
}
