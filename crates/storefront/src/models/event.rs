use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wellnest_core::{Email, EventId, RegistrationId, RegistrationStatus, UserId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub starts_at: Option<DateTime<Utc>>,
    /// `None` means unlimited.
    pub capacity: Option<i32>,
    pub current_count: i32,
}

impl Event {
    /// Seats left, `None` when the event is unlimited.
    #[must_use]
    pub fn remaining(&self) -> Option<i32> {
        self.capacity
            .map(|capacity| (capacity - self.current_count).max(0))
    }
}

/// Who is registering. `registrant_id` is set when an owner is signed in.
#[derive(Debug, Clone)]
pub struct Registrant {
    pub registrant_id: Option<UserId>,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub registrant_id: Option<UserId>,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
}
