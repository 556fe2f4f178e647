//! Event route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use wellnest_core::{Email, EventId};

use crate::db::EventRepository;
use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::OptionalAuth;
use crate::models::{Event, Registrant, Registration};
use crate::state::AppState;

/// Event with its remaining seats.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    #[serde(flatten)]
    pub event: Event,
    /// `null` when the event is unlimited.
    pub remaining: Option<i32>,
}

/// Body of `POST /events/{id}/participate`.
///
/// Signed-in owners may omit name and email; the session values are used.
#[derive(Debug, Default, Deserialize)]
pub struct ParticipateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub async fn show(
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<EventId>,
) -> Result<Json<EventView>> {
    let event = EventRepository::new(state.pool()).get(event_id).await?;
    Ok(Json(EventView {
        remaining: event.remaining(),
        event,
    }))
}

/// Register the signed-in owner or a guest.
#[instrument(skip_all, fields(event = %event_id))]
pub async fn participate(
    OptionalAuth(user): OptionalAuth,
    State(state): State<AppState>,
    ApiPath(event_id): ApiPath<EventId>,
    ApiJson(body): ApiJson<ParticipateRequest>,
) -> Result<(StatusCode, Json<Registration>)> {
    let registrant = registrant(user.as_ref(), body)?;
    let registration = EventRepository::new(state.pool())
        .register(event_id, &registrant)
        .await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

fn registrant(
    user: Option<&crate::models::CurrentUser>,
    body: ParticipateRequest,
) -> Result<Registrant> {
    let name = body
        .name
        .map(|n| n.trim().to_owned())
        .filter(|n| !n.is_empty())
        .or_else(|| user.map(|u| u.name.clone()))
        .ok_or_else(|| AppError::BadRequest("name is required".to_owned()))?;

    let email = match body.email {
        Some(raw) => Email::parse(&raw).map_err(|e| AppError::BadRequest(e.to_string()))?,
        None => user
            .map(|u| u.email.clone())
            .ok_or_else(|| AppError::BadRequest("email is required".to_owned()))?,
    };

    Ok(Registrant {
        registrant_id: user.map(|u| u.id),
        name,
        email,
        phone: body
            .phone
            .map(|p| p.trim().to_owned())
            .filter(|p| !p.is_empty()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wellnest_core::UserId;

    use super::*;
    use crate::models::CurrentUser;

    fn owner() -> CurrentUser {
        CurrentUser {
            id: UserId::new(7),
            email: Email::parse("mina@example.com").unwrap(),
            name: "Mina Choi".to_owned(),
        }
    }

    #[test]
    fn test_guest_requires_name_and_email() {
        assert!(registrant(None, ParticipateRequest::default()).is_err());

        let body = ParticipateRequest {
            name: Some("Guest".to_owned()),
            email: None,
            phone: None,
        };
        assert!(registrant(None, body).is_err());
    }

    #[test]
    fn test_guest_with_invalid_email_rejected() {
        let body = ParticipateRequest {
            name: Some("Guest".to_owned()),
            email: Some("guest-at-example".to_owned()),
            phone: None,
        };
        assert!(matches!(registrant(None, body), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_owner_defaults_from_session() {
        let r = registrant(Some(&owner()), ParticipateRequest::default()).unwrap();
        assert_eq!(r.registrant_id, Some(UserId::new(7)));
        assert_eq!(r.name, "Mina Choi");
        assert_eq!(r.email.as_str(), "mina@example.com");
    }

    #[test]
    fn test_body_overrides_session_values() {
        let body = ParticipateRequest {
            name: Some("  Mina C. ".to_owned()),
            email: Some("mina.work@example.com".to_owned()),
            phone: Some(" ".to_owned()),
        };
        let r = registrant(Some(&owner()), body).unwrap();
        assert_eq!(r.name, "Mina C.");
        assert_eq!(r.email.as_str(), "mina.work@example.com");
        assert_eq!(r.phone, None);
    }
}
