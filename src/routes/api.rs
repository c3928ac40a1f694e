// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account-scoped API routes used by the dashboard views.
//!
//! Every handler takes an [`Account`], so a request without a resolvable
//! identity is answered with a login redirect before the gateway is called.
//! Gateway outcomes are settled in one place, [`settle`].

use crate::error::{AppError, Result};
use crate::forms::{ContactForm, GroupForm, SendSmsForm};
use crate::models::{AccountProfile, ApiKey, Contact, CreditEntry, Document, Group, SmsReceipt};
use crate::notify::{Notification, NotificationLevel};
use crate::pagination::{paginate, Page, PageQuery};
use crate::services::BackendOutcome;
use crate::session::{Account, ClientId, RequestSession, SessionAccessor, UserDescriptor};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    routing::{delete, get, post},
    Json, Router,
};
use futures_util::stream::{self, Stream};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", get(get_session))
        .route("/api/me", get(get_me))
        .route("/api/contacts", get(list_contacts).post(create_contact))
        .route("/api/contacts/{id}", delete(delete_contact))
        .route("/api/groups", get(list_groups).post(create_group))
        .route("/api/sms", post(send_sms))
        .route("/api/credits", get(credit_history))
        .route("/api/api-key", get(get_api_key))
        .route("/api/api-key/regenerate", post(regenerate_api_key))
        .route("/api/documents", get(list_documents))
        .route("/api/notifications", get(notifications))
}

/// Turn a gateway outcome into a handler result.
///
/// A rejected token ends the session: the mirror entry is dropped and the
/// response clears both cookies and points at the session-expired login
/// page. Other failures are surfaced to the account as an error
/// notification.
pub fn settle<T>(state: &AppState, account: &Account, outcome: BackendOutcome<T>) -> Result<T> {
    match outcome {
        BackendOutcome::Success(value) => Ok(value),
        BackendOutcome::Unauthorized => {
            tracing::info!(client_id = %account.client_id, "Gateway rejected session token");
            state.mirror.remove(&account.token);
            Err(AppError::SessionExpired)
        }
        BackendOutcome::Failed(msg) => {
            state.notifier.publish(
                Notification::new(NotificationLevel::Error, msg.clone())
                    .for_account(&account.client_id),
            );
            Err(AppError::Backend(msg))
        }
    }
}

// ─── Session & account ───────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub client_id: ClientId,
    pub display_name: String,
    pub role: Option<String>,
}

/// Who the dashboard is acting as, without calling the gateway.
async fn get_session(
    State(state): State<Arc<AppState>>,
    account: Account,
    headers: HeaderMap,
) -> Json<SessionResponse> {
    let session = RequestSession::new(&headers, &state.mirror);
    let user = [session.user_cookie(), session.local_user()]
        .into_iter()
        .flatten()
        .find_map(|raw| UserDescriptor::from_json(&raw).ok())
        .unwrap_or_default();

    Json(SessionResponse {
        client_id: account.client_id,
        display_name: user.display_name().to_string(),
        role: user.role,
    })
}

async fn get_me(
    State(state): State<Arc<AppState>>,
    account: Account,
) -> Result<Json<AccountProfile>> {
    let outcome = state
        .backend
        .get_account(&account.token, &account.client_id)
        .await;
    Ok(Json(settle(&state, &account, outcome)?))
}

// ─── Contacts & groups ───────────────────────────────────────

async fn list_contacts(
    State(state): State<Arc<AppState>>,
    account: Account,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Contact>>> {
    let outcome = state
        .backend
        .list_contacts(&account.token, &account.client_id)
        .await;
    let contacts = settle(&state, &account, outcome)?;
    Ok(Json(paginate(contacts, query)?))
}

async fn create_contact(
    State(state): State<Arc<AppState>>,
    account: Account,
    Json(form): Json<ContactForm>,
) -> Result<(StatusCode, Json<Contact>)> {
    form.validate()?;

    let outcome = state
        .backend
        .create_contact(&account.token, &account.client_id, &form)
        .await;
    let contact = settle(&state, &account, outcome)?;

    tracing::info!(client_id = %account.client_id, "Contact created");
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn delete_contact(
    State(state): State<Arc<AppState>>,
    account: Account,
    Path(contact_id): Path<String>,
) -> Result<StatusCode> {
    if contact_id.trim().is_empty() {
        return Err(AppError::BadRequest("Contact id is required".to_string()));
    }

    let outcome = state
        .backend
        .delete_contact(&account.token, &account.client_id, &contact_id)
        .await;
    settle(&state, &account, outcome)?;

    tracing::info!(client_id = %account.client_id, contact_id = %contact_id, "Contact deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn list_groups(
    State(state): State<Arc<AppState>>,
    account: Account,
) -> Result<Json<Vec<Group>>> {
    let outcome = state
        .backend
        .list_groups(&account.token, &account.client_id)
        .await;
    Ok(Json(settle(&state, &account, outcome)?))
}

async fn create_group(
    State(state): State<Arc<AppState>>,
    account: Account,
    Json(form): Json<GroupForm>,
) -> Result<(StatusCode, Json<Group>)> {
    form.validate()?;

    let outcome = state
        .backend
        .create_group(&account.token, &account.client_id, &form)
        .await;
    Ok((StatusCode::CREATED, Json(settle(&state, &account, outcome)?)))
}

// ─── Messaging ───────────────────────────────────────────────

async fn send_sms(
    State(state): State<Arc<AppState>>,
    account: Account,
    Json(form): Json<SendSmsForm>,
) -> Result<Json<SmsReceipt>> {
    form.validate()?;

    let outcome = state
        .backend
        .send_sms(&account.token, &account.client_id, &form)
        .await;
    let receipt = settle(&state, &account, outcome)?;

    let accepted = receipt
        .accepted
        .map_or(form.recipients.len(), |n| n as usize);
    tracing::info!(client_id = %account.client_id, accepted, "SMS submitted");

    state.notifier.publish(
        Notification::new(
            NotificationLevel::Success,
            format!("Message accepted for {accepted} recipient(s)."),
        )
        .for_account(&account.client_id),
    );

    Ok(Json(receipt))
}

// ─── Credits & API key ───────────────────────────────────────

async fn credit_history(
    State(state): State<Arc<AppState>>,
    account: Account,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<CreditEntry>>> {
    let outcome = state
        .backend
        .credit_history(&account.token, &account.client_id)
        .await;
    let entries = settle(&state, &account, outcome)?;
    Ok(Json(paginate(entries, query)?))
}

async fn get_api_key(
    State(state): State<Arc<AppState>>,
    account: Account,
) -> Result<Json<ApiKey>> {
    let outcome = state.backend.api_key(&account.token, &account.client_id).await;
    Ok(Json(settle(&state, &account, outcome)?))
}

async fn regenerate_api_key(
    State(state): State<Arc<AppState>>,
    account: Account,
) -> Result<Json<ApiKey>> {
    let outcome = state
        .backend
        .regenerate_api_key(&account.token, &account.client_id)
        .await;
    let key = settle(&state, &account, outcome)?;

    tracing::info!(client_id = %account.client_id, "API key regenerated");
    state.notifier.publish(
        Notification::new(
            NotificationLevel::Info,
            "A new API key was generated. The previous key no longer works.",
        )
        .for_account(&account.client_id),
    );

    Ok(Json(key))
}

// ─── Documents ───────────────────────────────────────────────

async fn list_documents(
    State(state): State<Arc<AppState>>,
    account: Account,
) -> Result<Json<Vec<Document>>> {
    let outcome = state.backend.documents(&account.token).await;
    Ok(Json(settle(&state, &account, outcome)?))
}

// ─── Notifications ───────────────────────────────────────────

/// Server-sent stream of notifications for the requesting account.
async fn notifications(
    State(state): State<Arc<AppState>>,
    account: Account,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    tracing::debug!(client_id = %account.client_id, "Notification stream opened");
    let subscription = state.notifier.subscribe(&account.client_id);

    let events = stream::unfold(subscription, |mut subscription| async move {
        let notification = subscription.next().await?;
        let event = match Event::default().event("notification").json_data(&notification) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode notification");
                Event::default().comment("dropped")
            }
        };
        Some((Ok::<_, Infallible>(event), subscription))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::notify::Notifier;
    use crate::services::BackendClient;
    use crate::session::UserMirror;

    fn state() -> AppState {
        let config = Config::test_default();
        AppState {
            backend: BackendClient::new(&config.backend_url, config.backend_timeout).unwrap(),
            config,
            mirror: UserMirror::default(),
            notifier: Notifier::default(),
        }
    }

    fn account() -> Account {
        Account {
            client_id: ClientId::new("700001"),
            token: "tok".to_string(),
        }
    }

    #[test]
    fn test_settle_success_passes_value() {
        let state = state();
        assert_eq!(
            settle(&state, &account(), BackendOutcome::Success(3)).unwrap(),
            3
        );
    }

    #[test]
    fn test_settle_unauthorized_ends_session() {
        let state = state();
        state.mirror.store("tok", r#"{"id":"1"}"#);

        let err = settle::<()>(&state, &account(), BackendOutcome::Unauthorized).unwrap_err();

        assert!(matches!(err, AppError::SessionExpired));
        assert!(state.mirror.get("tok").is_none());
    }

    #[tokio::test]
    async fn test_settle_failure_notifies_account() {
        let state = state();
        let mut subscription = state.notifier.subscribe(&ClientId::new("700001"));

        let err = settle::<()>(
            &state,
            &account(),
            BackendOutcome::Failed("Gateway down".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Backend(ref m) if m == "Gateway down"));

        let notification = subscription.next().await.unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.message, "Gateway down");
    }
}
