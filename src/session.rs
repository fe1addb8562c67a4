use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::store::SharedStore;

pub const SESSION_KEY: &str = "ansxtra_current_user";
pub const STUDENT_EMAIL_DOMAIN: &str = "@student.amnuaysilpa.ac.th";

/// The persisted identity record. Either every field is populated and
/// `is_authenticated` is true, or no record exists at all; there is no
/// half-filled state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub student_id: String,
    pub email: String,
    pub full_name: String,
    pub is_authenticated: bool,
}

/// Outcome of a login attempt. Invalid input is a `Failure` value with a
/// human-readable message, never an error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Success { session: Session, message: String },
    Failure { message: String },
}

impl LoginOutcome {
    pub fn message(&self) -> &str {
        match self {
            LoginOutcome::Success { message, .. } => message,
            LoginOutcome::Failure { message } => message,
        }
    }
}

#[derive(Clone)]
pub struct SessionStore {
    store: SharedStore,
    catalog: Arc<Catalog>,
}

impl SessionStore {
    pub fn new(store: SharedStore, catalog: Arc<Catalog>) -> SessionStore {
        SessionStore { store, catalog }
    }

    /// There is no credential check: a well-formed school address is enough.
    /// The identity comes from the roster when the address is known there,
    /// otherwise it is derived from the email local-part. A repeated login
    /// overwrites the previous identity.
    pub async fn login(&self, email: &str) -> LoginOutcome {
        let email = email.trim();
        if email.is_empty() {
            return LoginOutcome::Failure {
                message: "Please enter your email address".to_string(),
            };
        }
        if !email.ends_with(STUDENT_EMAIL_DOMAIN) {
            return LoginOutcome::Failure {
                message: format!("Email must end with {STUDENT_EMAIL_DOMAIN}"),
            };
        }
        let local = &email[..email.len() - STUDENT_EMAIL_DOMAIN.len()];
        if local.is_empty() {
            return LoginOutcome::Failure {
                message: "Please enter a valid school email address".to_string(),
            };
        }

        let session = match self.catalog.student_by_email(email) {
            Some(student) => Session {
                student_id: student.student_id.clone(),
                email: email.to_string(),
                full_name: student.full_name.clone(),
                is_authenticated: true,
            },
            None => Session {
                student_id: local.to_string(),
                email: email.to_string(),
                full_name: title_case_local_part(local),
                is_authenticated: true,
            },
        };

        self.persist(&session).await;
        let message = format!("Welcome back, {}!", session.full_name);
        LoginOutcome::Success { session, message }
    }

    /// Idempotent; clearing an absent session is a no-op.
    pub async fn logout(&self) {
        self.store.delete(SESSION_KEY).await;
    }

    /// Reads the persisted identity. A record that no longer parses is
    /// dropped and the session reported as absent.
    pub async fn current(&self) -> Option<Session> {
        let raw = self.store.get(SESSION_KEY).await?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!("discarding corrupt session record: {err}");
                self.store.delete(SESSION_KEY).await;
                None
            }
        }
    }

    /// Invoked once at startup.
    pub async fn restore(&self) -> Option<Session> {
        let session = self.current().await;
        match &session {
            Some(session) => debug!("restored session for {}", session.email),
            None => debug!("no persisted session to restore"),
        }
        session
    }

    async fn persist(&self, session: &Session) {
        match serde_json::to_string(session) {
            Ok(raw) => self.store.put(SESSION_KEY, raw).await,
            Err(err) => warn!("failed to serialize session record: {err}"),
        }
    }
}

/// `"somchai.p"` becomes `"Somchai P"`; an all-digit student id stays as-is.
fn title_case_local_part(local: &str) -> String {
    local
        .split('.')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
