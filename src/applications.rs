use std::sync::Arc;

use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::warn;

use crate::catalog::Catalog;
use crate::session::STUDENT_EMAIL_DOMAIN;
use crate::status::ApplicationStatus;
use crate::store::SharedStore;

pub const APPLICATIONS_KEY: &str = "ansxtra_applications";

const MOTIVATION_MIN: usize = 50;
const MOTIVATION_MAX: usize = 1000;
const EXPERIENCE_MAX: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub name: String,
    pub email: String,
    pub grade: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answers {
    pub motivation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(default)]
    pub availability: Vec<String>,
}

/// A stored application. The applicant block and `club_name` are snapshots
/// taken at submission time; `list` re-resolves the club name against the
/// catalog so a renamed club shows its current name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub club_id: String,
    pub club_name: String,
    pub applicant: Applicant,
    pub answers: Answers,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub club_id: String,
    pub applicant: Applicant,
    pub answers: Answers,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    #[error("the club does not exist")]
    UnknownClub,
    #[error("{0} is not accepting applications")]
    ClubClosed(String),
    #[error("the application does not exist")]
    NotFound,
    #[error("{0}")]
    Invalid(String),
}

/// Client-side stand-in for a backend: the full list of applications lives
/// under one key in the [`SharedStore`]. Every mutation reads the whole
/// collection, applies one change and writes the collection back, holding a
/// lock for the duration so callers never observe a partial write.
#[derive(Clone)]
pub struct ApplicationRepo {
    store: SharedStore,
    catalog: Arc<Catalog>,
    write_lock: Arc<Mutex<()>>,
}

impl ApplicationRepo {
    pub fn new(store: SharedStore, catalog: Arc<Catalog>) -> ApplicationRepo {
        ApplicationRepo {
            store,
            catalog,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// All applications for one applicant, club names refreshed from the
    /// catalog. An empty or unreadable collection is an empty list, never an
    /// error.
    pub async fn list(&self, email: &str) -> Vec<Application> {
        self.load()
            .await
            .into_iter()
            .filter(|application| application.applicant.email == email)
            .map(|mut application| {
                if let Some(club) = self.catalog.club_by_id(&application.club_id) {
                    application.club_name = club.name.clone();
                }
                application
            })
            .collect()
    }

    /// Submits an application. The club must exist and be accepting
    /// applications. At most one application per (club, applicant email)
    /// pair is kept: resubmitting replaces the earlier record in place
    /// instead of rejecting or duplicating.
    pub async fn create(&self, payload: NewApplication) -> Result<Application, ApplicationError> {
        let club = self
            .catalog
            .club_by_id(&payload.club_id)
            .ok_or(ApplicationError::UnknownClub)?;
        if !club.accepting_applications {
            return Err(ApplicationError::ClubClosed(club.name.clone()));
        }
        validate(&payload)?;

        let application = Application {
            id: nanoid!(),
            club_id: club.id.clone(),
            club_name: club.name.clone(),
            applicant: payload.applicant,
            answers: payload.answers,
            status: ApplicationStatus::Submitted,
            submitted_at: Utc::now(),
            updated_at: None,
        };

        let _guard = self.write_lock.lock().await;
        let mut applications = self.load().await;
        let existing = applications.iter().position(|a| {
            a.club_id == application.club_id && a.applicant.email == application.applicant.email
        });
        match existing {
            Some(index) => applications[index] = application.clone(),
            None => applications.push(application.clone()),
        }
        self.save(&applications).await;
        Ok(application)
    }

    /// Sets the status of a known application and stamps `updated_at`. An
    /// unknown id is a reported failure, not a silent no-op.
    pub async fn update_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<Application, ApplicationError> {
        self.mutate(id, |application| application.status = status)
            .await
    }

    /// The demo "simulate status change" action: one step around the status
    /// cycle.
    pub async fn advance(&self, id: &str) -> Result<Application, ApplicationError> {
        self.mutate(id, |application| {
            application.status = application.status.advance()
        })
        .await
    }

    /// Withdraws an application. Returns whether a record was actually
    /// removed; a miss is not an error.
    pub async fn delete(&self, id: &str) -> bool {
        let _guard = self.write_lock.lock().await;
        let mut applications = self.load().await;
        let before = applications.len();
        applications.retain(|application| application.id != id);
        if applications.len() == before {
            return false;
        }
        self.save(&applications).await;
        true
    }

    /// The single application for a (club, applicant email) pair, if any.
    /// Used by the apply flow to short-circuit re-submission.
    pub async fn find_existing(&self, club_id: &str, email: &str) -> Option<Application> {
        self.load()
            .await
            .into_iter()
            .find(|application| {
                application.club_id == club_id && application.applicant.email == email
            })
    }

    async fn mutate(
        &self,
        id: &str,
        apply: impl FnOnce(&mut Application),
    ) -> Result<Application, ApplicationError> {
        let _guard = self.write_lock.lock().await;
        let mut applications = self.load().await;
        let application = applications
            .iter_mut()
            .find(|application| application.id == id)
            .ok_or(ApplicationError::NotFound)?;
        apply(application);
        application.updated_at = Some(Utc::now());
        let updated = application.clone();
        self.save(&applications).await;
        Ok(updated)
    }

    async fn load(&self) -> Vec<Application> {
        let Some(raw) = self.store.get(APPLICATIONS_KEY).await else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(applications) => applications,
            Err(err) => {
                warn!("discarding corrupt application list: {err}");
                Vec::new()
            }
        }
    }

    async fn save(&self, applications: &[Application]) {
        match serde_json::to_string(applications) {
            Ok(raw) => self.store.put(APPLICATIONS_KEY, raw).await,
            Err(err) => warn!("failed to serialize application list: {err}"),
        }
    }
}

fn validate(payload: &NewApplication) -> Result<(), ApplicationError> {
    if payload.applicant.name.trim().is_empty() {
        return Err(ApplicationError::Invalid(
            "full name is required".to_string(),
        ));
    }
    if !payload.applicant.email.ends_with(STUDENT_EMAIL_DOMAIN) {
        return Err(ApplicationError::Invalid(format!(
            "email must end with {STUDENT_EMAIL_DOMAIN}"
        )));
    }
    if payload.applicant.grade.trim().is_empty() {
        return Err(ApplicationError::Invalid(
            "grade level is required".to_string(),
        ));
    }
    let motivation = payload.answers.motivation.trim().chars().count();
    if motivation < MOTIVATION_MIN {
        return Err(ApplicationError::Invalid(format!(
            "motivation must be at least {MOTIVATION_MIN} characters"
        )));
    }
    if motivation > MOTIVATION_MAX {
        return Err(ApplicationError::Invalid(format!(
            "motivation cannot exceed {MOTIVATION_MAX} characters"
        )));
    }
    if let Some(experience) = &payload.answers.experience {
        if experience.chars().count() > EXPERIENCE_MAX {
            return Err(ApplicationError::Invalid(format!(
                "experience cannot exceed {EXPERIENCE_MAX} characters"
            )));
        }
    }
    Ok(())
}
