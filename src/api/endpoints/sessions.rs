//! Form session endpoints: server-rendered page plus form posts.
//!
//! Every POST answers with a 303 redirect back to the session page
//! (post/redirect/get), so reloading never resubmits.

use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::Form;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::checker::{run_check, CheckError, CheckerState};
use crate::collector::CollectorError;
use crate::models::Severity;
use crate::render::render_page;

#[derive(Debug, Deserialize)]
pub struct AddSymptomForm {
    #[serde(default)]
    pub name: String,
    pub severity: Option<String>,
}

fn parse_session_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(format!("Session {raw} not found")))
}

fn session_page(id: &Uuid) -> Redirect {
    Redirect::to(&format!("/sessions/{id}"))
}

/// `GET /`: open a fresh form session.
pub async fn start(State(ctx): State<ApiContext>) -> Result<Redirect, ApiError> {
    let (id, _) = ctx.sessions.create()?;
    tracing::info!(session_id = %id, "Form session started");
    Ok(session_page(&id))
}

/// `GET /sessions/:id`: render the form and its current result panel.
pub async fn page(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let id = parse_session_id(&id)?;
    let checker = ctx.session(&id)?;
    let checker = checker.lock().await;
    Ok(Html(render_page(&id, &checker)))
}

/// `POST /sessions/:id/symptoms`: add one symptom.
///
/// A blank name adds nothing but keeps the chosen severity selected.
pub async fn add_symptom(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Form(form): Form<AddSymptomForm>,
) -> Result<Redirect, ApiError> {
    let id = parse_session_id(&id)?;
    let checker = ctx.session(&id)?;
    let mut checker = checker.lock().await;

    let severity = match form.severity.as_deref() {
        Some(raw) => raw
            .parse::<Severity>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => checker.collector().current_severity(),
    };

    let added = checker.add_symptom(&form.name, severity).map(|s| s.severity);
    match added {
        Ok(severity) => {
            tracing::debug!(session_id = %id, %severity, "Symptom added");
        }
        Err(CollectorError::BlankName) => checker.select_severity(severity)?,
        Err(e) => return Err(e.into()),
    }

    Ok(session_page(&id))
}

/// `POST /sessions/:id/symptoms/:index/remove`: remove by position.
pub async fn remove_symptom(
    State(ctx): State<ApiContext>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Redirect, ApiError> {
    let id = parse_session_id(&id)?;
    let checker = ctx.session(&id)?;
    let removed = checker.lock().await.remove_symptom(index)?;
    if removed.is_none() {
        tracing::debug!(session_id = %id, index, "Remove ignored, index out of range");
    }
    Ok(session_page(&id))
}

/// `POST /sessions/:id/check`: run the analysis and redirect once it ends.
///
/// An empty list redirects straight back; the page shows the message.
pub async fn check(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Redirect, ApiError> {
    let id = parse_session_id(&id)?;
    let checker = ctx.session(&id)?;

    match run_check(checker.clone(), ctx.analyzer.clone()).await {
        Ok(()) => {
            if let CheckerState::Success(result) = checker.lock().await.state() {
                if result.is_fallback() {
                    tracing::warn!(session_id = %id, "Session received fallback analysis");
                }
            }
        }
        Err(CheckError::NoSymptoms) => {
            tracing::debug!(session_id = %id, "Check refused, no symptoms");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(session_page(&id))
}
