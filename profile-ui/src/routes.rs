//! HTTP route handlers for the session API.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, patch, post};
use profile::core::session::{Action, Mode, SessionState};
use profile::core::types::{Field, FieldEdit, FieldError, Notification};
use profile::io::profile_store::write_profile;
use profile::record::ProfileRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::state::{AppState, SessionEvent};

type ApiResult = Result<(StatusCode, Json<ActionResponse>), (StatusCode, String)>;

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/session", get(get_session))
        .route("/session/toggle-edit", post(toggle_edit))
        .route("/session/fields", patch(edit_field))
        .route("/session/save", post(save))
        .route("/session/cancel", post(cancel))
}

/// Session as seen by the form.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub mode: Mode,
    pub committed: ProfileRecord,
    pub draft: Option<ProfileRecord>,
    pub errors: Vec<FieldError>,
}

impl From<&SessionState> for SessionView {
    fn from(session: &SessionState) -> Self {
        Self {
            mode: session.mode,
            committed: session.committed.clone(),
            draft: session.draft.clone(),
            errors: session.field_errors(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    pub session: SessionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

/// Body of `PATCH /api/session/fields`; `null` clears the field.
#[derive(Debug, Deserialize)]
struct FieldInput {
    field: String,
    value: Option<String>,
}

async fn health() -> &'static str {
    "ok"
}

/// GET /api/session - current mode, snapshots and errors.
async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    let session = state.session.lock().await;
    Json(SessionView::from(&*session))
}

/// POST /api/session/toggle-edit - enter editing, or discard edits.
async fn toggle_edit(State(state): State<AppState>) -> ApiResult {
    apply(&state, Action::ToggleEdit).await
}

/// PATCH /api/session/fields - edit one draft field.
async fn edit_field(State(state): State<AppState>, Json(input): Json<FieldInput>) -> ApiResult {
    let field = Field::parse_key(&input.field).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("unknown field '{}'", input.field),
        )
    })?;
    let edit = FieldEdit::parse(field, input.value.as_deref().unwrap_or_default())
        .map_err(|err| (StatusCode::BAD_REQUEST, format!("{field}: {err}")))?;
    apply(&state, Action::EditField { edit }).await
}

/// POST /api/session/save - commit the draft, or 422 with field errors.
async fn save(State(state): State<AppState>) -> ApiResult {
    apply(&state, Action::Save).await
}

/// POST /api/session/cancel - discard the draft.
async fn cancel(State(state): State<AppState>) -> ApiResult {
    apply(&state, Action::Cancel).await
}

/// Run one transition under the session lock, persist commits, then publish events.
async fn apply(state: &AppState, action: Action) -> ApiResult {
    let label = action.label();
    let mut session = state.session.lock().await;
    let transition = session.dispatch(action, &state.validation, state.today());
    let summary = &transition.summary;

    if summary.ignored {
        return Err((
            StatusCode::CONFLICT,
            format!("{label} is not available while {}", summary.from.as_str()),
        ));
    }

    if summary.committed {
        if let Some(paths) = &state.paths {
            write_profile(&paths.profile_path, &transition.state.committed).map_err(|err| {
                warn!(error = %format!("{err:#}"), "failed to persist profile");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to persist profile".to_string(),
                )
            })?;
        }
    }

    debug!(
        action = label,
        from = summary.from.as_str(),
        to = summary.to.as_str(),
        errors = transition.state.errors.len(),
        "session transition"
    );
    let mode_changed = summary.from != summary.to;
    *session = transition.state;
    let view = SessionView::from(&*session);
    drop(session);

    if mode_changed {
        state.publish(SessionEvent::ModeChanged { mode: view.mode });
    }
    if let Some(notification) = &transition.notification {
        state.publish(SessionEvent::Notification(notification.clone()));
    }

    let status = match transition.notification {
        Some(Notification::Failure(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::OK,
    };
    Ok((
        status,
        Json(ActionResponse {
            session: view,
            notification: transition.notification,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use chrono::NaiveDate;
    use profile::core::session::Validation;
    use profile::io::init::{InitOptions, init_profile};
    use profile::io::profile_store::load_profile;
    use profile::record::default_profile;
    use tower::ServiceExt;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).expect("date")
    }

    fn app_state() -> AppState {
        AppState::new(
            SessionState::new(default_profile()),
            Validation::default(),
            None,
        )
        .with_today(Some(today()))
    }

    async fn call(state: &AppState, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, String) {
        let app = api_router().with_state(state.clone());
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .oneshot(request.body(body).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    fn parse(body: &str) -> ActionResponse {
        serde_json::from_str(body).expect("action response json")
    }

    #[tokio::test]
    async fn get_session_starts_viewing() {
        let state = app_state();
        let (status, body) = call(&state, "GET", "/session", None).await;
        assert_eq!(status, StatusCode::OK);
        let view: SessionView = serde_json::from_str(&body).expect("json");
        assert_eq!(view.mode, Mode::Viewing);
        assert!(view.draft.is_none());
    }

    /// Save before entering edit mode is a conflict, not a silent no-op.
    #[tokio::test]
    async fn save_while_viewing_conflicts() {
        let state = app_state();
        let (status, body) = call(&state, "POST", "/session/save", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, "save is not available while viewing");
    }

    #[tokio::test]
    async fn edit_then_save_commits_and_notifies() {
        let state = app_state();
        let mut events = state.event_tx.subscribe();

        let (status, _) = call(&state, "POST", "/session/toggle-edit", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = call(
            &state,
            "PATCH",
            "/session/fields",
            Some(r#"{"field":"username","value":"petrov"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(parse(&body).session.draft.expect("draft").username, "petrov");

        let (status, body) = call(&state, "POST", "/session/save", None).await;
        assert_eq!(status, StatusCode::OK);
        let response = parse(&body);
        assert_eq!(response.session.mode, Mode::Viewing);
        assert_eq!(response.session.committed.username, "petrov");
        assert_eq!(
            response.notification,
            Some(Notification::Success("Profile saved".to_string()))
        );

        assert!(matches!(
            events.try_recv(),
            Ok(SessionEvent::ModeChanged { mode: Mode::Editing })
        ));
        assert!(matches!(
            events.try_recv(),
            Ok(SessionEvent::ModeChanged { mode: Mode::Viewing })
        ));
        assert!(matches!(
            events.try_recv(),
            Ok(SessionEvent::Notification(Notification::Success(_)))
        ));
    }

    #[tokio::test]
    async fn invalid_save_returns_field_errors() {
        let state = app_state();
        call(&state, "POST", "/session/toggle-edit", None).await;
        call(
            &state,
            "PATCH",
            "/session/fields",
            Some(r#"{"field":"email","value":"broken"}"#),
        )
        .await;

        let (status, body) = call(&state, "POST", "/session/save", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let response = parse(&body);
        assert_eq!(response.session.mode, Mode::Editing);
        assert_eq!(response.session.errors.len(), 1);
        assert_eq!(response.session.errors[0].field, Field::Email);
    }

    #[tokio::test]
    async fn malformed_field_input_is_bad_request() {
        let state = app_state();
        call(&state, "POST", "/session/toggle-edit", None).await;
        let (status, body) = call(
            &state,
            "PATCH",
            "/session/fields",
            Some(r#"{"field":"experience","value":"lots"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.starts_with("experience: "));

        let (status, _) = call(
            &state,
            "PATCH",
            "/session/fields",
            Some(r#"{"field":"shoeSize","value":"42"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    /// With a project directory, a successful save is written to profile.json.
    #[tokio::test]
    async fn save_persists_when_project_initialized() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = init_profile(temp.path(), &InitOptions { force: false }).expect("init");
        let state = AppState::new(
            SessionState::new(default_profile()),
            Validation::default(),
            Some(paths.clone()),
        )
        .with_today(Some(today()));

        call(&state, "POST", "/session/toggle-edit", None).await;
        call(
            &state,
            "PATCH",
            "/session/fields",
            Some(r#"{"field":"notes","value":null}"#),
        )
        .await;
        let (status, _) = call(&state, "POST", "/session/save", None).await;
        assert_eq!(status, StatusCode::OK);

        let stored = load_profile(&paths.schema_path, &paths.profile_path).expect("load");
        assert_eq!(stored.notes, None);
    }
}
