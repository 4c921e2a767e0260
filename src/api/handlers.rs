//! REST API handlers.

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use axum::{extract::State, http::StatusCode, Json};

use super::types::{
    EnrollRequest, EnrollmentResponse, ErrorResponse, NavigateRequest, NavigationResponse,
    PendingEnrollmentRequest, QuoteRequest, SessionResponse,
};
use crate::config::{Config, ConfigError};
use crate::enrollment::{CouponBook, EnrollmentFlow, Quote};
use crate::error::PortalError;
use crate::router::PageRouter;
use crate::session::{Identity, SessionStore};
use crate::storage::MemoryStorage;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionStore>,
    pub router: Arc<RwLock<PageRouter>>,
    pub coupons: Arc<CouponBook>,
}

impl AppState {
    /// State over in-memory storage with default policy and no coupons.
    pub fn new() -> Self {
        Self::from_parts(
            SessionStore::new(Arc::new(MemoryStorage::new())),
            CouponBook::new(),
        )
    }

    pub fn from_parts(session: SessionStore, coupons: CouponBook) -> Self {
        Self {
            session: Arc::new(session),
            router: Arc::new(RwLock::new(PageRouter::new())),
            coupons: Arc::new(coupons),
        }
    }

    /// Build state from configuration and restore any persisted session.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let session = SessionStore::with_policy(config.open_storage()?, config.identity_policy());
        session.restore();
        Ok(Self::from_parts(session, config.coupon_book()))
    }

    fn router(&self) -> RwLockWriteGuard<'_, PageRouter> {
        self.router.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn api_error(err: PortalError) -> ApiError {
    let (status, body) = ErrorResponse::from_error(&err);
    (status, Json(body))
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

/// API information endpoint.
pub async fn api_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "course-portal",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// Current session.
pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse::from_store(&state.session))
}

/// Start a session for an identity.
pub async fn login(
    State(state): State<AppState>,
    Json(identity): Json<Identity>,
) -> Result<Json<SessionResponse>, ApiError> {
    if let Err(e) = state.session.policy().validate(&identity) {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::login_rejected().with_details(e.to_string())),
        ));
    }

    state.session.login(identity);
    Ok(Json(SessionResponse::from_store(&state.session)))
}

/// End the session.
pub async fn logout(State(state): State<AppState>) -> StatusCode {
    state.session.logout();
    StatusCode::NO_CONTENT
}

/// Reload the session from storage.
pub async fn restore_session(State(state): State<AppState>) -> Json<SessionResponse> {
    state.session.restore();
    Json(SessionResponse::from_store(&state.session))
}

/// Set or clear the pending enrollment.
pub async fn set_pending_enrollment(
    State(state): State<AppState>,
    Json(req): Json<PendingEnrollmentRequest>,
) -> Json<SessionResponse> {
    state.session.set_pending_enrollment(req.course_id.as_deref());
    Json(SessionResponse::from_store(&state.session))
}

/// Current navigation state.
pub async fn get_navigation(State(state): State<AppState>) -> Json<NavigationResponse> {
    let router = state.router();
    Json(NavigationResponse::from_state(router.state()))
}

/// Navigate to a page.
pub async fn navigate(
    State(state): State<AppState>,
    Json(req): Json<NavigateRequest>,
) -> Json<NavigationResponse> {
    let mut router = state.router();
    let nav = router.navigate(&req.page, req.id.as_deref());
    Json(NavigationResponse::from_state(nav))
}

/// Enroll in a course, deferring through login when anonymous.
pub async fn enroll(
    State(state): State<AppState>,
    Json(req): Json<EnrollRequest>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let mut router = state.router();
    let outcome = EnrollmentFlow::new(&state.session, &mut router)
        .begin(&req.course_id)
        .map_err(api_error)?;

    Ok(Json(EnrollmentResponse {
        outcome,
        navigation: NavigationResponse::from_state(router.state()),
    }))
}

/// Complete the pending enrollment after login.
pub async fn resume_enrollment(
    State(state): State<AppState>,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let mut router = state.router();
    let outcome = EnrollmentFlow::new(&state.session, &mut router)
        .resume_after_login()
        .map_err(api_error)?;

    Ok(Json(EnrollmentResponse {
        outcome,
        navigation: NavigationResponse::from_state(router.state()),
    }))
}

/// Continue without enrolling.
pub async fn discard_pending_enrollment(
    State(state): State<AppState>,
) -> Json<NavigationResponse> {
    let mut router = state.router();
    EnrollmentFlow::new(&state.session, &mut router).continue_without_enrolling();
    Json(NavigationResponse::from_state(router.state()))
}

/// Price a course with an optional coupon.
pub async fn quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<Quote>, ApiError> {
    state
        .coupons
        .quote(req.list_price, req.coupon.as_deref())
        .map(Json)
        .map_err(api_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::Page;

    #[test]
    fn test_app_state_new() {
        let state = AppState::new();
        assert!(!state.session.is_authenticated());
        assert_eq!(state.router().current_page(), Page::Home);
        assert!(state.coupons.is_empty());
    }

    #[test]
    fn test_app_state_from_config_restores() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.path = Some(dir.path().join("state.json"));

        let first = AppState::from_config(&config).unwrap();
        first.session.login(Identity::new("1", "Asha", "asha@x.com"));

        let second = AppState::from_config(&config).unwrap();
        assert_eq!(second.session.identity().unwrap().name, "Asha");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(health().await, "OK");
    }

    #[test]
    fn test_api_info_endpoint() {
        let json = tokio_test::block_on(api_info()).0;
        assert_eq!(json["name"], "course-portal");
        assert_eq!(json["status"], "running");
    }

    #[tokio::test]
    async fn test_login_rejects_demo_identity() {
        let state = AppState::new();
        let result = login(
            State(state.clone()),
            Json(Identity::new("9", "Demo", "demo@example.com")),
        )
        .await;

        let (status, body) = result.unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.0.code, "LOGIN_REJECTED");
        assert!(!state.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_navigate_handler() {
        let state = AppState::new();
        let resp = navigate(
            State(state.clone()),
            Json(NavigateRequest {
                page: "course-details-scada".into(),
                id: None,
            }),
        )
        .await;
        assert_eq!(resp.0.current_page, Page::CourseDetails);
        assert_eq!(resp.0.selected_entity_id, "scada");
    }
}
