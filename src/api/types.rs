//! API request and response types.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::enrollment::EnrollmentOutcome;
use crate::error::PortalError;
use crate::router::{Affordances, NavigationState, Page};
use crate::session::{Identity, SessionStore};

/// Current session as seen by the view layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    /// Whether an identity is live.
    pub authenticated: bool,
    /// The live identity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Identity>,
    /// Course remembered across the login detour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_enrollment: Option<String>,
    /// Header affordances for this session.
    pub affordances: Affordances,
}

impl SessionResponse {
    pub fn from_store(store: &SessionStore) -> Self {
        let user = store.identity();
        Self {
            authenticated: user.is_some(),
            user,
            pending_enrollment: store.pending_enrollment(),
            affordances: Affordances::for_session(store),
        }
    }
}

/// Request to set or clear the pending enrollment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PendingEnrollmentRequest {
    #[serde(default)]
    pub course_id: Option<String>,
}

/// Request to navigate.
///
/// `page` may be a plain page token or a legacy `course-details-<id>` token.
#[derive(Debug, Clone, Deserialize)]
pub struct NavigateRequest {
    pub page: String,
    #[serde(default)]
    pub id: Option<String>,
}

/// Navigation state as seen by the view layer.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationResponse {
    pub current_page: Page,
    /// Empty when no entity is selected.
    pub selected_entity_id: String,
}

impl NavigationResponse {
    pub fn from_state(state: &NavigationState) -> Self {
        Self {
            current_page: state.current_page(),
            selected_entity_id: state.selected_entity_id().to_string(),
        }
    }
}

/// Request to enroll in a course.
#[derive(Debug, Clone, Deserialize)]
pub struct EnrollRequest {
    pub course_id: String,
}

/// Result of an enrollment step plus where it left the visitor.
#[derive(Debug, Clone, Serialize)]
pub struct EnrollmentResponse {
    #[serde(flatten)]
    pub outcome: EnrollmentOutcome,
    pub navigation: NavigationResponse,
}

/// Request for a price quote.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    /// List price in minor units.
    pub list_price: u64,
    #[serde(default)]
    pub coupon: Option<String>,
}

/// Generic API error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "ALREADY_ENROLLED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn login_rejected() -> Self {
        Self::new("LOGIN_REJECTED", "Identity failed validation")
    }

    /// Map a portal error to a status code and response body.
    pub fn from_error(err: &PortalError) -> (StatusCode, Self) {
        let (status, code) = match err {
            PortalError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "NOT_AUTHENTICATED"),
            PortalError::AlreadyEnrolled(_) => (StatusCode::CONFLICT, "ALREADY_ENROLLED"),
            PortalError::InvalidCourse(_) => (StatusCode::BAD_REQUEST, "INVALID_COURSE"),
            PortalError::InvalidCoupon(_) => (StatusCode::BAD_REQUEST, "INVALID_COUPON"),
            PortalError::InvalidIdentity(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_IDENTITY")
            }
            PortalError::UnknownPage(_) => (StatusCode::NOT_FOUND, "UNKNOWN_PAGE"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        (status, Self::new(code, err.to_string()))
    }
}
