//! API layer for course-portal.
//!
//! This module exposes the session store, page router and enrollment flow
//! to a view layer over HTTP.
//!
//! ## Endpoints
//!
//! ### Health & Info
//! - `GET /health` - Health check
//! - `GET /api/v1` - API information
//!
//! ### Session
//! - `GET /api/v1/session` - Current session and header affordances
//! - `POST /api/v1/session/login` - Start a session for an identity
//! - `POST /api/v1/session/logout` - End the session
//! - `POST /api/v1/session/restore` - Reload the session from storage
//! - `PUT /api/v1/session/pending-enrollment` - Set or clear the pending course
//!
//! ### Navigation
//! - `GET /api/v1/navigation` - Current page and selected entity
//! - `POST /api/v1/navigation` - Navigate (`{"page": ..., "id": ...}`)
//!
//! ### Enrollment
//! - `POST /api/v1/enrollments` - Enroll, or defer until login
//! - `POST /api/v1/enrollments/resume` - Finish a deferred enrollment
//! - `DELETE /api/v1/enrollments/pending` - Continue without enrolling
//! - `POST /api/v1/quote` - Price a course with an optional coupon
//!
//! ## Example
//!
//! ```no_run
//! use course_portal::api::{ServerConfig, serve};
//!
//! #[tokio::main]
//! async fn main() -> course_portal::Result<()> {
//!     let config = ServerConfig::new("127.0.0.1", 3000);
//!     serve(config).await
//! }
//! ```

pub mod handlers;
pub mod router;
pub mod types;

// Re-export commonly used types
pub use handlers::AppState;
pub use router::{create_router, create_router_with_state, serve, serve_with_state, ServerConfig};
pub use types::{
    EnrollRequest, EnrollmentResponse, ErrorResponse, NavigateRequest, NavigationResponse,
    PendingEnrollmentRequest, QuoteRequest, SessionResponse,
};
