//! # course-portal
//!
//! Session and page-routing core for a course enrollment portal.
//!
//! The crate keeps zero-or-one authenticated identity in durable key-value
//! storage, remembers a course a visitor tried to join before logging in,
//! and resolves navigation requests into the page the view layer renders.
//!
//! ## Features
//!
//! - **Session store**: login, logout and restore over pluggable storage,
//!   never failing the caller on a storage fault
//! - **Page router**: structured navigation with the legacy
//!   `course-details-<id>` token parsed at the boundary
//! - **Enrollment flow**: the login detour and coupon pricing
//! - **HTTP API**: the same operations over axum
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use course_portal::{Identity, MemoryStorage, Page, PageRouter, SessionStore};
//!
//! let session = SessionStore::new(Arc::new(MemoryStorage::new()));
//! session.restore();
//! session.login(Identity::new("1", "Asha", "asha@x.com"));
//!
//! let mut router = PageRouter::new();
//! router.navigate("course-details-plc-automation", None);
//! assert_eq!(router.current_page(), Page::CourseDetails);
//! assert_eq!(router.selected_entity_id(), "plc-automation");
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod enrollment;
pub mod error;
pub mod logging;
pub mod router;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use enrollment::{CouponBook, EnrollmentFlow, EnrollmentOutcome, Quote};
pub use error::{PortalError, Result};
pub use router::{Affordances, NavRequest, NavigationState, Page, PageRouter, Viewport};
pub use session::{Identity, IdentityPolicy, PersistedSession, Role, SessionStore};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};
