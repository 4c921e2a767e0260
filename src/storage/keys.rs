//! Storage key layout.

/// Canonical JSON-encoded identity.
pub const USER: &str = "user";

/// Canonical opaque session token.
pub const TOKEN: &str = "token";

/// Legacy identity copy written by older builds of the student dashboard.
pub const STUDENT_USER: &str = "studentUser";

/// Legacy token copy written by older builds of the student dashboard.
pub const STUDENT_TOKEN: &str = "studentToken";

/// Bare course id of an enrollment awaiting authentication.
pub const PENDING_ENROLLMENT: &str = "pendingEnrollment";

/// Every key owned by a session; all of them are cleared on logout.
pub const SESSION_KEYS: [&str; 5] = [USER, TOKEN, STUDENT_USER, STUDENT_TOKEN, PENDING_ENROLLMENT];
