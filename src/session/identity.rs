//! Authenticated identity and its validity policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PortalError;

/// Default sentinel address left over from the demo account.
pub const DEMO_EMAIL: &str = "demo@example.com";

/// Account role. Informational only; nothing in the portal enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Admin,
    Instructor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
            Role::Instructor => "instructor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            "instructor" => Ok(Role::Instructor),
            other => Err(PortalError::InvalidIdentity(format!("unknown role '{}'", other))),
        }
    }
}

/// The identity held by a live session.
///
/// Field names follow the stored JSON layout (`enrolledCourses`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub enrolled_courses: Vec<String>,
}

impl Identity {
    /// Create a student identity with no enrollments.
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: Role::Student,
            enrolled_courses: Vec::new(),
        }
    }

    /// Builder-style role override.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Whether `course_id` is in the enrollment list.
    pub fn is_enrolled_in(&self, course_id: &str) -> bool {
        self.enrolled_courses.iter().any(|c| c == course_id)
    }
}

/// Validity rules shared by login and restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityPolicy {
    blocked_emails: Vec<String>,
}

impl Default for IdentityPolicy {
    fn default() -> Self {
        Self::new([DEMO_EMAIL])
    }
}

impl IdentityPolicy {
    /// Create a policy that rejects the given email addresses.
    pub fn new<I, S>(blocked_emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            blocked_emails: blocked_emails
                .into_iter()
                .map(|e| e.as_ref().trim().to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// A policy that only checks required fields.
    pub fn permissive() -> Self {
        Self {
            blocked_emails: Vec::new(),
        }
    }

    /// Blocked addresses, normalised to lowercase.
    pub fn blocked_emails(&self) -> &[String] {
        &self.blocked_emails
    }

    /// Check an identity, returning the reason it is rejected.
    pub fn validate(&self, identity: &Identity) -> Result<(), PortalError> {
        if identity.id.trim().is_empty() {
            return Err(PortalError::InvalidIdentity("missing id".into()));
        }
        if identity.name.trim().is_empty() {
            return Err(PortalError::InvalidIdentity("missing name".into()));
        }
        let email = identity.email.trim().to_ascii_lowercase();
        if email.is_empty() {
            return Err(PortalError::InvalidIdentity("missing email".into()));
        }
        if self.blocked_emails.contains(&email) {
            return Err(PortalError::InvalidIdentity(format!(
                "blocked email '{}'",
                identity.email
            )));
        }
        Ok(())
    }

    pub fn is_valid(&self, identity: &Identity) -> bool {
        self.validate(identity).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asha() -> Identity {
        Identity::new("1", "Asha", "asha@x.com")
    }

    #[test]
    fn test_identity_json_layout() {
        let mut identity = asha();
        identity.enrolled_courses.push("plc-automation".into());

        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["role"], "student");
        assert_eq!(json["enrolledCourses"][0], "plc-automation");
    }

    #[test]
    fn test_identity_missing_optional_fields() {
        let identity: Identity =
            serde_json::from_str(r#"{"id":"7","name":"Ravi","email":"ravi@x.com"}"#).unwrap();
        assert_eq!(identity.role, Role::Student);
        assert!(identity.enrolled_courses.is_empty());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("instructor".parse::<Role>().unwrap(), Role::Instructor);
        assert!("owner".parse::<Role>().is_err());
        assert_eq!(Role::Instructor.to_string(), "instructor");
    }

    #[test]
    fn test_policy_accepts_complete_identity() {
        assert!(IdentityPolicy::default().is_valid(&asha()));
    }

    #[test]
    fn test_policy_rejects_missing_fields() {
        let policy = IdentityPolicy::default();

        let mut no_id = asha();
        no_id.id = "  ".into();
        assert!(!policy.is_valid(&no_id));

        let mut no_name = asha();
        no_name.name.clear();
        assert!(!policy.is_valid(&no_name));

        let mut no_email = asha();
        no_email.email.clear();
        assert!(!policy.is_valid(&no_email));
    }

    #[test]
    fn test_policy_blocks_demo_email_case_insensitive() {
        let policy = IdentityPolicy::default();
        let demo = Identity::new("9", "Demo", "Demo@Example.com");

        let err = policy.validate(&demo).unwrap_err();
        assert!(err.to_string().contains("blocked"));
    }

    #[test]
    fn test_permissive_policy_allows_demo() {
        let demo = Identity::new("9", "Demo", DEMO_EMAIL);
        assert!(IdentityPolicy::permissive().is_valid(&demo));
        assert!(IdentityPolicy::permissive().blocked_emails().is_empty());
    }

    #[test]
    fn test_is_enrolled_in() {
        let mut identity = asha();
        assert!(!identity.is_enrolled_in("plc-automation"));
        identity.enrolled_courses.push("plc-automation".into());
        assert!(identity.is_enrolled_in("plc-automation"));
    }
}
