//! Session storage and management.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::identity::{Identity, IdentityPolicy};
use super::token::generate_token;
use crate::storage::{keys, KeyValueStore};

/// In-memory view of the live session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SessionData {
    identity: Option<Identity>,
    token: Option<String>,
    pending_enrollment: Option<String>,
}

/// A session record as it currently sits in durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSession {
    pub identity: Identity,
    pub token: Option<String>,
}

/// Zero-or-one authenticated identity plus the pending-enrollment marker.
///
/// Every public operation is infallible from the caller's point of view:
/// storage faults are logged and absorbed, and a stored identity that fails
/// the [`IdentityPolicy`] is discarded instead of trusted.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    policy: IdentityPolicy,
    state: RwLock<SessionData>,
}

impl SessionStore {
    /// Create a store over `storage` with the default identity policy.
    ///
    /// The store starts empty; call [`restore`](Self::restore) to load a
    /// previously persisted session.
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_policy(storage, IdentityPolicy::default())
    }

    /// Create a store with a custom identity policy.
    pub fn with_policy(storage: Arc<dyn KeyValueStore>, policy: IdentityPolicy) -> Self {
        Self {
            storage,
            policy,
            state: RwLock::new(SessionData::default()),
        }
    }

    /// The identity policy in force.
    pub fn policy(&self) -> &IdentityPolicy {
        &self.policy
    }

    /// Reload identity and pending enrollment from durable storage.
    ///
    /// Replaces whatever is held in memory. A stored identity that is
    /// corrupt or fails the policy is removed from storage. Returns the
    /// restored identity, if any.
    pub fn restore(&self) -> Option<Identity> {
        let identity = self.load_identity();
        let token = match identity {
            Some(_) => self.read(keys::TOKEN),
            None => None,
        };
        let pending_enrollment = self
            .read(keys::PENDING_ENROLLMENT)
            .filter(|id| !id.trim().is_empty());

        match &identity {
            Some(identity) => tracing::debug!(user = %identity.id, "Session restored"),
            None => tracing::debug!("No stored session"),
        }

        *self.state_mut() = SessionData {
            identity: identity.clone(),
            token,
            pending_enrollment,
        };
        identity
    }

    /// Start a session for an already-authenticated identity.
    ///
    /// Invalid identities are rejected with a warning and leave the store
    /// untouched. Returns whether the identity was accepted. The pending
    /// enrollment marker is left for the caller to consume.
    pub fn login(&self, identity: Identity) -> bool {
        if let Err(e) = self.policy.validate(&identity) {
            tracing::warn!(error = %e, "Login rejected");
            return false;
        }

        let token = generate_token();
        match serde_json::to_string(&identity) {
            Ok(json) => {
                self.write(keys::USER, &json);
                self.write(keys::TOKEN, &token);
            }
            Err(e) => tracing::warn!(error = %e, "Failed to encode identity"),
        }
        // The canonical record supersedes any copies left by older builds.
        self.erase(keys::STUDENT_USER);
        self.erase(keys::STUDENT_TOKEN);

        tracing::info!(user = %identity.id, role = %identity.role, "Logged in");

        let mut state = self.state_mut();
        state.identity = Some(identity);
        state.token = Some(token);
        true
    }

    /// End the session and clear every session key from storage.
    ///
    /// Safe to call when nobody is logged in.
    pub fn logout(&self) {
        let previous = std::mem::take(&mut *self.state_mut());
        for key in keys::SESSION_KEYS {
            self.erase(key);
        }

        if let Some(identity) = previous.identity {
            tracing::info!(user = %identity.id, "Logged out");
        }
    }

    /// Set or clear the course awaiting authentication.
    ///
    /// Blank ids are treated as `None`.
    pub fn set_pending_enrollment(&self, course_id: Option<&str>) {
        let course_id = course_id.map(str::trim).filter(|id| !id.is_empty());
        match course_id {
            Some(id) => self.write(keys::PENDING_ENROLLMENT, id),
            None => self.erase(keys::PENDING_ENROLLMENT),
        }
        self.state_mut().pending_enrollment = course_id.map(str::to_string);
    }

    /// Consume the pending enrollment marker.
    pub fn take_pending_enrollment(&self) -> Option<String> {
        let pending = self.state_mut().pending_enrollment.take();
        if pending.is_some() {
            self.erase(keys::PENDING_ENROLLMENT);
        }
        pending
    }

    /// The course awaiting authentication, if any.
    pub fn pending_enrollment(&self) -> Option<String> {
        self.state().pending_enrollment.clone()
    }

    /// Append `course_id` to the live identity's enrollments.
    ///
    /// Does not check for duplicates. Returns `false` when nobody is
    /// logged in.
    pub fn add_enrollment(&self, course_id: &str) -> bool {
        let identity = {
            let mut state = self.state_mut();
            let Some(identity) = state.identity.as_mut() else {
                return false;
            };
            identity.enrolled_courses.push(course_id.to_string());
            identity.clone()
        };

        match serde_json::to_string(&identity) {
            Ok(json) => self.write(keys::USER, &json),
            Err(e) => tracing::warn!(error = %e, "Failed to encode identity"),
        }
        tracing::info!(user = %identity.id, course = %course_id, "Enrollment recorded");
        true
    }

    /// Clone of the live identity.
    pub fn identity(&self) -> Option<Identity> {
        self.state().identity.clone()
    }

    /// The live session token.
    pub fn token(&self) -> Option<String> {
        self.state().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().identity.is_some()
    }

    /// Read the stored session without touching in-memory state.
    ///
    /// Serves every storage consumer from the canonical `user`/`token`
    /// record, falling back to the legacy student copies.
    ///
    /// This is the only supported way to read the student session. Login
    /// no longer writes `studentUser`/`studentToken`, so readers of those
    /// raw keys see nothing once a session is created or migrated.
    pub fn persisted_session(&self) -> Option<PersistedSession> {
        let raw = self
            .read(keys::USER)
            .or_else(|| self.read(keys::STUDENT_USER))?;
        let identity = serde_json::from_str::<Identity>(&raw).ok()?;
        if !self.policy.is_valid(&identity) {
            return None;
        }
        let token = self
            .read(keys::TOKEN)
            .or_else(|| self.read(keys::STUDENT_TOKEN));
        Some(PersistedSession { identity, token })
    }

    fn load_identity(&self) -> Option<Identity> {
        let (key, raw) = match self.read(keys::USER) {
            Some(raw) => (keys::USER, raw),
            None => (keys::STUDENT_USER, self.read(keys::STUDENT_USER)?),
        };

        let identity = match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding corrupt stored identity");
                self.clear_identity_keys();
                return None;
            }
        };

        if let Err(e) = self.policy.validate(&identity) {
            tracing::warn!(key, error = %e, "Discarding invalid stored identity");
            self.clear_identity_keys();
            return None;
        }

        if key == keys::STUDENT_USER {
            self.migrate_legacy(&raw);
        }
        Some(identity)
    }

    fn migrate_legacy(&self, raw_identity: &str) {
        tracing::info!("Migrating legacy student session keys");
        self.write(keys::USER, raw_identity);
        if let Some(token) = self.read(keys::STUDENT_TOKEN) {
            self.write(keys::TOKEN, &token);
        }
        self.erase(keys::STUDENT_USER);
        self.erase(keys::STUDENT_TOKEN);
    }

    fn clear_identity_keys(&self) {
        for key in [keys::USER, keys::TOKEN, keys::STUDENT_USER, keys::STUDENT_TOKEN] {
            self.erase(key);
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        self.storage.get(key).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "Storage read failed");
            None
        })
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            tracing::warn!(key, error = %e, "Storage write failed");
        }
    }

    fn erase(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            tracing::warn!(key, error = %e, "Storage remove failed");
        }
    }

    fn state(&self) -> RwLockReadGuard<'_, SessionData> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, SessionData> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("policy", &self.policy)
            .field("state", &*self.state())
            .finish_non_exhaustive()
    }
}
