//! Enrollment across the login detour.

use serde::Serialize;

use crate::error::PortalError;
use crate::router::{Page, PageRouter};
use crate::session::SessionStore;
use crate::Result;

/// What an enrollment step achieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EnrollmentOutcome {
    /// The course was added to the session's enrollments.
    Enrolled { course_id: String },
    /// The visitor must log in first; the course is remembered.
    AwaitingLogin { course_id: String },
    /// There was no remembered course to resume.
    NothingPending,
}

/// Drives an enrollment through the session store and the router.
///
/// Borrows both for the duration of one user action.
pub struct EnrollmentFlow<'a> {
    session: &'a SessionStore,
    router: &'a mut PageRouter,
}

impl<'a> EnrollmentFlow<'a> {
    pub fn new(session: &'a SessionStore, router: &'a mut PageRouter) -> Self {
        Self { session, router }
    }

    /// Ask to join `course_id`.
    ///
    /// Logged-in visitors are enrolled and sent to the dashboard. Anonymous
    /// visitors get the course remembered as pending and are sent to login.
    pub fn begin(&mut self, course_id: &str) -> Result<EnrollmentOutcome> {
        let course_id = normalize(course_id)?;

        match self.session.identity() {
            Some(identity) => {
                if identity.is_enrolled_in(&course_id) {
                    return Err(PortalError::AlreadyEnrolled(course_id));
                }
                self.session.add_enrollment(&course_id);
                self.router.navigate_to(Page::Dashboard.into());
                Ok(EnrollmentOutcome::Enrolled { course_id })
            }
            None => {
                tracing::info!(course = %course_id, "Enrollment deferred until login");
                self.session.set_pending_enrollment(Some(&course_id));
                self.router.navigate_to(Page::Login.into());
                Ok(EnrollmentOutcome::AwaitingLogin { course_id })
            }
        }
    }

    /// Finish a deferred enrollment right after authentication.
    ///
    /// The pending marker is consumed even when the course turns out to be
    /// a duplicate, so a stale marker cannot loop.
    pub fn resume_after_login(&mut self) -> Result<EnrollmentOutcome> {
        let identity = self
            .session
            .identity()
            .ok_or(PortalError::NotAuthenticated)?;

        let pending = self.session.take_pending_enrollment();
        self.router.navigate_to(Page::Dashboard.into());

        let Some(course_id) = pending else {
            return Ok(EnrollmentOutcome::NothingPending);
        };
        if identity.is_enrolled_in(&course_id) {
            return Err(PortalError::AlreadyEnrolled(course_id));
        }
        self.session.add_enrollment(&course_id);
        Ok(EnrollmentOutcome::Enrolled { course_id })
    }

    /// Drop the pending course and go back to the catalog.
    pub fn continue_without_enrolling(&mut self) {
        self.session.set_pending_enrollment(None);
        self.router.navigate_to(Page::Courses.into());
    }
}

fn normalize(course_id: &str) -> Result<String> {
    let trimmed = course_id.trim();
    if trimmed.is_empty() {
        return Err(PortalError::InvalidCourse(course_id.to_string()));
    }
    Ok(trimmed.to_string())
}
