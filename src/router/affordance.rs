//! Session-dependent navigation affordances.

use serde::Serialize;

use super::Page;
use crate::session::SessionStore;

/// What the header offers the visitor given their session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Affordances {
    /// Where the account link leads.
    pub account_page: Page,
    /// Label for the account link.
    pub account_label: &'static str,
    /// Whether a logout control is shown.
    pub show_logout: bool,
}

impl Affordances {
    pub fn for_session(session: &SessionStore) -> Self {
        if session.is_authenticated() {
            Self {
                account_page: Page::Dashboard,
                account_label: "Dashboard",
                show_logout: true,
            }
        } else {
            Self {
                account_page: Page::Login,
                account_label: "Login",
                show_logout: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Identity;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    #[test]
    fn test_affordances_follow_session() {
        let session = SessionStore::new(Arc::new(MemoryStorage::new()));

        let anonymous = Affordances::for_session(&session);
        assert_eq!(anonymous.account_page, Page::Login);
        assert!(!anonymous.show_logout);

        session.login(Identity::new("1", "Asha", "asha@x.com"));
        let signed_in = Affordances::for_session(&session);
        assert_eq!(signed_in.account_page, Page::Dashboard);
        assert_eq!(signed_in.account_label, "Dashboard");
        assert!(signed_in.show_logout);
    }
}
