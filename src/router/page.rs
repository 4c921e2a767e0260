//! The fixed set of pages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PortalError;

/// A page the portal can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    #[default]
    Home,
    Courses,
    CourseDetails,
    Enroll,
    Login,
    Signup,
    Dashboard,
    About,
    Contact,
    Careers,
    Terms,
    Refund,
    PrivacyPolicy,
}

impl Page {
    /// Every page, in menu order.
    pub const ALL: [Page; 13] = [
        Page::Home,
        Page::Courses,
        Page::CourseDetails,
        Page::Enroll,
        Page::Login,
        Page::Signup,
        Page::Dashboard,
        Page::About,
        Page::Contact,
        Page::Careers,
        Page::Terms,
        Page::Refund,
        Page::PrivacyPolicy,
    ];

    /// The page token used by views and URLs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Courses => "courses",
            Page::CourseDetails => "course-details",
            Page::Enroll => "enroll",
            Page::Login => "login",
            Page::Signup => "signup",
            Page::Dashboard => "dashboard",
            Page::About => "about",
            Page::Contact => "contact",
            Page::Careers => "careers",
            Page::Terms => "terms",
            Page::Refund => "refund",
            Page::PrivacyPolicy => "privacy-policy",
        }
    }

    /// Whether the page displays a selected entity.
    pub fn is_detail(&self) -> bool {
        matches!(self, Page::CourseDetails)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .iter()
            .copied()
            .find(|page| page.as_str() == s)
            .ok_or_else(|| PortalError::UnknownPage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_roundtrip() {
        for page in Page::ALL {
            assert_eq!(page.as_str().parse::<Page>().unwrap(), page);
        }
    }

    #[test]
    fn test_serde_matches_tokens() {
        for page in Page::ALL {
            let json = serde_json::to_string(&page).unwrap();
            assert_eq!(json, format!("\"{}\"", page.as_str()));
        }
    }

    #[test]
    fn test_unknown_page() {
        let err = "pricing".parse::<Page>().unwrap_err();
        assert!(matches!(err, PortalError::UnknownPage(ref p) if p == "pricing"));
        // Tokens are case-sensitive.
        assert!("Home".parse::<Page>().is_err());
    }

    #[test]
    fn test_only_course_details_is_detail() {
        let details: Vec<Page> = Page::ALL.into_iter().filter(Page::is_detail).collect();
        assert_eq!(details, vec![Page::CourseDetails]);
    }

    #[test]
    fn test_default_is_home() {
        assert_eq!(Page::default(), Page::Home);
    }
}
