//! Structured navigation requests.

use serde::{Deserialize, Serialize};

use super::Page;

/// Prefix of the legacy single-string course detail token.
pub const LEGACY_COURSE_PREFIX: &str = "course-details-";

/// One navigation intent.
///
/// Both course addressing schemes, `("course-details", id)` and the legacy
/// `"course-details-<id>"`, parse to [`NavRequest::CourseDetails`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NavRequest {
    /// A page without a selected entity.
    Page { page: Page },
    /// The detail page of one course.
    CourseDetails { id: String },
}

impl NavRequest {
    /// Parse a page token and optional explicit id.
    ///
    /// Never fails: a token that names no page resolves to [`Page::Home`].
    /// Ids are taken verbatim in both forms; an empty id means the detail
    /// page with nothing selected.
    pub fn parse(token: &str, explicit_id: Option<&str>) -> Self {
        let id = if token == Page::CourseDetails.as_str() {
            explicit_id
        } else {
            token.strip_prefix(LEGACY_COURSE_PREFIX)
        };

        if let Some(id) = id {
            return match id {
                "" => NavRequest::from(Page::CourseDetails),
                id => NavRequest::course(id),
            };
        }

        match token.parse::<Page>() {
            Ok(page) => NavRequest::Page { page },
            Err(_) => {
                tracing::debug!(token, "Unknown page token, falling back to home");
                NavRequest::Page { page: Page::Home }
            }
        }
    }

    /// Request for a course detail page.
    pub fn course(id: impl Into<String>) -> Self {
        NavRequest::CourseDetails { id: id.into() }
    }

    /// The page this request shows.
    pub fn page(&self) -> Page {
        match self {
            NavRequest::Page { page } => *page,
            NavRequest::CourseDetails { .. } => Page::CourseDetails,
        }
    }

    /// The selected entity, if the request carries one.
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            NavRequest::Page { .. } => None,
            NavRequest::CourseDetails { id } => Some(id),
        }
    }
}

impl From<Page> for NavRequest {
    fn from(page: Page) -> Self {
        NavRequest::Page { page }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_id_form() {
        let req = NavRequest::parse("course-details", Some("plc-automation"));
        assert_eq!(req, NavRequest::course("plc-automation"));
    }

    #[test]
    fn test_legacy_form() {
        let req = NavRequest::parse("course-details-plc-automation", None);
        assert_eq!(req, NavRequest::course("plc-automation"));
    }

    #[test]
    fn test_legacy_form_ignores_explicit_id() {
        let req = NavRequest::parse("course-details-scada", Some("hmi"));
        assert_eq!(req.entity_id(), Some("scada"));
    }

    #[test]
    fn test_detail_without_id() {
        let req = NavRequest::parse("course-details", None);
        assert_eq!(req.page(), Page::CourseDetails);
        assert_eq!(req.entity_id(), None);

        let empty = NavRequest::parse("course-details", Some(""));
        assert_eq!(empty, req);
    }

    #[test]
    fn test_empty_legacy_id_matches_explicit_form() {
        assert_eq!(
            NavRequest::parse("course-details-", None),
            NavRequest::parse("course-details", Some(""))
        );
        assert_eq!(
            NavRequest::parse("course-details-", None).page(),
            Page::CourseDetails
        );
    }

    #[test]
    fn test_ids_are_not_trimmed() {
        let explicit = NavRequest::parse("course-details", Some(" plc "));
        let legacy = NavRequest::parse("course-details- plc ", None);
        assert_eq!(explicit, legacy);
        assert_eq!(explicit.entity_id(), Some(" plc "));
    }

    #[test]
    fn test_plain_page_drops_id() {
        let req = NavRequest::parse("about", Some("plc-automation"));
        assert_eq!(req, NavRequest::from(Page::About));
        assert_eq!(req.entity_id(), None);
    }

    #[test]
    fn test_unknown_token_is_home() {
        assert_eq!(NavRequest::parse("webinars", None).page(), Page::Home);
        assert_eq!(NavRequest::parse("", None).page(), Page::Home);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(NavRequest::course("scada")).unwrap();
        assert_eq!(json["kind"], "course-details");
        assert_eq!(json["id"], "scada");

        let parsed: NavRequest =
            serde_json::from_str(r#"{"kind":"page","page":"privacy-policy"}"#).unwrap();
        assert_eq!(parsed.page(), Page::PrivacyPolicy);
    }
}
