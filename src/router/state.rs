//! Navigation state and the page router.

use serde::Serialize;

use super::{NavRequest, Page};

/// Side effects a navigation has on the visible viewport.
pub trait Viewport: Send + Sync {
    /// Reset the scroll position to the top of the page.
    fn scroll_to_top(&self);
}

/// Viewport with nothing to scroll.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopViewport;

impl Viewport for NoopViewport {
    fn scroll_to_top(&self) {
        tracing::trace!("scroll to top");
    }
}

/// Which page is shown and which entity it shows.
///
/// A selected entity only exists while a detail page is current.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    current_page: Page,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected_entity_id: Option<String>,
}

impl NavigationState {
    pub fn current_page(&self) -> Page {
        self.current_page
    }

    /// The selected entity id, or `""` when nothing is selected.
    pub fn selected_entity_id(&self) -> &str {
        self.selected_entity_id.as_deref().unwrap_or("")
    }

    pub fn selection(&self) -> Option<&str> {
        self.selected_entity_id.as_deref()
    }
}

impl From<NavRequest> for NavigationState {
    fn from(request: NavRequest) -> Self {
        match request {
            NavRequest::Page { page } => Self {
                current_page: page,
                selected_entity_id: None,
            },
            NavRequest::CourseDetails { id } => Self {
                current_page: Page::CourseDetails,
                selected_entity_id: Some(id),
            },
        }
    }
}

/// Maps navigation requests to the page/selection pair views render from.
///
/// Flat state machine: every page can reach every other page, the initial
/// page is [`Page::Home`] and there is no terminal page.
pub struct PageRouter {
    state: NavigationState,
    viewport: Box<dyn Viewport>,
}

impl PageRouter {
    /// Create a router on the home page.
    pub fn new() -> Self {
        Self::with_viewport(NoopViewport)
    }

    /// Create a router that scrolls `viewport` on every navigation.
    pub fn with_viewport(viewport: impl Viewport + 'static) -> Self {
        Self {
            state: NavigationState::default(),
            viewport: Box::new(viewport),
        }
    }

    /// Navigate by page token, with an optional explicit entity id.
    ///
    /// Unknown tokens land on the home page.
    pub fn navigate(&mut self, token: &str, explicit_id: Option<&str>) -> &NavigationState {
        self.navigate_to(NavRequest::parse(token, explicit_id))
    }

    /// Navigate with an already-structured request.
    pub fn navigate_to(&mut self, request: NavRequest) -> &NavigationState {
        self.state = NavigationState::from(request);
        self.viewport.scroll_to_top();

        tracing::debug!(
            page = %self.state.current_page,
            entity = self.state.selected_entity_id(),
            "Navigated"
        );
        &self.state
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn current_page(&self) -> Page {
        self.state.current_page
    }

    /// The selected entity id, or `""` when nothing is selected.
    pub fn selected_entity_id(&self) -> &str {
        self.state.selected_entity_id()
    }
}

impl Default for PageRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PageRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRouter")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct CountingViewport(Arc<AtomicUsize>);

    impl Viewport for CountingViewport {
        fn scroll_to_top(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_initial_state() {
        let router = PageRouter::new();
        assert_eq!(router.current_page(), Page::Home);
        assert_eq!(router.selected_entity_id(), "");
        assert!(router.state().selection().is_none());
    }

    #[test]
    fn test_both_addressing_schemes_converge() {
        for id in ["plc-automation", "scada", "a-b-c", "42", " plc-automation", "plc ", "  ", ""] {
            let mut explicit = PageRouter::new();
            let mut legacy = PageRouter::new();

            let a = explicit.navigate("course-details", Some(id)).clone();
            let b = legacy
                .navigate(&format!("course-details-{}", id), None)
                .clone();

            assert_eq!(a, b);
            assert_eq!(a.current_page(), Page::CourseDetails);
            assert_eq!(a.selected_entity_id(), id);
        }
    }

    #[test]
    fn test_non_detail_page_clears_selection() {
        let mut router = PageRouter::new();
        for page in Page::ALL.into_iter().filter(|p| !p.is_detail()) {
            router.navigate("course-details", Some("scada"));
            router.navigate(page.as_str(), Some("scada"));
            assert_eq!(router.current_page(), page);
            assert_eq!(router.selected_entity_id(), "");
        }
    }

    #[test]
    fn test_unknown_token_goes_home() {
        let mut router = PageRouter::new();
        router.navigate("courses", None);
        router.navigate("no-such-page", None);
        assert_eq!(router.current_page(), Page::Home);
        assert_eq!(router.selected_entity_id(), "");
    }

    #[test]
    fn test_navigation_sequence() {
        let mut router = PageRouter::new();
        router.navigate("courses", None);
        router.navigate("course-details-plc-automation", None);
        assert_eq!(router.selected_entity_id(), "plc-automation");

        let state = router.navigate("about", None);
        assert_eq!(state.current_page(), Page::About);
        assert_eq!(state.selected_entity_id(), "");
    }

    #[test]
    fn test_every_navigation_scrolls() {
        let viewport = CountingViewport::default();
        let mut router = PageRouter::with_viewport(viewport.clone());

        router.navigate("courses", None);
        router.navigate("bogus", None);
        router.navigate_to(NavRequest::course("scada"));

        assert_eq!(viewport.0.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_state_serialization() {
        let mut router = PageRouter::new();
        router.navigate("course-details", Some("scada"));

        let json = serde_json::to_value(router.state()).unwrap();
        assert_eq!(json["current_page"], "course-details");
        assert_eq!(json["selected_entity_id"], "scada");

        router.navigate("home", None);
        let json = serde_json::to_value(router.state()).unwrap();
        assert!(json.get("selected_entity_id").is_none());
    }
}
