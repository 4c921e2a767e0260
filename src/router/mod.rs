//! Page routing.
//!
//! Translates navigation requests into the `(page, selected entity)` pair
//! the view layer branches on. Course detail pages can be addressed either
//! as `("course-details", id)` or with the legacy `"course-details-<id>"`
//! token; both are parsed at the boundary into one [`NavRequest`].

mod affordance;
mod page;
mod request;
mod state;

pub use affordance::Affordances;
pub use page::Page;
pub use request::{NavRequest, LEGACY_COURSE_PREFIX};
pub use state::{NavigationState, NoopViewport, PageRouter, Viewport};
