//! Enrollment on top of the session store and router.
//!
//! The session store records enrollments without judging them; this layer
//! owns the duplicate check, the login detour, and coupon pricing.

mod flow;
mod pricing;

pub use flow::{EnrollmentFlow, EnrollmentOutcome};
pub use pricing::{CouponBook, Quote};
