//! Coupon discounts for the enrollment form.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::PortalError;
use crate::Result;

/// Price breakdown shown on the payment step. Amounts are in minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub list_price: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<String>,
    pub percent_off: u8,
    pub discount: u64,
    pub total: u64,
}

/// Known coupon codes and their percentage discounts.
///
/// Codes are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponBook {
    coupons: HashMap<String, u8>,
}

impl CouponBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a book from `code -> percent` pairs. Percentages above 100 are
    /// capped at 100.
    pub fn from_map<I, S>(coupons: I) -> Self
    where
        I: IntoIterator<Item = (S, u8)>,
        S: AsRef<str>,
    {
        let mut book = Self::new();
        for (code, percent) in coupons {
            book.insert(code.as_ref(), percent);
        }
        book
    }

    pub fn insert(&mut self, code: &str, percent_off: u8) {
        let code = normalize(code);
        if code.is_empty() {
            return;
        }
        self.coupons.insert(code, percent_off.min(100));
    }

    pub fn percent_off(&self, code: &str) -> Option<u8> {
        self.coupons.get(&normalize(code)).copied()
    }

    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }

    /// Price `list_price` with an optional coupon. A blank coupon counts as
    /// none; an unknown one is an error.
    pub fn quote(&self, list_price: u64, coupon: Option<&str>) -> Result<Quote> {
        let coupon = coupon.map(normalize).filter(|c| !c.is_empty());

        let percent_off = match &coupon {
            Some(code) => self
                .coupons
                .get(code)
                .copied()
                .ok_or_else(|| PortalError::InvalidCoupon(code.clone()))?,
            None => 0,
        };

        let discount = (u128::from(list_price) * u128::from(percent_off) / 100) as u64;
        Ok(Quote {
            list_price,
            coupon,
            percent_off,
            discount,
            total: list_price - discount,
        })
    }
}

fn normalize(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> CouponBook {
        CouponBook::from_map([("welcome10", 10), ("FULLRIDE", 250)])
    }

    #[test]
    fn test_quote_without_coupon() {
        let quote = book().quote(49_900, None).unwrap();
        assert_eq!(quote.discount, 0);
        assert_eq!(quote.total, 49_900);
        assert!(quote.coupon.is_none());
    }

    #[test]
    fn test_quote_with_coupon_case_insensitive() {
        let quote = book().quote(49_900, Some(" Welcome10 ")).unwrap();
        assert_eq!(quote.coupon.as_deref(), Some("WELCOME10"));
        assert_eq!(quote.percent_off, 10);
        assert_eq!(quote.discount, 4_990);
        assert_eq!(quote.total, 44_910);
    }

    #[test]
    fn test_discount_rounds_down() {
        let quote = book().quote(999, Some("WELCOME10")).unwrap();
        assert_eq!(quote.discount, 99);
        assert_eq!(quote.total, 900);
    }

    #[test]
    fn test_percent_capped() {
        let book = book();
        assert_eq!(book.percent_off("fullride"), Some(100));
        let quote = book.quote(u64::MAX, Some("fullride")).unwrap();
        assert_eq!(quote.total, 0);
    }

    #[test]
    fn test_unknown_coupon() {
        let err = book().quote(1_000, Some("BOGUS")).unwrap_err();
        assert!(matches!(err, PortalError::InvalidCoupon(ref c) if c == "BOGUS"));
    }

    #[test]
    fn test_blank_coupon_is_none() {
        let quote = book().quote(1_000, Some("  ")).unwrap();
        assert_eq!(quote.total, 1_000);
    }

    #[test]
    fn test_blank_code_not_inserted() {
        let mut book = CouponBook::new();
        book.insert(" ", 5);
        assert!(book.is_empty());
        assert_eq!(CouponBook::from_map([("A", 1), ("b", 2)]).len(), 2);
    }
}
