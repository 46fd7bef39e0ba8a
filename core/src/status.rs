//! Boundary predicate separating success responses from error responses.

use std::ops::Range;

/// Status codes a call rejects on.
pub const ERROR_STATUS_RANGE: Range<u16> = 400..600;

/// True iff `400 <= code < 600`.
pub fn is_error_status(code: u16) -> bool {
    ERROR_STATUS_RANGE.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses() {
        for code in [400, 404, 450, 500, 599] {
            assert!(is_error_status(code), "{code} should be an error");
        }
    }

    #[test]
    fn non_error_statuses() {
        for code in [100, 200, 204, 301, 399, 600, 999] {
            assert!(!is_error_status(code), "{code} should not be an error");
        }
    }

    #[test]
    fn every_code_matches_the_range() {
        for code in 0..=u16::MAX {
            assert_eq!(is_error_status(code), (400..600).contains(&code));
        }
    }
}
