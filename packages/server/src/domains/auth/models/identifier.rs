//! Phone numbers with special handling at sign-in.

/// Reserved phone number that skips SMS delivery in debug builds.
pub const TEST_IDENTIFIER: &str = "+910000000000";

/// Fixed code accepted for [`TEST_IDENTIFIER`].
pub const TEST_CODE: &str = "123456";

/// Whether a normalized phone number is configured as an admin.
///
/// Entries in `ADMIN_PHONE_NUMBERS` are compared after stripping spaces so a
/// hand-edited list like `+91 98765 43210` still matches.
pub fn is_admin_identifier(phone_number: &str, admin_identifiers: &[String]) -> bool {
    admin_identifiers.iter().any(|admin| {
        let compact: String = admin.chars().filter(|c| !c.is_whitespace()).collect();
        compact == phone_number
    })
}

/// True only in debug builds, and only for the reserved number.
pub fn is_test_identifier(phone_number: &str) -> bool {
    cfg!(debug_assertions) && phone_number == TEST_IDENTIFIER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_admin_identifier_exact_match() {
        let admins = vec!["+919876543210".to_string(), "+15551234567".to_string()];

        assert!(is_admin_identifier("+919876543210", &admins));
        assert!(is_admin_identifier("+15551234567", &admins));
        assert!(!is_admin_identifier("+919876543211", &admins));
    }

    #[test]
    fn test_is_admin_identifier_ignores_spacing() {
        let admins = vec![" +91 98765 43210 ".to_string()];
        assert!(is_admin_identifier("+919876543210", &admins));
    }

    #[test]
    fn test_empty_admin_list() {
        assert!(!is_admin_identifier("+919876543210", &[]));
    }

    #[test]
    fn test_test_identifier_only_matches_reserved_number() {
        assert_eq!(is_test_identifier(TEST_IDENTIFIER), cfg!(debug_assertions));
        assert!(!is_test_identifier("+919876543210"));
    }
}
