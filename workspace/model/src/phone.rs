//! Phone number validation for lead records.

/// Checks that `raw` parses as a valid phone number.
/// No default country is assumed, so numbers must carry an international
/// prefix, e.g. `+972541096752`.
pub fn is_valid_phone(raw: &str) -> bool {
    match phonenumber::parse(None, raw) {
        Ok(number) => phonenumber::is_valid(&number),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_international_numbers() {
        assert!(is_valid_phone("+972541096752"));
        assert!(is_valid_phone("+14155552671"));
    }

    #[test]
    fn test_rejects_numbers_without_prefix() {
        assert!(!is_valid_phone("0987654321"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(!is_valid_phone("not-a-phone"));
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("+1"));
    }
}
