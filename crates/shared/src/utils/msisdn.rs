/// Normalizes a phone number to the 62-prefixed form. `08xxxx` becomes
/// `628xxxx`; anything non-numeric or shorter than 10 digits is rejected.
pub fn normalize_msisdn(input: &str) -> Option<String> {
    let trimmed = input.trim();

    let msisdn = if let Some(rest) = trimmed.strip_prefix("08") {
        format!("628{rest}")
    } else {
        trimmed.to_string()
    };

    if msisdn.len() >= 10 && msisdn.chars().all(|c| c.is_ascii_digit()) {
        Some(msisdn)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_local_prefix() {
        assert_eq!(
            normalize_msisdn("081234567890").as_deref(),
            Some("6281234567890")
        );
    }

    #[test]
    fn keeps_international_prefix() {
        assert_eq!(
            normalize_msisdn("6281234567890").as_deref(),
            Some("6281234567890")
        );
    }

    #[test]
    fn rejects_short_or_non_numeric() {
        assert_eq!(normalize_msisdn("0812345"), None);
        assert_eq!(normalize_msisdn("08abc4567890"), None);
    }
}
