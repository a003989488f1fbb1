use crate::error::{AppError, AppResult};

/// Lightweight email shape check: one '@' with a non-empty local part and a
/// dotted domain. Deliverability is the mail provider's problem.
pub fn validate_email(email: &str) -> AppResult<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(|c| c.is_whitespace())
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid email: {}", email)))
    }
}

/// Phone numbers: 9-11 digits, optional leading '+'.
pub fn validate_phone(phone: &str) -> AppResult<()> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);

    if (9..=11).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid phone number: {}", phone)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_emails() {
        assert!(validate_email("an.nguyen@example.com").is_ok());
        assert!(validate_email("a@b.co").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("user name@example.com").is_err());
    }

    #[test]
    fn accepts_local_and_international_phones() {
        assert!(validate_phone("0912345678").is_ok());
        assert!(validate_phone("+84912345678").is_ok());
    }

    #[test]
    fn rejects_malformed_phones() {
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("09123456789012").is_err());
        assert!(validate_phone("09-1234-5678").is_err());
    }
}
