//! Password length policy for new passwords.

use handsoft_core::config::AuthConfig;
use handsoft_core::error::AppError;

/// Validates new passwords against the configured length bounds.
///
/// Lengths are counted in characters, not bytes.
#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    min_length: usize,
    max_length: usize,
}

impl PasswordPolicy {
    /// Creates a new policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            max_length: config.password_max_length,
        }
    }

    /// Returns an error describing the violated bound, if any.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        let len = password.chars().count();
        if len < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }
        if len > self.max_length {
            return Err(AppError::validation(format!(
                "Password must be at most {} characters long",
                self.max_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_bounds() {
        let policy = PasswordPolicy::new(&AuthConfig::default());

        assert!(policy.validate("1234567").is_err());
        assert!(policy.validate("12345678").is_ok());
        assert!(policy.validate(&"x".repeat(72)).is_ok());
        assert!(policy.validate(&"x".repeat(73)).is_err());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let policy = PasswordPolicy::new(&AuthConfig::default());
        assert!(policy.validate("ñandúñan").is_ok());
    }
}
