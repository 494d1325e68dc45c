use super::ValidationError;

pub fn validate_username(raw: &str) -> Result<String, ValidationError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(ValidationError::EmptyUsername);
    }
    Ok(username.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_trimmed() {
        assert_eq!(validate_username("  octocat \n"), Ok("octocat".to_string()));
    }

    #[test]
    fn test_whitespace_only_rejected() {
        assert_eq!(validate_username(" \t "), Err(ValidationError::EmptyUsername));
    }
}
