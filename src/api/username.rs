use tracing::{error, info, warn};

use super::types::UsernameLookup;
use crate::error::{ApiError, ApiResult, FailureBody};
use crate::providers::sherlock::parse_found_profiles;
use crate::providers::{ProfileScanner, ProviderError};
use crate::validation::{require, validate_username};

const NOTE_STDERR_CHARS: usize = 100;
const RAW_OUTPUT_CHARS: usize = 500;

/// Runs the profile enumeration tool for one username and parses its report.
pub async fn lookup_username<S: ProfileScanner + ?Sized>(
    scanner: &S,
    username: Option<&str>,
) -> ApiResult<UsernameLookup> {
    let username = validate_username(require(username, "Username")?)?;

    info!(%username, "Starting Sherlock search");

    let output = match scanner.scan(&username).await {
        Ok(output) => output,
        Err(ProviderError::Timeout) => {
            warn!(%username, "Sherlock timeout");
            return Err(ApiError::Upstream(
                FailureBody::new("Sherlock execution timed out").with_username(&username),
            ));
        }
        Err(e) => {
            error!(%username, error = %e, "Unexpected error in Sherlock");
            return Err(ApiError::Upstream(
                FailureBody::new(format!("Unexpected error: {}", e)).with_username(&username),
            ));
        }
    };

    if !output.success {
        error!(%username, stderr = %output.stderr, "Sherlock failed");
        return Ok(UsernameLookup {
            success: true,
            username,
            results: Vec::new(),
            total_found: 0,
            note: Some(format!(
                "Sherlock execution failed: {}...",
                truncate_chars(&output.stderr, NOTE_STDERR_CHARS)
            )),
        });
    }

    let text = match String::from_utf8(output.stdout) {
        Ok(text) => text,
        Err(e) => {
            error!(%username, error = %e, "Failed to parse Sherlock output");
            let raw = String::from_utf8_lossy(e.as_bytes());
            return Err(ApiError::Upstream(
                FailureBody::new("Failed to parse Sherlock results")
                    .with_username(&username)
                    .with_raw_output(truncate_chars(&raw, RAW_OUTPUT_CHARS)),
            ));
        }
    };

    let results = parse_found_profiles(&text);
    info!(%username, found = results.len(), "Sherlock completed successfully");

    Ok(UsernameLookup {
        success: true,
        username,
        total_found: results.len(),
        results,
        note: None,
    })
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
