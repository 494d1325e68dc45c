use md5::{Digest, Md5};
use serde_json::json;
use tracing::{info, warn};

use super::types::EmailLookup;
use crate::error::ApiResult;
use crate::providers::{ProviderError, ReputationProvider};
use crate::validation::{require, validate_email};

const AVATAR_SIZE: u32 = 200;

/// Gravatar URL for an already-normalized address. Returns 404 upstream when no avatar exists.
pub fn gravatar_url(email: &str) -> String {
    let hash = hex::encode(Md5::digest(email.to_lowercase().as_bytes()));
    format!("https://www.gravatar.com/avatar/{}?s={}&d=404", hash, AVATAR_SIZE)
}

pub async fn lookup_email<R: ReputationProvider + ?Sized>(
    provider: &R,
    email: Option<&str>,
) -> ApiResult<EmailLookup> {
    let email = validate_email(require(email, "Email")?)?;

    info!(%email, "Email lookup started");

    let gravatar_url = gravatar_url(&email);

    let (reputation, reputation_error) = match provider.fetch_reputation(&email).await {
        Ok(data) => (Some(data), None),
        Err(ProviderError::NotFound) => (Some(unknown_reputation(&email)), None),
        Err(e) => {
            let message = describe_reputation_error(&e);
            warn!(%email, error = %message, "Email reputation unavailable");
            (None, Some(message))
        }
    };

    Ok(EmailLookup {
        success: true,
        email,
        gravatar_url,
        reputation,
        reputation_error,
    })
}

/// Neutral record used when the reputation service has never seen the address.
fn unknown_reputation(email: &str) -> serde_json::Value {
    json!({
        "email": email,
        "reputation": "unknown",
        "suspicious": false,
        "references": 0,
    })
}

fn describe_reputation_error(err: &ProviderError) -> String {
    match err {
        ProviderError::Timeout => "Emailrep API timeout".to_string(),
        ProviderError::Status(code) => format!("Emailrep API error: {}", code),
        ProviderError::NetworkError(detail) => format!("Emailrep API request error: {}", detail),
        other => format!("Unexpected error: {}", other),
    }
}
