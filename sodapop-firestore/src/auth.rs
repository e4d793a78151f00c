//! Anonymous Firebase sessions via the Identity Toolkit REST API.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use sodapop_core::{SodapopError, SodapopResult};

const SIGN_UP_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts:signUp";
const REFRESH_URL: &str = "https://securetoken.googleapis.com/v1/token";

/// Tokens are refreshed this long before they actually expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub uid: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn from_tokens(uid: String, id_token: String, refresh_token: String, expires_in: &str) -> Self {
        let expires_in = expires_in.parse::<i64>().unwrap_or(3600);
        Session {
            uid,
            id_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(expires_in),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= self.expires_at
    }

    /// Read a saved session. A missing or unreadable file means signed out.
    pub fn load(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {e}", path.display());
                None
            }
        }
    }

    pub fn save(&self, path: &Path) -> SodapopResult<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| SodapopError::Serialization(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;

        // Set to owner-only (0600) since file contains tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

/// Create a brand new anonymous account.
pub async fn sign_up(http: &reqwest::Client, api_key: &str) -> SodapopResult<Session> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct SignUpResponse {
        id_token: String,
        refresh_token: String,
        expires_in: String,
        local_id: String,
    }

    let response = http
        .post(SIGN_UP_URL)
        .query(&[("key", api_key)])
        .json(&serde_json::json!({ "returnSecureToken": true }))
        .send()
        .await
        .map_err(|e| SodapopError::Remote(format!("Failed to send sign-up request: {e}")))?;

    let body: SignUpResponse = read_json(response, "Anonymous sign-in failed").await?;
    info!("Signed in anonymously as {}", body.local_id);

    Ok(Session::from_tokens(
        body.local_id,
        body.id_token,
        body.refresh_token,
        &body.expires_in,
    ))
}

/// Exchange the refresh token for a fresh ID token.
pub async fn refresh(http: &reqwest::Client, api_key: &str, session: &Session) -> SodapopResult<Session> {
    #[derive(Deserialize)]
    struct RefreshResponse {
        id_token: String,
        refresh_token: String,
        expires_in: String,
        user_id: String,
    }

    let response = http
        .post(REFRESH_URL)
        .query(&[("key", api_key)])
        .json(&serde_json::json!({
            "grant_type": "refresh_token",
            "refresh_token": session.refresh_token,
        }))
        .send()
        .await
        .map_err(|e| SodapopError::Remote(format!("Failed to send token refresh request: {e}")))?;

    let body: RefreshResponse = read_json(response, "Token refresh failed").await?;

    Ok(Session::from_tokens(
        body.user_id,
        body.id_token,
        body.refresh_token,
        &body.expires_in,
    ))
}

/// Decode a successful JSON response, or turn the status and body into an error.
pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> SodapopResult<T> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(SodapopError::Remote(format!("{context}: {status} {error_text}")));
    }

    response
        .json()
        .await
        .map_err(|e| SodapopError::Remote(format!("{context}: invalid response: {e}")))
}

/// Where the CLI keeps the session between runs.
pub fn default_session_path(data_dir: &Path) -> PathBuf {
    data_dir.join("firebase-session.json")
}
