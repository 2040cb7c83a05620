//! BaaS auth endpoints (`/auth/v1/*`)

use crate::shared::config::AppConfig;
use crate::shared::data::DataError;
use contracts::system::auth::{AuthErrorBody, AuthSession, LoginRequest, RefreshRequest};
use gloo_net::http::Request;
use serde::Serialize;

const INVALID_CREDENTIALS: &str = "E-mail ou senha inválidos";

/// Map a failed auth response. A rejected grant (400) means bad credentials
/// or an expired refresh token, never a missing session.
pub fn auth_error(status: u16, body: &str) -> DataError {
    if status == 400 {
        let parsed: AuthErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = match parsed.error.as_deref() {
            Some("invalid_grant") | None => INVALID_CREDENTIALS.to_string(),
            Some(_) => parsed
                .best_message()
                .unwrap_or_else(|| INVALID_CREDENTIALS.to_string()),
        };
        return DataError::Http { status, message };
    }
    DataError::from_status(status, body)
}

async fn token_grant<B: Serialize>(
    config: &AppConfig,
    grant_type: &str,
    body: &B,
) -> Result<AuthSession, DataError> {
    let url = config.auth_url(&format!("token?grant_type={}", grant_type));
    log::debug!("POST {}", url);

    let response = Request::post(&url)
        .header("apikey", &config.anon_key)
        .json(body)
        .map_err(|e| DataError::Decode(format!("serialize grant: {}", e)))?
        .send()
        .await
        .map_err(|e| {
            log::error!("auth request failed: {}", e);
            DataError::Network(e.to_string())
        })?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| DataError::Network(e.to_string()))?;
    if !(200..300).contains(&status) {
        log::warn!("{} grant rejected with {}", grant_type, status);
        return Err(auth_error(status, &text));
    }

    serde_json::from_str::<AuthSession>(&text).map_err(|e| DataError::Decode(e.to_string()))
}

/// Password login
pub async fn sign_in(config: &AppConfig, email: String, password: String) -> Result<AuthSession, DataError> {
    token_grant(config, "password", &LoginRequest { email, password }).await
}

/// Exchange a refresh token for a new session
pub async fn refresh_session(config: &AppConfig, refresh_token: String) -> Result<AuthSession, DataError> {
    token_grant(config, "refresh_token", &RefreshRequest { refresh_token }).await
}

/// Revoke the session server-side. Failures only get logged; the local
/// tokens are dropped either way.
pub async fn sign_out(config: &AppConfig, access_token: &str) {
    let url = config.auth_url("logout");
    let result = Request::post(&url)
        .header("apikey", &config.anon_key)
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await;
    if let Err(e) = result {
        log::warn!("logout request failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_credentials_message() {
        let err = auth_error(
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(
            err,
            DataError::Http {
                status: 400,
                message: INVALID_CREDENTIALS.to_string()
            }
        );
    }

    #[test]
    fn test_other_auth_errors() {
        let err = auth_error(400, r#"{"error":"validation_failed","msg":"Email not confirmed"}"#);
        assert_eq!(
            err,
            DataError::Http {
                status: 400,
                message: "Email not confirmed".to_string()
            }
        );
        assert_eq!(auth_error(401, ""), DataError::NotAuthenticated);
    }
}
