//! Google OAuth ID-token verification
//!
//! 前端完成 OAuth 授权后把 ID token 交给本服务；服务端通过 Google 的
//! tokeninfo 端点核验签名与受众，再 find-or-create 本地账号。
//! 这里只做令牌核验，不做授权码流程。

use serde::Deserialize;

use crate::utils::{AppError, AppResult, ErrorCode};

const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Verified Google identity
#[derive(Debug, Clone)]
pub struct GoogleProfile {
    /// Stable Google subject id
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
}

/// tokeninfo 响应中本服务关心的字段
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: String,
    /// Google 以字符串 "true"/"false" 返回
    #[serde(default)]
    email_verified: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Google OAuth verifier
#[derive(Debug, Clone)]
pub struct GoogleVerifier {
    client: reqwest::Client,
    client_id: String,
    endpoint: String,
}

impl GoogleVerifier {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.into(),
            endpoint: GOOGLE_TOKENINFO_URL.to_string(),
        }
    }

    /// Override the verification endpoint (测试用)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Verify an ID token and extract the Google profile
    pub async fn verify(&self, id_token: &str) -> AppResult<GoogleProfile> {
        if self.client_id.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                "GOOGLE_CLIENT_ID is not configured",
            ));
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| {
                AppError::with_message(ErrorCode::NetworkError, format!("tokeninfo request: {e}"))
            })?;

        if !response.status().is_success() {
            security_warn("tokeninfo rejected the token");
            return Err(AppError::new(ErrorCode::OAuthVerificationFailed));
        }

        let info: TokenInfo = response.json().await.map_err(|e| {
            AppError::with_message(
                ErrorCode::OAuthVerificationFailed,
                format!("tokeninfo parse: {e}"),
            )
        })?;

        // 受众必须是我们自己的 client_id，否则是发给别家的令牌
        if info.aud != self.client_id {
            security_warn("audience mismatch");
            return Err(AppError::new(ErrorCode::OAuthVerificationFailed));
        }
        if info.email_verified.as_deref() != Some("true") {
            security_warn("email not verified");
            return Err(AppError::new(ErrorCode::OAuthVerificationFailed));
        }

        Ok(GoogleProfile {
            subject: info.sub,
            email: info.email,
            name: info.name,
        })
    }
}

fn security_warn(reason: &str) {
    crate::security_log!("WARN", "oauth_verification_failed", reason = reason);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokeninfo_parsing() {
        let json = r#"{
            "aud": "client-1.apps.googleusercontent.com",
            "sub": "1093759234",
            "email": "ana@example.com",
            "email_verified": "true",
            "name": "Ana"
        }"#;
        let info: TokenInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.sub, "1093759234");
        assert_eq!(info.email_verified.as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn test_missing_client_id_is_config_error() {
        let verifier = GoogleVerifier::new("");
        let err = verifier.verify("token").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }
}
