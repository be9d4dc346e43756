//! Authentication Handlers
//!
//! Handles registration, login, OAuth sign-in and token management

use std::time::Duration;

use axum::{Json, extract::State};

use crate::AppError;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{User, UserRole};
use crate::db::repository::UserRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, MIN_PASSWORD_LEN, validate_email, validate_optional_text,
};
use shared::ErrorCode;
use shared::util::now_millis;

// Re-use shared DTOs for API consistency
use shared::client::{LoginRequest, LoginResponse, OAuthLoginRequest, RegisterRequest, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Register handler
///
/// Creates a customer account and returns a JWT token
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    validate_email(&req.email)?;
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    if req.password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation("password is too long"));
    }
    validate_optional_text(&req.display_name, "display_name", MAX_NAME_LEN)?;

    let repo = UserRepository::new(state.get_db());
    if repo.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::new(ErrorCode::EmailExists));
    }

    let hash = User::hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))?;

    let display_name = req
        .display_name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| req.email.split('@').next().unwrap_or("customer").to_string());

    let user = repo
        .create(User {
            id: None,
            email: req.email,
            display_name,
            hash_pass: Some(hash),
            role: UserRole::Customer,
            oauth_provider: None,
            oauth_subject: None,
            is_active: true,
            created_at: now_millis(),
        })
        .await?;

    tracing::info!(email = %user.email, "Customer registered");
    issue_token(&state, &user)
}

/// Login handler
///
/// Authenticates user credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let repo = UserRepository::new(state.get_db());
    let email = req.email.clone();

    let user = repo.find_by_email(&email).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Check authentication result - unified error message to prevent
    // account enumeration
    let user = match user {
        Some(u) => {
            if !u.is_active {
                return Err(AppError::new(ErrorCode::AccountDisabled));
            }
            if u.hash_pass.is_none() {
                // OAuth 账号没有本地密码
                return Err(AppError::new(ErrorCode::OAuthAccountNoPassword));
            }

            let password_valid = u
                .verify_password(&req.password)
                .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;

            if !password_valid {
                tracing::warn!(email = %email, "Login failed - invalid credentials");
                return Err(AppError::invalid_credentials());
            }

            u
        }
        None => {
            tracing::warn!(email = %email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    tracing::info!(
        user_id = %crate::api::convert::id_string(&user.id),
        email = %user.email,
        "User logged in successfully"
    );

    issue_token(&state, &user)
}

/// Google OAuth sign-in handler
///
/// Verifies the ID token, then finds or creates the matching account
pub async fn oauth_google(
    State(state): State<ServerState>,
    Json(req): Json<OAuthLoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let profile = state.oauth.verify(&req.id_token).await?;

    let repo = UserRepository::new(state.get_db());

    // 1. Existing OAuth identity
    if let Some(user) = repo.find_by_oauth("google", &profile.subject).await? {
        if !user.is_active {
            return Err(AppError::new(ErrorCode::AccountDisabled));
        }
        return issue_token(&state, &user);
    }

    // 2. Same email registered locally: link the OAuth identity is a
    //    product decision we don't take silently; reject instead.
    if repo.find_by_email(&profile.email).await?.is_some() {
        return Err(AppError::new(ErrorCode::EmailExists)
            .with_detail("reason", "email already registered with a password"));
    }

    // 3. First sign-in: create the account
    let display_name = profile
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| {
            profile
                .email
                .split('@')
                .next()
                .unwrap_or("customer")
                .to_string()
        });

    let user = repo
        .create(User {
            id: None,
            email: profile.email.clone(),
            display_name,
            hash_pass: None,
            role: UserRole::Customer,
            oauth_provider: Some("google".to_string()),
            oauth_subject: Some(profile.subject.clone()),
            is_active: true,
            created_at: now_millis(),
        })
        .await?;

    tracing::info!(email = %user.email, "Customer registered via Google OAuth");
    issue_token(&state, &user)
}

/// Get current user info
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<UserInfo>, AppError> {
    // Query fresh user data so blocks take effect before token expiry
    let repo = UserRepository::new(state.get_db());
    let fresh = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    Ok(Json(fresh.to_user_info()))
}

/// Logout handler
///
/// 无状态 JWT 下登出只做审计日志；令牌由客户端丢弃。
pub async fn logout(user: CurrentUser) -> Result<Json<()>, AppError> {
    tracing::info!(
        user_id = %user.id,
        email = %user.email,
        "User logged out"
    );

    Ok(Json(()))
}

fn issue_token(state: &ServerState, user: &User) -> Result<Json<LoginResponse>, AppError> {
    let user_id = crate::api::convert::id_string(&user.id);
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.email, &user.display_name, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        user: user.to_user_info(),
    }))
}
