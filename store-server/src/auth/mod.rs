//! 认证模块
//!
//! - [`jwt`] - JWT 令牌服务与 [`CurrentUser`]
//! - [`middleware`] - 认证/管理员中间件
//! - [`extractor`] - 处理器参数里的 CurrentUser 提取器
//! - [`oauth`] - Google OAuth ID token 核验

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod oauth;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use oauth::{GoogleProfile, GoogleVerifier};
