//! 统一错误处理
//!
//! 错误类型定义在 `shared::error`，此处 re-export 并提供
//! 处理器常用的响应辅助函数。
//!
//! # 错误码规范
//!
//! | 范围 | 分类 | 示例 |
//! |------|------|------|
//! | 1xxx | 认证错误 | 1001 未登录 |
//! | 2xxx | 权限错误 | 2002 需要管理员 |
//! | 4xxx | 订单错误 | 4001 订单不存在 |
//! | 6xxx | 商品错误 | 6004 库存不足 |
//! | 9xxx | 系统错误 | 9002 数据库错误 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::new(ErrorCode::OrderNotFound))
//!
//! // 返回成功响应
//! Ok(ok(data))
//! ```

use axum::Json;
use serde::Serialize;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}
