// HTTP 接口模块
// 提供供前端调用的 REST 接口

pub mod categories;
pub mod questions;
pub mod quizzes;

use crate::error::ApiError;

/// 路径存在但方法不支持
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// 未知路径
pub async fn not_found() -> ApiError {
    ApiError::NotFound("no such route".to_string())
}
