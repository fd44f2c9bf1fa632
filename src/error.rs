//! 统一错误类型
//!
//! 存储层、选题器与 HTTP 层各自的错误，以及它们到响应状态码的映射。

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// 数据库错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 记录不存在
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// SQLite 错误
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO 错误（创建数据目录等）
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 连接锁被污染
    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

/// 选题错误
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// 题目池为空
    #[error("No candidate questions")]
    NoCandidates,

    /// 题目池中的题目都已出过
    #[error("All candidate questions have already been asked")]
    Exhausted,
}

/// HTTP 层错误，渲染为 `{success: false, message, error}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Unprocessable: {0}")]
    Unprocessable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回给客户端的固定文案，不包含内部细节
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad request",
            ApiError::NotFound(_) => "resource not found",
            ApiError::MethodNotAllowed => "method not allowed",
            ApiError::Unprocessable(_) => "unprocessable",
            ApiError::Internal(_) => "internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Internal(_) | ApiError::Unprocessable(_) => log::warn!("{}", self),
            _ => log::debug!("{}", self),
        }

        let body = json!({
            "success": false,
            "message": self.message(),
            "error": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            StoreError::LockPoisoned => ApiError::Internal(e.to_string()),
            StoreError::Sqlite(_) | StoreError::Io(_) => ApiError::Unprocessable(e.to_string()),
        }
    }
}

impl From<SelectionError> for ApiError {
    fn from(e: SelectionError) -> Self {
        ApiError::Unprocessable(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

// 路径参数不是整数时视为资源不存在
impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        ApiError::NotFound(e.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
