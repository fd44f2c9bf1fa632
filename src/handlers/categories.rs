//! 分类相关接口

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::{Category, Question};

/// GET /categories 响应
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: BTreeMap<i64, String>,
}

/// GET /categories/{id}/questions 响应
#[derive(Debug, Serialize)]
pub struct CategoryQuestionsResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: String,
}

/// 分类列表转为 `{id: type}`
pub fn category_map(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

/// 获取所有分类
pub async fn get_categories(State(state): State<AppState>) -> ApiResult<Json<CategoriesResponse>> {
    let categories = state.db.list_categories()?;

    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(categories),
    }))
}

/// 获取分类下的题目
pub async fn get_category_questions(
    State(state): State<AppState>,
    category_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<CategoryQuestionsResponse>> {
    let Path(category_id) = category_id?;

    let category = state
        .db
        .get_category(category_id)?
        .ok_or_else(|| ApiError::NotFound(format!("category {}", category_id)))?;

    let questions = state.db.questions_by_category(category.id)?;

    Ok(Json(CategoryQuestionsResponse {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category: String::new(),
    }))
}
