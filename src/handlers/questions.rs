//! 题目相关接口：分页列表、新增、删除、搜索

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::categories::category_map;
use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateQuestionRequest, NewQuestion, Question, SearchRequest};
use crate::utils::{paginate, parse_page, QUESTIONS_PER_PAGE};

/// 分页参数，保留原始字符串以便非数字时回退到第 1 页
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

/// GET /questions 响应
#[derive(Debug, Serialize)]
pub struct QuestionPageResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub categories: BTreeMap<i64, String>,
    pub current_category: String,
}

/// POST /questions/search 响应
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub question_created: i64,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted: i64,
}

/// 分页获取题目
pub async fn get_questions(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> ApiResult<Json<QuestionPageResponse>> {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    let page = parse_page(params.page.as_deref());

    let all_questions = state.db.list_questions()?;
    let current = paginate(&all_questions, page, QUESTIONS_PER_PAGE);
    if current.is_empty() {
        return Err(ApiError::NotFound(format!("questions page {}", page)));
    }

    let categories = state.db.list_categories()?;

    Ok(Json(QuestionPageResponse {
        success: true,
        questions: current.to_vec(),
        total_questions: all_questions.len(),
        categories: category_map(categories),
        current_category: String::new(),
    }))
}

/// 删除题目
pub async fn delete_question(
    State(state): State<AppState>,
    question_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DeletedResponse>> {
    let Path(question_id) = question_id?;

    if state.db.get_question(question_id)?.is_none() {
        return Err(ApiError::NotFound(format!("question {}", question_id)));
    }

    state.db.delete_question(question_id)?;
    log::info!("Deleted question {}", question_id);

    Ok(Json(DeletedResponse {
        success: true,
        deleted: question_id,
    }))
}

/// 新增题目
pub async fn create_question(
    State(state): State<AppState>,
    payload: Result<Json<CreateQuestionRequest>, JsonRejection>,
) -> ApiResult<Json<CreatedResponse>> {
    let Json(request) = payload?;
    let new_question = NewQuestion::from(request);

    validate_new_question(&new_question)?;
    if state.db.get_category(new_question.category)?.is_none() {
        return Err(ApiError::Unprocessable(format!(
            "unknown category {}",
            new_question.category
        )));
    }

    let id = state.db.insert_question(&new_question)?;
    log::info!("Created question {} in category {}", id, new_question.category);

    Ok(Json(CreatedResponse {
        success: true,
        question_created: id,
    }))
}

/// 按题干关键字搜索
pub async fn search_questions(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Json(request) = payload?;

    let questions = state.db.search_questions(&request.search_term)?;
    if questions.is_empty() {
        return Err(ApiError::NotFound(format!(
            "no questions matching {:?}",
            request.search_term
        )));
    }

    Ok(Json(SearchResponse {
        success: true,
        total_questions: questions.len(),
        questions,
        current_category: String::new(),
    }))
}

fn validate_new_question(question: &NewQuestion) -> ApiResult<()> {
    if question.question.is_empty() || question.answer.is_empty() {
        return Err(ApiError::Unprocessable(
            "question and answer must not be blank".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_question(question: &str, answer: &str, difficulty: i64) -> NewQuestion {
        NewQuestion {
            question: question.to_string(),
            answer: answer.to_string(),
            category: 1,
            difficulty,
        }
    }

    #[test]
    fn test_validate_new_question() {
        assert!(validate_new_question(&new_question("Q?", "A", 1)).is_ok());
        assert!(validate_new_question(&new_question("Q?", "A", 5)).is_ok());
        assert!(validate_new_question(&new_question("", "A", 3)).is_err());
        assert!(validate_new_question(&new_question("Q?", "", 3)).is_err());
        assert!(validate_new_question(&new_question("Q?", "A", 0)).is_ok());
        assert!(validate_new_question(&new_question("Q?", "A", 7)).is_ok());
    }
}
