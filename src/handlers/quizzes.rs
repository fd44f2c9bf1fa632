//! 测验接口

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiResult;
use crate::models::{CategorySelector, Question, QuizRequest, QuizSession};
use crate::services::select_question;

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub success: bool,
    pub question: Question,
}

/// 从所选分类（0 为全部）中随机返回一道未出过的题目
pub async fn play_quiz(
    State(state): State<AppState>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResult<Json<QuizResponse>> {
    let Json(request) = payload?;
    let session = QuizSession::from(request);

    let pool = match session.category {
        CategorySelector::All => state.db.list_questions()?,
        CategorySelector::Only(category_id) => state.db.questions_by_category(category_id)?,
    };

    let question = {
        let mut rng = rand::thread_rng();
        select_question(&pool, &session.previously_asked, &mut rng)?.clone()
    };

    log::debug!(
        "Quiz picked question {} ({} in pool, {} asked)",
        question.id,
        pool.len(),
        session.previously_asked.len()
    );

    Ok(Json(QuizResponse {
        success: true,
        question,
    }))
}
