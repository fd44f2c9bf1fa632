// 应用状态与路由组装

use axum::middleware::from_fn;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{self, categories, questions, quizzes};
use crate::middleware;
use crate::services::DatabaseService;

/// 应用状态，随请求注入各接口
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseService,
}

impl AppState {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/categories",
            get(categories::get_categories).fallback(handlers::method_not_allowed),
        )
        .route(
            "/categories/:category_id/questions",
            get(categories::get_category_questions).fallback(handlers::method_not_allowed),
        )
        .route(
            "/questions",
            get(questions::get_questions)
                .post(questions::create_question)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/questions/search",
            post(questions::search_questions).fallback(handlers::method_not_allowed),
        )
        .route(
            "/questions/:question_id",
            delete(questions::delete_question).fallback(handlers::method_not_allowed),
        )
        .route(
            "/quizzes",
            post(quizzes::play_quiz).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(from_fn(middleware::cors))
        .layer(from_fn(middleware::log_request))
        .with_state(state)
}
