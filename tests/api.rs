use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use trivia_api::models::NewQuestion;
use trivia_api::{build_router, AppState, DatabaseService};

fn setup() -> (Router, DatabaseService) {
    let db = DatabaseService::open_in_memory().expect("Failed to open database");
    let app = build_router(AppState::new(db.clone()));
    (app, db)
}

fn seed(db: &DatabaseService, question: &str, category: i64) -> i64 {
    db.insert_question(&NewQuestion {
        question: question.to_string(),
        answer: "answer".to_string(),
        category,
        difficulty: 2,
    })
    .expect("Failed to seed question")
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: Body,
) -> (StatusCode, HeaderMap, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header(header::CONTENT_TYPE, ct);
    }
    let request = builder.body(body).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, value)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, value) = match body {
        Some(json) => {
            send_raw(
                app,
                method,
                uri,
                Some("application/json"),
                Body::from(json.to_string()),
            )
            .await
        }
        None => send_raw(app, method, uri, None, Body::empty()).await,
    };
    (status, value)
}

fn assert_error(status: StatusCode, body: &Value, code: u16) {
    assert_eq!(status.as_u16(), code);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!(code));
    assert!(body["message"].is_string());
}

fn ids(body: &Value) -> Vec<i64> {
    body["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_get_categories() {
    let (app, _db) = setup();

    let (status, body) = send(&app, Method::GET, "/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["categories"]["1"], json!("Science"));
    assert_eq!(body["categories"].as_object().unwrap().len(), 6);
}

#[tokio::test]
async fn test_questions_are_paginated() {
    let (app, db) = setup();
    for i in 0..15 {
        seed(&db, &format!("Question number {}", i), 1 + i % 3);
    }

    let (status, body) = send(&app, Method::GET, "/questions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"].as_array().unwrap().len(), 10);
    assert_eq!(body["total_questions"], json!(15));
    assert_eq!(body["current_category"], json!(""));
    assert_eq!(body["categories"]["3"], json!("Geography"));

    let (status, body) = send(&app, Method::GET, "/questions?page=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"].as_array().unwrap().len(), 5);

    let (status, body) = send(&app, Method::GET, "/questions?page=abc", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"].as_array().unwrap().len(), 10);

    let (status, body) = send(&app, Method::GET, "/questions?page=3", None).await;
    assert_error(status, &body, 404);
}

#[tokio::test]
async fn test_question_fields_are_formatted() {
    let (app, db) = setup();
    let id = seed(&db, "Which is the largest ocean?", 3);

    let (_, body) = send(&app, Method::GET, "/questions", None).await;
    assert_eq!(
        body["questions"][0],
        json!({
            "id": id,
            "question": "Which is the largest ocean?",
            "answer": "answer",
            "category": 3,
            "difficulty": 2
        })
    );
}

#[tokio::test]
async fn test_create_list_delete_round_trip() {
    let (app, _db) = setup();

    let (status, body) = send(
        &app,
        Method::POST,
        "/questions",
        Some(json!({
            "question": "Who discovered penicillin?",
            "answer": "Alexander Fleming",
            "category": "1",
            "difficulty": 3
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    let id = body["question_created"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, "/categories/1/questions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![id]);
    assert_eq!(body["total_questions"], json!(1));

    let (status, body) = send(&app, Method::DELETE, &format!("/questions/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], json!(id));

    let (_, body) = send(&app, Method::GET, "/categories/1/questions", None).await;
    assert!(ids(&body).is_empty());

    let (status, body) = send(&app, Method::DELETE, &format!("/questions/{}", id), None).await;
    assert_error(status, &body, 404);
}

#[tokio::test]
async fn test_delete_non_integer_id_is_not_found() {
    let (app, _db) = setup();

    let (status, body) = send(&app, Method::DELETE, "/questions/abc", None).await;
    assert_error(status, &body, 404);
}

#[tokio::test]
async fn test_create_question_failures() {
    let (app, _db) = setup();

    // 缺少字段
    let (status, body) = send(
        &app,
        Method::POST,
        "/questions",
        Some(json!({"question": "Q?", "answer": "A", "category": 1})),
    )
    .await;
    assert_error(status, &body, 400);

    // 分类不存在
    let (status, body) = send(
        &app,
        Method::POST,
        "/questions",
        Some(json!({"question": "Q?", "answer": "A", "category": 99, "difficulty": 1})),
    )
    .await;
    assert_error(status, &body, 422);

    // 题干为空
    let (status, body) = send(
        &app,
        Method::POST,
        "/questions",
        Some(json!({"question": "  ", "answer": "A", "category": 1, "difficulty": 1})),
    )
    .await;
    assert_error(status, &body, 422);

    // JSON 格式错误
    let (status, _, body) = send_raw(
        &app,
        Method::POST,
        "/questions",
        Some("application/json"),
        Body::from("{not json"),
    )
    .await;
    assert_error(status, &body, 400);

    // 缺少 Content-Type
    let (status, _, body) = send_raw(
        &app,
        Method::POST,
        "/questions",
        None,
        Body::from(r#"{"question": "Q?"}"#),
    )
    .await;
    assert_error(status, &body, 400);
}

#[tokio::test]
async fn test_search_questions() {
    let (app, db) = setup();
    let wanted = seed(&db, "What is the title of the 1990 fantasy film?", 5);
    seed(&db, "Which country hosted the 2014 World Cup?", 6);

    let (status, body) = send(
        &app,
        Method::POST,
        "/questions/search",
        Some(json!({"searchTerm": "TITLE"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![wanted]);
    assert_eq!(body["total_questions"], json!(1));
    assert_eq!(body["current_category"], json!(""));

    let (status, body) = send(
        &app,
        Method::POST,
        "/questions/search",
        Some(json!({"searchTerm": "xylophone"})),
    )
    .await;
    assert_error(status, &body, 404);

    let (status, body) = send(&app, Method::POST, "/questions/search", Some(json!({}))).await;
    assert_error(status, &body, 400);
}

#[tokio::test]
async fn test_unknown_category_questions() {
    let (app, _db) = setup();

    let (status, body) = send(&app, Method::GET, "/categories/1000/questions", None).await;
    assert_error(status, &body, 404);

    let (status, body) = send(&app, Method::GET, "/categories/abc/questions", None).await;
    assert_error(status, &body, 404);
}

#[tokio::test]
async fn test_quiz_all_categories_is_union() {
    let (app, db) = setup();
    let science = seed(&db, "What is H2O?", 1);
    let art = seed(&db, "Who painted Guernica?", 2);

    let (status, body) = send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({"previous_questions": [science], "quiz_category": {"type": "click", "id": 0}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["question"]["id"], json!(art));
}

#[tokio::test]
async fn test_quiz_specific_category() {
    let (app, db) = setup();
    seed(&db, "What is H2O?", 1);
    let history: Vec<i64> = (0..3)
        .map(|i| seed(&db, &format!("History question {}", i), 4))
        .collect();

    let mut asked: Vec<i64> = Vec::new();
    for _ in 0..history.len() {
        let (status, body) = send(
            &app,
            Method::POST,
            "/quizzes",
            Some(json!({"previous_questions": asked, "quiz_category": {"id": 4}})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = body["question"]["id"].as_i64().unwrap();
        assert!(history.contains(&id));
        assert!(!asked.contains(&id));
        asked.push(id);
    }

    // 题目已全部出过
    let (status, body) = send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({"previous_questions": asked, "quiz_category": {"id": 4}})),
    )
    .await;
    assert_error(status, &body, 422);
}

#[tokio::test]
async fn test_quiz_empty_pool_and_bad_body() {
    let (app, _db) = setup();

    let (status, body) = send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({"previous_questions": [], "quiz_category": {"id": 0}})),
    )
    .await;
    assert_error(status, &body, 422);

    let (status, body) = send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({"previous_questions": []})),
    )
    .await;
    assert_error(status, &body, 400);
}

#[tokio::test]
async fn test_method_not_allowed_and_unknown_route() {
    let (app, _db) = setup();

    let (status, body) = send(&app, Method::PUT, "/categories", None).await;
    assert_error(status, &body, 405);

    let (status, body) = send(&app, Method::GET, "/quizzes", None).await;
    assert_error(status, &body, 405);

    let (status, body) = send(&app, Method::GET, "/questions/1", None).await;
    assert_error(status, &body, 405);

    let (status, body) = send(&app, Method::GET, "/nowhere", None).await;
    assert_error(status, &body, 404);
}

#[tokio::test]
async fn test_cors_headers_and_preflight() {
    let (app, _db) = setup();

    let (status, headers, body) =
        send_raw(&app, Method::OPTIONS, "/questions", None, Body::empty()).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(headers[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .contains("DELETE"));

    let (_, headers, _) = send_raw(&app, Method::GET, "/categories", None, Body::empty()).await;
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
        "Content-Type, Authorization"
    );
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    let (app, db) = setup();
    let wanted = seed(&db, "Which Émile wrote this?", 4);
    seed(&db, "Which emperor built this?", 4);

    let (status, body) = send(
        &app,
        Method::POST,
        "/questions/search",
        Some(json!({"searchTerm": "émile"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![wanted]);
}

#[tokio::test]
async fn test_create_question_accepts_any_integer_difficulty() {
    let (app, db) = setup();

    let (status, body) = send(
        &app,
        Method::POST,
        "/questions",
        Some(json!({"question": "How many planets?", "answer": "8", "category": 1, "difficulty": 7})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["question_created"].as_i64().unwrap();
    assert_eq!(db.get_question(id).unwrap().unwrap().difficulty, 7);
}

#[tokio::test]
async fn test_quiz_null_previous_questions() {
    let (app, db) = setup();
    let id = seed(&db, "What is H2O?", 1);

    let (status, body) = send(
        &app,
        Method::POST,
        "/quizzes",
        Some(json!({"previous_questions": null, "quiz_category": {"id": 1}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"]["id"], json!(id));
}
