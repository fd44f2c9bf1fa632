// 数据模型
// 题目、分类以及各接口的请求结构

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// 题目数据结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// 分类数据结构
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// 新增题目（id 由数据库分配）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

/// POST /questions 请求体
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuestionRequest {
    pub question: String,
    pub answer: String,
    #[serde(deserialize_with = "int_or_string")]
    pub category: i64,
    #[serde(deserialize_with = "int_or_string")]
    pub difficulty: i64,
}

impl From<CreateQuestionRequest> for NewQuestion {
    fn from(req: CreateQuestionRequest) -> Self {
        Self {
            question: req.question.trim().to_string(),
            answer: req.answer.trim().to_string(),
            category: req.category,
            difficulty: req.difficulty,
        }
    }
}

/// POST /questions/search 请求体
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
}

/// 测验分类，只需要 id，前端可能附带 type
#[derive(Debug, Clone, Deserialize)]
pub struct QuizCategory {
    #[serde(deserialize_with = "int_or_string")]
    pub id: i64,
}

/// POST /quizzes 请求体
#[derive(Debug, Clone, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub previous_questions: Option<Vec<i64>>,
    pub quiz_category: QuizCategory,
}

/// 测验题目来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorySelector {
    All,
    Only(i64),
}

impl CategorySelector {
    /// 分类 id 0 表示全部分类
    pub fn from_id(id: i64) -> Self {
        if id == 0 {
            CategorySelector::All
        } else {
            CategorySelector::Only(id)
        }
    }
}

/// 单次请求内重建的测验状态，服务端不保存
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    pub previously_asked: HashSet<i64>,
    pub category: CategorySelector,
}

impl From<QuizRequest> for QuizSession {
    fn from(req: QuizRequest) -> Self {
        Self {
            previously_asked: req.previous_questions.unwrap_or_default().into_iter().collect(),
            category: CategorySelector::from_id(req.quiz_category.id),
        }
    }
}

/// 接受数字或数字字符串（表单 select 的值是字符串）
fn int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(v) => Ok(v),
        IntOrString::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid integer: {:?}", s))),
    }
}
