// 数据库服务模块
// 提供 SQLite 数据库操作，支持题目与分类的查询、新增、删除和搜索

use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OptionalExtension, Row};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::StoreError;
use crate::models::{Category, NewQuestion, Question};

/// 默认分类，首次初始化时写入
const DEFAULT_CATEGORIES: [(i64, &str); 6] = [
    (1, "Science"),
    (2, "Art"),
    (3, "Geography"),
    (4, "History"),
    (5, "Entertainment"),
    (6, "Sports"),
];

const QUESTION_COLUMNS: &str = "id, question, answer, category, difficulty";

type StoreResult<T> = Result<T, StoreError>;

/// 数据库服务
#[derive(Clone)]
pub struct DatabaseService {
    pool: Arc<Mutex<Connection>>,
}

impl DatabaseService {
    /// 打开（或创建）数据库文件
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        // 确保数据目录存在
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let service = Self::from_connection(Connection::open(path)?);
        service.initialize()?;
        log::info!("Database opened at {}", path.display());
        Ok(service)
    }

    /// 内存数据库，主要用于测试
    pub fn open_in_memory() -> StoreResult<Self> {
        let service = Self::from_connection(Connection::open_in_memory()?);
        service.initialize()?;
        Ok(service)
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            pool: Arc::new(Mutex::new(conn)),
        }
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.pool.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// 初始化数据库表结构并写入默认分类
    pub fn initialize(&self) -> StoreResult<()> {
        let conn = self.conn()?;

        // SQLite 自带的 LOWER 只处理 ASCII
        conn.create_scalar_function(
            "unicode_lower",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| Ok(ctx.get::<String>(0)?.to_lowercase()),
        )?;

        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                type TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS questions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                category INTEGER NOT NULL,
                difficulty INTEGER NOT NULL,
                FOREIGN KEY (category) REFERENCES categories(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_questions_category ON questions(category);
        ",
        )?;

        let mut stmt = conn.prepare("INSERT OR IGNORE INTO categories (id, type) VALUES (?, ?)")?;
        for (id, kind) in DEFAULT_CATEGORIES {
            stmt.execute(rusqlite::params![id, kind])?;
        }

        Ok(())
    }

    // ==================== 分类 ====================

    /// 列出所有分类
    pub fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare("SELECT id, type FROM categories ORDER BY id")?;
        let rows = stmt.query_map([], Self::row_to_category)?;

        let mut categories = Vec::new();
        for row in rows {
            categories.push(row?);
        }

        Ok(categories)
    }

    /// 获取单个分类
    pub fn get_category(&self, id: i64) -> StoreResult<Option<Category>> {
        let conn = self.conn()?;

        let category = conn
            .query_row(
                "SELECT id, type FROM categories WHERE id = ?",
                rusqlite::params![id],
                Self::row_to_category,
            )
            .optional()?;

        Ok(category)
    }

    // ==================== 题目 CRUD ====================

    /// 获取所有题目，按 id 排序
    pub fn list_questions(&self) -> StoreResult<Vec<Question>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM questions ORDER BY id",
            QUESTION_COLUMNS
        ))?;
        let rows = stmt.query_map([], Self::row_to_question)?;

        let mut questions = Vec::new();
        for row in rows {
            questions.push(row?);
        }

        Ok(questions)
    }

    /// 获取单道题目
    pub fn get_question(&self, id: i64) -> StoreResult<Option<Question>> {
        let conn = self.conn()?;

        let question = conn
            .query_row(
                &format!("SELECT {} FROM questions WHERE id = ?", QUESTION_COLUMNS),
                rusqlite::params![id],
                Self::row_to_question,
            )
            .optional()?;

        Ok(question)
    }

    /// 获取分类下所有题目
    pub fn questions_by_category(&self, category_id: i64) -> StoreResult<Vec<Question>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM questions WHERE category = ? ORDER BY id",
            QUESTION_COLUMNS
        ))?;
        let rows = stmt.query_map(rusqlite::params![category_id], Self::row_to_question)?;

        let mut questions = Vec::new();
        for row in rows {
            questions.push(row?);
        }

        Ok(questions)
    }

    /// 搜索题目（题干包含关键字，不区分大小写）
    pub fn search_questions(&self, term: &str) -> StoreResult<Vec<Question>> {
        let conn = self.conn()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM questions
             WHERE unicode_lower(question) LIKE unicode_lower(?) ESCAPE '\\'
             ORDER BY id",
            QUESTION_COLUMNS
        ))?;

        let search_pattern = format!("%{}%", escape_like(term));
        let rows = stmt.query_map(rusqlite::params![search_pattern], Self::row_to_question)?;

        let mut questions = Vec::new();
        for row in rows {
            questions.push(row?);
        }

        Ok(questions)
    }

    /// 新增题目，返回数据库分配的 id
    pub fn insert_question(&self, question: &NewQuestion) -> StoreResult<i64> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO questions (question, answer, category, difficulty)
             VALUES (?, ?, ?, ?)",
            rusqlite::params![
                question.question,
                question.answer,
                question.category,
                question.difficulty,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// 删除题目
    pub fn delete_question(&self, id: i64) -> StoreResult<()> {
        let conn = self.conn()?;

        let affected = conn.execute("DELETE FROM questions WHERE id = ?", rusqlite::params![id])?;
        if affected == 0 {
            return Err(StoreError::NotFound {
                entity: "question",
                id,
            });
        }

        Ok(())
    }

    // ==================== 辅助方法 ====================

    fn row_to_category(row: &Row) -> Result<Category, rusqlite::Error> {
        Ok(Category {
            id: row.get(0)?,
            kind: row.get(1)?,
        })
    }

    fn row_to_question(row: &Row) -> Result<Question, rusqlite::Error> {
        Ok(Question {
            id: row.get(0)?,
            question: row.get(1)?,
            answer: row.get(2)?,
            category: row.get(3)?,
            difficulty: row.get(4)?,
        })
    }
}

/// 转义 LIKE 通配符，关键字按字面匹配
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
