// 服务模块
// 提供核心业务逻辑服务

pub mod database;
pub mod quiz;

pub use database::DatabaseService;
pub use quiz::select_question;
