// ==========================================
// 周中聚会节目派工系统 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置值非法 (key={key}): {message}")]
    InvalidValue { key: String, message: String },

    #[error("配置存储访问失败: {0}")]
    Storage(String),

    #[error("配置锁获取失败: {0}")]
    LockError(String),
}

impl From<rusqlite::Error> for ConfigError {
    fn from(err: rusqlite::Error) -> Self {
        ConfigError::Storage(err.to_string())
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
