// ==========================================
// 周中聚会节目派工系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 软冲突是数据(Conflict),不是错误
// ==========================================

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    // ===== 致命输入错误: 中止生成,不返回部分结果 =====
    #[error("节目数据非法: {0}")]
    InvalidProgramData(String),

    #[error("成员名录中没有在职成员")]
    NoActiveMembers,

    // ===== 确认闸门 =====
    #[error("存在 {count} 个未解决冲突,需显式确认后才能保存")]
    UnresolvedConflicts { count: usize },

    // ===== 外部协作方 =====
    #[error("协作方 {source_name} 失败: {message}")]
    Collaborator {
        source_name: String,
        message: String,
    },

    #[error("生成选项非法: {0}")]
    Config(#[from] ConfigError),

    #[error("内部错误: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SchedulerError {
    pub fn collaborator(source_name: &str, message: impl ToString) -> Self {
        SchedulerError::Collaborator {
            source_name: source_name.to_string(),
            message: message.to_string(),
        }
    }

    /// 是否为需要上游修正数据的致命输入错误
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SchedulerError::InvalidProgramData(_) | SchedulerError::NoActiveMembers
        )
    }
}

/// Result 类型别名
pub type SchedulerResult<T> = Result<T, SchedulerError>;
