// ==========================================
// 周中聚会节目派工系统 - 数据仓储层
// ==========================================
// 职责: 数据访问,不含派工逻辑
// 红线: Repository 不含引擎逻辑
// ==========================================

pub mod assignment_repo;
pub mod error;

// 重导出核心仓储
pub use assignment_repo::SqliteAssignmentRepository;
pub use error::{RepositoryError, RepositoryResult};
