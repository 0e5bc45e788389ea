// ==========================================
// 周中聚会节目派工系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assignment;
pub mod member;
pub mod program;
pub mod qualification;
pub mod report;
pub mod types;

// 重导出核心类型
pub use assignment::{Assignment, Conflict};
pub use member::{HistoryEntry, Member, MemberId};
pub use program::ProgramPart;
pub use qualification::{QualificationRule, RoleRequirement};
pub use report::{GenderDistribution, GenerationResult, Statistics};
pub use types::{ConflictKind, ConflictSeverity, Gender, GenderRestriction, PartType, Role};
