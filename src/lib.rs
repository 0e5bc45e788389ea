// ==========================================
// 周中聚会节目派工系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 派工决策支持 (生成结果为预览,人工确认后生效)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 派工规则
pub mod engine;

// 配置层 - 生成选项
pub mod config;

// 数据仓储层 - 持久化出口参考实现
pub mod repository;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ConflictKind, ConflictSeverity, Gender, GenderRestriction, PartType, Role};

// 领域实体
pub use domain::{
    Assignment, Conflict, GenerationResult, HistoryEntry, Member, MemberId, ProgramPart,
    Statistics,
};

// 配置
pub use config::{ConfigManager, GenerationOptions, OptionsReader};

// 引擎
pub use engine::{
    AssignmentAllocator, ConflictDetector, EligibilityFilter, PairingEngine,
    RecommendationEngine, ScheduleOrchestrator, SchedulerError, SchedulerResult,
    StatisticsAggregator,
};

// 仓储
pub use repository::SqliteAssignmentRepository;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "周中聚会节目派工系统";
