// ==========================================
// 周中聚会节目派工系统 - 引擎层
// ==========================================
// 职责: 实现派工规则引擎,不拼 SQL
// 红线: Engine 不拼 SQL, 所有不合格判定必须输出 reason
// ==========================================

pub mod allocator;
pub mod collaborators;
pub mod confirmation;
pub mod conflict_detector;
pub mod eligibility;
pub mod eligibility_core;
pub mod error;
pub mod orchestrator;
pub mod pairing;
pub mod priority;
pub mod recommendation;
pub mod statistics;

// 重导出核心引擎
pub use allocator::{AllocationOutcome, AssignmentAllocator};
pub use collaborators::{
    AssignmentSink, InMemoryProgramProvider, InMemorySink, MemberDirectory, ProgramPartProvider,
    SnapshotDirectory,
};
pub use confirmation::ConfirmationGate;
pub use conflict_detector::ConflictDetector;
pub use eligibility::EligibilityFilter;
pub use eligibility_core::EligibilityCore;
pub use error::{SchedulerError, SchedulerResult};
pub use orchestrator::ScheduleOrchestrator;
pub use pairing::{PairingEngine, PairingOutcome};
pub use priority::{CandidateRanker, RankingContext};
pub use recommendation::RecommendationEngine;
pub use statistics::StatisticsAggregator;
