// ==========================================
// 周中聚会节目派工系统 - 外部协作方接口
// ==========================================
// 职责: 定义调度核心所需的窄接口（不含 PDF 解析、存储表结构等实现）
// - MemberDirectory: 成员名录（只读快照）
// - ProgramPartProvider: 周节目单
// - AssignmentSink: 持久化出口（须整周原子写入）
// ==========================================

use crate::domain::member::Member;
use crate::domain::program::ProgramPart;
use crate::domain::report::GenerationResult;
use crate::engine::confirmation::ConfirmationGate;
use crate::engine::error::{SchedulerError, SchedulerResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Mutex;

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// 读取某会众的全部成员（生成期间视为只读快照）
    async fn load_members(&self, congregation_id: &str) -> SchedulerResult<Vec<Member>>;
}

#[async_trait]
pub trait ProgramPartProvider: Send + Sync {
    /// 读取目标周的节目列表
    async fn load_parts(&self, week_start: NaiveDate) -> SchedulerResult<Vec<ProgramPart>>;
}

#[async_trait]
pub trait AssignmentSink: Send + Sync {
    /// 原子保存整周结果: 全部成功或全部失败
    ///
    /// 实现方须拒绝带冲突的结果,除非 confirm_despite_conflicts=true
    async fn save_week(
        &self,
        result: &GenerationResult,
        confirm_despite_conflicts: bool,
    ) -> SchedulerResult<()>;
}

// ==========================================
// 内存实现（CLI / 测试）
// ==========================================

/// 固定成员快照
#[derive(Debug, Clone, Default)]
pub struct SnapshotDirectory {
    members: Vec<Member>,
}

impl SnapshotDirectory {
    pub fn new(members: Vec<Member>) -> Self {
        Self { members }
    }
}

#[async_trait]
impl MemberDirectory for SnapshotDirectory {
    async fn load_members(&self, _congregation_id: &str) -> SchedulerResult<Vec<Member>> {
        Ok(self.members.clone())
    }
}

/// 按周存放的节目单
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgramProvider {
    weeks: BTreeMap<NaiveDate, Vec<ProgramPart>>,
}

impl InMemoryProgramProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_week(mut self, week_start: NaiveDate, parts: Vec<ProgramPart>) -> Self {
        self.weeks.insert(week_start, parts);
        self
    }
}

#[async_trait]
impl ProgramPartProvider for InMemoryProgramProvider {
    /// 未登记的周返回空列表,由分配器报 InvalidProgramData
    async fn load_parts(&self, week_start: NaiveDate) -> SchedulerResult<Vec<ProgramPart>> {
        Ok(self.weeks.get(&week_start).cloned().unwrap_or_default())
    }
}

/// 内存持久化出口: 同一周再次保存即覆盖（重新生成模式）
#[derive(Debug, Default)]
pub struct InMemorySink {
    saved: Mutex<BTreeMap<NaiveDate, GenerationResult>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, week_start: NaiveDate) -> Option<GenerationResult> {
        self.saved
            .lock()
            .ok()
            .and_then(|saved| saved.get(&week_start).cloned())
    }
}

#[async_trait]
impl AssignmentSink for InMemorySink {
    async fn save_week(
        &self,
        result: &GenerationResult,
        confirm_despite_conflicts: bool,
    ) -> SchedulerResult<()> {
        ConfirmationGate::check(result, confirm_despite_conflicts)?;

        let mut saved = self
            .saved
            .lock()
            .map_err(|e| SchedulerError::Internal(e.to_string()))?;
        saved.insert(result.week_start_date, result.clone());
        Ok(())
    }
}
