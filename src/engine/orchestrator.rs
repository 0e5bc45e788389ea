// ==========================================
// 周中聚会节目派工系统 - 引擎编排器
// ==========================================
// 用途: 协调六大核心引擎的执行顺序
// 流程: 选项 → 分配（串行）→ 冲突复核 ∥ 统计汇总 → 建议 → 结果
// 红线: 编排器不持有会话状态,重新生成必须重新提供输入
// ==========================================

use crate::config::{GenerationOptions, OptionsReader};
use crate::domain::member::Member;
use crate::domain::program::ProgramPart;
use crate::domain::report::GenerationResult;
use crate::engine::allocator::AssignmentAllocator;
use crate::engine::collaborators::{AssignmentSink, MemberDirectory, ProgramPartProvider};
use crate::engine::confirmation::ConfirmationGate;
use crate::engine::conflict_detector::ConflictDetector;
use crate::engine::error::{SchedulerError, SchedulerResult};
use crate::engine::recommendation::RecommendationEngine;
use crate::engine::statistics::StatisticsAggregator;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

// ==========================================
// ScheduleOrchestrator - 引擎编排器
// ==========================================
pub struct ScheduleOrchestrator<C>
where
    C: OptionsReader,
{
    config: Arc<C>,
    allocator: AssignmentAllocator,
    recommender: RecommendationEngine,
}

impl<C> ScheduleOrchestrator<C>
where
    C: OptionsReader,
{
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - config: 默认生成选项读取器
    pub fn new(config: Arc<C>) -> Self {
        Self {
            config,
            allocator: AssignmentAllocator::new(),
            recommender: RecommendationEngine::new(),
        }
    }

    /// 读取默认生成选项
    pub async fn default_options(&self) -> SchedulerResult<GenerationOptions> {
        Ok(self.config.load_generation_options().await?)
    }

    /// 生成一周派工预览
    ///
    /// # 参数
    /// - members: 成员快照
    /// - parts: 节目列表
    /// - week_start: 周起始日
    /// - options: 本次生成选项
    ///
    /// # 错误
    /// - InvalidProgramData / NoActiveMembers: 不返回部分结果
    #[instrument(skip(self, members, parts, options), fields(week = %week_start))]
    pub async fn generate(
        &self,
        members: Vec<Member>,
        parts: Vec<ProgramPart>,
        week_start: NaiveDate,
        options: &GenerationOptions,
    ) -> SchedulerResult<GenerationResult> {
        options.validate()?;

        info!(
            members = members.len(),
            parts = parts.len(),
            prioritize_new = options.prioritize_new,
            allow_repeat = options.allow_repeat_in_week,
            "开始生成周派工"
        );

        // === 步骤 1: 串行分配 ===
        debug!("步骤1: 执行派工分配");
        let outcome = self
            .allocator
            .allocate(&members, &parts, week_start, options, BTreeSet::new())?;

        // === 步骤 2: 冲突复核 ∥ 统计汇总 ===
        debug!("步骤2: 并行执行冲突复核与统计汇总");
        let members = Arc::new(members);
        let parts = Arc::new(parts);
        let assignments = Arc::new(outcome.assignments);
        let raw_conflicts = Arc::new(outcome.conflicts);
        let shared_options = Arc::new(options.clone());

        let detect_task = {
            let members = Arc::clone(&members);
            let parts = Arc::clone(&parts);
            let assignments = Arc::clone(&assignments);
            let raw_conflicts = Arc::clone(&raw_conflicts);
            let options = Arc::clone(&shared_options);
            tokio::task::spawn_blocking(move || {
                ConflictDetector::new().detect(&parts, &assignments, &raw_conflicts, &members, &options)
            })
        };
        let stats_task = {
            let members = Arc::clone(&members);
            let assignments = Arc::clone(&assignments);
            tokio::task::spawn_blocking(move || {
                StatisticsAggregator::new().aggregate(&assignments, &members)
            })
        };

        let (conflicts, statistics) = tokio::try_join!(detect_task, stats_task)
            .map_err(|e| SchedulerError::Internal(format!("并行复核任务失败: {}", e)))?;

        // === 步骤 3: 建议 ===
        debug!("步骤3: 生成建议");
        let recommendations = self
            .recommender
            .recommend(&statistics, &conflicts, &parts, options);

        info!(
            assignments = assignments.len(),
            conflicts = conflicts.len(),
            recommendations = recommendations.len(),
            "周派工生成完成"
        );

        Ok(GenerationResult {
            week_start_date: week_start,
            assignments: assignments.as_ref().clone(),
            conflicts,
            statistics,
            recommendations,
        })
    }

    /// 使用默认选项生成
    pub async fn generate_with_defaults(
        &self,
        members: Vec<Member>,
        parts: Vec<ProgramPart>,
        week_start: NaiveDate,
    ) -> SchedulerResult<GenerationResult> {
        let options = self.default_options().await?;
        self.generate(members, parts, week_start, &options).await
    }

    /// 从外部协作方读取输入并生成
    ///
    /// # 参数
    /// - options_override: None 时读取默认选项
    pub async fn generate_from_sources(
        &self,
        directory: &dyn MemberDirectory,
        provider: &dyn ProgramPartProvider,
        congregation_id: &str,
        week_start: NaiveDate,
        options_override: Option<GenerationOptions>,
    ) -> SchedulerResult<GenerationResult> {
        let options = match options_override {
            Some(options) => options,
            None => self.default_options().await?,
        };

        let members = directory.load_members(congregation_id).await?;
        let parts = provider.load_parts(week_start).await?;
        debug!(congregation_id, members = members.len(), parts = parts.len(), "已读取协作方输入");

        self.generate(members, parts, week_start, &options).await
    }

    /// 确认并保存
    ///
    /// 闸门先行检查,再交给持久化出口; 保存失败时结果可原样重试
    pub async fn confirm_and_save(
        &self,
        result: &GenerationResult,
        sink: &dyn AssignmentSink,
        confirm_despite_conflicts: bool,
    ) -> SchedulerResult<()> {
        ConfirmationGate::check(result, confirm_despite_conflicts)?;
        sink.save_week(result, confirm_despite_conflicts).await?;
        info!(week = %result.week_start_date, assignments = result.assignments.len(), "周派工已确认保存");
        Ok(())
    }
}
