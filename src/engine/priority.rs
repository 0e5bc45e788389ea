// ==========================================
// 周中聚会节目派工系统 - 候选人排序引擎
// ==========================================
// 职责: 同一节目的合格候选人排序
// 输入: 合格成员列表 + 排序上下文
// 输出: 排序后的成员列表（确定性,无随机）
// ==========================================

use crate::config::GenerationOptions;
use crate::domain::member::Member;
use crate::domain::types::PartType;
use crate::engine::eligibility_core::EligibilityCore;
use chrono::NaiveDate;
use std::cmp::Ordering;

// ==========================================
// RankingContext - 排序上下文
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingContext {
    pub part_type: PartType,
    pub week_start: NaiveDate,
    pub window_start: NaiveDate,
    pub prioritize_new: bool,
}

impl RankingContext {
    pub fn new(part_type: PartType, week_start: NaiveDate, options: &GenerationOptions) -> Self {
        Self {
            part_type,
            week_start,
            window_start: EligibilityCore::history_window_start(
                week_start,
                options.history_window_weeks,
            ),
            prioritize_new: options.prioritize_new,
        }
    }
}

// ==========================================
// CandidateRanker - 候选人排序引擎
// ==========================================
pub struct CandidateRanker {
    // 无状态引擎,不需要注入依赖
}

impl CandidateRanker {
    pub fn new() -> Self {
        Self {}
    }

    /// 排序候选人列表
    ///
    /// 排序键:
    /// 1) 从未派工者优先（仅 prioritize_new 开启时）
    /// 2) 该节目类型最近一次主讲日期升序（从未承担者视为最早）
    /// 3) 回看窗口内参与次数升序
    /// 4) 成员 id 升序
    pub fn sort<'a>(&self, mut candidates: Vec<&'a Member>, ctx: &RankingContext) -> Vec<&'a Member> {
        candidates.sort_by(|a, b| self.compare(a, b, ctx));
        candidates
    }

    /// 比较两个候选人的优先级
    ///
    /// # 返回
    /// - Ordering::Less: a 优先
    /// - Ordering::Greater: b 优先
    pub fn compare(&self, a: &Member, b: &Member, ctx: &RankingContext) -> Ordering {
        // 1. 新人优先
        if ctx.prioritize_new {
            let ord = self.compare_newcomer(a, b);
            if ord != Ordering::Equal {
                return ord;
            }
        }

        // 2. 该节目类型最久未承担优先
        let ord = self.compare_part_recency(a, b, ctx.part_type);
        if ord != Ordering::Equal {
            return ord;
        }

        // 3. 窗口内参与次数少者优先
        let ord = self.compare_recent_frequency(a, b, ctx);
        if ord != Ordering::Equal {
            return ord;
        }

        // 4. id 升序
        a.id.cmp(&b.id)
    }

    fn compare_newcomer(&self, a: &Member, b: &Member) -> Ordering {
        // false < true: 无历史者在前
        a.has_history().cmp(&b.has_history())
    }

    fn compare_part_recency(&self, a: &Member, b: &Member, part_type: PartType) -> Ordering {
        // None < Some: 从未承担者在前
        a.last_assigned_to(part_type).cmp(&b.last_assigned_to(part_type))
    }

    fn compare_recent_frequency(&self, a: &Member, b: &Member, ctx: &RankingContext) -> Ordering {
        let count_a = a.recent_count(ctx.window_start, ctx.week_start);
        let count_b = b.recent_count(ctx.window_start, ctx.week_start);
        count_a.cmp(&count_b)
    }
}

impl Default for CandidateRanker {
    fn default() -> Self {
        Self::new()
    }
}
