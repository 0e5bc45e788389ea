// ==========================================
// 周中聚会节目派工系统 - 统计与生成结果
// ==========================================
// 职责: 每次生成重新计算的统计 + 对外结果对象
// 红线: 结果对象字段名 (weekStartDate/assignments/conflicts/
//       statistics/recommendations) 是对外契约
// ==========================================

use crate::domain::assignment::{Assignment, Conflict};
use crate::domain::types::Role;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 按性别计数（主讲人与助手各计一次）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderDistribution {
    pub male: usize,
    pub female: usize,
}

impl GenderDistribution {
    pub fn total(&self) -> usize {
        self.male + self.female
    }
}

// ==========================================
// Statistics - 派工统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_assignments: usize,
    pub by_gender: GenderDistribution,
    /// 带助手的派工数
    pub with_helper: usize,
    /// 主讲人与助手都能在名录中解析到的搭档数
    pub pairs_formed: usize,
    /// 同一家庭分组的搭档数
    pub family_pairs: usize,
    /// 按主讲人职分统计
    pub by_role: BTreeMap<Role, usize>,
}

// ==========================================
// GenerationResult - 生成结果（预览）
// ==========================================
// 说明: 调用方确认前始终是"预览",调度器不保存会话状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub week_start_date: NaiveDate,
    pub assignments: Vec<Assignment>,
    pub conflicts: Vec<Conflict>,
    pub statistics: Statistics,
    pub recommendations: Vec<String>,
}

impl GenerationResult {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}
