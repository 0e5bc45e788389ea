// ==========================================
// 周中聚会节目派工系统 - 成员实体
// ==========================================
// 职责: 成员主数据 + 派工历史
// 红线: 单次生成内只读,由成员名录协作方提供
// ==========================================

use crate::domain::qualification::QualificationRule;
use crate::domain::types::{Gender, PartType, Role};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

// ==========================================
// MemberId - 成员标识
// ==========================================
// 数值型,用于确定性平局裁决（最小 id 优先）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==========================================
// HistoryEntry - 派工历史记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub part_type: PartType,
    pub date: NaiveDate,
    /// 搭档（作为主讲人时为助手,作为助手时为主讲人）
    #[serde(default)]
    pub partner_id: Option<MemberId>,
    /// 本次是否以助手身份参与
    #[serde(default)]
    pub as_helper: bool,
}

// ==========================================
// Member - 成员
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub gender: Gender,
    pub role: Role,
    /// 未受浸标记对受浸传道员及以上职分无效,见 is_baptized
    #[serde(default)]
    pub baptized: bool,
    #[serde(default = "default_active")]
    pub active: bool,
    /// 家庭分组: 同一 family_group_id 视为亲属
    #[serde(default)]
    pub family_group_id: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    /// 显式资格标记; None 表示按职分/性别规则表推导
    #[serde(default)]
    pub qualifications: Option<BTreeSet<PartType>>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

fn default_active() -> bool {
    true
}

impl Member {
    /// 与另一成员是否同属一个家庭分组
    pub fn related_to(&self, other: &Member) -> bool {
        match (&self.family_group_id, &other.family_group_id) {
            (Some(a), Some(b)) => !a.trim().is_empty() && a == b,
            _ => false,
        }
    }

    pub fn is_minor(&self, threshold: u32) -> bool {
        self.age.map(|age| age < threshold).unwrap_or(false)
    }

    /// 是否有任何历史派工
    pub fn has_history(&self) -> bool {
        !self.history.is_empty()
    }

    /// 最近一次以主讲人身份承担该节目类型的日期
    pub fn last_assigned_to(&self, part_type: PartType) -> Option<NaiveDate> {
        self.history
            .iter()
            .filter(|h| !h.as_helper && h.part_type == part_type)
            .map(|h| h.date)
            .max()
    }

    /// 统计 [since, before) 区间内的参与次数
    pub fn recent_count(&self, since: NaiveDate, before: NaiveDate) -> usize {
        self.history
            .iter()
            .filter(|h| h.date >= since && h.date < before)
            .count()
    }

    /// 最近一次与指定成员搭档的日期
    pub fn last_paired_with(&self, other: MemberId) -> Option<NaiveDate> {
        self.history
            .iter()
            .filter(|h| h.partner_id == Some(other))
            .map(|h| h.date)
            .max()
    }

    /// 受浸传道员及以上职分本身即已受浸
    pub fn is_baptized(&self) -> bool {
        self.baptized || self.role.is_baptized_publisher_or_higher()
    }

    /// 按资格规则表推导的节目类型集合
    pub fn derive_qualifications(&self) -> BTreeSet<PartType> {
        PartType::ALL
            .into_iter()
            .filter(|pt| QualificationRule::for_part(*pt).admits(self.gender, self.role, self.is_baptized()))
            .collect()
    }

    /// 是否具备某节目类型资格
    ///
    /// 显式标记只能收窄,不能放宽规则表的性别要求
    pub fn is_qualified_for(&self, part_type: PartType) -> bool {
        match &self.qualifications {
            Some(flags) => {
                flags.contains(&part_type)
                    && QualificationRule::for_part(part_type).allows_gender(self.gender)
            }
            None => QualificationRule::for_part(part_type).admits(self.gender, self.role, self.is_baptized()),
        }
    }
}
