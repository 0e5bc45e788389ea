// ==========================================
// 周中聚会节目派工系统 - 节目部分实体
// ==========================================
// 职责: 单周节目单中的一个节目部分
// 红线: 生成期间不可变; type_tag 保留原始标签,由分配器统一校验
// ==========================================

use crate::domain::types::{GenderRestriction, PartType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramPart {
    /// 周内序号（处理顺序）
    pub sequence: u32,
    pub title: String,
    /// 节目类型原始标签（见 PartType::from_str）
    pub type_tag: String,
    pub duration_minutes: u32,
    #[serde(default)]
    pub requires_helper: bool,
    #[serde(default)]
    pub gender_restriction: GenderRestriction,
    /// 传道示范的场景描述（如"挨家挨户"）
    #[serde(default)]
    pub scene: Option<String>,
}

impl ProgramPart {
    /// 解析节目类型
    pub fn part_type(&self) -> Result<PartType, String> {
        self.type_tag.parse::<PartType>()
    }

    pub fn is_male_only(&self) -> bool {
        self.gender_restriction == GenderRestriction::MaleOnly
    }
}
