// ==========================================
// 周中聚会节目派工系统 - 资格规则表
// ==========================================
// 职责: PartType -> {允许性别, 最低职分/允许职分, 是否需受浸}
// 红线: 资格判定只查此表,不得在引擎中散落性别/职分条件
// ==========================================

use crate::domain::types::{Gender, PartType, Role};

/// 职分要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRequirement {
    Any,
    /// 仅长老 / 助理仆人
    Appointed,
    /// 受浸传道员及以上
    BaptizedPublisherOrHigher,
}

impl RoleRequirement {
    pub fn allows(&self, role: Role) -> bool {
        match self {
            RoleRequirement::Any => true,
            RoleRequirement::Appointed => role.is_appointed(),
            RoleRequirement::BaptizedPublisherOrHigher => role.is_baptized_publisher_or_higher(),
        }
    }
}

/// 单个节目类型的资格规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualificationRule {
    pub allowed_genders: &'static [Gender],
    pub roles: RoleRequirement,
    pub requires_baptized: bool,
}

const MALE: &[Gender] = &[Gender::Male];
const ANY_GENDER: &[Gender] = &[Gender::Male, Gender::Female];

impl QualificationRule {
    pub fn for_part(part_type: PartType) -> QualificationRule {
        match part_type {
            PartType::Chairman
            | PartType::TreasuresTalk
            | PartType::SpiritualGems
            | PartType::LivingAsChristians
            | PartType::CongregationBibleStudy => QualificationRule {
                allowed_genders: MALE,
                roles: RoleRequirement::Appointed,
                requires_baptized: true,
            },
            PartType::OpeningPrayer | PartType::ClosingPrayer | PartType::Discourse => {
                QualificationRule {
                    allowed_genders: MALE,
                    roles: RoleRequirement::BaptizedPublisherOrHigher,
                    requires_baptized: true,
                }
            }
            PartType::BibleReading => QualificationRule {
                allowed_genders: MALE,
                roles: RoleRequirement::Any,
                requires_baptized: false,
            },
            PartType::StartingConversation
            | PartType::FollowingUp
            | PartType::MakingDisciples
            | PartType::ExplainingBeliefs => QualificationRule {
                allowed_genders: ANY_GENDER,
                roles: RoleRequirement::Any,
                requires_baptized: false,
            },
        }
    }

    pub fn allows_gender(&self, gender: Gender) -> bool {
        self.allowed_genders.contains(&gender)
    }

    pub fn male_only(&self) -> bool {
        !self.allows_gender(Gender::Female)
    }

    /// 按性别/职分/受浸判定
    pub fn admits(&self, gender: Gender, role: Role, baptized: bool) -> bool {
        self.allows_gender(gender)
            && self.roles.allows(role)
            && (!self.requires_baptized || baptized)
    }
}
