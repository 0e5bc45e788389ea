// ==========================================
// 周中聚会节目派工系统 - 领域类型定义
// ==========================================
// 职责: 性别 / 职分 / 节目类型 / 性别限制 / 冲突类型
// 红线: 节目类型是封闭词表,未知标签必须在入口处拒绝
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 性别 (Gender)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

// ==========================================
// 会众职分 (Role / cargo)
// ==========================================
// 顺序: NewStudent < ... < Elder, 比较运算即职分高低
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    NewStudent,          // 新学生
    UnbaptizedPublisher, // 未受浸传道员
    BaptizedPublisher,   // 受浸传道员
    RegularPioneer,      // 正规先驱
    MinisterialServant,  // 助理仆人
    Elder,               // 长老
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::NewStudent => "new_student",
            Role::UnbaptizedPublisher => "unbaptized_publisher",
            Role::BaptizedPublisher => "baptized_publisher",
            Role::RegularPioneer => "regular_pioneer",
            Role::MinisterialServant => "ministerial_servant",
            Role::Elder => "elder",
        }
    }

    /// 是否属于"受浸传道员及以上"
    pub fn is_baptized_publisher_or_higher(&self) -> bool {
        *self >= Role::BaptizedPublisher
    }

    /// 是否为任命的弟兄（长老 / 助理仆人）
    pub fn is_appointed(&self) -> bool {
        matches!(self, Role::Elder | Role::MinisterialServant)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "elder" | "anciao" => Ok(Role::Elder),
            "ministerial_servant" | "servo_ministerial" => Ok(Role::MinisterialServant),
            "regular_pioneer" | "pioneiro_regular" => Ok(Role::RegularPioneer),
            "baptized_publisher" | "publicador_batizado" => Ok(Role::BaptizedPublisher),
            "unbaptized_publisher" | "publicador_nao_batizado" => Ok(Role::UnbaptizedPublisher),
            "new_student" | "estudante_novo" => Ok(Role::NewStudent),
            other => Err(format!("未知职分: {}", other)),
        }
    }
}

// ==========================================
// 节目类型 (Part Type)
// ==========================================
// 依据: 周中聚会节目单固定词表
// 说明: 四类"传道示范"共用同一资格规则,但统计/建议时分开计数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartType {
    OpeningPrayer,
    ClosingPrayer,
    Chairman,
    TreasuresTalk,
    SpiritualGems,
    BibleReading,
    StartingConversation,
    FollowingUp,
    MakingDisciples,
    ExplainingBeliefs,
    Discourse,
    LivingAsChristians,
    CongregationBibleStudy,
}

impl PartType {
    pub const ALL: [PartType; 13] = [
        PartType::OpeningPrayer,
        PartType::ClosingPrayer,
        PartType::Chairman,
        PartType::TreasuresTalk,
        PartType::SpiritualGems,
        PartType::BibleReading,
        PartType::StartingConversation,
        PartType::FollowingUp,
        PartType::MakingDisciples,
        PartType::ExplainingBeliefs,
        PartType::Discourse,
        PartType::LivingAsChristians,
        PartType::CongregationBibleStudy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PartType::OpeningPrayer => "opening_prayer",
            PartType::ClosingPrayer => "closing_prayer",
            PartType::Chairman => "chairman",
            PartType::TreasuresTalk => "treasures_talk",
            PartType::SpiritualGems => "spiritual_gems",
            PartType::BibleReading => "bible_reading",
            PartType::StartingConversation => "starting_conversation",
            PartType::FollowingUp => "following_up",
            PartType::MakingDisciples => "making_disciples",
            PartType::ExplainingBeliefs => "explaining_beliefs",
            PartType::Discourse => "discourse",
            PartType::LivingAsChristians => "living_as_christians",
            PartType::CongregationBibleStudy => "congregation_bible_study",
        }
    }

    /// 是否为传道示范类节目（可带场景描述）
    pub fn is_demonstration(&self) -> bool {
        matches!(
            self,
            PartType::StartingConversation
                | PartType::FollowingUp
                | PartType::MakingDisciples
                | PartType::ExplainingBeliefs
        )
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PartType {
    type Err = String;

    /// 解析节目类型标签（同时接受英文标签与旧系统的葡语标签）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "opening_prayer" | "oracao_abertura" => Ok(PartType::OpeningPrayer),
            "closing_prayer" | "oracao_encerramento" => Ok(PartType::ClosingPrayer),
            "chairman" | "presidente" | "comentarios_iniciais" => Ok(PartType::Chairman),
            "treasures_talk" | "tesouros_palavra" => Ok(PartType::TreasuresTalk),
            "spiritual_gems" | "joias_espirituais" => Ok(PartType::SpiritualGems),
            "bible_reading" | "leitura_biblica" => Ok(PartType::BibleReading),
            "starting_conversation" | "initial_call" | "primeira_conversa" => {
                Ok(PartType::StartingConversation)
            }
            "following_up" | "return_visit" | "revisita" => Ok(PartType::FollowingUp),
            "making_disciples" | "bible_study" | "estudo_biblico" => Ok(PartType::MakingDisciples),
            "explaining_beliefs" | "demonstration" | "demonstracao" | "parte_ministerio" => {
                Ok(PartType::ExplainingBeliefs)
            }
            "discourse" | "talk" | "discurso" => Ok(PartType::Discourse),
            "living_as_christians" | "vida_crista" => Ok(PartType::LivingAsChristians),
            "congregation_bible_study" | "estudo_biblico_congregacao" => {
                Ok(PartType::CongregationBibleStudy)
            }
            other => Err(format!("未知节目类型: {}", other)),
        }
    }
}

// ==========================================
// 性别限制 (Gender Restriction)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenderRestriction {
    #[default]
    None,
    MaleOnly,
}

// ==========================================
// 冲突类型 (Conflict Kind)
// ==========================================
// 红线: 冲突不阻止生成预览,但全部阻止确认
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    NoEligibleCandidate, // 无合格人选,节目未派工
    HelperUnavailable,   // 需要搭档但无合规搭档
    MissingHelper,       // 周级复核: 需要搭档的派工缺少搭档
    DuplicateMember,     // 周级复核: 同一成员一周多次出现
    SelfPairing,         // 周级复核: 主讲人与搭档为同一人
    IneligibleMember,    // 周级复核: 参与者不在名录或不具备该节目资格
    UnsafePairing,       // 周级复核: 搭档组合违反性别/家庭/未成年人规则
}

impl ConflictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictKind::NoEligibleCandidate => "no_eligible_candidate",
            ConflictKind::HelperUnavailable => "helper_unavailable",
            ConflictKind::MissingHelper => "missing_helper",
            ConflictKind::DuplicateMember => "duplicate_member",
            ConflictKind::SelfPairing => "self_pairing",
            ConflictKind::IneligibleMember => "ineligible_member",
            ConflictKind::UnsafePairing => "unsafe_pairing",
        }
    }

    /// 冲突严重度（用于排序与建议优先级）
    pub fn severity(&self) -> ConflictSeverity {
        match self {
            ConflictKind::NoEligibleCandidate
            | ConflictKind::DuplicateMember
            | ConflictKind::SelfPairing
            | ConflictKind::IneligibleMember
            | ConflictKind::UnsafePairing => ConflictSeverity::High,
            ConflictKind::HelperUnavailable | ConflictKind::MissingHelper => {
                ConflictSeverity::Medium
            }
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 冲突严重度 (Conflict Severity)
// ==========================================
// 顺序: High < Medium, 排序时高严重度在前
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictSeverity {
    High,
    Medium,
}

impl fmt::Display for ConflictSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictSeverity::High => write!(f, "HIGH"),
            ConflictSeverity::Medium => write!(f, "MEDIUM"),
        }
    }
}
